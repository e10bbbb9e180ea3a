use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use lenswerk::{activity, auth, db, handlers};

use handlers::uploads::UploadDir;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_path = env_or("DATABASE_PATH", "data/app.db");
    let upload_dir = std::path::PathBuf::from(env_or("UPLOAD_DIR", "data/uploads"));
    let bind_addr = env_or("BIND_ADDR", "127.0.0.1:8080");

    if let Some(parent) = std::path::Path::new(&database_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create data directory");
    }
    std::fs::create_dir_all(&upload_dir).expect("Failed to create upload directory");

    let pool = db::init_pool(&database_path).await;
    db::run_migrations(&pool).await;

    let admin_hash = auth::password::hash_password(&env_or("ADMIN_PASSWORD", "admin123"))
        .expect("Failed to hash default password");
    db::seed_admin(&pool, &admin_hash).await;

    activity::cleanup_old_entries(&pool).await;

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let rate_limiter = auth::rate_limit::RateLimiter::new();

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(rate_limiter.clone()))
            .app_data(web::Data::new(UploadDir(upload_dir.clone())))
            // Public routes
            .route("/login", web::get().to(handlers::auth_handlers::login_page))
            .route("/login", web::post().to(handlers::auth_handlers::login_submit))
            // Root redirect
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::SeeOther()
                        .insert_header(("Location", "/dashboard"))
                        .finish()
                }),
            )
            // Protected routes
            .service(
                web::scope("")
                    .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                    .route("/dashboard", web::get().to(handlers::dashboard::index))
                    .route("/logout", web::post().to(handlers::auth_handlers::logout))
                    .route(
                        "/repairs/{id}/print",
                        web::get().to(handlers::repair_handlers::print_work_order),
                    )
                    // Session / users
                    .route("/api/auth/session", web::get().to(handlers::auth_handlers::session_info))
                    .route("/api/users", web::get().to(handlers::user_handlers::list))
                    // Dashboard
                    .route("/api/dashboard/stats", web::get().to(handlers::dashboard::stats))
                    // Todos
                    .route("/api/todos", web::get().to(handlers::todo_handlers::list))
                    .route("/api/todos", web::post().to(handlers::todo_handlers::create))
                    .route("/api/todos/{id}", web::get().to(handlers::todo_handlers::read))
                    .route("/api/todos/{id}", web::patch().to(handlers::todo_handlers::update))
                    .route("/api/todos/{id}", web::delete().to(handlers::todo_handlers::delete))
                    // Customers
                    .route("/api/customers", web::get().to(handlers::customer_handlers::list))
                    .route("/api/customers", web::post().to(handlers::customer_handlers::create))
                    .route("/api/customers/{id}", web::get().to(handlers::customer_handlers::read))
                    .route(
                        "/api/customers/{id}",
                        web::patch().to(handlers::customer_handlers::update),
                    )
                    // Orders
                    .route("/api/orders", web::get().to(handlers::order_handlers::list))
                    .route("/api/orders", web::post().to(handlers::order_handlers::create))
                    .route("/api/orders/{id}", web::get().to(handlers::order_handlers::read))
                    .route("/api/orders/{id}", web::patch().to(handlers::order_handlers::update))
                    .route("/api/orders/{id}", web::delete().to(handlers::order_handlers::delete))
                    // Purchase orders
                    .route(
                        "/api/purchase-orders",
                        web::get().to(handlers::purchase_order_handlers::list),
                    )
                    .route(
                        "/api/purchase-orders",
                        web::post().to(handlers::purchase_order_handlers::create),
                    )
                    .route(
                        "/api/purchase-orders/{id}",
                        web::get().to(handlers::purchase_order_handlers::read),
                    )
                    .route(
                        "/api/purchase-orders/{id}",
                        web::patch().to(handlers::purchase_order_handlers::update),
                    )
                    .route(
                        "/api/purchase-orders/{id}",
                        web::delete().to(handlers::purchase_order_handlers::delete),
                    )
                    .route(
                        "/api/purchase-orders/{id}/files",
                        web::post().to(handlers::purchase_order_handlers::upload),
                    )
                    .route(
                        "/api/purchase-orders/{id}/notes",
                        web::get().to(handlers::purchase_order_handlers::list_notes),
                    )
                    .route(
                        "/api/purchase-orders/{id}/notes",
                        web::post().to(handlers::purchase_order_handlers::create_note),
                    )
                    // Line items: GET is by purchase-order id, PATCH/DELETE by item id
                    .route(
                        "/api/purchase-order-items",
                        web::post().to(handlers::purchase_order_handlers::create_item),
                    )
                    .route(
                        "/api/purchase-order-items/{id}",
                        web::get().to(handlers::purchase_order_handlers::list_items),
                    )
                    .route(
                        "/api/purchase-order-items/{id}",
                        web::patch().to(handlers::purchase_order_handlers::update_item),
                    )
                    .route(
                        "/api/purchase-order-items/{id}",
                        web::delete().to(handlers::purchase_order_handlers::delete_item),
                    )
                    // Repairs
                    .route("/api/repairs", web::get().to(handlers::repair_handlers::list))
                    .route("/api/repairs", web::post().to(handlers::repair_handlers::create))
                    .route("/api/repairs/{id}", web::get().to(handlers::repair_handlers::read))
                    .route("/api/repairs/{id}", web::patch().to(handlers::repair_handlers::update))
                    .route("/api/repairs/{id}", web::delete().to(handlers::repair_handlers::delete))
                    .route(
                        "/api/repairs/{id}/upload",
                        web::post().to(handlers::repair_handlers::upload),
                    )
                    .route(
                        "/api/repairs/{id}/parts",
                        web::get().to(handlers::repair_handlers::list_parts),
                    )
                    .route(
                        "/api/repairs/{id}/parts",
                        web::post().to(handlers::repair_handlers::add_part),
                    )
                    .route(
                        "/api/repair-parts/{id}",
                        web::delete().to(handlers::repair_handlers::delete_part),
                    )
                    // Cases
                    .route("/api/cases", web::get().to(handlers::case_handlers::list))
                    .route("/api/cases", web::post().to(handlers::case_handlers::create))
                    .route("/api/cases/{id}", web::get().to(handlers::case_handlers::read))
                    .route("/api/cases/{id}", web::patch().to(handlers::case_handlers::update))
                    .route("/api/cases/{id}", web::delete().to(handlers::case_handlers::delete))
                    .route(
                        "/api/cases/{id}/links",
                        web::get().to(handlers::case_handlers::list_links),
                    )
                    .route(
                        "/api/cases/{id}/links",
                        web::post().to(handlers::case_handlers::create_link),
                    )
                    .route(
                        "/api/case-links/{id}",
                        web::delete().to(handlers::case_handlers::delete_link),
                    )
                    .route(
                        "/api/cases/{id}/notes",
                        web::get().to(handlers::case_handlers::list_notes),
                    )
                    .route(
                        "/api/cases/{id}/notes",
                        web::post().to(handlers::case_handlers::create_note),
                    )
                    // Files
                    .route("/api/files/{id}", web::get().to(handlers::file_handlers::download))
                    .route("/api/files/{id}", web::delete().to(handlers::file_handlers::delete))
                    // Appointments — export.ics BEFORE /{id} to avoid routing conflict
                    .route(
                        "/api/appointments/export.ics",
                        web::get().to(handlers::appointment_handlers::export_ics),
                    )
                    .route(
                        "/api/appointments",
                        web::get().to(handlers::appointment_handlers::list),
                    )
                    .route(
                        "/api/appointments",
                        web::post().to(handlers::appointment_handlers::create),
                    )
                    .route(
                        "/api/appointments/{id}",
                        web::get().to(handlers::appointment_handlers::read),
                    )
                    .route(
                        "/api/appointments/{id}",
                        web::patch().to(handlers::appointment_handlers::update),
                    )
                    .route(
                        "/api/appointments/{id}",
                        web::delete().to(handlers::appointment_handlers::delete),
                    )
                    .route(
                        "/api/agenda/layout",
                        web::get().to(handlers::appointment_handlers::layout),
                    )
                    // Activity feed
                    .route("/api/activities", web::get().to(handlers::activity_handlers::list)),
            )
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({"error": "Not found"}))
            }))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
