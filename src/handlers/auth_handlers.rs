use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::auth::{csrf, password, rate_limit::RateLimiter, session::get_user_id};
use crate::db::DbPool;
use crate::errors::{AppError, render};
use crate::models::user;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/dashboard"))
            .finish());
    }

    let csrf_token = csrf::token_for(&session);
    render(LoginTemplate { error: None, csrf_token })
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or_else(|| std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        let csrf_token = csrf::token_for(&session);
        return render(LoginTemplate {
            error: Some("Too many failed login attempts. Please try again later.".to_string()),
            csrf_token,
        });
    }

    let found = user::find_by_username(&pool, &form.username).await?;

    if let Some(u) = &found {
        if password::verify_password(&form.password, &u.password_hash) {
            limiter.clear(ip);
            session.renew();
            let _ = session.insert("user_id", u.id);
            let _ = session.insert("username", &u.username);
            let _ = session.insert("role", &u.role);
            return Ok(HttpResponse::SeeOther()
                .insert_header(("Location", "/dashboard"))
                .finish());
        }
    }

    limiter.record_failure(ip);
    let csrf_token = csrf::token_for(&session);
    render(LoginTemplate {
        error: Some("Invalid username or password".to_string()),
        csrf_token,
    })
}

pub async fn logout(session: Session, form: web::Form<CsrfOnly>) -> Result<HttpResponse, AppError> {
    csrf::verify(&session, &form.csrf_token)?;
    session.purge();
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/login"))
        .finish())
}

/// GET /api/auth/session — who is signed in; the console redirects by role
/// off this.
pub async fn session_info(
    pool: web::Data<DbPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user_id = crate::auth::session::require_user(&session)?;
    let u = user::find_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| AppError::Session("Session user no longer exists".to_string()))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user_id": u.id,
        "username": u.username,
        "display_name": u.display_name,
        "role": u.role,
    })))
}
