use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_user;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{customer, repair, user};

fn esc(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// GET /repairs/{id}/print — print-friendly HTML work order for the bench.
pub async fn print_work_order(
    pool: web::Data<DbPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_user(&session)?;

    let repair_id = path.into_inner();
    let r = repair::find_by_id(&pool, repair_id).await?.ok_or(AppError::NotFound)?;
    let parts = repair::find_parts(&pool, repair_id).await?;

    let customer_name = match r.customer_id {
        Some(id) => customer::find_by_id(&pool, id)
            .await?
            .map(|c| c.name)
            .unwrap_or_default(),
        None => String::new(),
    };
    let technician_name = match r.technician_id {
        Some(id) => user::find_by_id(&pool, id)
            .await?
            .map(|u| if u.display_name.is_empty() { u.username } else { u.display_name })
            .unwrap_or_default(),
        None => String::new(),
    };

    let parts_rows = parts
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">&euro; {}.{:02}</td></tr>",
                esc(&p.name),
                p.quantity,
                p.unit_price_cents / 100,
                p.unit_price_cents % 100,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let parts_table = if parts_rows.is_empty() {
        "<p class=\"empty\">No parts recorded.</p>".to_string()
    } else {
        format!(
            "<table><thead><tr><th>Part</th><th class=\"num\">Qty</th><th class=\"num\">Unit price</th></tr></thead>\
             <tbody>{parts_rows}</tbody></table>"
        )
    };

    let sla_row = r
        .sla_due
        .as_deref()
        .map(|d| format!("<div class=\"meta-item\"><label>SLA deadline</label><span>{}</span></div>", esc(d)))
        .unwrap_or_default();

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="nl">
<head>
    <meta charset="UTF-8">
    <title>Work order #{id} — {title}</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, system-ui, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #fff;
        }}
        .page {{ max-width: 900px; margin: 0 auto; padding: 2rem; }}
        header {{ border-bottom: 3px solid #333; padding-bottom: 1.5rem; margin-bottom: 2rem; }}
        h1 {{ font-size: 1.75rem; margin-bottom: 0.5rem; }}
        .meta {{
            display: grid;
            grid-template-columns: 1fr 1fr 1fr;
            gap: 1.5rem;
            margin-top: 1rem;
            font-size: 0.9rem;
            color: #666;
        }}
        .meta-item label {{ font-weight: 600; color: #333; display: block; margin-bottom: 0.25rem; }}
        section {{ margin-bottom: 2rem; page-break-inside: avoid; }}
        h2 {{ font-size: 1.25rem; margin-bottom: 0.75rem; color: #1c1917; }}
        .description {{ padding-left: 1rem; border-left: 3px solid #ddd; line-height: 1.8; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #ddd; }}
        .num {{ text-align: right; }}
        .empty {{ color: #999; }}
        footer {{
            margin-top: 3rem;
            padding-top: 1.5rem;
            border-top: 1px solid #ddd;
            font-size: 0.85rem;
            color: #999;
            text-align: center;
        }}
        @media print {{
            .page {{ max-width: none; padding: 0; }}
            header, section {{ page-break-inside: avoid; }}
        }}
    </style>
</head>
<body>
    <div class="page">
        <header>
            <h1>Work order #{id} — {title}</h1>
            <div class="meta">
                <div class="meta-item"><label>Status</label><span>{status}</span></div>
                <div class="meta-item"><label>Priority</label><span>{priority}</span></div>
                <div class="meta-item"><label>Category</label><span>{category}</span></div>
                <div class="meta-item"><label>Customer</label><span>{customer}</span></div>
                <div class="meta-item"><label>Technician</label><span>{technician}</span></div>
                <div class="meta-item"><label>Created</label><span>{created}</span></div>
                {sla_row}
            </div>
        </header>
        <section>
            <h2>Description</h2>
            <div class="description">{description}</div>
        </section>
        <section>
            <h2>Parts used</h2>
            {parts_table}
        </section>
        <footer>
            <p>Print this page to PDF to include it with the returned equipment.</p>
        </footer>
    </div>
</body>
</html>"#,
        id = r.id,
        title = esc(&r.title),
        status = esc(&r.status),
        priority = esc(&r.priority),
        category = esc(&r.issue_category),
        customer = esc(&customer_name),
        technician = esc(&technician_name),
        created = esc(&r.created_at),
        description = esc(&r.description).replace('\n', "<br>"),
    );

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("inline; filename=\"work-order-{repair_id}.html\""),
        ))
        .body(html))
}
