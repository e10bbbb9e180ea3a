use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user;

/// GET /api/users — for assignee and technician dropdowns. The password hash
/// never serializes.
pub async fn list(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let users = user::find_all(&pool).await?;
    Ok(HttpResponse::Ok().json(users))
}
