use actix_session::Session;

use crate::errors::AppError;

fn get_string(session: &Session, key: &str) -> Result<String, AppError> {
    session
        .get::<String>(key)
        .map_err(|e| AppError::Session(format!("Session read failed for '{key}': {e}")))?
        .ok_or_else(|| AppError::Session(format!("No '{key}' in session")))
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, AppError> {
    get_string(session, "username")
}

pub fn get_role(session: &Session) -> Result<String, AppError> {
    get_string(session, "role")
}

/// One-shot flash message, consumed on read.
pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Current user id, for handlers that need an actor.
pub fn require_user(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or_else(|| AppError::Session("User not logged in".to_string()))
}

pub fn require_role(session: &Session, role: &str) -> Result<(), AppError> {
    if get_role(session)? == role {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(format!("requires role '{role}'")))
    }
}
