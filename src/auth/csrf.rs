use actix_session::Session;
use rand::RngCore;

use crate::errors::AppError;

const SESSION_KEY: &str = "csrf_token";

/// The session's CSRF token, minting a fresh one on first use.
pub fn token_for(session: &Session) -> String {
    if let Ok(Some(token)) = session.get::<String>(SESSION_KEY) {
        return token;
    }
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let token = hex::encode(bytes);
    let _ = session.insert(SESSION_KEY, &token);
    token
}

/// Compare a submitted token against the session's, in constant time.
pub fn verify(session: &Session, submitted: &str) -> Result<(), AppError> {
    let stored = session.get::<String>(SESSION_KEY).unwrap_or(None).unwrap_or_default();
    if stored.is_empty() || !eq_constant_time(stored.as_bytes(), submitted.as_bytes()) {
        return Err(AppError::Csrf);
    }
    Ok(())
}

fn eq_constant_time(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
