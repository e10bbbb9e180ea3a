use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::AppError;

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(AppError::Password)
}

/// Check a password against a stored hash. A hash that fails to parse counts
/// as a mismatch; the account is unusable either way.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash failed to parse: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("Zonnekap-77").unwrap();
        assert!(verify_password("Zonnekap-77", &hash));
        assert!(!verify_password("zonnekap-77", &hash));
    }

    #[test]
    fn unparseable_hash_is_a_mismatch() {
        assert!(!verify_password("whatever", "not-a-phc-string"));
    }
}
