use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::thread_rng;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("Password too short"));
    }

    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::internal(format!("Invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};
    use crate::error::AppError;

    #[test]
    fn hashes_and_verifies() {
        let hash = hash_password("correct horse").expect("hash should succeed");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).expect("verify should run"));
        assert!(!verify_password("wrong horse", &hash).expect("verify should run"));
    }

    #[test]
    fn rejects_short_passwords() {
        let err = hash_password("short").expect_err("short password should fail");
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Password too short"));
    }

    #[test]
    fn malformed_hash_is_an_internal_error() {
        let err = verify_password("whatever", "not-a-phc-string").expect_err("should fail");
        assert!(matches!(err, AppError::Internal(_)));
    }
}
