//! Password hashing and password-reset tokens.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Hashes a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| EngineError::Validation(format!("failed to hash password: {err}")))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string.
///
/// A malformed stored hash counts as a mismatch.
pub fn verify_password(stored_hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    /// Target user id.
    sub: String,
    /// Expiry, unix seconds.
    exp: i64,
}

pub(crate) fn issue_reset_token(
    secret: &str,
    user_id: &str,
    ttl_secs: i64,
) -> ResultEngine<String> {
    let claims = ResetClaims {
        sub: user_id.to_string(),
        exp: chrono::Utc::now().timestamp() + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| EngineError::InvalidToken)
}

/// Returns the target user id of a valid token.
///
/// Every decoding failure (tampering, wrong key, expiry) collapses into the
/// one generic [`EngineError::InvalidToken`]; no detail leaks to the caller.
pub(crate) fn verify_reset_token(secret: &str, token: &str) -> ResultEngine<String> {
    let data = decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| EngineError::InvalidToken)?;
    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password(&hash, "correct horse"));
        assert!(!verify_password(&hash, "battery staple"));
    }

    #[test]
    fn verify_rejects_malformed_stored_hash() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[test]
    fn reset_token_roundtrip() {
        let token = issue_reset_token("secret", "user-1", 3600).unwrap();
        assert_eq!(verify_reset_token("secret", &token).unwrap(), "user-1");
    }

    #[test]
    fn reset_token_rejects_wrong_secret() {
        let token = issue_reset_token("secret", "user-1", 3600).unwrap();
        assert_eq!(
            verify_reset_token("other", &token),
            Err(EngineError::InvalidToken)
        );
    }

    #[test]
    fn reset_token_rejects_expired_token() {
        let token = issue_reset_token("secret", "user-1", -120).unwrap();
        assert_eq!(
            verify_reset_token("secret", &token),
            Err(EngineError::InvalidToken)
        );
    }

    #[test]
    fn reset_token_rejects_garbage() {
        assert_eq!(
            verify_reset_token("secret", "not.a.token"),
            Err(EngineError::InvalidToken)
        );
    }
}
