use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::Claims;
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn make_access_claims(user_id: &Uuid, email: &str, ttl_secs: usize) -> Claims {
    let iat = now_unix();
    Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat,
        exp: iat + ttl_secs,
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &Claims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal(format!("Token encoding failed: {err}")))
}

pub fn decode_token(keys: &JwtKeys, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(token, &keys.dec, &validation)
        .map(|data| data.claims)
        .map_err(AppError::from)
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "token rejected");
        AppError::unauthorized("Invalid or expired token")
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{JwtKeys, decode_token, encode_token, make_access_claims, now_unix};
    use crate::{auth::Claims, error::AppError};

    #[test]
    fn makes_claims_with_expected_subject_and_ttl() {
        let user_id = Uuid::new_v4();
        let claims = make_access_claims(&user_id, "reader@example.com", 60);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "reader@example.com");
        assert_eq!(claims.exp.saturating_sub(claims.iat), 60);
    }

    #[test]
    fn encodes_token_that_decodes_with_same_secret() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_access_claims(&Uuid::new_v4(), "reader@example.com", 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        let decoded = decode_token(&keys, &token).expect("token should decode");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let claims = make_access_claims(&Uuid::new_v4(), "reader@example.com", 600);
        let token = encode_token(&JwtKeys::from_secret(b"secret-a"), &claims).expect("encode");

        let err = decode_token(&JwtKeys::from_secret(b"secret-b"), &token)
            .expect_err("signature mismatch should fail");
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let iat = now_unix() - 7200;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "reader@example.com".to_string(),
            iat,
            exp: iat + 60,
        };
        let token = encode_token(&keys, &claims).expect("token should encode");

        let err = decode_token(&keys, &token).expect_err("expired token should fail");
        assert_eq!(err.message(), "Invalid or expired token");
    }
}
