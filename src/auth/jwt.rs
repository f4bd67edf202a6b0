/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed and stateless: validity depends only on the
/// signature and the `exp` claim checked against the local clock. There is no
/// revocation list; a leaked access token stays valid until it expires.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::AuthError;

/// Lifetime of access tokens minted at login and refresh, in seconds
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

pub fn access_token_ttl() -> Duration {
    Duration::seconds(ACCESS_TOKEN_TTL_SECS)
}

/// Generate a new access token for a user
///
/// # Arguments
/// * `user_id` - User's UUID, stored as the subject
/// * `secret` - HMAC signing secret
/// * `ttl` - Time until the token expires
///
/// # Errors
/// Returns `SigningFailure` if encoding fails
pub fn generate_access_token(
    user_id: Uuid,
    secret: &str,
    ttl: Duration,
) -> Result<String, AuthError> {
    let claims = Claims::new(user_id, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::SigningFailure(e.to_string()))
}

/// Validate an access token and return the user it was issued to
///
/// # Errors
/// - `TokenSignatureInvalid` if the signature does not verify against `secret`
/// - `TokenExpired` once the current second is past `exp`
/// - `TokenMalformed` if the token cannot be decoded, carries the wrong issuer,
///   or its subject is not a user id
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    // Local wall-clock time is trusted as-is
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        let kind = match e.kind() {
            ErrorKind::InvalidSignature => AuthError::TokenSignatureInvalid,
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenMalformed(e.to_string()),
        };
        tracing::warn!(error = %e, "JWT validation error");
        kind
    })?;

    data.claims.user_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_generate_and_validate_token() {
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id, SECRET, access_token_ttl())
            .expect("Failed to generate token");
        let validated = validate_access_token(&token, SECRET).expect("Failed to validate token");

        assert_eq!(validated, user_id);
    }

    #[test]
    fn test_expired_token() {
        let user_id = Uuid::new_v4();

        let token = generate_access_token(user_id, SECRET, Duration::seconds(-1))
            .expect("Failed to generate token");
        let result = validate_access_token(&token, SECRET);

        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_wrong_secret() {
        let token = generate_access_token(Uuid::new_v4(), SECRET, access_token_ttl())
            .expect("Failed to generate token");

        let result = validate_access_token(&token, "another-secret");

        assert_eq!(result, Err(AuthError::TokenSignatureInvalid));
    }

    #[test]
    fn test_invalid_token() {
        let result = validate_access_token("invalid.token.here", SECRET);

        assert!(matches!(result, Err(AuthError::TokenMalformed(_))));
    }

    #[test]
    fn test_tampered_token() {
        let token = generate_access_token(Uuid::new_v4(), SECRET, access_token_ttl())
            .expect("Failed to generate token");

        // Tamper with token
        let tampered = format!("{}X", token);
        let result = validate_access_token(&tampered, SECRET);

        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let mut claims = Claims::new(Uuid::new_v4(), access_token_ttl());
        claims.iss = "someone-else".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = validate_access_token(&token, SECRET);

        assert!(matches!(result, Err(AuthError::TokenMalformed(_))));
    }

    #[test]
    fn test_subject_must_be_a_user_id() {
        let mut claims = Claims::new(Uuid::new_v4(), access_token_ttl());
        claims.sub = "not-a-uuid".to_string();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = validate_access_token(&token, SECRET);

        assert!(matches!(result, Err(AuthError::TokenMalformed(_))));
    }

    #[test]
    fn test_tokens_for_same_user_differ() {
        let user_id = Uuid::new_v4();
        let first = generate_access_token(user_id, SECRET, access_token_ttl()).unwrap();
        let second = generate_access_token(user_id, SECRET, access_token_ttl()).unwrap();

        assert_ne!(first, second);
        assert_eq!(validate_access_token(&second, SECRET), Ok(user_id));
    }
}
