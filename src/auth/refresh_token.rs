/// Refresh Token Management
///
/// Handles refresh token generation, storage, validation, and revocation.
/// Refresh tokens are:
/// - Cryptographically secure random 64-character strings
/// - Valid for 60 days from issue
/// - Never rotated: a refresh only mints a new access token
/// - Database-backed for revocation support
///
/// Expiry is evaluated on use and never written back; revocation is the only
/// mutation a stored token ever sees.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use uuid::Uuid;

use crate::domain::RefreshToken;
use crate::error::{AppError, AuthError};
use crate::store::RefreshTokenStore;

const REFRESH_TOKEN_LENGTH: usize = 64;

/// Generate a new cryptographically secure refresh token
///
/// Creates a 64-character random token from the base62 alphabet (~380 bits).
pub fn generate_refresh_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Issue and persist a new refresh token for `user_id`
///
/// # Errors
/// Returns error if the token cannot be stored
pub async fn issue_refresh_token<S>(store: &S, user_id: Uuid) -> Result<String, AppError>
where
    S: RefreshTokenStore + ?Sized,
{
    let token = generate_refresh_token();
    let record = RefreshToken::new(token.clone(), user_id, Utc::now());

    store.insert_refresh_token(&record).await?;

    tracing::debug!(user_id = %user_id, expires_at = %record.expires_at, "Refresh token issued");
    Ok(token)
}

/// Authenticate a refresh token
///
/// Checks, in order:
/// 1. Token exists in storage
/// 2. Token has not been revoked
/// 3. Token has not expired
///
/// # Returns
/// User ID that owns the token
///
/// # Errors
/// `TokenNotFound`, `TokenRevoked` or `TokenExpired`, or a storage error
pub async fn authenticate_refresh_token<S>(store: &S, token: &str) -> Result<Uuid, AppError>
where
    S: RefreshTokenStore + ?Sized,
{
    let record = match store.find_refresh_token(token).await? {
        None => {
            tracing::warn!("Refresh token not found");
            return Err(AuthError::TokenNotFound.into());
        }
        Some(record) => record,
    };

    if record.is_revoked() {
        tracing::warn!(user_id = %record.user_id, "Attempt to use revoked refresh token");
        return Err(AuthError::TokenRevoked.into());
    }

    if record.is_expired_at(Utc::now()) {
        tracing::info!(user_id = %record.user_id, "Refresh token expired");
        return Err(AuthError::TokenExpired.into());
    }

    Ok(record.user_id)
}

/// Revoke a refresh token
///
/// Revoking an already revoked token succeeds and leaves it revoked.
///
/// # Errors
/// `TokenNotFound` if no such token exists, or a storage error
pub async fn revoke_refresh_token<S>(store: &S, token: &str) -> Result<(), AppError>
where
    S: RefreshTokenStore + ?Sized,
{
    if !store.mark_revoked(token, Utc::now()).await? {
        tracing::warn!("Attempt to revoke unknown refresh token");
        return Err(AuthError::TokenNotFound.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Revocation;
    use crate::store::InMemoryStore;
    use chrono::Duration;

    fn auth_kind(result: Result<Uuid, AppError>) -> AuthError {
        match result {
            Err(AppError::Auth(kind)) => kind,
            other => panic!("expected an auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token();

        // Token should be 64 characters
        assert_eq!(token.len(), 64);
        // Token should be alphanumeric
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        assert_ne!(generate_refresh_token(), generate_refresh_token());
    }

    #[tokio::test]
    async fn test_issued_token_authenticates_to_owner() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();

        let token = issue_refresh_token(&store, user_id).await.unwrap();

        assert_eq!(authenticate_refresh_token(&store, &token).await.unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_issued_token_is_persisted_active() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();

        let token = issue_refresh_token(&store, user_id).await.unwrap();
        let record = store.find_refresh_token(&token).await.unwrap().unwrap();

        assert_eq!(record.user_id, user_id);
        assert_eq!(record.revocation, Revocation::Active);
        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let store = InMemoryStore::new();

        let result = authenticate_refresh_token(&store, "nope").await;

        assert_eq!(auth_kind(result), AuthError::TokenNotFound);
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let store = InMemoryStore::new();
        let token = issue_refresh_token(&store, Uuid::new_v4()).await.unwrap();

        revoke_refresh_token(&store, &token).await.unwrap();
        let result = authenticate_refresh_token(&store, &token).await;

        assert_eq!(auth_kind(result), AuthError::TokenRevoked);
    }

    #[tokio::test]
    async fn test_revocation_is_idempotent() {
        let store = InMemoryStore::new();
        let token = issue_refresh_token(&store, Uuid::new_v4()).await.unwrap();

        revoke_refresh_token(&store, &token).await.unwrap();
        let first = store.find_refresh_token(&token).await.unwrap().unwrap();

        revoke_refresh_token(&store, &token).await.unwrap();
        let second = store.find_refresh_token(&token).await.unwrap().unwrap();

        assert_eq!(first.revocation, second.revocation);
        assert_eq!(
            auth_kind(authenticate_refresh_token(&store, &token).await),
            AuthError::TokenRevoked
        );
    }

    #[tokio::test]
    async fn test_revoking_unknown_token_is_not_found() {
        let store = InMemoryStore::new();

        let result = revoke_refresh_token(&store, "nope").await;

        assert!(matches!(result, Err(AppError::Auth(AuthError::TokenNotFound))));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let store = InMemoryStore::new();
        let issued = Utc::now() - Duration::days(61);
        let record = RefreshToken::new(generate_refresh_token(), Uuid::new_v4(), issued);
        store.insert_refresh_token(&record).await.unwrap();

        let result = authenticate_refresh_token(&store, &record.token).await;

        assert_eq!(auth_kind(result), AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn test_revoked_wins_over_expired() {
        let store = InMemoryStore::new();
        let issued = Utc::now() - Duration::days(61);
        let mut record = RefreshToken::new(generate_refresh_token(), Uuid::new_v4(), issued);
        record.revocation = Revocation::RevokedAt(issued);
        store.insert_refresh_token(&record).await.unwrap();

        let result = authenticate_refresh_token(&store, &record.token).await;

        assert_eq!(auth_kind(result), AuthError::TokenRevoked);
    }

    #[tokio::test]
    async fn test_user_may_hold_several_tokens() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();

        let first = issue_refresh_token(&store, user_id).await.unwrap();
        let second = issue_refresh_token(&store, user_id).await.unwrap();
        revoke_refresh_token(&store, &first).await.unwrap();

        assert_eq!(authenticate_refresh_token(&store, &second).await.unwrap(), user_id);
    }
}
