/// Session Flows
///
/// Login, refresh and revoke, composed from the password hasher, the access
/// token issuer and the refresh token lifecycle.
///
/// - Login mints both tokens or neither.
/// - Refresh renews only the access token; the refresh token is not rotated.
/// - Revoke kills the refresh token only. Access tokens already handed out stay
///   valid until they expire.

use actix_web::http::header::HeaderMap;
use uuid::Uuid;

use crate::auth::credentials::extract_bearer;
use crate::auth::jwt::{access_token_ttl, generate_access_token};
use crate::auth::password::verify_password;
use crate::auth::refresh_token::{
    authenticate_refresh_token, issue_refresh_token, revoke_refresh_token,
};
use crate::domain::User;
use crate::error::{AppError, AuthError};
use crate::store::{RefreshTokenStore, UserStore};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Verify credentials and open a session
///
/// An unknown email and a wrong password both fail with `CredentialMismatch`.
/// If the refresh token cannot be persisted the whole login fails and the
/// already signed access token is dropped.
pub async fn login<S>(
    store: &S,
    secret: &str,
    email: &str,
    password: &str,
) -> Result<LoginSession, AppError>
where
    S: UserStore + RefreshTokenStore + ?Sized,
{
    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or(AuthError::CredentialMismatch)?;

    verify_password(password, &user.hashed_password)?;

    let access_token = generate_access_token(user.id, secret, access_token_ttl())?;
    let refresh_token = issue_refresh_token(store, user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginSession {
        user,
        access_token,
        refresh_token,
    })
}

/// Mint a new access token from the refresh token in `Authorization: Bearer`
///
/// Returns the new access token and the user it was issued to.
pub async fn refresh<S>(
    store: &S,
    secret: &str,
    headers: &HeaderMap,
) -> Result<(String, Uuid), AppError>
where
    S: UserStore + RefreshTokenStore + ?Sized,
{
    let refresh_token = extract_bearer(headers)?;
    let user_id = authenticate_refresh_token(store, &refresh_token).await?;

    // Tokens cascade with their owner, so this only trips on a concurrent reset
    if store.find_user_by_id(user_id).await?.is_none() {
        tracing::warn!(user_id = %user_id, "Refresh token owner no longer exists");
        return Err(AuthError::TokenNotFound.into());
    }

    let access_token = generate_access_token(user_id, secret, access_token_ttl())?;

    tracing::info!(user_id = %user_id, "Access token refreshed");
    Ok((access_token, user_id))
}

/// Revoke the refresh token in `Authorization: Bearer`
pub async fn revoke<S>(store: &S, headers: &HeaderMap) -> Result<(), AppError>
where
    S: RefreshTokenStore + ?Sized,
{
    let refresh_token = extract_bearer(headers)?;
    revoke_refresh_token(store, &refresh_token).await?;

    tracing::info!("Refresh token revoked");
    Ok(())
}
