/// Session Routes
///
/// Handles login, access token refresh and refresh token revocation.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::configuration::JwtSettings;
use crate::error::{AppError, ErrorContext};
use crate::store::Store;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

/// Freshly minted access token
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/login
///
/// Authenticate user with email and password.
/// Returns an access token (1 hour) and a refresh token (60 days).
///
/// # Errors
/// - 401: Invalid credentials (email not found or wrong password)
/// - 500: Internal server error
///
/// # Security Notes
/// - Uses same error message for "not found" and "wrong password"
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn Store>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let session = auth::login(
        store.get_ref(),
        &jwt_config.secret,
        form.email.trim(),
        &form.password,
    )
    .await
    .map_err(|error| {
        context.log_error(&error);
        error
    })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %session.user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        id: session.user.id.to_string(),
        created_at: session.user.created_at,
        updated_at: session.user.updated_at,
        email: session.user.email,
        token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Mint a new access token from the refresh token sent as
/// `Authorization: Bearer <refresh_token>`. The refresh token is not rotated.
///
/// # Errors
/// - 401: Missing, malformed, unknown, revoked or expired refresh token
/// - 500: Internal server error
pub async fn refresh(
    req: HttpRequest,
    store: web::Data<dyn Store>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let (token, user_id) = auth::refresh(store.get_ref(), &jwt_config.secret, req.headers())
        .await
        .map_err(|error| {
            context.log_error(&error);
            error
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "Token refreshed successfully"
    );

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// POST /api/revoke
///
/// Revoke the refresh token sent as `Authorization: Bearer <refresh_token>`.
/// Access tokens already issued stay valid until they expire.
///
/// # Errors
/// - 401: Missing, malformed or unknown refresh token
/// - 500: Internal server error
pub async fn revoke(
    req: HttpRequest,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    auth::revoke(store.get_ref(), req.headers())
        .await
        .map_err(|error| {
            context.log_error(&error);
            error
        })?;

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");

    Ok(HttpResponse::NoContent().finish())
}
