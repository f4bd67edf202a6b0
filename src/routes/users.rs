/// User Routes
///
/// Account creation and profile updates.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, AuthenticatedUser};
use crate::domain::User;
use crate::error::{AppError, AuthError, ErrorContext};
use crate::store::Store;
use crate::validators::is_valid_email;

/// Create or update request
#[derive(Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; never includes the password digest
#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email
/// - 409: Email already registered
/// - 500: Internal server error
pub async fn create_user(
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let user = store.create_user(&email, &hashed_password).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User created"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Replaces the caller's email and password.
/// **Requires valid JWT access token** in Authorization header.
///
/// # Errors
/// - 400: Invalid email
/// - 401: Missing or invalid token, or the user no longer exists
/// - 409: Email already taken by another user
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(user.user_id);

    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let updated = store
        .update_user(user.user_id, &email, &hashed_password)
        .await?
        .ok_or_else(|| {
            tracing::warn!(request_id = %context.request_id, "Token subject has no account");
            AuthError::TokenNotFound
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = ?context.user_id,
        "User updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
