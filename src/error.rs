/// Application Error Handling
///
/// This module provides a unified error handling system for the whole service.
/// It covers:
/// 1. Domain-Specific Error Types (validation, storage, authentication, configuration)
/// 2. The Unified Application Error used for control flow
/// 3. HTTP Response Mapping (`{"error": "<message>"}` envelopes)
/// 4. Structured Error Logging with Context
///
/// Authentication failures keep their precise kind internally (expired vs. revoked
/// vs. not found) for logging and tests, but are collapsed into a generic 401
/// at the HTTP boundary so callers cannot probe which condition applied.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Validation errors for input data
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(String),
    TooLong(String, usize),
    InvalidFormat(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
        }
    }
}

impl StdError for ValidationError {}

/// Storage errors raised by the persistence collaborator
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    MissingRequired(String),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(msg) => write!(f, "Missing required config: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config value: {}", msg),
        }
    }
}

impl StdError for ConfigError {}

/// Authentication and session errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Password does not match the stored digest (or the email is unknown)
    CredentialMismatch,
    /// No `Authorization` header
    TokenMissing,
    /// Header present but ill-formed, or the token itself cannot be parsed
    TokenMalformed(String),
    /// Access token signature does not verify against the secret
    TokenSignatureInvalid,
    TokenExpired,
    TokenRevoked,
    TokenNotFound,
    /// Token signing failed (internal)
    SigningFailure(String),
    /// Password hashing failed (internal)
    HashingFailure(String),
    /// Authenticated, but not allowed to perform the operation
    Forbidden(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::CredentialMismatch => write!(f, "Incorrect email or password"),
            AuthError::TokenMissing => write!(f, "Missing authorization header"),
            AuthError::TokenMalformed(reason) => write!(f, "Malformed token: {}", reason),
            AuthError::TokenSignatureInvalid => write!(f, "Token signature is invalid"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenRevoked => write!(f, "Token has been revoked"),
            AuthError::TokenNotFound => write!(f, "Token not found"),
            AuthError::SigningFailure(msg) => write!(f, "Token signing failed: {}", msg),
            AuthError::HashingFailure(msg) => write!(f, "Password hashing failed: {}", msg),
            AuthError::Forbidden(msg) => write!(f, "{}", msg),
        }
    }
}

impl StdError for AuthError {}

impl AuthError {
    /// Internal faults surface as 500, never as an authentication failure
    pub fn is_internal(&self) -> bool {
        matches!(self, AuthError::SigningFailure(_) | AuthError::HashingFailure(_))
    }
}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Database(DatabaseError),
    Auth(AuthError),
    Config(ConfigError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl AppError {
    /// The authentication kind, if this is an authentication error
    pub fn auth_kind(&self) -> Option<&AuthError> {
        match self {
            AppError::Auth(e) => Some(e),
            _ => None,
        }
    }
}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                AppError::Database(DatabaseError::NotFound("record".to_string()))
            }
            // 23505: unique_violation
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Database(DatabaseError::UniqueConstraintViolation(
                    unique_violation_message(db.constraint()).to_string(),
                ))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Database(DatabaseError::ConnectionPool(err.to_string()))
            }
            _ => AppError::Database(DatabaseError::UnexpectedError(err.to_string())),
        }
    }
}

/// Client-facing description of a unique violation, by constraint name
fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "email already registered",
        _ => "record already exists",
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(DatabaseError::UnexpectedError(err.to_string()))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(ConfigError::InvalidValue(err.to_string()))
    }
}

// ============================================================================
// 3. HTTP RESPONSE MAPPING
// ============================================================================

/// JSON error envelope returned to clients
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

const GENERIC_INTERNAL_MESSAGE: &str = "Something went wrong";
const GENERIC_UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Trait for converting errors to HTTP responses with proper logging
pub trait ErrorHandler {
    fn error_response(&self, request_id: &str) -> (StatusCode, ErrorResponse);
    fn log_error(&self, request_id: &str);
}

impl ErrorHandler for AppError {
    fn error_response(&self, _request_id: &str) -> (StatusCode, ErrorResponse) {
        let message = match self {
            AppError::Validation(e) => e.to_string(),

            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) | DatabaseError::NotFound(_) => {
                    e.to_string()
                }
                DatabaseError::ConnectionPool(_) | DatabaseError::UnexpectedError(_) => {
                    GENERIC_INTERNAL_MESSAGE.to_string()
                }
            },

            AppError::Auth(e) => match e {
                AuthError::CredentialMismatch => e.to_string(),
                AuthError::Forbidden(_) => e.to_string(),
                e if e.is_internal() => GENERIC_INTERNAL_MESSAGE.to_string(),
                // Expired, revoked, unknown, missing and malformed all look alike
                _ => GENERIC_UNAUTHORIZED_MESSAGE.to_string(),
            },

            AppError::Config(_) | AppError::Internal(_) => GENERIC_INTERNAL_MESSAGE.to_string(),
        };

        (self.status_code(), ErrorResponse::new(message))
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => {
                tracing::warn!(request_id = request_id, error = %self, "Duplicate entry attempt");
            }
            AppError::Database(DatabaseError::NotFound(_)) => {
                tracing::info!(request_id = request_id, error = %self, "Record not found");
            }
            AppError::Database(e) => {
                tracing::error!(request_id = request_id, error = %e, "Database error");
            }
            AppError::Auth(e) if e.is_internal() => {
                tracing::error!(request_id = request_id, error = %e, "Authentication internal failure");
            }
            AppError::Auth(AuthError::CredentialMismatch) => {
                tracing::warn!(request_id = request_id, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(
                    request_id = request_id,
                    error = %e,
                    kind = ?e,
                    "Authentication error"
                );
            }
            AppError::Config(e) => {
                tracing::error!(request_id = request_id, error = %e, "Configuration error");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

/// Implement ResponseError for Actix-web integration
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        let (status, error_response) = <Self as ErrorHandler>::error_response(self, &request_id);

        HttpResponse::build(status).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
                DatabaseError::NotFound(_) => StatusCode::NOT_FOUND,
                DatabaseError::ConnectionPool(_) | DatabaseError::UnexpectedError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Auth(e) => match e {
                AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
                e if e.is_internal() => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNAUTHORIZED,
            },
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// ============================================================================
// 4. ERROR CONTEXT ENRICHMENT
// ============================================================================

/// Per-request context attached to log events of a single operation
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub request_id: String,
    pub user_id: Option<String>,
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            user_id: None,
            operation: operation.into(),
        }
    }

    pub fn with_user_id(mut self, user_id: impl ToString) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn log_error(&self, error: &AppError) {
        match error {
            AppError::Auth(e) if !e.is_internal() => {
                tracing::warn!(
                    request_id = %self.request_id,
                    operation = %self.operation,
                    user_id = ?self.user_id,
                    error = %error,
                    "Authentication error"
                );
            }
            AppError::Validation(_) => {
                tracing::warn!(
                    request_id = %self.request_id,
                    operation = %self.operation,
                    user_id = ?self.user_id,
                    error = %error,
                    "Validation error"
                );
            }
            _ => {
                tracing::error!(
                    request_id = %self.request_id,
                    operation = %self.operation,
                    user_id = ?self.user_id,
                    error = %error,
                    "Operation failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(err: &AppError) -> (u16, String) {
        let (status, response) = <AppError as ErrorHandler>::error_response(err, "test");
        (status.as_u16(), response.error)
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::TooLong("Chirp".to_string(), 140);
        assert_eq!(err.to_string(), "Chirp is too long (maximum 140 characters)");
    }

    #[test]
    fn test_auth_error_conversion() {
        let app_err: AppError = AuthError::TokenRevoked.into();
        assert_eq!(app_err.auth_kind(), Some(&AuthError::TokenRevoked));
    }

    #[test]
    fn test_token_errors_collapse_to_generic_401() {
        let kinds = vec![
            AuthError::TokenMissing,
            AuthError::TokenMalformed("bad header".to_string()),
            AuthError::TokenSignatureInvalid,
            AuthError::TokenExpired,
            AuthError::TokenRevoked,
            AuthError::TokenNotFound,
        ];

        for kind in kinds {
            let (status, message) = body_of(&AppError::Auth(kind.clone()));
            assert_eq!(status, 401, "{:?} should map to 401", kind);
            assert_eq!(message, "Unauthorized", "{:?} should not leak its kind", kind);
        }
    }

    #[test]
    fn test_credential_mismatch_is_401() {
        let (status, message) = body_of(&AppError::Auth(AuthError::CredentialMismatch));
        assert_eq!(status, 401);
        assert_eq!(message, "Incorrect email or password");
    }

    #[test]
    fn test_internal_failures_hide_detail() {
        let errors = vec![
            AppError::Auth(AuthError::SigningFailure("key material".to_string())),
            AppError::Auth(AuthError::HashingFailure("cost".to_string())),
            AppError::Database(DatabaseError::UnexpectedError("syntax error at".to_string())),
            AppError::Database(DatabaseError::ConnectionPool("pool timed out".to_string())),
            AppError::from(sqlx::Error::PoolTimedOut),
            AppError::from(sqlx::Error::PoolClosed),
            AppError::Internal("lock poisoned".to_string()),
        ];

        for err in errors {
            let (status, message) = body_of(&err);
            assert_eq!(status, 500);
            assert_eq!(message, "Something went wrong");
        }
    }

    #[test]
    fn test_unique_violation_names_only_known_constraints() {
        assert_eq!(
            unique_violation_message(Some("users_email_key")),
            "email already registered"
        );
        assert_eq!(
            unique_violation_message(Some("refresh_tokens_pkey")),
            "record already exists"
        );
        assert_eq!(unique_violation_message(None), "record already exists");
    }

    #[test]
    fn test_forbidden_is_403() {
        let (status, _) = body_of(&AppError::Auth(AuthError::Forbidden("nope".to_string())));
        assert_eq!(status, 403);
    }

    #[test]
    fn test_error_context_creation() {
        let ctx = ErrorContext::new("login");
        assert_eq!(ctx.operation, "login");
        assert!(ctx.user_id.is_none());

        let ctx_with_user = ctx.with_user_id("user-123");
        assert_eq!(ctx_with_user.user_id, Some("user-123".to_string()));
    }
}
