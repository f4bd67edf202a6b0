/// Access Token Extractor
///
/// Handlers that take an `AuthenticatedUser` argument only run when the request
/// carries `Authorization: Bearer <access token>` signed with the configured
/// secret. Rejections go through `AppError`, so they render as the usual JSON
/// error envelope.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::credentials::extract_bearer;
use crate::auth::jwt::validate_access_token;
use crate::configuration::JwtSettings;
use crate::error::{AppError, ConfigError};

/// Identity proven by a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let jwt_config = req.app_data::<web::Data<JwtSettings>>().ok_or_else(|| {
        AppError::Config(ConfigError::MissingRequired(
            "JWT settings are not registered with the app".to_string(),
        ))
    })?;

    let token = extract_bearer(req.headers())?;
    let user_id = validate_access_token(&token, &jwt_config.secret)?;

    tracing::debug!(user_id = %user_id, "Access token validated");
    Ok(AuthenticatedUser { user_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{access_token_ttl, generate_access_token};
    use crate::error::AuthError;
    use actix_web::test::TestRequest;

    fn jwt_settings() -> web::Data<JwtSettings> {
        web::Data::new(JwtSettings {
            secret: "extractor-secret".to_string(),
        })
    }

    #[actix_web::test]
    async fn test_valid_access_token_is_accepted() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "extractor-secret", access_token_ttl()).unwrap();
        let req = TestRequest::default()
            .app_data(jwt_settings())
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        let user = AuthenticatedUser::extract(&req).await.unwrap();

        assert_eq!(user.user_id, user_id);
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let req = TestRequest::default()
            .app_data(jwt_settings())
            .to_http_request();

        let err = AuthenticatedUser::extract(&req).await.unwrap_err();

        assert_eq!(err.auth_kind(), Some(&AuthError::TokenMissing));
    }

    #[actix_web::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let token = generate_access_token(Uuid::new_v4(), "other-secret", access_token_ttl()).unwrap();
        let req = TestRequest::default()
            .app_data(jwt_settings())
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_http_request();

        let err = AuthenticatedUser::extract(&req).await.unwrap_err();

        assert_eq!(err.auth_kind(), Some(&AuthError::TokenSignatureInvalid));
    }
}
