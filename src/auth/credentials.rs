/// Authorization Header Parsing
///
/// Pulls raw credentials out of `Authorization: <Scheme> <value>`. The header
/// must split on single spaces into exactly two parts with the scheme spelled
/// exactly as expected; `bearer x`, `Bearer  x` and `Bearer x y` are all
/// rejected as malformed.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from `Authorization: Bearer <token>`
///
/// # Errors
/// - `TokenMissing` if there is no (or an empty) `Authorization` header
/// - `TokenMalformed` if the header is not exactly `Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_scheme(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
///
/// # Errors
/// - `TokenMissing` if there is no (or an empty) `Authorization` header
/// - `TokenMalformed` if the header is not exactly `ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_scheme(headers, API_KEY_SCHEME)
}

fn extract_scheme(headers: &HeaderMap, scheme: &str) -> Result<String, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        None => return Err(AuthError::TokenMissing),
        Some(value) if value.is_empty() => return Err(AuthError::TokenMissing),
        Some(value) => value.to_str().map_err(|_| {
            AuthError::TokenMalformed("authorization header is not visible ASCII".to_string())
        })?,
    };

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [found, token] if *found == scheme && !token.is_empty() => Ok(token.to_string()),
        _ => Err(AuthError::TokenMalformed(format!(
            "expected `{} <token>`",
            scheme
        ))),
    }
}
