/// Authentication module
///
/// Handles password hashing, JWT access token generation/validation,
/// refresh token management, `Authorization` header parsing and the
/// login/refresh/revoke session flows built on top of them.

mod claims;
mod credentials;
mod extractor;
mod jwt;
mod password;
mod refresh_token;
mod session;

pub use claims::{Claims, ISSUER};
pub use credentials::{extract_api_key, extract_bearer};
pub use extractor::AuthenticatedUser;
pub use jwt::{access_token_ttl, generate_access_token, validate_access_token, ACCESS_TOKEN_TTL_SECS};
pub use password::{hash_password, verify_password};
pub use refresh_token::{
    authenticate_refresh_token, generate_refresh_token, issue_refresh_token, revoke_refresh_token,
};
pub use session::{login, refresh, revoke, LoginSession};
