/// Password Hashing and Verification
///
/// Handles password hashing with bcrypt. Every hash carries its own random
/// salt, so hashing the same password twice yields two different digests.
/// Password strength policy is not enforced here; any string, including the
/// empty one, is hashed as-is.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AuthError;

/// Hash a password using bcrypt
///
/// # Errors
/// Returns `HashingFailure` only if bcrypt itself fails
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, DEFAULT_COST).map_err(|e| AuthError::HashingFailure(e.to_string()))
}

/// Verify a password against its hash
///
/// The digest comparison inside bcrypt is constant-time.
///
/// # Errors
/// Returns `CredentialMismatch` if the password does not match, or if the
/// stored digest is not a bcrypt hash at all
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    match verify(password, hash) {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::CredentialMismatch),
        Err(e) => {
            tracing::error!(error = %e, "Stored password digest could not be parsed");
            Err(AuthError::CredentialMismatch)
        }
    }
}
