/// Domain Types
///
/// Users, chirps and persisted refresh tokens. Access tokens are never stored
/// and live in `auth::claims`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lifetime of a refresh token from the moment it is issued
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// A registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub hashed_password: String,
}

/// A short text post
#[derive(Debug, Clone, Serialize)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

/// Revocation state of a refresh token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revocation {
    Active,
    RevokedAt(DateTime<Utc>),
}

impl Revocation {
    pub fn from_column(revoked_at: Option<DateTime<Utc>>) -> Self {
        match revoked_at {
            Some(at) => Revocation::RevokedAt(at),
            None => Revocation::Active,
        }
    }

    pub fn to_column(self) -> Option<DateTime<Utc>> {
        match self {
            Revocation::Active => None,
            Revocation::RevokedAt(at) => Some(at),
        }
    }
}

/// A persisted, revocable refresh token
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revocation: Revocation,
}

impl RefreshToken {
    /// A fresh, active token owned by `user_id`, expiring 60 days after `now`
    pub fn new(token: String, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::days(REFRESH_TOKEN_TTL_DAYS),
            revocation: Revocation::Active,
        }
    }

    pub fn is_revoked(&self) -> bool {
        matches!(self.revocation, Revocation::RevokedAt(_))
    }

    /// Expired from the `expires_at` instant onward
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_refresh_token_is_active_for_sixty_days() {
        let now = Utc::now();
        let token = RefreshToken::new("abc".to_string(), Uuid::new_v4(), now);

        assert_eq!(token.revocation, Revocation::Active);
        assert_eq!(token.expires_at - token.created_at, Duration::days(60));
        assert!(!token.is_revoked());
        assert!(!token.is_expired_at(now));
    }

    #[test]
    fn test_refresh_token_expires_at_expiry_instant() {
        let now = Utc::now();
        let token = RefreshToken::new("abc".to_string(), Uuid::new_v4(), now);

        assert!(!token.is_expired_at(token.expires_at - Duration::seconds(1)));
        assert!(token.is_expired_at(token.expires_at));
    }

    #[test]
    fn test_revocation_is_independent_of_expiry() {
        let now = Utc::now();
        let mut token = RefreshToken::new("abc".to_string(), Uuid::new_v4(), now);
        token.revocation = Revocation::RevokedAt(now);

        assert!(token.is_revoked());
        assert!(!token.is_expired_at(now));
    }

    #[test]
    fn test_revocation_column_mapping() {
        let now = Utc::now();
        assert_eq!(Revocation::from_column(None), Revocation::Active);
        assert_eq!(Revocation::from_column(Some(now)).to_column(), Some(now));
    }
}
