/// Persistence Layer
///
/// The session core talks to storage only through these traits. `PgStore` is the
/// relational store of record; `InMemoryStore` backs tests and local runs.
///
/// Implementations must make each method atomic with respect to a single row:
/// a `mark_revoked` racing an `find_refresh_token` on the same token resolves to
/// one order or the other, never to a torn record.

mod memory;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Chirp, RefreshToken, User};
use crate::error::AppError;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::UniqueConstraintViolation` on a duplicate email
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, AppError>;

    /// Removes every user together with their chirps and refresh tokens
    async fn delete_all_users(&self) -> Result<u64, AppError>;
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), AppError>;

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError>;

    /// Returns `false` when no such token exists. An already revoked token keeps
    /// its original `revoked_at`.
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError>;

    /// All chirps, oldest first
    async fn list_chirps(&self) -> Result<Vec<Chirp>, AppError>;

    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError>;

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Everything the HTTP layer needs from storage
pub trait Store: UserStore + RefreshTokenStore + ChirpStore {}

impl<T> Store for T where T: UserStore + RefreshTokenStore + ChirpStore {}
