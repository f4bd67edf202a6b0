use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Chirp, RefreshToken, Revocation, User};
use crate::error::{AppError, DatabaseError};
use crate::store::{ChirpStore, RefreshTokenStore, UserStore};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

/// Process-local store. Every method holds the lock for its whole
/// read-modify-write, so operations on one token are serialised.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, AppError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.email == email) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "email already registered".to_string(),
            )
            .into());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.read()?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, AppError> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.email == email && u.id != id) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "email already registered".to_string(),
            )
            .into());
        }

        Ok(tables.users.get_mut(&id).map(|user| {
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_all_users(&self) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        let deleted = tables.users.len() as u64;
        tables.users.clear();
        tables.chirps.clear();
        tables.refresh_tokens.clear();
        Ok(deleted)
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryStore {
    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), AppError> {
        let mut tables = self.write()?;
        if tables.refresh_tokens.contains_key(&record.token) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh token already exists".to_string(),
            )
            .into());
        }
        tables
            .refresh_tokens
            .insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AppError> {
        let tables = self.read()?;
        Ok(tables.refresh_tokens.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        match tables.refresh_tokens.get_mut(token) {
            None => Ok(false),
            Some(record) => {
                if record.revocation == Revocation::Active {
                    record.revocation = Revocation::RevokedAt(at);
                }
                record.updated_at = at;
                Ok(true)
            }
        }
    }
}

#[async_trait]
impl ChirpStore for InMemoryStore {
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, AppError> {
        let mut tables = self.write()?;
        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        tables.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, AppError> {
        let tables = self.read()?;
        // Insertion order is creation order
        Ok(tables.chirps.clone())
    }

    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, AppError> {
        let tables = self.read()?;
        Ok(tables.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        let before = tables.chirps.len();
        tables.chirps.retain(|c| c.id != id);
        Ok(tables.chirps.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        store.create_user("a@example.com", "digest").await.unwrap();

        let err = store.create_user("a@example.com", "digest").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Database(DatabaseError::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_revoked_keeps_first_timestamp() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let record = RefreshToken::new("tok".to_string(), Uuid::new_v4(), now);
        store.insert_refresh_token(&record).await.unwrap();

        assert!(store.mark_revoked("tok", now).await.unwrap());
        assert!(store
            .mark_revoked("tok", now + Duration::minutes(5))
            .await
            .unwrap());

        let stored = store.find_refresh_token("tok").await.unwrap().unwrap();
        assert_eq!(stored.revocation, Revocation::RevokedAt(now));
    }

    #[tokio::test]
    async fn test_mark_revoked_unknown_token() {
        let store = InMemoryStore::new();
        assert!(!store.mark_revoked("missing", Utc::now()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_all_users_cascades() {
        let store = InMemoryStore::new();
        let user = store.create_user("a@example.com", "digest").await.unwrap();
        store.create_chirp(user.id, "hello").await.unwrap();
        store
            .insert_refresh_token(&RefreshToken::new("tok".to_string(), user.id, Utc::now()))
            .await
            .unwrap();

        assert_eq!(store.delete_all_users().await.unwrap(), 1);
        assert!(store.list_chirps().await.unwrap().is_empty());
        assert!(store.find_refresh_token("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chirps_listed_in_creation_order() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let first = store.create_chirp(user_id, "first").await.unwrap();
        let second = store.create_chirp(user_id, "second").await.unwrap();

        let ids: Vec<Uuid> = store.list_chirps().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        assert!(store.delete_chirp(first.id).await.unwrap());
        assert!(!store.delete_chirp(first.id).await.unwrap());
    }
}
