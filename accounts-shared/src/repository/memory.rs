/// In-memory [`UserRepository`]
///
/// Mirrors the Postgres schema's behavior: IDs and timestamps are assigned on
/// insert, `users_email_key` / `users_phone_key` are checked under the write
/// lock, and listing returns users in insertion order.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, UserRepository};
use crate::models::user::{CreateUser, UpdateUser, User, EMAIL_CONSTRAINT, PHONE_CONSTRAINT};

/// In-memory user store
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

/// Checks email/phone against every user except `skip`
fn check_unique(
    users: &[User],
    skip: Option<Uuid>,
    email: Option<&str>,
    phone: Option<&str>,
) -> RepositoryResult<()> {
    let others = users.iter().filter(|u| Some(u.id) != skip);

    for user in others {
        if email.is_some_and(|e| e == user.email) {
            return Err(RepositoryError::conflict(EMAIL_CONSTRAINT));
        }
        if phone.is_some_and(|p| p == user.phone) {
            return Err(RepositoryError::conflict(PHONE_CONSTRAINT));
        }
    }

    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> RepositoryResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.phone == phone).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn create(&self, data: CreateUser) -> RepositoryResult<User> {
        let mut users = self.users.write().await;

        check_unique(&users, None, Some(&data.email), Some(&data.phone))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            phone: data.phone,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };

        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> RepositoryResult<Option<User>> {
        let mut users = self.users.write().await;

        check_unique(&users, Some(id), data.email.as_deref(), data.phone.as_deref())?;

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        data.apply_to(user);
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let mut users = self.users.write().await;

        Ok(users
            .iter()
            .position(|u| u.id == id)
            .map(|index| users.remove(index)))
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
