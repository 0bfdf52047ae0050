/// PostgreSQL-backed [`UserRepository`]

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepositoryResult, UserRepository};
use crate::db::pool;
use crate::models::user::{CreateUser, UpdateUser, User};

/// Repository over a `sqlx` Postgres pool
///
/// Cloning is cheap; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_phone(&self, phone: &str) -> RepositoryResult<Option<User>> {
        Ok(User::find_by_phone(&self.pool, phone).await?)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        Ok(User::find_all(&self.pool).await?)
    }

    async fn create(&self, data: CreateUser) -> RepositoryResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn update(&self, id: Uuid, data: UpdateUser) -> RepositoryResult<Option<User>> {
        Ok(User::update(&self.pool, id, data).await?)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(User::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
