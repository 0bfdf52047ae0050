/// User repository access
///
/// [`UserRepository`] is the seam between request handling and storage.
/// Handlers hold an `Arc<dyn UserRepository>` so the API can run against
/// PostgreSQL in production and an in-memory store in tests.
///
/// Both backends enforce email and phone uniqueness at write time and report
/// a violation as [`RepositoryError::Conflict`]. Lookups made before a write
/// are only an early signal; the write-time check is the one that holds under
/// concurrent requests.
///
/// # Example
///
/// ```
/// use accounts_shared::models::user::CreateUser;
/// use accounts_shared::repository::{memory::InMemoryUserRepository, UserRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo = InMemoryUserRepository::new();
/// let user = repo
///     .create(CreateUser {
///         name: "Ana".to_string(),
///         email: "ana@example.com".to_string(),
///         phone: "(11) 91234-5678".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .await?;
///
/// assert!(repo.find_by_email("ana@example.com").await?.is_some());
/// assert_eq!(repo.find_by_id(user.id).await?.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::user::{CreateUser, UpdateUser, User};

pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write
    #[error("unique constraint violated: {constraint}")]
    Conflict { constraint: String },

    /// Any other storage failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl RepositoryError {
    pub(crate) fn conflict(constraint: &str) -> Self {
        RepositoryError::Conflict {
            constraint: constraint.to_string(),
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return RepositoryError::conflict(constraint);
            }
        }

        RepositoryError::Database(err)
    }
}

/// Storage operations for user accounts
///
/// Every call is a fresh round trip; implementations do not cache.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by primary key
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Finds a user by exact email
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Finds a user by exact phone
    async fn find_by_phone(&self, phone: &str) -> RepositoryResult<Option<User>>;

    /// Lists every user in creation order
    async fn find_all(&self) -> RepositoryResult<Vec<User>>;

    /// Inserts a user, assigning its ID and timestamps
    async fn create(&self, data: CreateUser) -> RepositoryResult<User>;

    /// Applies a partial update; `None` if the user does not exist
    async fn update(&self, id: Uuid, data: UpdateUser) -> RepositoryResult<Option<User>>;

    /// Hard-deletes a user, returning its last state; `None` if absent
    async fn delete(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Checks the backing store is reachable
    async fn health_check(&self) -> RepositoryResult<()>;
}
