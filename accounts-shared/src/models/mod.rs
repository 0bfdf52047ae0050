/// Database models
///
/// - `user`: User accounts with email/phone uniqueness
///
/// # Example
///
/// ```no_run
/// use accounts_shared::models::user::{CreateUser, User};
/// use accounts_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::with_url("postgresql://localhost/accounts")).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: "Ana".to_string(),
///         email: "ana@example.com".to_string(),
///         phone: "(11) 91234-5678".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod user;
