/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     phone VARCHAR(20) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_email_key UNIQUE (email),
///     CONSTRAINT users_phone_key UNIQUE (phone)
/// );
/// ```
///
/// Email and phone are compared exactly as stored; the unique constraints
/// are the authoritative guard against duplicates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{self, PasswordError};

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, created_at, updated_at";

/// Unique constraint on `users.email`
pub const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Unique constraint on `users.phone`
pub const PHONE_CONSTRAINT: &str = "users_phone_key";

/// A user account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4), assigned by the database
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Phone in `(DD) DDDD-DDDD` or `(DD) DDDDD-DDDD` form, unique across all users
    pub phone: String,

    /// Argon2id password hash
    ///
    /// Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub phone: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

/// Input for a partial update
///
/// Only `Some` fields are written; everything else keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// Applies the present fields to `user` in memory
    ///
    /// Does not touch `updated_at`; the caller owns the clock.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone = phone.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            user.password_hash = password_hash.clone();
        }
    }
}

impl User {
    /// Checks a plaintext password against the stored hash
    ///
    /// # Errors
    ///
    /// Returns an error only if the stored hash is unreadable.
    pub fn check_password(&self, plaintext: &str) -> Result<bool, PasswordError> {
        password::verify_password(plaintext, &self.password_hash)
    }

    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a database error carrying [`EMAIL_CONSTRAINT`] or
    /// [`PHONE_CONSTRAINT`] when the email or phone is already taken.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, phone, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by primary key
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by exact email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by exact phone
    pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(phone)
            .fetch_optional(pool)
            .await
    }

    /// Lists every user, oldest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC");

        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Applies a partial update and bumps `updated_at`
    ///
    /// Returns `None` if no user has this ID.
    ///
    /// # Errors
    ///
    /// Same constraint errors as [`User::create`] when the new email or phone
    /// belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // NULL parameters leave the column untouched
        let query = format!(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 phone = COALESCE($4, phone), \
                 password_hash = COALESCE($5, password_hash), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.name)
            .bind(data.email)
            .bind(data.phone)
            .bind(data.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Hard-deletes a user and returns the removed row
    ///
    /// Returns `None` if no user has this ID.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
