/// User endpoints
///
/// # Endpoints
///
/// - `POST /users` - Register a user
/// - `GET /users` - List every user
/// - `PUT /users` - Update the authenticated user (bearer token)
/// - `DELETE /user/:id` - Delete a user
///
/// Uniqueness lookups made here give an early answer; the repository's
/// write-time constraint check is what actually holds under concurrent
/// requests, and both surface as `400 user already exists`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    validation::{CreateUserRequest, SchemaError, UpdateUserRequest},
};
use accounts_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body returned by create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

/// Public fields of a stored user, as listed by `GET /users`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Unwraps a JSON body, treating any rejection as a validation failure
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        ApiError::ValidationFailed
    })
}

fn validation_failed(err: SchemaError) -> ApiError {
    tracing::debug!(reason = %err, "Validation failed");
    ApiError::ValidationFailed
}

/// Runs Argon2id on the blocking pool
async fn hash_password(plaintext: String) -> ApiResult<String> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;

    Ok(hash)
}

async fn verify_password(user: &User, plaintext: String) -> ApiResult<bool> {
    let user = user.clone();
    let matches = tokio::task::spawn_blocking(move || user.check_password(&plaintext))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))??;

    Ok(matches)
}

/// Register a user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// {
///   "name": "Ana",
///   "email": "ana@example.com",
///   "phone": "(11) 91234-5678",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": "uuid",
///   "name": "Ana",
///   "email": "ana@example.com",
///   "phone": "(11) 91234-5678"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or email/phone already taken
/// - `500 Internal Server Error`: Server error
pub async fn store(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let account = json_body(payload)?.check().map_err(validation_failed)?;

    let email_taken = state.users.find_by_email(&account.email).await?.is_some();
    let phone_taken = state.users.find_by_phone(&account.phone).await?.is_some();

    if email_taken || phone_taken {
        tracing::warn!(email_taken, phone_taken, "Registration rejected, user already exists");
        return Err(ApiError::Conflict);
    }

    let password_hash = hash_password(account.password).await?;

    let user = state
        .users
        .create(CreateUser {
            name: account.name,
            email: account.email,
            phone: account.phone,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(user.into()))
}

/// Update the authenticated user
///
/// Only fields present in the body change. A new `password` is re-hashed
/// before it is stored.
///
/// # Endpoint
///
/// ```text
/// PUT /users
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "name": "Ana Maria",
///   "oldPassword": "secret1",
///   "password": "secret2",
///   "confirmPassword": "secret2"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or new email/phone already taken
/// - `401 Unauthorized`: Missing or invalid token, or `oldPassword` mismatch
/// - `404 Not Found`: The token's user no longer exists
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let req = json_body(payload)?;
    req.check().map_err(validation_failed)?;

    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(ApiError::user_not_found)?;

    if let Some(email) = req.email.as_deref().filter(|email| *email != user.email) {
        if state.users.find_by_email(email).await?.is_some() {
            tracing::warn!(user_id = %user.id, "Update rejected, email already in use");
            return Err(ApiError::Conflict);
        }
    }

    if let Some(phone) = req.phone.as_deref().filter(|phone| *phone != user.phone) {
        if state.users.find_by_phone(phone).await?.is_some() {
            tracing::warn!(user_id = %user.id, "Update rejected, phone already in use");
            return Err(ApiError::Conflict);
        }
    }

    if let Some(old_password) = req.old_password {
        if !verify_password(&user, old_password).await? {
            tracing::warn!(user_id = %user.id, "Update rejected, password mismatch");
            return Err(ApiError::password_mismatch());
        }
    }

    let password_hash = match req.password {
        Some(plaintext) => Some(hash_password(plaintext).await?),
        None => None,
    };

    let changes = UpdateUser {
        name: req.name,
        email: req.email,
        phone: req.phone,
        password_hash,
    };
    let password_changed = changes.password_hash.is_some();

    let updated = state
        .users
        .update(user.id, changes)
        .await?
        .ok_or_else(ApiError::user_not_found)?;

    tracing::info!(user_id = %updated.id, password_changed, "User updated");

    Ok(Json(updated.into()))
}

/// List every user, oldest first
///
/// ```text
/// GET /users
/// ```
pub async fn index(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = state.users.find_all().await?;

    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

/// Delete a user by ID
///
/// Also mounted without the `:id` segment, where it always answers 404.
///
/// # Endpoint
///
/// ```text
/// DELETE /user/:id
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No ID, an ID that is not a UUID, or no such user
pub async fn delete(
    State(state): State<AppState>,
    id: Option<Path<String>>,
) -> ApiResult<Json<UserSummary>> {
    let id = id
        .and_then(|Path(raw)| Uuid::parse_str(&raw).ok())
        .ok_or_else(ApiError::user_not_found)?;

    let user = state
        .users
        .delete(id)
        .await?
        .ok_or_else(ApiError::user_not_found)?;

    tracing::info!(user_id = %user.id, "User deleted");

    Ok(Json(user.into()))
}
