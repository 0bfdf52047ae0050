/// Authentication middleware for Axum
///
/// Extracts the `Authorization: Bearer <token>` header, validates the token
/// and inserts an [`AuthContext`] into the request extensions. Handlers pick
/// it up with `Extension<AuthContext>`.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::put, Extension, Router};
/// use accounts_shared::auth::middleware::{create_jwt_middleware, AuthContext};
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/users", put(handler))
///     .layer(middleware::from_fn(create_jwt_middleware("secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Identity of the caller, added to request extensions after authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (token subject)
    pub user_id: Uuid,
}

/// Error type for authentication middleware
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header
    #[error("token not provided")]
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    #[error("token invalid")]
    InvalidFormat,

    /// Token failed validation
    #[error("token invalid")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::InvalidToken(reason) = &self {
            tracing::debug!(reason = %reason, "Rejected bearer token");
        }

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::InvalidToken(err.to_string())
    }
}

/// Authenticates a request from its headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` if there is no usable `Authorization` header
/// - `AuthError::InvalidFormat` if the scheme is not `Bearer`
/// - `AuthError::InvalidToken` if the token does not validate against `secret`
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, secret)?;

    Ok(AuthContext { user_id: claims.sub })
}

/// JWT authentication middleware
///
/// # Errors
///
/// Returns 401 with `{"error": ...}` when [`authenticate`] fails.
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = authenticate(req.headers(), &secret)?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure capturing the secret
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
