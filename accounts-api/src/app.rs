/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use accounts_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::with_pool(pool, config);
/// let app = accounts_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use accounts_shared::{
    auth::middleware::create_jwt_middleware,
    repository::{PgUserRepository, UserRepository},
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User store
    pub users: Arc<dyn UserRepository>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state over any user store
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self {
            users,
            config: Arc::new(config),
        }
    }

    /// Creates state backed by PostgreSQL
    pub fn with_pool(pool: PgPool, config: Config) -> Self {
        Self::new(Arc::new(PgUserRepository::new(pool)), config)
    }

    /// Gets JWT secret for token validation
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET    /health       # Health check (public)
/// ├── POST   /users        # Register (public)
/// ├── GET    /users        # List (public)
/// ├── PUT    /users        # Update caller (bearer token)
/// └── DELETE /user/:id     # Delete (public)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (`PUT /users` only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/users", get(routes::users::index).post(routes::users::store))
        .route("/user", delete(routes::users::delete))
        .route("/user/:id", delete(routes::users::delete));

    // route_layer so unmatched paths still 404 instead of 401
    let protected_routes = Router::new()
        .route("/users", put(routes::users::update))
        .route_layer(middleware::from_fn(create_jwt_middleware(
            state.jwt_secret().to_string(),
        )));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
