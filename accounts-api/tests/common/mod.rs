//! Common test utilities for integration tests
//!
//! - Router over an in-memory user store
//! - JWT token generation
//! - Request helpers returning `(status, json body)`

#![allow(dead_code)]

use accounts_api::app::{build_router, AppState};
use accounts_api::config::Config;
use accounts_shared::auth::jwt::{create_token, Claims};
use accounts_shared::repository::{InMemoryUserRepository, UserRepository};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub users: InMemoryUserRepository,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with an empty store
    pub fn new() -> Self {
        let users = InMemoryUserRepository::new();
        Self::build(users.clone(), Arc::new(users))
    }

    /// Creates a context whose router talks to `store`
    ///
    /// `users` is left empty and unconnected to the router.
    pub fn with_store(store: Arc<dyn UserRepository>) -> Self {
        Self::build(InMemoryUserRepository::new(), store)
    }

    fn build(users: InMemoryUserRepository, store: Arc<dyn UserRepository>) -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgresql://unused/accounts".to_string()),
            "JWT_SECRET" => Some(JWT_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let app = build_router(AppState::new(store, config.clone()));

        TestContext { users, app, config }
    }

    /// Returns an authorization header value for `user_id`
    pub fn auth_header(&self, user_id: Uuid) -> String {
        let token = create_token(&Claims::new(user_id), &self.config.jwt.secret)
            .expect("token creation");
        format!("Bearer {}", token)
    }

    /// Sends a request and decodes the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn put(&self, uri: &str, auth: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, auth, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None, None).await
    }

    /// Registers a user through the API and returns its ID
    pub async fn register(&self, email: &str, phone: &str, password: &str) -> Uuid {
        let (status, body) = self
            .post(
                "/users",
                json!({
                    "name": "Test User",
                    "email": email,
                    "phone": phone,
                    "password": password
                }),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }
}
