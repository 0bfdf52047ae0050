/// Integration tests for the user endpoints
///
/// Drives the full router (auth layer, handlers, error mapping) over the
/// in-memory user store.

mod common;

use accounts_shared::repository::UserRepository;
use axum::http::{Method, StatusCode};
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

const PHONE_A: &str = "(11) 91234-5678";
const PHONE_B: &str = "(21) 3456-7890";

#[tokio::test]
async fn test_create_user() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post(
            "/users",
            json!({
                "name": "A",
                "email": "a@x.com",
                "phone": PHONE_A,
                "password": "secret1"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "A");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["phone"], PHONE_A);
    assert!(body["id"].as_str().unwrap().parse::<Uuid>().is_ok());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let stored = ctx.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "secret1");
    assert!(stored.check_password("secret1").unwrap());
}

#[tokio::test]
async fn test_create_duplicate_email() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", PHONE_A, "secret1").await;

    let (status, body) = ctx
        .post(
            "/users",
            json!({
                "name": "B",
                "email": "a@x.com",
                "phone": PHONE_B,
                "password": "secret1"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "user already exists" }));
    assert_eq!(ctx.users.len().await, 1);
}

#[tokio::test]
async fn test_create_duplicate_phone() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", PHONE_A, "secret1").await;

    let (status, body) = ctx
        .post(
            "/users",
            json!({
                "name": "B",
                "email": "b@x.com",
                "phone": PHONE_A,
                "password": "secret1"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user already exists");
}

#[tokio::test]
async fn test_create_validation_failures() {
    let ctx = TestContext::new();

    let payloads = [
        json!({ "email": "a@x.com", "phone": PHONE_A, "password": "secret1" }),
        json!({ "name": "A", "email": "not-an-email", "phone": PHONE_A, "password": "secret1" }),
        json!({ "name": "A", "email": "a@x.com", "phone": "11 91234-5678", "password": "secret1" }),
        json!({ "name": "A", "email": "a@x.com", "phone": "(11) 123-5678", "password": "secret1" }),
        json!({ "name": "A", "email": "a@x.com", "phone": PHONE_A, "password": "12345" }),
        json!({ "name": 5, "email": "a@x.com", "phone": PHONE_A, "password": "secret1" }),
        json!([]),
    ];

    for payload in payloads {
        let (status, body) = ctx.post("/users", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {} should fail", payload);
        assert_eq!(body, json!({ "error": "validation failed" }));
    }

    assert!(ctx.users.is_empty().await);
}

#[tokio::test]
async fn test_create_without_body_is_validation_failure() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send(Method::POST, "/users", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation failed");
}

#[tokio::test]
async fn test_index_lists_public_fields() {
    let ctx = TestContext::new();
    let a = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let b = ctx.register("b@x.com", PHONE_B, "secret1").await;

    let (status, body) = ctx.get("/users").await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], a.to_string());
    assert_eq!(users[1]["id"], b.to_string());

    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());
        assert!(user.get("createdAt").is_some());
        assert!(user.get("updatedAt").is_some());
    }
}

#[tokio::test]
async fn test_index_empty() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/users").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_user() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;

    let (status, body) = ctx.delete(&format!("/user/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("password_hash").is_none());
    assert!(ctx.users.is_empty().await);

    let (status, body) = ctx.delete(&format!("/user/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn test_delete_unknown_or_malformed_id() {
    let ctx = TestContext::new();

    for uri in [
        format!("/user/{}", Uuid::new_v4()),
        "/user/not-a-uuid".to_string(),
        "/user/42".to_string(),
        "/user".to_string(),
    ] {
        let (status, body) = ctx.delete(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} should be 404", uri);
        assert_eq!(body, json!({ "error": "user not found" }));
    }
}

#[tokio::test]
async fn test_update_requires_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx.put("/users", None, json!({ "name": "B" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token not provided");

    let (status, body) = ctx
        .put("/users", Some("Bearer not.a.jwt"), json!({ "name": "B" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token invalid");

    let (status, _) = ctx.put("/users", Some("Basic abc"), json!({ "name": "B" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_name() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let auth = ctx.auth_header(id);

    let (status, body) = ctx.put("/users", Some(&auth), json!({ "name": "Renamed" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": id.to_string(), "name": "Renamed", "email": "a@x.com", "phone": PHONE_A })
    );
}

#[tokio::test]
async fn test_update_password() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let auth = ctx.auth_header(id);

    let (status, body) = ctx
        .put(
            "/users",
            Some(&auth),
            json!({
                "oldPassword": "secret1",
                "password": "secret2",
                "confirmPassword": "secret2"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body.get("password").is_none());

    let stored = ctx.users.find_by_id(id).await.unwrap().unwrap();
    assert!(stored.check_password("secret2").unwrap());
    assert!(!stored.check_password("secret1").unwrap());
}

#[tokio::test]
async fn test_update_wrong_old_password() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let auth = ctx.auth_header(id);

    let (status, body) = ctx
        .put(
            "/users",
            Some(&auth),
            json!({
                "oldPassword": "wrong-password",
                "password": "secret2",
                "confirmPassword": "secret2"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "password mismatch" }));

    let stored = ctx.users.find_by_id(id).await.unwrap().unwrap();
    assert!(stored.check_password("secret1").unwrap());
}

#[tokio::test]
async fn test_update_validation_rules() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let auth = ctx.auth_header(id);

    let payloads = [
        json!({ "oldPassword": "secret1" }),
        json!({ "oldPassword": "secret1", "password": "secret2", "confirmPassword": "secret3" }),
        json!({ "password": "secret2" }),
        json!({ "oldPhone": PHONE_A }),
        json!({ "oldPhone": PHONE_A, "phone": PHONE_B }),
        json!({ "email": "nope" }),
        json!({ "phone": "12345" }),
    ];

    for payload in payloads {
        let (status, body) = ctx.put("/users", Some(&auth), payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {} should fail", payload);
        assert_eq!(body["error"], "validation failed");
    }
}

#[tokio::test]
async fn test_update_email_taken() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", PHONE_A, "secret1").await;
    let b = ctx.register("b@x.com", PHONE_B, "secret1").await;
    let auth = ctx.auth_header(b);

    let (status, body) = ctx.put("/users", Some(&auth), json!({ "email": "a@x.com" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user already exists");
}

#[tokio::test]
async fn test_update_phone_taken() {
    let ctx = TestContext::new();
    ctx.register("a@x.com", PHONE_A, "secret1").await;
    let b = ctx.register("b@x.com", PHONE_B, "secret1").await;
    let auth = ctx.auth_header(b);

    let (status, body) = ctx.put("/users", Some(&auth), json!({ "phone": PHONE_A })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "user already exists");
}

#[tokio::test]
async fn test_update_keeping_own_email_and_phone() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let auth = ctx.auth_header(id);

    let (status, body) = ctx
        .put(
            "/users",
            Some(&auth),
            json!({ "email": "a@x.com", "oldPhone": PHONE_A, "phone": PHONE_A }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["phone"], PHONE_A);
}

#[tokio::test]
async fn test_update_changes_phone() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let auth = ctx.auth_header(id);

    let (status, body) = ctx.put("/users", Some(&auth), json!({ "phone": PHONE_B })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], PHONE_B);
    assert!(ctx.users.find_by_phone(PHONE_A).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_deleted_user() {
    let ctx = TestContext::new();
    let id = ctx.register("a@x.com", PHONE_A, "secret1").await;
    let auth = ctx.auth_header(id);

    let (status, _) = ctx.delete(&format!("/user/{}", id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.put("/users", Some(&auth), json!({ "name": "Ghost" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();

    let (status, _) = ctx.send(Method::POST, "/sessions", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
