use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use rust_forum::config::{
    env::Settings,
    init::{AppState, Stores},
    routes::config_routes,
};
use rust_forum::dao::traits::SessionStore;
use rust_forum::model::session::Session;
use rust_forum::types::error::{Error, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn settings() -> Settings {
    Settings::from_lookup(|key| match key {
        "STORAGE" => Some("memory".into()),
        "SECRET" => Some("integration-secret".into()),
        _ => None,
    })
    .unwrap()
}

fn app() -> Router {
    config_routes(AppState::new(Stores::in_memory(), &settings()))
}

/// Session store whose backend is unreachable.
struct UnreachableSessionStore;

#[async_trait]
impl SessionStore for UnreachableSessionStore {
    async fn create(&self, _: &Session, _: i64) -> Result<()> {
        Err(Error::Store(anyhow::anyhow!("connection refused")))
    }

    async fn get(&self, _: &str) -> Result<Option<Session>> {
        Err(Error::Store(anyhow::anyhow!("connection refused")))
    }
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(app: &Router, username: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({"username": username, "password": "secret-pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn create_post(app: &Router, token: &str) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/posts",
        Some(token),
        Some(json!({"type": "text", "title": "hello", "category": "music", "text": "first post"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn register_login_and_duplicates() {
    let app = app();
    register(&app, "alice").await;

    let creds = json!({"username": "alice", "password": "secret-pw"});
    let (status, body) = call(&app, Method::POST, "/api/login", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, _) = call(&app, Method::POST, "/api/register", None, Some(creds)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let wrong = json!({"username": "alice", "password": "nope"});
    let (status, _) = call(&app, Method::POST, "/api/login", None, Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let bad = json!({"username": "a b", "password": "x"});
    let (status, body) = call(&app, Method::POST, "/api/register", None, Some(bad)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"].is_array());
}

#[tokio::test]
async fn post_lifecycle() {
    let app = app();
    let alice = register(&app, "alice").await;
    let bob = register(&app, "bob").await;

    let created = create_post(&app, &alice).await;
    assert_eq!(created["score"], 1);
    assert_eq!(created["upvotePercentage"], 100);
    assert_eq!(created["author"]["username"], "alice");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, post) = call(&app, Method::GET, &format!("/api/post/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["views"], 1);

    let (status, post) = call(&app, Method::GET, &format!("/api/post/{}/downvote", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["score"], 0);
    assert_eq!(post["upvotePercentage"], 50);

    let (status, _) = call(&app, Method::GET, &format!("/api/post/{}/sidevote", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, post) = call(
        &app,
        Method::POST,
        &format!("/api/post/{}", id),
        Some(&bob),
        Some(json!({"comment": "nice"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = post["comments"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/post/{}/{}", id, comment_id);
    let (status, _) = call(&app, Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, post) = call(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["comments"], json!([]));

    let (_, listed) = call(&app, Method::GET, "/api/posts/music", None, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    let (_, by_user) = call(&app, Method::GET, "/api/user/bob", None, None).await;
    assert_eq!(by_user, json!([]));

    let (status, _) = call(&app, Method::DELETE, &format!("/api/post/{}", id), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = call(&app, Method::DELETE, &format!("/api/post/{}", id), Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "success");

    let (_, all) = call(&app, Method::GET, "/api/posts/", None, None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn guarded_routes_need_a_valid_token() {
    let app = app();
    let body = json!({"type": "text", "title": "t", "category": "c", "text": "x"});
    let (status, _) = call(&app, Method::POST, "/api/posts", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, Method::POST, "/api/posts", Some("not.a.token"), Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn lowercase_bearer_scheme_is_accepted() {
    let app = app();
    let token = register(&app, "dave").await;
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/posts")
        .header(header::AUTHORIZATION, format!("bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"type": "text", "title": "t", "category": "c", "text": "x"}).to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn session_backend_outage_is_a_server_error() {
    let token = register(&app(), "erin").await;

    let mut stores = Stores::in_memory();
    stores.session_store = Arc::new(UnreachableSessionStore);
    let broken = config_routes(AppState::new(stores, &settings()));

    let body = json!({"type": "text", "title": "t", "category": "c", "text": "x"});
    let (status, body) = call(&broken, Method::POST, "/api/posts", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/post/not-an-id", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no post found");
}

#[tokio::test]
async fn link_posts_need_a_url() {
    let app = app();
    let token = register(&app, "carol").await;
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({"type": "link", "title": "t", "category": "news"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
