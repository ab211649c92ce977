use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use complaint_portal::api::server::{AppState, build_router};
use complaint_portal::db::repo::Store;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

// ─── Test helpers ───────────────────────────────────────────────────────

async fn test_app() -> Router {
    let store = Store::in_memory().await.unwrap();
    build_router(Arc::new(AppState::new(store)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, name: &str, email: &str) -> Value {
    let (status, user) = send(
        app,
        post_json("/register", json!({ "name": name, "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    user
}

async fn submit(app: &Router, user_id: &Value, title: &str) -> Value {
    let (status, complaint) = send(
        app,
        post_json(
            "/submitComplaint",
            json!({ "title": title, "summary": "s", "rating": 3, "userId": user_id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    complaint
}

// ─── Users ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_returns_secret_code() {
    let app = test_app().await;
    let user = register(&app, "A", "a@x.com").await;

    let code = user["secretCode"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(user["name"], "A");
    assert_eq!(user["email"], "a@x.com");
    assert_eq!(user["complaints"], json!([]));
    assert!(user["id"].as_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn test_register_malformed_body() {
    let app = test_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, post_json("/register", json!({ "name": "A" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login() {
    let app = test_app().await;
    let user = register(&app, "A", "a@x.com").await;
    let code = user["secretCode"].as_str().unwrap();

    let (status, logged_in) = send(&app, get(&format!("/login?secretCode={code}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in, user);

    let (status, _) = send(&app, get("/login?secretCode=1234567")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/login")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Complaints ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_submit_updates_back_reference() {
    let app = test_app().await;
    let user = register(&app, "A", "a@x.com").await;
    let complaint = submit(&app, &user["id"], "T").await;

    assert_eq!(complaint["resolved"], false);
    assert_eq!(complaint["userId"], user["id"]);

    let code = user["secretCode"].as_str().unwrap();
    let (_, refreshed) = send(&app, get(&format!("/login?secretCode={code}"))).await;
    assert_eq!(refreshed["complaints"], json!([complaint["id"]]));
}

#[tokio::test]
async fn test_submit_for_unknown_user() {
    let app = test_app().await;
    let ghost = json!(Uuid::new_v4());

    let complaint = submit(&app, &ghost, "orphan").await;
    assert_eq!(complaint["userId"], ghost);
}

#[tokio::test]
async fn test_submit_malformed_body() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        post_json(
            "/submitComplaint",
            json!({ "title": "T", "summary": "s", "rating": 3, "userId": "nope" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post_json(
            "/submitComplaint",
            json!({ "title": "T", "summary": "s", "rating": "high", "userId": Uuid::new_v4() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_for_user_and_admin() {
    let app = test_app().await;
    let alice = register(&app, "alice", "alice@x.com").await;
    let bob = register(&app, "bob", "bob@x.com").await;

    let first = submit(&app, &alice["id"], "one").await;
    submit(&app, &bob["id"], "two").await;

    let code = alice["secretCode"].as_str().unwrap();
    let (status, mine) = send(
        &app,
        get(&format!("/getAllComplaintsForUser?secretCode={code}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine, json!([first]));

    let (status, all) = send(&app, get("/getAllComplaintsForAdmin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, get("/getAllComplaintsForUser?secretCode=x")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_listing_empty() {
    let app = test_app().await;

    let (status, all) = send(&app, get("/getAllComplaintsForAdmin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_view_errors() {
    let app = test_app().await;

    let (status, _) = send(&app, get("/viewComplaint?complaintId=zzz")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/viewComplaint")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = Uuid::new_v4();
    let (status, _) = send(&app, get(&format!("/viewComplaint?complaintId={missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resolve_errors() {
    let app = test_app().await;

    let (status, _) = send(&app, post_empty("/resolveComplaint?complaintId=zzz")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = Uuid::new_v4();
    let (status, _) = send(
        &app,
        post_empty(&format!("/resolveComplaint?complaintId={missing}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_to_end_resolution() {
    let app = test_app().await;
    let user = register(&app, "A", "a@x.com").await;
    let code = user["secretCode"].as_str().unwrap().to_string();

    submit(&app, &user["id"], "T").await;

    let (_, listed) = send(
        &app,
        get(&format!("/getAllComplaintsForUser?secretCode={code}")),
    )
    .await;
    let listed = listed.as_array().unwrap().clone();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["resolved"], false);

    let id = listed[0]["id"].as_str().unwrap().to_string();
    for _ in 0..2 {
        let (status, resolved) = send(
            &app,
            post_empty(&format!("/resolveComplaint?complaintId={id}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resolved["resolved"], true);
    }

    let (status, viewed) = send(&app, get(&format!("/viewComplaint?complaintId={id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(viewed["resolved"], true);
    assert_eq!(viewed["title"], "T");
}
