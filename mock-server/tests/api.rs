use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Comment, Post, ReceiptVerdict, BANNED_SESSION};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, session: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = session {
        builder = builder.header("X-LC-Session", token);
    }
    builder.body(body.to_string()).unwrap()
}

async fn create_post(app: &Router, content: &str) -> Post {
    let resp = app
        .clone()
        .oneshot(json_request(
            "/api/post/create",
            Some("tok-1"),
            &json!({"content": content}).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- session ---

#[tokio::test]
async fn missing_session_returns_401() {
    let resp = app()
        .oneshot(json_request("/api/post/create", None, r#"{"content":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "unauthorized"}));
}

#[tokio::test]
async fn banned_session_returns_403_with_reason() {
    let resp = app()
        .oneshot(json_request(
            "/api/comment/create",
            Some(BANNED_SESSION),
            r#"{"content":"x","postId":"p1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"reason": "banned"}));
}

// --- posts ---

#[tokio::test]
async fn create_post_returns_201_with_extra_fields() {
    let resp = app()
        .oneshot(json_request(
            "/api/post/create",
            Some("tok-1"),
            r#"{"content":"hello","title":"first"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: Post = body_json(resp).await;
    assert_eq!(post.content, "hello");
    assert_eq!(post.author, "tok-1");
    assert_eq!(post.fields["title"], "first");
    assert!(!post.id.is_empty());
}

#[tokio::test]
async fn create_post_blank_content_returns_400() {
    let resp = app()
        .oneshot(json_request("/api/post/create", Some("tok-1"), r#"{"content":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "content is required"}));
}

// --- comments ---

#[tokio::test]
async fn create_comment_on_existing_post() {
    let app = app();
    let post = create_post(&app, "hello").await;

    let resp = app
        .oneshot(json_request(
            "/api/comment/create",
            Some("tok-2"),
            &json!({"content": "nice post", "postId": post.id}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let comment: Comment = body_json(resp).await;
    assert_eq!(comment.content, "nice post");
    assert_eq!(comment.post_id, post.id);
    assert_eq!(comment.author, "tok-2");
}

#[tokio::test]
async fn create_comment_unknown_post_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "/api/comment/create",
            Some("tok-1"),
            r#"{"content":"hi","postId":"missing"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"reason": "post not found"}));
}

#[tokio::test]
async fn create_comment_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("/api/comment/create", Some("tok-1"), r#"{"content":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- receipts ---

#[tokio::test]
async fn verify_receipt_once_then_conflict() {
    let app = app();
    let body = r#"{"username":"alice","orderId":"o-1","transactionReceipt":"jws"}"#;

    let resp = app
        .clone()
        .oneshot(json_request("/api/apple/onIapVerifyReceipt", Some("tok-1"), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let verdict: ReceiptVerdict = body_json(resp).await;
    assert!(verdict.valid);
    assert_eq!(verdict.order_id, "o-1");
    assert_eq!(verdict.username, "alice");

    let resp = app
        .oneshot(json_request("/api/apple/onIapVerifyReceipt", Some("tok-1"), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn verify_receipt_without_receipt_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "/api/apple/onIapVerifyReceipt",
            Some("tok-1"),
            r#"{"username":"alice","orderId":"o-2"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "missing transaction receipt"}));
}

// --- routing ---

#[tokio::test]
async fn get_is_not_allowed() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/post/create")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
