use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const SESSION_HEADER: &str = "x-lc-session";
/// Sessions with this token are refused with `{"reason":"banned"}`.
pub const BANNED_SESSION: &str = "banned-session";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct CreatePost {
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub post_id: String,
    pub author: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    #[serde(default)]
    pub content: String,
    pub post_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReceipt {
    pub username: String,
    pub order_id: String,
    #[serde(default)]
    pub transaction_receipt: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptVerdict {
    pub valid: bool,
    pub order_id: String,
    pub username: String,
}

#[derive(Clone, Default)]
pub struct AppState {
    posts: Arc<RwLock<HashMap<String, Post>>>,
    verified_orders: Arc<RwLock<HashSet<String>>>,
}

type Rejection = (StatusCode, Json<Value>);
type ApiResult<T> = Result<(StatusCode, Json<T>), Rejection>;

pub fn app() -> Router {
    Router::new()
        .route("/api/post/create", post(create_post))
        .route("/api/comment/create", post(create_comment))
        .route("/api/apple/onIapVerifyReceipt", post(verify_receipt))
        .with_state(AppState::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn reject(status: StatusCode, body: Value) -> Rejection {
    (status, Json(body))
}

/// Resolve the caller's session from the request headers.
fn session(headers: &HeaderMap) -> Result<String, Rejection> {
    let token = headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, json!({"error": "unauthorized"})))?;
    if token == BANNED_SESSION {
        return Err(reject(StatusCode::FORBIDDEN, json!({"reason": "banned"})));
    }
    Ok(token.to_string())
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreatePost>,
) -> ApiResult<Post> {
    let author = session(&headers)?;
    if input.content.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, json!({"error": "content is required"})));
    }
    let post = Post {
        id: Uuid::new_v4().to_string(),
        content: input.content,
        author,
        fields: input.fields,
    };
    info!(id = %post.id, "post created");
    state.posts.write().await.insert(post.id.clone(), post.clone());
    Ok((StatusCode::CREATED, Json(post)))
}

async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateComment>,
) -> ApiResult<Comment> {
    let author = session(&headers)?;
    if input.content.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, json!({"error": "content is required"})));
    }
    if !state.posts.read().await.contains_key(&input.post_id) {
        return Err(reject(StatusCode::NOT_FOUND, json!({"reason": "post not found"})));
    }
    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        content: input.content,
        post_id: input.post_id,
        author,
    };
    info!(id = %comment.id, post_id = %comment.post_id, "comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn verify_receipt(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<VerifyReceipt>,
) -> ApiResult<ReceiptVerdict> {
    session(&headers)?;
    if input.transaction_receipt.is_empty() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            json!({"error": "missing transaction receipt"}),
        ));
    }
    // A receipt is only honoured once per order.
    if !state.verified_orders.write().await.insert(input.order_id.clone()) {
        return Err(reject(StatusCode::CONFLICT, json!({})));
    }
    info!(order_id = %input.order_id, "receipt verified");
    Ok((
        StatusCode::OK,
        Json(ReceiptVerdict {
            valid: true,
            order_id: input.order_id,
            username: input.username,
        }),
    ))
}
