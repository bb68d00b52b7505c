//! Stateless request builder and response classifier for the backend API.
//!
//! # Design
//! `ApiCodec` holds only a `base_url`. Each endpoint is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The session token is an explicit argument to every
//! `build_*` call, so the codec never reaches for ambient credentials.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Comment, CreateComment, CreatePost, Post, PurchaseResult, VerifyReceipt};

pub const SESSION_HEADER: &str = "X-LC-Session";
pub const CREATE_POST_PATH: &str = "/api/post/create";
pub const CREATE_COMMENT_PATH: &str = "/api/comment/create";
pub const VERIFY_RECEIPT_PATH: &str = "/api/apple/onIapVerifyReceipt";

const CREATE_POST_FALLBACK: &str = "post creation failed";
const CREATE_COMMENT_FALLBACK: &str = "reply failed";
const VERIFY_RECEIPT_FALLBACK: &str = "receipt verification failed";

/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ApiCodec {
    base_url: String,
}

impl ApiCodec {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a JSON POST to `path` carrying `session_token`.
    pub fn build_request<B>(
        &self,
        path: &str,
        session_token: &str,
        params: &B,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_string(params).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (SESSION_HEADER.to_string(), session_token.to_string()),
            ],
            body,
        })
    }

    pub fn build_create_post(&self, session_token: &str, input: &CreatePost) -> Result<HttpRequest, ApiError> {
        self.build_request(CREATE_POST_PATH, session_token, input)
    }

    pub fn build_create_comment(
        &self,
        session_token: &str,
        input: &CreateComment,
    ) -> Result<HttpRequest, ApiError> {
        input.validate()?;
        self.build_request(CREATE_COMMENT_PATH, session_token, input)
    }

    pub fn build_verify_receipt(
        &self,
        session_token: &str,
        purchase: &PurchaseResult,
    ) -> Result<HttpRequest, ApiError> {
        purchase.validate()?;
        self.build_request(VERIFY_RECEIPT_PATH, session_token, &VerifyReceipt::from(purchase))
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        parse_json(response, CREATE_POST_FALLBACK)
    }

    pub fn parse_create_comment(&self, response: HttpResponse) -> Result<Comment, ApiError> {
        parse_json(response, CREATE_COMMENT_FALLBACK)
    }

    /// The verification payload is defined by the store provider and is
    /// returned as-is.
    pub fn parse_verify_receipt(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_json(response, VERIFY_RECEIPT_FALLBACK)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse, fallback: &str) -> Result<T, ApiError> {
    check_status(&response, fallback)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Turn a non-2xx response into `ApiError::Rejected`.
fn check_status(response: &HttpResponse, fallback: &str) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let body: Value =
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    let message = rejection_message(&body).unwrap_or(fallback).to_string();
    Err(ApiError::Rejected {
        status: response.status,
        message,
        body,
    })
}

/// `reason`, then `error`; blank strings do not count.
fn rejection_message(body: &Value) -> Option<&str> {
    ["reason", "error"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|msg| !msg.is_empty())
}
