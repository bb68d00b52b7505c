//! Request and response records, one shape per endpoint.
//!
//! # Design
//! Field names follow the backend's camelCase wire format. Posts carry
//! caller-defined fields beyond `content`, so both `CreatePost` and `Post`
//! flatten unknown keys into `fields` and send them back out unchanged.
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any drift.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Request payload for creating a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreatePost {
    pub content: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl CreatePost {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            fields: Map::new(),
        }
    }

    /// Attach an extra caller-defined field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// A post as stored by the server.
///
/// Only an `id` key is lifted out. Other identifier keys such as `objectId`
/// stay in `fields`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Request payload for replying to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    pub content: String,
    pub post_id: String,
}

impl CreateComment {
    pub fn new(content: impl Into<String>, post_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            post_id: post_id.into(),
        }
    }

    /// Whether the post exists is for the server to decide.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("content", &self.content)?;
        require("postId", &self.post_id)
    }
}

/// A comment as stored by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    pub post_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// The outcome of a completed in-app purchase, as handed over by the
/// platform store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResult {
    pub username: String,
    pub order_id: String,
    pub signed_payload: String,
}

impl PurchaseResult {
    pub fn validate(&self) -> Result<(), ApiError> {
        require("username", &self.username)?;
        require("orderId", &self.order_id)?;
        require("signedPayload", &self.signed_payload)
    }
}

/// Wire body for receipt verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReceipt {
    pub username: String,
    pub order_id: String,
    pub transaction_receipt: String,
}

impl From<&PurchaseResult> for VerifyReceipt {
    fn from(purchase: &PurchaseResult) -> Self {
        Self {
            username: purchase.username.clone(),
            order_id: purchase.order_id.clone(),
            transaction_receipt: purchase.signed_payload.clone(),
        }
    }
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}
