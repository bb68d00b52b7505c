//! Async request client: session lookup, codec and transport in one call.
//!
//! # Design
//! `RequestClient` holds a fixed `ApiCodec`, a `Transport` and a
//! `SessionProvider`, none of which it mutates. Each operation reads the
//! session token, builds the request, awaits the transport once and
//! classifies the response. There are no retries. Failures are logged and
//! returned as-is.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::api::{ApiCodec, CREATE_COMMENT_PATH, CREATE_POST_PATH, VERIFY_RECEIPT_PATH};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::session::SessionProvider;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Comment, CreateComment, CreatePost, Post, PurchaseResult};

/// Authenticated client for the backend API.
#[derive(Debug, Clone)]
pub struct RequestClient<T, S> {
    codec: ApiCodec,
    transport: T,
    session: S,
}

impl<S: SessionProvider> RequestClient<UreqTransport, S> {
    /// Client using the default `ureq` transport.
    pub fn from_config(config: &ClientConfig, session: S) -> Self {
        Self::new(&config.base_url, UreqTransport::new(config.timeout), session)
    }
}

impl<T: Transport, S: SessionProvider> RequestClient<T, S> {
    pub fn new(base_url: &str, transport: T, session: S) -> Self {
        Self {
            codec: ApiCodec::new(base_url),
            transport,
            session,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST `params` to `path` and return the response uninterpreted.
    pub async fn send_request<B>(&self, path: &str, params: &B) -> Result<HttpResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let token = self.session_token()?;
        let request = self.codec.build_request(path, &token, params)?;
        self.execute(request).await
    }

    pub async fn create_post(&self, input: &CreatePost) -> Result<Post, ApiError> {
        let outcome: Result<Post, ApiError> = async {
            let token = self.session_token()?;
            let request = self.codec.build_create_post(&token, input)?;
            let response = self.execute(request).await?;
            self.codec.parse_create_post(response)
        }
        .await;
        outcome.inspect_err(|err| log_failure(CREATE_POST_PATH, err))
    }

    pub async fn create_comment(&self, input: &CreateComment) -> Result<Comment, ApiError> {
        let outcome: Result<Comment, ApiError> = async {
            let token = self.session_token()?;
            let request = self.codec.build_create_comment(&token, input)?;
            let response = self.execute(request).await?;
            self.codec.parse_create_comment(response)
        }
        .await;
        outcome.inspect_err(|err| log_failure(CREATE_COMMENT_PATH, err))
    }

    /// Ask the backend to verify an in-app purchase with the store.
    ///
    /// Returns the provider's verification payload on success.
    pub async fn validate_purchase_receipt(&self, purchase: &PurchaseResult) -> Result<Value, ApiError> {
        let outcome: Result<Value, ApiError> = async {
            let token = self.session_token()?;
            let request = self.codec.build_verify_receipt(&token, purchase)?;
            let response = self.execute(request).await?;
            self.codec.parse_verify_receipt(response)
        }
        .await;
        outcome.inspect_err(|err| log_failure(VERIFY_RECEIPT_PATH, err))
    }

    fn session_token(&self) -> Result<String, ApiError> {
        self.session
            .session_token()
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingSession)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn log_failure(path: &str, err: &ApiError) {
    match err.status() {
        Some(status) => error!(path, status, error = %err, "request rejected"),
        None => error!(path, error = %err, "request failed"),
    }
}
