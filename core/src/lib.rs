//! Authenticated request client for the forum and in-app-purchase backend.
//!
//! # Overview
//! `RequestClient` POSTs JSON to a fixed base address, attaching the current
//! user's session token as the `X-LC-Session` header, and classifies each
//! response as a parsed payload or an `ApiError`.
//!
//! # Design
//! - `ApiCodec` builds `HttpRequest` values and parses `HttpResponse` values
//!   without touching the network, so every endpoint is testable as data.
//! - `RequestClient` composes session lookup, codec and a pluggable
//!   `Transport`. It holds no mutable state; calls may run concurrently.
//! - The session token is read from the `SessionProvider` on every call.
//! - Every operation reports failures through the same `ApiError` contract.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use api::{
    ApiCodec, CREATE_COMMENT_PATH, CREATE_POST_PATH, SESSION_HEADER, VERIFY_RECEIPT_PATH,
};
pub use client::RequestClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{SessionProvider, SessionStore};
pub use transport::{Transport, UreqTransport};
pub use types::{Comment, CreateComment, CreatePost, Post, PurchaseResult, VerifyReceipt};
