//! Transport layer
//!
//! This module defines the collaborator the traversal core talks to:
//! - A single request primitive (`send`)
//! - `get` / `post` conveniences built on it
//! - `fetch_many`, an order-preserving, bounded-concurrency batch
//!
//! Documents are plain `serde_json::Value`s; an empty response body is `Null`.

mod http;
#[cfg(test)]
pub(crate) mod memory;
mod pool;

pub use http::{build_http_client, HttpTransport};
pub use pool::{dispatch, DEFAULT_CONCURRENCY};

use crate::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde_json::Value;

/// Media type of feed pages and entries
pub const CONTENT_TYPE_ATOM: &str = "application/vnd.eventstore.atom+json";

/// Media type applied when a request does not set its own
pub const DEFAULT_CONTENT_TYPE: &str = CONTENT_TYPE_ATOM;

/// A request handed to the transport
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::POST, uri)
        }
    }

    /// A GET negotiating the feed's structured media type
    pub fn get_atom(uri: impl Into<String>) -> Self {
        let mut request = Self::get(uri);
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_ATOM));
        request
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Request dispatch used by the traversal core
///
/// Implementations only provide `send`; the batch executor is shared. The
/// transport is used read-only and concurrently, so it must be `Send + Sync`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and decodes the response document
    async fn send(&self, request: &Request) -> Result<Value>;

    async fn get(&self, uri: &str, headers: HeaderMap) -> Result<Value> {
        self.send(&Request::get(uri).with_headers(headers)).await
    }

    async fn post(&self, uri: &str, headers: HeaderMap, body: Value) -> Result<Value> {
        self.send(&Request::post(uri, body).with_headers(headers))
            .await
    }

    /// Sends a batch with at most `concurrency` requests in flight
    ///
    /// Documents come back in request order. The first failed request aborts
    /// the batch with `StreamError::Batch`.
    async fn fetch_many(&self, requests: Vec<Request>, concurrency: usize) -> Result<Vec<Value>> {
        dispatch(self, requests, concurrency).await
    }
}
