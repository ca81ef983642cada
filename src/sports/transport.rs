//! Network seam between the request executor and the remote APIs.

use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use std::time::Duration;
use uuid::Uuid;

use crate::{core::http::Operation, Result, SportsError};

/// Everything needed to issue one GET. Built fresh per call.
#[derive(Debug, Clone)]
pub struct RequestProfile {
    pub operation: Operation,
    pub base_url: String,
    pub endpoint_path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub transaction_id: Uuid,
}

impl RequestProfile {
    pub fn url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint_path
        )
    }
}

/// Status line and body of a response, before any validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            reason: Some("OK".to_string()),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the request. Failures to get any response are `Transport` errors.
    async fn send(&self, request: &RequestProfile, timeout: Duration) -> Result<RawResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(default_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(default_timeout)
            .build()
            .map_err(|e| SportsError::configuration("http client", e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestProfile, timeout: Duration) -> Result<RawResponse> {
        let res = self
            .client
            .get(request.url())
            .headers(request.headers.clone())
            .query(&request.query)
            .timeout(timeout)
            .send()
            .await
            .map_err(SportsError::from)?;

        let status = res.status();
        let body = res.text().await.map_err(SportsError::from)?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}
