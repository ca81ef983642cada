//! Request header synthesis.
//!
//! Outbound requests carry a header set chosen by a [`HeaderStrategy`].
//! [`BrowserHeaders`] imitates a browser XHR from the configured origin;
//! [`MinimalHeaders`] sends only what every request needs.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL,
    CONNECTION, DNT, ORIGIN, PRAGMA, REFERER, USER_AGENT,
};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::{config::HeaderProfile, Result};

pub const TRANSACTION_ID_HEADER: &str = "x-client-transaction-id";
pub const REQUEST_TIMESTAMP_HEADER: &str = "x-request-timestamp";

/// Which remote operation a header set is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListMatches,
    EventDetails,
    EventStatistics,
}

impl Operation {
    /// Statistics live on a sibling host, everything else on the events host.
    pub fn is_cross_site(&self) -> bool {
        matches!(self, Operation::EventStatistics)
    }
}

/// Headers for a single request plus the transaction id they carry.
#[derive(Debug, Clone)]
pub struct RequestHeaders {
    pub map: HeaderMap,
    pub transaction_id: Uuid,
}

pub trait HeaderStrategy: Send + Sync {
    /// Build a fresh header set. Every call yields a new transaction id.
    fn build(&self, operation: Operation) -> RequestHeaders;
}

fn stamp(map: &mut HeaderMap) -> Uuid {
    let transaction_id = Uuid::new_v4();
    if let Ok(value) = HeaderValue::from_str(&transaction_id.to_string()) {
        map.insert(HeaderName::from_static(TRANSACTION_ID_HEADER), value);
    }
    transaction_id
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Browser-like header set built from a [`HeaderProfile`].
///
/// Profile values are validated once here, so building per-request headers
/// cannot fail afterwards.
#[derive(Debug, Clone)]
pub struct BrowserHeaders {
    base: HeaderMap,
}

impl BrowserHeaders {
    pub fn new(profile: &HeaderProfile) -> Result<Self> {
        let mut h = HeaderMap::new();
        h.insert(USER_AGENT, HeaderValue::from_str(&profile.full_user_agent())?);
        h.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        h.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&profile.accept_language)?,
        );
        // No brotli; reqwest is built without it
        h.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
        h.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        h.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("empty"),
        );
        h.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("cors"),
        );
        h.insert(
            HeaderName::from_static("sec-ch-ua-platform"),
            HeaderValue::from_str(&format!("\"{}\"", profile.platform))?,
        );
        h.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        h.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        h.insert(ORIGIN, HeaderValue::from_str(&profile.origin)?);
        h.insert(REFERER, HeaderValue::from_str(&profile.referer)?);
        h.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );
        h.insert(DNT, HeaderValue::from_static("1"));
        h.insert(
            HeaderName::from_static("sec-gpc"),
            HeaderValue::from_static("1"),
        );
        Ok(Self { base: h })
    }
}

impl HeaderStrategy for BrowserHeaders {
    fn build(&self, operation: Operation) -> RequestHeaders {
        let mut map = self.base.clone();
        let site = if operation.is_cross_site() {
            "same-site"
        } else {
            "same-origin"
        };
        map.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static(site),
        );
        if let Ok(value) = HeaderValue::from_str(&unix_millis().to_string()) {
            map.insert(HeaderName::from_static(REQUEST_TIMESTAMP_HEADER), value);
        }
        let transaction_id = stamp(&mut map);
        RequestHeaders {
            map,
            transaction_id,
        }
    }
}

/// Plain header set: `Accept`, `User-Agent` and the transaction id.
#[derive(Debug, Clone)]
pub struct MinimalHeaders {
    user_agent: HeaderValue,
}

impl MinimalHeaders {
    pub fn new(user_agent: &str) -> Result<Self> {
        Ok(Self {
            user_agent: HeaderValue::from_str(user_agent)?,
        })
    }
}

impl HeaderStrategy for MinimalHeaders {
    fn build(&self, _operation: Operation) -> RequestHeaders {
        let mut map = HeaderMap::new();
        map.insert(ACCEPT, HeaderValue::from_static("application/json"));
        map.insert(USER_AGENT, self.user_agent.clone());
        let transaction_id = stamp(&mut map);
        RequestHeaders {
            map,
            transaction_id,
        }
    }
}
