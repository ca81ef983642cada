//! Error types for the sports odds client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SportsError>;

#[derive(Error, Debug)]
pub enum SportsError {
    #[error("Configuration error for {var}: {message}")]
    Configuration { var: String, message: String },

    #[error("Transport error: {message}")]
    Transport { message: String, timed_out: bool },

    #[error("Remote API rejected request (HTTP {status}): {message}")]
    Response { status: u16, message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl SportsError {
    pub fn configuration(var: impl Into<String>, message: impl Into<String>) -> Self {
        SportsError::Configuration {
            var: var.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        SportsError::Transport {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        SportsError::Transport {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn response(status: u16, message: impl Into<String>) -> Self {
        SportsError::Response {
            status,
            message: message.into(),
        }
    }

    /// True when the send phase ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SportsError::Transport { timed_out: true, .. })
    }

    /// HTTP status carried by a [`SportsError::Response`].
    pub fn status(&self) -> Option<u16> {
        match self {
            SportsError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller could reasonably try the same call again later.
    ///
    /// The client never retries on its own; this only classifies the failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            SportsError::Transport { .. } => true,
            SportsError::Response { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short category name used by the CLI when reporting failures.
    pub fn category(&self) -> &'static str {
        match self {
            SportsError::Configuration { .. } => "configuration",
            SportsError::Transport { .. } => "transport",
            SportsError::Response { .. } => "response",
            SportsError::InvalidArgument { .. } => "argument",
            SportsError::Json(_) => "json",
            SportsError::Io(_) => "io",
            SportsError::InvalidHeader(_) => "header",
        }
    }
}

impl From<reqwest::Error> for SportsError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return SportsError::response(status.as_u16(), err.to_string());
        }
        SportsError::Transport {
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }
}
