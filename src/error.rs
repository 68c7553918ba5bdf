//! Error types, one enum per failure family.
//!
//! Every recoverable error ends up rendered with `Display` into the session's
//! status message (or the auth modal's), so the messages are written for
//! people reading a status bar.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Startup failure while fetching or parsing the API description.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("timed out after {0:?} fetching {1}")]
    Timeout(Duration, String),

    #[error("GET {url} failed")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read spec file: {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse openapi document: {0}")]
    Parse(String),

    #[error("document has no `paths` object; is this an OpenAPI description?")]
    NotOpenApi,
}

/// A request could not be assembled from the values entered so far.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing required path param: {0}")]
    MissingPathParam(String),

    #[error("missing required query param: {0}")]
    MissingQueryParam(String),

    #[error("invalid {expected} for {name}")]
    InvalidQueryParam { name: String, expected: &'static str },

    #[error("missing required body field: {0}")]
    MissingBodyField(String),

    #[error("invalid {expected} for body field {name}")]
    InvalidBodyField { name: String, expected: &'static str },

    #[error("invalid json body: {0}")]
    MalformedRawBody(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

/// The request was built but the exchange with the server failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("error reading body: {0}")]
    ReadBody(#[source] reqwest::Error),
}

impl TransportError {
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::Connect(err)
        } else {
            TransportError::Request(err)
        }
    }
}

/// Token acquisition failed; shown only inside the auth modal.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("base URL unknown; cannot resolve relative token url {0}")]
    MissingBaseUrl(String),

    #[error("token request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("token endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed token response: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("token response has no access_token")]
    MissingAccessToken,

    #[error("unsupported security scheme")]
    UnsupportedScheme,
}

/// Invalid command line / environment configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("spec required (use --spec-url or --spec-file, or set SPECDECK_SPEC_URL/SPECDECK_SPEC_FILE)")]
    MissingSpec,

    #[error("invalid spec url: {0}")]
    InvalidSpecUrl(String),
}
