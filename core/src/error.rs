//! Error types for the transactions client.
//!
//! # Design
//! A single `Http` variant covers every non-2xx status; the status is kept
//! as `code` so callers match on data (`401`, `404`, ...) rather than on a
//! variant per status. Variants that correspond to a completed exchange
//! carry its `RequestTrace`.

use serde::Deserialize;

use crate::http::{HttpRequest, TransportError};
use crate::trace::RequestTrace;

/// Error body returned by the service: `{"error": {"id", "name", "detail"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

impl ErrorDetail {
    /// Best-effort parse of an error body. Returns `None` for bodies that
    /// are not in the service's error shape.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error)
    }
}

/// Errors returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An argument was rejected before any request was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The transport never produced a response.
    #[error("transport failed for {}: {source}", request_line(.request))]
    Transport {
        #[source]
        source: TransportError,
        request: Box<HttpRequest>,
    },

    /// The service answered with a non-2xx status.
    #[error("HTTP {code}{}", detail_suffix(.detail))]
    Http {
        code: u16,
        detail: Option<ErrorDetail>,
        trace: Box<RequestTrace>,
    },

    /// A 2xx response body could not be decoded into the expected type.
    #[error("deserialization failed: {message}")]
    Deserialization {
        message: String,
        trace: Box<RequestTrace>,
    },
}

fn request_line(request: &HttpRequest) -> String {
    format!("{} {}", request.method.as_str(), request.url)
}

fn detail_suffix(detail: &Option<ErrorDetail>) -> String {
    match detail {
        Some(ErrorDetail {
            name,
            detail: Some(text),
            ..
        }) => format!(" ({name}): {text}"),
        Some(ErrorDetail { name, .. }) => format!(" ({name})"),
        None => String::new(),
    }
}

impl ApiError {
    /// HTTP status of the failed exchange, if one completed.
    pub fn code(&self) -> Option<u16> {
        match self {
            ApiError::Http { code, .. } => Some(*code),
            ApiError::Deserialization { trace, .. } => Some(trace.status()),
            _ => None,
        }
    }

    /// The exchange behind this error, if one completed.
    pub fn trace(&self) -> Option<&RequestTrace> {
        match self {
            ApiError::Http { trace, .. } | ApiError::Deserialization { trace, .. } => Some(trace.as_ref()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(404)
    }
}
