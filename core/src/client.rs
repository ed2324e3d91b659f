//! Client entry point and response parsing.
//!
//! # Design
//! `Client` pairs a `Configuration` with a `Transport` and carries no
//! mutable state between calls. Resource accessors such as
//! `transactions()` borrow the client, so every resource shares the same
//! token and transport. Each call returns its own `RequestTrace`, either in
//! the `ApiResponse` or in the `ApiError`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Configuration;
use crate::error::{ApiError, ErrorDetail};
use crate::http::{HttpRequest, Transport, UreqTransport};
use crate::trace::{Operation, RequestTrace};
use crate::transactions::TransactionsApi;

/// A decoded 2xx response.
///
/// `data` holds the payload under the service's top-level `data` key, typed
/// per operation.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
    pub trace: RequestTrace,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Synchronous client for the budgeting API.
#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    configuration: Configuration,
    transport: T,
}

impl Client<UreqTransport> {
    /// Client over real HTTP. No network call happens here.
    pub fn new(access_token: impl Into<String>, host: impl Into<String>, use_tls: bool) -> Self {
        Self::with_transport(
            Configuration::new(access_token, host, use_tls),
            UreqTransport::new(),
        )
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(configuration: Configuration, transport: T) -> Self {
        Self {
            configuration,
            transport,
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn transactions(&self) -> TransactionsApi<'_, T> {
        TransactionsApi::new(self)
    }

    /// Sends `request` and decodes a 2xx body as `{"data": R}`.
    pub(crate) fn execute<R: DeserializeOwned>(
        &self,
        operation: Operation,
        request: HttpRequest,
    ) -> Result<ApiResponse<R>, ApiError> {
        debug!(
            operation = operation.name(),
            method = request.method.as_str(),
            url = %request.url,
            "sending request"
        );
        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(source) => {
                warn!(operation = operation.name(), error = %source, "transport failed");
                return Err(ApiError::Transport {
                    source,
                    request: Box::new(request),
                });
            }
        };
        debug!(
            operation = operation.name(),
            status = response.status,
            "received response"
        );
        parse_response(RequestTrace::new(operation, request, response))
    }
}

/// Classifies a completed exchange: non-2xx becomes `ApiError::Http`, a 2xx
/// body is decoded from the `data` envelope.
///
/// Public so callers that run the HTTP round-trip themselves can pair a
/// `build_*` request with its response and get the same result the client
/// would.
pub fn parse_response<R: DeserializeOwned>(trace: RequestTrace) -> Result<ApiResponse<R>, ApiError> {
    let status = trace.response.status;
    if !trace.response.is_success() {
        let detail = ErrorDetail::from_body(&trace.response.body);
        warn!(
            operation = trace.operation.name(),
            status,
            error = detail.as_ref().map(|d| d.name.as_str()).unwrap_or("unknown"),
            "request failed"
        );
        return Err(ApiError::Http {
            code: status,
            detail,
            trace: Box::new(trace),
        });
    }
    match serde_json::from_str::<Envelope<R>>(&trace.response.body) {
        Ok(envelope) => Ok(ApiResponse {
            status,
            data: envelope.data,
            trace,
        }),
        Err(e) => Err(ApiError::Deserialization {
            message: e.to_string(),
            trace: Box::new(trace),
        }),
    }
}
