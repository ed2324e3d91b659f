//! Synchronous client for the transactions endpoints of a budgeting API.
//!
//! # Overview
//! `Client` builds authorized `HttpRequest` values, hands them to a
//! pluggable `Transport`, and decodes the JSON `data` envelope into typed
//! per-operation structs. Fixture replay for tests is just another
//! transport (`Cassette`).
//!
//! # Design
//! - `Client` holds a `Configuration` and a transport, nothing mutable.
//! - Every operation has a `build_*` half that only constructs the request,
//!   so callers may perform the I/O themselves and finish with
//!   `parse_response`.
//! - Each call returns its own `RequestTrace` (inside `ApiResponse` or
//!   `ApiError`) instead of recording a "last request" on the client.
//! - Any non-2xx status is `ApiError::Http { code, .. }`.

pub mod cassette;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod trace;
pub mod transactions;
pub mod types;

pub use cassette::{Cassette, Interaction, RecordingTransport};
pub use client::{parse_response, ApiResponse, Client};
pub use config::Configuration;
pub use error::{ApiError, ErrorDetail};
pub use http::{
    HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport,
    DEFAULT_BODY_LIMIT,
};
pub use trace::{Operation, RequestTrace};
pub use transactions::TransactionsApi;
pub use types::{
    BulkData, BulkResult, BulkTransactions, ClearedStatus, SaveTransaction, SubTransaction,
    Transaction, TransactionData, TransactionInput, TransactionType, TransactionsData,
    TransactionsQuery,
};
