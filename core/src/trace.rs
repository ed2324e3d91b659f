//! Per-call request/response traces.
//!
//! Every exchange that reaches the transport produces a `RequestTrace`. It
//! travels back to the caller inside `ApiResponse` on success and inside
//! `ApiError` on failure, so there is no shared "last request" slot on the
//! client.

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Identifies which client call produced a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetTransactions,
    GetTransactionById,
    CreateTransaction,
    UpdateTransaction,
    BulkCreateTransactions,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetTransactions => "get_transactions",
            Operation::GetTransactionById => "get_transactions_by_id",
            Operation::CreateTransaction => "create_transaction",
            Operation::UpdateTransaction => "update_transaction",
            Operation::BulkCreateTransactions => "bulk_create_transactions",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            Operation::GetTransactions | Operation::GetTransactionById => HttpMethod::Get,
            Operation::CreateTransaction | Operation::BulkCreateTransactions => HttpMethod::Post,
            Operation::UpdateTransaction => HttpMethod::Put,
        }
    }

    /// Status the service documents for a successful call. Any 2xx is
    /// still accepted.
    pub fn expected_status(self) -> u16 {
        match self {
            Operation::CreateTransaction | Operation::BulkCreateTransactions => 201,
            _ => 200,
        }
    }
}

/// One completed exchange: what was sent and what came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTrace {
    pub operation: Operation,
    pub request: HttpRequest,
    pub response: HttpResponse,
}

impl RequestTrace {
    pub fn new(operation: Operation, request: HttpRequest, response: HttpResponse) -> Self {
        Self {
            operation,
            request,
            response,
        }
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    pub fn authorization(&self) -> Option<&str> {
        self.request.header("Authorization")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_map_to_documented_methods_and_codes() {
        assert_eq!(Operation::GetTransactions.method(), HttpMethod::Get);
        assert_eq!(Operation::UpdateTransaction.method(), HttpMethod::Put);
        assert_eq!(Operation::BulkCreateTransactions.method(), HttpMethod::Post);
        assert_eq!(Operation::CreateTransaction.expected_status(), 201);
        assert_eq!(Operation::GetTransactionById.expected_status(), 200);
        assert_eq!(Operation::GetTransactionById.name(), "get_transactions_by_id");
    }
}
