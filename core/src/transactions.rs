//! The budget-scoped transactions resource.
//!
//! Each operation has a `build_*` method that validates its arguments and
//! produces the `HttpRequest`, and a method of the operation's name that
//! sends it through the client's transport and decodes the typed payload.

use serde::Serialize;

use crate::client::{ApiResponse, Client};
use crate::error::ApiError;
use crate::http::{HttpRequest, Transport};
use crate::trace::Operation;
use crate::types::{
    BulkData, BulkTransactions, SaveTransaction, TransactionData, TransactionInput,
    TransactionsData, TransactionsQuery,
};

/// Transactions endpoints bound to a `Client`.
#[derive(Debug)]
pub struct TransactionsApi<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> TransactionsApi<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn build_get_transactions(
        &self,
        budget_id: &str,
        query: &TransactionsQuery,
    ) -> Result<HttpRequest, ApiError> {
        require_id("budget_id", budget_id)?;
        let mut params = Vec::new();
        if let Some(since) = query.since_date.as_deref() {
            params.push(("since_date", since));
        }
        if let Some(kind) = query.transaction_type {
            params.push(("type", kind.as_str()));
        }
        self.client.configuration().request(
            Operation::GetTransactions.method(),
            &["budgets", budget_id, "transactions"],
            &params,
            None,
        )
    }

    pub fn build_get_transactions_by_id(
        &self,
        budget_id: &str,
        transaction_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_id("budget_id", budget_id)?;
        require_id("transaction_id", transaction_id)?;
        self.client.configuration().request(
            Operation::GetTransactionById.method(),
            &["budgets", budget_id, "transactions", transaction_id],
            &[],
            None,
        )
    }

    pub fn build_create_transaction(
        &self,
        budget_id: &str,
        body: &SaveTransaction,
    ) -> Result<HttpRequest, ApiError> {
        require_id("budget_id", budget_id)?;
        validate_input(&body.transaction)?;
        self.client.configuration().request(
            Operation::CreateTransaction.method(),
            &["budgets", budget_id, "transactions"],
            &[],
            Some(to_json(body)?),
        )
    }

    pub fn build_update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        body: &SaveTransaction,
    ) -> Result<HttpRequest, ApiError> {
        require_id("budget_id", budget_id)?;
        require_id("transaction_id", transaction_id)?;
        validate_input(&body.transaction)?;
        self.client.configuration().request(
            Operation::UpdateTransaction.method(),
            &["budgets", budget_id, "transactions", transaction_id],
            &[],
            Some(to_json(body)?),
        )
    }

    pub fn build_bulk_create_transactions(
        &self,
        budget_id: &str,
        body: &BulkTransactions,
    ) -> Result<HttpRequest, ApiError> {
        require_id("budget_id", budget_id)?;
        if body.transactions.is_empty() {
            return Err(ApiError::InvalidArgument(
                "bulk create needs at least one transaction".to_string(),
            ));
        }
        for input in &body.transactions {
            validate_input(input)?;
        }
        self.client.configuration().request(
            Operation::BulkCreateTransactions.method(),
            &["budgets", budget_id, "transactions", "bulk"],
            &[],
            Some(to_json(body)?),
        )
    }

    /// Lists every transaction in the budget.
    pub fn get_transactions(
        &self,
        budget_id: &str,
    ) -> Result<ApiResponse<TransactionsData>, ApiError> {
        self.get_transactions_with(budget_id, &TransactionsQuery::default())
    }

    /// Lists transactions matching `query`.
    pub fn get_transactions_with(
        &self,
        budget_id: &str,
        query: &TransactionsQuery,
    ) -> Result<ApiResponse<TransactionsData>, ApiError> {
        let request = self.build_get_transactions(budget_id, query)?;
        self.client.execute(Operation::GetTransactions, request)
    }

    pub fn get_transactions_by_id(
        &self,
        budget_id: &str,
        transaction_id: &str,
    ) -> Result<ApiResponse<TransactionData>, ApiError> {
        let request = self.build_get_transactions_by_id(budget_id, transaction_id)?;
        self.client.execute(Operation::GetTransactionById, request)
    }

    pub fn create_transaction(
        &self,
        budget_id: &str,
        body: &SaveTransaction,
    ) -> Result<ApiResponse<TransactionData>, ApiError> {
        let request = self.build_create_transaction(budget_id, body)?;
        self.client.execute(Operation::CreateTransaction, request)
    }

    pub fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        body: &SaveTransaction,
    ) -> Result<ApiResponse<TransactionData>, ApiError> {
        let request = self.build_update_transaction(budget_id, transaction_id, body)?;
        self.client.execute(Operation::UpdateTransaction, request)
    }

    /// Creates several transactions at once. Inputs whose `import_id` the
    /// service has already seen come back in `duplicate_import_ids` and are
    /// not created again.
    pub fn bulk_create_transactions(
        &self,
        budget_id: &str,
        body: &BulkTransactions,
    ) -> Result<ApiResponse<BulkData>, ApiError> {
        let request = self.build_bulk_create_transactions(budget_id, body)?;
        self.client.execute(Operation::BulkCreateTransactions, request)
    }
}

fn require_id(name: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidArgument(format!("{name} must not be empty")));
    }
    if matches!(value, "." | "..") {
        return Err(ApiError::InvalidArgument(format!(
            "{name} must not be a dot segment, got {value:?}"
        )));
    }
    Ok(())
}

fn validate_input(input: &TransactionInput) -> Result<(), ApiError> {
    require_id("account_id", &input.account_id)?;
    if input.date.trim().is_empty() {
        return Err(ApiError::InvalidArgument("date must not be empty".to_string()));
    }
    Ok(())
}

fn to_json<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}
