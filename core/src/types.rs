//! DTOs for the transactions endpoints.
//!
//! # Design
//! Response types are lenient: only the fields every transaction carries
//! are required, the rest default when absent so older or trimmed payloads
//! still decode. Request types are strict: `account_id`, `date` and `amount`
//! are plain fields and optional ones are omitted from the JSON when unset.
//!
//! Amounts are integers in milliunits of the budget's currency. Negative
//! amounts are outflows, positive amounts are inflows.

use serde::{Deserialize, Serialize};

/// Reconciliation state of a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearedStatus {
    Cleared,
    #[default]
    Uncleared,
    Reconciled,
}

/// A transaction as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub cleared: ClearedStatus,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub flag_color: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub import_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub subtransactions: Vec<SubTransaction>,
}

impl Transaction {
    pub fn is_outflow(&self) -> bool {
        self.amount < 0
    }
}

/// One split of a split transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTransaction {
    pub id: String,
    pub transaction_id: String,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Fields sent when creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleared: Option<ClearedStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_color: Option<String>,
    /// Client-chosen key the service uses to reject duplicate imports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
}

impl TransactionInput {
    /// Input with only the required fields set.
    pub fn new(account_id: impl Into<String>, date: impl Into<String>, amount: i64) -> Self {
        Self {
            account_id: account_id.into(),
            date: date.into(),
            amount,
            payee_id: None,
            payee_name: None,
            category_id: None,
            memo: None,
            cleared: None,
            approved: None,
            flag_color: None,
            import_id: None,
        }
    }

    pub fn with_import_id(mut self, import_id: impl Into<String>) -> Self {
        self.import_id = Some(import_id.into());
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveTransaction {
    pub transaction: TransactionInput,
}

impl From<TransactionInput> for SaveTransaction {
    fn from(transaction: TransactionInput) -> Self {
        Self { transaction }
    }
}

/// Body of bulk create requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTransactions {
    pub transactions: Vec<TransactionInput>,
}

impl From<Vec<TransactionInput>> for BulkTransactions {
    fn from(transactions: Vec<TransactionInput>) -> Self {
        Self { transactions }
    }
}

/// `data` of a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsData {
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub server_knowledge: Option<i64>,
}

/// `data` of a single-transaction response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    pub transaction: Transaction,
}

/// Outcome of a bulk create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    /// Ids of the created transactions, in submission order.
    pub transaction_ids: Vec<String>,
    /// Import ids the service had already seen; nothing was created for them.
    pub duplicate_import_ids: Vec<String>,
}

/// `data` of a bulk create response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkData {
    pub bulk: BulkResult,
}

/// Filter for the list endpoint's `type` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Uncategorized,
    Unapproved,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Uncategorized => "uncategorized",
            TransactionType::Unapproved => "unapproved",
        }
    }
}

/// Optional filters for listing transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionsQuery {
    /// Only transactions on or after this ISO date.
    pub since_date: Option<String>,
    pub transaction_type: Option<TransactionType>,
}
