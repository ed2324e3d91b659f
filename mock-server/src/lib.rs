use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: String,
    pub amount: i64,
    pub memo: Option<String>,
    pub cleared: String,
    pub approved: bool,
    pub account_id: String,
    pub payee_id: Option<String>,
    pub payee_name: Option<String>,
    pub category_id: Option<String>,
    pub import_id: Option<String>,
    pub deleted: bool,
}

#[derive(Deserialize)]
pub struct TransactionInput {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    pub memo: Option<String>,
    pub cleared: Option<String>,
    pub approved: Option<bool>,
    pub payee_id: Option<String>,
    pub payee_name: Option<String>,
    pub category_id: Option<String>,
    pub import_id: Option<String>,
}

#[derive(Deserialize)]
pub struct SaveTransaction {
    pub transaction: TransactionInput,
}

#[derive(Deserialize)]
pub struct BulkTransactions {
    pub transactions: Vec<TransactionInput>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub since_date: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TransactionInput {
    fn into_transaction(self, id: Uuid) -> Transaction {
        Transaction {
            id,
            date: self.date,
            amount: self.amount,
            memo: self.memo,
            cleared: self.cleared.unwrap_or_else(|| "uncleared".to_string()),
            approved: self.approved.unwrap_or(false),
            account_id: self.account_id,
            payee_id: self.payee_id,
            payee_name: self.payee_name,
            category_id: self.category_id,
            import_id: self.import_id,
            deleted: false,
        }
    }
}

/// Transactions of one budget plus every import id it has accepted.
#[derive(Default, Debug)]
pub struct Budget {
    pub transactions: Vec<Transaction>,
    pub import_ids: HashSet<String>,
    pub server_knowledge: i64,
}

pub type Db = Arc<RwLock<HashMap<String, Budget>>>;

#[derive(Clone)]
pub struct AppState {
    access_token: Arc<str>,
    db: Db,
}

impl AppState {
    /// State accepting `access_token` with the given budgets created empty.
    pub fn new<I, S>(access_token: &str, budget_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let budgets = budget_ids
            .into_iter()
            .map(|id| (id.into(), Budget::default()))
            .collect();
        Self {
            access_token: Arc::from(access_token),
            db: Arc::new(RwLock::new(budgets)),
        }
    }

    pub fn db(&self) -> Db {
        self.db.clone()
    }
}

/// Error body in the service's shape: `{"error": {"id", "name", "detail"}}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    name: &'static str,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            name,
            detail: detail.into(),
        }
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized")
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "resource_not_found", format!("{what} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "id": self.status.as_u16().to_string(),
                "name": self.name,
                "detail": self.detail,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text())
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/budgets/{budget_id}/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/v1/budgets/{budget_id}/transactions/bulk",
            post(bulk_create_transactions),
        )
        .route(
            "/v1/budgets/{budget_id}/transactions/{transaction_id}",
            get(get_transaction).put(update_transaction),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented != Some(&*state.access_token) {
        warn!(path = %request.uri().path(), "rejected request with bad bearer token");
        return ApiError::unauthorized().into_response();
    }
    next.run(request).await
}

async fn list_transactions(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.read().await;
    let budget = db.get(&budget_id).ok_or_else(|| ApiError::not_found("budget"))?;
    let transactions: Vec<&Transaction> = budget
        .transactions
        .iter()
        .filter(|t| {
            params
                .since_date
                .as_deref()
                .map_or(true, |since| t.date.as_str() >= since)
        })
        .filter(|t| match params.kind.as_deref() {
            Some("unapproved") => !t.approved,
            Some("uncategorized") => t.category_id.is_none(),
            _ => true,
        })
        .collect();
    Ok(Json(json!({
        "data": {
            "transactions": transactions,
            "server_knowledge": budget.server_knowledge,
        }
    })))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path((budget_id, transaction_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state.db.read().await;
    let budget = db.get(&budget_id).ok_or_else(|| ApiError::not_found("budget"))?;
    let index = find(budget, &transaction_id).ok_or_else(|| ApiError::not_found("transaction"))?;
    let transaction = &budget.transactions[index];
    Ok(Json(json!({ "data": { "transaction": transaction } })))
}

async fn create_transaction(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    input: Result<Json<SaveTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(SaveTransaction { transaction: input }) = input?;
    let mut db = state.db.write().await;
    let budget = db.get_mut(&budget_id).ok_or_else(|| ApiError::not_found("budget"))?;
    if let Some(import_id) = &input.import_id {
        if budget.import_ids.contains(import_id) {
            return Err(ApiError::new(
                StatusCode::CONFLICT,
                "conflict",
                format!("import_id {import_id} already exists"),
            ));
        }
        budget.import_ids.insert(import_id.clone());
    }
    let transaction = input.into_transaction(Uuid::new_v4());
    debug!(budget_id = %budget_id, id = %transaction.id, "created transaction");
    budget.transactions.push(transaction.clone());
    budget.server_knowledge += 1;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "data": { "transaction": transaction } })),
    ))
}

async fn update_transaction(
    State(state): State<AppState>,
    Path((budget_id, transaction_id)): Path<(String, String)>,
    input: Result<Json<SaveTransaction>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(SaveTransaction { transaction: input }) = input?;
    let mut db = state.db.write().await;
    let budget = db.get_mut(&budget_id).ok_or_else(|| ApiError::not_found("budget"))?;
    let index = find(budget, &transaction_id).ok_or_else(|| ApiError::not_found("transaction"))?;
    let existing = &budget.transactions[index];
    let id = existing.id;
    let previous_import_id = existing.import_id.clone();
    if let Some(import_id) = &input.import_id {
        if previous_import_id.as_ref() != Some(import_id) {
            if budget.import_ids.contains(import_id) {
                return Err(ApiError::new(
                    StatusCode::CONFLICT,
                    "conflict",
                    format!("import_id {import_id} already exists"),
                ));
            }
            budget.import_ids.insert(import_id.clone());
        }
    }
    let import_id = input.import_id.clone().or(previous_import_id);
    let mut updated = input.into_transaction(id);
    updated.import_id = import_id;
    budget.transactions[index] = updated.clone();
    budget.server_knowledge += 1;
    Ok(Json(json!({ "data": { "transaction": updated } })))
}

async fn bulk_create_transactions(
    State(state): State<AppState>,
    Path(budget_id): Path<String>,
    input: Result<Json<BulkTransactions>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(BulkTransactions { transactions }) = input?;
    let mut db = state.db.write().await;
    let budget = db.get_mut(&budget_id).ok_or_else(|| ApiError::not_found("budget"))?;

    let mut transaction_ids = Vec::new();
    let mut duplicate_import_ids = Vec::new();
    for input in transactions {
        if let Some(import_id) = &input.import_id {
            if !budget.import_ids.insert(import_id.clone()) {
                duplicate_import_ids.push(import_id.clone());
                continue;
            }
        }
        let transaction = input.into_transaction(Uuid::new_v4());
        transaction_ids.push(transaction.id.to_string());
        budget.transactions.push(transaction);
    }
    budget.server_knowledge += 1;
    debug!(
        budget_id = %budget_id,
        created = transaction_ids.len(),
        duplicates = duplicate_import_ids.len(),
        "bulk create"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "data": {
                "bulk": {
                    "transaction_ids": transaction_ids,
                    "duplicate_import_ids": duplicate_import_ids,
                }
            }
        })),
    ))
}

fn find(budget: &Budget, transaction_id: &str) -> Option<usize> {
    let id: Uuid = transaction_id.parse().ok()?;
    budget.transactions.iter().position(|t| t.id == id)
}
