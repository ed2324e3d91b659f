//! Transactions operations replayed against recorded cassettes in
//! `cassettes/`.
//!
//! Each test loads one cassette and runs the client over it, so the full
//! request path (URL, headers, body) and the response decoding are checked
//! without a server.

use ynab_core::{
    ApiError, BulkTransactions, Cassette, Client, Configuration, HttpMethod, Operation,
    SaveTransaction, TransactionInput,
};

const ACCESS_TOKEN: &str = "9f1a2c4842b614a771aaae9220fc54ae835e298c4654dc2c9205fc1d7bd1a045";
const BUDGET_ID: &str = "f419ac25-6217-4175-88dc-c3136ff5f6fd";
const ACCOUNT_ID: &str = "5982e895-98e5-41ca-9681-0b6de1036a1c";
const HOST: &str = "api.localhost:3000";

fn cassette(raw: &str) -> Cassette {
    Cassette::from_json(raw).unwrap()
}

fn client(token: &str, raw: &str) -> Client<Cassette> {
    Client::with_transport(Configuration::new(token, HOST, false), cassette(raw))
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[test]
fn sets_the_bearer_auth_header() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/transactions.json"));
    let response = client.transactions().get_transactions(BUDGET_ID).unwrap();
    assert_eq!(
        response.trace.request.header("Authorization"),
        Some(format!("Bearer {ACCESS_TOKEN}").as_str())
    );
}

#[test]
fn fails_with_401_when_unauthorized() {
    let client = client(
        "not_valid_access_token",
        include_str!("../../cassettes/transactions_unauthorized.json"),
    );
    let err = client.transactions().get_transactions(BUDGET_ID).unwrap_err();

    assert_eq!(err.code(), Some(401));
    assert!(err.is_unauthorized());
    let trace = err.trace().unwrap();
    assert_eq!(trace.response.status, 401);
    assert_eq!(trace.authorization(), Some("Bearer not_valid_access_token"));
    match err {
        ApiError::Http { detail, .. } => {
            assert_eq!(detail.unwrap().detail.as_deref(), Some("Unauthorized"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// GET /budgets/{budget_id}/transactions
// ---------------------------------------------------------------------------

#[test]
fn returns_a_list_of_transactions() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/transactions.json"));
    let response = client.transactions().get_transactions(BUDGET_ID).unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.trace.response.status, 200);
    assert_eq!(response.trace.operation, Operation::GetTransactions);
    assert_eq!(response.data.transactions.len(), 2);
    assert_eq!(response.data.server_knowledge, Some(147));
    assert!(response.data.transactions[0].is_outflow());
    assert!(!response.data.transactions[1].is_outflow());
}

// ---------------------------------------------------------------------------
// GET /budgets/{budget_id}/transactions/{transaction_id}
// ---------------------------------------------------------------------------

#[test]
fn returns_a_transaction() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/transaction.json"));
    let response = client
        .transactions()
        .get_transactions_by_id(BUDGET_ID, "81c374ff-74ab-4d6d-8d5a-ba3ad3fa68e4")
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data.transaction.amount, -2000);
    assert_eq!(response.data.transaction.payee_name.as_deref(), Some("Corner Cafe"));
}

#[test]
fn unrecorded_transaction_is_a_transport_error() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/transaction.json"));
    let err = client
        .transactions()
        .get_transactions_by_id(BUDGET_ID, "00000000-0000-0000-0000-000000000000")
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(err.code(), None);
}

// ---------------------------------------------------------------------------
// POST /budgets/{budget_id}/transactions
// ---------------------------------------------------------------------------

#[test]
fn creates_a_transaction() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/create_transaction.json"));
    let body = SaveTransaction::from(TransactionInput::new(ACCOUNT_ID, "2018-01-01", 20000));
    let response = client
        .transactions()
        .create_transaction(BUDGET_ID, &body)
        .unwrap();

    assert_eq!(response.trace.response.status, 201);
    assert_eq!(response.trace.request.method, HttpMethod::Post);
    assert_eq!(response.data.transaction.amount, 20000);
}

#[test]
fn create_body_must_match_the_recording() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/create_transaction.json"));
    let body = SaveTransaction::from(TransactionInput::new(ACCOUNT_ID, "2018-01-01", 20001));
    let err = client
        .transactions()
        .create_transaction(BUDGET_ID, &body)
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
}

// ---------------------------------------------------------------------------
// PUT /budgets/{budget_id}/transactions/{transaction_id}
// ---------------------------------------------------------------------------

#[test]
fn updates_a_transaction() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/update_transaction.json"));
    let body = SaveTransaction::from(TransactionInput::new(ACCOUNT_ID, "2018-01-02", 30000));
    let response = client
        .transactions()
        .update_transaction(BUDGET_ID, "4cd63d34-3814-4f50-abd0-59ce05b40d91", &body)
        .unwrap();

    assert_eq!(response.trace.response.status, 200);
    assert_eq!(response.data.transaction.amount, 30000);
    assert_eq!(response.data.transaction.date, "2018-01-02");
}

// ---------------------------------------------------------------------------
// POST /budgets/{budget_id}/transactions/bulk
// ---------------------------------------------------------------------------

#[test]
fn bulk_creates_transactions() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/bulk_transactions.json"));
    let body = BulkTransactions::from(vec![
        TransactionInput::new(ACCOUNT_ID, "2018-01-01", 10000),
        TransactionInput::new(ACCOUNT_ID, "2018-01-02", 20000),
        TransactionInput::new(ACCOUNT_ID, "2018-01-03", 30000).with_import_id("123456"),
    ]);
    let response = client
        .transactions()
        .bulk_create_transactions(BUDGET_ID, &body)
        .unwrap();

    assert_eq!(response.trace.response.status, 201);
    assert_eq!(response.data.bulk.transaction_ids.len(), 3);
    assert_eq!(response.data.bulk.duplicate_import_ids.len(), 0);
}

// ---------------------------------------------------------------------------
// Resource accessor
// ---------------------------------------------------------------------------

#[test]
fn resources_share_the_client() {
    let client = client(ACCESS_TOKEN, include_str!("../../cassettes/transactions.json"));
    let first = client.transactions().get_transactions(BUDGET_ID).unwrap();
    let second = client.transactions().get_transactions(BUDGET_ID).unwrap();

    // each call carries its own trace; nothing is overwritten between calls
    assert_eq!(first.trace, second.trace);
    assert_eq!(client.configuration().access_token(), ACCESS_TOKEN);
}
