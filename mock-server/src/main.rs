use mock_server::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_BUDGET_ID: &str = "f419ac25-6217-4175-88dc-c3136ff5f6fd";

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let token = std::env::var("MOCK_ACCESS_TOKEN").unwrap_or_else(|_| "test-token".to_string());
    let budgets = std::env::var("MOCK_BUDGET_IDS").unwrap_or_else(|_| DEFAULT_BUDGET_ID.to_string());
    let budget_ids: Vec<String> = budgets
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, budgets = budget_ids.len(), "listening");
    mock_server::run(listener, AppState::new(&token, budget_ids)).await
}
