//! desk-mock: local development backend
//!
//! Environment:
//! - `MOCK_HTTP_PORT` (default 8080)
//! - `MOCK_JWT_SECRET` (default: built-in development secret)

use desk_mock::{AppState, DEFAULT_JWT_SECRET, MockStore, api, demo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desk_mock=info,tower_http=info".into()),
        )
        .init();

    let port: u16 = std::env::var("MOCK_HTTP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let secret = std::env::var("MOCK_JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string());

    let state = AppState::new(MockStore::seed_demo(), secret);
    let app = api::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("desk-mock listening on http://{addr}/api");
    tracing::info!(
        "Demo accounts: {} / {}, {} / {}, {} / {}",
        demo::CUSTOMER_EMAIL,
        demo::CUSTOMER_PASSWORD,
        demo::AGENT_EMAIL,
        demo::AGENT_PASSWORD,
        demo::ADMIN_EMAIL,
        demo::ADMIN_PASSWORD
    );

    axum::serve(listener, app).await?;
    Ok(())
}
