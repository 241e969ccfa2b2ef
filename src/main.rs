use std::time::Duration;

use ems::{app, auth::tokens::run_denylist_purge, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "ems=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;

    tokio::spawn(run_denylist_purge(
        app_state.tokens.clone(),
        Duration::from_secs(app_state.config.denylist_purge_interval_secs.max(1)),
    ));

    let addr = app_state.config.listen_addr()?;
    app::serve(app::build_app(app_state), addr).await
}
