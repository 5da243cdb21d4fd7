use custody_ledger::{Custody,
    backend::JsonStore,
    server::{router, AppState, ServerConfig},
    transfer::PayoutOutbox};

use anyhow::Context;

const SERVER_CONFIG: &str = "resources/server.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| SERVER_CONFIG.to_owned());
    let config = ServerConfig::read(&config_path)?;

    let store = JsonStore::new(&config.storage.ledger);
    let outbox = PayoutOutbox::new(&config.storage.payouts);
    let custody = Custody::open_or_initialize(&config.owner, store, outbox)
        .with_context(|| format!("failed to open ledger {}", config.storage.ledger.display()))?;
    log::info!("ledger owned by {}, holding {} wei", custody.owner(), custody.balance_of());

    let app = router(AppState::new(custody), config.body_limit);
    let listener = tokio::net::TcpListener::bind(config.bind).await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    log::info!("listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| "server failed")?;
    log::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {}", err);
    }
}
