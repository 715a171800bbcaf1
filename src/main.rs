use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use orders::modules::outbox::relay::scheduler::OutboxRelay;
use orders::shared::infrastructure::event_bus::{
    EventPublisher, HttpEventPublisher, LogPublisher,
};
use orders::shared::infrastructure::in_memory::InMemoryStore;
use orders::shell;
use orders::shell::config::AppConfig;
use orders::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = AppConfig::from_env()?;

    let store = Arc::new(InMemoryStore::new());
    let publisher: Arc<dyn EventPublisher> = match &config.publisher_url {
        Some(url) => Arc::new(HttpEventPublisher::new(url.clone(), "orders_producer")),
        None => Arc::new(LogPublisher),
    };
    let relay = Arc::new(OutboxRelay::new(
        store.clone(),
        publisher,
        config.outbox.relay_config(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let relay_task = shell::workers::spawn_relay(relay.clone(), shutdown_rx);

    let state = AppState::new(store, relay);
    let app = shell::http::router(state);

    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    tracing::info!("listening on http://{}", config.http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    let _ = shutdown_tx.send(true);
    let _ = relay_task.await;
    Ok(())
}
