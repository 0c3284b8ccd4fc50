use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use water_level_logger::{
    api::{self, AppState},
    clock::{Clock, SystemClock},
    config::Config,
    db::{self, PgStore, ReadingStore},
    sensors::{Poller, SensorClient},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent, env vars may be set externally)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;
    info!(
        host = %config.db_host,
        database = %config.db_name,
        max_connections = config.db_max_connections,
        "Database ready"
    );

    let store: Arc<dyn ReadingStore> = Arc::new(PgStore::new(pool.clone(), config.db_timeout));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Hourly sensor poll, stopped through the watch channel on shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let client = SensorClient::new(&config.sensor_url, config.sensor_timeout)?;
    let poller = Poller::new(Arc::new(client), store.clone(), clock.clone());
    let poll_task = tokio::spawn(poller.run(shutdown_rx));

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Logger server listening");

    axum::serve(listener, api::router(AppState::new(store, clock)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = poll_task.await {
        warn!(error = %e, "Sensor polling task ended abnormally");
    }
    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
