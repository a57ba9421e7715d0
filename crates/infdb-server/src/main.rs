mod api;
mod middleware;
mod shutdown;

use std::{future::IntoFuture, sync::Arc, time::Duration};

use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = infdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, store = ?config.store, "starting infdb-server");

    let pool_config = infdb_db::PoolConfig::from_app_config(&config);
    let pool = infdb_db::connect_pool(&config.store, pool_config).await?;
    infdb_db::run_migrations(&pool).await?;

    let app = build_app(AppState { pool: pool.clone() });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    let stop = Arc::new(Notify::new());
    let server = {
        let stop = Arc::clone(&stop);
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop.notified().await })
            .into_future()
    };
    let grace = Duration::from_secs(config.shutdown_grace_secs);

    let drain =
        shutdown::drain_on_shutdown(server, shutdown::shutdown_signal(), &stop, grace).await?;
    if drain == shutdown::Drain::TimedOut {
        tracing::warn!(
            grace_secs = grace.as_secs(),
            "grace period elapsed with requests in flight"
        );
    }

    pool.close().await;
    tracing::info!("connection pool closed, exiting");
    Ok(())
}
