mod config;
mod scheduler;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use stillwater_api::push::HttpPushTransport;
use stillwater_api::routes::router;
use stillwater_api::state::{AppState, AppStateInner};

use crate::config::{Config, DEV_JWT_SECRET};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stillwater=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.jwt_secret == DEV_JWT_SECRET {
        warn!("STILLWATER_JWT_SECRET is unset; using the development placeholder");
    }
    if config.cron_secret.is_none() {
        warn!("STILLWATER_CRON_SECRET is unset; /send-notifications is open to anyone");
    }

    // Init database
    let db = stillwater_db::Database::open(&config.db_path)?;
    let push = Arc::new(HttpPushTransport::new(config.push_timeout)?);

    let state: AppState = Arc::new(AppStateInner {
        db,
        push,
        jwt_secret: config.jwt_secret.clone(),
        cron_secret: config.cron_secret.clone(),
        app_url: config.app_url.clone(),
        clock_offset: config.clock_offset,
    });

    if config.scheduler {
        info!("Built-in scheduler enabled (clock offset {})", config.clock_offset);
        tokio::spawn(scheduler::run_scheduler_loop(state.clone()));
    }

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Stillwater server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
