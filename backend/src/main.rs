//! Backend entry-point: configuration, store wiring, and the HTTP server.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("configuration error: {err}"))?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("invalid WAYMARK_BIND_ADDR value")?;

    let db_pool = match settings.database_url.as_deref() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .wrap_err("failed to apply database migrations")?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to build database pool")?;
            Some(pool)
        }
        None => None,
    };

    let config = ServerConfig::new(bind_addr, settings.admin_allow_list())
        .with_db_pool(db_pool)
        .with_webhook_secret(settings.webhook_secret.clone());

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting waymark backend");
    let server = create_server(health_state, config)?;
    server.await.wrap_err("server terminated with error")
}
