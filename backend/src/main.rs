//! Backend entry-point: loads configuration, opens the store, seeds the
//! administrator and serves the journal API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gratitude::config::JournalConfig;
use gratitude::domain::AdminCredentials;
use gratitude::inbound::http::health::HealthState;
use gratitude::inbound::http::session_config::{BuildMode, session_settings_from_env};
use server::{ServerConfig, build_analyst, build_http_state, build_store, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = JournalConfig::load().map_err(|e| eyre!("failed to load configuration: {e}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = config.bind_addr()?;

    let store = build_store(&config)?;
    let analyst = build_analyst(&config)?;
    let admin = AdminCredentials::new(config.admin_email()?, config.admin_passcode());
    let http_state = build_http_state(&store, admin, Arc::new(DefaultClock), analyst);

    let administrator = http_state
        .users
        .ensure_administrator()
        .await
        .map_err(|e| eyre!("failed to seed administrator: {}", e.message()))?;
    info!(id = %administrator.id(), "administrator ready");

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        http_state,
        ServerConfig::new(
            session.key,
            session.cookie_secure,
            session.same_site,
            bind_addr,
        ),
    )
    .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "journal listening");

    server.await.wrap_err("server terminated with an error")
}
