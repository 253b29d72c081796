//! SimShop API server.
//!
//! Configuration comes from the TOML file named by `SIMSHOP_CONFIG` (optional)
//! plus `SIMSHOP_*` environment overrides; a `.env` file is read first.

use std::path::PathBuf;

use actix_web::HttpServer;
use anyhow::Context;
use tracing::{info, warn};

use simshop_core::telemetry::init_tracing;
use simshop_core::ShopConfig;
use simshop_server::{build_app, provision_admin, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env file: {e}");
        }
    }

    let config_path = std::env::var_os("SIMSHOP_CONFIG").map(PathBuf::from);
    let config = ShopConfig::load(config_path.as_deref()).context("loading configuration")?;
    init_tracing(&config.observability);

    let state = AppState::new(config.clone()).context("opening the database")?;
    if let Some(admin) = &config.auth.bootstrap_admin {
        provision_admin(&state.users, admin)
            .await
            .context("provisioning the bootstrap admin")?;
    }
    if config.storage.path.is_none() {
        warn!("using an in-memory database; data is lost on shutdown");
    }

    let address = config.server.bind_address();
    let mut server = HttpServer::new(move || build_app(state.clone()));
    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    info!(address = %address, "SimShop API listening");
    server
        .bind(&address)
        .with_context(|| format!("binding {address}"))?
        .run()
        .await
        .context("server terminated")?;

    info!("server stopped");
    Ok(())
}
