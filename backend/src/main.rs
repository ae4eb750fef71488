//! Backend entry-point: loads settings, wires the in-memory adapters and
//! serves the REST API with OpenAPI docs in debug builds.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ecowaste::inbound::http::health::HealthState;
use ecowaste::settings::{BuildMode, Settings, secret_fingerprint};

use server::{ServerConfig, build_http_state, create_server, seed_demo_data};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let runtime = settings
        .resolve(BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("invalid settings: {e}")))?;
    info!(
        bind_addr = %runtime.bind_addr,
        environment = ?runtime.environment,
        fallback = ?runtime.fallback,
        jwt_secret_fingerprint = %secret_fingerprint(&runtime.jwt_secret),
        "settings resolved"
    );

    let http_state = build_http_state(&runtime);
    if runtime.seed_demo_principal {
        seed_demo_data(&http_state)
            .await
            .map_err(|e| std::io::Error::other(format!("demo seeding failed: {e}")))?;
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        http_state,
        ServerConfig::from_settings(&runtime),
    )?;
    server.await
}
