use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tumor_compare::config::AppConfig;
use tumor_compare::handlers::{self, AppState};
use tumor_compare::state::Session;
use tumor_compare::{Aggregator, HttpBackend, MODELS};

#[derive(Debug, Parser)]
#[command(name = "tumor-compare", about = "Compare brain MRI classifiers side by side")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "config/config.toml")]
    config: PathBuf,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from_path(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&config.logging.level))
                .context("Invalid log filter")?,
        )
        .init();

    let backend = HttpBackend::new(&config.backend.base_url, config.backend.timeout())
        .context("Failed to create HTTP client")?;
    info!(
        base_url = %config.backend.base_url,
        timeout_ms = config.backend.timeout_ms,
        models = ?MODELS,
        "prediction backends configured"
    );

    let state = web::Data::new(AppState {
        session: Session::new(),
        aggregator: Aggregator::new(Arc::new(backend)),
        max_upload_bytes: config.upload.max_bytes,
    });

    let (host, port) = config.bind_addr();
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .workers(config.server.workers)
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {}:{}", host, port))?
    .run()
    .await
    .context("Server terminated with error")
}
