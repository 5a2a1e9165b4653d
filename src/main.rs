//! envmon HTTP server entry point

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use envmon::config::Settings;
use envmon::handlers;
use envmon::regeneration::{FileMarkerStore, MarkerStore, MemoryMarkerStore};
use envmon::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenv::dotenv().ok();

    // Logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,envmon=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();

    // Load configuration
    let settings = Settings::from_env().context("Failed to load configuration")?;
    let bind_address = format!("{}:{}", settings.server.host, settings.server.port);

    info!("Starting envmon backend");
    info!("Binding server to {}", bind_address);

    let markers: Box<dyn MarkerStore> = match &settings.storage.marker_path {
        Some(path) => Box::new(FileMarkerStore::new(path)),
        None => Box::new(MemoryMarkerStore::new()),
    };

    let mut state = AppState::with_store(markers, settings.generator.clone());
    if let Some(today) = settings.clock.today.as_deref() {
        state
            .override_today(Some(today))
            .context("Invalid ENVMON_CLOCK__TODAY")?;
    }

    // Shared application state
    let app_state = Arc::new(RwLock::new(state));

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure_routes)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await?;

    Ok(())
}
