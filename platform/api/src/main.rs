use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use async_graphql::SDLExportOptions;
use common::{context::Context, logging, signal};
use tokio::{select, signal::unix::SignalKind, time};

use crate::api::v1::gql::schema;
use crate::config::DatabaseBackend;
use crate::database::{MemoryStore, PgStore, Store};

mod api;
mod config;
mod database;
mod dataloader;
mod global;


async fn setup_store(config: &config::DatabaseConfig) -> Result<Arc<dyn Store>> {
    match config.backend {
        DatabaseBackend::Postgres => {
            let store = PgStore::connect(&config.uri, config.max_connections)
                .await
                .context("failed to connect to database")?;

            if config.migrate {
                store.migrate().await.context("failed to run migrations")?;
                tracing::info!("migrations applied");
            }

            tracing::info!("connected to database");

            Ok(Arc::new(store))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("using the in-memory store, data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::AppConfig::parse()?;

    if config.export_gql {
        let schema = schema(&config.api);

        println!(
            "{}",
            schema.sdl_with_options(
                SDLExportOptions::default()
                    .include_specified_by()
                    .sorted_arguments()
                    .sorted_enum_items()
                    .sorted_fields()
            )
        );

        return Ok(());
    }

    logging::init(&config.logging.level, config.logging.mode)?;

    if let Some(file) = &config.config_file {
        tracing::info!(file = file, "loaded config from file");
    }

    tracing::debug!("config: {:#?}", config);

    let db = setup_store(&config.database).await?;

    let (ctx, handler) = Context::new();

    let global = Arc::new(global::GlobalState::new(config, db, ctx));

    let api_future = tokio::spawn(api::run(global.clone()));

    // Listen on both sigint and sigterm and cancel the context when either is received
    let mut signal_handler = signal::SignalHandler::new()
        .with_signal(SignalKind::interrupt())?
        .with_signal(SignalKind::terminate())?;

    select! {
        r = api_future => tracing::error!("api stopped unexpectedly: {:?}", r),
        _ = signal_handler.recv() => tracing::info!("shutting down"),
    }

    // We cannot have a context in scope when we cancel the handler, otherwise it will deadlock.
    drop(global);

    // Cancel the context
    tracing::info!("waiting for tasks to finish");

    select! {
        _ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
        _ = signal_handler.recv() => tracing::warn!("force shutting down"),
        _ = handler.cancel() => tracing::info!("shutting down"),
    }

    Ok(())
}
