mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use linky_core::KvStore;
use linky_engine::{EngineConfig, LinkEngine, LinkService};
use linky_gateway::{telemetry, App, AppState};
use linky_generator::RandomGenerator;
use linky_storage::{InMemoryKv, LinkStore, RedisKv};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        password_hasher = ?config.password_hasher,
        "starting linky server"
    );

    let engine_config = EngineConfig::builder()
        .hasher(config.password_hasher.into())
        .retain_recoverable_passwords(config.retain_recoverable_passwords)
        .require_privileged_delete(config.require_privileged_delete)
        .build();

    let engine = match config.storage {
        StorageBackendArg::InMemory => {
            warn!("in-memory storage is not persisted across restarts");
            build_engine(InMemoryKv::new(), config.list_page_size, engine_config)
        }
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when storage backend is redis")?;
            let kv = RedisKv::connect(redis_url, config.redis_key_prefix.clone())
                .await
                .context("failed to connect to redis")?;
            build_engine(kv, config.list_page_size, engine_config)
        }
    };

    if config.api_key.is_none() {
        warn!("no API key configured, the /api routes reject every request");
    }

    let state = AppState::new(engine)
        .with_api_key(config.api_key)
        .with_super_secret(config.super_secret);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("linky server stopped");
    Ok(())
}

fn build_engine<K: KvStore>(
    kv: K,
    page_size: usize,
    config: EngineConfig,
) -> Arc<dyn LinkEngine> {
    Arc::new(LinkService::new(
        LinkStore::with_page_size(kv, page_size),
        RandomGenerator::new(),
        config,
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
