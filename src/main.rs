use std::sync::Arc;

use crate::api::state::AppState;
use crate::clients::plan_service::PlanClient;
use crate::config::Config;
use crate::services::coaching::CoachingService;
use crate::storage::stores::Stores;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

mod api;
mod clients;
mod config;
mod models;
mod services;
mod storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let backend: Arc<dyn KeyValueStore> = if config.ephemeral_storage {
        tracing::warn!("storage.ephemeral");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!(data_dir = %config.data_dir.display(), "storage.file");
        Arc::new(FileStore::new(&config.data_dir)?)
    };

    let plan_client = PlanClient::new(&config)?;
    let coaching_service = CoachingService::new(plan_client);
    let state = AppState::restore(coaching_service, Stores::new(backend));

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(
        port = %config.port,
        plan_service = %config.plan_service_url,
        "server.listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
