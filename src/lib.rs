pub mod config;
pub mod controller;
pub mod error;
pub mod generator;
pub mod models;
pub mod prompt;
pub mod repository;
pub mod session;
pub mod storage;
pub mod templates;
pub mod transport;
pub mod visual;

use std::sync::Arc;

use crate::config::Config;
use crate::controller::GeneratorController;
use crate::error::Result;
use crate::generator::TopicClient;
use crate::repository::{ConfigStore, FavoritesStore};
use crate::storage::{FileStorage, LocalStorage};
use crate::transport::{HttpTransport, Transport};

/// Wire the HTTP transport and file storage described by `cfg` into a controller
pub fn build_controller(cfg: &Config) -> Result<GeneratorController> {
    let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(&cfg.storage.data_dir));
    tracing::info!("Using data directory {}", cfg.storage.data_dir.display());

    let transport = Arc::new(HttpTransport::new()?);
    let client = TopicClient::new(transport as Arc<dyn Transport>, cfg.generation);

    Ok(GeneratorController::new(
        Arc::new(client),
        ConfigStore::new(Arc::clone(&storage), cfg.api.to_api_config()),
        FavoritesStore::new(storage),
    ))
}
