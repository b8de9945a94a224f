//! Application state shared by every handler.

use intake_core::Config;
use intake_processing::Ingestor;
use intake_storage::Storage;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub ingestor: Ingestor,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, ingestor: Ingestor) -> Self {
        let storage = ingestor.storage().clone();
        Self {
            config,
            ingestor,
            storage,
        }
    }
}
