/// Shared application state
use crate::services::SessionService;
use std::sync::Arc;
use top100_catalog::CatalogClient;
use top100_core::StorageContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn StorageContext>,
    pub sessions: Arc<SessionService>,
    pub catalog: Arc<CatalogClient>,
}

impl AppState {
    pub fn new(
        db: Arc<dyn StorageContext>,
        sessions: Arc<SessionService>,
        catalog: Arc<CatalogClient>,
    ) -> Self {
        Self {
            db,
            sessions,
            catalog,
        }
    }
}
