use std::sync::Arc;

use tienda_auth::AuthState;
use tienda_db_memory::InMemoryStore;
use tienda_storage::DynStore;

use crate::config::AppConfig;
use crate::reconcile::ResourceRepository;

/// Shared application state: one repository per collection over a single
/// injected store, plus the auth service.
#[derive(Clone)]
pub struct AppState {
    pub clients: ResourceRepository,
    pub products: ResourceRepository,
    pub auth: Arc<AuthState>,
}

impl AppState {
    /// Builds state from config. Only the in-memory backend exists today;
    /// `AppConfig::validate` rejects anything else before we get here.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, anyhow::Error> {
        let store: DynStore = Arc::new(InMemoryStore::new());
        tracing::info!(backend = store.backend_name(), "storage backend initialized");
        let auth = Arc::new(AuthState::from_config(cfg.auth.clone())?);
        Ok(Self::with_store(store, auth))
    }

    pub fn with_store(store: DynStore, auth: Arc<AuthState>) -> Self {
        Self {
            clients: ResourceRepository::new(store.clone(), "clients"),
            products: ResourceRepository::new(store, "products"),
            auth,
        }
    }
}
