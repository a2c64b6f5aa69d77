pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod reconcile;
pub mod server;
pub mod service;
pub mod state;

pub use config::{AppConfig, LoggingConfig, ServerConfig, StorageConfig, load_config};
pub use observability::init_tracing;
pub use reconcile::{DeleteOutcome, ResourceRepository, UpdateOutcome};
pub use server::{ServerBuilder, TiendaServer, build_app};
pub use state::AppState;
