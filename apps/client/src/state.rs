use std::sync::Arc;

use crate::config::Config;
use crate::data::DataLayer;
use crate::service::ServiceConnector;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Cached read/write layer over the backend; one instance per process.
    pub data: Arc<DataLayer>,
    /// Builds identity-bound backend handles at login time.
    pub connector: Arc<dyn ServiceConnector>,
    pub config: Config,
}
