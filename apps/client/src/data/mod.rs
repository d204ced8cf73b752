// Data-access layer: every page reads through `queries` (cached, keyed,
// connection-gated) and writes through `commands` (validated, invalidating).
// No handler touches the RemoteService trait directly.

mod commands;
mod queries;

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::cache::QueryCache;
use crate::models::Principal;
use crate::service::RemoteService;

/// Identity-bound backend connection, established at login.
#[derive(Clone)]
pub struct Connection {
    pub identity: Principal,
    pub service: Arc<dyn RemoteService>,
}

/// The process-wide data layer: one query cache plus the current connection.
/// Queries are disabled (report `Pending`, fetch nothing) until a connection
/// exists; commands fail fast without one.
pub struct DataLayer {
    cache: QueryCache,
    connection: RwLock<Option<Connection>>,
}

impl DataLayer {
    pub fn new() -> Self {
        Self {
            cache: QueryCache::new(),
            connection: RwLock::new(None),
        }
    }

    /// Binds the service handle for `identity`. Replaces any previous
    /// connection and drops its cached state.
    pub fn connect(&self, identity: Principal, service: Arc<dyn RemoteService>) {
        info!("backend connection established for {identity}");
        self.cache.clear();
        *self.connection.write().unwrap() = Some(Connection { identity, service });
    }

    /// Tears the connection down and drops all cached state.
    pub fn disconnect(&self) {
        let previous = self.connection.write().unwrap().take();
        if let Some(conn) = previous {
            info!("backend connection closed for {}", conn.identity);
        }
        self.cache.clear();
    }

    pub fn identity(&self) -> Option<Principal> {
        self.connection
            .read()
            .unwrap()
            .as_ref()
            .map(|conn| conn.identity.clone())
    }

    fn connection(&self) -> Option<Connection> {
        self.connection.read().unwrap().clone()
    }
}

impl Default for DataLayer {
    fn default() -> Self {
        Self::new()
    }
}
