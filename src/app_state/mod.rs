use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::RosterStore;

pub type RosterStoreType = Arc<RwLock<dyn RosterStore + Send + Sync>>;

#[derive(Clone)]
pub struct AppState {
    pub roster_store: RosterStoreType,
}

impl AppState {
    pub fn new(roster_store: RosterStoreType) -> Self {
        Self { roster_store }
    }
}
