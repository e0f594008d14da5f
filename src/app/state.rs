use std::sync::Arc;

use crate::{
    config::GlobalConfig,
    events::EventBroadcaster,
    managers::session::SessionLifecycleManager,
    store::{FileStore, KeyValueStore, MemoryStore},
    utils::clock::{Clock, SystemClock},
};

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionLifecycleManager,
    pub events: EventBroadcaster,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: &GlobalConfig,
    ) -> Self {
        let events = EventBroadcaster::new();
        let sessions = SessionLifecycleManager::new(
            store,
            clock.clone(),
            config.subscription,
            events.clone(),
        );

        Self {
            sessions,
            events,
            clock,
        }
    }

    /// Picks the file store when a directory is configured, memory otherwise.
    pub fn from_config(config: &GlobalConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match &config.session.store_dir {
            Some(dir) => {
                tracing::info!("Persisting session under {}", dir.display());
                let store = FileStore::open(dir).map_err(|e| {
                    anyhow::anyhow!("Failed to open session store {}: {}", dir.display(), e)
                })?;
                Arc::new(store)
            }
            None => {
                tracing::warn!("SESSION_STORE_DIR not set, session will not survive restarts");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(store, Arc::new(SystemClock), config))
    }
}
