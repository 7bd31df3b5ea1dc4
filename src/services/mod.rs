//! Service layer for skillboard
//!
//! Services hold the business logic between HTTP handlers and the store.
//!
//! ```text
//! HTTP Handlers (thin)
//!     ↓
//! DirectoryService / ScoringEngine / RankingService
//!     ↓
//! EntityStore (one RwLock over all tables)
//! ```

pub mod directory;
pub mod events;
pub mod ranking;
pub mod scoring;

pub use directory::{DirectoryService, EndorsementDetails};
pub use events::{spawn_logging_listener, EventBus, EventListener, ScoringEvent};
pub use ranking::{EndorserStanding, RankingService, UserStats};
pub use scoring::{ScoringEngine, SkillDeletion};

use crate::config::ScoringConfig;
use crate::store::EntityStore;
use std::sync::Arc;

/// Service container shared by the HTTP handlers
pub struct Services {
    pub directory: Arc<DirectoryService>,
    pub scoring: Arc<ScoringEngine>,
    pub ranking: Arc<RankingService>,
    pub events: Arc<EventBus>,
    pub store: Arc<EntityStore>,
}

impl Services {
    /// Create all services over a shared store
    pub fn new(store: Arc<EntityStore>, scoring: ScoringConfig) -> Self {
        let events = Arc::new(EventBus::new());

        Self {
            directory: Arc::new(DirectoryService::new(store.clone())),
            scoring: Arc::new(ScoringEngine::new(store.clone(), events.clone(), scoring)),
            ranking: Arc::new(RankingService::new(store.clone())),
            events,
            store,
        }
    }

    /// Services over a fresh, empty store
    pub fn in_memory(scoring: ScoringConfig) -> Self {
        Self::new(Arc::new(EntityStore::new()), scoring)
    }
}
