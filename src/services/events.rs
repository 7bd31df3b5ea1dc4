//! Event system for scoring mutations
//!
//! Every point-, count- or level-affecting write emits a [`ScoringEvent`].
//! Events go out after the store lock is released, so listeners never
//! observe a half-applied mutation.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use crate::models::EntityId;

/// Events emitted by the scoring engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoringEvent {
    SkillAdded {
        skill_id: EntityId,
        user_id: EntityId,
        name: String,
    },
    SkillsBulkAdded {
        user_id: EntityId,
        count: usize,
        skill_ids: Vec<EntityId>,
    },
    SkillDeleted {
        skill_id: EntityId,
        user_id: EntityId,
        removed_endorsements: usize,
    },
    EndorsementCreated {
        endorsement_id: EntityId,
        skill_id: EntityId,
        endorser_id: EntityId,
        endorsee_id: EntityId,
    },
    EndorsementRemoved {
        endorsement_id: EntityId,
        skill_id: EntityId,
    },
    AchievementGranted {
        achievement_id: EntityId,
        user_id: EntityId,
        points: u64,
    },
    PointsAwarded {
        user_id: EntityId,
        amount: u64,
        total: u64,
    },
    LevelUp {
        user_id: EntityId,
        from: u64,
        to: u64,
    },
}

/// Trait for event listeners
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &ScoringEvent);
}

/// Event bus for broadcasting scoring events
pub struct EventBus {
    sender: broadcast::Sender<ScoringEvent>,
}

impl EventBus {
    /// Create a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: ScoringEvent) {
        trace!(event = ?event, "Emitting scoring event");
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ScoringEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Logging event listener for audit trails
pub struct LoggingEventListener;

impl EventListener for LoggingEventListener {
    fn on_event(&self, event: &ScoringEvent) {
        match event {
            ScoringEvent::SkillAdded {
                skill_id,
                user_id,
                name,
            } => {
                info!(skill_id, user_id, name = %name, "Skill added");
            }
            ScoringEvent::SkillsBulkAdded { user_id, count, .. } => {
                info!(user_id, count, "Skills imported");
            }
            ScoringEvent::SkillDeleted {
                skill_id,
                removed_endorsements,
                ..
            } => {
                info!(skill_id, removed_endorsements, "Skill deleted");
            }
            ScoringEvent::EndorsementCreated {
                skill_id,
                endorser_id,
                endorsee_id,
                ..
            } => {
                info!(skill_id, endorser_id, endorsee_id, "Skill endorsed");
            }
            ScoringEvent::LevelUp { user_id, from, to } => {
                info!(user_id, from, to, "User leveled up");
            }
            _ => {
                debug!(event = ?event, "Scoring event");
            }
        }
    }
}

/// Spawn a background task that logs all events
pub fn spawn_logging_listener(event_bus: Arc<EventBus>) -> tokio::task::JoinHandle<()> {
    let mut receiver = event_bus.subscribe();
    let listener = LoggingEventListener;

    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => listener.on_event(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "Event listener lagged, skipped events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("Event bus closed, stopping listener");
                    break;
                }
            }
        }
    })
}
