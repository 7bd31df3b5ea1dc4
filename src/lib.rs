//! Skillboard - skill tracking, peer endorsements and points
//!
//! ## Architecture
//!
//! - **Entity Store**: in-memory tables for users, skills, endorsements and
//!   achievements behind a single lock
//! - **Scoring Engine**: the only writer of points and endorsement counts;
//!   each operation is one atomic step over the store
//! - **Ranking Service**: read-only ranks, leaderboards and user stats
//! - **HTTP API**: axum handlers mapping REST routes onto the services
//!
//! ## Points
//!
//! | Event                  | Points |
//! |------------------------|--------|
//! | skill added            | +10    |
//! | endorsement given      | +5     |
//! | endorsement received   | +15    |
//! | achievement granted    | +n     |
//!
//! A user's level is `points / 100 + 1`, computed on every read.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod seed;
pub mod services;
pub mod store;

// Re-exports
pub use api::{create_router, AppState, SharedState};
pub use config::Config;
pub use error::{FieldError, Result, SkillboardError};
pub use services::{DirectoryService, RankingService, ScoringEngine, Services};
pub use store::EntityStore;
