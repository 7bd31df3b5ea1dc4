//! HTTP API - thin axum handlers over the service layer
//!
//! Provides:
//! - User directory, profile and stats endpoints
//! - Skill and endorsement endpoints (point-awarding writes go to the scoring engine)
//! - Achievement endpoints
//! - Leaderboards

pub mod achievements;
pub mod endorsements;
pub mod leaderboard;
pub mod response;
pub mod skills;
pub mod users;

use axum::{
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::LeaderboardConfig;
use crate::services::Services;

/// State shared across handlers
pub struct AppState {
    pub services: Services,
    pub leaderboard: LeaderboardConfig,
}

impl AppState {
    pub fn new(services: Services, leaderboard: LeaderboardConfig) -> Self {
        Self {
            services,
            leaderboard,
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Create the API router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/by-username/:username",
            get(users::get_user_by_username),
        )
        .route("/api/users/:id", get(users::get_user).put(users::update_user))
        .route("/api/users/:id/stats", get(users::get_user_stats))
        // Skills
        .route("/api/skills", get(skills::list_skills).post(skills::create_skill))
        .route("/api/skills/bulk", post(skills::create_skills_bulk))
        .route("/api/skills/user/:user_id", get(skills::list_user_skills))
        .route(
            "/api/skills/:id",
            put(skills::update_skill).delete(skills::delete_skill),
        )
        // Endorsements
        .route("/api/endorsements", post(endorsements::create_endorsement))
        .route(
            "/api/endorsements/:id",
            axum::routing::delete(endorsements::delete_endorsement),
        )
        .route("/api/endorsements/user/:user_id", get(endorsements::list_received))
        .route("/api/endorsements/given/:user_id", get(endorsements::list_given))
        .route("/api/endorsements/skill/:skill_id", get(endorsements::list_for_skill))
        // Achievements
        .route("/api/achievements", post(achievements::create_achievement))
        .route(
            "/api/achievements/user/:user_id",
            get(achievements::list_user_achievements),
        )
        // Leaderboards
        .route("/api/leaderboard/endorsers", get(leaderboard::top_endorsers))
        .route("/api/leaderboard/points", get(leaderboard::top_by_points))
        // Health check
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}
