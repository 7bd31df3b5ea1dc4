//! Leaderboard API handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use super::response::ApiQuery;
use super::SharedState;
use crate::error::SkillboardError;
use crate::models::UserView;
use crate::services::EndorserStanding;

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

/// GET /api/leaderboard/endorsers
pub async fn top_endorsers(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<LeaderboardQuery>,
) -> Result<Json<Vec<EndorserStanding>>, SkillboardError> {
    let limit = state.leaderboard.resolve_limit(query.limit);
    Ok(Json(state.services.ranking.top_endorsers(limit)?))
}

/// GET /api/leaderboard/points
pub async fn top_by_points(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<LeaderboardQuery>,
) -> Result<Json<Vec<UserView>>, SkillboardError> {
    let limit = state.leaderboard.resolve_limit(query.limit);
    Ok(Json(state.services.ranking.top_by_points(limit)?))
}
