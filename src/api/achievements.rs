//! Achievement API handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::response::{created, ApiJson, ApiPath};
use super::SharedState;
use crate::error::SkillboardError;
use crate::models::{Achievement, EntityId, NewAchievement};

/// GET /api/achievements/user/:user_id
pub async fn list_user_achievements(
    State(state): State<SharedState>,
    ApiPath(user_id): ApiPath<EntityId>,
) -> Result<Json<Vec<Achievement>>, SkillboardError> {
    Ok(Json(state.services.directory.achievements_of(user_id)?))
}

/// POST /api/achievements
pub async fn create_achievement(
    State(state): State<SharedState>,
    ApiJson(input): ApiJson<NewAchievement>,
) -> Result<(StatusCode, Json<Achievement>), SkillboardError> {
    Ok(created(state.services.scoring.grant_achievement(input)?))
}
