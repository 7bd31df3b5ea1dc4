//! User API handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::response::{created, ApiJson, ApiPath};
use super::SharedState;
use crate::error::SkillboardError;
use crate::models::{EntityId, NewUser, UserPatch, UserView};
use crate::services::UserStats;

/// GET /api/users
pub async fn list_users(
    State(state): State<SharedState>,
) -> Result<Json<Vec<UserView>>, SkillboardError> {
    Ok(Json(state.services.directory.list_users()?))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<SharedState>,
    ApiJson(input): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<UserView>), SkillboardError> {
    Ok(created(state.services.directory.create_user(input)?))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<UserView>, SkillboardError> {
    Ok(Json(state.services.directory.get_user(id)?))
}

/// GET /api/users/by-username/:username
pub async fn get_user_by_username(
    State(state): State<SharedState>,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<UserView>, SkillboardError> {
    Ok(Json(state.services.directory.find_user_by_username(&username)?))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<UserView>, SkillboardError> {
    Ok(Json(state.services.directory.update_user(id, patch)?))
}

/// GET /api/users/:id/stats
pub async fn get_user_stats(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<UserStats>, SkillboardError> {
    Ok(Json(state.services.ranking.user_stats(id)?))
}
