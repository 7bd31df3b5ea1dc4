//! Skill API handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;

use super::response::{created, ApiJson, ApiPath, Success};
use super::SharedState;
use crate::error::SkillboardError;
use crate::models::{BulkSkillsRequest, EntityId, NewSkill, Skill, SkillPatch};

/// GET /api/skills
pub async fn list_skills(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Skill>>, SkillboardError> {
    Ok(Json(state.services.directory.list_skills()?))
}

/// GET /api/skills/user/:user_id
pub async fn list_user_skills(
    State(state): State<SharedState>,
    ApiPath(user_id): ApiPath<EntityId>,
) -> Result<Json<Vec<Skill>>, SkillboardError> {
    Ok(Json(state.services.directory.skills_of(user_id)?))
}

/// POST /api/skills
pub async fn create_skill(
    State(state): State<SharedState>,
    ApiJson(input): ApiJson<NewSkill>,
) -> Result<(StatusCode, Json<Skill>), SkillboardError> {
    Ok(created(state.services.scoring.add_skill(input)?))
}

/// POST /api/skills/bulk
pub async fn create_skills_bulk(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<BulkSkillsRequest>,
) -> Result<(StatusCode, Json<Vec<Skill>>), SkillboardError> {
    let skills = state.services.scoring.add_skills_bulk_payload(request)?;
    info!(count = skills.len(), "Bulk skill import");
    Ok(created(skills))
}

/// PUT /api/skills/:id
pub async fn update_skill(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(patch): ApiJson<SkillPatch>,
) -> Result<Json<Skill>, SkillboardError> {
    Ok(Json(state.services.directory.update_skill(id, patch)?))
}

/// DELETE /api/skills/:id
pub async fn delete_skill(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Success>, SkillboardError> {
    state.services.scoring.delete_skill(id)?;
    Ok(Success::ok())
}
