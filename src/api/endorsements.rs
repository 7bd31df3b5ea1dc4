//! Endorsement API handlers

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use super::response::{created, ApiJson, ApiPath, Success};
use super::SharedState;
use crate::error::SkillboardError;
use crate::models::{Endorsement, EntityId, NewEndorsement};
use crate::services::EndorsementDetails;

/// GET /api/endorsements/user/:user_id - endorsements received
pub async fn list_received(
    State(state): State<SharedState>,
    ApiPath(user_id): ApiPath<EntityId>,
) -> Result<Json<Vec<EndorsementDetails>>, SkillboardError> {
    Ok(Json(state.services.directory.endorsements_received(user_id)?))
}

/// GET /api/endorsements/given/:user_id
pub async fn list_given(
    State(state): State<SharedState>,
    ApiPath(user_id): ApiPath<EntityId>,
) -> Result<Json<Vec<EndorsementDetails>>, SkillboardError> {
    Ok(Json(state.services.directory.endorsements_given(user_id)?))
}

/// GET /api/endorsements/skill/:skill_id
pub async fn list_for_skill(
    State(state): State<SharedState>,
    ApiPath(skill_id): ApiPath<EntityId>,
) -> Result<Json<Vec<EndorsementDetails>>, SkillboardError> {
    Ok(Json(state.services.directory.endorsements_for_skill(skill_id)?))
}

/// POST /api/endorsements
pub async fn create_endorsement(
    State(state): State<SharedState>,
    ApiJson(input): ApiJson<NewEndorsement>,
) -> Result<(StatusCode, Json<Endorsement>), SkillboardError> {
    Ok(created(state.services.scoring.endorse_skill(input)?))
}

/// DELETE /api/endorsements/:id
pub async fn delete_endorsement(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Success>, SkillboardError> {
    state.services.scoring.remove_endorsement(id)?;
    Ok(Success::ok())
}
