//! HTTP response helpers
//!
//! Maps `SkillboardError` onto status codes with a consistent JSON body, and
//! provides body, path and query extractors whose failures use that same shape.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

use crate::error::{FieldError, SkillboardError};

/// Error body: `{"error": "...", "details": [{"field": ..., "message": ...}]}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

/// Body of a successful delete
#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

impl SkillboardError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SkillboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::InvalidInput { message, details } => ErrorBody {
                error: message,
                details,
            },
            Self::Internal(msg) => {
                error!(error = %msg, "Internal failure");
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: Vec::new(),
                }
            }
            not_found => ErrorBody {
                error: not_found.to_string(),
                details: Vec::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for SkillboardError {
    fn from(rejection: JsonRejection) -> Self {
        SkillboardError::invalid_field("Invalid request body", "body", rejection.body_text())
    }
}

impl From<PathRejection> for SkillboardError {
    fn from(rejection: PathRejection) -> Self {
        SkillboardError::invalid_field("Invalid path parameter", "path", rejection.body_text())
    }
}

impl From<QueryRejection> for SkillboardError {
    fn from(rejection: QueryRejection) -> Self {
        SkillboardError::invalid_field("Invalid query string", "query", rejection.body_text())
    }
}

/// `Json<T>` whose rejections are reported as `InvalidInput` (400)
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = SkillboardError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Path<T>` whose rejections are reported as `InvalidInput` (400)
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = SkillboardError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `Query<T>` whose rejections are reported as `InvalidInput` (400)
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = SkillboardError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// 201 Created with a JSON body
pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(body))
}
