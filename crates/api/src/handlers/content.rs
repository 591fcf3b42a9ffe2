//! Handlers for project metadata and S3-resident content.
//!
//! Every endpoint here is keyed by `(authenticated user, project_id)`; the
//! metadata item lookup doubles as the authorization check, so a project
//! belonging to someone else is indistinguishable from a missing one.

use axum::extract::{Path, State};
use axum::Json;
use portal_aws::metadata::ProjectMetadata;
use portal_aws::projects::TextContent;
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/metadata
pub async fn metadata(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> AppResult<Json<ProjectMetadata>> {
    let meta = state.content.metadata(project_id, &auth.sub).await?;
    Ok(Json(meta))
}

/// GET /api/v1/projects/{project_id}/ppm
pub async fn ppm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let document = state.content.ppm(project_id, &auth.sub).await?;
    Ok(Json(document))
}

/// GET /api/v1/projects/{project_id}/ppm/{field}
///
/// Projects a single top-level PPM field; the response is an object keyed
/// by the field name.
pub async fn ppm_field(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, field)): Path<(i64, String)>,
) -> AppResult<Json<Value>> {
    let value = state.content.ppm_field(project_id, &auth.sub, &field).await?;
    Ok(Json(value))
}

/// GET /api/v1/projects/{project_id}/script
pub async fn script(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let document = state.content.script(project_id, &auth.sub).await?;
    Ok(Json(document))
}

/// GET /api/v1/projects/{project_id}/assets
pub async fn assets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> AppResult<Json<Value>> {
    let listing = state.content.assets(project_id, &auth.sub).await?;
    Ok(Json(listing))
}

/// GET /api/v1/projects/{project_id}/creative-brief
pub async fn creative_brief(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> AppResult<Json<TextContent>> {
    let content = state.content.creative_brief(project_id, &auth.sub).await?;
    Ok(Json(content))
}

/// GET /api/v1/projects/{project_id}/assets-script
pub async fn assets_script(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
) -> AppResult<Json<TextContent>> {
    let content = state.content.assets_script(project_id, &auth.sub).await?;
    Ok(Json(content))
}
