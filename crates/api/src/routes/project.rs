//! Route definitions for the `/projects` resource.
//!
//! Also mounts the project-scoped content routes under
//! `/projects/{project_id}/...`, all of which require a bearer token.

use axum::routing::get;
use axum::Router;

use crate::handlers::{content, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET /                              -> list
/// GET /share/{share_code}            -> share
///
/// GET /{project_id}/metadata         -> metadata (requires auth)
/// GET /{project_id}/ppm              -> ppm (requires auth)
/// GET /{project_id}/ppm/{field}      -> ppm_field (requires auth)
/// GET /{project_id}/script           -> script (requires auth)
/// GET /{project_id}/assets           -> assets (requires auth)
/// GET /{project_id}/creative-brief   -> creative_brief (requires auth)
/// GET /{project_id}/assets-script    -> assets_script (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    let content_routes = Router::new()
        .route("/metadata", get(content::metadata))
        .route("/ppm", get(content::ppm))
        .route("/ppm/{field}", get(content::ppm_field))
        .route("/script", get(content::script))
        .route("/assets", get(content::assets))
        .route("/creative-brief", get(content::creative_brief))
        .route("/assets-script", get(content::assets_script));

    Router::new()
        .route("/", get(project::list))
        .route("/share/{share_code}", get(project::share))
        .nest("/{project_id}", content_routes)
}
