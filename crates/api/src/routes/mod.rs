pub mod auth;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                         register with email + password
/// /auth/confirm                        confirm sign-up code
/// /auth/resend-code                    resend sign-up code
/// /auth/signin                         password sign-in
/// /auth/refresh                        refresh tokens
/// /auth/me                             current user (requires auth)
/// /auth/signout                        global sign-out (requires auth)
/// /auth/forgot-password                start password reset
/// /auth/reset-password                 finish password reset
/// /auth/phone/start                    find-or-create SMS account
/// /auth/phone/complete                 SMS sign-in token exchange
/// /auth/link/phone                     link phone number (requires auth)
/// /auth/link/email                     link email (requires auth)
/// /auth/attributes/send-code           send attribute code (requires auth)
/// /auth/attributes/verify              verify attribute (requires auth)
///
/// /projects                            paged + filtered listing
/// /projects/share/{share_code}         public share view
/// /projects/{project_id}/metadata      metadata aggregation (requires auth)
/// /projects/{project_id}/ppm           production-plan document (requires auth)
/// /projects/{project_id}/ppm/{field}   single plan field (requires auth)
/// /projects/{project_id}/script        script document (requires auth)
/// /projects/{project_id}/assets        assets document (requires auth)
/// /projects/{project_id}/creative-brief  creative brief (requires auth)
/// /projects/{project_id}/assets-script   assets + script text (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and account management.
        .nest("/auth", auth::router())
        // Project listing, sharing, and S3-backed content.
        .nest("/projects", project::router())
}
