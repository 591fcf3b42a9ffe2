//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signup                -> signup
/// POST /confirm               -> confirm
/// POST /resend-code           -> resend_code
/// POST /signin                -> signin
/// POST /refresh               -> refresh
/// GET  /me                    -> me (requires auth)
/// POST /signout               -> signout (requires auth)
/// POST /forgot-password       -> forgot_password
/// POST /reset-password        -> reset_password
///
/// POST /phone/start           -> phone_start
/// POST /phone/complete        -> phone_complete
///
/// POST /link/phone            -> link_phone (requires auth)
/// POST /link/email            -> link_email (requires auth)
/// POST /attributes/send-code  -> send_attribute_code (requires auth)
/// POST /attributes/verify     -> verify_attribute (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/confirm", post(auth::confirm))
        .route("/resend-code", post(auth::resend_code))
        .route("/signin", post(auth::signin))
        .route("/refresh", post(auth::refresh))
        .route("/me", get(auth::me))
        .route("/signout", post(auth::signout))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/phone/start", post(auth::phone_start))
        .route("/phone/complete", post(auth::phone_complete))
        .route("/link/phone", post(auth::link_phone))
        .route("/link/email", post(auth::link_email))
        .route("/attributes/send-code", post(auth::send_attribute_code))
        .route("/attributes/verify", post(auth::verify_attribute))
}
