//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Cognito access token in the
/// `Authorization` header.
///
/// The token is validated against Cognito on every request; there is no
/// local session store. Use this as an extractor parameter in any handler
/// that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user = %user.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity-provider subject. Doubles as the metadata partition key.
    pub sub: String,
    pub username: String,
    /// The raw access token, needed by sign-out.
    pub access_token: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let profile = state.identity.get_user(token).await?;

        let sub = profile
            .sub()
            .ok_or_else(|| AppError::Unauthorized("Access token has no subject".into()))?
            .to_string();

        Ok(AuthUser {
            sub,
            username: profile.username,
            access_token: token.to_string(),
        })
    }
}
