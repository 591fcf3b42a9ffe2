use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portal_aws::content::FetchError;
use portal_aws::identity::IdentityError;
use portal_aws::metadata::StoreError;
use portal_aws::projects::ProjectDataError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the service-layer errors from `portal_aws` and `sqlx` and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A project-data aggregation error (DynamoDB/S3).
    #[error(transparent)]
    Content(#[from] ProjectDataError),

    /// An identity-provider error (Cognito).
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A resource lookup that found nothing.
    #[error("{0}")]
    NotFound(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing or malformed credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Project-data errors ---
            AppError::Content(err) => classify_content_error(err),

            // --- Identity errors ---
            AppError::Identity(err) => classify_identity_error(err),

            // --- HTTP-specific errors ---
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Classify a project-data error into an HTTP status, error code, and message.
///
/// Missing items, missing references, and missing S3 objects are all 404s.
/// An invalid stored reference is a data defect on our side, not the
/// caller's, so it maps to 500. Transport exhaustion maps to 502.
fn classify_content_error(err: &ProjectDataError) -> (StatusCode, &'static str, String) {
    match err {
        ProjectDataError::ProjectNotFound
        | ProjectDataError::RefMissing(_)
        | ProjectDataError::ObjectMissing(_)
        | ProjectDataError::FieldMissing(_) => {
            (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
        }
        ProjectDataError::RefInvalid(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INVALID_REFERENCE",
            err.to_string(),
        ),
        ProjectDataError::Store(StoreError::Transport(_))
        | ProjectDataError::Fetch(FetchError::Transport(_)) => {
            tracing::error!(error = %err, "Upstream storage unreachable");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "Upstream service unavailable".to_string(),
            )
        }
        ProjectDataError::Store(_) | ProjectDataError::Fetch(_) => {
            tracing::error!(error = %err, "Project data error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Failed to fetch project data".to_string(),
            )
        }
    }
}

/// Classify an identity-provider error into an HTTP status, error code, and
/// message. Provider messages are already human-readable, so they pass
/// through untouched except for the transport class.
fn classify_identity_error(err: &IdentityError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        IdentityError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
        IdentityError::InvalidCredentials(_) => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        IdentityError::TokenInvalid => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
        IdentityError::RefreshInvalid => (StatusCode::UNAUTHORIZED, "INVALID_REFRESH_TOKEN"),
        IdentityError::NotConfirmed(_) => (StatusCode::FORBIDDEN, "USER_NOT_CONFIRMED"),
        IdentityError::UsernameExists => (StatusCode::CONFLICT, "USERNAME_EXISTS"),
        IdentityError::AliasExists => (StatusCode::CONFLICT, "ALIAS_EXISTS"),
        IdentityError::WeakPassword => (StatusCode::BAD_REQUEST, "INVALID_PASSWORD"),
        IdentityError::CodeMismatch => (StatusCode::BAD_REQUEST, "CODE_MISMATCH"),
        IdentityError::CodeExpired => (StatusCode::BAD_REQUEST, "CODE_EXPIRED"),
        IdentityError::Service(_) => (StatusCode::BAD_REQUEST, "IDENTITY_ERROR"),
        IdentityError::Transport(_) => {
            tracing::error!(error = %err, "Identity provider unreachable");
            return (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_UNAVAILABLE",
                "Authentication service unavailable".to_string(),
            );
        }
    };
    (status, code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let (status, _, message) = classify_sqlx_error(&sqlx::Error::RowNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Resource not found");
    }

    #[test]
    fn missing_project_maps_to_404() {
        let (status, code, message) = classify_content_error(&ProjectDataError::ProjectNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
        assert_eq!(message, "Project not found or access denied");
    }

    #[test]
    fn invalid_reference_is_a_server_error() {
        let (status, code, _) = classify_content_error(&ProjectDataError::RefInvalid("PPM"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INVALID_REFERENCE");
    }

    #[test]
    fn store_transport_maps_to_502() {
        let err = ProjectDataError::Store(StoreError::Transport("timed out".into()));
        let (status, code, message) = classify_content_error(&err);
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_UNAVAILABLE");
        assert_eq!(message, "Upstream service unavailable");
    }

    #[test]
    fn identity_errors_map_to_expected_statuses() {
        let cases = [
            (IdentityError::UserNotFound, StatusCode::NOT_FOUND),
            (
                IdentityError::InvalidCredentials("Incorrect username or password"),
                StatusCode::UNAUTHORIZED,
            ),
            (IdentityError::TokenInvalid, StatusCode::UNAUTHORIZED),
            (IdentityError::RefreshInvalid, StatusCode::UNAUTHORIZED),
            (
                IdentityError::NotConfirmed("User not confirmed"),
                StatusCode::FORBIDDEN,
            ),
            (IdentityError::UsernameExists, StatusCode::CONFLICT),
            (IdentityError::AliasExists, StatusCode::CONFLICT),
            (IdentityError::WeakPassword, StatusCode::BAD_REQUEST),
            (IdentityError::CodeMismatch, StatusCode::BAD_REQUEST),
            (IdentityError::CodeExpired, StatusCode::BAD_REQUEST),
            (
                IdentityError::Service("Sign up failed: boom".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                IdentityError::Transport("connect refused".into()),
                StatusCode::BAD_GATEWAY,
            ),
        ];
        for (err, expected) in cases {
            let (status, _, _) = classify_identity_error(&err);
            assert_eq!(status, expected, "wrong status for {err:?}");
        }
    }

    #[test]
    fn transport_errors_hide_provider_details() {
        let (_, _, message) =
            classify_identity_error(&IdentityError::Transport("dns failure".into()));
        assert_eq!(message, "Authentication service unavailable");
    }

    #[test]
    fn bad_request_response_has_the_right_status() {
        let status = status_of(AppError::BadRequest("page must be >= 1".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_response_has_the_right_status() {
        let status = status_of(AppError::Unauthorized("Missing Authorization header".into()));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn unknown_share_code_maps_to_404() {
        let err = AppError::NotFound("Share link not found".into());
        assert_eq!(err.to_string(), "Share link not found");
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }
}
