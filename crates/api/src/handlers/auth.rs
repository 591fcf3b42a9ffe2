//! Handlers for the `/auth` resource (Cognito-backed flows).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use portal_aws::identity::{CodeDelivery, SignUpOutcome, TokenSet, UserProfile};
use portal_core::redact::mask_value;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub username: String,
    pub password: String,
    pub name: Option<String>,
}

/// Request body for `POST /auth/confirm`.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub username: String,
    pub code: String,
}

/// Request body for `POST /auth/resend-code`.
#[derive(Debug, Deserialize)]
pub struct ResendCodeRequest {
    pub username: String,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
///
/// The username is required alongside the token: the client secret hash is
/// keyed by username, and refresh tokens do not carry it.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
    pub username: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub username: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub code: String,
    pub new_password: String,
}

/// Request body for the SMS sign-in endpoints.
#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    /// E.164, e.g. `+14155550123`.
    pub phone_number: String,
}

/// Request body for `POST /auth/link/phone`.
#[derive(Debug, Deserialize)]
pub struct LinkPhoneRequest {
    pub phone_number: String,
}

/// Request body for `POST /auth/link/email`.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkEmailRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Request body for `POST /auth/attributes/send-code`.
#[derive(Debug, Deserialize)]
pub struct SendAttributeCodeRequest {
    /// Cognito attribute name, e.g. `email` or `phone_number`.
    pub attribute_name: String,
}

/// Request body for `POST /auth/attributes/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyAttributeRequest {
    pub attribute_name: String,
    pub code: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Response for code-sending endpoints, echoing where the code went.
#[derive(Debug, Serialize)]
pub struct CodeSentResponse {
    pub message: &'static str,
    pub delivery: CodeDelivery,
}

/// Response for `POST /auth/phone/start`.
#[derive(Debug, Serialize)]
pub struct PhoneStartResponse {
    /// Whether the phone number already had an account.
    pub existing: bool,
}

// ---------------------------------------------------------------------------
// Registration and confirmation
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register with email + username + password. Cognito sends the
/// verification code to the email address.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<SignUpOutcome>)> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let outcome = state
        .identity
        .sign_up(
            &input.email,
            &input.username,
            &input.password,
            input.name.as_deref(),
        )
        .await?;

    tracing::info!(user_sub = %outcome.user_sub, "User signed up");
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// POST /api/v1/auth/confirm
pub async fn confirm(
    State(state): State<AppState>,
    Json(input): Json<ConfirmRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .identity
        .confirm_sign_up(&input.username, &input.code)
        .await?;
    Ok(Json(MessageResponse {
        message: "Account confirmed",
    }))
}

/// POST /api/v1/auth/resend-code
pub async fn resend_code(
    State(state): State<AppState>,
    Json(input): Json<ResendCodeRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .identity
        .resend_confirmation_code(&input.username)
        .await?;
    Ok(Json(MessageResponse {
        message: "Verification code sent",
    }))
}

// ---------------------------------------------------------------------------
// Password sign-in and tokens
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signin
///
/// Password authentication. Returns the Cognito token set.
pub async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SignInRequest>,
) -> AppResult<Json<TokenSet>> {
    let tokens = state
        .identity
        .sign_in(&input.username, &input.password)
        .await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<TokenSet>> {
    let tokens = state
        .identity
        .refresh_tokens(&input.refresh_token, &input.username)
        .await?;
    Ok(Json(tokens))
}

/// GET /api/v1/auth/me
///
/// The authenticated user's profile, straight from the access token.
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserProfile>> {
    let profile = state.identity.get_user(&auth.access_token).await?;
    Ok(Json(profile))
}

/// POST /api/v1/auth/signout
///
/// Global sign-out: invalidates every token issued to the user.
pub async fn signout(auth: AuthUser, State(state): State<AppState>) -> AppResult<StatusCode> {
    state.identity.global_sign_out(&auth.access_token).await?;
    tracing::info!(user = %auth.username, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<CodeSentResponse>> {
    let delivery = state.identity.forgot_password(&input.username).await?;
    Ok(Json(CodeSentResponse {
        message: "Password reset code sent",
        delivery,
    }))
}

/// POST /api/v1/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .identity
        .confirm_forgot_password(&input.username, &input.code, &input.new_password)
        .await?;
    Ok(Json(MessageResponse {
        message: "Password has been reset",
    }))
}

// ---------------------------------------------------------------------------
// SMS sign-in
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/phone/start
///
/// Find-or-create an account for the phone number. The upstream SMS gateway
/// has already verified possession of the number, so a fresh account is
/// auto-confirmed.
pub async fn phone_start(
    State(state): State<AppState>,
    Json(input): Json<PhoneRequest>,
) -> AppResult<Json<PhoneStartResponse>> {
    if let Some(user) = state
        .identity
        .list_users_by_phone(&input.phone_number)
        .await?
    {
        tracing::info!(user = %user.username, "Phone sign-in for existing account");
        return Ok(Json(PhoneStartResponse { existing: true }));
    }

    // The phone number doubles as the Cognito username for SMS-first
    // accounts.
    let signup = state
        .identity
        .sign_up_with_phone(&input.phone_number, &input.phone_number)
        .await?;

    if !signup.existing && !signup.user_confirmed {
        state
            .identity
            .admin_confirm_sign_up(&input.phone_number)
            .await?;
    }

    tracing::info!(
        phone = %mask_value(&input.phone_number),
        existing = signup.existing,
        "Phone account ready"
    );
    Ok(Json(PhoneStartResponse {
        existing: signup.existing,
    }))
}

/// POST /api/v1/auth/phone/complete
///
/// Exchange a verified phone number for a token set via a server-side
/// password rotation.
pub async fn phone_complete(
    State(state): State<AppState>,
    Json(input): Json<PhoneRequest>,
) -> AppResult<Json<TokenSet>> {
    let user = state
        .identity
        .list_users_by_phone(&input.phone_number)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let tokens = state.identity.passwordless_sign_in(&user.username).await?;
    tracing::info!(user = %user.username, "Phone sign-in completed");
    Ok(Json(tokens))
}

// ---------------------------------------------------------------------------
// Attribute linking and verification
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/link/phone
///
/// Attach an already-verified phone number to the authenticated account.
pub async fn link_phone(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<LinkPhoneRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .identity
        .link_phone_to_user(&auth.username, &input.phone_number)
        .await?;
    tracing::info!(
        user = %auth.username,
        phone = %mask_value(&input.phone_number),
        "Phone number linked"
    );
    Ok(Json(MessageResponse {
        message: "Phone number linked",
    }))
}

/// POST /api/v1/auth/link/email
///
/// Attach an already-verified email address to the authenticated account.
pub async fn link_email(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<LinkEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state
        .identity
        .link_email_to_user(&auth.username, &input.email)
        .await?;
    tracing::info!(
        user = %auth.username,
        email = %mask_value(&input.email),
        "Email linked"
    );
    Ok(Json(MessageResponse {
        message: "Email linked",
    }))
}

/// POST /api/v1/auth/attributes/send-code
pub async fn send_attribute_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendAttributeCodeRequest>,
) -> AppResult<Json<CodeSentResponse>> {
    let delivery = state
        .identity
        .get_user_attribute_verification_code(&auth.access_token, &input.attribute_name)
        .await?;
    Ok(Json(CodeSentResponse {
        message: "Verification code sent",
        delivery,
    }))
}

/// POST /api/v1/auth/attributes/verify
pub async fn verify_attribute(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<VerifyAttributeRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .identity
        .verify_user_attribute(&auth.access_token, &input.attribute_name, &input.code)
        .await?;
    Ok(Json(MessageResponse {
        message: "Attribute verified",
    }))
}
