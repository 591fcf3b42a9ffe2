//! Cognito identity adapter.
//!
//! Wraps every user-pool operation the portal exposes behind a single error
//! taxonomy. Business rejections (wrong password, unconfirmed account, code
//! mismatch) surface immediately; only transport failures are retried. When a
//! client secret is configured the `SECRET_HASH` parameter is computed and
//! attached wherever the API accepts it.

use std::collections::HashMap;

use aws_sdk_cognitoidentityprovider::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::operation::admin_initiate_auth::AdminInitiateAuthError;
use aws_sdk_cognitoidentityprovider::operation::admin_update_user_attributes::AdminUpdateUserAttributesError;
use aws_sdk_cognitoidentityprovider::operation::confirm_forgot_password::ConfirmForgotPasswordError;
use aws_sdk_cognitoidentityprovider::operation::forgot_password::ForgotPasswordError;
use aws_sdk_cognitoidentityprovider::operation::get_user::GetUserError;
use aws_sdk_cognitoidentityprovider::operation::global_sign_out::GlobalSignOutError;
use aws_sdk_cognitoidentityprovider::operation::initiate_auth::InitiateAuthError;
use aws_sdk_cognitoidentityprovider::operation::sign_up::SignUpError;
use aws_sdk_cognitoidentityprovider::operation::verify_user_attribute::VerifyUserAttributeError;
use aws_sdk_cognitoidentityprovider::types::{
    AttributeType, AuthFlowType, AuthenticationResultType, CodeDeliveryDetailsType,
};
use aws_sdk_cognitoidentityprovider::Client;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::Serialize;
use sha2::Sha256;

use portal_core::redact::mask_value;

use crate::retry::{with_transport_retry, TransientError};

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("User not found")]
    UserNotFound,
    /// Message varies by auth flow, matching what the provider discloses.
    #[error("{0}")]
    InvalidCredentials(&'static str),
    #[error("{0}")]
    NotConfirmed(&'static str),
    #[error("Invalid or expired access token")]
    TokenInvalid,
    #[error("Invalid or expired refresh token")]
    RefreshInvalid,
    #[error("Username already exists")]
    UsernameExists,
    #[error("Password does not meet requirements")]
    WeakPassword,
    #[error("Invalid verification code")]
    CodeMismatch,
    #[error("Verification code expired")]
    CodeExpired,
    #[error("Phone number already bound to another account")]
    AliasExists,
    /// Catch-all carrying the provider's own message, prefixed per operation.
    #[error("{0}")]
    Service(String),
    #[error("Cognito unreachable: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Token bundle from a successful authentication.
#[derive(Debug, Clone, Serialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub token_type: String,
    pub expires_in: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpOutcome {
    pub user_sub: String,
    pub user_confirmed: bool,
}

/// Result of a phone-number sign-up. When the username already exists the
/// call short-circuits to the existing account instead of failing.
#[derive(Debug, Clone)]
pub struct PhoneSignUp {
    pub user_sub: Option<String>,
    pub user_confirmed: bool,
    pub existing: bool,
}

/// User as returned by an access-token lookup.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub attributes: HashMap<String, String>,
}

impl UserProfile {
    pub fn sub(&self) -> Option<&str> {
        self.attributes.get("sub").map(String::as_str)
    }
}

/// User as returned by a `ListUsers` filter query.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub user_status: Option<String>,
    pub attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CodeDelivery {
    pub destination: Option<String>,
    pub medium: Option<String>,
    pub attribute_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct CognitoIdentity {
    client: Client,
    user_pool_id: String,
    client_id: String,
    client_secret: Option<String>,
}

impl CognitoIdentity {
    pub fn new(
        client: Client,
        user_pool_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            client,
            user_pool_id: user_pool_id.into(),
            client_id: client_id.into(),
            // An empty secret behaves like no secret at all.
            client_secret: client_secret.filter(|s| !s.is_empty()),
        }
    }

    /// `SECRET_HASH = base64(HMAC-SHA256(secret, username + client_id))`.
    /// `None` when no client secret is configured.
    fn secret_hash(&self, username: &str) -> Option<String> {
        let secret = self.client_secret.as_deref()?;
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).ok()?;
        mac.update(username.as_bytes());
        mac.update(self.client_id.as_bytes());
        Some(STANDARD.encode(mac.finalize().into_bytes()))
    }

    // -- Registration -------------------------------------------------------

    pub async fn sign_up(
        &self,
        email: &str,
        username: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<SignUpOutcome, IdentityError> {
        let mut attrs = vec![attribute("email", email)?];
        if let Some(name) = name {
            attrs.push(attribute("name", name)?);
        }

        let output = with_transport_retry("cognito.sign_up", || {
            let mut req = self
                .client
                .sign_up()
                .client_id(&self.client_id)
                .username(username)
                .password(password)
                .set_user_attributes(Some(attrs.clone()));
            if let Some(hash) = self.secret_hash(username) {
                req = req.secret_hash(hash);
            }
            req.send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Sign up failed", |e| match e {
                SignUpError::UsernameExistsException(_) => Some(IdentityError::UsernameExists),
                SignUpError::InvalidPasswordException(_) => Some(IdentityError::WeakPassword),
                SignUpError::InvalidParameterException(e) => Some(IdentityError::Service(
                    format!("Invalid parameter: {}", message_of(e.message())),
                )),
                _ => None,
            })
        })?;

        Ok(SignUpOutcome {
            user_sub: output.user_sub().to_string(),
            user_confirmed: output.user_confirmed(),
        })
    }

    pub async fn confirm_sign_up(
        &self,
        username: &str,
        confirmation_code: &str,
    ) -> Result<(), IdentityError> {
        with_transport_retry("cognito.confirm_sign_up", || {
            let mut req = self
                .client
                .confirm_sign_up()
                .client_id(&self.client_id)
                .username(username)
                .confirmation_code(confirmation_code);
            if let Some(hash) = self.secret_hash(username) {
                req = req.secret_hash(hash);
            }
            req.send()
        })
        .await
        .map_err(|err| map_service_error(err, "Confirmation failed", |_| None))?;
        Ok(())
    }

    pub async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityError> {
        with_transport_retry("cognito.resend_confirmation_code", || {
            let mut req = self
                .client
                .resend_confirmation_code()
                .client_id(&self.client_id)
                .username(username);
            if let Some(hash) = self.secret_hash(username) {
                req = req.secret_hash(hash);
            }
            req.send()
        })
        .await
        .map_err(|err| map_service_error(err, "Resend code failed", |_| None))?;
        Ok(())
    }

    // -- Authentication -----------------------------------------------------

    pub async fn sign_in(&self, username: &str, password: &str) -> Result<TokenSet, IdentityError> {
        tracing::info!(
            username,
            has_secret_hash = self.client_secret.is_some(),
            "Cognito sign-in attempt"
        );

        let output = with_transport_retry("cognito.initiate_auth", || {
            let mut req = self
                .client
                .initiate_auth()
                .auth_flow(AuthFlowType::UserPasswordAuth)
                .client_id(&self.client_id)
                .auth_parameters("USERNAME", username)
                .auth_parameters("PASSWORD", password);
            if let Some(hash) = self.secret_hash(username) {
                req = req.auth_parameters("SECRET_HASH", hash);
            }
            req.send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Sign in failed", |e| match e {
                InitiateAuthError::NotAuthorizedException(_) => Some(
                    IdentityError::InvalidCredentials("Incorrect username or password"),
                ),
                InitiateAuthError::UserNotFoundException(_) => Some(IdentityError::UserNotFound),
                InitiateAuthError::UserNotConfirmedException(_) => Some(
                    IdentityError::NotConfirmed("User not confirmed. Please verify your email."),
                ),
                _ => None,
            })
        })?;

        token_set(output.authentication_result())
    }

    pub async fn refresh_tokens(
        &self,
        refresh_token: &str,
        username: &str,
    ) -> Result<TokenSet, IdentityError> {
        let output = with_transport_retry("cognito.initiate_auth", || {
            let mut req = self
                .client
                .initiate_auth()
                .auth_flow(AuthFlowType::RefreshTokenAuth)
                .client_id(&self.client_id)
                .auth_parameters("REFRESH_TOKEN", refresh_token);
            if let Some(hash) = self.secret_hash(username) {
                req = req.auth_parameters("SECRET_HASH", hash);
            }
            req.send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Token refresh failed", |e| match e {
                InitiateAuthError::NotAuthorizedException(_) => Some(IdentityError::RefreshInvalid),
                _ => None,
            })
        })?;

        token_set(output.authentication_result())
    }

    pub async fn get_user(&self, access_token: &str) -> Result<UserProfile, IdentityError> {
        let output = with_transport_retry("cognito.get_user", || {
            self.client.get_user().access_token(access_token).send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Get user failed", |e| match e {
                GetUserError::NotAuthorizedException(_) => Some(IdentityError::TokenInvalid),
                _ => None,
            })
        })?;

        Ok(UserProfile {
            username: output.username().to_string(),
            attributes: attribute_map(output.user_attributes()),
        })
    }

    pub async fn global_sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        with_transport_retry("cognito.global_sign_out", || {
            self.client
                .global_sign_out()
                .access_token(access_token)
                .send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Sign out failed", |e| match e {
                GlobalSignOutError::NotAuthorizedException(_) => Some(IdentityError::TokenInvalid),
                _ => None,
            })
        })?;
        Ok(())
    }

    // -- SMS flows ----------------------------------------------------------

    /// Passwordless phone registration. A throwaway password satisfies the
    /// pool's password requirement; the placeholder email satisfies its email
    /// requirement. An already-taken username short-circuits to the existing
    /// account.
    pub async fn sign_up_with_phone(
        &self,
        phone_number: &str,
        username: &str,
    ) -> Result<PhoneSignUp, IdentityError> {
        let temp_password = generate_temp_password();
        let placeholder_email = format!("{}@sms.placeholder.com", phone_number.replace('+', ""));
        let attrs = vec![
            attribute("phone_number", phone_number)?,
            attribute("email", &placeholder_email)?,
        ];

        let result = with_transport_retry("cognito.sign_up", || {
            let mut req = self
                .client
                .sign_up()
                .client_id(&self.client_id)
                .username(username)
                .password(&temp_password)
                .set_user_attributes(Some(attrs.clone()));
            if let Some(hash) = self.secret_hash(username) {
                req = req.secret_hash(hash);
            }
            req.send()
        })
        .await;

        match result {
            Ok(output) => Ok(PhoneSignUp {
                user_sub: Some(output.user_sub().to_string()),
                user_confirmed: output.user_confirmed(),
                existing: false,
            }),
            Err(err) if err.is_transient() => Err(IdentityError::Transport(err.to_string())),
            Err(err) => match err.into_service_error() {
                SignUpError::UsernameExistsException(_) => Ok(PhoneSignUp {
                    user_sub: None,
                    user_confirmed: true,
                    existing: true,
                }),
                other => Err(IdentityError::Service(format!(
                    "Phone sign up failed: {}",
                    message_of(other.message())
                ))),
            },
        }
    }

    pub async fn admin_confirm_sign_up(&self, username: &str) -> Result<(), IdentityError> {
        with_transport_retry("cognito.admin_confirm_sign_up", || {
            self.client
                .admin_confirm_sign_up()
                .user_pool_id(&self.user_pool_id)
                .username(username)
                .send()
        })
        .await
        .map_err(|err| map_service_error(err, "Admin confirm failed", |_| None))?;
        Ok(())
    }

    pub async fn admin_set_user_password(
        &self,
        username: &str,
        password: &str,
        permanent: bool,
    ) -> Result<(), IdentityError> {
        with_transport_retry("cognito.admin_set_user_password", || {
            self.client
                .admin_set_user_password()
                .user_pool_id(&self.user_pool_id)
                .username(username)
                .password(password)
                .permanent(permanent)
                .send()
        })
        .await
        .map_err(|err| map_service_error(err, "Set password failed", |_| None))?;
        Ok(())
    }

    pub async fn admin_initiate_auth(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenSet, IdentityError> {
        let output = with_transport_retry("cognito.admin_initiate_auth", || {
            let mut req = self
                .client
                .admin_initiate_auth()
                .user_pool_id(&self.user_pool_id)
                .client_id(&self.client_id)
                .auth_flow(AuthFlowType::AdminNoSrpAuth)
                .auth_parameters("USERNAME", username)
                .auth_parameters("PASSWORD", password);
            if let Some(hash) = self.secret_hash(username) {
                req = req.auth_parameters("SECRET_HASH", hash);
            }
            req.send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Admin auth failed", |e| match e {
                AdminInitiateAuthError::NotAuthorizedException(_) => {
                    Some(IdentityError::InvalidCredentials("Authentication failed"))
                }
                AdminInitiateAuthError::UserNotFoundException(_) => {
                    Some(IdentityError::UserNotFound)
                }
                AdminInitiateAuthError::UserNotConfirmedException(_) => {
                    Some(IdentityError::NotConfirmed("User not confirmed"))
                }
                _ => None,
            })
        })?;

        token_set(output.authentication_result())
    }

    /// Rotate a random permanent password on the account and exchange it for
    /// tokens. Backs SMS sign-in, where the caller has already verified the
    /// phone number out of band, so knowledge of the password never leaves
    /// the server.
    pub async fn passwordless_sign_in(&self, username: &str) -> Result<TokenSet, IdentityError> {
        let password = generate_temp_password();
        self.admin_set_user_password(username, &password, true).await?;
        self.admin_initiate_auth(username, &password).await
    }

    pub async fn admin_update_user_attributes(
        &self,
        username: &str,
        attributes: &[(&str, &str)],
    ) -> Result<(), IdentityError> {
        let attrs = attributes
            .iter()
            .map(|(name, value)| attribute(name, value))
            .collect::<Result<Vec<_>, _>>()?;

        with_transport_retry("cognito.admin_update_user_attributes", || {
            self.client
                .admin_update_user_attributes()
                .user_pool_id(&self.user_pool_id)
                .username(username)
                .set_user_attributes(Some(attrs.clone()))
                .send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Update user attributes failed", |e| match e {
                AdminUpdateUserAttributesError::UserNotFoundException(_) => {
                    Some(IdentityError::UserNotFound)
                }
                AdminUpdateUserAttributesError::AliasExistsException(_) => {
                    Some(IdentityError::AliasExists)
                }
                _ => None,
            })
        })?;
        Ok(())
    }

    // -- Account linking ----------------------------------------------------

    pub async fn link_phone_to_user(
        &self,
        username: &str,
        phone_number: &str,
    ) -> Result<(), IdentityError> {
        self.admin_update_user_attributes(
            username,
            &[
                ("phone_number", phone_number),
                ("phone_number_verified", "true"),
            ],
        )
        .await
    }

    pub async fn link_email_to_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(), IdentityError> {
        self.admin_update_user_attributes(
            username,
            &[("email", email), ("email_verified", "true")],
        )
        .await
    }

    // -- Lookups ------------------------------------------------------------

    pub async fn list_users_by_phone(
        &self,
        phone_number: &str,
    ) -> Result<Option<UserSummary>, IdentityError> {
        tracing::info!(phone = %mask_value(phone_number), "looking up user by phone");
        let found = self.find_user("phone_number", phone_number).await?;
        tracing::info!(
            phone = %mask_value(phone_number),
            found = found.is_some(),
            "phone lookup finished"
        );
        Ok(found)
    }

    pub async fn list_users_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserSummary>, IdentityError> {
        self.find_user("email", email).await
    }

    pub async fn get_user_by_sub(&self, sub: &str) -> Result<Option<UserSummary>, IdentityError> {
        self.find_user("sub", sub).await
    }

    /// One-result `ListUsers` with an exact-match filter on `attribute`.
    async fn find_user(
        &self,
        attribute: &str,
        value: &str,
    ) -> Result<Option<UserSummary>, IdentityError> {
        let filter = format!("{attribute} = \"{}\"", escape_filter_value(value));

        let output = with_transport_retry("cognito.list_users", || {
            self.client
                .list_users()
                .user_pool_id(&self.user_pool_id)
                .filter(&filter)
                .limit(1)
                .send()
        })
        .await
        .map_err(|err| map_service_error(err, "List users failed", |_| None))?;

        let Some(user) = output.users().first() else {
            return Ok(None);
        };
        Ok(Some(UserSummary {
            username: user.username().unwrap_or_default().to_string(),
            user_status: user.user_status().map(|s| s.as_str().to_string()),
            attributes: attribute_map(user.attributes()),
        }))
    }

    // -- Attribute verification ---------------------------------------------

    pub async fn get_user_attribute_verification_code(
        &self,
        access_token: &str,
        attribute_name: &str,
    ) -> Result<CodeDelivery, IdentityError> {
        let output = with_transport_retry("cognito.get_user_attribute_verification_code", || {
            self.client
                .get_user_attribute_verification_code()
                .access_token(access_token)
                .attribute_name(attribute_name)
                .send()
        })
        .await
        .map_err(|err| map_service_error(err, "Get verification code failed", |_| None))?;

        Ok(code_delivery(output.code_delivery_details()))
    }

    pub async fn verify_user_attribute(
        &self,
        access_token: &str,
        attribute_name: &str,
        code: &str,
    ) -> Result<(), IdentityError> {
        with_transport_retry("cognito.verify_user_attribute", || {
            self.client
                .verify_user_attribute()
                .access_token(access_token)
                .attribute_name(attribute_name)
                .code(code)
                .send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Verify attribute failed", |e| match e {
                VerifyUserAttributeError::CodeMismatchException(_) => {
                    Some(IdentityError::CodeMismatch)
                }
                VerifyUserAttributeError::ExpiredCodeException(_) => {
                    Some(IdentityError::CodeExpired)
                }
                _ => None,
            })
        })?;
        Ok(())
    }

    // -- Password reset -----------------------------------------------------

    pub async fn forgot_password(&self, username: &str) -> Result<CodeDelivery, IdentityError> {
        let output = with_transport_retry("cognito.forgot_password", || {
            let mut req = self
                .client
                .forgot_password()
                .client_id(&self.client_id)
                .username(username);
            if let Some(hash) = self.secret_hash(username) {
                req = req.secret_hash(hash);
            }
            req.send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Forgot password failed", |e| match e {
                ForgotPasswordError::UserNotFoundException(_) => Some(IdentityError::UserNotFound),
                _ => None,
            })
        })?;

        Ok(code_delivery(output.code_delivery_details()))
    }

    pub async fn confirm_forgot_password(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        with_transport_retry("cognito.confirm_forgot_password", || {
            let mut req = self
                .client
                .confirm_forgot_password()
                .client_id(&self.client_id)
                .username(username)
                .confirmation_code(code)
                .password(new_password);
            if let Some(hash) = self.secret_hash(username) {
                req = req.secret_hash(hash);
            }
            req.send()
        })
        .await
        .map_err(|err| {
            map_service_error(err, "Reset password failed", |e| match e {
                ConfirmForgotPasswordError::CodeMismatchException(_) => {
                    Some(IdentityError::CodeMismatch)
                }
                ConfirmForgotPasswordError::ExpiredCodeException(_) => {
                    Some(IdentityError::CodeExpired)
                }
                _ => None,
            })
        })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Classify an SDK error: transport failures keep their retry class, known
/// business rejections map through `specific`, everything else becomes a
/// prefixed service error.
fn map_service_error<E, R>(
    err: SdkError<E, R>,
    prefix: &str,
    specific: impl FnOnce(&E) -> Option<IdentityError>,
) -> IdentityError
where
    E: ProvideErrorMetadata,
{
    if err.is_transient() {
        return IdentityError::Transport(err.to_string());
    }
    if let Some(service_err) = err.as_service_error() {
        if let Some(mapped) = specific(service_err) {
            return mapped;
        }
        return IdentityError::Service(format!(
            "{prefix}: {}",
            message_of(service_err.message())
        ));
    }
    IdentityError::Service(format!("{prefix}: {err}"))
}

fn message_of(message: Option<&str>) -> &str {
    message.unwrap_or("no error details")
}

fn token_set(result: Option<&AuthenticationResultType>) -> Result<TokenSet, IdentityError> {
    let Some(result) = result else {
        return Err(IdentityError::Service(
            "Authentication failed: No tokens returned".to_string(),
        ));
    };
    let Some(access_token) = result.access_token() else {
        return Err(IdentityError::Service(
            "Authentication failed: No tokens returned".to_string(),
        ));
    };
    Ok(TokenSet {
        access_token: access_token.to_string(),
        refresh_token: result.refresh_token().map(str::to_string),
        id_token: result.id_token().map(str::to_string),
        token_type: result.token_type().unwrap_or("Bearer").to_string(),
        expires_in: result.expires_in(),
    })
}

fn code_delivery(details: Option<&CodeDeliveryDetailsType>) -> CodeDelivery {
    let Some(details) = details else {
        return CodeDelivery::default();
    };
    CodeDelivery {
        destination: details.destination().map(str::to_string),
        medium: details.delivery_medium().map(|m| m.as_str().to_string()),
        attribute_name: details.attribute_name().map(str::to_string),
    }
}

fn attribute(name: &str, value: &str) -> Result<AttributeType, IdentityError> {
    AttributeType::builder()
        .name(name)
        .value(value)
        .build()
        .map_err(|e| IdentityError::Service(format!("Invalid user attribute: {e}")))
}

fn attribute_map(attributes: &[AttributeType]) -> HashMap<String, String> {
    attributes
        .iter()
        .map(|attr| {
            (
                attr.name().to_string(),
                attr.value().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

/// Escape `\` and `"` for interpolation into a `ListUsers` filter string.
fn escape_filter_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Random throwaway password for phone sign-up: 43 url-safe base64 chars plus
/// a suffix guaranteeing upper/lower/digit/symbol classes.
fn generate_temp_password() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    format!("{}Aa1!", URL_SAFE_NO_PAD.encode(bytes))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn adapter(secret: Option<&str>) -> CognitoIdentity {
        let config = aws_sdk_cognitoidentityprovider::Config::builder()
            .behavior_version(aws_sdk_cognitoidentityprovider::config::BehaviorVersion::latest())
            .build();
        CognitoIdentity::new(
            Client::from_conf(config),
            "us-west-2_testpool",
            "testclientid",
            secret.map(str::to_string),
        )
    }

    #[test]
    fn secret_hash_is_44_char_base64_and_deterministic() {
        let identity = adapter(Some("topsecret"));
        let first = identity.secret_hash("alice").unwrap();
        let second = identity.secret_hash("alice").unwrap();

        assert_eq!(first.len(), 44);
        assert!(first.ends_with('='));
        assert_eq!(first, second);
        assert_ne!(first, identity.secret_hash("bob").unwrap());
    }

    #[test]
    fn secret_hash_absent_without_client_secret() {
        assert_matches!(adapter(None).secret_hash("alice"), None);
        assert_matches!(adapter(Some("")).secret_hash("alice"), None);
    }

    #[test]
    fn filter_values_escape_backslashes_and_quotes() {
        assert_eq!(escape_filter_value(r#"a\b"c"#), r#"a\\b\"c"#);
        assert_eq!(escape_filter_value("+15551234567"), "+15551234567");
    }

    #[test]
    fn temp_passwords_carry_all_required_classes() {
        let password = generate_temp_password();
        assert_eq!(password.len(), 47);
        assert!(password.ends_with("Aa1!"));
        assert_ne!(password, generate_temp_password());
    }

    #[test]
    fn token_set_requires_an_access_token() {
        assert_matches!(
            token_set(None),
            Err(IdentityError::Service(message))
                if message == "Authentication failed: No tokens returned"
        );

        let result = AuthenticationResultType::builder()
            .access_token("token-a")
            .expires_in(3600)
            .build();
        let tokens = token_set(Some(&result)).unwrap();
        assert_eq!(tokens.access_token, "token-a");
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);
    }

    #[test]
    fn error_messages_match_the_api_contract() {
        assert_eq!(IdentityError::UserNotFound.to_string(), "User not found");
        assert_eq!(
            IdentityError::InvalidCredentials("Incorrect username or password").to_string(),
            "Incorrect username or password"
        );
        assert_eq!(
            IdentityError::NotConfirmed("User not confirmed. Please verify your email.")
                .to_string(),
            "User not confirmed. Please verify your email."
        );
        assert_eq!(
            IdentityError::UsernameExists.to_string(),
            "Username already exists"
        );
        assert_eq!(
            IdentityError::WeakPassword.to_string(),
            "Password does not meet requirements"
        );
        assert_eq!(
            IdentityError::CodeMismatch.to_string(),
            "Invalid verification code"
        );
        assert_eq!(
            IdentityError::CodeExpired.to_string(),
            "Verification code expired"
        );
        assert_eq!(
            IdentityError::AliasExists.to_string(),
            "Phone number already bound to another account"
        );
        assert_eq!(
            IdentityError::RefreshInvalid.to_string(),
            "Invalid or expired refresh token"
        );
        assert_eq!(
            IdentityError::TokenInvalid.to_string(),
            "Invalid or expired access token"
        );
    }

    #[test]
    fn profile_exposes_the_subject_attribute() {
        let profile = UserProfile {
            username: "alice".to_string(),
            attributes: [("sub".to_string(), "abc-123".to_string())]
                .into_iter()
                .collect(),
        };
        assert_eq!(profile.sub(), Some("abc-123"));
    }
}
