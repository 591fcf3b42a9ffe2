//! Sensitive-value masking for log output.
//!
//! Any value whose field name appears in [`SENSITIVE_FIELDS`] must be passed
//! through [`mask_value`] before it reaches a log line. User IDs are never
//! logged in full; use [`short_user_id`].

/// Field names (lowercase) whose values are masked in logs.
pub const SENSITIVE_FIELDS: &[&str] = &[
    // Authentication
    "password",
    "new_password",
    "old_password",
    "token",
    "access_token",
    "refresh_token",
    "id_token",
    "secret",
    "secret_hash",
    "authorization",
    "api_key",
    "client_secret",
    "verification_code",
    "code",
    "confirmation_code",
    // AWS / cloud
    "cognito_app_client_secret",
    "aws_secret_access_key",
    "aws_session_token",
    // Database
    "database_url",
    "db_password",
    "connection_string",
    // SMS
    "sms_app_key",
    "sms_sdk_app_id",
    // Other PII
    "credit_card",
    "ssn",
    "phone_number",
];

/// Whether a field name (case-insensitive) is considered sensitive.
pub fn is_sensitive(field: &str) -> bool {
    let lower = field.to_ascii_lowercase();
    SENSITIVE_FIELDS.contains(&lower.as_str())
}

/// Mask a sensitive value. Values longer than 8 characters keep their first
/// and last 4 characters; everything shorter collapses to `****`.
pub fn mask_value(value: &str) -> String {
    let len = value.chars().count();
    if len > 8 {
        let head: String = value.chars().take(4).collect();
        let tail: String = value.chars().skip(len - 4).collect();
        format!("{head}****{tail}")
    } else {
        "****".to_string()
    }
}

/// Truncate a user ID to its first 8 characters for log lines.
pub fn short_user_id(user_id: &str) -> String {
    let head: String = user_id.chars().take(8).collect();
    format!("{head}...")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_long_value_keeps_edges() {
        assert_eq!(mask_value("supersecretpassword"), "supe****word");
    }

    #[test]
    fn mask_short_value_fully() {
        assert_eq!(mask_value("abc"), "****");
        assert_eq!(mask_value(""), "****");
    }

    #[test]
    fn mask_exactly_eight_chars_fully() {
        // 8 chars is not "longer than 8": fully masked.
        assert_eq!(mask_value("12345678"), "****");
        assert_eq!(mask_value("123456789"), "1234****6789");
    }

    #[test]
    fn mask_is_character_based() {
        // Multibyte values must not split inside a character.
        assert_eq!(mask_value("密码密码密码密码密码"), "密码密码****密码密码");
    }

    #[test]
    fn sensitive_match_is_case_insensitive() {
        assert!(is_sensitive("password"));
        assert!(is_sensitive("Authorization"));
        assert!(is_sensitive("DATABASE_URL"));
        assert!(!is_sensitive("username"));
        assert!(!is_sensitive("title"));
    }

    #[test]
    fn short_user_id_truncates() {
        assert_eq!(
            short_user_id("a1b2c3d4-e5f6-7890-abcd-ef1234567890"),
            "a1b2c3d4..."
        );
        assert_eq!(short_user_id("abc"), "abc...");
    }
}
