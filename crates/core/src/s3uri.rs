//! Validated `s3://bucket/key` references.
//!
//! Project metadata stores document locations as raw S3 URIs written by an
//! external pipeline. Every URI is validated here before any network read.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Shape of a full S3 URI: `s3://<bucket>/<key>`.
const URI_PATTERN: &str = r"^s3://([^/]+)/(.+)$";

/// AWS bucket naming rules: 3-63 chars, lowercase letters, digits, hyphens
/// and dots, starting and ending with a letter or digit.
const BUCKET_PATTERN: &str = r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$";

static URI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(URI_PATTERN).expect("valid regex"));

static BUCKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BUCKET_PATTERN).expect("valid regex"));

/// Why a URI was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum S3UriError {
    #[error("Invalid S3 URI: {0}")]
    InvalidUri(String),

    #[error("Invalid S3 bucket name: {0}")]
    InvalidBucket(String),

    #[error("Invalid S3 key: path traversal detected")]
    PathTraversal,
}

/// A parsed and validated S3 object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Uri {
    pub bucket: String,
    pub key: String,
}

impl S3Uri {
    /// Parse `s3://bucket/key`, enforcing bucket naming rules and rejecting
    /// keys that contain `..` or start with `/`.
    pub fn parse(uri: &str) -> Result<Self, S3UriError> {
        let caps = URI_RE
            .captures(uri)
            .ok_or_else(|| S3UriError::InvalidUri(uri.to_string()))?;

        let bucket = caps[1].to_string();
        let key = caps[2].to_string();

        if !BUCKET_RE.is_match(&bucket) {
            return Err(S3UriError::InvalidBucket(bucket));
        }

        if key.contains("..") || key.starts_with('/') {
            return Err(S3UriError::PathTraversal);
        }

        Ok(Self { bucket, key })
    }
}

impl fmt::Display for S3Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_uri() {
        let uri = S3Uri::parse("s3://my-bucket/projects/123/ppm.json").unwrap();
        assert_eq!(uri.bucket, "my-bucket");
        assert_eq!(uri.key, "projects/123/ppm.json");
    }

    #[test]
    fn parse_bucket_with_dots() {
        let uri = S3Uri::parse("s3://assets.example.com/key").unwrap();
        assert_eq!(uri.bucket, "assets.example.com");
    }

    #[test]
    fn reject_missing_scheme() {
        assert_eq!(
            S3Uri::parse("https://bucket/key"),
            Err(S3UriError::InvalidUri("https://bucket/key".to_string()))
        );
    }

    #[test]
    fn reject_missing_key() {
        assert!(matches!(
            S3Uri::parse("s3://bucket"),
            Err(S3UriError::InvalidUri(_))
        ));
    }

    #[test]
    fn reject_uppercase_bucket() {
        assert_eq!(
            S3Uri::parse("s3://MyBucket/key"),
            Err(S3UriError::InvalidBucket("MyBucket".to_string()))
        );
    }

    #[test]
    fn reject_too_short_bucket() {
        // Bucket names must be at least 3 characters.
        assert!(matches!(
            S3Uri::parse("s3://ab/key"),
            Err(S3UriError::InvalidBucket(_))
        ));
    }

    #[test]
    fn reject_bucket_ending_in_hyphen() {
        assert!(matches!(
            S3Uri::parse("s3://bucket-/key"),
            Err(S3UriError::InvalidBucket(_))
        ));
    }

    #[test]
    fn reject_traversal_in_key() {
        assert_eq!(
            S3Uri::parse("s3://bucket/a/../etc/passwd"),
            Err(S3UriError::PathTraversal)
        );
        // `..` anywhere in the key is rejected, even mid-segment.
        assert_eq!(
            S3Uri::parse("s3://bucket/a..b"),
            Err(S3UriError::PathTraversal)
        );
    }

    #[test]
    fn reject_leading_slash_key() {
        assert_eq!(
            S3Uri::parse("s3://bucket//absolute"),
            Err(S3UriError::PathTraversal)
        );
    }

    #[test]
    fn display_round_trips() {
        let uri = S3Uri::parse("s3://my-bucket/a/b.json").unwrap();
        assert_eq!(uri.to_string(), "s3://my-bucket/a/b.json");
    }
}
