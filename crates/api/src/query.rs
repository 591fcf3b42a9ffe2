//! Shared query-parameter types.

use chrono::{DateTime, Utc};
use portal_core::page::DEFAULT_PAGE_SIZE;
use portal_db::models::project::ProjectFilter;
use serde::Deserialize;
use validator::Validate;

/// Query parameters accepted by `GET /api/v1/projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct ListProjectsQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be >= 1"))]
    pub page: i64,
    /// Rows per page, capped at 100.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "page_size must be between 1 and 100"))]
    pub page_size: i64,
    pub user_id: Option<String>,
    pub project_id: Option<i64>,
    /// Inclusive lower bound on `created_at`, RFC 3339.
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`, RFC 3339.
    pub end_time: Option<DateTime<Utc>>,
}

impl ListProjectsQuery {
    pub fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            project_id: self.project_id,
            user_id: self.user_id.clone(),
            created_from: self.start_time,
            created_until: self.end_time,
        }
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let query: ListProjectsQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn page_zero_fails_validation() {
        let query: ListProjectsQuery =
            serde_json::from_value(serde_json::json!({"page": 0})).unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn oversized_page_size_fails_validation() {
        let query: ListProjectsQuery =
            serde_json::from_value(serde_json::json!({"page_size": 101})).unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn filter_carries_bounds_through() {
        let query: ListProjectsQuery = serde_json::from_value(serde_json::json!({
            "user_id": "sub-123",
            "project_id": 42,
            "start_time": "2025-01-01T00:00:00Z",
            "end_time": "2025-02-01T00:00:00Z",
        }))
        .unwrap();

        let filter = query.filter();
        assert_eq!(filter.user_id.as_deref(), Some("sub-123"));
        assert_eq!(filter.project_id, Some(42));
        assert!(filter.created_from.unwrap() < filter.created_until.unwrap());
    }
}
