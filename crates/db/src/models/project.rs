//! Project entity model and DTOs.

use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;

use portal_core::types::{ProjectId, Timestamp};

/// A project row from the `projects` table.
///
/// `project_id` serializes as a string: the raw snowflake exceeds the safe
/// integer range of JavaScript clients.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    #[serde(serialize_with = "id_as_string")]
    pub project_id: ProjectId,
    /// Identity-provider subject of the owning user.
    pub user_id: String,
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub key_concept: Option<String>,
    pub poster_url: Option<String>,
    pub share_code: Option<String>,
    pub user_prompt: Option<String>,
    pub cover_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub banner_url: Option<String>,
    pub share_poster_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn id_as_string<S: Serializer>(id: &ProjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_string())
}

/// DTO for creating a new project. The ID is allocated by the writer
/// (snowflake), never by the database.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub project_id: ProjectId,
    pub user_id: String,
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub key_concept: Option<String>,
    pub poster_url: Option<String>,
    pub share_code: Option<String>,
    pub user_prompt: Option<String>,
    pub cover_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub banner_url: Option<String>,
    pub share_poster_url: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub key_concept: Option<String>,
    pub poster_url: Option<String>,
    pub share_code: Option<String>,
    pub user_prompt: Option<String>,
    pub cover_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub banner_url: Option<String>,
    pub share_poster_url: Option<String>,
}

/// Optional list filters. Absent fields do not constrain the query; both
/// time bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub project_id: Option<ProjectId>,
    pub user_id: Option<String>,
    pub created_from: Option<Timestamp>,
    pub created_until: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_project() -> Project {
        Project {
            project_id: 7234567890123456789,
            user_id: "a1b2c3d4-e5f6-7890-abcd-ef1234567890".to_string(),
            title: Some("My Animation Project".to_string()),
            video_url: None,
            key_concept: None,
            poster_url: None,
            share_code: Some("xK9_2mNpQwA".to_string()),
            user_prompt: None,
            cover_url: None,
            thumbnail_url: None,
            banner_url: None,
            share_poster_url: None,
            created_at: Utc.with_ymd_and_hms(2024, 12, 5, 3, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 12, 5, 3, 0, 0).unwrap(),
        }
    }

    #[test]
    fn project_id_serializes_as_string() {
        let value = serde_json::to_value(sample_project()).unwrap();
        assert_eq!(value["project_id"], "7234567890123456789");
        assert_eq!(value["user_id"], "a1b2c3d4-e5f6-7890-abcd-ef1234567890");
    }

    #[test]
    fn null_fields_serialize_as_null() {
        let value = serde_json::to_value(sample_project()).unwrap();
        assert!(value["video_url"].is_null());
        assert!(value["title"].is_string());
    }
}
