//! Project metadata store (DynamoDB).
//!
//! One item per project, keyed `PK = USER#<user_id>`, `SK = PROJ#<project_id>`.
//! Core attributes are PascalCase; session attributes are snake_case because a
//! different writer owns them. Conversions are total: absent attributes fall
//! back to documented defaults rather than failing the whole read.

use std::collections::HashMap;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde::Serialize;
use serde_json::{json, Value};

use portal_core::redact::short_user_id;
use portal_core::types::ProjectId;

use crate::retry::{with_transport_retry, TransientError};

pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DynamoDB request failed: {0}")]
    Request(String),
    #[error("DynamoDB unreachable: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct MetadataStore {
    client: Client,
    table_name: String,
}

impl MetadataStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Exact-key lookup. `None` covers both "no such project" and "project
    /// belongs to someone else"; callers must not distinguish the two.
    pub async fn fetch_item(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<Option<Item>, StoreError> {
        tracing::info!(
            table = %self.table_name,
            project_id,
            user = %short_user_id(user_id),
            "fetching project from DynamoDB"
        );

        let output = with_transport_retry("dynamodb.get_item", || {
            self.client
                .get_item()
                .table_name(&self.table_name)
                .key("PK", AttributeValue::S(user_pk(user_id)))
                .key("SK", AttributeValue::S(project_sk(project_id)))
                .send()
        })
        .await
        .map_err(map_get_item_error)?;

        Ok(output.item)
    }
}

fn user_pk(user_id: &str) -> String {
    format!("USER#{user_id}")
}

fn project_sk(project_id: ProjectId) -> String {
    format!("PROJ#{project_id}")
}

fn map_get_item_error(err: SdkError<GetItemError>) -> StoreError {
    if err.is_transient() {
        return StoreError::Transport(err.to_string());
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(e) => StoreError::Request(format!(
            "table not found: {}",
            e.message().unwrap_or("no details")
        )),
        GetItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Request("throughput exceeded".to_string())
        }
        other => StoreError::Request(
            other
                .message()
                .unwrap_or("unrecognized DynamoDB error")
                .to_string(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Normalized project metadata as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectMetadata {
    pub project_id: ProjectId,
    pub user_id: String,
    pub title: String,
    pub status: String,
    pub progress: i64,
    pub version: i64,
    pub ppm_ref: Option<String>,
    pub ppm_version: Option<Value>,
    pub script_ref: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub draft_id: Option<String>,
    pub creative_brief_url: Option<String>,
    pub creative_brief_id: Option<String>,
    pub creative_brief_version: Option<Value>,
    pub creative_brief_history: Vec<Value>,
    pub creative_brief_metadata: Option<Value>,
    pub assets_script_url: Option<String>,
    pub assets_script_id: Option<String>,
    pub assets_script_version: Option<Value>,
    pub assets_script_history: Vec<Value>,
    pub deliverables: Vec<Value>,
    pub runtime_session_id: Option<String>,
    pub session_status: Option<String>,
    pub session_created_at: Option<String>,
    pub session_last_active: Option<String>,
    pub session_expires_at: Option<String>,
}

/// Build the metadata view of an item. The requested ids serve as fallbacks
/// when the stored attributes are absent.
pub fn item_to_metadata(item: &Item, project_id: ProjectId, user_id: &str) -> ProjectMetadata {
    ProjectMetadata {
        project_id: get_i64(item, "ProjectId").unwrap_or(project_id),
        user_id: get_s(item, "UserId").unwrap_or_else(|| user_id.to_string()),
        title: get_s(item, "Title").unwrap_or_else(|| "Untitled Project".to_string()),
        status: get_s(item, "Status").unwrap_or_else(|| "UNKNOWN".to_string()),
        progress: get_i64(item, "Progress").unwrap_or(0),
        version: get_i64(item, "Version").unwrap_or(1),
        ppm_ref: get_s(item, "PPMRef"),
        ppm_version: get_value(item, "PPMVersion"),
        script_ref: get_s(item, "ScriptRef"),
        created_at: get_s(item, "CreatedAt"),
        updated_at: get_s(item, "UpdatedAt"),
        draft_id: get_s(item, "DraftId"),
        creative_brief_url: get_s(item, "CreativeBriefUrl"),
        creative_brief_id: get_s(item, "CreativeBriefId"),
        creative_brief_version: get_value(item, "CreativeBriefVersion"),
        creative_brief_history: get_list(item, "CreativeBriefHistory"),
        creative_brief_metadata: get_value(item, "CreativeBriefMetadata"),
        assets_script_url: get_s(item, "AssetsScriptUrl"),
        assets_script_id: get_s(item, "AssetsScriptId"),
        assets_script_version: get_value(item, "AssetsScriptVersion"),
        assets_script_history: get_list(item, "AssetsScriptHistory"),
        deliverables: get_list(item, "Deliverables"),
        runtime_session_id: get_s(item, "runtime_session_id"),
        session_status: get_s(item, "session_status"),
        session_created_at: get_s(item, "session_created_at"),
        session_last_active: get_s(item, "session_last_active"),
        session_expires_at: get_s(item, "session_expires_at"),
    }
}

/// Normalize the `Assets` map. Every entry is filled out to the same shape;
/// the map key doubles as the asset id when the entry omits one.
pub fn item_to_assets(item: &Item) -> Value {
    let raw = get_value(item, "Assets").unwrap_or_else(|| json!({}));
    let mut assets = serde_json::Map::new();

    if let Value::Object(entries) = raw {
        for (asset_id, data) in entries {
            assets.insert(
                asset_id.clone(),
                json!({
                    "asset_id": data.get("asset_id").cloned().unwrap_or_else(|| json!(asset_id)),
                    "type": data.get("type").cloned().unwrap_or_else(|| json!("unknown")),
                    "url": data.get("url").cloned().unwrap_or_else(|| json!("")),
                    "scene_id": data.get("scene_id").cloned().unwrap_or(Value::Null),
                    "metadata": data.get("metadata").cloned().unwrap_or(Value::Null),
                    "created_at": data.get("created_at").cloned().unwrap_or(Value::Null),
                }),
            );
        }
    }

    Value::Object(assets)
}

pub(crate) fn get_s(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

fn get_i64(item: &Item, key: &str) -> Option<i64> {
    match item.get(key)? {
        AttributeValue::N(n) => n.parse().ok(),
        AttributeValue::S(s) => s.parse().ok(),
        _ => None,
    }
}

fn get_list(item: &Item, key: &str) -> Vec<Value> {
    match item.get(key) {
        Some(AttributeValue::L(list)) => list.iter().map(attr_to_json).collect(),
        _ => Vec::new(),
    }
}

fn get_value(item: &Item, key: &str) -> Option<Value> {
    item.get(key).map(attr_to_json)
}

/// Lossy mapping from a DynamoDB attribute to JSON. Numbers keep integer
/// precision where it fits in `i64`; binary attributes never occur in this
/// table and map to null.
fn attr_to_json(attr: &AttributeValue) -> Value {
    match attr {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => parse_number(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(list.iter().map(attr_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), attr_to_json(v)))
                .collect(),
        ),
        AttributeValue::Ss(list) => {
            Value::Array(list.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(list) => Value::Array(list.iter().map(|n| parse_number(n)).collect()),
        _ => Value::Null,
    }
}

fn parse_number(n: &str) -> Value {
    n.parse::<i64>()
        .map(Value::from)
        .or_else(|_| n.parse::<f64>().map(Value::from))
        .unwrap_or_else(|_| Value::String(n.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    fn n(value: &str) -> AttributeValue {
        AttributeValue::N(value.to_string())
    }

    #[test]
    fn key_attributes_have_entity_prefixes() {
        assert_eq!(user_pk("u-123"), "USER#u-123");
        assert_eq!(project_sk(7234567890123456789), "PROJ#7234567890123456789");
    }

    #[test]
    fn converts_populated_item() {
        let item: Item = [
            ("ProjectId".to_string(), n("42")),
            ("UserId".to_string(), s("user-1")),
            ("Title".to_string(), s("Launch video")),
            ("Status".to_string(), s("IN_PROGRESS")),
            ("Progress".to_string(), n("60")),
            ("Version".to_string(), n("3")),
            ("PPMRef".to_string(), s("s3://bucket/ppm.json")),
            ("runtime_session_id".to_string(), s("sess-9")),
        ]
        .into_iter()
        .collect();

        let meta = item_to_metadata(&item, 42, "user-1");
        assert_eq!(meta.project_id, 42);
        assert_eq!(meta.title, "Launch video");
        assert_eq!(meta.status, "IN_PROGRESS");
        assert_eq!(meta.progress, 60);
        assert_eq!(meta.version, 3);
        assert_eq!(meta.ppm_ref.as_deref(), Some("s3://bucket/ppm.json"));
        assert_eq!(meta.runtime_session_id.as_deref(), Some("sess-9"));
        assert!(meta.script_ref.is_none());
    }

    #[test]
    fn missing_attributes_fall_back_to_defaults() {
        let item = Item::new();
        let meta = item_to_metadata(&item, 99, "user-2");

        assert_eq!(meta.project_id, 99);
        assert_eq!(meta.user_id, "user-2");
        assert_eq!(meta.title, "Untitled Project");
        assert_eq!(meta.status, "UNKNOWN");
        assert_eq!(meta.progress, 0);
        assert_eq!(meta.version, 1);
        assert!(meta.deliverables.is_empty());
        assert!(meta.creative_brief_history.is_empty());
    }

    #[test]
    fn assets_entries_are_normalized() {
        let sparse: Item = [("type".to_string(), s("image"))].into_iter().collect();
        let assets_map: Item = [("asset-1".to_string(), AttributeValue::M(sparse))]
            .into_iter()
            .collect();
        let item: Item = [("Assets".to_string(), AttributeValue::M(assets_map))]
            .into_iter()
            .collect();

        let assets = item_to_assets(&item);
        let entry = &assets["asset-1"];
        assert_eq!(entry["asset_id"], "asset-1");
        assert_eq!(entry["type"], "image");
        assert_eq!(entry["url"], "");
        assert_eq!(entry["scene_id"], Value::Null);
    }

    #[test]
    fn missing_assets_attribute_yields_empty_map() {
        let assets = item_to_assets(&Item::new());
        assert_eq!(assets, json!({}));
    }

    #[test]
    fn nested_attributes_convert_to_json() {
        let inner: Item = [("count".to_string(), n("2"))].into_iter().collect();
        let attr = AttributeValue::L(vec![
            AttributeValue::M(inner),
            AttributeValue::S("final".to_string()),
            AttributeValue::Bool(true),
        ]);

        assert_eq!(
            attr_to_json(&attr),
            json!([{"count": 2}, "final", true])
        );
    }

    #[test]
    fn numeric_strings_parse_with_integer_precision() {
        assert_eq!(parse_number("7234567890123456789"), json!(7234567890123456789i64));
        assert_eq!(parse_number("1.5"), json!(1.5));
    }
}
