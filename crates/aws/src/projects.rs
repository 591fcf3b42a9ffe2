//! Project content service.
//!
//! Joins the DynamoDB metadata item with the S3 documents it references, and
//! owns the not-found semantics for both. A missing item, a missing reference
//! attribute, and a missing or empty S3 object are all "not found" to the
//! caller; only a reference that fails validation is treated as server-side
//! data corruption.

use serde::Serialize;
use serde_json::{json, Value};

use portal_core::redact::short_user_id;
use portal_core::s3uri::S3Uri;
use portal_core::types::ProjectId;

use crate::content::{ContentFetcher, FetchError};
use crate::metadata::{self, Item, MetadataStore, ProjectMetadata, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ProjectDataError {
    /// Covers unknown projects and projects owned by someone else alike.
    #[error("Project not found or access denied")]
    ProjectNotFound,
    #[error("{0} not found")]
    RefMissing(&'static str),
    #[error("Invalid {0} reference")]
    RefInvalid(&'static str),
    #[error("{0} file not found in S3")]
    ObjectMissing(&'static str),
    #[error("PPM field '{0}' not found")]
    FieldMissing(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Markdown document plus the version id recorded on the project item.
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    pub content: String,
    pub content_id: Option<String>,
}

#[derive(Clone)]
pub struct ProjectContentService {
    store: MetadataStore,
    fetcher: ContentFetcher,
}

impl ProjectContentService {
    pub fn new(store: MetadataStore, fetcher: ContentFetcher) -> Self {
        Self { store, fetcher }
    }

    pub async fn metadata(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<ProjectMetadata, ProjectDataError> {
        let item = self.project_item(project_id, user_id).await?;
        Ok(metadata::item_to_metadata(&item, project_id, user_id))
    }

    pub async fn ppm(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<Value, ProjectDataError> {
        self.json_content(project_id, user_id, "PPMRef", "PPM").await
    }

    /// Single top-level PPM field, wrapped in an object keyed by the field
    /// name.
    pub async fn ppm_field(
        &self,
        project_id: ProjectId,
        user_id: &str,
        field: &str,
    ) -> Result<Value, ProjectDataError> {
        let ppm = self.json_content(project_id, user_id, "PPMRef", "PPM").await?;
        match ppm.get(field) {
            Some(value) => Ok(json!({ field: value })),
            None => Err(ProjectDataError::FieldMissing(field.to_string())),
        }
    }

    pub async fn script(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<Value, ProjectDataError> {
        self.json_content(project_id, user_id, "ScriptRef", "Script")
            .await
    }

    /// Asset listing comes straight off the metadata item, not S3.
    pub async fn assets(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<Value, ProjectDataError> {
        let item = self.project_item(project_id, user_id).await?;
        Ok(json!({ "assets": metadata::item_to_assets(&item) }))
    }

    pub async fn creative_brief(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<TextContent, ProjectDataError> {
        self.text_content(
            project_id,
            user_id,
            "CreativeBriefUrl",
            "CreativeBriefId",
            "Creative Brief",
        )
        .await
    }

    pub async fn assets_script(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<TextContent, ProjectDataError> {
        self.text_content(
            project_id,
            user_id,
            "AssetsScriptUrl",
            "AssetsScriptId",
            "Assets Script",
        )
        .await
    }

    async fn project_item(
        &self,
        project_id: ProjectId,
        user_id: &str,
    ) -> Result<Item, ProjectDataError> {
        match self.store.fetch_item(project_id, user_id).await? {
            Some(item) => Ok(item),
            None => {
                tracing::warn!(
                    project_id,
                    user = %short_user_id(user_id),
                    "project not found"
                );
                Err(ProjectDataError::ProjectNotFound)
            }
        }
    }

    async fn json_content(
        &self,
        project_id: ProjectId,
        user_id: &str,
        ref_field: &str,
        name: &'static str,
    ) -> Result<Value, ProjectDataError> {
        let item = self.project_item(project_id, user_id).await?;
        let uri = resolve_ref(&item, ref_field, name)?;

        tracing::info!(
            content = name,
            bucket = %uri.bucket,
            key = %uri.key,
            "fetching content from S3"
        );

        match self.fetcher.fetch_json(&uri).await? {
            Some(doc) if !is_empty_document(&doc) => Ok(doc),
            _ => Err(ProjectDataError::ObjectMissing(name)),
        }
    }

    async fn text_content(
        &self,
        project_id: ProjectId,
        user_id: &str,
        url_field: &str,
        id_field: &str,
        name: &'static str,
    ) -> Result<TextContent, ProjectDataError> {
        let item = self.project_item(project_id, user_id).await?;
        let uri = resolve_ref(&item, url_field, name)?;

        tracing::info!(
            content = name,
            bucket = %uri.bucket,
            key = %uri.key,
            "fetching text content from S3"
        );

        match self.fetcher.fetch_text(&uri).await? {
            Some(content) if !content.is_empty() => Ok(TextContent {
                content,
                content_id: metadata::get_s(&item, id_field),
            }),
            _ => Err(ProjectDataError::ObjectMissing(name)),
        }
    }
}

fn resolve_ref(item: &Item, ref_field: &str, name: &'static str) -> Result<S3Uri, ProjectDataError> {
    let Some(reference) = metadata::get_s(item, ref_field).filter(|r| !r.is_empty()) else {
        return Err(ProjectDataError::RefMissing(name));
    };
    S3Uri::parse(&reference).map_err(|e| {
        tracing::error!(reference = %reference, error = %e, "invalid S3 reference");
        ProjectDataError::RefInvalid(name)
    })
}

/// An object that exists but holds nothing is served as not-found, so a
/// half-written upload never reaches clients as an empty document.
fn is_empty_document(doc: &Value) -> bool {
    match doc {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
