//! S3 content fetching.

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client;
use serde_json::Value;

use portal_core::s3uri::S3Uri;

use crate::retry::{with_transport_retry, TransientError};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("S3 request failed: {0}")]
    Request(String),
    #[error("S3 object could not be decoded: {0}")]
    Decode(String),
    #[error("S3 unreachable: {0}")]
    Transport(String),
}

/// Read-only S3 access. All project content is fetched whole; documents are
/// small by contract.
#[derive(Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch and parse a JSON document. `None` when the object is absent.
    pub async fn fetch_json(&self, uri: &S3Uri) -> Result<Option<Value>, FetchError> {
        let Some(bytes) = self.fetch_bytes(uri).await? else {
            return Ok(None);
        };
        let doc = serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Some(doc))
    }

    /// Fetch a UTF-8 text document. `None` when the object is absent.
    pub async fn fetch_text(&self, uri: &S3Uri) -> Result<Option<String>, FetchError> {
        let Some(bytes) = self.fetch_bytes(uri).await? else {
            return Ok(None);
        };
        let text = String::from_utf8(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(Some(text))
    }

    async fn fetch_bytes(&self, uri: &S3Uri) -> Result<Option<Vec<u8>>, FetchError> {
        let result = with_transport_retry("s3.get_object", || {
            self.client
                .get_object()
                .bucket(&uri.bucket)
                .key(&uri.key)
                .send()
        })
        .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => return map_get_object_error(err),
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Some(body.to_vec()))
    }
}

fn map_get_object_error(err: SdkError<GetObjectError>) -> Result<Option<Vec<u8>>, FetchError> {
    if err.is_transient() {
        return Err(FetchError::Transport(err.to_string()));
    }
    match err.into_service_error() {
        GetObjectError::NoSuchKey(_) => Ok(None),
        other => Err(FetchError::Request(
            other
                .message()
                .unwrap_or("unrecognized S3 error")
                .to_string(),
        )),
    }
}
