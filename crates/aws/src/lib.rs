//! AWS integrations for the portal backend.
//!
//! Everything that crosses the wire to AWS lives here: client construction,
//! Parameter Store config loading, the DynamoDB metadata store, S3 content
//! fetching, Cognito identity operations, and the project content service
//! that stitches metadata and content together.

pub mod clients;
pub mod content;
pub mod identity;
pub mod metadata;
pub mod params;
pub mod projects;
pub mod retry;
