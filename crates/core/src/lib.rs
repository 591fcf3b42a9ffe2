//! Domain primitives shared by every portal crate.
//!
//! Pure logic only: S3 URI validation, pagination math, and log redaction.
//! Nothing here performs I/O.

pub mod page;
pub mod redact;
pub mod s3uri;
pub mod types;
