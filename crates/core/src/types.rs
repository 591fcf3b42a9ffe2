/// Project primary keys are externally generated 64-bit snowflake IDs.
pub type ProjectId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
