/// All database primary keys are PostgreSQL BIGSERIAL. Ephemeral question
/// ids share the same numeric space.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
