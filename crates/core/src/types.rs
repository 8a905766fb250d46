/// All database primary keys are UUIDs generated by PostgreSQL
/// (`gen_random_uuid()`), so row ids cannot be enumerated.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
