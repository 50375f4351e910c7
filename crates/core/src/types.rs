/// Petition ids are assigned by the upstream API.
pub type PetitionId = i64;

/// Tracking records use service-generated UUIDs.
pub type TrackingId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
