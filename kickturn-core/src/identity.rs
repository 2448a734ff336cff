//! Identity types for kickturn entities

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Spot identifier using UUIDv7 for timestamp-sortable IDs.
/// UUIDv7 embeds a Unix timestamp, making IDs naturally sortable by creation time.
pub type SpotId = Uuid;

/// Identifier of the user who submitted a spot.
pub type UserId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Generate a new UUIDv7 SpotId (timestamp-sortable).
pub fn new_spot_id() -> SpotId {
    Uuid::now_v7()
}

/// Generate a new UUIDv7 UserId.
pub fn new_user_id() -> UserId {
    Uuid::now_v7()
}
