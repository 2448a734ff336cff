//! kickturn-core - Catalog Data Types
//!
//! Pure data structures with no behavior beyond construction and validation.
//! All other kickturn crates depend on this. This crate contains ONLY data
//! types - no caching, no querying, no IO.

pub mod enums;
pub mod error;
pub mod filter;
pub mod identity;
pub mod spot;

pub use enums::{MutationKind, SkillLevel, SpotKind, SpotSize};
pub use error::{ConfigError, FilterError, KickturnError, KickturnResult, StoreError};
pub use filter::{
    DistanceFilter, FilterSpec, RatingRange, SpotKindFilter, RATING_MAX, RATING_MIN,
};
pub use identity::{new_spot_id, new_user_id, SpotId, Timestamp, UserId};
pub use spot::{GeoPoint, Mutation, Spot};
