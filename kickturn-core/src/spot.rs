//! Catalog record structures

use crate::{
    new_spot_id, MutationKind, SkillLevel, SpotId, SpotKind, SpotSize, Timestamp, UserId,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Geographic position in WGS84 decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, south is negative (-90 to 90)
    pub lat: f64,
    /// Longitude in degrees, west is negative (-180 to 180)
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from decimal degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both coordinates are finite and inside the WGS84 domain.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A skate spot in the catalog.
///
/// The single record shape every layer consumes and produces. Records are
/// immutable once fetched into a query cycle; the serving layer never edits
/// them, only the cache entries wrapping collections of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub spot_id: SpotId,
    pub title: String,
    pub description: String,
    /// Free-form labels; set semantics at the filter boundary.
    pub tags: Vec<String>,
    pub location: GeoPoint,
    pub size: SpotSize,
    /// Skill levels this spot suits. A spot can carry several.
    pub levels: Vec<SkillLevel>,
    pub kind: SpotKind,
    /// Derived average over submitted ratings, 0.0 when unrated.
    pub rating_average: f64,
    /// Number of submitted ratings. Zero distinguishes "unrated" from
    /// "rated exactly zero".
    pub rating_count: u32,
    /// Only approved records are served by the public catalog.
    pub approved: bool,
    pub created_at: Timestamp,
    pub created_by: UserId,
}

impl Spot {
    /// Create a new unapproved, unrated spot.
    pub fn new(
        title: &str,
        location: GeoPoint,
        size: SpotSize,
        kind: SpotKind,
        created_by: UserId,
    ) -> Self {
        Self {
            spot_id: new_spot_id(),
            title: title.to_string(),
            description: String::new(),
            tags: Vec::new(),
            location,
            size,
            levels: Vec::new(),
            kind,
            rating_average: 0.0,
            rating_count: 0,
            approved: false,
            created_at: Utc::now(),
            created_by,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set the tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the skill levels.
    pub fn with_levels(mut self, levels: Vec<SkillLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// Set the derived rating aggregate.
    pub fn with_rating(mut self, average: f64, count: u32) -> Self {
        self.rating_average = average;
        self.rating_count = count;
        self
    }

    /// Set the approval flag.
    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    /// True when no ratings have been submitted yet.
    pub fn is_unrated(&self) -> bool {
        self.rating_count == 0
    }

    /// Check for a tag, exact match.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Check whether the spot suits a skill level.
    pub fn has_level(&self, level: SkillLevel) -> bool {
        self.levels.contains(&level)
    }
}

/// A catalog mutation signal delivered to the serving layer.
///
/// Carries just enough to invalidate derived state; invalidation must
/// complete before the originating write is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub kind: MutationKind,
    pub spot_id: SpotId,
}

impl Mutation {
    /// Signal that a spot was created.
    pub fn created(spot_id: SpotId) -> Self {
        Self {
            kind: MutationKind::Created,
            spot_id,
        }
    }

    /// Signal that a spot was approved into the public catalog.
    pub fn approved(spot_id: SpotId) -> Self {
        Self {
            kind: MutationKind::Approved,
            spot_id,
        }
    }

    /// Signal that a spot was deleted.
    pub fn deleted(spot_id: SpotId) -> Self {
        Self {
            kind: MutationKind::Deleted,
            spot_id,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
