//! Typed filter facets for catalog queries
//!
//! A `FilterSpec` combines independent facets with AND semantics. Within a
//! multi-select facet, any selected value matching is enough (OR). An empty
//! multi-select facet is unconstrained, never "match nothing", so
//! `FilterSpec::default()` matches every record.

use crate::{FilterError, GeoPoint, SkillLevel, SpotKind, SpotSize};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lowest representable rating average.
pub const RATING_MIN: f64 = 0.0;

/// Highest representable rating average.
pub const RATING_MAX: f64 = 5.0;

/// Park/street facet. `All` disables the facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpotKindFilter {
    #[default]
    All,
    Park,
    Street,
}

impl SpotKindFilter {
    /// True when `kind` passes this facet.
    pub fn matches(&self, kind: SpotKind) -> bool {
        match self {
            SpotKindFilter::All => true,
            SpotKindFilter::Park => kind == SpotKind::Park,
            SpotKindFilter::Street => kind == SpotKind::Street,
        }
    }
}

/// Inclusive bounds on the derived rating average.
///
/// Unrated records carry an average of 0.0, so a range starting at 0
/// includes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingRange {
    fn default() -> Self {
        Self {
            min: RATING_MIN,
            max: RATING_MAX,
        }
    }
}

impl RatingRange {
    /// Create an inclusive range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when `value` lies inside the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when the range admits every representable rating.
    pub fn is_unconstrained(&self) -> bool {
        self.min <= RATING_MIN && self.max >= RATING_MAX
    }
}

/// Proximity facet: keep records within `radius_km` of `origin`.
/// Presence of the struct is what enables the facet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceFilter {
    pub origin: GeoPoint,
    pub radius_km: f64,
}

impl DistanceFilter {
    /// Create a proximity facet around `origin`.
    pub fn new(origin: GeoPoint, radius_km: f64) -> Self {
        Self { origin, radius_km }
    }
}

/// Composable filter over the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterSpec {
    /// Case-insensitive substring over title, description, and tags.
    /// `None` or blank matches everything.
    pub search: Option<String>,
    pub kind: SpotKindFilter,
    /// Empty set is unconstrained; otherwise membership.
    pub sizes: HashSet<SpotSize>,
    /// Empty set is unconstrained; otherwise any shared level matches.
    pub levels: HashSet<SkillLevel>,
    /// Empty set is unconstrained; otherwise any shared tag matches.
    /// Tag comparison is exact; only the search term is case-folded.
    pub tags: HashSet<String>,
    pub distance: Option<DistanceFilter>,
    pub rating: RatingRange,
}

impl FilterSpec {
    /// Create a filter that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search term.
    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }

    /// Constrain to parks or to street spots.
    pub fn with_kind(mut self, kind: SpotKindFilter) -> Self {
        self.kind = kind;
        self
    }

    /// Add a size to the size facet.
    pub fn with_size(mut self, size: SpotSize) -> Self {
        self.sizes.insert(size);
        self
    }

    /// Add a skill level to the level facet.
    pub fn with_level(mut self, level: SkillLevel) -> Self {
        self.levels.insert(level);
        self
    }

    /// Add a tag to the tag facet.
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }

    /// Keep only records within `radius_km` of `origin`.
    /// Results are ordered nearest-first when this facet is present.
    pub fn with_distance(mut self, origin: GeoPoint, radius_km: f64) -> Self {
        self.distance = Some(DistanceFilter::new(origin, radius_km));
        self
    }

    /// Constrain the derived rating average to `[min, max]`, inclusive.
    pub fn with_rating(mut self, min: f64, max: f64) -> Self {
        self.rating = RatingRange::new(min, max);
        self
    }

    /// Validate facet domains. Runs before any record is evaluated so a
    /// malformed filter never yields a partial result set.
    pub fn validate(&self) -> Result<(), FilterError> {
        if !self.rating.min.is_finite()
            || !self.rating.max.is_finite()
            || self.rating.min > self.rating.max
            || self.rating.min < RATING_MIN
            || self.rating.max > RATING_MAX
        {
            return Err(FilterError::InvalidRatingRange {
                min: self.rating.min,
                max: self.rating.max,
            });
        }

        if let Some(distance) = &self.distance {
            if !distance.origin.is_valid() {
                return Err(FilterError::InvalidCoordinates {
                    lat: distance.origin.lat,
                    lon: distance.origin.lon,
                });
            }
            if !distance.radius_km.is_finite() || distance.radius_km <= 0.0 {
                return Err(FilterError::InvalidRadius {
                    radius_km: distance.radius_km,
                });
            }
        }

        Ok(())
    }

    /// True when no facet constrains the result set.
    pub fn is_match_all(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.kind == SpotKindFilter::All
            && self.sizes.is_empty()
            && self.levels.is_empty()
            && self.tags.is_empty()
            && self.distance.is_none()
            && self.rating.is_unconstrained()
    }
}

// =============================================================================
// TESTS
// =============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_valid_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any finite rating range inside [0, 5] with min <= max validates.
        #[test]
        fn prop_well_formed_rating_ranges_validate(
            min in 0.0f64..=5.0,
            span in 0.0f64..=5.0,
        ) {
            let max = (min + span).min(RATING_MAX);
            let spec = FilterSpec::new().with_rating(min, max);
            prop_assert!(spec.validate().is_ok());
        }

        /// Any inverted rating range is rejected before evaluation.
        #[test]
        fn prop_inverted_rating_ranges_rejected(
            min in 0.0f64..=5.0,
            gap in 0.001f64..=5.0,
        ) {
            let max = min - gap;
            let spec = FilterSpec::new().with_rating(min, max);
            prop_assert!(matches!(
                spec.validate(),
                Err(FilterError::InvalidRatingRange { .. })
            ));
        }

        /// Any in-domain origin with a positive finite radius validates.
        #[test]
        fn prop_valid_distance_facets_validate(
            origin in arb_valid_point(),
            radius_km in 0.001f64..=20_000.0,
        ) {
            let spec = FilterSpec::new().with_distance(origin, radius_km);
            prop_assert!(spec.validate().is_ok());
        }

        /// Out-of-domain latitudes are rejected whatever the radius.
        #[test]
        fn prop_out_of_domain_latitude_rejected(
            excess in 0.001f64..=1000.0,
            lon in -180.0f64..=180.0,
            radius_km in 0.001f64..=100.0,
        ) {
            let spec = FilterSpec::new()
                .with_distance(GeoPoint::new(90.0 + excess, lon), radius_km);
            prop_assert!(matches!(
                spec.validate(),
                Err(FilterError::InvalidCoordinates { .. })
            ));
        }
    }
}
