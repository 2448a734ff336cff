//! kickturn-query - Filter Engine
//!
//! Compiles a `FilterSpec` into a reusable predicate and applies it to
//! record sets. Facets combine with AND; within a multi-select facet any
//! selected value matching is enough. Evaluation is pure: no IO, no shared
//! state, and identical inputs always produce identically ordered output.

use kickturn_core::{FilterSpec, KickturnResult, Spot};
use std::cmp::Ordering;

/// A validated filter, ready to evaluate against records.
///
/// Compilation validates the spec up front (a malformed filter is rejected
/// before any record is touched) and folds the search term to lowercase
/// once instead of per record.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    spec: FilterSpec,
    search_term: Option<String>,
}

impl CompiledFilter {
    /// Validate `spec` and compile it.
    pub fn compile(spec: &FilterSpec) -> KickturnResult<Self> {
        spec.validate()?;
        let search_term = spec
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Ok(Self {
            spec: spec.clone(),
            search_term,
        })
    }

    /// True when `spot` passes every facet.
    pub fn matches(&self, spot: &Spot) -> bool {
        self.matches_search(spot)
            && self.spec.kind.matches(spot.kind)
            && self.matches_sizes(spot)
            && self.matches_levels(spot)
            && self.matches_tags(spot)
            && self.matches_distance(spot)
            && self.spec.rating.contains(spot.rating_average)
    }

    /// Distance from the filter origin in kilometers.
    ///
    /// `None` when the distance facet is off, or when the record's
    /// coordinates do not resolve to a finite distance. Such records are
    /// excluded from proximity results, never treated as distance zero.
    pub fn distance_from_origin(&self, spot: &Spot) -> Option<f64> {
        let filter = self.spec.distance.as_ref()?;
        let d = kickturn_geo::distance_km(filter.origin, spot.location);
        d.is_finite().then_some(d)
    }

    /// Filter an owned record set and order the survivors.
    ///
    /// With the distance facet on, survivors are sorted nearest-first.
    /// The sort is stable, so equal distances keep their input order.
    /// Without it, input order is preserved untouched.
    pub fn apply(&self, spots: Vec<Spot>) -> Vec<Spot> {
        let survivors: Vec<Spot> = spots.into_iter().filter(|s| self.matches(s)).collect();

        if self.spec.distance.is_none() {
            return survivors;
        }

        // Every survivor resolved a finite distance in matches(), so the
        // infinity fallback cannot reorder anything real.
        let mut keyed: Vec<(f64, Spot)> = survivors
            .into_iter()
            .map(|s| {
                let d = self.distance_from_origin(&s).unwrap_or(f64::INFINITY);
                (d, s)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed.into_iter().map(|(_, s)| s).collect()
    }

    fn matches_search(&self, spot: &Spot) -> bool {
        let Some(term) = &self.search_term else {
            return true;
        };
        spot.title.to_lowercase().contains(term)
            || spot.description.to_lowercase().contains(term)
            || spot.tags.iter().any(|t| t.to_lowercase().contains(term))
    }

    fn matches_sizes(&self, spot: &Spot) -> bool {
        self.spec.sizes.is_empty() || self.spec.sizes.contains(&spot.size)
    }

    fn matches_levels(&self, spot: &Spot) -> bool {
        self.spec.levels.is_empty()
            || spot.levels.iter().any(|level| self.spec.levels.contains(level))
    }

    fn matches_tags(&self, spot: &Spot) -> bool {
        self.spec.tags.is_empty() || spot.tags.iter().any(|tag| self.spec.tags.contains(tag))
    }

    fn matches_distance(&self, spot: &Spot) -> bool {
        let Some(filter) = &self.spec.distance else {
            return true;
        };
        match self.distance_from_origin(spot) {
            Some(d) => d <= filter.radius_km,
            None => false,
        }
    }
}

/// Validate `spec`, filter `spots`, and order the result in one call.
pub fn apply(spec: &FilterSpec, spots: Vec<Spot>) -> KickturnResult<Vec<Spot>> {
    let filter = CompiledFilter::compile(spec)?;
    Ok(filter.apply(spots))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kickturn_core::{
        new_user_id, FilterError, GeoPoint, KickturnError, SkillLevel, SpotKind, SpotKindFilter,
        SpotSize,
    };

    fn spot(title: &str) -> Spot {
        Spot::new(
            title,
            GeoPoint::new(32.0853, 34.7818),
            SpotSize::Medium,
            SpotKind::Street,
            new_user_id(),
        )
        .with_approved(true)
    }

    fn titles(spots: &[Spot]) -> Vec<&str> {
        spots.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_compile_rejects_invalid_spec() {
        let spec = FilterSpec::new().with_rating(4.0, 1.0);
        let err = CompiledFilter::compile(&spec).unwrap_err();
        assert!(matches!(
            err,
            KickturnError::Filter(FilterError::InvalidRatingRange { .. })
        ));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_default_spec_keeps_everything_in_order() {
        let spots = vec![spot("a"), spot("b"), spot("c")];
        let result = apply(&FilterSpec::default(), spots).unwrap();
        assert_eq!(titles(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_facets_combine_with_and() {
        let spots = vec![
            spot("street-medium-high").with_rating(4.5, 10),
            Spot {
                kind: SpotKind::Park,
                ..spot("park-medium-high").with_rating(4.5, 10)
            },
            Spot {
                size: SpotSize::Large,
                ..spot("street-large-high").with_rating(4.5, 10)
            },
            spot("street-medium-low").with_rating(1.0, 3),
        ];

        let spec = FilterSpec::new()
            .with_kind(SpotKindFilter::Street)
            .with_size(SpotSize::Medium)
            .with_rating(4.0, 5.0);
        let result = apply(&spec, spots).unwrap();
        assert_eq!(titles(&result), vec!["street-medium-high"]);
    }

    #[test]
    fn test_levels_match_any_of() {
        let both = spot("both").with_levels(vec![SkillLevel::Beginner, SkillLevel::Advanced]);
        let beginner_only = spot("beginner").with_levels(vec![SkillLevel::Beginner]);
        let unleveled = spot("unleveled");

        let advanced = FilterSpec::new().with_level(SkillLevel::Advanced);
        let result = apply(&advanced, vec![both.clone(), beginner_only.clone(), unleveled.clone()])
            .unwrap();
        assert_eq!(titles(&result), vec!["both"]);

        let intermediate = FilterSpec::new().with_level(SkillLevel::Intermediate);
        let result = apply(&intermediate, vec![both, beginner_only, unleveled]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_tags_match_any_of_exact_case() {
        let rails = spot("rails").with_tags(vec!["rail".to_string(), "ledge".to_string()]);
        let capital = spot("capital").with_tags(vec!["Rail".to_string()]);

        let spec = FilterSpec::new().with_tag("rail");
        let result = apply(&spec, vec![rails, capital]).unwrap();
        assert_eq!(titles(&result), vec!["rails"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let in_title = spot("Big LEDGE plaza");
        let in_description = spot("plaza").with_description("smooth ledge and flat ground");
        let in_tags = spot("downtown").with_tags(vec!["Ledge".to_string()]);
        let unrelated = spot("vert ramp");

        let spec = FilterSpec::new().with_search("ledge");
        let result = apply(
            &spec,
            vec![in_title, in_description, in_tags, unrelated],
        )
        .unwrap();
        assert_eq!(titles(&result), vec!["Big LEDGE plaza", "plaza", "downtown"]);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let spots = vec![spot("a"), spot("b")];
        let spec = FilterSpec::new().with_search("   ");
        let result = apply(&spec, spots).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_rating_range_selects_inclusively() {
        let spots = vec![
            spot("unrated"),
            spot("mid").with_rating(2.5, 4),
            spot("high").with_rating(4.9, 21),
        ];
        let spec = FilterSpec::new().with_rating(2.0, 5.0);
        let result = apply(&spec, spots).unwrap();
        assert_eq!(titles(&result), vec!["mid", "high"]);
    }

    #[test]
    fn test_unrated_spots_match_ranges_from_zero() {
        let spots = vec![spot("unrated"), spot("rated").with_rating(3.0, 2)];
        let spec = FilterSpec::new().with_rating(0.0, 2.0);
        let result = apply(&spec, spots).unwrap();
        assert_eq!(titles(&result), vec!["unrated"]);
    }

    #[test]
    fn test_distance_filters_and_sorts_nearest_first() {
        let origin = GeoPoint::new(32.0853, 34.7818);
        let far = Spot {
            location: GeoPoint::new(32.2, 34.9),
            ..spot("far")
        };
        let near = Spot {
            location: GeoPoint::new(32.0860, 34.7820),
            ..spot("near")
        };
        let overseas = Spot {
            location: GeoPoint::new(40.7128, -74.0060),
            ..spot("overseas")
        };

        let spec = FilterSpec::new().with_distance(origin, 25.0);
        let result = apply(&spec, vec![far, overseas, near]).unwrap();
        assert_eq!(titles(&result), vec!["near", "far"]);
    }

    #[test]
    fn test_distance_ties_keep_input_order() {
        let origin = GeoPoint::new(32.0, 34.0);
        let same_place = GeoPoint::new(32.01, 34.01);
        let first = Spot {
            location: same_place,
            ..spot("first")
        };
        let second = Spot {
            location: same_place,
            ..spot("second")
        };

        let spec = FilterSpec::new().with_distance(origin, 10.0);
        let result = apply(&spec, vec![first, second]).unwrap();
        assert_eq!(titles(&result), vec!["first", "second"]);
    }

    #[test]
    fn test_non_finite_coordinates_are_excluded_not_zero() {
        let origin = GeoPoint::new(32.0, 34.0);
        let broken = Spot {
            location: GeoPoint::new(f64::NAN, 34.0),
            ..spot("broken")
        };
        let fine = Spot {
            location: GeoPoint::new(32.01, 34.01),
            ..spot("fine")
        };

        let spec = FilterSpec::new().with_distance(origin, 10_000.0);
        let result = apply(&spec, vec![broken, fine]).unwrap();
        assert_eq!(titles(&result), vec!["fine"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let spots: Vec<Spot> = (0..20)
            .map(|i| {
                spot(&format!("spot-{}", i)).with_rating((i % 6) as f64 * 0.9, i as u32)
            })
            .collect();
        let spec = FilterSpec::new().with_rating(1.0, 4.0);

        let first = apply(&spec, spots.clone()).unwrap();
        let second = apply(&spec, spots).unwrap();
        assert_eq!(first, second);
    }
}
