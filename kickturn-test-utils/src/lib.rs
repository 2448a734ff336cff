//! kickturn Test Utilities
//!
//! Centralized test infrastructure for the kickturn workspace:
//! - Proptest generators for catalog records and filter specs
//! - Pre-built fixtures for common scenarios
//! - Pre-seeded mock store construction
//! - Custom assertions over the kickturn error taxonomy

// Re-export the mock store from its source crate
pub use kickturn_store::{CallCounts, MockSpotStore};

// Re-export core types for convenience
pub use kickturn_core::{
    new_spot_id, new_user_id, ConfigError, DistanceFilter, FilterError, FilterSpec, GeoPoint,
    KickturnError, KickturnResult, Mutation, MutationKind, RatingRange, SkillLevel, Spot, SpotId,
    SpotKind, SpotKindFilter, SpotSize, StoreError, Timestamp, UserId,
};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating kickturn catalog types.

    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    // === Identity Type Generators ===

    /// Generate a random UUID (for generic ID generation).
    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    /// Generate a valid UUIDv7 (timestamp-sortable).
    pub fn arb_uuid_v7() -> impl Strategy<Value = Uuid> {
        Just(()).prop_map(|_| Uuid::now_v7())
    }

    /// Generate a Timestamp within 2020-2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64)
            .prop_map(|secs| chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(chrono::Utc::now))
    }

    // === Enum Generators ===

    /// Generate a SpotSize variant.
    pub fn arb_spot_size() -> impl Strategy<Value = SpotSize> {
        prop_oneof![
            Just(SpotSize::Small),
            Just(SpotSize::Medium),
            Just(SpotSize::Large),
        ]
    }

    /// Generate a SkillLevel variant.
    pub fn arb_skill_level() -> impl Strategy<Value = SkillLevel> {
        prop_oneof![
            Just(SkillLevel::Beginner),
            Just(SkillLevel::Intermediate),
            Just(SkillLevel::Advanced),
        ]
    }

    /// Generate a SpotKind variant.
    pub fn arb_spot_kind() -> impl Strategy<Value = SpotKind> {
        prop_oneof![Just(SpotKind::Park), Just(SpotKind::Street)]
    }

    /// Generate a MutationKind variant.
    pub fn arb_mutation_kind() -> impl Strategy<Value = MutationKind> {
        prop_oneof![
            Just(MutationKind::Created),
            Just(MutationKind::Approved),
            Just(MutationKind::Deleted),
        ]
    }

    /// Generate a SpotKindFilter variant.
    pub fn arb_spot_kind_filter() -> impl Strategy<Value = SpotKindFilter> {
        prop_oneof![
            Just(SpotKindFilter::All),
            Just(SpotKindFilter::Park),
            Just(SpotKindFilter::Street),
        ]
    }

    // === Struct Generators ===

    /// Generate a valid GeoPoint (finite, within coordinate domain).
    pub fn arb_geo_point() -> impl Strategy<Value = GeoPoint> {
        (-90.0f64..=90.0, -180.0f64..180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
    }

    /// Generate a rating pair: unrated `(0.0, 0)` or rated with votes.
    pub fn arb_rating() -> impl Strategy<Value = (f64, u32)> {
        prop_oneof![Just((0.0, 0)), (0.0f64..=5.0, 1u32..500)]
    }

    /// Generate a list of lowercase tags.
    pub fn arb_tags() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z]{3,12}", 0..5)
    }

    /// Generate a duplicate-free skill-level list.
    pub fn arb_levels() -> impl Strategy<Value = Vec<SkillLevel>> {
        prop::sample::subsequence(
            vec![
                SkillLevel::Beginner,
                SkillLevel::Intermediate,
                SkillLevel::Advanced,
            ],
            0..=3,
        )
    }

    /// Generate a Spot with arbitrary facets and approval state.
    pub fn arb_spot() -> impl Strategy<Value = Spot> {
        let identity = (
            "[a-zA-Z0-9 ]{1,40}",
            "[a-zA-Z0-9 .,]{0,200}",
            arb_tags(),
            arb_geo_point(),
        );
        let facets = (
            arb_spot_size(),
            arb_levels(),
            arb_spot_kind(),
            arb_rating(),
            any::<bool>(),
            arb_timestamp(),
        );
        (identity, facets).prop_map(
            |(
                (title, description, tags, location),
                (size, levels, kind, (rating_average, rating_count), approved, created_at),
            )| {
                Spot {
                    spot_id: Uuid::now_v7(),
                    title,
                    description,
                    tags,
                    location,
                    size,
                    levels,
                    kind,
                    rating_average,
                    rating_count,
                    approved,
                    created_at,
                    created_by: Uuid::now_v7(),
                }
            },
        )
    }

    /// Generate an approved Spot.
    pub fn arb_approved_spot() -> impl Strategy<Value = Spot> {
        arb_spot().prop_map(|mut spot| {
            spot.approved = true;
            spot
        })
    }

    /// Generate an ordered rating range within `[0, 5]`.
    pub fn arb_rating_range() -> impl Strategy<Value = RatingRange> {
        (0.0f64..=5.0, 0.0f64..=5.0).prop_map(|(a, b)| {
            if a <= b {
                RatingRange::new(a, b)
            } else {
                RatingRange::new(b, a)
            }
        })
    }

    /// Generate a FilterSpec that always passes validation, with every
    /// facet exercised some of the time.
    pub fn arb_filter_spec() -> impl Strategy<Value = FilterSpec> {
        (
            prop::option::of("[a-z]{1,8}"),
            arb_spot_kind_filter(),
            prop::collection::hash_set(arb_spot_size(), 0..3),
            prop::collection::hash_set(arb_skill_level(), 0..3),
            prop::collection::hash_set("[a-z]{3,10}", 0..3),
            prop::option::of((arb_geo_point(), 0.1f64..500.0)),
            arb_rating_range(),
        )
            .prop_map(|(search, kind, sizes, levels, tags, distance, rating)| FilterSpec {
                search,
                kind,
                sizes,
                levels,
                tags,
                distance: distance
                    .map(|(origin, radius_km)| DistanceFilter::new(origin, radius_km)),
                rating,
            })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built fixtures for common testing scenarios.

    use super::*;
    use std::sync::Arc;

    /// An approved street spot at the given coordinates.
    pub fn spot_at(lat: f64, lon: f64) -> Spot {
        Spot::new(
            "fixture-spot",
            GeoPoint::new(lat, lon),
            SpotSize::Medium,
            SpotKind::Street,
            new_user_id(),
        )
        .with_approved(true)
    }

    /// An approved street spot with the given title.
    pub fn spot_named(title: &str) -> Spot {
        Spot::new(
            title,
            GeoPoint::new(32.0853, 34.7818),
            SpotSize::Medium,
            SpotKind::Street,
            new_user_id(),
        )
        .with_approved(true)
    }

    /// An approved spot created `days_ago` whole days before now.
    pub fn spot_aged(title: &str, days_ago: i64) -> Spot {
        spot_named(title).with_created_at(chrono::Utc::now() - chrono::Duration::days(days_ago))
    }

    /// An approved spot carrying a rating.
    pub fn rated_spot(title: &str, average: f64, count: u32) -> Spot {
        spot_named(title).with_rating(average, count)
    }

    /// A batch of approved spots spread over a small coordinate grid, with
    /// staggered creation times (oldest first) and alternating sizes and
    /// kinds.
    pub fn spot_batch(count: usize) -> Vec<Spot> {
        let sizes = [SpotSize::Small, SpotSize::Medium, SpotSize::Large];
        let kinds = [SpotKind::Street, SpotKind::Park];
        let now = chrono::Utc::now();
        (0..count)
            .map(|i| {
                let lat = 32.05 + (i % 10) as f64 * 0.01;
                let lon = 34.75 + (i / 10) as f64 * 0.01;
                Spot::new(
                    &format!("spot-{i:03}"),
                    GeoPoint::new(lat, lon),
                    sizes[i % sizes.len()],
                    kinds[i % kinds.len()],
                    new_user_id(),
                )
                .with_approved(true)
                .with_created_at(now - chrono::Duration::minutes((count - i) as i64))
            })
            .collect()
    }

    /// A mock store pre-seeded with the given spots.
    pub fn seeded_store(spots: Vec<Spot>) -> Arc<MockSpotStore> {
        let store = MockSpotStore::new();
        store.seed(spots);
        Arc::new(store)
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertions over the kickturn error taxonomy.

    use super::*;

    /// Assert that a KickturnResult is Ok.
    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &KickturnResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert that a KickturnResult is Err.
    #[track_caller]
    pub fn assert_err<T: std::fmt::Debug>(result: &KickturnResult<T>) {
        assert!(result.is_err(), "Expected Err, got Ok: {:?}", result);
    }

    /// Assert that a KickturnResult is a Filter error.
    #[track_caller]
    pub fn assert_filter_error<T: std::fmt::Debug>(result: &KickturnResult<T>) {
        match result {
            Err(KickturnError::Filter(_)) => {}
            other => panic!("Expected Filter error, got: {:?}", other),
        }
    }

    /// Assert that a KickturnResult is a Config error.
    #[track_caller]
    pub fn assert_config_error<T: std::fmt::Debug>(result: &KickturnResult<T>) {
        match result {
            Err(KickturnError::Config(_)) => {}
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    /// Assert that a KickturnResult failed retryably.
    #[track_caller]
    pub fn assert_retryable<T: std::fmt::Debug>(result: &KickturnResult<T>) {
        match result {
            Err(err) if err.is_retryable() => {}
            other => panic!("Expected a retryable error, got: {:?}", other),
        }
    }

    /// Assert that a KickturnResult is SpotNotFound for the given ID.
    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &KickturnResult<T>, spot_id: SpotId) {
        match result {
            Err(KickturnError::Store(StoreError::SpotNotFound { spot_id: id })) => {
                assert_eq!(*id, spot_id, "Wrong spot ID in SpotNotFound error");
            }
            other => panic!("Expected SpotNotFound for {}, got: {:?}", spot_id, other),
        }
    }

    /// Assert that `spots` is sorted by ascending distance from `origin`.
    #[track_caller]
    pub fn assert_sorted_by_distance(origin: GeoPoint, spots: &[Spot]) {
        let distances: Vec<f64> = spots
            .iter()
            .map(|spot| kickturn_geo::distance_km(origin, spot.location))
            .collect();
        for pair in distances.windows(2) {
            assert!(
                pair[0] <= pair[1],
                "Spots not sorted by distance: {:?}",
                distances
            );
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
