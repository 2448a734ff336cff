//! kickturn-analytics - Catalog Reports
//!
//! Aggregate reporting over the approved spot catalog: growth over a
//! trailing window, composition breakdowns, a contributor leaderboard, and
//! spatial density on the shared geo grid.
//!
//! Reports are computed fresh on every call and never cached. The catalog
//! keeps its hot read path behind the view cache; analytics reads are rare
//! enough that recomputing keeps them trivially consistent with the store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use kickturn_core::{
    ConfigError, KickturnResult, SkillLevel, Spot, SpotId, SpotKind, SpotSize, StoreError,
    Timestamp, UserId,
};
use kickturn_geo::{bin, GeoBinKey, DEFAULT_BIN_SIZE_DEGREES};
use kickturn_store::SpotStore;

/// Hard upper bound on the growth window.
pub const MAX_WINDOW_DAYS: u32 = 60;

/// Hard upper bound on the contributor leaderboard length.
pub const MAX_TOP_CONTRIBUTORS: usize = 20;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for report generation.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Trailing growth window in whole UTC days, ending today.
    pub window_days: u32,
    /// Leaderboard length for the contributor ranking.
    pub top_contributors: usize,
    /// Grid cell width for spatial density, in decimal degrees.
    pub bin_size_degrees: f64,
    /// How long a store fetch may run before the report fails retryably.
    pub fetch_timeout: Duration,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            top_contributors: 5,
            bin_size_degrees: DEFAULT_BIN_SIZE_DEGREES,
            fetch_timeout: Duration::from_secs(5),
        }
    }
}

impl AnalyticsConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the growth window length in days.
    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    /// Set the contributor leaderboard length.
    pub fn with_top_contributors(mut self, n: usize) -> Self {
        self.top_contributors = n;
        self
    }

    /// Set the density grid cell width in decimal degrees.
    pub fn with_bin_size(mut self, degrees: f64) -> Self {
        self.bin_size_degrees = degrees;
        self
    }

    /// Set the store fetch deadline.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Validate the configuration against the hard bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidValue {
                field: "window_days".to_string(),
                value: self.window_days.to_string(),
                reason: format!("must be between 1 and {}", MAX_WINDOW_DAYS),
            });
        }
        if self.top_contributors == 0 || self.top_contributors > MAX_TOP_CONTRIBUTORS {
            return Err(ConfigError::InvalidValue {
                field: "top_contributors".to_string(),
                value: self.top_contributors.to_string(),
                reason: format!("must be between 1 and {}", MAX_TOP_CONTRIBUTORS),
            });
        }
        if !self.bin_size_degrees.is_finite() || self.bin_size_degrees <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "bin_size_degrees".to_string(),
                value: self.bin_size_degrees.to_string(),
                reason: "must be a positive number of degrees".to_string(),
            });
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "fetch_timeout".to_string(),
                value: "0".to_string(),
                reason: "store fetches need a positive deadline".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// REPORT TYPES
// ============================================================================

/// Approved spots created on one UTC calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Catalog composition by spot size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBreakdown {
    pub small: u64,
    pub medium: u64,
    pub large: u64,
}

/// Catalog composition by suited skill level.
///
/// A spot counts once for every level it carries, so the buckets may sum
/// to more than the catalog total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBreakdown {
    pub beginner: u64,
    pub intermediate: u64,
    pub advanced: u64,
}

/// Catalog composition by spot kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindBreakdown {
    pub park: u64,
    pub street: u64,
}

/// One row of the contributor leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRank {
    pub user_id: UserId,
    pub count: u64,
}

/// Minimal reference to a spot inside a density cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotRef {
    pub spot_id: SpotId,
    pub title: String,
}

/// Spot density within one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBinDensity {
    pub bin: GeoBinKey,
    /// Southwest corner of the cell in decimal degrees.
    pub sw_lat: f64,
    pub sw_lon: f64,
    pub count: u64,
    /// Deduplicated spots inside the cell, in catalog order.
    pub spots: Vec<SpotRef>,
}

/// A full analytics report over the approved catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub generated_at: Timestamp,
    pub total_spots: u64,
    /// Dense daily creation counts, oldest day first.
    pub daily_counts: Vec<DailyCount>,
    pub sizes: SizeBreakdown,
    pub levels: LevelBreakdown,
    pub kinds: KindBreakdown,
    /// Most spots first; ties ordered by ascending user ID.
    pub top_contributors: Vec<ContributorRank>,
    /// Density cells ordered by grid key.
    pub density: Vec<GeoBinDensity>,
}

// ============================================================================
// ANALYTICS ENGINE
// ============================================================================

/// Computes [`AnalyticsReport`]s over a backing store.
pub struct AnalyticsEngine<S: SpotStore> {
    /// The backing store.
    store: Arc<S>,
    /// Validated configuration.
    config: AnalyticsConfig,
}

impl<S: SpotStore> AnalyticsEngine<S> {
    /// Create a new engine over a store.
    pub fn new(store: Arc<S>, config: AnalyticsConfig) -> KickturnResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults(store: Arc<S>) -> Self {
        // The default config always validates.
        Self {
            store,
            config: AnalyticsConfig::default(),
        }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Compute a fresh report over the approved catalog.
    ///
    /// Nothing here is cached; each call reflects the store at its own
    /// read time. Both store fetches run under the configured deadline,
    /// so a stalled store fails the report instead of hanging it.
    pub async fn report(&self) -> KickturnResult<AnalyticsReport> {
        let today = Utc::now().date_naive();
        let window_start =
            today - chrono::Duration::days(i64::from(self.config.window_days) - 1);
        let cutoff = window_start.and_time(NaiveTime::MIN).and_utc();

        let all = self.fetch_with_timeout(self.store.fetch_all_approved()).await?;
        let windowed = self
            .fetch_with_timeout(self.store.fetch_approved_since(cutoff))
            .await?;

        let report = AnalyticsReport {
            generated_at: Utc::now(),
            total_spots: all.len() as u64,
            daily_counts: daily_series(&windowed, window_start, self.config.window_days),
            sizes: size_breakdown(&all),
            levels: level_breakdown(&all),
            kinds: kind_breakdown(&all),
            top_contributors: rank_contributors(&all, self.config.top_contributors),
            density: density_grid(&all, self.config.bin_size_degrees),
        };

        tracing::debug!(
            total = report.total_spots,
            window_days = self.config.window_days,
            cells = report.density.len(),
            "Analytics report generated"
        );
        Ok(report)
    }

    /// Run a store future under the configured fetch deadline.
    async fn fetch_with_timeout<T>(
        &self,
        fut: impl Future<Output = KickturnResult<T>>,
    ) -> KickturnResult<T> {
        let deadline = self.config.fetch_timeout;
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout {
                waited_ms: deadline.as_millis() as u64,
            }
            .into()),
        }
    }
}

impl<S: SpotStore> Clone for AnalyticsEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Dense per-day creation counts across the window, oldest day first.
fn daily_series(spots: &[Spot], window_start: NaiveDate, window_days: u32) -> Vec<DailyCount> {
    let mut by_day: HashMap<NaiveDate, u64> = HashMap::new();
    for spot in spots {
        *by_day.entry(spot.created_at.date_naive()).or_insert(0) += 1;
    }

    (0..window_days)
        .map(|offset| {
            let date = window_start + chrono::Duration::days(i64::from(offset));
            DailyCount {
                date,
                count: by_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

fn size_breakdown(spots: &[Spot]) -> SizeBreakdown {
    let mut out = SizeBreakdown::default();
    for spot in spots {
        match spot.size {
            SpotSize::Small => out.small += 1,
            SpotSize::Medium => out.medium += 1,
            SpotSize::Large => out.large += 1,
        }
    }
    out
}

fn level_breakdown(spots: &[Spot]) -> LevelBreakdown {
    let mut out = LevelBreakdown::default();
    for spot in spots {
        for level in &spot.levels {
            match level {
                SkillLevel::Beginner => out.beginner += 1,
                SkillLevel::Intermediate => out.intermediate += 1,
                SkillLevel::Advanced => out.advanced += 1,
            }
        }
    }
    out
}

fn kind_breakdown(spots: &[Spot]) -> KindBreakdown {
    let mut out = KindBreakdown::default();
    for spot in spots {
        match spot.kind {
            SpotKind::Park => out.park += 1,
            SpotKind::Street => out.street += 1,
        }
    }
    out
}

/// Contributor leaderboard: most spots first, ties by ascending user ID.
fn rank_contributors(spots: &[Spot], top_n: usize) -> Vec<ContributorRank> {
    let mut by_user: HashMap<UserId, u64> = HashMap::new();
    for spot in spots {
        *by_user.entry(spot.created_by).or_insert(0) += 1;
    }

    let mut ranks: Vec<ContributorRank> = by_user
        .into_iter()
        .map(|(user_id, count)| ContributorRank { user_id, count })
        .collect();
    ranks.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.user_id.cmp(&b.user_id)));
    ranks.truncate(top_n);
    ranks
}

/// Density cells over the shared grid, ordered by key.
fn density_grid(spots: &[Spot], bin_size_degrees: f64) -> Vec<GeoBinDensity> {
    let mut cells: BTreeMap<GeoBinKey, Vec<SpotRef>> = BTreeMap::new();
    let mut seen: HashSet<(GeoBinKey, SpotId)> = HashSet::new();

    for spot in spots {
        let key = bin(spot.location, bin_size_degrees);
        if seen.insert((key, spot.spot_id)) {
            cells.entry(key).or_default().push(SpotRef {
                spot_id: spot.spot_id,
                title: spot.title.clone(),
            });
        }
    }

    cells
        .into_iter()
        .map(|(key, refs)| {
            let (sw_lat, sw_lon) = key.origin_degrees(bin_size_degrees);
            GeoBinDensity {
                bin: key,
                sw_lat,
                sw_lon,
                count: refs.len() as u64,
                spots: refs,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kickturn_core::KickturnError;
    use kickturn_test_utils::{fixtures, MockSpotStore};
    use uuid::Uuid;

    fn engine(store: Arc<MockSpotStore>) -> AnalyticsEngine<MockSpotStore> {
        AnalyticsEngine::with_defaults(store)
    }

    #[test]
    fn test_analytics_config_builder() {
        let config = AnalyticsConfig::new()
            .with_window_days(14)
            .with_top_contributors(10)
            .with_bin_size(0.5)
            .with_fetch_timeout(Duration::from_secs(2));

        assert_eq!(config.window_days, 14);
        assert_eq!(config.top_contributors, 10);
        assert_eq!(config.bin_size_degrees, 0.5);
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_out_of_range_window() {
        assert!(AnalyticsConfig::new().with_window_days(0).validate().is_err());
        assert!(AnalyticsConfig::new()
            .with_window_days(MAX_WINDOW_DAYS + 1)
            .validate()
            .is_err());
        assert!(AnalyticsConfig::new()
            .with_window_days(MAX_WINDOW_DAYS)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_config_rejects_out_of_range_leaderboard() {
        assert!(AnalyticsConfig::new()
            .with_top_contributors(0)
            .validate()
            .is_err());
        assert!(AnalyticsConfig::new()
            .with_top_contributors(MAX_TOP_CONTRIBUTORS + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_rejects_bad_bin_size() {
        assert!(AnalyticsConfig::new().with_bin_size(0.0).validate().is_err());
        assert!(AnalyticsConfig::new().with_bin_size(-0.25).validate().is_err());
        assert!(AnalyticsConfig::new()
            .with_bin_size(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_rejects_zero_fetch_timeout() {
        assert!(AnalyticsConfig::new()
            .with_fetch_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let store = Arc::new(MockSpotStore::new());
        let config = AnalyticsConfig::new().with_window_days(0);
        assert!(AnalyticsEngine::new(store, config).is_err());
    }

    #[tokio::test]
    async fn test_empty_store_yields_zero_report() {
        let store = fixtures::seeded_store(vec![]);
        let report = engine(store).report().await.unwrap();

        assert_eq!(report.total_spots, 0);
        assert_eq!(report.daily_counts.len(), 30);
        assert!(report.daily_counts.iter().all(|day| day.count == 0));
        assert_eq!(report.sizes, SizeBreakdown::default());
        assert_eq!(report.levels, LevelBreakdown::default());
        assert_eq!(report.kinds, KindBreakdown::default());
        assert!(report.top_contributors.is_empty());
        assert!(report.density.is_empty());
    }

    #[tokio::test]
    async fn test_daily_series_is_dense_and_ascending() {
        let store = fixtures::seeded_store(vec![
            fixtures::spot_aged("today", 0),
            fixtures::spot_aged("yesterday-a", 1),
            fixtures::spot_aged("yesterday-b", 1),
            fixtures::spot_aged("last-week", 5),
        ]);
        let report = engine(store).report().await.unwrap();

        assert_eq!(report.daily_counts.len(), 30);
        for pair in report.daily_counts.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }

        let today = Utc::now().date_naive();
        let count_on = |days_ago: i64| {
            let date = today - chrono::Duration::days(days_ago);
            report
                .daily_counts
                .iter()
                .find(|day| day.date == date)
                .map(|day| day.count)
        };
        assert_eq!(count_on(0), Some(1));
        assert_eq!(count_on(1), Some(2));
        assert_eq!(count_on(2), Some(0));
        assert_eq!(count_on(5), Some(1));
        assert_eq!(report.daily_counts.last().map(|day| day.date), Some(today));
    }

    #[tokio::test]
    async fn test_window_length_follows_config() {
        let store = fixtures::seeded_store(vec![fixtures::spot_aged("recent", 2)]);
        let config = AnalyticsConfig::new().with_window_days(7);
        let engine = AnalyticsEngine::new(store, config).unwrap();

        let report = engine.report().await.unwrap();
        assert_eq!(report.daily_counts.len(), 7);
    }

    #[tokio::test]
    async fn test_breakdowns_count_composition() {
        let mut small_street = fixtures::spot_named("A");
        small_street.size = SpotSize::Small;
        small_street.kind = SpotKind::Street;
        small_street.levels = vec![SkillLevel::Beginner, SkillLevel::Intermediate];

        let mut large_park = fixtures::spot_named("B");
        large_park.size = SpotSize::Large;
        large_park.kind = SpotKind::Park;
        large_park.levels = vec![SkillLevel::Intermediate, SkillLevel::Advanced];

        let mut medium_street = fixtures::spot_named("C");
        medium_street.size = SpotSize::Medium;
        medium_street.kind = SpotKind::Street;
        medium_street.levels = vec![];

        let store = fixtures::seeded_store(vec![small_street, large_park, medium_street]);
        let report = engine(store).report().await.unwrap();

        assert_eq!(report.total_spots, 3);
        assert_eq!(report.sizes.small, 1);
        assert_eq!(report.sizes.medium, 1);
        assert_eq!(report.sizes.large, 1);
        assert_eq!(report.kinds.street, 2);
        assert_eq!(report.kinds.park, 1);
        // A spot counts once per level it carries.
        assert_eq!(report.levels.beginner, 1);
        assert_eq!(report.levels.intermediate, 2);
        assert_eq!(report.levels.advanced, 1);
    }

    #[tokio::test]
    async fn test_top_contributors_rank_and_tiebreak() {
        let prolific = Uuid::from_u128(7);
        let tied_low = Uuid::from_u128(1);
        let tied_high = Uuid::from_u128(2);
        let single = Uuid::from_u128(9);

        let mut spots = Vec::new();
        for (user, n) in [(prolific, 3), (tied_low, 2), (tied_high, 2), (single, 1)] {
            for i in 0..n {
                let mut spot = fixtures::spot_named(&format!("spot-{user}-{i}"));
                spot.created_by = user;
                spots.push(spot);
            }
        }

        let store = fixtures::seeded_store(spots);
        let config = AnalyticsConfig::new().with_top_contributors(3);
        let engine = AnalyticsEngine::new(store, config).unwrap();

        let ranks = engine.report().await.unwrap().top_contributors;
        assert_eq!(ranks.len(), 3);
        assert_eq!(ranks[0], ContributorRank { user_id: prolific, count: 3 });
        assert_eq!(ranks[1], ContributorRank { user_id: tied_low, count: 2 });
        assert_eq!(ranks[2], ContributorRank { user_id: tied_high, count: 2 });
    }

    #[tokio::test]
    async fn test_density_groups_shared_cells() {
        let store = fixtures::seeded_store(vec![
            fixtures::spot_at(32.05, 34.80),
            fixtures::spot_at(32.10, 34.90),
            fixtures::spot_at(32.30, 34.80),
        ]);
        let report = engine(store).report().await.unwrap();

        assert_eq!(report.density.len(), 2);

        let shared = &report.density[0];
        assert_eq!(
            shared.bin,
            GeoBinKey {
                lat_bin: 128,
                lon_bin: 139
            }
        );
        assert_eq!(shared.count, 2);
        assert_eq!(shared.spots.len(), 2);

        let lone = &report.density[1];
        assert_eq!(lone.count, 1);
        assert_eq!(lone.sw_lat, 32.25);
        assert_eq!(lone.sw_lon, 34.75);
    }

    #[tokio::test]
    async fn test_density_keeps_contributor_lists_per_cell() {
        // Two neighbouring Tel Aviv spots share a cell; New York gets its own.
        let store = fixtures::seeded_store(vec![
            fixtures::spot_at(32.0853, 34.7818),
            fixtures::spot_at(32.0860, 34.7820),
            fixtures::spot_at(40.7128, -74.0060),
        ]);
        let report = engine(store).report().await.unwrap();

        assert_eq!(report.density.len(), 2);
        let tel_aviv = &report.density[0];
        let new_york = &report.density[1];

        assert_eq!(tel_aviv.count, 2);
        assert_eq!(tel_aviv.spots.len(), 2);
        let ids: Vec<SpotId> = tel_aviv.spots.iter().map(|s| s.spot_id).collect();
        assert_ne!(ids[0], ids[1]);

        assert_eq!(new_york.count, 1);
        assert_eq!(new_york.spots.len(), 1);
    }

    #[tokio::test]
    async fn test_old_spots_count_in_composition_not_growth() {
        let store = fixtures::seeded_store(vec![
            fixtures::spot_aged("ancient", 100),
            fixtures::spot_aged("fresh", 1),
        ]);
        let report = engine(store).report().await.unwrap();

        assert_eq!(report.total_spots, 2);
        let series_total: u64 = report.daily_counts.iter().map(|day| day.count).sum();
        assert_eq!(series_total, 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_propagates_retryably() {
        let store = fixtures::seeded_store(fixtures::spot_batch(2));
        store.set_unavailable(true);

        let result = engine(store).report().await;
        assert!(result.unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn test_slow_store_times_out_report_retryably() {
        let store = fixtures::seeded_store(fixtures::spot_batch(3));
        store.set_fetch_delay(Some(Duration::from_millis(80)));
        let config = AnalyticsConfig::new().with_fetch_timeout(Duration::from_millis(10));
        let engine = AnalyticsEngine::new(Arc::clone(&store), config).unwrap();

        // A stalled store fails the report at the deadline instead of
        // holding it for the full fetch.
        let err = engine.report().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            KickturnError::Store(StoreError::Timeout { .. })
        ));

        // Once the store recovers, the same engine succeeds.
        store.set_fetch_delay(None);
        let report = engine.report().await.unwrap();
        assert_eq!(report.total_spots, 3);
    }

    #[tokio::test]
    async fn test_reports_are_fresh_not_cached() {
        let store = fixtures::seeded_store(fixtures::spot_batch(2));
        let engine = engine(Arc::clone(&store));

        let first = engine.report().await.unwrap();
        store.insert_spot(fixtures::spot_named("newcomer"));
        let second = engine.report().await.unwrap();

        assert_eq!(first.total_spots, 2);
        assert_eq!(second.total_spots, 3);
        assert_eq!(store.call_counts().fetch_all, 2);
    }
}
