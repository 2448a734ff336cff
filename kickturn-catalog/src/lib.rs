//! kickturn-catalog - Cache-First Catalog Reads
//!
//! The serving layer for the approved spot catalog. Every listing consults
//! the shared [`CatalogCache`] before the backing [`SpotStore`]; on a miss
//! the store is fetched under a configured deadline and the result cached
//! for the next caller.
//!
//! # Design Philosophy
//!
//! - **Cache-first, store-second**: a store failure on a miss fails that
//!   one request and leaves the cache untouched, so a later retry can
//!   succeed cleanly.
//! - **Coarse invalidation**: a catalog mutation clears every
//!   mutation-scoped key family before the mutation is acknowledged. A
//!   reader starting after the acknowledgment never sees pre-mutation data.
//! - **No ambient state**: the store, the cache, and the configuration are
//!   built explicitly at startup and handed to [`CatalogIndex::new`].
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::new(MockSpotStore::new());
//! let cache = Arc::new(CatalogCache::new());
//! let catalog = CatalogIndex::new(store, cache, CatalogConfig::default())?;
//!
//! let all = catalog.list_all().await?;
//! let page = catalog.list_page(1, 20).await?;
//!
//! // After a write lands elsewhere, drop every derived view before acking.
//! catalog.invalidate_on_mutation(&Mutation::approved(spot_id));
//! ```

use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kickturn_core::{
    ConfigError, FilterError, FilterSpec, KickturnResult, Mutation, Spot, SpotId, StoreError,
};
use kickturn_query::CompiledFilter;
use kickturn_store::{CacheFamily, CacheKey, CacheValue};

// Re-export the pieces a caller needs to assemble a catalog.
pub use kickturn_store::{CacheStats, CatalogCache, SpotStore};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for the catalog read layer.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// TTL for the full approved listing.
    pub all_spots_ttl: Duration,
    /// TTL for individual page slices.
    pub page_ttl: Duration,
    /// TTL for the approved-spot count.
    pub count_ttl: Duration,
    /// TTL for the recent and top-rated views.
    pub ranked_ttl: Duration,
    /// How long a store fetch may run before the request fails retryably.
    pub fetch_timeout: Duration,
    /// Largest page size a caller may request.
    pub max_page_size: u32,
    /// Largest limit for the recent and top-rated views.
    pub max_view_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            all_spots_ttl: Duration::from_secs(300),
            page_ttl: Duration::from_secs(60),
            count_ttl: Duration::from_secs(60),
            ranked_ttl: Duration::from_secs(120),
            fetch_timeout: Duration::from_secs(5),
            max_page_size: 100,
            max_view_limit: 100,
        }
    }
}

impl CatalogConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL for the full approved listing.
    pub fn with_all_spots_ttl(mut self, ttl: Duration) -> Self {
        self.all_spots_ttl = ttl;
        self
    }

    /// Set the TTL for page slices.
    pub fn with_page_ttl(mut self, ttl: Duration) -> Self {
        self.page_ttl = ttl;
        self
    }

    /// Set the TTL for the approved-spot count.
    pub fn with_count_ttl(mut self, ttl: Duration) -> Self {
        self.count_ttl = ttl;
        self
    }

    /// Set the TTL for the recent and top-rated views.
    pub fn with_ranked_ttl(mut self, ttl: Duration) -> Self {
        self.ranked_ttl = ttl;
        self
    }

    /// Set the store fetch deadline.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the largest page size a caller may request.
    pub fn with_max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = max;
        self
    }

    /// Set the largest limit for the recent and top-rated views.
    pub fn with_max_view_limit(mut self, max: usize) -> Self {
        self.max_view_limit = max;
        self
    }

    /// Validate the configuration.
    ///
    /// TTLs may be zero (caching disabled for that view); the fetch
    /// deadline and the paging bounds must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "fetch_timeout".to_string(),
                value: "0".to_string(),
                reason: "store fetches need a positive deadline".to_string(),
            });
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_page_size".to_string(),
                value: self.max_page_size.to_string(),
                reason: "must allow at least one record per page".to_string(),
            });
        }
        if self.max_view_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_view_limit".to_string(),
                value: self.max_view_limit.to_string(),
                reason: "must allow at least one record per view".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// CATALOG INDEX
// ============================================================================

/// Cache-first reader over the approved spot catalog.
///
/// Listings consult the shared [`CatalogCache`] first and fall back to the
/// backing store on a miss, caching what they fetched for the next caller.
/// Mutation signals clear the derived views synchronously, so a request
/// that observes the acknowledgment also observes the new data.
///
/// # Type Parameters
///
/// - `S`: the backing store consulted on cache misses
pub struct CatalogIndex<S: SpotStore> {
    /// The backing store.
    store: Arc<S>,
    /// The shared view cache.
    cache: Arc<CatalogCache>,
    /// Validated configuration.
    config: CatalogConfig,
}

impl<S: SpotStore> CatalogIndex<S> {
    /// Create a new catalog index over a store and a shared cache.
    pub fn new(
        store: Arc<S>,
        cache: Arc<CatalogCache>,
        config: CatalogConfig,
    ) -> KickturnResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            cache,
            config,
        })
    }

    /// Create a catalog index with the default configuration.
    pub fn with_defaults(store: Arc<S>, cache: Arc<CatalogCache>) -> Self {
        // The default config always validates.
        Self {
            store,
            cache,
            config: CatalogConfig::default(),
        }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Snapshot of cache hit/miss counters and the live entry count.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// List every approved spot in creation order, oldest first.
    pub async fn list_all(&self) -> KickturnResult<Vec<Spot>> {
        if let Some(spots) = self.cached_spots(&CacheKey::AllSpots) {
            return Ok(spots);
        }

        let spots = self
            .fetch_with_timeout(self.store.fetch_all_approved())
            .await?;
        tracing::debug!(count = spots.len(), "Approved catalog fetched from store");
        self.cache.set(
            CacheKey::AllSpots,
            CacheValue::Spots(spots.clone()),
            self.config.all_spots_ttl,
        );
        Ok(spots)
    }

    /// List one page of the approved catalog. Pages are numbered from 1.
    pub async fn list_page(&self, page: u32, page_size: u32) -> KickturnResult<Vec<Spot>> {
        if page == 0 {
            return Err(FilterError::InvalidPage {
                page,
                page_size,
                reason: "page numbering starts at 1".to_string(),
            }
            .into());
        }
        if page_size == 0 {
            return Err(FilterError::InvalidPage {
                page,
                page_size,
                reason: "page size must be positive".to_string(),
            }
            .into());
        }
        if page_size > self.config.max_page_size {
            return Err(FilterError::InvalidPage {
                page,
                page_size,
                reason: format!(
                    "page size exceeds the maximum of {}",
                    self.config.max_page_size
                ),
            }
            .into());
        }

        let key = CacheKey::Page { page, page_size };
        if let Some(spots) = self.cached_spots(&key) {
            return Ok(spots);
        }

        let skip = (page as usize - 1) * page_size as usize;
        let spots = self
            .fetch_with_timeout(self.store.fetch_page(skip, page_size as usize))
            .await?;
        tracing::trace!(
            page,
            page_size,
            count = spots.len(),
            "Catalog page fetched from store"
        );
        self.cache
            .set(key, CacheValue::Spots(spots.clone()), self.config.page_ttl);
        Ok(spots)
    }

    /// List the `limit` most recently created approved spots, newest first.
    pub async fn list_recent(&self, limit: usize) -> KickturnResult<Vec<Spot>> {
        self.validate_view_limit(limit)?;

        let key = CacheKey::Recent { limit };
        if let Some(spots) = self.cached_spots(&key) {
            return Ok(spots);
        }

        // Derived from the full listing so a warm catalog costs no extra
        // store round-trip.
        let mut spots = self.list_all().await?;
        spots.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.spot_id.cmp(&a.spot_id))
        });
        spots.truncate(limit);
        self.cache
            .set(key, CacheValue::Spots(spots.clone()), self.config.ranked_ttl);
        Ok(spots)
    }

    /// List the `limit` highest-rated approved spots.
    ///
    /// Unrated spots never appear here; ties keep creation order.
    pub async fn list_top_rated(&self, limit: usize) -> KickturnResult<Vec<Spot>> {
        self.validate_view_limit(limit)?;

        let key = CacheKey::TopRated { limit };
        if let Some(spots) = self.cached_spots(&key) {
            return Ok(spots);
        }

        let mut rated: Vec<Spot> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|spot| !spot.is_unrated())
            .collect();
        rated.sort_by(|a, b| {
            b.rating_average
                .partial_cmp(&a.rating_average)
                .unwrap_or(Ordering::Equal)
        });
        rated.truncate(limit);
        self.cache
            .set(key, CacheValue::Spots(rated.clone()), self.config.ranked_ttl);
        Ok(rated)
    }

    /// Count approved spots.
    pub async fn count(&self) -> KickturnResult<u64> {
        if let Some(count) = self
            .cache
            .get(&CacheKey::SpotCount)
            .and_then(|value| value.as_count())
        {
            return Ok(count);
        }

        let count = self.fetch_with_timeout(self.store.count_approved()).await?;
        tracing::trace!(count, "Approved count fetched from store");
        self.cache.set(
            CacheKey::SpotCount,
            CacheValue::Count(count),
            self.config.count_ttl,
        );
        Ok(count)
    }

    /// Run a filtered search over the approved catalog.
    ///
    /// The filter is compiled (and an invalid one rejected) before any
    /// cache or store access; the base set rides the full-listing cache
    /// entry. Distance filtering uses only the origin the caller supplied.
    pub async fn search(&self, spec: &FilterSpec) -> KickturnResult<Vec<Spot>> {
        let filter = CompiledFilter::compile(spec)?;
        let spots = self.list_all().await?;
        Ok(filter.apply(spots))
    }

    /// Fetch a single approved spot by ID.
    ///
    /// Missing and unapproved records are indistinguishable to callers;
    /// both yield [`StoreError::SpotNotFound`]. Detail reads are not
    /// cached.
    pub async fn get_spot(&self, spot_id: SpotId) -> KickturnResult<Spot> {
        let fetched = self
            .fetch_with_timeout(self.store.fetch_spot(spot_id))
            .await?;
        match fetched {
            Some(spot) if spot.approved => Ok(spot),
            _ => Err(StoreError::SpotNotFound { spot_id }.into()),
        }
    }

    /// Drop every mutation-scoped cache entry in response to a catalog
    /// mutation. Returns the number of entries removed.
    ///
    /// Runs synchronously: by the time this returns and the caller
    /// acknowledges the mutation, no pre-mutation view remains cached.
    pub fn invalidate_on_mutation(&self, mutation: &Mutation) -> usize {
        let removed = self
            .cache
            .delete_where(|key| CacheFamily::MUTATION_SCOPED.contains(&key.family()));
        tracing::debug!(
            kind = %mutation.kind,
            spot_id = %mutation.spot_id,
            removed,
            "Catalog cache invalidated after mutation"
        );
        removed
    }

    /// Cached spot listing under `key`, if fresh.
    fn cached_spots(&self, key: &CacheKey) -> Option<Vec<Spot>> {
        self.cache.get(key).and_then(CacheValue::into_spots)
    }

    fn validate_view_limit(&self, limit: usize) -> Result<(), FilterError> {
        if limit == 0 {
            return Err(FilterError::InvalidLimit {
                limit,
                reason: "limit must be positive".to_string(),
            });
        }
        if limit > self.config.max_view_limit {
            return Err(FilterError::InvalidLimit {
                limit,
                reason: format!("limit exceeds the maximum of {}", self.config.max_view_limit),
            });
        }
        Ok(())
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

impl<S: SpotStore> Clone for CatalogIndex<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
