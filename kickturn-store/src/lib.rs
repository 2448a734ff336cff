//! kickturn-store - Catalog Store Access
//!
//! The async read interface to the backing catalog store, an in-memory mock
//! implementation for tests and local development, and the TTL view cache
//! the serving layer puts in front of the store.

pub mod cache;
pub mod mock;

use async_trait::async_trait;
use kickturn_core::{KickturnResult, Spot, SpotId, Timestamp};

pub use cache::{CacheFamily, CacheKey, CacheStats, CacheValue, CatalogCache, TtlCache};
pub use mock::{CallCounts, MockSpotStore};

/// Async read interface to the backing catalog store.
///
/// The serving layer only reads; writes happen elsewhere and arrive here as
/// mutation signals. All listing methods return approved records in creation
/// order (oldest first) so pagination is stable between calls.
#[async_trait]
pub trait SpotStore: Send + Sync {
    /// Fetch every approved spot, oldest first.
    async fn fetch_all_approved(&self) -> KickturnResult<Vec<Spot>>;

    /// Fetch a creation-ordered slice of the approved catalog.
    async fn fetch_page(&self, skip: usize, limit: usize) -> KickturnResult<Vec<Spot>>;

    /// Fetch approved spots created at or after `since`, oldest first.
    async fn fetch_approved_since(&self, since: Timestamp) -> KickturnResult<Vec<Spot>>;

    /// Fetch a single spot by ID, whatever its approval state.
    async fn fetch_spot(&self, spot_id: SpotId) -> KickturnResult<Option<Spot>>;

    /// Count approved spots.
    async fn count_approved(&self) -> KickturnResult<u64>;

    /// Check whether the backing store is reachable.
    async fn health_check(&self) -> KickturnResult<bool>;
}
