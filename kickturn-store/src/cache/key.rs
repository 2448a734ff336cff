//! Typed cache keys for catalog views.
//!
//! Every derived view the serving layer caches has a variant here, and every
//! variant knows its coarse invalidation family. Invalidation matches on
//! families through `TtlCache::delete_where` instead of parsing key strings,
//! so a new view added without a family assignment fails to compile rather
//! than silently surviving mutations.

use crate::TtlCache;
use kickturn_core::Spot;
use serde::{Deserialize, Serialize};

/// The shared catalog view cache.
pub type CatalogCache = TtlCache<CacheKey, CacheValue>;

/// Coarse invalidation family of a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheFamily {
    AllSpots,
    SpotCount,
    Page,
    Recent,
    TopRated,
}

impl CacheFamily {
    /// Families whose entries derive from the approved record set and must
    /// be dropped on any catalog mutation.
    pub const MUTATION_SCOPED: [CacheFamily; 5] = [
        CacheFamily::AllSpots,
        CacheFamily::SpotCount,
        CacheFamily::Page,
        CacheFamily::Recent,
        CacheFamily::TopRated,
    ];
}

/// Cache key for one derived catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheKey {
    /// The full approved catalog in creation order.
    AllSpots,
    /// Count of approved spots.
    SpotCount,
    /// One page of the approved catalog. Pages are 1-based; a different
    /// `page_size` is a different view.
    Page { page: u32, page_size: u32 },
    /// The newest `limit` approved spots.
    Recent { limit: usize },
    /// The `limit` best-rated approved spots.
    TopRated { limit: usize },
}

impl CacheKey {
    /// The coarse invalidation family this key belongs to.
    pub fn family(&self) -> CacheFamily {
        match self {
            CacheKey::AllSpots => CacheFamily::AllSpots,
            CacheKey::SpotCount => CacheFamily::SpotCount,
            CacheKey::Page { .. } => CacheFamily::Page,
            CacheKey::Recent { .. } => CacheFamily::Recent,
            CacheKey::TopRated { .. } => CacheFamily::TopRated,
        }
    }
}

/// Cached payload for a catalog view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CacheValue {
    Spots(Vec<Spot>),
    Count(u64),
}

impl CacheValue {
    /// Borrow the spot list, if this is a spot view.
    pub fn as_spots(&self) -> Option<&[Spot]> {
        match self {
            CacheValue::Spots(spots) => Some(spots),
            CacheValue::Count(_) => None,
        }
    }

    /// Take the spot list, if this is a spot view.
    pub fn into_spots(self) -> Option<Vec<Spot>> {
        match self {
            CacheValue::Spots(spots) => Some(spots),
            CacheValue::Count(_) => None,
        }
    }

    /// The count, if this is a count view.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            CacheValue::Spots(_) => None,
            CacheValue::Count(count) => Some(*count),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
