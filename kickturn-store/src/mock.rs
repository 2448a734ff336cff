//! In-memory mock spot store.
//!
//! Backs tests, examples, and local development. Mutation helpers
//! (insert/approve/delete) stand in for the write path that a real
//! deployment performs elsewhere; the serving layer itself never writes.

use crate::SpotStore;
use async_trait::async_trait;
use kickturn_core::{KickturnResult, Spot, SpotId, StoreError, Timestamp};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Per-method fetch counters, for asserting cache behavior in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub fetch_all: u64,
    pub fetch_page: u64,
    pub fetch_since: u64,
    pub fetch_spot: u64,
    pub count: u64,
}

/// In-memory spot store.
#[derive(Debug, Default, Clone)]
pub struct MockSpotStore {
    spots: Arc<RwLock<HashMap<SpotId, Spot>>>,
    unavailable: Arc<AtomicBool>,
    fetch_delay: Arc<RwLock<Option<Duration>>>,
    calls: Arc<RwLock<CallCounts>>,
}

impl MockSpotStore {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a spot.
    pub fn insert_spot(&self, spot: Spot) {
        self.spots.write().unwrap().insert(spot.spot_id, spot);
    }

    /// Bulk-insert spots.
    pub fn seed(&self, spots: Vec<Spot>) {
        let mut map = self.spots.write().unwrap();
        for spot in spots {
            map.insert(spot.spot_id, spot);
        }
    }

    /// Approve a spot into the public catalog.
    pub fn approve_spot(&self, spot_id: SpotId) -> KickturnResult<()> {
        let mut map = self.spots.write().unwrap();
        match map.get_mut(&spot_id) {
            Some(spot) => {
                spot.approved = true;
                Ok(())
            }
            None => Err(StoreError::SpotNotFound { spot_id }.into()),
        }
    }

    /// Remove a spot.
    pub fn delete_spot(&self, spot_id: SpotId) -> KickturnResult<()> {
        match self.spots.write().unwrap().remove(&spot_id) {
            Some(_) => Ok(()),
            None => Err(StoreError::SpotNotFound { spot_id }.into()),
        }
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.spots.write().unwrap().clear();
    }

    /// Total number of stored spots, approved or not.
    pub fn spot_count(&self) -> usize {
        self.spots.read().unwrap().len()
    }

    /// Toggle the unavailability fault. While set, every fetch fails with
    /// a retryable error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Inject latency into every fetch, for exercising timeout paths.
    pub fn set_fetch_delay(&self, delay: Option<Duration>) {
        *self.fetch_delay.write().unwrap() = delay;
    }

    /// Snapshot of the per-method fetch counters.
    pub fn call_counts(&self) -> CallCounts {
        *self.calls.read().unwrap()
    }

    /// All approved spots in creation order, oldest first. Creation-time
    /// ties break on spot ID so pagination stays stable.
    fn approved_sorted(&self) -> Vec<Spot> {
        let mut spots: Vec<Spot> = self
            .spots
            .read()
            .unwrap()
            .values()
            .filter(|s| s.approved)
            .cloned()
            .collect();
        spots.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.spot_id.cmp(&b.spot_id))
        });
        spots
    }

    async fn simulate_io(&self) -> KickturnResult<()> {
        let delay = *self.fetch_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                reason: "mock store offline".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl SpotStore for MockSpotStore {
    async fn fetch_all_approved(&self) -> KickturnResult<Vec<Spot>> {
        self.calls.write().unwrap().fetch_all += 1;
        self.simulate_io().await?;
        Ok(self.approved_sorted())
    }

    async fn fetch_page(&self, skip: usize, limit: usize) -> KickturnResult<Vec<Spot>> {
        self.calls.write().unwrap().fetch_page += 1;
        self.simulate_io().await?;
        Ok(self
            .approved_sorted()
            .into_iter()
            .skip(skip)
            .take(limit)
            .collect())
    }

    async fn fetch_approved_since(&self, since: Timestamp) -> KickturnResult<Vec<Spot>> {
        self.calls.write().unwrap().fetch_since += 1;
        self.simulate_io().await?;
        Ok(self
            .approved_sorted()
            .into_iter()
            .filter(|s| s.created_at >= since)
            .collect())
    }

    async fn fetch_spot(&self, spot_id: SpotId) -> KickturnResult<Option<Spot>> {
        self.calls.write().unwrap().fetch_spot += 1;
        self.simulate_io().await?;
        Ok(self.spots.read().unwrap().get(&spot_id).cloned())
    }

    async fn count_approved(&self) -> KickturnResult<u64> {
        self.calls.write().unwrap().count += 1;
        self.simulate_io().await?;
        let count = self
            .spots
            .read()
            .unwrap()
            .values()
            .filter(|s| s.approved)
            .count();
        Ok(count as u64)
    }

    async fn health_check(&self) -> KickturnResult<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }
}

// =============================================================================
// TESTS
// =============================================================================
