use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use super::data::{Item, ItemId};

/// Instrumented in-memory stand-in for the Hacker News API.
///
/// Serves a fixed listing and item set, can be told to fail the listing or
/// specific items, can delay every item fetch, and counts the calls it
/// receives along with the highest number of item fetches in flight at once.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    ids: Mutex<Vec<ItemId>>,
    items: Mutex<HashMap<ItemId, Item>>,
    failing: Mutex<HashSet<ItemId>>,
    listing_fails: AtomicBool,
    delay: Mutex<Option<Duration>>,
    listing_calls: AtomicUsize,
    item_calls: Mutex<HashMap<ItemId, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

/// Keeps the in-flight count right even when the fetch is dropped midway.
struct InFlight<'a>(&'a Inner);

impl<'a> InFlight<'a> {
    fn enter(inner: &'a Inner) -> Self {
        let now = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        inner.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        Self(inner)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Mock {
    /// Creates a mock whose listing holds the IDs of `items`, in order.
    pub fn new(items: Vec<Item>) -> Self {
        let mock = Self::default();
        *lock(&mock.inner.ids) = items.iter().map(|item| item.id).collect();
        *lock(&mock.inner.items) = items.into_iter().map(|item| (item.id, item)).collect();
        mock
    }

    /// Replaces the listing. IDs without an item answer as not found.
    pub fn set_ids(&self, ids: Vec<ItemId>) {
        *lock(&self.inner.ids) = ids;
    }

    /// Makes every fetch of `id` fail.
    pub fn fail_item(&self, id: ItemId) {
        lock(&self.inner.failing).insert(id);
    }

    pub fn set_listing_fails(&self, fails: bool) {
        self.inner.listing_fails.store(fails, Ordering::SeqCst);
    }

    /// Makes every item fetch take `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.inner.delay) = Some(delay);
    }

    pub fn listing_calls(&self) -> usize {
        self.inner.listing_calls.load(Ordering::SeqCst)
    }

    /// Number of fetches received for `id`.
    pub fn item_calls(&self, id: ItemId) -> usize {
        lock(&self.inner.item_calls).get(&id).copied().unwrap_or(0)
    }

    /// Number of item fetches received, over all IDs.
    pub fn total_item_calls(&self) -> usize {
        lock(&self.inner.item_calls).values().sum()
    }

    /// Highest number of item fetches observed in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.inner.peak_in_flight.load(Ordering::SeqCst)
    }

    pub async fn best_story_ids(&self) -> anyhow::Result<Vec<ItemId>> {
        self.inner.listing_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.listing_fails.load(Ordering::SeqCst) {
            anyhow::bail!("Listing unavailable in mock");
        }
        Ok(lock(&self.inner.ids).clone())
    }

    pub async fn item(&self, id: ItemId) -> anyhow::Result<Option<Item>> {
        *lock(&self.inner.item_calls).entry(id).or_default() += 1;
        let _guard = InFlight::enter(&self.inner);

        let delay = *lock(&self.inner.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if lock(&self.inner.failing).contains(&id) {
            anyhow::bail!("Item {} unavailable in mock", id);
        }
        Ok(lock(&self.inner.items).get(&id).cloned())
    }
}
