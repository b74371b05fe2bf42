//! Time-boxed cache shared by concurrent requests.

use std::{future::Future, hash::Hash, sync::Arc, time::Duration};

use dashmap::{DashMap, mapref::entry::Entry};
use tokio::{sync::OnceCell, time::Instant};

/// A stored value and the instant it stops being served.
#[derive(Debug)]
struct Stamped<V> {
    value: V,
    expires_at: Instant,
}

type Slot<V> = Arc<OnceCell<Stamped<V>>>;

/// Stand-in expiry for TTLs too long to add to the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE)
}

/// A concurrent key-value cache whose entries expire a fixed time after they
/// were stored.
///
/// Each key owns a slot that is filled at most once. Concurrent lookups of a
/// missing key share a single fill: the first caller runs it and the others
/// wait for its value. If that caller is dropped before the fill completes,
/// nothing is stored and one of the waiters runs its own fill instead.
/// Lookups of different keys only contend on the map shard holding them.
///
/// There is no capacity bound; [`TtlCache::purge_expired`] drops entries
/// whose time is up.
///
/// Cloning is cheap and every clone shares the same entries.
#[derive(Debug)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    slots: Arc<DashMap<K, Slot<V>>>,
    ttl: Duration,
}

impl<K, V> Clone for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            ttl: self.ttl,
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Returns the live value for `key`, running `fetch` to produce it on a
    /// miss or after expiry.
    ///
    /// Whatever `fetch` yields is stored for the full TTL, failures included
    /// when `V` models them.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let slot = self.slot(key);
        let ttl = self.ttl;
        let stamped = slot
            .get_or_init(|| async move {
                let value = fetch().await;
                Stamped {
                    value,
                    expires_at: expiry(Instant::now(), ttl),
                }
            })
            .await;
        stamped.value.clone()
    }

    /// Returns the live value for `key` without fetching.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let slot = self.slots.get(key)?;
        slot.get()
            .filter(|stamped| stamped.expires_at > now)
            .map(|stamped| stamped.value.clone())
    }

    /// Number of keys holding a live value.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots
            .iter()
            .filter(|slot| slot.get().is_some_and(|stamped| stamped.expires_at > now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops expired entries, along with slots whose fill was abandoned and
    /// that nobody is waiting on.
    ///
    /// # Returns
    /// How many slots were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| match slot.get() {
            Some(stamped) => stamped.expires_at > now,
            None => Arc::strong_count(slot) > 1,
        });
        before.saturating_sub(self.slots.len())
    }

    /// Gets the slot for `key`, swapping an expired one for a fresh slot
    /// while the shard is locked.
    fn slot(&self, key: K) -> Slot<V> {
        let now = Instant::now();
        match self.slots.entry(key) {
            Entry::Occupied(mut entry) => {
                let expired = entry
                    .get()
                    .get()
                    .is_some_and(|stamped| stamped.expires_at <= now);
                if expired {
                    entry.insert(Arc::new(OnceCell::new()));
                }
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => Arc::clone(&entry.insert(Arc::new(OnceCell::new()))),
        }
    }
}
