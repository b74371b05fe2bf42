use std::{num::NonZeroUsize, time::Duration};

use tokio::sync::Semaphore;

use crate::{
    Cancel,
    api::hacker_news::{HackerNewsApi, Item, ItemId, ItemKind},
    cache::TtlCache,
    log::Log,
};

mod data;
mod fetch;
mod rank;
#[cfg(test)]
mod tests;

pub use data::{Lookup, StoriesError, StoryDto, TIME_FORMAT};
pub use rank::rank;

const SCOPE: &str = "stories";

/// Serves the highest scored Hacker News stories.
///
/// Every request lists the current best story IDs, resolves each ID through
/// a shared time-boxed cache with a bounded number of fetches in flight,
/// keeps the stories and ranks them by score. Items that fail to load are
/// logged and left out; only a failed listing or a cancellation fails the
/// request.
///
/// Cloning is cheap and clones share the cache.
#[derive(Debug, Clone)]
pub struct BestStories {
    api: HackerNewsApi,
    cache: TtlCache<ItemId, Lookup>,
    log: Log,
    max_concurrency: NonZeroUsize,
}

impl BestStories {
    /// # Arguments
    /// * `api` - Source of the listing and of the items
    /// * `log` - The logging actor
    /// * `ttl` - How long a fetched item, or a failed fetch, stays cached
    /// * `max_concurrency` - Ceiling on item fetches in flight at once
    pub fn new(api: HackerNewsApi, log: Log, ttl: Duration, max_concurrency: NonZeroUsize) -> Self {
        Self {
            api,
            cache: TtlCache::new(ttl),
            log,
            max_concurrency,
        }
    }

    pub fn cache(&self) -> &TtlCache<ItemId, Lookup> {
        &self.cache
    }

    /// Returns up to `limit` best stories in their outward shape.
    ///
    /// A `limit` of zero or less returns nothing without contacting the API.
    pub async fn best_stories(
        &self,
        limit: i64,
        cancel: &Cancel,
    ) -> Result<Vec<StoryDto>, StoriesError> {
        let ranked = self.ranked(limit, cancel).await?;
        Ok(ranked.into_iter().map(StoryDto::from).collect())
    }

    /// Same as [`BestStories::best_stories`] but returns the full items.
    pub async fn ranked(&self, limit: i64, cancel: &Cancel) -> Result<Vec<Item>, StoriesError> {
        let Some(limit) = usize::try_from(limit).ok().filter(|limit| *limit > 0) else {
            return Ok(Vec::new());
        };

        let purged = self.cache.purge_expired();
        if purged > 0 {
            self.log
                .info(SCOPE, format!("Dropped {} expired cache entries", purged));
        }

        let ids = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StoriesError::Cancelled),
            ids = self.api.best_story_ids() => ids,
        };
        let ids = self
            .log
            .error_on_error(SCOPE, ids.map_err(StoriesError::Listing))?;

        let items = self.fetch_all(&ids, cancel).await?;
        let ranked = rank(items, ItemKind::Story, limit);
        self.log.info(
            SCOPE,
            format!(
                "Ranked {} of {} listed ids, {} cached",
                ranked.len(),
                ids.len(),
                self.cache.len()
            ),
        );
        Ok(ranked)
    }

    /// Resolves a single item through the same cache the rankings use.
    pub async fn item(&self, id: ItemId, cancel: &Cancel) -> Result<Lookup, StoriesError> {
        let semaphore = Semaphore::new(1);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StoriesError::Cancelled),
            lookup = self.lookup(id, &semaphore) => Ok(lookup),
        }
    }
}
