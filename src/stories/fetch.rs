use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use super::{BestStories, Lookup, SCOPE, StoriesError};
use crate::{Cancel, api::hacker_news::{Item, ItemId}};

impl BestStories {
    /// Resolves every ID through the cache, with at most `max_concurrency`
    /// fetches reaching the API at once.
    ///
    /// # Returns
    /// The items that were found, in the order of `ids`. Failed and unknown
    /// IDs are left out.
    ///
    /// # Errors
    /// [`StoriesError::Cancelled`] if `cancel` fires first. Fetches still in
    /// flight are dropped and nothing partial is returned.
    pub(super) async fn fetch_all(
        &self,
        ids: &[ItemId],
        cancel: &Cancel,
    ) -> Result<Vec<Item>, StoriesError> {
        let semaphore = Semaphore::new(self.max_concurrency.get());

        let fan_out = async {
            let mut pending: FuturesUnordered<_> = ids
                .iter()
                .enumerate()
                .map(|(position, &id)| {
                    let semaphore = &semaphore;
                    async move { (position, self.lookup(id, semaphore).await) }
                })
                .collect();

            let mut found = Vec::with_capacity(ids.len());
            while let Some((position, lookup)) = pending.next().await {
                if let Some(item) = lookup.found() {
                    found.push((position, item));
                }
            }
            found.sort_unstable_by_key(|(position, _)| *position);
            found.into_iter().map(|(_, item)| item).collect::<Vec<_>>()
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StoriesError::Cancelled),
            found = fan_out => Ok(found),
        }
    }

    /// Resolves one ID through the cache. On a miss the fetch waits for a
    /// permit from `semaphore`; cache hits never take one.
    pub(super) async fn lookup(&self, id: ItemId, semaphore: &Semaphore) -> Lookup {
        self.cache
            .get_or_fetch(id, || async {
                // The semaphore is never closed.
                let _permit = semaphore.acquire().await.ok();
                match self.api.item(id).await {
                    Ok(Some(item)) => Lookup::Found(item),
                    Ok(None) => Lookup::NotFound,
                    Err(err) => {
                        self.log
                            .warn(SCOPE, format!("Error fetching item {}: {:#}", id, err));
                        Lookup::Failed
                    }
                }
            })
            .await
    }
}
