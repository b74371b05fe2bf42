use std::{num::NonZeroUsize, time::Duration};

use super::*;
use crate::{
    api::hacker_news::Mock,
    log::{LogLevel, LogMessage},
};

const TTL: Duration = Duration::from_secs(20 * 60);

fn story(id: ItemId, score: u32) -> Item {
    Item {
        id,
        kind: ItemKind::Story,
        title: format!("Story {}", id),
        score,
        by: "pg".to_string(),
        time: 1_700_000_000,
        descendants: 3,
        url: format!("https://example.com/{}", id),
        kids: Vec::new(),
    }
}

fn comment(id: ItemId, score: u32) -> Item {
    Item {
        kind: ItemKind::Comment,
        ..story(id, score)
    }
}

fn service(mock: &Mock, max_concurrency: usize) -> (BestStories, Log) {
    let log = Log::mock();
    let stories = BestStories::new(
        HackerNewsApi::Mock(mock.clone()),
        log.clone(),
        TTL,
        NonZeroUsize::new(max_concurrency).unwrap(),
    );
    (stories, log)
}

fn ids(items: &[Item]) -> Vec<ItemId> {
    items.iter().map(|item| item.id).collect()
}

fn warnings(log: &Log) -> Vec<LogMessage> {
    log.messages()
        .unwrap()
        .into_iter()
        .filter(|message| message.level == LogLevel::Warning)
        .collect()
}

#[tokio::test]
async fn test_non_positive_limit_touches_nothing() {
    let mock = Mock::new(vec![story(1, 10)]);
    let (stories, _) = service(&mock, 8);
    let cancel = Cancel::new();

    for limit in [0, -1, i64::MIN] {
        assert!(stories.best_stories(limit, &cancel).await.unwrap().is_empty());
    }

    assert_eq!(mock.listing_calls(), 0);
    assert_eq!(mock.total_item_calls(), 0);
    assert!(stories.cache().is_empty());
}

#[tokio::test]
async fn test_stories_sorted_by_score_descending() {
    let mock = Mock::new(vec![
        story(1, 20),
        story(2, 80),
        story(3, 5),
        story(4, 40),
    ]);
    let (stories, _) = service(&mock, 8);

    let result = stories.best_stories(10, &Cancel::new()).await.unwrap();
    let titles: Vec<_> = result.iter().map(|dto| dto.title.as_str()).collect();
    assert_eq!(titles, vec!["Story 2", "Story 4", "Story 1", "Story 3"]);
    assert_eq!(result[0].score, 80);
    assert_eq!(result[0].uri, "https://example.com/2");
    assert_eq!(result[0].posted_by, "pg");
    assert_eq!(result[0].comment_count, 3);
    assert_eq!(result[0].time, "2023-11-14T22:13:20+00:00");
}

#[tokio::test]
async fn test_limit_truncates() {
    let mock = Mock::new(vec![story(1, 20), story(2, 80), story(3, 5)]);
    let (stories, _) = service(&mock, 8);

    let ranked = stories.ranked(2, &Cancel::new()).await.unwrap();
    assert_eq!(ids(&ranked), vec![2, 1]);

    let ranked = stories.ranked(100, &Cancel::new()).await.unwrap();
    assert_eq!(ids(&ranked), vec![2, 1, 3]);
}

#[tokio::test]
async fn test_non_story_kinds_excluded() {
    let mock = Mock::new(vec![
        comment(1, 999),
        story(2, 10),
        Item {
            kind: ItemKind::Job,
            ..story(3, 500)
        },
        story(4, 30),
    ]);
    let (stories, _) = service(&mock, 8);

    let ranked = stories.ranked(10, &Cancel::new()).await.unwrap();
    assert_eq!(ids(&ranked), vec![4, 2]);
}

#[tokio::test]
async fn test_cache_hit_skips_second_detail_call() {
    let mock = Mock::new(vec![story(1, 10), story(2, 20)]);
    let (stories, _) = service(&mock, 8);
    let cancel = Cancel::new();

    let first = stories.ranked(10, &cancel).await.unwrap();
    let second = stories.ranked(10, &cancel).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.listing_calls(), 2);
    assert_eq!(mock.item_calls(1), 1);
    assert_eq!(mock.item_calls(2), 1);
}

#[tokio::test]
async fn test_failed_item_is_dropped_and_logged() {
    let mock = Mock::new(vec![story(1, 10), story(2, 20)]);
    mock.fail_item(2);
    let (stories, log) = service(&mock, 8);

    let ranked = stories.ranked(10, &Cancel::new()).await.unwrap();

    assert_eq!(ids(&ranked), vec![1]);
    assert_eq!(mock.item_calls(1), 1);
    assert_eq!(mock.item_calls(2), 1);

    let warnings = warnings(&log);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].scope, "stories");
    assert!(warnings[0].message.contains("item 2"));
    assert!(warnings[0].message.contains("unavailable in mock"));
}

#[tokio::test]
async fn test_unknown_ids_are_dropped_quietly() {
    let mock = Mock::new(vec![story(1, 10)]);
    mock.set_ids(vec![1, 404]);
    let (stories, log) = service(&mock, 8);

    let ranked = stories.ranked(10, &Cancel::new()).await.unwrap();

    assert_eq!(ids(&ranked), vec![1]);
    assert_eq!(mock.item_calls(404), 1);
    assert!(warnings(&log).is_empty());
    assert_eq!(stories.cache().get(&404), Some(Lookup::NotFound));
}

#[tokio::test(start_paused = true)]
async fn test_failures_are_cached_until_expiry() {
    let mock = Mock::new(vec![story(1, 10), story(2, 20)]);
    mock.fail_item(2);
    let (stories, _) = service(&mock, 8);
    let cancel = Cancel::new();

    stories.ranked(10, &cancel).await.unwrap();
    stories.ranked(10, &cancel).await.unwrap();
    assert_eq!(mock.item_calls(2), 1);
    assert_eq!(stories.cache().get(&2), Some(Lookup::Failed));

    tokio::time::advance(TTL).await;
    stories.ranked(10, &cancel).await.unwrap();
    assert_eq!(mock.item_calls(2), 2);
}

#[tokio::test]
async fn test_repeated_request_is_idempotent() {
    let mock = Mock::new(vec![story(1, 10), story(2, 20), comment(3, 30)]);
    let (stories, _) = service(&mock, 8);
    let cancel = Cancel::new();

    let first = stories.best_stories(5, &cancel).await.unwrap();
    let calls = mock.total_item_calls();
    let second = stories.best_stories(5, &cancel).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.total_item_calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_expired_items_are_fetched_again() {
    let mock = Mock::new(vec![story(1, 10)]);
    let (stories, log) = service(&mock, 8);
    let cancel = Cancel::new();

    stories.ranked(10, &cancel).await.unwrap();
    tokio::time::advance(TTL - Duration::from_secs(1)).await;
    stories.ranked(10, &cancel).await.unwrap();
    assert_eq!(mock.item_calls(1), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    stories.ranked(10, &cancel).await.unwrap();
    assert_eq!(mock.item_calls(1), 2);
    assert!(
        log.messages()
            .unwrap()
            .iter()
            .any(|message| message.message == "Dropped 1 expired cache entries")
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_ceiling_is_respected() {
    let items: Vec<Item> = (1..=12).map(|id| story(id, id as u32)).collect();
    let mock = Mock::new(items);
    mock.set_delay(Duration::from_millis(100));
    let (stories, _) = service(&mock, 3);

    let ranked = stories.ranked(12, &Cancel::new()).await.unwrap();

    assert_eq!(ranked.len(), 12);
    assert_eq!(mock.total_item_calls(), 12);
    assert_eq!(mock.peak_in_flight(), 3);
}

#[tokio::test]
async fn test_ties_follow_listing_order() {
    let mock = Mock::new(vec![
        story(7, 50),
        story(2, 90),
        story(9, 50),
        story(4, 50),
    ]);
    let (stories, _) = service(&mock, 2);

    let ranked = stories.ranked(10, &Cancel::new()).await.unwrap();
    assert_eq!(ids(&ranked), vec![2, 7, 9, 4]);
}

#[tokio::test]
async fn test_listing_failure_fails_request() {
    let mock = Mock::new(vec![story(1, 10)]);
    mock.set_listing_fails(true);
    let (stories, log) = service(&mock, 8);

    let err = stories.best_stories(10, &Cancel::new()).await.unwrap_err();

    assert!(matches!(err, StoriesError::Listing(_)));
    assert!(err.to_string().contains("Listing unavailable in mock"));
    assert_eq!(mock.total_item_calls(), 0);
    let messages = log.messages().unwrap();
    assert!(messages.iter().any(|message| message.level == LogLevel::Error));
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let mock = Mock::new(vec![story(1, 10)]);
    let (stories, _) = service(&mock, 8);
    let cancel = Cancel::new();
    cancel.cancel();

    let err = stories.ranked(10, &cancel).await.unwrap_err();

    assert!(matches!(err, StoriesError::Cancelled));
    assert_eq!(mock.listing_calls(), 0);
    assert_eq!(mock.total_item_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_during_fan_out() {
    let items: Vec<Item> = (1..=6).map(|id| story(id, 10)).collect();
    let mock = Mock::new(items);
    mock.set_delay(Duration::from_secs(1));
    let (stories, log) = service(&mock, 2);

    let cancel = Cancel::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let err = stories.ranked(10, &cancel).await.unwrap_err();

    assert!(matches!(err, StoriesError::Cancelled));
    assert_eq!(mock.total_item_calls(), 2);
    assert!(stories.cache().is_empty());
    assert!(warnings(&log).is_empty());

    // Abandoned fetches left nothing behind, so the next request fetches again.
    let ranked = stories.ranked(10, &Cancel::new()).await.unwrap();
    assert_eq!(ranked.len(), 6);
}

#[tokio::test]
async fn test_single_item_goes_through_cache() {
    let mock = Mock::new(vec![story(1, 10)]);
    mock.fail_item(5);
    let (stories, _) = service(&mock, 8);
    let cancel = Cancel::new();

    assert_eq!(stories.item(1, &cancel).await.unwrap(), Lookup::Found(story(1, 10)));
    assert_eq!(stories.item(1, &cancel).await.unwrap(), Lookup::Found(story(1, 10)));
    assert_eq!(mock.item_calls(1), 1);

    assert_eq!(stories.item(5, &cancel).await.unwrap(), Lookup::Failed);
    assert_eq!(stories.item(6, &cancel).await.unwrap(), Lookup::NotFound);

    stories.ranked(10, &cancel).await.unwrap();
    assert_eq!(mock.item_calls(1), 1);
}
