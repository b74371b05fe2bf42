use std::cmp::Reverse;

use crate::api::hacker_news::{Item, ItemKind};

/// Keeps the items of `kind`, highest score first, at most `limit` of them.
///
/// The sort is stable: items with equal scores keep the order they were given
/// in, which is the order of the best stories listing.
pub fn rank(items: Vec<Item>, kind: ItemKind, limit: usize) -> Vec<Item> {
    let mut ranked: Vec<Item> = items.into_iter().filter(|item| item.kind == kind).collect();
    ranked.sort_by_key(|item| Reverse(item.score));
    ranked.truncate(limit);
    ranked
}
