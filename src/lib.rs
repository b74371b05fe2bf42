//! Library entry point for the best-stories crate.
//!
//! Fetches the best stories from the Hacker News API, caching items for a
//! configured time and ranking the stories by score.

pub mod api;
pub mod cache;
pub mod config;
pub mod log;
pub mod net;
pub mod stories;
pub mod utils;

pub use utils::*;

/// Capacity of the actor mailboxes.
pub const BUFFER_SIZE: usize = 128;
