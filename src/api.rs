//! Clients for the upstream APIs the program reads from.

pub mod hacker_news;

pub use hacker_news::HackerNewsApi;
