//! EMP Feed Fetcher
//!
//! Reads the list of EMP feed URLs, downloads every game that is not yet in the
//! raw cache and stores the response bodies untouched. Building the site data
//! from the cache is left to `stats-builder`.

pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod sources;

pub use cache::FetchCache;
pub use client::{FeedClient, HttpFeedClient};
pub use error::{FetchError, Result};
pub use models::{FetchOutcome, FetchReport};
pub use sources::{read_sources, FeedSource};
