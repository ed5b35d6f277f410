//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager`, a single-record store that keeps
//! the most recently fetched dataset on disk as JSON. Every successful fetch
//! replaces the stored snapshot; when the network is unavailable the snapshot
//! is what gets displayed.

pub mod manager;

pub use manager::{CacheEntry, CacheManager};
