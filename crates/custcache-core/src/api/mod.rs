//! HTTP fetcher for the customer dataset.
//!
//! The dataset is a static JSON document hosted somewhere on the web. The
//! `DatasetClient` downloads it with a cache-busting query parameter so that
//! intermediate HTTP caches never serve an old copy.

pub mod client;
pub mod error;

pub use client::DatasetClient;
pub use error::ApiError;
