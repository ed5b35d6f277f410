//! Core library for custcache.
//!
//! Fetches a remote customer dataset, keeps the last good copy on disk for
//! offline use, scopes it to the active user and turns it into a table that a
//! front end can draw through a [`DisplaySink`].

pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod filter;
pub mod models;
pub mod prefs;
pub mod sink;
pub mod table;
pub mod utils;

pub use board::{CustomerBoard, DataSource, LoadState};
pub use config::Config;
pub use models::Record;
pub use sink::DisplaySink;
pub use table::Table;
