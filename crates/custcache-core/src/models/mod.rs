//! Data models for the customer dataset.
//!
//! The dataset has no fixed schema: each row is a [`Record`], an ordered map
//! of column name to JSON value.

pub mod record;

pub use record::Record;
