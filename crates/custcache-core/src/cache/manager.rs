use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Record;

/// File holding the single cached snapshot.
const CACHE_FILE: &str = "customers.json";

/// The persisted snapshot of the last successfully fetched dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unix milliseconds at the time of the write; strictly increasing
    /// across writes to the same cache.
    pub version: i64,
    pub customers: Vec<Record>,
}

/// Borrowed form of `CacheEntry` so a put does not have to clone the dataset.
#[derive(Serialize)]
struct CacheEntryRef<'a> {
    version: i64,
    customers: &'a [Record],
}

impl CacheEntry {
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.version)
    }

    pub fn age_minutes(&self) -> i64 {
        match self.saved_at() {
            Some(saved) => (Utc::now() - saved).num_minutes(),
            None => 0,
        }
    }

    pub fn age_display(&self) -> String {
        format_age(self.age_minutes())
    }
}

/// Render an age in minutes as "just now", "5m ago", "3h ago" or "2d ago".
pub fn format_age(minutes: i64) -> String {
    if minutes < 1 {
        // Negative ages come from clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    /// Return the stored snapshot, or `None` if nothing has been stored yet.
    pub fn get(&self) -> Result<Option<CacheEntry>> {
        let path = self.entry_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).context("Failed to read cache file")?;
        let entry: CacheEntry =
            serde_json::from_str(&contents).context("Failed to parse cache file")?;

        Ok(Some(entry))
    }

    /// Replace the stored snapshot with `customers`, returning the new version.
    ///
    /// The entry is written to a temporary file and renamed into place, so a
    /// reader in another process sees either the old or the new snapshot.
    pub fn put(&self, customers: &[Record]) -> Result<i64> {
        let previous = match self.get() {
            Ok(entry) => entry.map(|e| e.version),
            Err(e) => {
                debug!(error = %e, "Ignoring unreadable cache entry on write");
                None
            }
        };

        let now = Utc::now().timestamp_millis();
        let version = match previous {
            None => now,
            Some(prev) => prev
                .checked_add(1)
                .map(|next| now.max(next))
                .ok_or_else(|| anyhow!("Cache version {} cannot be advanced", prev))?,
        };

        let contents = serde_json::to_string_pretty(&CacheEntryRef { version, customers })?;

        let path = self.entry_path();
        let tmp_path = self
            .cache_dir
            .join(format!("{}.{}.tmp", CACHE_FILE, std::process::id()));
        std::fs::write(&tmp_path, contents).context("Failed to write cache file")?;
        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e).context("Failed to replace cache file");
        }

        debug!(version, count = customers.len(), "Dataset cached");
        Ok(version)
    }

    /// Remove the stored snapshot. Returns whether there was one.
    pub fn clear(&self) -> Result<bool> {
        let path = self.entry_path();
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).context("Failed to remove cache file")?;
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
