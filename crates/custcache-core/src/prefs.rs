//! User preference store.
//!
//! Holds the "active user code", the identity token that scopes which
//! records are shown. The core only ever reads it; the CLI's `--set-user`
//! and `--clear-user` commands are the only writers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;

/// Preference file name inside the config directory
const PREFS_FILE: &str = "prefs.json";

/// Environment variable that overrides the stored user code
pub const USER_CODE_ENV: &str = "CUSTCACHE_USER_CODE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    active_user_code: Option<String>,
}

pub struct PreferenceStore {
    dir: PathBuf,
    env_override: Option<String>,
}

impl PreferenceStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            env_override: None,
        }
    }

    /// Store in the standard config directory, honouring `CUSTCACHE_USER_CODE`.
    pub fn open_default() -> Result<Self> {
        let store = Self::new(Config::config_dir()?);
        Ok(store.with_override(std::env::var(USER_CODE_ENV).ok()))
    }

    /// A non-empty override takes precedence over the stored value.
    pub fn with_override(mut self, code: Option<String>) -> Self {
        self.env_override = code.filter(|c| !c.trim().is_empty());
        self
    }

    fn prefs_path(&self) -> PathBuf {
        self.dir.join(PREFS_FILE)
    }

    fn read(&self) -> Result<Preferences> {
        let path = self.prefs_path();
        if !path.exists() {
            return Ok(Preferences::default());
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read preferences")?;
        serde_json::from_str(&contents).context("Failed to parse preferences")
    }

    fn write(&self, prefs: &Preferences) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let contents = serde_json::to_string_pretty(prefs)?;
        std::fs::write(self.prefs_path(), contents).context("Failed to write preferences")?;
        Ok(())
    }

    /// The active user code, untrimmed, or `None` if none is set.
    /// An unreadable preference file counts as "not set".
    pub fn active_user_code(&self) -> Option<String> {
        if let Some(ref code) = self.env_override {
            return Some(code.clone());
        }
        match self.read() {
            Ok(prefs) => prefs.active_user_code,
            Err(e) => {
                warn!(error = %e, "Failed to load preferences, showing all records");
                None
            }
        }
    }

    pub fn set_active_user_code(&self, code: &str) -> Result<()> {
        let mut prefs = self.read().unwrap_or_default();
        prefs.active_user_code = Some(code.to_string());
        self.write(&prefs)
    }

    pub fn clear_active_user_code(&self) -> Result<()> {
        let mut prefs = self.read().unwrap_or_default();
        prefs.active_user_code = None;
        self.write(&prefs)
    }
}
