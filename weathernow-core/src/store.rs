//! Key/value blob store for user preferences.
//!
//! Each key maps to one JSON document at `<dir>/<key>.json`.

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

pub const FAVORITES_KEY: &str = "favorites";
pub const HISTORY_KEY: &str = "history";
pub const ALERT_SETTINGS_KEY: &str = "alert_settings";

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Raw value for `key`, `None` if nothing was stored yet.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory: {}", self.dir.display()))?;

        let path = self.path(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(contents) = self.get(key)? else {
            return Ok(None);
        };

        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Stored value for '{key}' is not valid JSON"))?;
        Ok(Some(value))
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize value for '{key}'"))?;
        self.set(key, &json)
    }

    /// Like [`Store::load`], but a missing or unreadable value yields the default.
    ///
    /// An unreadable file is moved to `<key>.json.bak` first, so the next
    /// save does not destroy it.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err) => {
                tracing::warn!(key, error = %format!("{err:#}"), "ignoring unreadable stored value");
                self.back_up(key);
                T::default()
            }
        }
    }

    pub fn backup_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.bak"))
    }

    fn back_up(&self, key: &str) {
        let (from, to) = (self.path(key), self.backup_path(key));
        match fs::rename(&from, &to) {
            Ok(()) => tracing::warn!(backup = %to.display(), "moved unreadable value aside"),
            Err(e) => tracing::warn!(path = %from.display(), error = %e, "could not back up unreadable value"),
        }
    }

    /// Like [`Store::save`], but failures are only logged.
    pub fn save_logged<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.save(key, value) {
            tracing::warn!(key, error = %format!("{err:#}"), "failed to persist value");
        }
    }
}
