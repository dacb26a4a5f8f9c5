//! Durable per-user options.
//!
//! One JSON file per user holds a flat key → value map. The admin surface
//! keeps per-form hidden columns, deletion-job progress, and form preview
//! entries here.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Identifier of an acting admin user.
pub type UserId = u64;

#[derive(Debug, Clone)]
pub struct UserOptionsStore {
    base_dir: PathBuf,
}

impl UserOptionsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create user options store: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn get<T: DeserializeOwned>(&self, user: UserId, key: &str) -> Result<Option<T>> {
        let options = self.read_options(user)?;
        let Some(value) = options.get(key) else {
            return Ok(None);
        };
        let typed = serde_json::from_value(value.clone())
            .with_context(|| format!("Failed to decode user option '{key}'"))?;
        Ok(Some(typed))
    }

    pub fn set<T: Serialize>(&self, user: UserId, key: &str, value: &T) -> Result<()> {
        let mut options = self.read_options(user)?;
        let encoded = serde_json::to_value(value)
            .with_context(|| format!("Failed to encode user option '{key}'"))?;
        options.insert(key.to_string(), encoded);
        self.write_options(user, &options)
    }

    pub fn remove(&self, user: UserId, key: &str) -> Result<()> {
        let mut options = self.read_options(user)?;
        if options.remove(key).is_some() {
            self.write_options(user, &options)?;
        }
        Ok(())
    }

    fn read_options(&self, user: UserId) -> Result<BTreeMap<String, serde_json::Value>> {
        let path = self.user_path(user);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read user options from {}", path.display()))?;
        let options = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse user options from {}", path.display()))?;
        Ok(options)
    }

    fn write_options(
        &self,
        user: UserId,
        options: &BTreeMap<String, serde_json::Value>,
    ) -> Result<()> {
        let path = self.user_path(user);
        let json = serde_json::to_string_pretty(options)
            .with_context(|| format!("Failed to serialize options for user {user}"))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write user options to {}", path.display()))?;
        Ok(())
    }

    fn user_path(&self, user: UserId) -> PathBuf {
        self.base_dir.join(format!("user_{user}.json"))
    }
}
