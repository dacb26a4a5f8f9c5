//! Directory-backed storage for form definitions.
//!
//! Each form is stored as one JSON file named `form_<id>.json` under the
//! repository directory. Durable form ids are allocated above the highest
//! id already on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use formdesk_model::{EntityId, Form};

/// Repository for storing and retrieving form definitions.
#[derive(Debug, Clone)]
pub struct FormRepository {
    base_dir: PathBuf,
}

impl FormRepository {
    /// Open a repository at the given directory, creating it if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!("Failed to create form repository: {}", base_dir.display())
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Persist a form, overwriting any previous version.
    pub fn save(&self, form: &Form) -> Result<PathBuf> {
        let path = self.form_path(form.id);
        let json = serde_json::to_string_pretty(form)
            .with_context(|| format!("Failed to serialize form {}", form.id))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write form to {}", path.display()))?;
        debug!(form_id = form.id, path = %path.display(), "form saved");
        Ok(path)
    }

    /// Load a form by id. Returns `None` when no such form is stored.
    pub fn load(&self, form_id: EntityId) -> Result<Option<Form>> {
        let path = self.form_path(form_id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read form from {}", path.display()))?;
        let form: Form = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse form from {}", path.display()))?;
        Ok(Some(form))
    }

    /// All stored forms, ordered by id.
    pub fn list(&self) -> Result<Vec<Form>> {
        let mut forms = Vec::new();
        for id in self.stored_ids()? {
            if let Some(form) = self.load(id)? {
                forms.push(form);
            }
        }
        Ok(forms)
    }

    pub fn delete(&self, form_id: EntityId) -> Result<bool> {
        let path = self.form_path(form_id);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete form: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn exists(&self, form_id: EntityId) -> bool {
        self.form_path(form_id).exists()
    }

    /// Next free durable form id: one above the highest id on disk.
    pub fn allocate_form_id(&self) -> Result<EntityId> {
        let max = self.stored_ids()?.into_iter().max().unwrap_or(0);
        Ok(max + 1)
    }

    fn stored_ids(&self) -> Result<Vec<EntityId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if let Some(id) = filename
                .strip_prefix("form_")
                .and_then(|rest| rest.strip_suffix(".json"))
                .and_then(|digits| digits.parse::<EntityId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn form_path(&self, form_id: EntityId) -> PathBuf {
        self.base_dir.join(format!("form_{form_id}.json"))
    }
}
