//! In-memory submission store with JSON snapshot persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use formdesk_model::{EntityId, FieldValue, Submission, SubmissionStatus};

use crate::error::{Result, StoreError};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SubmissionStore {
    submissions: BTreeMap<EntityId, Submission>,
    next_id: EntityId,
    /// Per-form sequence counters; the sequence number is what the admin
    /// listing shows as "ID".
    seq_counters: BTreeMap<EntityId, u64>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self {
            submissions: BTreeMap::new(),
            next_id: 1,
            seq_counters: BTreeMap::new(),
        }
    }

    /// Load a snapshot written by [`SubmissionStore::save_snapshot`].
    /// A missing file yields an empty store.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        let store: SubmissionStore = serde_json::from_str(&contents)?;
        Ok(store)
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Record a new submission for a form, assigning its durable id and
    /// per-form sequence number.
    pub fn insert(
        &mut self,
        form_id: EntityId,
        values: BTreeMap<EntityId, FieldValue>,
        created_at: DateTime<Utc>,
    ) -> EntityId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let seq = self.seq_counters.entry(form_id).or_insert(0);
        *seq += 1;
        let submission = Submission {
            id,
            seq: *seq,
            form_id,
            status: SubmissionStatus::Published,
            created_at,
            modified_at: created_at,
            values,
            submitted_by: None,
        };
        debug!(submission_id = id, form_id, "submission recorded");
        self.submissions.insert(id, submission);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Submission> {
        self.submissions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    /// Update only the given field values on a submission. Values absent
    /// from `changes` are left untouched; there is no deletion-by-omission.
    pub fn update_values(
        &mut self,
        id: EntityId,
        changes: &BTreeMap<EntityId, FieldValue>,
        modified_at: DateTime<Utc>,
    ) -> Result<()> {
        let submission = self
            .submissions
            .get_mut(&id)
            .ok_or(StoreError::UnknownSubmission(id))?;
        for (field_id, value) in changes {
            submission.values.insert(*field_id, value.clone());
        }
        submission.modified_at = modified_at;
        Ok(())
    }

    pub fn set_status(&mut self, id: EntityId, status: SubmissionStatus) -> Result<()> {
        let submission = self
            .submissions
            .get_mut(&id)
            .ok_or(StoreError::UnknownSubmission(id))?;
        submission.status = status;
        Ok(())
    }

    pub fn trash(&mut self, id: EntityId) -> Result<()> {
        self.set_status(id, SubmissionStatus::Trashed)
    }

    pub fn restore(&mut self, id: EntityId) -> Result<()> {
        self.set_status(id, SubmissionStatus::Published)
    }

    /// Permanently remove a submission.
    pub fn delete(&mut self, id: EntityId) -> Result<Submission> {
        self.submissions
            .remove(&id)
            .ok_or(StoreError::UnknownSubmission(id))
    }

    /// Count of a form's submissions in the given status.
    pub fn count(&self, form_id: EntityId, status: SubmissionStatus) -> usize {
        self.for_form(form_id)
            .filter(|submission| submission.status == status)
            .count()
    }

    /// All submissions for a form, ordered by id.
    pub fn for_form(&self, form_id: EntityId) -> impl Iterator<Item = &Submission> {
        self.submissions
            .values()
            .filter(move |submission| submission.form_id == form_id)
    }

    /// The earliest `page_size` submissions still stored for a form.
    /// Callers that delete each page as they go walk the whole set.
    pub fn next_page(&self, form_id: EntityId, page_size: usize) -> Vec<EntityId> {
        self.for_form(form_id)
            .take(page_size)
            .map(|submission| submission.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    #[test]
    fn seq_numbers_are_per_form() {
        let mut store = SubmissionStore::new();
        let a = store.insert(1, BTreeMap::new(), at(0));
        let b = store.insert(2, BTreeMap::new(), at(1));
        let c = store.insert(1, BTreeMap::new(), at(2));
        assert_eq!(store.get(a).map(|s| s.seq), Some(1));
        assert_eq!(store.get(b).map(|s| s.seq), Some(1));
        assert_eq!(store.get(c).map(|s| s.seq), Some(2));
    }

    #[test]
    fn partial_update_leaves_other_values() {
        let mut store = SubmissionStore::new();
        let mut values = BTreeMap::new();
        values.insert(3, FieldValue::scalar("keep"));
        values.insert(4, FieldValue::scalar("old"));
        let id = store.insert(1, values, at(0));

        let mut changes = BTreeMap::new();
        changes.insert(4, FieldValue::scalar("new"));
        store.update_values(id, &changes, at(5)).expect("update");

        let submission = store.get(id).expect("submission");
        assert_eq!(submission.value(3), Some(&FieldValue::scalar("keep")));
        assert_eq!(submission.value(4), Some(&FieldValue::scalar("new")));
        assert_eq!(submission.modified_at, at(5));
    }

    #[test]
    fn next_page_shrinks_as_pages_are_deleted() {
        let mut store = SubmissionStore::new();
        for _ in 0..5 {
            store.insert(1, BTreeMap::new(), at(0));
        }
        let first = store.next_page(1, 2);
        assert_eq!(first.len(), 2);
        for id in &first {
            store.delete(*id).expect("delete");
        }
        let second = store.next_page(1, 2);
        assert!(second.iter().all(|id| !first.contains(id)));
    }
}
