//! Submission detail editing: one editable row per processable field
//! still defined on the owning form, plus a stats panel.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use formdesk_model::{EditorKind, EntityId, FieldValue, Form, Submission, SubmissionStatus};
use formdesk_store::SubmissionStore;

use crate::error::Result;
use crate::session::Principal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub field_id: EntityId,
    pub label: String,
    pub editor: EditorKind,
    /// Current stored value; a field added after submission has none.
    pub value: Option<FieldValue>,
}

/// Rows for the detail editor. Fields removed from the form since
/// submission simply do not appear; their stored values are untouched.
pub fn editor_rows(form: &Form, submission: &Submission) -> Vec<DetailRow> {
    form.processable_fields()
        .map(|field| DetailRow {
            field_id: field.id,
            label: field.column_label(),
            editor: field.field_type.editor(),
            value: submission.value(field.id).cloned(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsPanel {
    pub seq: u64,
    pub status: SubmissionStatus,
    pub form_title: String,
    pub submitted_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub submitted_by: Option<String>,
}

pub fn stats_panel(form: &Form, submission: &Submission) -> StatsPanel {
    StatsPanel {
        seq: submission.seq,
        status: submission.status,
        form_title: form.title().to_string(),
        submitted_at: submission.created_at,
        modified_at: submission.modified_at,
        submitted_by: submission.submitted_by.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Number of field values written.
    Saved(usize),
    /// Framework-internal autosave pass; nothing written.
    SkippedAutosave,
    /// Principal may not edit this record; nothing written, no error.
    PermissionDenied,
}

/// Apply an edit payload to a submission. Only field ids present in
/// `changes` are written; everything else is left as stored.
pub fn save(
    store: &mut SubmissionStore,
    principal: &Principal,
    submission_id: EntityId,
    changes: &BTreeMap<EntityId, FieldValue>,
    autosave: bool,
    now: DateTime<Utc>,
) -> Result<SaveOutcome> {
    if autosave {
        return Ok(SaveOutcome::SkippedAutosave);
    }
    if !principal.can_edit_submissions {
        debug!(
            user = principal.user_id,
            submission_id, "edit refused: no permission"
        );
        return Ok(SaveOutcome::PermissionDenied);
    }
    store.update_values(submission_id, changes, now)?;
    Ok(SaveOutcome::Saved(changes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdesk_model::{Field, FieldType};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    fn fixture() -> (Form, SubmissionStore, EntityId) {
        let mut form = Form::new(1, "Contact");
        form.fields.push(Field::new(3, FieldType::Textbox, "Name"));
        form.fields.push(Field::new(4, FieldType::Email, "Email"));
        form.fields
            .push(Field::new(5, FieldType::SubmitButton, "Send"));

        let mut store = SubmissionStore::new();
        let mut values = BTreeMap::new();
        values.insert(3, FieldValue::scalar("Ada"));
        values.insert(4, FieldValue::scalar("ada@example.com"));
        let id = store.insert(1, values, at(0));
        (form, store, id)
    }

    #[test]
    fn rows_skip_non_processable_fields() {
        let (form, store, id) = fixture();
        let submission = store.get(id).expect("submission");
        let rows = editor_rows(&form, submission);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.field_id != 5));
    }

    #[test]
    fn save_updates_only_payload_fields() {
        let (_, mut store, id) = fixture();
        let principal = Principal::editor(1);
        let mut changes = BTreeMap::new();
        changes.insert(3, FieldValue::scalar("Grace"));

        let outcome = save(&mut store, &principal, id, &changes, false, at(9)).expect("save");
        assert_eq!(outcome, SaveOutcome::Saved(1));

        let submission = store.get(id).expect("submission");
        assert_eq!(submission.value(3), Some(&FieldValue::scalar("Grace")));
        assert_eq!(
            submission.value(4),
            Some(&FieldValue::scalar("ada@example.com"))
        );
    }

    #[test]
    fn save_is_a_silent_noop_without_permission() {
        let (_, mut store, id) = fixture();
        let principal = Principal::viewer(2);
        let mut changes = BTreeMap::new();
        changes.insert(3, FieldValue::scalar("Mallory"));

        let outcome = save(&mut store, &principal, id, &changes, false, at(9)).expect("save");
        assert_eq!(outcome, SaveOutcome::PermissionDenied);
        let submission = store.get(id).expect("submission");
        assert_eq!(submission.value(3), Some(&FieldValue::scalar("Ada")));
    }

    #[test]
    fn autosave_passes_are_skipped() {
        let (_, mut store, id) = fixture();
        let principal = Principal::editor(1);
        let mut changes = BTreeMap::new();
        changes.insert(3, FieldValue::scalar("Grace"));

        let outcome = save(&mut store, &principal, id, &changes, true, at(9)).expect("save");
        assert_eq!(outcome, SaveOutcome::SkippedAutosave);
        let submission = store.get(id).expect("submission");
        assert_eq!(submission.value(3), Some(&FieldValue::scalar("Ada")));
    }
}
