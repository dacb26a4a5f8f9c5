//! Submission listing for a selected form: rows, cells, counts, bulk and
//! row actions, and the export triggers parsed from listing requests.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use formdesk_model::{
    EntityId, Form, MAX_LABEL_LEN, Submission, SubmissionStatus, truncate_chars,
};
use formdesk_store::{ListingQuery, SubmissionStore, parse_field_column_slug, run_query};

use crate::columns::{ColumnSet, DATE_COLUMN, ID_COLUMN};

/// At most this many items of a sequence value render in a list cell.
pub const MAX_CELL_ITEMS: usize = 3;

/// Bulk actions offered on the listing. The stock edit action is removed
/// and replaced by export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Export,
    Trash,
}

/// Per-row actions, dependent on the view's status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    Edit,
    ExportSingle,
    Trash,
    Restore,
    DeletePermanently,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateCell {
    /// Full timestamp, `Y/m/d g:i:s A` style.
    pub absolute: String,
    /// Relative within the last day, short date otherwise.
    pub human: String,
    /// "Submitted" for published records, "Last Modified" otherwise.
    pub annotation: String,
}

/// A rendered listing cell. Unknown or missing values degrade to `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellContent {
    Seq(u64),
    Date(DateCell),
    Text(String),
    Items(Vec<String>),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub column: String,
    pub content: CellContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub submission_id: EntityId,
    pub cells: Vec<Cell>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone)]
pub struct ListingRows {
    pub columns: ColumnSet,
    pub rows: Vec<Row>,
    pub total: usize,
}

/// Published/trashed counts for the listing header. No selected form
/// means zero everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PostCounts {
    pub published: usize,
    pub trashed: usize,
}

pub fn post_counts(form: Option<&Form>, store: &SubmissionStore) -> PostCounts {
    match form {
        Some(form) => PostCounts {
            published: store.count(form.id, SubmissionStatus::Published),
            trashed: store.count(form.id, SubmissionStatus::Trashed),
        },
        None => PostCounts::default(),
    }
}

pub fn bulk_actions() -> Vec<BulkAction> {
    vec![BulkAction::Export, BulkAction::Trash]
}

pub fn row_actions(status: SubmissionStatus) -> Vec<RowAction> {
    match status {
        SubmissionStatus::Published => {
            vec![RowAction::Edit, RowAction::ExportSingle, RowAction::Trash]
        }
        SubmissionStatus::Trashed => vec![RowAction::Restore, RowAction::DeletePermanently],
    }
}

#[derive(Debug, Clone)]
pub struct ListingController<'a> {
    form: &'a Form,
}

impl<'a> ListingController<'a> {
    pub fn new(form: &'a Form) -> Self {
        Self { form }
    }

    pub fn columns(&self) -> ColumnSet {
        ColumnSet::for_form(self.form)
    }

    /// Run a query and render one row per matching submission.
    pub fn rows(&self, store: &SubmissionStore, query: &ListingQuery, now: DateTime<Utc>) -> ListingRows {
        let columns = self.columns();
        let page = run_query(store, query);
        let actions = row_actions(query.status);
        let rows = page
            .submissions
            .iter()
            .map(|submission| Row {
                submission_id: submission.id,
                cells: self.render_cells(&columns, submission, now),
                actions: actions.clone(),
            })
            .collect();
        ListingRows {
            columns,
            rows,
            total: page.total,
        }
    }

    fn render_cells(
        &self,
        columns: &ColumnSet,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> Vec<Cell> {
        columns
            .columns
            .iter()
            .filter(|column| column.slug != crate::columns::CHECKBOX_COLUMN)
            .map(|column| Cell {
                column: column.slug.clone(),
                content: self.render_cell(&column.slug, submission, now),
            })
            .collect()
    }

    fn render_cell(
        &self,
        slug: &str,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> CellContent {
        match slug {
            ID_COLUMN => CellContent::Seq(submission.seq),
            DATE_COLUMN => CellContent::Date(date_cell(submission, now)),
            _ => match parse_field_column_slug(slug, self.form.id) {
                Some(field_id) => field_cell(submission, field_id),
                None => CellContent::Empty,
            },
        }
    }
}

fn field_cell(submission: &Submission, field_id: EntityId) -> CellContent {
    match submission.value(field_id) {
        Some(formdesk_model::FieldValue::List(items)) => CellContent::Items(
            items
                .iter()
                .take(MAX_CELL_ITEMS)
                .map(|item| truncate_chars(item, MAX_LABEL_LEN))
                .collect(),
        ),
        Some(formdesk_model::FieldValue::Scalar(value)) => {
            CellContent::Text(truncate_chars(value, MAX_LABEL_LEN))
        }
        None => CellContent::Empty,
    }
}

fn date_cell(submission: &Submission, now: DateTime<Utc>) -> DateCell {
    let created = submission.created_at;
    let absolute = created.format("%Y/%m/%d %I:%M:%S %p").to_string();
    let human = relative_label(created, now);
    let annotation = if submission.is_trashed() {
        "Last Modified".to_string()
    } else {
        "Submitted".to_string()
    };
    DateCell {
        absolute,
        human,
        annotation,
    }
}

/// Relative label within the last day, short date otherwise.
fn relative_label(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(created);
    let seconds = diff.num_seconds();
    if seconds > 0 && seconds < 86_400 {
        if seconds < 3_600 {
            let minutes = (seconds / 60).max(1);
            format!("{minutes} mins ago")
        } else {
            let hours = seconds / 3_600;
            format!("{hours} hours ago")
        }
    } else {
        created.format("%Y/%m/%d").to_string()
    }
}

/// Export requests recognized on listing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTrigger {
    /// `export_single=<id>`
    Single(EntityId),
    /// `action=export` with selected submission ids.
    Selected(Vec<EntityId>),
    /// The "download all" button for the selected form.
    DownloadAll { form_id: EntityId },
}

/// Inspect listing request parameters for an export trigger.
pub fn parse_export_trigger(params: &BTreeMap<String, String>) -> Option<ExportTrigger> {
    if let Some(raw) = params.get("export_single")
        && !raw.is_empty()
        && let Ok(id) = raw.parse()
    {
        return Some(ExportTrigger::Single(id));
    }
    if params.get("action").map(String::as_str) == Some("export") {
        let ids = params
            .get("post")
            .map(|raw| {
                raw.split(',')
                    .filter_map(|part| part.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_default();
        return Some(ExportTrigger::Selected(ids));
    }
    if params.get("submit").map(String::as_str) == Some("download_all")
        && let Some(form_id) = params.get("form_id").and_then(|raw| raw.parse().ok())
    {
        return Some(ExportTrigger::DownloadAll { form_id });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    #[test]
    fn relative_label_within_a_day() {
        let created = at(1_000_000);
        assert_eq!(relative_label(created, at(1_000_000 + 120)), "2 mins ago");
        assert_eq!(
            relative_label(created, at(1_000_000 + 7_200)),
            "2 hours ago"
        );
        assert_eq!(
            relative_label(created, at(1_000_000 + 200_000)),
            created.format("%Y/%m/%d").to_string()
        );
    }

    #[test]
    fn bulk_actions_swap_edit_for_export() {
        let actions = bulk_actions();
        assert!(actions.contains(&BulkAction::Export));
    }

    #[test]
    fn trash_rows_offer_restore_and_delete() {
        assert_eq!(
            row_actions(SubmissionStatus::Trashed),
            vec![RowAction::Restore, RowAction::DeletePermanently]
        );
    }

    #[test]
    fn export_trigger_parsing() {
        let mut params = BTreeMap::new();
        params.insert("export_single".to_string(), "12".to_string());
        assert_eq!(
            parse_export_trigger(&params),
            Some(ExportTrigger::Single(12))
        );

        let mut params = BTreeMap::new();
        params.insert("action".to_string(), "export".to_string());
        params.insert("post".to_string(), "1, 2,3".to_string());
        assert_eq!(
            parse_export_trigger(&params),
            Some(ExportTrigger::Selected(vec![1, 2, 3]))
        );

        let mut params = BTreeMap::new();
        params.insert("submit".to_string(), "download_all".to_string());
        params.insert("form_id".to_string(), "5".to_string());
        assert_eq!(
            parse_export_trigger(&params),
            Some(ExportTrigger::DownloadAll { form_id: 5 })
        );

        assert_eq!(parse_export_trigger(&BTreeMap::new()), None);
    }
}
