//! CSV export of submissions.
//!
//! The header row mirrors the listing's derived columns (sequence id,
//! one column per processable field, date) so exports and the admin
//! table always agree on shape. List values join with `, `; values for
//! fields no longer on the form export as empty cells.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use formdesk_admin::ColumnSet;
use formdesk_model::{EntityId, Form, Submission};
use formdesk_store::{SubmissionStore, parse_field_column_slug};

pub mod filename;

pub use filename::export_filename;

/// Exports submissions of one form as CSV.
#[derive(Debug, Clone)]
pub struct SubmissionCsvExporter<'a> {
    form: &'a Form,
}

impl<'a> SubmissionCsvExporter<'a> {
    pub fn new(form: &'a Form) -> Self {
        Self { form }
    }

    /// Export a single submission.
    pub fn export_single<W: Write>(&self, submission: &Submission, writer: W) -> Result<()> {
        self.write(std::iter::once(submission), writer)
    }

    /// Export the given submissions, typically a bulk-action selection.
    pub fn export_selected<W: Write>(
        &self,
        store: &SubmissionStore,
        ids: &[EntityId],
        writer: W,
    ) -> Result<()> {
        let submissions = ids.iter().filter_map(|id| store.get(*id));
        self.write(submissions, writer)
    }

    /// Export every stored submission of the form.
    pub fn export_all<W: Write>(&self, store: &SubmissionStore, writer: W) -> Result<()> {
        self.write(store.for_form(self.form.id), writer)
    }

    fn write<'s, W: Write>(
        &self,
        submissions: impl Iterator<Item = &'s Submission>,
        writer: W,
    ) -> Result<()> {
        let columns = data_columns(self.form);
        let mut csv_writer = csv::Writer::from_writer(writer);

        let header: Vec<&str> = columns.iter().map(|(_, label)| label.as_str()).collect();
        csv_writer
            .write_record(&header)
            .context("Failed to write CSV header")?;

        let mut rows = 0usize;
        for submission in submissions {
            let record: Vec<String> = columns
                .iter()
                .map(|(slug, _)| cell_value(self.form, submission, slug))
                .collect();
            csv_writer
                .write_record(&record)
                .with_context(|| format!("Failed to write submission {}", submission.id))?;
            rows += 1;
        }
        csv_writer.flush().context("Failed to flush CSV output")?;
        info!(form_id = self.form.id, rows, "submissions exported");
        Ok(())
    }
}

/// Listing columns that carry data: everything except the checkbox.
fn data_columns(form: &Form) -> Vec<(String, String)> {
    ColumnSet::for_form(form)
        .columns
        .into_iter()
        .filter(|column| column.slug != formdesk_admin::columns::CHECKBOX_COLUMN)
        .map(|column| {
            let label = if column.slug == formdesk_admin::columns::ID_COLUMN {
                "ID".to_string()
            } else if column.slug == formdesk_admin::columns::DATE_COLUMN {
                "Date".to_string()
            } else {
                column.label
            };
            (column.slug, label)
        })
        .collect()
}

fn cell_value(form: &Form, submission: &Submission, slug: &str) -> String {
    if slug == formdesk_admin::columns::ID_COLUMN {
        return submission.seq.to_string();
    }
    if slug == formdesk_admin::columns::DATE_COLUMN {
        return submission.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    parse_field_column_slug(slug, form.id)
        .and_then(|field_id| submission.value(field_id))
        .map(|value| value.joined())
        .unwrap_or_default()
}

/// Build the filename used for a form's export download.
pub fn download_filename(form: &Form, date: NaiveDate) -> String {
    export_filename(form.title(), date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use formdesk_model::{Field, FieldType, FieldValue};
    use std::collections::BTreeMap;

    fn fixture() -> (Form, SubmissionStore) {
        let mut form = Form::new(1, "Orders");
        form.fields.push(Field::new(5, FieldType::Textbox, "Item"));
        form.fields.push(Field::new(6, FieldType::List, "Toppings"));
        form.fields
            .push(Field::new(7, FieldType::SubmitButton, "Order"));

        let mut store = SubmissionStore::new();
        let mut values = BTreeMap::new();
        values.insert(5, FieldValue::scalar("Pizza"));
        values.insert(
            6,
            FieldValue::List(vec!["Cheese".to_string(), "Basil".to_string()]),
        );
        values.insert(99, FieldValue::scalar("orphaned"));
        store.insert(
            1,
            values,
            DateTime::from_timestamp(0, 0).unwrap_or_default(),
        );
        (form, store)
    }

    #[test]
    fn export_all_writes_header_and_rows() {
        let (form, store) = fixture();
        let exporter = SubmissionCsvExporter::new(&form);
        let mut out = Vec::new();
        exporter.export_all(&store, &mut out).expect("export");

        let text = String::from_utf8(out).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID,Item,Toppings,Date"));
        assert_eq!(
            lines.next(),
            Some("1,Pizza,\"Cheese, Basil\",1970-01-01 00:00:00")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_selected_skips_unknown_ids() {
        let (form, store) = fixture();
        let exporter = SubmissionCsvExporter::new(&form);
        let mut out = Vec::new();
        exporter
            .export_selected(&store, &[1, 999], &mut out)
            .expect("export");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 2, "header plus one row");
    }

    #[test]
    fn removed_field_values_do_not_appear() {
        let (form, store) = fixture();
        let exporter = SubmissionCsvExporter::new(&form);
        let mut out = Vec::new();
        exporter.export_all(&store, &mut out).expect("export");
        let text = String::from_utf8(out).expect("utf8");
        assert!(!text.contains("orphaned"));
    }
}
