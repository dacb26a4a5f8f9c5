//! Listing column derivation.
//!
//! The column set for a form is dynamic: a checkbox column and the
//! sequence-id column, one column per processable field, and a date
//! column, in that order. Column visibility is persisted per user per
//! form; when nothing is stored, everything after the first five columns
//! is hidden except the date column.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use formdesk_model::{EntityId, Form};
use formdesk_store::{UserId, UserOptionsStore, field_column_slug};

pub const CHECKBOX_COLUMN: &str = "cb";
pub const ID_COLUMN: &str = "id";
pub const DATE_COLUMN: &str = "sub_date";

/// Columns up to this index stay visible by default.
const DEFAULT_VISIBLE_COLUMNS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub slug: String,
    pub label: String,
    pub sortable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    pub columns: Vec<Column>,
}

impl ColumnSet {
    /// Derive the column set for a form from its processable fields.
    pub fn for_form(form: &Form) -> Self {
        let mut columns = vec![
            Column {
                slug: CHECKBOX_COLUMN.to_string(),
                label: String::new(),
                sortable: false,
            },
            Column {
                slug: ID_COLUMN.to_string(),
                label: "ID".to_string(),
                sortable: true,
            },
        ];
        for field in form.processable_fields() {
            columns.push(Column {
                slug: field_column_slug(form.id, field.id),
                label: field.column_label(),
                sortable: true,
            });
        }
        columns.push(Column {
            slug: DATE_COLUMN.to_string(),
            label: "Date".to_string(),
            sortable: true,
        });
        Self { columns }
    }

    /// Slugs of all sortable columns (everything but the checkbox).
    pub fn sortable_slugs(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.sortable)
            .map(|column| column.slug.as_str())
            .collect()
    }

    /// Default hidden slugs: everything after the first five columns,
    /// date column excepted.
    pub fn default_hidden(&self) -> Vec<String> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(index, column)| *index > DEFAULT_VISIBLE_COLUMNS && column.slug != DATE_COLUMN)
            .map(|(_, column)| column.slug.clone())
            .collect()
    }

    /// Hidden slugs for a user, falling back to the default set.
    pub fn hidden_for_user(
        &self,
        options: &UserOptionsStore,
        user: UserId,
        form_id: EntityId,
    ) -> Result<Vec<String>> {
        let stored: Option<Vec<String>> = options.get(user, &hidden_columns_key(form_id))?;
        Ok(stored.unwrap_or_else(|| self.default_hidden()))
    }

    /// Columns left visible for a user.
    pub fn visible_for_user(
        &self,
        options: &UserOptionsStore,
        user: UserId,
        form_id: EntityId,
    ) -> Result<Vec<Column>> {
        let hidden = self.hidden_for_user(options, user, form_id)?;
        Ok(self
            .columns
            .iter()
            .filter(|column| !hidden.contains(&column.slug))
            .cloned()
            .collect())
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.slug.as_str()).collect()
    }
}

/// User-option key holding a form's hidden columns.
pub fn hidden_columns_key(form_id: EntityId) -> String {
    format!("hidden_columns_form_{form_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdesk_model::{Field, FieldType};

    fn form_with_fields(count: usize) -> Form {
        let mut form = Form::new(1, "F");
        for i in 0..count {
            form.fields.push(Field::new(
                10 + i as EntityId,
                FieldType::Textbox,
                format!("Field {i}"),
            ));
        }
        form
    }

    #[test]
    fn id_and_date_always_present() {
        let set = ColumnSet::for_form(&form_with_fields(0));
        let slugs = set.slugs();
        assert!(slugs.contains(&ID_COLUMN));
        assert!(slugs.contains(&DATE_COLUMN));
    }

    #[test]
    fn non_processable_fields_have_no_column() {
        let mut form = form_with_fields(1);
        form.fields.push(Field::new(99, FieldType::Divider, ""));
        form.fields
            .push(Field::new(100, FieldType::SubmitButton, "Send"));
        let set = ColumnSet::for_form(&form);
        assert!(!set.slugs().iter().any(|slug| slug.contains("_field_99")));
        assert!(!set.slugs().iter().any(|slug| slug.contains("_field_100")));
    }

    #[test]
    fn checkbox_is_not_sortable() {
        let set = ColumnSet::for_form(&form_with_fields(2));
        assert!(!set.sortable_slugs().contains(&CHECKBOX_COLUMN));
        assert!(set.sortable_slugs().contains(&ID_COLUMN));
    }

    #[test]
    fn default_hidden_keeps_first_five_and_date() {
        // cb, id, f0..f7, sub_date = 11 columns.
        let set = ColumnSet::for_form(&form_with_fields(8));
        let hidden = set.default_hidden();
        // Columns at index 0..=5 visible: cb, id, f0, f1, f2, f3.
        assert_eq!(hidden.len(), 4);
        assert!(!hidden.contains(&DATE_COLUMN.to_string()));
        assert!(hidden.contains(&field_column_slug(1, 14)));
    }
}
