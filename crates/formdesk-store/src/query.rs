//! Listing queries over the submission store.
//!
//! The admin listing restricts by form and status, optionally by an
//! inclusive date range, filters by free-text search, sorts by a column,
//! and paginates. Field-column sorts compare numerically when the field
//! is flagged for numeric sorting, lexically otherwise.

use std::cmp::Ordering;

use chrono::{NaiveDate, Utc};

use formdesk_model::{EntityId, Form, Submission, SubmissionStatus};

use crate::store::SubmissionStore;

/// Sort target for a listing, parsed from the `orderby` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    Seq,
    Date,
    Field { field_id: EntityId, numeric: bool },
}

impl OrderBy {
    /// Parse an `orderby` slug. Field columns use the slug
    /// `form_<formId>_field_<fieldId>`; the numeric flag is resolved from
    /// the form definition. Unknown slugs yield `None`.
    pub fn parse(slug: &str, form: &Form) -> Option<Self> {
        match slug {
            "id" => return Some(OrderBy::Seq),
            "sub_date" | "date" => return Some(OrderBy::Date),
            _ => {}
        }
        let field_id = parse_field_column_slug(slug, form.id)?;
        let numeric = form
            .field(field_id)
            .map(|field| field.numeric_sort())
            .unwrap_or(false);
        Some(OrderBy::Field { field_id, numeric })
    }
}

/// Extract the field id from a `form_<formId>_field_<fieldId>` column slug.
pub fn parse_field_column_slug(slug: &str, form_id: EntityId) -> Option<EntityId> {
    let rest = slug.strip_prefix("form_")?;
    let (slug_form_id, rest) = rest.split_once("_field_")?;
    if slug_form_id.parse::<EntityId>().ok()? != form_id {
        return None;
    }
    rest.parse().ok()
}

/// Column slug for a field of a form.
pub fn field_column_slug(form_id: EntityId, field_id: EntityId) -> String {
    format!("form_{form_id}_field_{field_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct ListingQuery {
    pub form_id: EntityId,
    pub status: SubmissionStatus,
    /// Inclusive, from 00:00:00 of this day.
    pub begin_date: Option<NaiveDate>,
    /// Inclusive, to 23:59:59 of this day.
    pub end_date: Option<NaiveDate>,
    pub order_by: Option<OrderBy>,
    pub direction: SortDirection,
    /// Whitespace-separated terms, OR-joined, matched case-insensitively
    /// as substrings of any submitted value.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl ListingQuery {
    pub fn for_form(form_id: EntityId) -> Self {
        Self {
            form_id,
            status: SubmissionStatus::Published,
            begin_date: None,
            end_date: None,
            order_by: None,
            direction: SortDirection::Ascending,
            search: None,
            page: 1,
            per_page: 20,
        }
    }
}

/// One page of listing results.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub submissions: Vec<Submission>,
    /// Matching submissions before pagination.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Run a listing query against the store.
pub fn run_query(store: &SubmissionStore, query: &ListingQuery) -> ListingPage {
    let mut matched: Vec<&Submission> = store
        .for_form(query.form_id)
        .filter(|submission| submission.status == query.status)
        .filter(|submission| matches_date_range(submission, query))
        .filter(|submission| matches_search(submission, query.search.as_deref()))
        .collect();

    if let Some(order_by) = query.order_by {
        matched.sort_by(|a, b| {
            let ordering = compare(a, b, order_by);
            match query.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    let total = matched.len();
    let page = query.page.max(1);
    let start = (page - 1).saturating_mul(query.per_page);
    let submissions = matched
        .into_iter()
        .skip(start)
        .take(query.per_page)
        .cloned()
        .collect();

    ListingPage {
        submissions,
        total,
        page,
        per_page: query.per_page,
    }
}

fn matches_date_range(submission: &Submission, query: &ListingQuery) -> bool {
    let created = submission.created_at.with_timezone(&Utc).date_naive();
    if let Some(begin) = query.begin_date
        && created < begin
    {
        return false;
    }
    if let Some(end) = query.end_date
        && created > end
    {
        return false;
    }
    true
}

fn matches_search(submission: &Submission, search: Option<&str>) -> bool {
    let Some(search) = search else {
        return true;
    };
    let terms: Vec<String> = search
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if terms.is_empty() {
        return true;
    }
    submission.values.values().any(|value| {
        value.parts().iter().any(|part| {
            let haystack = part.to_lowercase();
            terms.iter().any(|term| haystack.contains(term))
        })
    })
}

fn compare(a: &Submission, b: &Submission, order_by: OrderBy) -> Ordering {
    match order_by {
        OrderBy::Seq => a.seq.cmp(&b.seq),
        OrderBy::Date => a.created_at.cmp(&b.created_at),
        OrderBy::Field { field_id, numeric } => {
            if numeric {
                compare_numeric(a, b, field_id)
            } else {
                compare_lexical(a, b, field_id)
            }
        }
    }
}

/// Numeric field sort; submissions without a parseable number sort last.
fn compare_numeric(a: &Submission, b: &Submission, field_id: EntityId) -> Ordering {
    let left = a.value(field_id).and_then(|value| value.as_number());
    let right = b.value(field_id).and_then(|value| value.as_number());
    match (left, right) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Lexical field sort; submissions without a value sort last.
fn compare_lexical(a: &Submission, b: &Submission, field_id: EntityId) -> Ordering {
    let left = a.value(field_id).map(|value| value.joined());
    let right = b.value(field_id).map(|value| value.joined());
    match (left, right) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formdesk_model::{Field, FieldType};

    #[test]
    fn field_column_slug_round_trip() {
        let slug = field_column_slug(12, 34);
        assert_eq!(slug, "form_12_field_34");
        assert_eq!(parse_field_column_slug(&slug, 12), Some(34));
        assert_eq!(parse_field_column_slug(&slug, 13), None);
        assert_eq!(parse_field_column_slug("id", 12), None);
    }

    #[test]
    fn orderby_resolves_numeric_flag_from_form() {
        let mut form = Form::new(5, "F");
        let mut field = Field::new(9, FieldType::Number, "Age");
        field.settings.num_sort = true;
        form.fields.push(field);

        assert_eq!(
            OrderBy::parse("form_5_field_9", &form),
            Some(OrderBy::Field {
                field_id: 9,
                numeric: true
            })
        );
        assert_eq!(OrderBy::parse("sub_date", &form), Some(OrderBy::Date));
        assert_eq!(OrderBy::parse("gibberish", &form), None);
    }
}
