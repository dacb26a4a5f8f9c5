//! Stored submissions: one record per completed form instance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ident::EntityId;

/// A submitted value: a scalar, or an ordered sequence of scalars for
/// multi-select fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        FieldValue::Scalar(value.into())
    }

    /// All scalar parts, in order. A scalar yields one item.
    pub fn parts(&self) -> Vec<&str> {
        match self {
            FieldValue::Scalar(value) => vec![value.as_str()],
            FieldValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Single display string, list parts joined with `, `.
    pub fn joined(&self) -> String {
        match self {
            FieldValue::Scalar(value) => value.clone(),
            FieldValue::List(values) => values.join(", "),
        }
    }

    /// Numeric reading of the value, used for numeric column sorts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Scalar(value) => value.trim().parse().ok(),
            FieldValue::List(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Published,
    Trashed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Published => "publish",
            SubmissionStatus::Trashed => "trash",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = crate::error::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "publish" | "published" | "all" => Ok(SubmissionStatus::Published),
            "trash" | "trashed" => Ok(SubmissionStatus::Trashed),
            _ => Err(crate::error::ModelError::UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: EntityId,
    /// Per-form sequence number, shown as the listing "ID".
    pub seq: u64,
    pub form_id: EntityId,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Field id → submitted value. Keys may reference fields later removed
    /// from the form; those degrade to an unknown column, never an error.
    #[serde(default)]
    pub values: BTreeMap<EntityId, FieldValue>,
    /// Principal that submitted the record, when known.
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl Submission {
    pub fn value(&self, field_id: EntityId) -> Option<&FieldValue> {
        self.values.get(&field_id)
    }

    pub fn is_trashed(&self) -> bool {
        self.status == SubmissionStatus::Trashed
    }
}
