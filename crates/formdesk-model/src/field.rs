//! Field definitions and per-type capabilities.
//!
//! Field types carry their behavior directly instead of going through a
//! string-keyed registry: whether a field contributes a submission column,
//! and which editor a stored value gets, are capability methods on
//! [`FieldType`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::ident::EntityId;

/// Labels longer than this are cut when shown as a column header or cell.
pub const MAX_LABEL_LEN: usize = 140;

/// The supported field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Textbox,
    Textarea,
    Email,
    Number,
    /// Choice field backed by an ordered option list (dropdown, radio, multi-select).
    List,
    Checkbox,
    Hidden,
    /// Visual divider, never collects a value.
    Divider,
    SubmitButton,
}

impl FieldType {
    /// True when submissions carry a stored value for this type, making it
    /// eligible for a listing column and the detail editor.
    pub fn contributes_column(&self) -> bool {
        !matches!(self, FieldType::Divider | FieldType::SubmitButton)
    }

    /// The editor shown for a stored value of this type.
    pub fn editor(&self) -> EditorKind {
        match self {
            FieldType::Textarea => EditorKind::MultiLine,
            FieldType::List => EditorKind::Choices,
            FieldType::Checkbox => EditorKind::Toggle,
            FieldType::Divider | FieldType::SubmitButton => EditorKind::None,
            FieldType::Textbox | FieldType::Email | FieldType::Number | FieldType::Hidden => {
                EditorKind::SingleLine
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Textbox => "textbox",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::List => "list",
            FieldType::Checkbox => "checkbox",
            FieldType::Hidden => "hidden",
            FieldType::Divider => "divider",
            FieldType::SubmitButton => "submit_button",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = crate::error::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "textbox" | "text" => Ok(FieldType::Textbox),
            "textarea" => Ok(FieldType::Textarea),
            "email" => Ok(FieldType::Email),
            "number" => Ok(FieldType::Number),
            "list" | "select" | "dropdown" => Ok(FieldType::List),
            "checkbox" => Ok(FieldType::Checkbox),
            "hidden" => Ok(FieldType::Hidden),
            "divider" | "hr" => Ok(FieldType::Divider),
            "submit_button" | "submit" => Ok(FieldType::SubmitButton),
            _ => Err(crate::error::ModelError::UnknownFieldType(s.to_string())),
        }
    }
}

/// How a stored value is edited on the submission detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    SingleLine,
    MultiLine,
    Choices,
    Toggle,
    /// Not editable (types that never store a value).
    None,
}

/// One selectable row of a choice field, ordered within its owning field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRow {
    pub id: EntityId,
    pub label: String,
    pub value: String,
    /// Value used when the option participates in a calculation.
    #[serde(default)]
    pub calc: String,
    #[serde(default)]
    pub selected: bool,
    pub order: u32,
}

/// Settings attached to a field. Known keys are typed; anything else the
/// builder sends rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSettings {
    #[serde(default)]
    pub label: String,
    /// Shorter label preferred in admin listings when set.
    #[serde(default)]
    pub admin_label: String,
    /// Sort submission values for this field numerically.
    #[serde(default)]
    pub num_sort: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub settings: FieldSettings,
    #[serde(default)]
    pub options: Vec<OptionRow>,
}

impl Field {
    pub fn new(id: EntityId, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id,
            field_type,
            settings: FieldSettings {
                label: label.into(),
                ..FieldSettings::default()
            },
            options: Vec::new(),
        }
    }

    /// True when this field stores a submission value.
    pub fn contributes_column(&self) -> bool {
        self.field_type.contributes_column()
    }

    /// True when submission values for this field compare numerically.
    pub fn numeric_sort(&self) -> bool {
        self.settings.num_sort
    }

    /// Column header label: admin label wins over the public label, and
    /// either is cut at [`MAX_LABEL_LEN`] characters.
    pub fn column_label(&self) -> String {
        let label = if self.settings.admin_label.is_empty() {
            &self.settings.label
        } else {
            &self.settings.admin_label
        };
        truncate_chars(label, MAX_LABEL_LEN)
    }

    /// Merge a settings map from a save payload into the typed settings.
    /// A `type` key retags the field when it names a known type.
    pub fn apply_settings(&mut self, settings: &BTreeMap<String, serde_json::Value>) {
        if let Some(value) = settings.get("type")
            && let Ok(field_type) = string_setting(value).parse()
        {
            self.field_type = field_type;
        }
        apply_field_settings(&mut self.settings, settings);
    }

    /// Options ordered by their position.
    pub fn ordered_options(&self) -> Vec<&OptionRow> {
        let mut options: Vec<&OptionRow> = self.options.iter().collect();
        options.sort_by_key(|option| option.order);
        options
    }
}

fn apply_field_settings(target: &mut FieldSettings, settings: &BTreeMap<String, serde_json::Value>) {
    for (key, value) in settings {
        match key.as_str() {
            // Handled on the Field itself.
            "type" => {}
            "label" => target.label = string_setting(value),
            "admin_label" => target.admin_label = string_setting(value),
            "num_sort" => target.num_sort = bool_setting(value),
            "required" => target.required = bool_setting(value),
            _ => {
                target.extra.insert(key.clone(), value.clone());
            }
        }
    }
}

pub(crate) fn string_setting(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn bool_setting(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        serde_json::Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Cut a string at `max` characters without splitting a code point.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}
