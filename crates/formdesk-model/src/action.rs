//! Post-submission actions attached to a form (notifications, redirects).
//! Actions persist alongside fields and share the save/temporary-id
//! contract, but the admin surface never lists them as columns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::field::{bool_setting, string_setting};
use crate::ident::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSettings {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: EntityId,
    /// Behavior tag, e.g. "email" or "redirect". Opaque to the admin surface.
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub settings: ActionSettings,
}

impl Action {
    pub fn new(id: EntityId, action_type: impl Into<String>) -> Self {
        Self {
            id,
            action_type: action_type.into(),
            settings: ActionSettings::default(),
        }
    }

    /// Merge a settings map from a save payload into the typed settings.
    pub fn apply_settings(&mut self, settings: &BTreeMap<String, serde_json::Value>) {
        for (key, value) in settings {
            match key.as_str() {
                "label" => self.settings.label = string_setting(value),
                "active" => self.settings.active = bool_setting(value),
                "type" => self.action_type = string_setting(value),
                _ => {
                    self.settings.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }
}
