//! Form definitions: settings plus ordered fields and actions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::Action;
use crate::field::{Field, string_setting};
use crate::ident::EntityId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: EntityId,
    #[serde(default)]
    pub settings: FormSettings,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Form {
    pub fn new(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            settings: FormSettings {
                title: title.into(),
                ..FormSettings::default()
            },
            fields: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.settings.title
    }

    pub fn field(&self, field_id: EntityId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == field_id)
    }

    pub fn field_mut(&mut self, field_id: EntityId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == field_id)
    }

    pub fn action_mut(&mut self, action_id: EntityId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|action| action.id == action_id)
    }

    /// Fields that store a submission value, in form order.
    pub fn processable_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| field.contributes_column())
    }

    /// Merge a settings map from a save payload into the typed settings.
    pub fn apply_settings(&mut self, settings: &BTreeMap<String, serde_json::Value>) {
        for (key, value) in settings {
            match key.as_str() {
                "title" | "form_title" => self.settings.title = string_setting(value),
                _ => {
                    self.settings.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Highest durable id used by this form or any of its children.
    /// New child ids are allocated above this.
    pub fn max_entity_id(&self) -> EntityId {
        let fields = self.fields.iter().map(|field| field.id);
        let actions = self.actions.iter().map(|action| action.id);
        let options = self
            .fields
            .iter()
            .flat_map(|field| field.options.iter().map(|option| option.id));
        fields
            .chain(actions)
            .chain(options)
            .chain(std::iter::once(self.id))
            .max()
            .unwrap_or(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    #[test]
    fn processable_fields_skip_non_storing_types() {
        let mut form = Form::new(1, "Contact");
        form.fields.push(Field::new(2, FieldType::Textbox, "Name"));
        form.fields.push(Field::new(3, FieldType::Divider, ""));
        form.fields
            .push(Field::new(4, FieldType::SubmitButton, "Send"));
        form.fields.push(Field::new(5, FieldType::Email, "Email"));

        let ids: Vec<EntityId> = form.processable_fields().map(|field| field.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn settings_title_aliases() {
        let mut form = Form::new(1, "");
        let mut settings = BTreeMap::new();
        settings.insert("form_title".to_string(), serde_json::json!("Survey"));
        settings.insert("show_title".to_string(), serde_json::json!(false));
        form.apply_settings(&settings);
        assert_eq!(form.title(), "Survey");
        assert_eq!(
            form.settings.extra.get("show_title"),
            Some(&serde_json::json!(false))
        );
    }

    #[test]
    fn max_entity_id_spans_children() {
        let mut form = Form::new(10, "F");
        form.fields.push(Field::new(25, FieldType::Textbox, "A"));
        form.actions.push(Action::new(31, "email"));
        assert_eq!(form.max_entity_id(), 31);
    }
}
