//! Admin AJAX endpoints: form save, form delete, hidden-column save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use formdesk_model::{Action, EntityId, EntityRef, Field, FieldType, Form};

use crate::columns::hidden_columns_key;
use crate::router::{AdminContext, AjaxRequest, AjaxResponse};

/// User-option key holding a form's pending preview payload.
pub fn preview_key(form_id: EntityId) -> String {
    format!("form_preview_{form_id}")
}

/// Save payload: the form plus its field and action definitions, each
/// carrying its own id (durable or temporary) and a settings map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveFormPayload {
    pub id: EntityRef,
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub fields: Vec<SaveEntity>,
    #[serde(default)]
    pub actions: Vec<SaveEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEntity {
    pub id: EntityRef,
    #[serde(default)]
    pub settings: BTreeMap<String, serde_json::Value>,
}

/// Temporary→durable id mapping reported back after a save, partitioned
/// by entity kind so the client can rewrite local references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewIds {
    #[serde(default)]
    pub forms: BTreeMap<String, EntityId>,
    #[serde(default)]
    pub fields: BTreeMap<String, EntityId>,
    #[serde(default)]
    pub actions: BTreeMap<String, EntityId>,
}

/// Persist a form definition. Settings are written first, then fields,
/// then actions; each temporary id yields a durable one recorded in the
/// response. A missing `form` parameter aborts before any write.
pub fn save_form(context: &mut AdminContext, request: &AjaxRequest) -> AjaxResponse {
    if !context.token.verify(&request.token) {
        return AjaxResponse::error("Invalid security token");
    }
    let Some(raw) = request.param("form") else {
        return AjaxResponse::error("Form Not Found");
    };
    let payload: SaveFormPayload = match serde_json::from_str(raw) {
        Ok(payload) => payload,
        Err(error) => return AjaxResponse::error(format!("Invalid form payload: {error}")),
    };

    let mut new_ids = NewIds::default();

    // Resolve the form itself first; fields and actions hang off it.
    let mut form = match resolve_form(context, &payload.id, &mut new_ids) {
        Ok(form) => form,
        Err(response) => return response,
    };
    form.apply_settings(&payload.settings);

    // Child ids are allocated above everything the form already uses.
    let mut next_child_id = form.max_entity_id() + 1;

    for entity in &payload.fields {
        let field_id = match &entity.id {
            EntityRef::Durable(id) => *id,
            EntityRef::Temporary(marker) => {
                let id = next_child_id;
                next_child_id += 1;
                new_ids.fields.insert(marker.clone(), id);
                id
            }
        };
        match form.field_mut(field_id) {
            Some(field) => field.apply_settings(&entity.settings),
            None => {
                let mut field = Field::new(field_id, FieldType::Textbox, "");
                field.apply_settings(&entity.settings);
                form.fields.push(field);
            }
        }
    }

    for entity in &payload.actions {
        let action_id = match &entity.id {
            EntityRef::Durable(id) => *id,
            EntityRef::Temporary(marker) => {
                let id = next_child_id;
                next_child_id += 1;
                new_ids.actions.insert(marker.clone(), id);
                id
            }
        };
        match form.action_mut(action_id) {
            Some(action) => action.apply_settings(&entity.settings),
            None => {
                let mut action = Action::new(action_id, "email");
                action.apply_settings(&entity.settings);
                form.actions.push(action);
            }
        }
    }

    if let Err(error) = context.forms.save(&form) {
        return AjaxResponse::error(format!("Failed to save form: {error}"));
    }

    // A pending preview of the old definition is stale now.
    if let Err(error) = context
        .user_options
        .remove(request.user, &preview_key(form.id))
    {
        debug!(form_id = form.id, %error, "preview invalidation failed");
    }

    info!(
        form_id = form.id,
        fields = form.fields.len(),
        actions = form.actions.len(),
        "form saved"
    );
    match serde_json::to_value(serde_json::json!({ "new_ids": new_ids })) {
        Ok(data) => AjaxResponse::ok(data),
        Err(error) => AjaxResponse::error(format!("Failed to encode response: {error}")),
    }
}

fn resolve_form(
    context: &AdminContext,
    id: &EntityRef,
    new_ids: &mut NewIds,
) -> Result<Form, AjaxResponse> {
    match id {
        EntityRef::Durable(form_id) => {
            let loaded = context
                .forms
                .load(*form_id)
                .map_err(|error| AjaxResponse::error(format!("Failed to load form: {error}")))?;
            Ok(loaded.unwrap_or_else(|| Form::new(*form_id, "")))
        }
        EntityRef::Temporary(marker) => {
            let form_id = context
                .forms
                .allocate_form_id()
                .map_err(|error| AjaxResponse::error(format!("Failed to allocate id: {error}")))?;
            new_ids.forms.insert(marker.clone(), form_id);
            Ok(Form::new(form_id, ""))
        }
    }
}

/// Acknowledge a form deletion request. Deliberately does nothing beyond
/// the token check.
pub fn delete_form(context: &mut AdminContext, request: &AjaxRequest) -> AjaxResponse {
    if !context.token.verify(&request.token) {
        return AjaxResponse::error("Invalid security token");
    }
    AjaxResponse::acknowledged()
}

/// Persist the hidden-column slugs for a user and form. The `hidden`
/// parameter is a comma-separated slug list; empty entries are dropped.
pub fn hide_columns(context: &mut AdminContext, request: &AjaxRequest) -> AjaxResponse {
    if !context.token.verify(&request.token) {
        return AjaxResponse::error("Invalid security token");
    }
    let Some(form_id) = request.param("form_id").and_then(|raw| raw.parse().ok()) else {
        return AjaxResponse::error("Missing form_id");
    };
    let hidden: Vec<String> = request
        .param("hidden")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .collect();

    match context
        .user_options
        .set(request.user, &hidden_columns_key(form_id), &hidden)
    {
        Ok(()) => AjaxResponse::acknowledged(),
        Err(error) => AjaxResponse::error(format!("Failed to save hidden columns: {error}")),
    }
}
