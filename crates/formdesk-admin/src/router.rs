//! Explicit action routing for the admin AJAX surface.
//!
//! Handlers are registered once at startup, keyed by action name; there
//! is no host-lifecycle hook machinery. Handlers never propagate errors
//! to the caller's framework: failures come back as an unsuccessful
//! response carrying collected error strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use formdesk_store::{FormRepository, SubmissionStore, UserId, UserOptionsStore};

use crate::session::SecurityToken;

/// Mutable state the handlers operate on.
pub struct AdminContext {
    pub forms: FormRepository,
    pub submissions: SubmissionStore,
    pub user_options: UserOptionsStore,
    pub token: SecurityToken,
}

/// One decoded admin request.
#[derive(Debug, Clone)]
pub struct AjaxRequest {
    pub action: String,
    pub token: String,
    pub user: UserId,
    pub params: BTreeMap<String, String>,
}

impl AjaxRequest {
    pub fn new(action: impl Into<String>, token: impl Into<String>, user: UserId) -> Self {
        Self {
            action: action.into(),
            token: token.into(),
            user,
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AjaxResponse {
    pub success: bool,
    pub errors: Vec<String>,
    pub data: serde_json::Value,
}

impl AjaxResponse {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            data,
        }
    }

    pub fn acknowledged() -> Self {
        Self::ok(serde_json::Value::Null)
    }

    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            success: false,
            errors,
            data: serde_json::Value::Null,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::failed(vec![message.into()])
    }
}

pub type Handler = fn(&mut AdminContext, &AjaxRequest) -> AjaxResponse;

pub struct AdminRouter {
    handlers: BTreeMap<&'static str, Handler>,
}

impl AdminRouter {
    /// Build the router with the full endpoint set registered.
    pub fn new() -> Self {
        let mut router = Self {
            handlers: BTreeMap::new(),
        };
        router.register("save_form", crate::endpoints::save_form);
        router.register("delete_form", crate::endpoints::delete_form);
        router.register("hide_columns", crate::endpoints::hide_columns);
        router
    }

    pub fn register(&mut self, action: &'static str, handler: Handler) {
        self.handlers.insert(action, handler);
    }

    pub fn actions(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    pub fn dispatch(&self, context: &mut AdminContext, request: &AjaxRequest) -> AjaxResponse {
        match self.handlers.get(request.action.as_str()) {
            Some(handler) => handler(context, request),
            None => {
                warn!(action = %request.action, "unknown admin action");
                AjaxResponse::error(format!("Unknown action: {}", request.action))
            }
        }
    }
}

impl Default for AdminRouter {
    fn default() -> Self {
        Self::new()
    }
}
