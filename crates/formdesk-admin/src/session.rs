//! Acting principal and the request-scoped security token.

use formdesk_store::UserId;

/// The admin user driving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub can_edit_submissions: bool,
}

impl Principal {
    pub fn editor(user_id: UserId) -> Self {
        Self {
            user_id,
            can_edit_submissions: true,
        }
    }

    pub fn viewer(user_id: UserId) -> Self {
        Self {
            user_id,
            can_edit_submissions: false,
        }
    }
}

/// Request-scoped token every mutating endpoint must present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityToken(String);

impl SecurityToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn verify(&self, presented: &str) -> bool {
        self.0 == presented
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}
