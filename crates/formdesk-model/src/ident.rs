//! Entity identifiers.
//!
//! Builder clients assign placeholder ids (`tmp_*` strings) to entities
//! that have never been persisted. A placeholder is replaced by a durable
//! numeric id exactly once, at save time, and the old→new mapping is
//! reported back so the client can rewrite its local references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Durable identifier assigned by the store.
pub type EntityId = u64;

/// An id as carried by a save payload: durable, or a client placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    Durable(EntityId),
    Temporary(String),
}

impl EntityRef {
    pub fn is_temporary(&self) -> bool {
        matches!(self, EntityRef::Temporary(_))
    }

    /// The placeholder marker, when this ref is still unpersisted.
    pub fn temporary_marker(&self) -> Option<&str> {
        match self {
            EntityRef::Temporary(marker) => Some(marker),
            EntityRef::Durable(_) => None,
        }
    }

    pub fn durable(&self) -> Option<EntityId> {
        match self {
            EntityRef::Durable(id) => Some(*id),
            EntityRef::Temporary(_) => None,
        }
    }
}

impl From<EntityId> for EntityRef {
    fn from(id: EntityId) -> Self {
        EntityRef::Durable(id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Durable(id) => write!(f, "{id}"),
            EntityRef::Temporary(marker) => write!(f, "{marker}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_number_as_durable() {
        let id: EntityRef = serde_json::from_str("42").expect("parse durable");
        assert_eq!(id, EntityRef::Durable(42));
        assert!(!id.is_temporary());
    }

    #[test]
    fn deserializes_string_as_temporary() {
        let id: EntityRef = serde_json::from_str("\"tmp_1\"").expect("parse temporary");
        assert_eq!(id.temporary_marker(), Some("tmp_1"));
        assert_eq!(id.durable(), None);
    }
}
