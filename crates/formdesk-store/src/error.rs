use formdesk_model::EntityId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown form: {0}")]
    UnknownForm(EntityId),
    #[error("unknown submission: {0}")]
    UnknownSubmission(EntityId),
}

pub type Result<T> = std::result::Result<T, StoreError>;
