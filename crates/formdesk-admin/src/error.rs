use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("store error: {0}")]
    Store(#[from] formdesk_store::StoreError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;
