use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("could not encode notes")]
    Encode(#[source] serde_json::Error),

    #[error("write rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum CorruptionCause {
    #[error("could not read stored notes")]
    Unreadable(#[source] BlobError),

    #[error("stored notes are not valid")]
    Malformed(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("note {0} not found")]
    NotFound(Uuid),

    #[error("checklist item {item} not found in note {note}")]
    ItemNotFound { note: Uuid, item: Uuid },

    #[error("notes stored under {key:?} are corrupt")]
    StorageCorrupt {
        key: String,
        #[source]
        source: CorruptionCause,
    },

    #[error("failed to write notes under {key:?}")]
    StorageWriteFailed {
        key: String,
        #[source]
        source: BlobError,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::ItemNotFound { .. })
    }
}
