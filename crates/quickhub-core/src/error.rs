use thiserror::Error;

/// Engine-level error type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Error from the hub API client.
    #[error(transparent)]
    Api(#[from] quickhub_api::Error),

    /// A device record without an id cannot enter the snapshot.
    /// Callers catch this and skip the record.
    #[error("Invalid device record: missing id")]
    InvalidRecord,
}

impl CoreError {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(e) => e.is_transient(),
            Self::InvalidRecord => false,
        }
    }
}
