use thiserror::Error;

/// Errors surfaced by the persistence core.
///
/// `MalformedIdentifier` is indistinguishable from `NotFound` at the HTTP
/// boundary (both map to 404); it exists as its own variant so the resolver
/// can report *why* nothing matched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("malformed identifier: {0:?}")]
    MalformedIdentifier(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the error should surface as a 404 rather than a 500.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound | StoreError::MalformedIdentifier(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(e: r2d2::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
