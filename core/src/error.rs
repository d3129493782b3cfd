use thiserror::Error;

/// Everything that can go wrong inside the store and its persistence layer.
///
/// `EmptyText` and `ImportFormat` are user-recoverable: the operation was a
/// no-op and the collection is unchanged. `Parse` means the persisted payload
/// was unreadable and the store reset itself to an empty collection. `Storage`
/// means a write failed; the in-memory collection is still authoritative for
/// the session but not durable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo text cannot be empty")]
    EmptyText,

    #[error("stored todo list is corrupt: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to access todo storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("import payload must be a JSON array of todo records")]
    ImportFormat,
}
