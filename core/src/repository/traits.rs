use crate::error::StoreError;
use crate::model::Todo;

/// Persistence seam for the whole collection: one key, one JSON array.
/// Implementations read and write the full list atomically from the store's
/// point of view; there is no per-record access.
pub trait TodoRepository {
    /// Returns the persisted collection, or an empty one when nothing has
    /// been saved yet. A corrupt payload is a [`StoreError::Parse`].
    fn load(&self) -> Result<Vec<Todo>, StoreError>;

    /// Replaces the persisted collection.
    fn save(&self, todos: &[Todo]) -> Result<(), StoreError>;
}
