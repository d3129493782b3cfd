pub mod categorize;
pub mod error;
pub mod extract;
pub mod insights;
pub mod model;
pub mod query;
pub mod repository;
pub mod score;
pub mod store;
pub mod time;

pub use categorize::categorize;
pub use error::StoreError;
pub use extract::{extract, extract_at, Extraction};
pub use insights::{Counts, QuickAction, Suggestion};
pub use model::{Category, Todo, TodoPatch};
pub use query::{select, Filter, Query};
pub use repository::{FileTodoRepository, TodoRepository, STORAGE_KEY};
pub use score::{score, PriorityBand, HIGH_PRIORITY};
pub use store::TodoStore;
