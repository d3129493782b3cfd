pub mod file;
pub mod traits;

pub use file::{FileTodoRepository, STORAGE_KEY};
pub use traits::TodoRepository;
