pub mod todo;

pub use todo::{Category, Todo, TodoPatch};
