use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use log::debug;

use crate::error::StoreError;
use crate::model::Todo;
use crate::repository::traits::TodoRepository;

/// The storage key the collection lives under. Kept stable so previously
/// saved data keeps loading.
pub const STORAGE_KEY: &str = "todos";

const DEFAULT_DIR: &str = ".todowise";

/// File-backed repository: the whole collection as one JSON array under
/// `<base>/todos.json`.
#[derive(Clone)]
pub struct FileTodoRepository {
    file_path: PathBuf,
}

impl FileTodoRepository {
    /// Opens (and creates if needed) the storage directory. `base_dir`
    /// defaults to `~/.todowise`; tests inject a temp dir.
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir().ok_or_else(|| {
                    StoreError::Storage(std::io::Error::new(
                        ErrorKind::NotFound,
                        "could not determine home directory",
                    ))
                })?;
                home_dir.join(DEFAULT_DIR)
            }
        };
        fs::create_dir_all(&path)?;
        path.push(format!("{STORAGE_KEY}.json"));
        debug!("todo storage at {}", path.display());
        Ok(FileTodoRepository { file_path: path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.file_path
    }
}

impl TodoRepository for FileTodoRepository {
    fn load(&self) -> Result<Vec<Todo>, StoreError> {
        let file = match File::open(&self.file_path) {
            Ok(f) => f,
            // Nothing saved yet is not an error.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Storage(e)),
        };
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(StoreError::Parse)
    }

    fn save(&self, todos: &[Todo]) -> Result<(), StoreError> {
        let file = File::create(&self.file_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, todos)
            .map_err(|e| StoreError::Storage(std::io::Error::other(e)))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTodoRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn collection_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTodoRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let todos = vec![
            Todo::new("first".to_string(), None, None),
            Todo::new(
                "second".to_string(),
                crate::time::parse_date("2030-01-02").ok(),
                crate::time::parse_time("08:15").ok(),
            ),
        ];
        repo.save(&todos).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded, todos);
    }

    #[test]
    fn corrupt_payload_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTodoRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.path(), "{ not json").unwrap();
        assert!(matches!(repo.load(), Err(StoreError::Parse(_))));
    }

    #[test]
    fn storage_file_is_named_after_the_stable_key() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTodoRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert!(repo.path().ends_with("todos.json"));
    }
}
