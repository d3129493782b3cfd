use ratatui::widgets::TableState;
use todowise_core::{Filter, FileTodoRepository, Query, StoreError, Todo, TodoStore};

pub enum InputMode {
    Normal,
    Adding,
    Searching,
}

pub struct App {
    pub store: TodoStore<FileTodoRepository>,
    pub visible: Vec<Todo>,
    pub state: TableState,
    pub filter: Filter,
    pub search: String,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
}

impl App {
    pub fn new(store: TodoStore<FileTodoRepository>) -> App {
        let mut app = App {
            store,
            visible: Vec::new(),
            state: TableState::default(),
            filter: Filter::All,
            search: String::new(),
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
        };
        app.refresh();
        if !app.visible.is_empty() {
            app.state.select(Some(0));
        }
        app
    }

    /// Re-runs the current query against the store and keeps the selection
    /// inside bounds.
    pub fn refresh(&mut self) {
        let query = Query {
            filter: self.filter,
            search: if self.search.is_empty() {
                None
            } else {
                Some(self.search.clone())
            },
        };
        self.visible = self.store.select(&query);
        match self.state.selected() {
            Some(_) if self.visible.is_empty() => self.state.select(None),
            Some(i) if i >= self.visible.len() => {
                self.state.select(Some(self.visible.len() - 1));
            }
            None if !self.visible.is_empty() => self.state.select(Some(0)),
            _ => {}
        }
    }

    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.visible.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::Priority,
            Filter::Priority | Filter::Date(_) => Filter::All,
        };
        self.refresh();
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let result = self.store.toggle(&id);
            self.report(result.err());
            self.refresh();
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let result = self.store.delete(&id);
            self.report(result.err());
            self.refresh();
        }
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.refresh();
    }

    fn selected_id(&self) -> Option<String> {
        self.state
            .selected()
            .and_then(|i| self.visible.get(i))
            .map(|t| t.id.clone())
    }

    fn report(&mut self, error: Option<StoreError>) {
        if let Some(e) = error {
            self.status = Some(e.to_string());
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input = self.search.clone();
        self.cursor_position = self.input.chars().count();
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self
            .input
            .chars()
            .take(self.cursor_position)
            .map(|c| c.len_utf8())
            .sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn submit_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => {
                match self.store.create(&self.input, None, None) {
                    Ok(todo) => {
                        self.status = Some(format!("Added: {}", todo.text));
                    }
                    Err(StoreError::EmptyText) => {
                        self.status = Some("Nothing added: text was empty".to_string());
                    }
                    Err(e) => self.status = Some(e.to_string()),
                }
                self.refresh();
            }
            InputMode::Searching => {
                self.search = self.input.trim().to_string();
                self.refresh();
            }
            InputMode::Normal => {}
        }
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }
}
