mod calendar;
mod listing;
mod tui;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use todowise_core::{
    time, Filter, FileTodoRepository, Query, StoreError, TodoPatch, TodoStore,
};

#[derive(Parser)]
#[command(name = "todowise")]
#[command(about = "A todo list that understands dates in plain text", long_about = None)]
struct Cli {
    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum FilterArg {
    #[default]
    All,
    Active,
    Completed,
    Priority,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Filter {
        match arg {
            FilterArg::All => Filter::All,
            FilterArg::Active => Filter::Active,
            FilterArg::Completed => Filter::Completed,
            FilterArg::Priority => Filter::Priority,
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a todo; dates and times in the text are picked up automatically
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
        /// Due date (YYYY-MM-DD); overrides anything found in the text
        #[arg(long)]
        due: Option<String>,
        /// Due time (HH:MM); overrides anything found in the text
        #[arg(long)]
        time: Option<String>,
    },
    /// List todos
    List {
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
        /// Only todos due on this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Substring match against text and category
        #[arg(long)]
        search: Option<String>,
    },
    /// Mark a todo as completed
    Done { id: String },
    /// Mark a todo as not completed
    Undo { id: String },
    /// Change a todo's text or schedule
    Edit {
        id: String,
        #[arg(long)]
        text: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Due time (HH:MM)
        #[arg(long)]
        time: Option<String>,
        /// Remove the due date and time
        #[arg(long)]
        clear_due: bool,
    },
    /// Delete a todo
    Rm { id: String },
    /// Delete every completed todo
    ClearCompleted,
    /// Move a todo to a new position in the list
    Move { id: String, index: usize },
    /// Reorder the stored list by priority, completed todos last
    SortPriority,
    /// Show a month of due-date counts (YYYY-MM, defaults to this month)
    Calendar { month: Option<String> },
    /// Show statistics and suggestions
    Insights,
    /// Write a backup of the whole list
    Export { path: Option<PathBuf> },
    /// Merge a backup into the list (existing ids are skipped)
    Import { path: PathBuf },
    /// Open the terminal interface
    Tui,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let repo = FileTodoRepository::new(None)?;
    let mut store = TodoStore::new(repo);
    if let Err(e) = store.load() {
        // Corrupt storage is recoverable: the store reset itself to empty.
        eprintln!("Warning: {e}; starting with an empty list");
    }
    store.on_save(|todos| log::debug!("persisted {} todo(s)", todos.len()));

    match cli.command {
        Some(Commands::Add { text, due, time }) => {
            let input = text.join(" ");
            let due = parse_due_arg(due.as_deref())?;
            let time = parse_time_arg(time.as_deref())?;
            match store.create(&input, due, time) {
                Ok(todo) => {
                    println!("Added: {} (id {})", todo.text, short_id(&todo.id));
                    if let Some(d) = todo.due_date {
                        let at = todo
                            .due_time
                            .map(|t| format!(" at {}", time::format_time_12h(t)))
                            .unwrap_or_default();
                        println!("  Due: {}{}", time::format_date_short(d), at);
                    }
                    println!("  Category: {}", todo.category);
                }
                Err(StoreError::EmptyText) => println!("Nothing to add: the text is empty."),
                Err(e) => return Err(e.into()),
            }
        }
        Some(Commands::List {
            filter,
            date,
            search,
        }) => {
            let filter = match date.as_deref() {
                Some(raw) => Filter::Date(
                    time::parse_date(raw).context("--date must be YYYY-MM-DD")?,
                ),
                None => filter.into(),
            };
            let query = Query { filter, search };
            listing::print_list(&store.select(&query));
        }
        Some(Commands::Done { id }) => {
            let id = resolve_id(&store, &id)?;
            store.set_completed(&id, true)?;
            println!("Done: {}", short_id(&id));
        }
        Some(Commands::Undo { id }) => {
            let id = resolve_id(&store, &id)?;
            store.set_completed(&id, false)?;
            println!("Reopened: {}", short_id(&id));
        }
        Some(Commands::Edit {
            id,
            text,
            due,
            time,
            clear_due,
        }) => {
            let id = resolve_id(&store, &id)?;
            let patch = TodoPatch {
                text,
                due_date: parse_due_arg(due.as_deref())?,
                due_time: parse_time_arg(time.as_deref())?,
                clear_due,
            };
            match store.edit(&id, patch) {
                Ok(()) => println!("Updated: {}", short_id(&id)),
                Err(StoreError::EmptyText) => {
                    println!("Not updated: the text cannot be empty.")
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(Commands::Rm { id }) => {
            let id = resolve_id(&store, &id)?;
            store.delete(&id)?;
            println!("Deleted: {}", short_id(&id));
        }
        Some(Commands::ClearCompleted) => {
            let removed = store.clear_completed()?;
            println!("Removed {removed} completed todo(s).");
        }
        Some(Commands::Move { id, index }) => {
            let id = resolve_id(&store, &id)?;
            store.reorder(&id, index)?;
            println!("Moved {} to position {index}.", short_id(&id));
        }
        Some(Commands::SortPriority) => {
            store.sort_by_priority()?;
            println!("Sorted {} todo(s) by priority.", store.len());
        }
        Some(Commands::Calendar { month }) => {
            let (year, month) = match month.as_deref() {
                Some(raw) => parse_month_arg(raw)?,
                None => {
                    let today = Local::now().date_naive();
                    (today.year(), today.month())
                }
            };
            calendar::print_month(store.todos(), year, month);
        }
        Some(Commands::Insights) => {
            listing::print_insights(store.todos());
        }
        Some(Commands::Export { path }) => {
            let path = path.unwrap_or_else(|| {
                PathBuf::from(TodoStore::<FileTodoRepository>::export_filename(
                    Local::now().date_naive(),
                ))
            });
            fs::write(&path, store.export_json()?)
                .with_context(|| format!("could not write {}", path.display()))?;
            println!("Exported {} todo(s) to {}", store.len(), path.display());
        }
        Some(Commands::Import { path }) => {
            let payload = fs::read_to_string(&path)
                .with_context(|| format!("could not read {}", path.display()))?;
            match store.import_json(&payload) {
                Ok(added) => println!("Imported {added} new todo(s)."),
                Err(StoreError::ImportFormat) => {
                    bail!("{} is not a todo backup (expected a JSON array)", path.display())
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(Commands::Tui) | None => {
            tui::run(store)?;
        }
    }
    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn parse_due_arg(raw: Option<&str>) -> Result<Option<chrono::NaiveDate>> {
    raw.map(|s| time::parse_date(s).context("--due must be YYYY-MM-DD"))
        .transpose()
}

fn parse_time_arg(raw: Option<&str>) -> Result<Option<chrono::NaiveTime>> {
    raw.map(|s| time::parse_time(s).context("--time must be HH:MM (24-hour)"))
        .transpose()
}

fn parse_month_arg(raw: &str) -> Result<(i32, u32)> {
    let parsed = (|| {
        let (y, m) = raw.split_once('-')?;
        let year: i32 = y.parse().ok()?;
        let month: u32 = m.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    })();
    match parsed {
        Some(ym) => Ok(ym),
        None => bail!("month must be YYYY-MM"),
    }
}

/// Ids are long uuids; commands accept any unique prefix.
fn resolve_id(store: &TodoStore<FileTodoRepository>, prefix: &str) -> Result<String> {
    if let Some(todo) = store.get(prefix) {
        return Ok(todo.id.clone());
    }
    let matches: Vec<&str> = store
        .todos()
        .iter()
        .filter(|t| t.id.starts_with(prefix))
        .map(|t| t.id.as_str())
        .collect();
    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => bail!("no todo with id '{prefix}'"),
        n => bail!("id '{prefix}' is ambiguous ({n} matches)"),
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    if id.len() > 8 {
        &id[..8]
    } else {
        id
    }
}
