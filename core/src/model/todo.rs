use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::categorize::categorize;
use crate::score;
use crate::time;

/// One label from the fixed keyword-derived set, assigned automatically from
/// the task text. Serialized as its lowercase name; anything unrecognized in
/// a legacy payload falls back to `General` instead of poisoning the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Work,
    Personal,
    Health,
    Home,
    Social,
    Finance,
    Learning,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Home => "home",
            Category::Social => "social",
            Category::Finance => "finance",
            Category::Learning => "learning",
            Category::General => "general",
        }
    }

    pub fn from_name(name: &str) -> Category {
        match name {
            "work" => Category::Work,
            "personal" => Category::Personal,
            "health" => Category::Health,
            "home" => Category::Home,
            "social" => Category::Social,
            "finance" => Category::Finance,
            "learning" => Category::Learning,
            _ => Category::General,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Category::from_name(&name))
    }
}

/// The sole persisted entity. The serialized shape is the storage wire format
/// and must stay compatible with previously saved data: camelCase keys,
/// `YYYY-MM-DD` / `HH:MM` strings or null for the due fields, epoch
/// milliseconds for `createdAt`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    // Legacy records may lack createdAt; back-fill to the load instant.
    #[serde(with = "chrono::serde::ts_milliseconds", default = "time::now_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, with = "hm_option")]
    pub due_time: Option<NaiveTime>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: u32,
}

impl Todo {
    /// Builds a fresh entity with derived fields already computed. The text
    /// is stored as given; validation and extraction are the store's job.
    pub fn new(text: String, due_date: Option<NaiveDate>, due_time: Option<NaiveTime>) -> Self {
        let mut todo = Self {
            id: Uuid::new_v4().to_string(),
            text,
            completed: false,
            created_at: time::now_ms(),
            due_date,
            due_time,
            category: Category::General,
            priority: 0,
        };
        todo.refresh_derived(Local::now());
        todo
    }

    /// Recomputes the category and priority from the current fields.
    pub(crate) fn refresh_derived(&mut self, now: DateTime<Local>) {
        self.category = categorize(&self.text);
        self.priority = score::score_at(self, now);
    }

    /// The deadline as an instant, when a due date is set: date + time, or
    /// the end of the due day when no time is given.
    pub fn effective_due_instant(&self) -> Option<DateTime<Local>> {
        self.due_date
            .map(|d| time::effective_due_instant(d, self.due_time))
    }

    pub fn is_overdue_at(&self, now: DateTime<Local>) -> bool {
        !self.completed
            && self
                .effective_due_instant()
                .map(|due| due < now)
                .unwrap_or(false)
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Local::now())
    }
}

/// Field updates for `TodoStore::edit`. `None` leaves a field unchanged;
/// `clear_due` wipes both due fields regardless of the other arguments.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub clear_due: bool,
}

mod hm_option {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::time::TIME_FORMAT;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format(TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) => NaiveTime::parse_from_str(&s, TIME_FORMAT)
                .map(Some)
                .map_err(D::Error::custom),
        }
    }
}
