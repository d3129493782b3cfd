//! Derived statistics, suggestions, and quick actions over the collection.
//! Everything here is a pure read of the todo slice; the UI layer decides
//! what to show and dispatches quick actions back onto the store.

use chrono::{DateTime, Datelike, Local, Utc};
use std::collections::HashMap;

use crate::categorize::categorize;
use crate::model::{Category, Todo};
use crate::score::{score_at, HIGH_PRIORITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
}

pub fn tally(todos: &[Todo]) -> Counts {
    tally_at(todos, Local::now())
}

pub fn tally_at(todos: &[Todo], now: DateTime<Local>) -> Counts {
    Counts {
        total: todos.len(),
        active: todos.iter().filter(|t| !t.completed).count(),
        completed: todos.iter().filter(|t| t.completed).count(),
        overdue: todos.iter().filter(|t| t.is_overdue_at(now)).count(),
    }
}

/// Completed share of the whole collection as a rounded percentage; 0 for an
/// empty collection.
pub fn completion_rate(todos: &[Todo]) -> u32 {
    if todos.is_empty() {
        return 0;
    }
    let completed = todos.iter().filter(|t| t.completed).count();
    ((completed as f64 / todos.len() as f64) * 100.0).round() as u32
}

/// Mean age in ceil-days of completed todos that carried a due date, i.e.
/// how long scheduled work sat in the list. `None` when there are none.
pub fn average_completion_days_at(todos: &[Todo], now: DateTime<Utc>) -> Option<i64> {
    const DAY_MS: f64 = 86_400_000.0;
    let ages: Vec<i64> = todos
        .iter()
        .filter(|t| t.completed && t.due_date.is_some())
        .map(|t| {
            let elapsed_ms = now.signed_duration_since(t.created_at).num_milliseconds();
            (elapsed_ms as f64 / DAY_MS).ceil() as i64
        })
        .collect();
    if ages.is_empty() {
        return None;
    }
    let total: i64 = ages.iter().sum();
    Some((total as f64 / ages.len() as f64).round() as i64)
}

/// Count per derived category, descending; ties keep first-seen order.
pub fn category_breakdown(todos: &[Todo]) -> Vec<(Category, usize)> {
    let mut order: Vec<Category> = Vec::new();
    let mut counts: HashMap<Category, usize> = HashMap::new();
    for todo in todos {
        let category = categorize(&todo.text);
        if !counts.contains_key(&category) {
            order.push(category);
        }
        *counts.entry(category).or_insert(0) += 1;
    }
    let mut breakdown: Vec<(Category, usize)> =
        order.into_iter().map(|c| (c, counts[&c])).collect();
    breakdown.sort_by(|a, b| b.1.cmp(&a.1));
    breakdown
}

/// Bulk operations surfaced as one-tap buttons. A tagged enum dispatched by
/// the UI through an exhaustive match; nothing is ever built from strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    ClearCompleted,
    ShowPriority,
    SortByPriority,
    ShowOverdue,
}

impl QuickAction {
    pub fn label(&self) -> &'static str {
        match self {
            QuickAction::ClearCompleted => "Clear completed",
            QuickAction::ShowPriority => "View priority",
            QuickAction::SortByPriority => "Sort by priority",
            QuickAction::ShowOverdue => "View overdue",
        }
    }
}

/// The fixed quick-action strip.
pub fn quick_actions() -> [QuickAction; 3] {
    [
        QuickAction::ClearCompleted,
        QuickAction::ShowPriority,
        QuickAction::SortByPriority,
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub message: String,
    pub action: Option<QuickAction>,
}

pub fn suggestions(todos: &[Todo]) -> Vec<Suggestion> {
    suggestions_at(todos, Local::now())
}

pub fn suggestions_at(todos: &[Todo], now: DateTime<Local>) -> Vec<Suggestion> {
    let mut out = Vec::new();

    let overdue = todos.iter().filter(|t| t.is_overdue_at(now)).count();
    if overdue > 0 {
        out.push(Suggestion {
            message: format!(
                "You have {} overdue {}. Consider rescheduling or completing them.",
                overdue,
                plural(overdue, "task", "tasks")
            ),
            action: Some(QuickAction::ShowOverdue),
        });
    }

    let high = todos
        .iter()
        .filter(|t| !t.completed && score_at(t, now) >= HIGH_PRIORITY)
        .count();
    if high > 0 {
        out.push(Suggestion {
            message: format!(
                "{} high-priority {} your attention.",
                high,
                plural(high, "task needs", "tasks need")
            ),
            action: Some(QuickAction::ShowPriority),
        });
    }

    let undated = todos
        .iter()
        .filter(|t| !t.completed && t.due_date.is_none())
        .count();
    if undated > 0 && overdue == 0 {
        out.push(Suggestion {
            message: format!(
                "{} {} without due dates. Adding dates helps with planning.",
                undated,
                plural(undated, "task", "tasks")
            ),
            action: None,
        });
    }

    if out.is_empty() {
        out.push(Suggestion {
            message: "Great job! Your tasks are well organized.".to_string(),
            action: None,
        });
    }

    out
}

/// Number of todos due on each day of the given month, for calendar badges.
/// Completion does not matter here.
pub fn due_count_by_day(todos: &[Todo], year: i32, month: u32) -> HashMap<u32, usize> {
    let mut counts = HashMap::new();
    for todo in todos {
        if let Some(due) = todo.due_date {
            if due.year() == year && due.month() == month {
                *counts.entry(due.day()).or_insert(0) += 1;
            }
        }
    }
    counts
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn todo(text: &str) -> Todo {
        Todo::new(text.to_string(), None, None)
    }

    #[test]
    fn tally_counts_overdue_among_active_only() {
        let mut overdue = todo("late one");
        overdue.due_date = Some(date(2024, 6, 10));
        let mut done_late = todo("was late, now done");
        done_late.due_date = Some(date(2024, 6, 10));
        done_late.completed = true;
        let open = todo("fresh");

        let counts = tally_at(&[overdue, done_late, open], now());
        assert_eq!(counts.total, 3);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.overdue, 1);
    }

    #[test]
    fn completion_rate_rounds() {
        let mut todos = vec![todo("a"), todo("b"), todo("c")];
        todos[0].completed = true;
        assert_eq!(completion_rate(&todos), 33);
        todos[1].completed = true;
        assert_eq!(completion_rate(&todos), 67);
        assert_eq!(completion_rate(&[]), 0);
    }

    #[test]
    fn average_completion_days_needs_dated_completed_todos() {
        let now_utc = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(average_completion_days_at(&[], now_utc), None);

        let mut a = todo("done a");
        a.completed = true;
        a.due_date = Some(date(2024, 6, 14));
        a.created_at = now_utc - chrono::Duration::days(2);
        let mut b = todo("done b");
        b.completed = true;
        b.due_date = Some(date(2024, 6, 14));
        b.created_at = now_utc - chrono::Duration::days(4);
        // Completed but undated: excluded.
        let mut c = todo("done c");
        c.completed = true;
        c.created_at = now_utc - chrono::Duration::days(40);

        assert_eq!(average_completion_days_at(&[a, b, c], now_utc), Some(3));
    }

    #[test]
    fn category_breakdown_sorts_by_count_descending() {
        let todos = vec![
            todo("team meeting"),
            todo("client call"),
            todo("water plants"),
            todo("pay tax bill"),
        ];
        let breakdown = category_breakdown(&todos);
        assert_eq!(breakdown[0], (Category::Work, 2));
        assert_eq!(breakdown.len(), 3);
        // Tie between general and finance keeps first-seen order.
        assert_eq!(breakdown[1], (Category::General, 1));
        assert_eq!(breakdown[2], (Category::Finance, 1));
    }

    #[test]
    fn suggestions_flag_overdue_and_high_priority() {
        let mut overdue = todo("pay urgent invoice");
        overdue.due_date = Some(date(2024, 6, 10));

        let got = suggestions_at(&[overdue], now());
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].action, Some(QuickAction::ShowOverdue));
        assert!(got[0].message.contains("1 overdue task"));
        assert_eq!(got[1].action, Some(QuickAction::ShowPriority));
    }

    #[test]
    fn undated_nudge_only_without_overdue_work() {
        let undated = todo("someday maybe");
        let got = suggestions_at(&[undated], now());
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].action, None);
        assert!(got[0].message.contains("without due dates"));
    }

    #[test]
    fn all_clear_message_when_nothing_to_say() {
        let mut done = todo("finished");
        done.completed = true;
        let got = suggestions_at(&[done], now());
        assert_eq!(got.len(), 1);
        assert!(got[0].message.starts_with("Great job"));
    }

    #[test]
    fn due_counts_group_by_day_within_the_month() {
        let mut a = todo("a");
        a.due_date = Some(date(2024, 6, 20));
        let mut b = todo("b");
        b.due_date = Some(date(2024, 6, 20));
        b.completed = true;
        let mut c = todo("c");
        c.due_date = Some(date(2024, 7, 20));

        let counts = due_count_by_day(&[a, b, c], 2024, 6);
        assert_eq!(counts.get(&20), Some(&2));
        assert_eq!(counts.len(), 1);
    }
}
