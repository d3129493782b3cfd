use chrono::{DateTime, Local};

use crate::categorize::categorize;
use crate::model::{Category, Todo};
use crate::time::{days_until, effective_due_instant};

/// Scores at or above this are flagged high priority; this threshold also
/// drives the priority filter.
pub const HIGH_PRIORITY: u32 = 7;
pub const MEDIUM_PRIORITY: u32 = 4;

const URGENT_KEYWORDS: &[&str] = &["urgent", "asap", "important", "critical", "emergency"];

/// Display band for a score. The cutoffs are load-bearing: styling and the
/// priority filter both key off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityBand {
    High,
    Medium,
    Low,
    None,
}

impl PriorityBand {
    pub fn of(score: u32) -> PriorityBand {
        if score >= HIGH_PRIORITY {
            PriorityBand::High
        } else if score >= MEDIUM_PRIORITY {
            PriorityBand::Medium
        } else if score > 0 {
            PriorityBand::Low
        } else {
            PriorityBand::None
        }
    }
}

/// Deterministic additive score from due-date urgency, time-of-day presence,
/// category, and urgent keywords. Completion status does not enter the
/// formula; callers filter on it separately.
pub fn score(todo: &Todo) -> u32 {
    score_at(todo, Local::now())
}

pub fn score_at(todo: &Todo, now: DateTime<Local>) -> u32 {
    let mut score = 0;

    if let Some(due_date) = todo.due_date {
        let due = effective_due_instant(due_date, todo.due_time);
        let days = days_until(due, now);
        if days < 0 {
            score += 10; // overdue by a full day or more
        } else if days == 0 {
            score += 8;
        } else if days == 1 {
            score += 6;
        } else if days <= 3 {
            score += 4;
        } else if days <= 7 {
            score += 2;
        }
    }

    if todo.due_time.is_some() {
        score += 1;
    }

    if matches!(categorize(&todo.text), Category::Work | Category::Finance) {
        score += 2;
    }

    let lower = todo.text.to_lowercase();
    if URGENT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        score += 5;
    }

    score
}
