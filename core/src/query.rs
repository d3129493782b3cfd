//! Filtering and ordering of the collection for display. Session state
//! (active filter, search text, selected calendar day) arrives as an explicit
//! [`Query`] value; nothing here is ambient or mutable.

use chrono::{DateTime, Local, NaiveDate};
use std::cmp::Ordering;

use crate::model::Todo;
use crate::score::{score_at, HIGH_PRIORITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    /// Incomplete todos whose current score reaches the high band.
    Priority,
    /// Todos due on the given calendar day, regardless of completion.
    Date(NaiveDate),
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filter: Filter,
    pub search: Option<String>,
}

impl Query {
    pub fn filtered(filter: Filter) -> Self {
        Query {
            filter,
            search: None,
        }
    }
}

/// Applies search, then the status filter, then the display order, returning
/// owned copies. An empty result is a normal outcome.
pub fn select(todos: &[Todo], query: &Query) -> Vec<Todo> {
    select_at(todos, query, Local::now())
}

pub fn select_at(todos: &[Todo], query: &Query, now: DateTime<Local>) -> Vec<Todo> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut visible: Vec<Todo> = todos
        .iter()
        .filter(|t| match &needle {
            Some(q) => t.text.to_lowercase().contains(q) || t.category.as_str().contains(q.as_str()),
            None => true,
        })
        .filter(|t| match query.filter {
            Filter::All => true,
            Filter::Active => !t.completed,
            Filter::Completed => t.completed,
            Filter::Priority => !t.completed && score_at(t, now) >= HIGH_PRIORITY,
            Filter::Date(day) => t.due_date == Some(day),
        })
        .cloned()
        .collect();

    match query.filter {
        Filter::Date(_) => visible.sort_by(date_view_order),
        _ => visible.sort_by(display_order),
    }
    visible
}

/// The general display order: incomplete before completed; dated before
/// dateless; dated ascending by effective due instant; dateless newest first.
pub fn display_order(a: &Todo, b: &Todo) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => return Ordering::Less,
        (true, false) => return Ordering::Greater,
        _ => {}
    }
    match (a.effective_due_instant(), b.effective_due_instant()) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(da), Some(db)) => da.cmp(&db),
        (None, None) => b.created_at.cmp(&a.created_at),
    }
}

/// The narrower order used by the date view. The date-filtered set is
/// homogeneous in practice, so there is no dated-before-dateless step: both
/// sides need an instant for the deadline comparison to apply at all.
pub fn date_view_order(a: &Todo, b: &Todo) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => return Ordering::Less,
        (true, false) => return Ordering::Greater,
        _ => {}
    }
    if let (Some(da), Some(db)) = (a.effective_due_instant(), b.effective_due_instant()) {
        da.cmp(&db)
    } else {
        b.created_at.cmp(&a.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone, Utc};

    fn now() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
            .single()
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn todo(text: &str, created_ms: i64) -> Todo {
        let mut t = Todo::new(text.to_string(), None, None);
        t.created_at = Utc.timestamp_millis_opt(created_ms).unwrap();
        t
    }

    #[test]
    fn status_filters_partition_the_collection() {
        let mut done = todo("done one", 1);
        done.completed = true;
        let open = todo("open one", 2);
        let all = vec![done.clone(), open.clone()];

        let active = select_at(&all, &Query::filtered(Filter::Active), now());
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].text, "open one");

        let completed = select_at(&all, &Query::filtered(Filter::Completed), now());
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].text, "done one");

        assert_eq!(select_at(&all, &Query::default(), now()).len(), 2);
    }

    #[test]
    fn priority_filter_is_exactly_incomplete_high_scorers() {
        // urgent keyword (+5) + work keyword (+2) = 7: high.
        let high = todo("urgent meeting prep", 1);
        let mut high_but_done = todo("urgent meeting recap", 2);
        high_but_done.completed = true;
        let low = todo("water plants", 3);

        let all = vec![high.clone(), high_but_done, low];
        let got = select_at(&all, &Query::filtered(Filter::Priority), now());
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, high.id);
    }

    #[test]
    fn search_matches_text_and_category_before_status_filter() {
        let groceries = todo("grocery haul", 1); // category: personal
        let report = todo("write report", 2); // category: work
        let all = vec![groceries.clone(), report.clone()];

        let q = Query {
            filter: Filter::All,
            search: Some("GROCERY".to_string()),
        };
        let got = select_at(&all, &q, now());
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, groceries.id);

        // Category names are searchable too.
        let q = Query {
            filter: Filter::All,
            search: Some("work".to_string()),
        };
        let got = select_at(&all, &q, now());
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].id, report.id);
    }

    #[test]
    fn date_filter_ignores_completion_and_matches_the_day() {
        let mut due_then_done = todo("done that day", 1);
        due_then_done.completed = true;
        due_then_done.due_date = Some(date(2024, 6, 20));
        let mut due_same_day = todo("open that day", 2);
        due_same_day.due_date = Some(date(2024, 6, 20));
        let other_day = todo("unrelated", 3);

        let all = vec![due_then_done, due_same_day, other_day];
        let got = select_at(
            &all,
            &Query::filtered(Filter::Date(date(2024, 6, 20))),
            now(),
        );
        assert_eq!(got.len(), 2);
        // Incomplete first even in the date view.
        assert_eq!(got[0].text, "open that day");
        assert_eq!(got[1].text, "done that day");
    }

    #[test]
    fn display_order_puts_dated_work_first_and_sorts_by_deadline() {
        let mut due_late = todo("later deadline", 1);
        due_late.due_date = Some(date(2024, 6, 22));
        let mut due_soon = todo("sooner deadline", 2);
        due_soon.due_date = Some(date(2024, 6, 16));
        let mut due_soon_timed = todo("sooner with time", 3);
        due_soon_timed.due_date = Some(date(2024, 6, 16));
        due_soon_timed.due_time = NaiveTime::from_hms_opt(9, 0, 0);
        let dateless = todo("no deadline", 4);

        let all = vec![due_late, dateless, due_soon, due_soon_timed];
        let got = select_at(&all, &Query::default(), now());
        let texts: Vec<&str> = got.iter().map(|t| t.text.as_str()).collect();
        // 9:00 beats end-of-day on the same date; dateless goes last.
        assert_eq!(
            texts,
            vec![
                "sooner with time",
                "sooner deadline",
                "later deadline",
                "no deadline"
            ]
        );
    }

    #[test]
    fn dateless_todos_sort_by_creation_newest_first() {
        let older = todo("older", 1_000);
        let newer = todo("newer", 2_000);
        let all = vec![older, newer];
        let got = select_at(&all, &Query::default(), now());
        assert_eq!(got[0].text, "newer");
        assert_eq!(got[1].text, "older");
    }

    #[test]
    fn date_view_order_skips_the_dated_first_step() {
        let mut dated_old = todo("dated and old", 1_000);
        dated_old.due_date = Some(date(2024, 6, 20));
        let dateless_new = todo("dateless and new", 2_000);

        // General order: the dated todo wins outright.
        assert_eq!(display_order(&dated_old, &dateless_new), Ordering::Less);
        // Date-view order: with one side dateless it falls straight to
        // created-at descending, so the newer todo comes first.
        assert_eq!(date_view_order(&dated_old, &dateless_new), Ordering::Greater);
    }

    #[test]
    fn empty_result_is_a_valid_outcome() {
        let all = vec![todo("only one", 1)];
        let q = Query {
            filter: Filter::All,
            search: Some("nothing matches this".to_string()),
        };
        assert!(select_at(&all, &q, now()).is_empty());
        assert!(select_at(&[], &Query::default(), now()).is_empty());
    }
}
