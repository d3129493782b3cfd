use chrono::{Datelike, Local, NaiveDate};
use todowise_core::{insights, Todo};

/// Prints a Sun-first month grid; days with due todos carry their count,
/// e.g. `15:2`.
pub fn print_month(todos: &[Todo], year: i32, month: u32) {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        println!("No such month.");
        return;
    };
    let days_in_month = match month {
        12 => NaiveDate::from_ymd_opt(year + 1, 1, 1),
        _ => NaiveDate::from_ymd_opt(year, month + 1, 1),
    }
    .map(|next| next.pred_opt().map(|d| d.day()).unwrap_or(31))
    .unwrap_or(31);

    let counts = insights::due_count_by_day(todos, year, month);
    let today = Local::now().date_naive();

    println!("{:^42}", first.format("%B %Y").to_string());
    for name in ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"] {
        print!("{name:>6}");
    }
    println!();

    let lead = first.weekday().num_days_from_sunday();
    for _ in 0..lead {
        print!("{:>6}", "");
    }

    let mut weekday = lead;
    for day in 1..=days_in_month {
        let mut cell = match counts.get(&day) {
            Some(n) => format!("{day}:{n}"),
            None => day.to_string(),
        };
        if today.year() == year && today.month() == month && today.day() == day {
            cell = format!("[{cell}]");
        }
        print!("{cell:>6}");
        weekday += 1;
        if weekday % 7 == 0 {
            println!();
        }
    }
    if weekday % 7 != 0 {
        println!();
    }

    let mut due_days: Vec<(&u32, &usize)> = counts.iter().collect();
    due_days.sort();
    for (day, count) in due_days {
        println!(
            "  {}: {} due",
            first.with_day(*day).unwrap_or(first).format("%b %-d"),
            count
        );
    }
}
