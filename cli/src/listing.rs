use tabled::settings::Style;
use tabled::{Table, Tabled};
use todowise_core::{insights, time, PriorityBand, QuickAction, Todo};

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "St")]
    status: String,
    #[tabled(rename = "Pri")]
    priority: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Task")]
    text: String,
}

pub fn print_list(todos: &[Todo]) {
    if todos.is_empty() {
        println!("No todos match.");
        return;
    }
    let rows: Vec<TodoRow> = todos.iter().map(row).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
}

fn row(todo: &Todo) -> TodoRow {
    let status = if todo.completed {
        "x"
    } else if todo.is_overdue() {
        "!"
    } else {
        " "
    };
    let priority = match PriorityBand::of(todo.priority) {
        PriorityBand::High => format!("high ({})", todo.priority),
        PriorityBand::Medium => format!("med ({})", todo.priority),
        PriorityBand::Low => format!("low ({})", todo.priority),
        PriorityBand::None => "-".to_string(),
    };
    let due = match todo.due_date {
        Some(d) => {
            let at = todo
                .due_time
                .map(|t| format!(" {}", time::format_time(t)))
                .unwrap_or_default();
            format!("{}{}", time::format_date(d), at)
        }
        None => "-".to_string(),
    };
    TodoRow {
        id: crate::short_id(&todo.id).to_string(),
        status: status.to_string(),
        priority,
        due,
        category: todo.category.to_string(),
        text: todo.text.clone(),
    }
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Todos")]
    count: usize,
}

pub fn print_insights(todos: &[Todo]) {
    let counts = insights::tally(todos);
    println!(
        "{} total / {} active / {} completed / {} overdue",
        counts.total, counts.active, counts.completed, counts.overdue
    );
    println!("Completion rate: {}%", insights::completion_rate(todos));
    match insights::average_completion_days_at(todos, chrono::Utc::now()) {
        Some(1) => println!("Avg completion: 1 day"),
        Some(days) => println!("Avg completion: {days} days"),
        None => println!("Avg completion: n/a"),
    }

    let breakdown = insights::category_breakdown(todos);
    if !breakdown.is_empty() {
        let rows: Vec<CategoryRow> = breakdown
            .into_iter()
            .map(|(category, count)| CategoryRow {
                category: category.to_string(),
                count,
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::psql());
        println!("\n{table}");
    }

    println!();
    for suggestion in insights::suggestions(todos) {
        match suggestion.action {
            Some(action) => println!("- {} [{}]", suggestion.message, action.label()),
            None => println!("- {}", suggestion.message),
        }
    }

    let commands: Vec<&str> = insights::quick_actions()
        .iter()
        .map(quick_action_command)
        .collect();
    println!("\nQuick actions: {}", commands.join(" | "));
}

fn quick_action_command(action: &QuickAction) -> &'static str {
    match action {
        QuickAction::ClearCompleted => "todowise clear-completed",
        QuickAction::ShowPriority => "todowise list --filter priority",
        QuickAction::SortByPriority => "todowise sort-priority",
        QuickAction::ShowOverdue => "todowise insights",
    }
}
