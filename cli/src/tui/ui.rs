use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
    Frame,
};
use todowise_core::{insights, time, Filter, PriorityBand};

use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // List
            Constraint::Length(3), // Input / status
            Constraint::Length(1), // Help
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);
    draw_todo_list(f, app, main_chunks[1]);
    draw_input_line(f, app, main_chunks[2]);

    let help = match app.input_mode {
        InputMode::Normal => {
            "j/k: navigate | space: toggle | a: add | d: delete | f: filter | /: search | c: clear search | q: quit"
        }
        InputMode::Adding | InputMode::Searching => "Enter: submit | Esc: cancel",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn filter_name(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "all",
        Filter::Active => "active",
        Filter::Completed => "completed",
        Filter::Priority => "priority",
        Filter::Date(_) => "date",
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let counts = insights::tally(app.store.todos());
    let mut title = format!(
        "TODOWISE — {} active / {} done / {} overdue — filter: {}",
        counts.active,
        counts.completed,
        counts.overdue,
        filter_name(app.filter)
    );
    if !app.search.is_empty() {
        title.push_str(&format!(" — search: {}", app.search));
    }
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(header, area);
}

fn draw_todo_list(f: &mut Frame, app: &mut App, area: Rect) {
    if app.visible.is_empty() {
        let empty = Paragraph::new("Nothing here. Press 'a' to add a todo.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Todos ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            );
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .visible
        .iter()
        .map(|todo| {
            let status_icon = if todo.completed {
                "✔"
            } else if todo.is_overdue() {
                "⚠"
            } else {
                "☐"
            };

            let (band_str, band_style) = match PriorityBand::of(todo.priority) {
                PriorityBand::High => ("H", Style::default().fg(Color::Red)),
                PriorityBand::Medium => ("M", Style::default().fg(Color::Yellow)),
                PriorityBand::Low => ("L", Style::default().fg(Color::Green)),
                PriorityBand::None => ("-", Style::default().fg(Color::DarkGray)),
            };

            let due_str = match todo.due_date {
                Some(d) => {
                    let at = todo
                        .due_time
                        .map(|t| format!(" {}", time::format_time(t)))
                        .unwrap_or_default();
                    format!("{}{}", d.format("%m-%d"), at)
                }
                None => "-".to_string(),
            };

            let text_style = if todo.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };

            Row::new(vec![
                Span::raw(status_icon),
                Span::styled(band_str, band_style),
                Span::raw(due_str),
                Span::raw(todo.category.to_string()),
                Span::styled(todo.text.clone(), text_style),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),  // Status
            Constraint::Length(3),  // Priority band
            Constraint::Length(12), // Due
            Constraint::Length(9),  // Category
            Constraint::Min(10),    // Text
        ],
    )
    .header(
        Row::new(vec!["St", "Pr", "Due", "Category", "Task"])
            .style(Style::default().fg(Color::Yellow)),
    )
    .block(
        Block::default()
            .title(" Todos ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn draw_input_line(f: &mut Frame, app: &App, area: Rect) {
    let (title, content, style) = match app.input_mode {
        InputMode::Adding => (
            " New todo (dates in the text are picked up) ",
            app.input.as_str(),
            Style::default().fg(Color::Green),
        ),
        InputMode::Searching => (
            " Search ",
            app.input.as_str(),
            Style::default().fg(Color::Green),
        ),
        InputMode::Normal => (
            " Status ",
            app.status.as_deref().unwrap_or(""),
            Style::default().fg(Color::DarkGray),
        ),
    };
    let input = Paragraph::new(content).style(style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(input, area);

    if matches!(app.input_mode, InputMode::Adding | InputMode::Searching) {
        f.set_cursor_position((area.x + 1 + app.cursor_position as u16, area.y + 1));
    }
}
