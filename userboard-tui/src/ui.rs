//! Frame rendering.
//!
//! Pure projection of [`App`] state onto the frame: a filter bar, the user
//! table, a status line, and the confirmation popup when one is open.

use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Cell;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Row;
use ratatui::widgets::Table;
use userboard_lib::UserRecord;

use crate::app::App;
use crate::app::EditField;
use crate::app::Focus;
use crate::app::ROLE_CHOICES;

pub fn render(frame: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_filter_bar(frame, app, layout[0]);
    render_table(frame, app, layout[1]);
    render_status(frame, app, layout[2]);

    if let Some((modal, _)) = &app.confirm {
        modal.render(frame, centered_rect(50, 30, frame.area()));
    }
}

fn render_filter_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(area);

    let name = Paragraph::new(app.board.name_filter()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Filter by Name")
            .border_style(focus_style(app.focus == Focus::NameFilter)),
    );
    frame.render_widget(name, chunks[0]);

    let email = Paragraph::new(app.board.email_filter()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Filter by Email")
            .border_style(focus_style(app.focus == Focus::EmailFilter)),
    );
    frame.render_widget(email, chunks[1]);

    let mut spans = Vec::new();
    for (index, role) in ROLE_CHOICES.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::raw(checkbox(app.board.role_filter_active(role))));
        spans.push(Span::raw(format!(" {role} [{}]", index + 1)));
    }
    let roles = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Filter by Role"),
    );
    frame.render_widget(roles, chunks[2]);
}

fn render_table(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let header = Row::new([
        Cell::from(checkbox(app.board.all_selected())),
        Cell::from("ID"),
        Cell::from("Name"),
        Cell::from("Email"),
        Cell::from("Role"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .board
        .page_users()
        .enumerate()
        .map(|(index, user)| user_row(app, index, user))
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Percentage(28),
        Constraint::Percentage(42),
        Constraint::Percentage(18),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Users")
            .border_style(focus_style(app.focus == Focus::Table)),
    );
    frame.render_widget(table, area);
}

fn user_row<'a>(app: &'a App, index: usize, user: &'a UserRecord) -> Row<'a> {
    let editing = app.board.editing_id() == Some(user.id);

    let field_cells: Vec<Cell> = match app.board.draft() {
        Some(draft) if editing => [
            (EditField::Name, draft.name.as_str()),
            (EditField::Email, draft.email.as_str()),
            (EditField::Role, draft.role.as_str()),
        ]
        .into_iter()
        .map(|(field, value)| {
            let style = if field == app.edit_field {
                Style::default().add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default()
            };
            Cell::from(Span::styled(value.to_owned(), style))
        })
        .collect(),
        _ => vec![
            Cell::from(user.name.as_str()),
            Cell::from(user.email.as_str()),
            Cell::from(user.role.as_str()),
        ],
    };

    let mut cells = vec![
        Cell::from(checkbox(app.board.is_selected(user.id))),
        Cell::from(user.id.to_string()),
    ];
    cells.extend(field_cells);

    let mut style = Style::default();
    if app.board.is_selected(user.id) {
        style = style.fg(Color::Cyan);
    }
    if editing {
        style = style.fg(Color::Yellow);
    }
    if index == app.cursor && app.focus == Focus::Table {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Row::new(cells).style(style)
}

fn render_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status = if app.loading {
        "Loading members...".to_owned()
    } else if app.board.editing_id().is_some() {
        "Editing: type to change field | tab next field | enter save | esc cancel".to_owned()
    } else {
        format!(
            "{} rows ({} total) | page {}/{} | {} selected",
            app.board.filtered_len(),
            app.board.users().len(),
            app.board.current_page(),
            app.board.page_count(),
            app.board.selected_count(),
        )
    };
    let help = "tab filters | 1/2 roles | c clear | space select | a all | e edit | d/D delete | \u{2190}\u{2192} page | home/end first/last | q quit";

    let widget = Paragraph::new(vec![
        Line::from(Span::styled(status, Style::default().fg(Color::Yellow))),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ]);
    frame.render_widget(widget, area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
