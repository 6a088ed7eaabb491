//! Standardized confirmation modal.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

/// A standardized confirmation modal.
///
/// Enter/`y` confirms, Esc/`n` cancels. Both delete operations route through
/// this modal; declining leaves the table state unchanged.
///
/// # Example
///
/// ```ignore
/// app.confirm = Some((
///     ConfirmModal::new("Do you want to delete the selected rows?").title("Delete selected"),
///     PendingDelete::Selected,
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmModal {
    title: String,
    message: String,
}

impl ConfirmModal {
    /// Creates a new confirmation modal with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Confirm".into(),
            message: message.into(),
        }
    }

    /// Sets a custom title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Maps a key press to a decision: `Some(true)` to confirm,
    /// `Some(false)` to cancel, `None` for keys the modal ignores.
    pub fn decision(key: KeyEvent) -> Option<bool> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => Some(true),
            KeyCode::Esc | KeyCode::Char('n') => Some(false),
            _ => None,
        }
    }

    /// Renders the modal as a popup over the given area.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Clear, area);
        let body = Paragraph::new(vec![
            Line::from(self.message.as_str()),
            Line::from(""),
            Line::from("[Enter/y] Ok    [Esc/n] Cancel"),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(self.title.as_str())
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(body, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_and_y_confirm() {
        assert_eq!(ConfirmModal::decision(key(KeyCode::Enter)), Some(true));
        assert_eq!(ConfirmModal::decision(key(KeyCode::Char('y'))), Some(true));
    }

    #[test]
    fn esc_and_n_cancel() {
        assert_eq!(ConfirmModal::decision(key(KeyCode::Esc)), Some(false));
        assert_eq!(ConfirmModal::decision(key(KeyCode::Char('n'))), Some(false));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(ConfirmModal::decision(key(KeyCode::Char('x'))), None);
        assert_eq!(ConfirmModal::decision(key(KeyCode::Up)), None);
    }
}
