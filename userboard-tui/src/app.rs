//! Application state and event loop.
//!
//! The [`App`] owns the table-state controller plus the presentation-only
//! state (focus, row cursor, pending confirmation). Keystrokes are dispatched
//! one at a time from the terminal loop; the startup fetch is the only
//! asynchronous step and is polled from the same loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::oneshot;
use userboard_lib::ApiError;
use userboard_lib::EditDraft;
use userboard_lib::UserBoard;
use userboard_lib::UserRecord;

use crate::modals::ConfirmModal;
use crate::ui;

/// Tick interval for polling input and the fetch channel.
const TICK: Duration = Duration::from_millis(200);

/// The two roles offered as filter checkboxes. Role values on records stay
/// free text; only the filter surface is fixed.
pub const ROLE_CHOICES: [&str; 2] = ["admin", "member"];

type FetchResult = Result<Vec<UserRecord>, ApiError>;

/// Which widget keystrokes are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    NameFilter,
    EmailFilter,
}

/// Which draft field keystrokes are routed to while a row is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Name,
    Email,
    Role,
}

impl EditField {
    fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Email,
            EditField::Email => EditField::Role,
            EditField::Role => EditField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            EditField::Name => EditField::Role,
            EditField::Email => EditField::Name,
            EditField::Role => EditField::Email,
        }
    }
}

/// A delete operation waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    /// Delete one row.
    One { id: u64 },
    /// Delete every checked row.
    Selected,
}

/// Top-level application state.
pub struct App {
    /// The table-state controller; all table semantics live there.
    pub board: UserBoard,
    pub focus: Focus,
    pub edit_field: EditField,
    /// Highlighted row, as an offset within the current page.
    pub cursor: usize,
    /// True until the startup fetch resolves one way or the other.
    pub loading: bool,
    /// Confirmation modal plus the delete it guards.
    pub confirm: Option<(ConfirmModal, PendingDelete)>,
    fetch: Option<oneshot::Receiver<FetchResult>>,
}

impl App {
    /// Creates the app in its pre-load state, waiting on the fetch channel.
    pub fn new(fetch: oneshot::Receiver<FetchResult>) -> Self {
        Self {
            board: UserBoard::new(),
            focus: Focus::default(),
            edit_field: EditField::default(),
            cursor: 0,
            loading: true,
            confirm: None,
            fetch: Some(fetch),
        }
    }

    #[cfg(test)]
    fn with_users(users: Vec<UserRecord>) -> Self {
        let mut board = UserBoard::new();
        board.load(users);
        Self {
            board,
            focus: Focus::default(),
            edit_field: EditField::default(),
            cursor: 0,
            loading: false,
            confirm: None,
            fetch: None,
        }
    }

    /// Polls the startup fetch without blocking.
    ///
    /// On failure the error is logged and swallowed: the table simply stays
    /// empty, matching the load policy of keeping prior state with no
    /// user-visible error surface.
    pub fn poll_fetch(&mut self) {
        let Some(rx) = self.fetch.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(users)) => {
                log::info!("Loaded {} users", users.len());
                self.board.load(users);
                self.cursor = 0;
                self.loading = false;
                self.fetch = None;
            }
            Ok(Err(e)) => {
                log::error!("Error fetching data: {e}");
                self.loading = false;
                self.fetch = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                log::error!("Fetch task dropped its channel");
                self.loading = false;
                self.fetch = None;
            }
        }
    }

    /// Number of rows on the current page.
    pub fn page_len(&self) -> usize {
        self.board.page_users().count()
    }

    /// The record under the cursor, if the page is non-empty.
    pub fn cursor_user(&self) -> Option<&UserRecord> {
        self.board.page_users().nth(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        let len = self.page_len();
        self.cursor = if len == 0 { 0 } else { self.cursor.min(len - 1) };
    }
}

/// Sets up the terminal, runs the event loop, and restores the terminal.
pub fn run(fetch: oneshot::Receiver<FetchResult>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(fetch);
    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.poll_fetch();
        terminal.draw(|frame| ui::render(frame, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if handle_key(app, key) {
                    return Ok(());
                }
            }
            Event::Resize(_, _) => {}
            _ => {}
        }
    }
}

/// Dispatches one key press. Returns `true` when the app should quit.
///
/// Routing order: quit chord, then an open confirmation modal, then an
/// active edit draft, then the focused widget.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if app.confirm.is_some() {
        handle_confirm_key(app, key);
        return false;
    }
    if app.board.editing_id().is_some() {
        handle_edit_key(app, key);
        return false;
    }
    match app.focus {
        Focus::Table => handle_table_key(app, key),
        Focus::NameFilter | Focus::EmailFilter => {
            handle_filter_key(app, key);
            false
        }
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match ConfirmModal::decision(key) {
        Some(true) => {
            if let Some((_, pending)) = app.confirm.take() {
                match pending {
                    PendingDelete::One { id } => {
                        app.board.delete_one(id);
                    }
                    PendingDelete::Selected => {
                        let removed = app.board.delete_selected();
                        log::debug!("Deleted {removed} selected rows");
                    }
                }
                app.clamp_cursor();
            }
        }
        Some(false) => app.confirm = None,
        None => {}
    }
}

fn handle_edit_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.board.commit_edit();
        }
        KeyCode::Esc => {
            // begin_edit on the row being edited toggles the draft off.
            if let Some(id) = app.board.editing_id() {
                app.board.begin_edit(id);
            }
        }
        KeyCode::Tab => app.edit_field = app.edit_field.next(),
        KeyCode::BackTab => app.edit_field = app.edit_field.prev(),
        KeyCode::Char(c) => {
            if let Some(draft) = app.board.draft_mut() {
                draft_field_mut(draft, app.edit_field).push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(draft) = app.board.draft_mut() {
                draft_field_mut(draft, app.edit_field).pop();
            }
        }
        _ => {}
    }
}

fn draft_field_mut(draft: &mut EditDraft, field: EditField) -> &mut String {
    match field {
        EditField::Name => &mut draft.name,
        EditField::Email => &mut draft.email,
        EditField::Role => &mut draft.role,
    }
}

fn handle_filter_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.focus = Focus::Table,
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::NameFilter => Focus::EmailFilter,
                _ => Focus::Table,
            };
        }
        KeyCode::Char(c) => {
            match app.focus {
                Focus::NameFilter => {
                    let mut filter = app.board.name_filter().to_owned();
                    filter.push(c);
                    app.board.set_name_filter(filter);
                }
                Focus::EmailFilter => {
                    let mut filter = app.board.email_filter().to_owned();
                    filter.push(c);
                    app.board.set_email_filter(filter);
                }
                Focus::Table => {}
            }
            app.clamp_cursor();
        }
        KeyCode::Backspace => {
            match app.focus {
                Focus::NameFilter => {
                    let mut filter = app.board.name_filter().to_owned();
                    filter.pop();
                    app.board.set_name_filter(filter);
                }
                Focus::EmailFilter => {
                    let mut filter = app.board.email_filter().to_owned();
                    filter.pop();
                    app.board.set_email_filter(filter);
                }
                Focus::Table => {}
            }
            app.clamp_cursor();
        }
        _ => {}
    }
}

fn handle_table_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Tab | KeyCode::Char('/') => app.focus = Focus::NameFilter,
        KeyCode::Up | KeyCode::Char('k') => app.cursor = app.cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => {
            app.cursor += 1;
            app.clamp_cursor();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.board.prev_page();
            app.clamp_cursor();
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.board.next_page();
            app.clamp_cursor();
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.board.first_page();
            app.clamp_cursor();
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.board.last_page();
            app.clamp_cursor();
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.cursor_user().map(|user| user.id) {
                app.board.toggle_select_row(id);
            }
        }
        KeyCode::Char('a') => app.board.toggle_select_all(),
        KeyCode::Char('1') => {
            app.board.toggle_role_filter(ROLE_CHOICES[0]);
            app.clamp_cursor();
        }
        KeyCode::Char('2') => {
            app.board.toggle_role_filter(ROLE_CHOICES[1]);
            app.clamp_cursor();
        }
        KeyCode::Char('c') => {
            app.board.clear_filters();
            app.clamp_cursor();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(id) = app.cursor_user().map(|user| user.id) {
                app.board.begin_edit(id);
                app.edit_field = EditField::Name;
            }
        }
        KeyCode::Char('d') => {
            if let Some((id, name)) = app.cursor_user().map(|user| (user.id, user.name.clone())) {
                app.confirm = Some((
                    ConfirmModal::new(format!("Do you want to delete the user \"{name}\"?"))
                        .title("Delete user"),
                    PendingDelete::One { id },
                ));
            }
        }
        KeyCode::Char('D') => {
            if app.board.selected_count() > 0 {
                app.confirm = Some((
                    ConfirmModal::new("Do you want to delete the selected rows?")
                        .title("Delete selected"),
                    PendingDelete::Selected,
                ));
            }
        }
        _ => {}
    }
    false
}
