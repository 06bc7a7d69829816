use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::tui::App;
use crate::tui::app::{Focus, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;

/// Restores the terminal on drop, including when unwinding from a panic.
/// Leaving raw mode, the alternate screen or mouse capture enabled makes
/// the user's shell unusable.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore explicitly on normal exit so errors surface; drop becomes a no-op
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Errors are ignored here, we're already cleaning up
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Check size before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    info!(collection = %app.collection_name, "editor started");

    loop {
        app.tick(Instant::now());

        terminal.draw(|f| crate::tui::render::render(f, &mut app))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Press only; Windows also reports releases
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key_event, Instant::now())? {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => handle_mouse_event(&mut app, mouse_event, Instant::now()),
                // Layout is recomputed on every draw
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    guard.restore()?;
    info!(collection = %app.collection_name, "editor closed");
    Ok(())
}

/// Dispatch a key press by mode. Returns true when the app should exit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent, now: Instant) -> Result<bool, TuiError> {
    match app.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::ConfirmQuit => handle_confirm_quit_mode(app, key_event),
        Mode::Edit => handle_edit_mode(app, key_event, now),
    }
}

pub fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent, now: Instant) {
    if app.mode != Mode::Edit {
        return;
    }
    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => app.mouse_down(mouse_event.column, mouse_event.row, now),
        MouseEventKind::Up(MouseButton::Left) => app.mouse_up(mouse_event.column, mouse_event.row),
        _ => {}
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || app.keys.help.matches(&key_event) {
        app.mode = Mode::Edit;
    }
    Ok(false)
}

fn handle_confirm_quit_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Up => app.move_quit_selection(false),
        KeyCode::Down | KeyCode::Tab => app.move_quit_selection(true),
        KeyCode::Enter => app.confirm_quit(),
        KeyCode::Esc => app.mode = Mode::Edit,
        _ => {}
    }
    Ok(app.should_quit)
}

fn handle_edit_mode(app: &mut App, key_event: KeyEvent, now: Instant) -> Result<bool, TuiError> {
    if app.keys.quit.matches(&key_event) {
        app.request_quit();
        return Ok(app.should_quit);
    }
    if app.keys.help.matches(&key_event) {
        app.mode = Mode::Help;
        return Ok(false);
    }
    if app.keys.save.matches(&key_event) {
        app.save();
        return Ok(false);
    }
    if app.keys.copy.matches(&key_event) {
        app.copy_to_clipboard();
        return Ok(false);
    }
    if app.keys.next_field.matches(&key_event) {
        app.toggle_focus(now);
        return Ok(false);
    }

    match app.focus {
        Focus::Input => {
            if !app.handle_input_key(key_event) {
                debug!(code = ?key_event.code, "unhandled key in tag input");
            }
        }
        Focus::Chips => handle_chips_focus(app, key_event),
    }
    Ok(false)
}

fn handle_chips_focus(app: &mut App, key_event: KeyEvent) {
    if app.keys.remove_chip.matches(&key_event) || key_event.code == KeyCode::Backspace {
        app.remove_selected_chip();
        return;
    }
    match key_event.code {
        KeyCode::Left | KeyCode::Up => app.move_chip_selection(false),
        KeyCode::Right | KeyCode::Down => app.move_chip_selection(true),
        KeyCode::Home => app.chip_index = 0,
        KeyCode::End => app.chip_index = app.tags.len().saturating_sub(1),
        KeyCode::Esc => app.focus_input(),
        // Typing jumps back into the input
        KeyCode::Char(_) => {
            app.focus_input();
            app.handle_input_key(key_event);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Database};
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        let mut db = Database::open_in_memory().unwrap();
        db.save_tags("c", &["one".to_string(), "two".to_string()]).unwrap();
        App::new(Config::default(), db, "c").unwrap()
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE), Instant::now()).unwrap()
    }

    fn ctrl(app: &mut App, ch: char) -> bool {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL), Instant::now()).unwrap()
    }

    #[test]
    fn tab_moves_between_input_and_chips() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Chips);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.chip_index, 1);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.tags, vec!["one".to_string()]);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.tag_input.buffer().text(), "x");
    }

    #[test]
    fn help_opens_and_closes() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Help);
        assert!(app.tag_input.buffer().is_empty());
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::Edit);
    }

    #[test]
    fn quit_with_changes_goes_through_prompt() {
        let mut app = app();
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.tags, vec!["one".to_string()]);

        assert!(!ctrl(&mut app, 'q'));
        assert_eq!(app.mode, Mode::ConfirmQuit);
        press(&mut app, KeyCode::Down);
        assert!(press(&mut app, KeyCode::Enter));

        let stored = app.db.get_collection("c").unwrap().unwrap();
        assert_eq!(stored.tags, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn save_binding_persists() {
        let mut app = app();
        for ch in "three".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 's');
        assert!(!app.is_dirty());
        assert!(ctrl(&mut app, 'q'));
    }

    #[test]
    fn mouse_is_ignored_outside_edit_mode() {
        let mut app = app();
        app.mode = Mode::Help;
        app.hit_areas.chip_removals = vec![(ratatui::layout::Rect::new(0, 0, 1, 1), "one".to_string())];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click, Instant::now());
        assert_eq!(app.tags.len(), 2);

        app.mode = Mode::Edit;
        handle_mouse_event(&mut app, click, Instant::now());
        assert_eq!(app.tags, vec!["two".to_string()]);
    }
}
