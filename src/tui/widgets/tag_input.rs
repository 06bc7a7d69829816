//! Tag input component.
//!
//! The component is controlled: it never owns the tag collection. Every
//! mutating call receives the caller's current tags through [`TagInputProps`]
//! and reports a new collection through the `on_change` callback, only when
//! the collection actually changes. The component itself keeps the pending
//! text buffer and the suggestion dropdown state.
//!
//! Suggestion visibility is a two-state machine. Losing focus does not hide
//! the dropdown right away: the hide is scheduled `grace` into the future and
//! resolved by [`TagInput::tick`], so a mouse release over a suggestion that
//! follows the blur still lands on a visible row.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Frame;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::{KeyBindings, Theme};
use crate::tags::{apply_action, filter_suggestions, TagAction};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::input_buffer::InputBuffer;
use crate::utils::{has_primary_modifier, parse_key_binding, ParsedKeyBinding};

pub const DEFAULT_PLACEHOLDER: &str = "Add a tag...";
pub const DEFAULT_BLUR_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionVisibility {
    Hidden,
    Visible,
}

/// What the caller hands the component on every call
#[derive(Debug, Clone, Copy)]
pub struct TagInputProps<'a> {
    pub tags: &'a [String],
    pub placeholder: &'a str,
    pub suggestions: &'a [String],
}

impl<'a> TagInputProps<'a> {
    pub fn new(tags: &'a [String]) -> Self {
        Self {
            tags,
            placeholder: DEFAULT_PLACEHOLDER,
            suggestions: &[],
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn suggestions(mut self, suggestions: &'a [String]) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// Key bindings the component reacts to, parsed once from config
#[derive(Debug, Clone)]
pub struct TagInputBindings {
    pub commit: ParsedKeyBinding,
    pub remove_last: ParsedKeyBinding,
    pub suggestion_up: ParsedKeyBinding,
    pub suggestion_down: ParsedKeyBinding,
    pub word_left: ParsedKeyBinding,
    pub word_right: ParsedKeyBinding,
    pub undo: ParsedKeyBinding,
}

impl TagInputBindings {
    pub fn from_config(key_bindings: &KeyBindings) -> Result<Self, String> {
        Ok(Self {
            commit: parse_key_binding(&key_bindings.commit)?,
            remove_last: parse_key_binding(&key_bindings.remove_last)?,
            suggestion_up: parse_key_binding(&key_bindings.suggestion_up)?,
            suggestion_down: parse_key_binding(&key_bindings.suggestion_down)?,
            word_left: parse_key_binding(&key_bindings.word_left)?,
            word_right: parse_key_binding(&key_bindings.word_right)?,
            undo: parse_key_binding(&key_bindings.undo)?,
        })
    }
}

impl Default for TagInputBindings {
    fn default() -> Self {
        let plain = |key_code| ParsedKeyBinding { key_code, requires_ctrl: false };
        let ctrl = |key_code| ParsedKeyBinding { key_code, requires_ctrl: true };
        Self {
            commit: plain(KeyCode::Enter),
            remove_last: plain(KeyCode::Backspace),
            suggestion_up: plain(KeyCode::Up),
            suggestion_down: plain(KeyCode::Down),
            word_left: ctrl(KeyCode::Left),
            word_right: ctrl(KeyCode::Right),
            undo: ctrl(KeyCode::Char('z')),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TagInput {
    buffer: InputBuffer,
    visibility: SuggestionVisibility,
    focused: bool,
    hide_deadline: Option<Instant>,
    grace: Duration,
    highlighted: Option<usize>,
    max_visible: usize,
}

impl Default for TagInput {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_GRACE)
    }
}

impl TagInput {
    pub fn new(grace: Duration) -> Self {
        Self {
            buffer: InputBuffer::new(),
            visibility: SuggestionVisibility::Hidden,
            focused: false,
            hide_deadline: None,
            grace,
            highlighted: None,
            max_visible: usize::MAX,
        }
    }

    /// Cap the number of suggestions offered at once
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn visibility(&self) -> SuggestionVisibility {
        self.visibility
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn hide_pending(&self) -> bool {
        self.hide_deadline.is_some()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Dropdown rows shown at once; further matches scroll into view
    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    pub fn focus(&mut self) {
        self.focused = true;
        self.hide_deadline = None;
        self.visibility = SuggestionVisibility::Visible;
    }

    /// Lose focus; suggestions stay up until the grace delay has passed
    pub fn blur(&mut self, now: Instant) {
        self.focused = false;
        self.highlighted = None;
        if self.visibility == SuggestionVisibility::Visible && self.hide_deadline.is_none() {
            self.hide_deadline = Some(now + self.grace);
            debug!(grace_ms = self.grace.as_millis() as u64, "scheduled suggestion hide");
        }
    }

    /// Resolve a pending hide. Returns true if the dropdown was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_deadline {
            Some(deadline) if now >= deadline => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    fn hide(&mut self) {
        self.visibility = SuggestionVisibility::Hidden;
        self.hide_deadline = None;
        self.highlighted = None;
    }

    /// Edits reopen the dropdown only while focused; a blurred input keeps
    /// whatever hide is already scheduled.
    fn on_text_changed(&mut self) {
        if self.focused {
            self.visibility = SuggestionVisibility::Visible;
        }
        self.highlighted = None;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert_char(ch);
        self.on_text_changed();
    }

    /// Every suggestion matching the buffer, regardless of visibility
    pub fn filtered_suggestions<'p>(&self, props: &TagInputProps<'p>) -> Vec<&'p str> {
        filter_suggestions(props.suggestions, props.tags, self.buffer.text())
    }

    /// Suggestions the open dropdown offers right now, in display order
    pub fn visible_suggestions<'p>(&self, props: &TagInputProps<'p>) -> Vec<&'p str> {
        if self.visibility == SuggestionVisibility::Hidden || self.buffer.is_empty() {
            return Vec::new();
        }
        self.filtered_suggestions(props)
    }

    /// Commit the buffer as a tag. The buffer is cleared and suggestions hidden
    /// even when the tag is rejected.
    pub fn commit(&mut self, props: &TagInputProps, on_change: &mut dyn FnMut(Vec<String>)) {
        let text = self.buffer.text().to_string();
        request_change(props.tags, TagAction::Commit(text), on_change);
        self.buffer.clear();
        self.hide();
    }

    /// Commit a suggestion's text and close the dropdown, cancelling any pending hide
    pub fn select_suggestion(
        &mut self,
        suggestion: &str,
        props: &TagInputProps,
        on_change: &mut dyn FnMut(Vec<String>),
    ) {
        request_change(props.tags, TagAction::Commit(suggestion.to_string()), on_change);
        self.buffer.clear();
        self.hide();
    }

    /// Select the row at `index` of the visible dropdown, if it is showing
    pub fn select_visible(
        &mut self,
        index: usize,
        props: &TagInputProps,
        on_change: &mut dyn FnMut(Vec<String>),
    ) -> bool {
        let visible = self.visible_suggestions(props);
        match visible.get(index) {
            Some(suggestion) => {
                let suggestion = suggestion.to_string();
                self.select_suggestion(&suggestion, props, on_change);
                true
            }
            None => false,
        }
    }

    pub fn remove_tag(&self, tag: &str, props: &TagInputProps, on_change: &mut dyn FnMut(Vec<String>)) {
        request_change(props.tags, TagAction::Remove(tag.to_string()), on_change);
    }

    pub fn remove_last(&self, props: &TagInputProps, on_change: &mut dyn FnMut(Vec<String>)) {
        request_change(props.tags, TagAction::RemoveLast, on_change);
    }

    /// Move the dropdown highlight. Returns false when there is nothing to move through.
    pub fn move_highlight(&mut self, props: &TagInputProps, down: bool) -> bool {
        let count = self.visible_suggestions(props).len();
        if count == 0 {
            self.highlighted = None;
            return false;
        }
        self.highlighted = Some(match (self.highlighted, down) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        });
        true
    }

    /// Handle a key press while the input has focus.
    /// Returns true if the key was consumed.
    pub fn handle_key(
        &mut self,
        key_event: KeyEvent,
        props: &TagInputProps,
        bindings: &TagInputBindings,
        on_change: &mut dyn FnMut(Vec<String>),
    ) -> bool {
        if bindings.commit.matches(&key_event) {
            let visible_count = self.visible_suggestions(props).len();
            match self.highlighted {
                Some(index) if index < visible_count => {
                    self.select_visible(index, props, on_change);
                }
                _ => self.commit(props, on_change),
            }
            return true;
        }

        if bindings.remove_last.matches(&key_event) && self.buffer.is_empty() {
            self.remove_last(props, on_change);
            return true;
        }

        if bindings.suggestion_down.matches(&key_event) {
            return self.move_highlight(props, true);
        }
        if bindings.suggestion_up.matches(&key_event) {
            return self.move_highlight(props, false);
        }

        if bindings.undo.matches(&key_event) {
            if self.buffer.undo() {
                self.on_text_changed();
            }
            return true;
        }
        if bindings.word_left.matches(&key_event) {
            self.buffer.move_cursor_word_left();
            return true;
        }
        if bindings.word_right.matches(&key_event) {
            self.buffer.move_cursor_word_right();
            return true;
        }

        match key_event.code {
            KeyCode::Char(c) => {
                if has_primary_modifier(key_event.modifiers) {
                    return false;
                }
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                if self.buffer.delete_char() {
                    self.on_text_changed();
                }
                true
            }
            KeyCode::Delete => {
                if self.buffer.delete_forward() {
                    self.on_text_changed();
                }
                true
            }
            KeyCode::Left => {
                self.buffer.move_cursor_left();
                true
            }
            KeyCode::Right => {
                self.buffer.move_cursor_right();
                true
            }
            KeyCode::Home => {
                self.buffer.move_cursor_home();
                true
            }
            KeyCode::End => {
                self.buffer.move_cursor_end();
                true
            }
            KeyCode::Esc if self.visibility == SuggestionVisibility::Visible => {
                self.hide();
                true
            }
            _ => false,
        }
    }
}

/// Ask the caller to adopt a new collection, skipping no-op actions
fn request_change(tags: &[String], action: TagAction, on_change: &mut dyn FnMut(Vec<String>)) -> bool {
    let next = apply_action(tags, &action);
    if next.as_slice() == tags {
        debug!(?action, "tag action left collection unchanged");
        return false;
    }
    debug!(?action, count = next.len(), "tag collection changed");
    on_change(next);
    true
}

/// Render the input box. Places the terminal cursor when the input has focus.
pub fn render_tag_input(f: &mut Frame, area: Rect, input: &mut TagInput, props: &TagInputProps, theme: &Theme) {
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let placeholder_fg = parse_color(&theme.placeholder_fg);

    let border_style = if input.is_focused() {
        Style::default().fg(highlight_bg).bg(bg_color)
    } else {
        Style::default().fg(fg_color).bg(bg_color)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(if input.is_focused() { "> New tag" } else { "  New tag" })
        .style(border_style);
    let inner = block.inner(area);

    let width = inner.width as usize;
    input.buffer.update_horizontal_scroll(width);

    let paragraph = if input.buffer.is_empty() {
        Paragraph::new(Span::styled(props.placeholder.to_string(), Style::default().fg(placeholder_fg)))
    } else {
        let (visible, _) = input.buffer.visible(width);
        Paragraph::new(Span::styled(visible, Style::default().fg(fg_color)))
    };
    f.render_widget(paragraph.block(block), area);

    if input.is_focused() && inner.width > 0 && inner.height > 0 {
        let (_, cursor) = input.buffer.visible(width);
        let x = inner.x + (cursor.min(width.saturating_sub(1)) as u16);
        f.set_cursor_position((x, inner.y));
    }
}

/// Render the dropdown below `anchor` and return the screen row of each
/// suggestion on screen. The list scrolls to keep the highlight in view.
pub fn render_suggestions(
    f: &mut Frame,
    anchor: Rect,
    bounds: Rect,
    input: &TagInput,
    props: &TagInputProps,
    theme: &Theme,
) -> Vec<(Rect, String)> {
    let suggestions = input.visible_suggestions(props);
    if suggestions.is_empty() {
        return Vec::new();
    }

    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let below = bounds.y + bounds.height;
    let top = anchor.y + anchor.height;
    let available = below.saturating_sub(top);
    let rows = u16::try_from(suggestions.len().min(input.max_visible())).unwrap_or(u16::MAX);
    let height = rows.saturating_add(2).min(available);
    if height < 3 {
        return Vec::new();
    }
    let area = Rect::new(anchor.x, top, anchor.width, height);
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = suggestions.iter()
        .map(|s| ListItem::new(Line::from(Span::styled(s.to_string(), Style::default().fg(fg_color)))))
        .collect();
    let list = List::new(items)
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Suggestions")
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg).add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(input.highlighted());
    f.render_stateful_widget(list, area, &mut state);

    let rows = (height - 2) as usize;
    let offset = state.offset();
    suggestions.iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, s)| {
            let y = area.y + 1 + (i - offset) as u16;
            (Rect::new(area.x + 1, y, area.width.saturating_sub(2), 1), s.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Drives the component the way a host does: the host owns `tags`
    struct Host {
        tags: Vec<String>,
        suggestions: Vec<String>,
        input: TagInput,
        bindings: TagInputBindings,
        changes: usize,
    }

    impl Host {
        fn new(tags: &[&str], suggestions: &[&str]) -> Self {
            let mut input = TagInput::default();
            input.focus();
            Self {
                tags: strings(tags),
                suggestions: strings(suggestions),
                input,
                bindings: TagInputBindings::default(),
                changes: 0,
            }
        }

        fn press(&mut self, code: KeyCode) -> bool {
            let mut next = None;
            let props = TagInputProps::new(&self.tags).suggestions(&self.suggestions);
            let consumed = self.input.handle_key(key(code), &props, &self.bindings, &mut |t| next = Some(t));
            if let Some(tags) = next {
                self.tags = tags;
                self.changes += 1;
            }
            consumed
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn visible(&self) -> Vec<String> {
            let props = TagInputProps::new(&self.tags).suggestions(&self.suggestions);
            self.input.visible_suggestions(&props).into_iter().map(String::from).collect()
        }

        fn click_suggestion(&mut self, index: usize) -> bool {
            let mut next = None;
            let props = TagInputProps::new(&self.tags).suggestions(&self.suggestions);
            let selected = self.input.select_visible(index, &props, &mut |t| next = Some(t));
            if let Some(tags) = next {
                self.tags = tags;
                self.changes += 1;
            }
            selected
        }
    }

    #[test]
    fn starts_hidden_and_unfocused() {
        let input = TagInput::default();
        assert_eq!(input.visibility(), SuggestionVisibility::Hidden);
        assert!(!input.is_focused());
        assert!(input.buffer().is_empty());
    }

    #[test]
    fn enter_commits_normalized_text() {
        let mut host = Host::new(&[], &[]);
        host.input.focus();
        host.type_text("  TypeScript  ");
        host.press(KeyCode::Enter);

        assert_eq!(host.tags, strings(&["typescript"]));
        assert!(host.input.buffer().is_empty());
        assert_eq!(host.input.visibility(), SuggestionVisibility::Hidden);
    }

    #[test]
    fn duplicate_commit_does_not_call_back_but_clears_buffer() {
        let mut host = Host::new(&["react"], &[]);
        host.input.focus();
        host.type_text("React");
        host.press(KeyCode::Enter);

        assert_eq!(host.tags, strings(&["react"]));
        assert_eq!(host.changes, 0);
        assert!(host.input.buffer().is_empty());
    }

    #[test]
    fn blank_commit_is_silent() {
        let mut host = Host::new(&["a"], &[]);
        host.type_text("   ");
        host.press(KeyCode::Enter);
        assert_eq!(host.tags, strings(&["a"]));
        assert_eq!(host.changes, 0);
    }

    #[test]
    fn backspace_on_empty_buffer_removes_last_tag() {
        let mut host = Host::new(&["one", "two"], &[]);
        host.press(KeyCode::Backspace);
        assert_eq!(host.tags, strings(&["one"]));

        host.type_text("x");
        host.press(KeyCode::Backspace);
        assert_eq!(host.tags, strings(&["one"]));
        assert!(host.input.buffer().is_empty());
    }

    #[test]
    fn backspace_with_no_tags_is_a_no_op() {
        let mut host = Host::new(&[], &[]);
        assert!(host.press(KeyCode::Backspace));
        assert!(host.tags.is_empty());
        assert_eq!(host.changes, 0);
    }

    #[test]
    fn suggestions_filter_while_typing() {
        let mut host = Host::new(&["react", "nextjs"], &["react", "vue", "remix"]);
        host.input.focus();
        assert!(host.visible().is_empty());

        host.type_text("re");
        assert_eq!(host.visible(), strings(&["remix"]));
    }

    #[test]
    fn highlighted_suggestion_is_selected_on_enter() {
        let mut host = Host::new(&[], &["JavaScript", "TypeScript", "Rust"]);
        host.input.focus();
        host.type_text("script");
        assert!(host.press(KeyCode::Down));
        assert!(host.press(KeyCode::Down));
        assert_eq!(host.input.highlighted(), Some(1));
        host.press(KeyCode::Enter);

        assert_eq!(host.tags, strings(&["typescript"]));
        assert_eq!(host.input.visibility(), SuggestionVisibility::Hidden);
        assert!(host.input.buffer().is_empty());
    }

    #[test]
    fn highlight_wraps_and_ignores_empty_dropdown() {
        let mut host = Host::new(&[], &["alpha", "alpine"]);
        assert!(!host.press(KeyCode::Down));
        host.type_text("al");
        host.press(KeyCode::Up);
        assert_eq!(host.input.highlighted(), Some(1));
        host.press(KeyCode::Down);
        assert_eq!(host.input.highlighted(), Some(0));
        host.type_text("p");
        assert_eq!(host.input.highlighted(), None);
    }

    #[test]
    fn click_within_grace_delay_selects() {
        let mut host = Host::new(&[], &["remix", "react"]);
        host.input.focus();
        host.type_text("re");

        let t0 = Instant::now();
        host.input.blur(t0);
        assert!(host.input.hide_pending());
        assert!(!host.input.tick(t0 + Duration::from_millis(50)));
        assert_eq!(host.visible(), strings(&["remix", "react"]));

        assert!(host.click_suggestion(1));
        assert_eq!(host.tags, strings(&["react"]));
        assert!(!host.input.hide_pending());
        assert_eq!(host.input.visibility(), SuggestionVisibility::Hidden);
    }

    #[test]
    fn blur_hides_after_grace_delay() {
        let mut host = Host::new(&[], &["remix"]);
        host.input.focus();
        host.type_text("r");

        let t0 = Instant::now();
        host.input.blur(t0);
        assert!(host.input.tick(t0 + DEFAULT_BLUR_GRACE));
        assert_eq!(host.input.visibility(), SuggestionVisibility::Hidden);
        assert!(host.visible().is_empty());
        assert!(!host.click_suggestion(0));
        assert!(host.tags.is_empty());
    }

    #[test]
    fn refocus_cancels_pending_hide() {
        let mut input = TagInput::new(Duration::from_millis(100));
        input.focus();
        let t0 = Instant::now();
        input.blur(t0);
        input.focus();
        assert!(!input.hide_pending());
        assert!(!input.tick(t0 + Duration::from_secs(1)));
        assert_eq!(input.visibility(), SuggestionVisibility::Visible);
    }

    #[test]
    fn blur_while_hidden_schedules_nothing() {
        let mut input = TagInput::default();
        input.blur(Instant::now());
        assert!(!input.hide_pending());
        assert_eq!(input.visibility(), SuggestionVisibility::Hidden);
    }

    #[test]
    fn text_change_reopens_dropdown_after_commit() {
        let mut host = Host::new(&[], &["rust", "ruby"]);
        host.type_text("rust");
        host.press(KeyCode::Enter);
        assert_eq!(host.input.visibility(), SuggestionVisibility::Hidden);

        host.type_text("r");
        assert_eq!(host.input.visibility(), SuggestionVisibility::Visible);
        assert_eq!(host.visible(), strings(&["ruby"]));
    }

    #[test]
    fn esc_hides_dropdown_without_touching_buffer() {
        let mut host = Host::new(&[], &["rust"]);
        host.type_text("ru");
        assert!(host.press(KeyCode::Esc));
        assert!(host.visible().is_empty());
        assert_eq!(host.input.buffer().text(), "ru");
        assert!(!host.press(KeyCode::Esc));
    }

    #[test]
    fn custom_commit_key_acts_as_delimiter() {
        let mut key_bindings = KeyBindings::default();
        key_bindings.commit = ",".to_string();
        let mut host = Host::new(&[], &[]);
        host.bindings = TagInputBindings::from_config(&key_bindings).unwrap();

        host.type_text("cli,tui,");
        assert_eq!(host.tags, strings(&["cli", "tui"]));
    }

    #[test]
    fn ctrl_chars_are_not_inserted() {
        let mut input = TagInput::default();
        let tags: Vec<String> = Vec::new();
        let props = TagInputProps::new(&tags);
        let consumed = input.handle_key(
            KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL),
            &props,
            &TagInputBindings::default(),
            &mut |_| panic!("no change expected"),
        );
        assert!(!consumed);
        assert!(input.buffer().is_empty());
    }

    #[test]
    fn remove_tag_requests_change_only_when_present() {
        let input = TagInput::default();
        let tags = strings(&["a", "b", "c"]);
        let props = TagInputProps::new(&tags);

        let mut received = Vec::new();
        input.remove_tag("b", &props, &mut |t| received.push(t));
        input.remove_tag("z", &props, &mut |t| received.push(t));
        assert_eq!(received, vec![strings(&["a", "c"])]);
    }

    #[test]
    fn typing_while_blurred_keeps_dropdown_closed() {
        let mut host = Host::new(&[], &["rust"]);
        host.input.blur(Instant::now());
        host.type_text("ru");
        assert_eq!(host.input.visibility(), SuggestionVisibility::Hidden);
        assert!(host.visible().is_empty());

        host.input.focus();
        host.type_text("s");
        assert_eq!(host.visible(), strings(&["rust"]));
    }

    #[test]
    fn max_visible_limits_height_but_every_match_is_reachable() {
        let mut input = TagInput::default().with_max_visible(2);
        input.focus();
        let tags: Vec<String> = Vec::new();
        let suggestions = strings(&["a1", "a2", "a3", "a4", "a5"]);
        let props = TagInputProps::new(&tags).suggestions(&suggestions);
        input.insert_char('a');
        assert_eq!(input.visible_suggestions(&props).len(), 5);

        input.move_highlight(&props, false);
        assert_eq!(input.highlighted(), Some(4));

        let theme = Theme::default();
        let mut terminal = ratatui::Terminal::new(ratatui::backend::TestBackend::new(20, 20)).unwrap();
        let mut rows = Vec::new();
        terminal
            .draw(|f| rows = render_suggestions(f, Rect::new(0, 0, 20, 3), Rect::new(0, 0, 20, 20), &input, &props, &theme))
            .unwrap();

        let shown: Vec<&str> = rows.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(shown, vec!["a4", "a5"]);
        assert_eq!(rows[0].0, Rect::new(1, 4, 18, 1));

        let mut next = None;
        assert!(input.select_visible(4, &props, &mut |t| next = Some(t)));
        assert_eq!(next, Some(strings(&["a5"])));
    }
}
