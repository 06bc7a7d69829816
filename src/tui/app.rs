use crossterm::event::KeyEvent;
use ratatui::layout::{Position, Rect};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::KeyBindings;
use crate::tags::{format_tags_brackets, merge_suggestions};
use crate::tui::error::TuiError;
use crate::tui::widgets::tag_input::{TagInput, TagInputBindings, TagInputProps};
use crate::utils::{parse_key_binding, ParsedKeyBinding};
use crate::{Config, Database};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Edit,
    Help,
    ConfirmQuit,
}

/// Which part of the editor receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Chips,
}

/// Options offered when quitting with unsaved changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitChoice {
    Save,
    Discard,
    Cancel,
}

impl QuitChoice {
    pub const ALL: [QuitChoice; 3] = [QuitChoice::Save, QuitChoice::Discard, QuitChoice::Cancel];

    pub fn label(self) -> &'static str {
        match self {
            QuitChoice::Save => "Save and quit",
            QuitChoice::Discard => "Quit without saving",
            QuitChoice::Cancel => "Cancel",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

/// Screen regions recorded during the last render, used for mouse hit testing
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    pub input: Rect,
    pub chips: Rect,
    pub chip_removals: Vec<(Rect, String)>,
    pub suggestions: Vec<(Rect, String)>,
}

/// Every key binding the application reacts to, parsed once at startup
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub next_field: ParsedKeyBinding,
    pub remove_chip: ParsedKeyBinding,
    pub save: ParsedKeyBinding,
    pub copy: ParsedKeyBinding,
    pub quit: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
    pub input: TagInputBindings,
}

impl KeyMap {
    pub fn from_config(key_bindings: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |s: &str| parse_key_binding(s).map_err(TuiError::KeyBindingError);
        Ok(Self {
            next_field: parse(&key_bindings.next_field)?,
            remove_chip: parse(&key_bindings.remove_chip)?,
            save: parse(&key_bindings.save)?,
            copy: parse(&key_bindings.copy)?,
            quit: parse(&key_bindings.quit)?,
            help: parse(&key_bindings.help)?,
            input: TagInputBindings::from_config(key_bindings).map_err(TuiError::KeyBindingError)?,
        })
    }
}

/// Host of the tag input: owns the collection being edited
pub struct App {
    pub config: Config,
    pub db: Database,
    pub collection_name: String,
    pub tags: Vec<String>,
    saved_tags: Vec<String>,
    pub suggestions: Vec<String>,
    pub tag_input: TagInput,
    pub focus: Focus,
    pub chip_index: usize,
    pub mode: Mode,
    pub quit_selection: usize,
    pub status: StatusState,
    pub hit_areas: HitAreas,
    pub keys: KeyMap,
    pressed_suggestion: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, db: Database, collection_name: &str) -> Result<Self, TuiError> {
        let keys = KeyMap::from_config(&config.key_bindings)?;
        let collection = db.get_or_create_collection(collection_name)?;
        let known_tags = db.all_tags()?;
        let suggestions = merge_suggestions(&[&config.suggestions, &known_tags]);

        let mut tag_input = TagInput::new(config.blur_grace())
            .with_max_visible(config.max_visible_suggestions as usize);
        tag_input.focus();

        info!(
            collection = collection_name,
            tags = collection.tags.len(),
            suggestions = suggestions.len(),
            "opened editor"
        );

        Ok(Self {
            config,
            db,
            collection_name: collection_name.to_string(),
            saved_tags: collection.tags.clone(),
            tags: collection.tags,
            suggestions,
            tag_input,
            focus: Focus::Input,
            chip_index: 0,
            mode: Mode::Edit,
            quit_selection: 0,
            status: StatusState::default(),
            hit_areas: HitAreas::default(),
            keys,
            pressed_suggestion: None,
            should_quit: false,
        })
    }

    pub fn is_dirty(&self) -> bool {
        self.tags != self.saved_tags
    }

    /// Adopt a collection the tag input asked for
    pub fn apply_change(&mut self, tags: Vec<String>) {
        debug!(before = self.tags.len(), after = tags.len(), "collection updated");
        self.tags = tags;
        if self.chip_index >= self.tags.len() {
            self.chip_index = self.tags.len().saturating_sub(1);
        }
        if self.tags.is_empty() && self.focus == Focus::Chips {
            self.focus_input();
        }
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    /// Advance timers: pending suggestion hide and status message expiry
    pub fn tick(&mut self, now: Instant) {
        if self.tag_input.tick(now) {
            debug!("suggestions hidden after blur");
        }
        self.check_status_message_timeout();
    }

    /// Persist the collection and fold its tags into the suggestion list
    pub fn save(&mut self) {
        match self.db.save_tags(&self.collection_name, &self.tags) {
            Ok(()) => {
                self.saved_tags = self.tags.clone();
                match self.db.all_tags() {
                    Ok(known) => self.suggestions = merge_suggestions(&[&self.config.suggestions, &known]),
                    Err(e) => warn!(error = %e, "failed to refresh known tags"),
                }
                let message = format!("Saved {} tag(s) to '{}'", self.tags.len(), self.collection_name);
                self.set_status_message(message);
            }
            Err(e) => {
                warn!(error = %e, collection = %self.collection_name, "save failed");
                self.set_status_message(format!("Failed to save: {}", e));
            }
        }
    }

    pub fn copy_to_clipboard(&mut self) {
        let text = format_tags_brackets(&self.tags);
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text) {
                Ok(()) => self.set_status_message("Copied tags to clipboard".to_string()),
                Err(e) => self.set_status_message(format!("Failed to copy to clipboard: {}", e)),
            },
            Err(_) => self.set_status_message("Failed to access clipboard".to_string()),
        }
    }

    /// Forward a key to the tag input. Returns true if it was consumed.
    /// A click elsewhere blurs the input but leaves key focus on it, so the
    /// next key takes focus back.
    pub fn handle_input_key(&mut self, key_event: KeyEvent) -> bool {
        if self.focus == Focus::Input && !self.tag_input.is_focused() {
            self.focus_input();
        }
        let mut next = None;
        let props = TagInputProps::new(&self.tags)
            .placeholder(&self.config.placeholder)
            .suggestions(&self.suggestions);
        let consumed = self.tag_input.handle_key(key_event, &props, &self.keys.input, &mut |tags| next = Some(tags));
        if let Some(tags) = next {
            self.apply_change(tags);
        }
        consumed
    }

    pub fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.tag_input.focus();
    }

    pub fn focus_chips(&mut self, now: Instant) {
        if self.tags.is_empty() {
            return;
        }
        self.focus = Focus::Chips;
        self.chip_index = self.chip_index.min(self.tags.len() - 1);
        self.tag_input.blur(now);
    }

    pub fn toggle_focus(&mut self, now: Instant) {
        match self.focus {
            Focus::Input => self.focus_chips(now),
            Focus::Chips => self.focus_input(),
        }
    }

    pub fn move_chip_selection(&mut self, forward: bool) {
        if self.tags.is_empty() {
            return;
        }
        let count = self.tags.len();
        self.chip_index = if forward {
            (self.chip_index + 1) % count
        } else {
            (self.chip_index + count - 1) % count
        };
    }

    /// Remove the chip under the chip cursor
    pub fn remove_selected_chip(&mut self) {
        if let Some(tag) = self.tags.get(self.chip_index).cloned() {
            self.remove_tag(&tag);
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        let mut next = None;
        let props = TagInputProps::new(&self.tags);
        self.tag_input.remove_tag(tag, &props, &mut |tags| next = Some(tags));
        if let Some(tags) = next {
            self.apply_change(tags);
        }
    }

    /// Pointer pressed. Pressing outside the input blurs it; the suggestion
    /// under the pointer is remembered so the release can select it.
    pub fn mouse_down(&mut self, column: u16, row: u16, now: Instant) {
        let position = Position::new(column, row);

        if let Some((_, tag)) = self.hit_areas.chip_removals.iter().find(|(r, _)| r.contains(position)) {
            let tag = tag.clone();
            self.remove_tag(&tag);
            return;
        }

        if self.hit_areas.input.contains(position) {
            self.focus_input();
            return;
        }

        self.pressed_suggestion = self.hit_areas.suggestions.iter()
            .find(|(r, _)| r.contains(position))
            .map(|(_, s)| s.clone());

        if self.focus == Focus::Input {
            self.tag_input.blur(now);
        }
        if self.hit_areas.chips.contains(position) && !self.tags.is_empty() {
            self.focus = Focus::Chips;
        }
    }

    /// Pointer released. A press and release on the same visible suggestion selects it.
    pub fn mouse_up(&mut self, column: u16, row: u16) {
        let Some(pressed) = self.pressed_suggestion.take() else {
            return;
        };
        let position = Position::new(column, row);
        let released_on = self.hit_areas.suggestions.iter()
            .find(|(r, _)| r.contains(position))
            .map(|(_, s)| s.as_str());
        if released_on != Some(pressed.as_str()) {
            return;
        }

        let mut next = None;
        let props = TagInputProps::new(&self.tags)
            .placeholder(&self.config.placeholder)
            .suggestions(&self.suggestions);
        let still_offered = self.tag_input.visible_suggestions(&props).contains(&pressed.as_str());
        if still_offered {
            self.tag_input.select_suggestion(&pressed, &props, &mut |tags| next = Some(tags));
        }
        if let Some(tags) = next {
            self.apply_change(tags);
        }
        if still_offered {
            self.focus_input();
        }
    }

    /// Quit now, or ask first when there are unsaved changes
    pub fn request_quit(&mut self) {
        if self.is_dirty() {
            self.mode = Mode::ConfirmQuit;
            self.quit_selection = 0;
        } else {
            self.should_quit = true;
        }
    }

    pub fn move_quit_selection(&mut self, down: bool) {
        let count = QuitChoice::ALL.len();
        self.quit_selection = if down {
            (self.quit_selection + 1) % count
        } else {
            (self.quit_selection + count - 1) % count
        };
    }

    pub fn confirm_quit(&mut self) {
        match QuitChoice::ALL[self.quit_selection % QuitChoice::ALL.len()] {
            QuitChoice::Save => {
                self.save();
                if !self.is_dirty() {
                    self.should_quit = true;
                } else {
                    self.mode = Mode::Edit;
                }
            }
            QuitChoice::Discard => {
                info!(collection = %self.collection_name, "discarded unsaved changes");
                self.should_quit = true;
            }
            QuitChoice::Cancel => self.mode = Mode::Edit,
        }
    }

}
