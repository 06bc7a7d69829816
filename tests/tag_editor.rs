use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use tagin::tui::widgets::tag_input::TagInputBindings;
use tagin::{apply_action, Config, Database, SuggestionVisibility, TagAction, TagInput, TagInputProps};
use tempfile::TempDir;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A caller that owns the collection and adopts whatever the editor reports
struct Form {
    tags: Vec<String>,
    suggestions: Vec<String>,
    editor: TagInput,
    bindings: TagInputBindings,
    reports: Vec<Vec<String>>,
}

impl Form {
    fn new(tags: &[&str], suggestions: &[&str]) -> Self {
        let mut editor = TagInput::new(Duration::from_millis(200));
        editor.focus();
        Self {
            tags: strings(tags),
            suggestions: strings(suggestions),
            editor,
            bindings: TagInputBindings::default(),
            reports: Vec::new(),
        }
    }

    fn key(&mut self, code: KeyCode) {
        let mut next = None;
        let props = TagInputProps::new(&self.tags).suggestions(&self.suggestions);
        self.editor.handle_key(KeyEvent::new(code, KeyModifiers::NONE), &props, &self.bindings, &mut |t| next = Some(t));
        if let Some(tags) = next {
            self.reports.push(tags.clone());
            self.tags = tags;
        }
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(KeyCode::Char(ch));
        }
    }

    fn shown(&self) -> Vec<String> {
        let props = TagInputProps::new(&self.tags).suggestions(&self.suggestions);
        self.editor.visible_suggestions(&props).into_iter().map(String::from).collect()
    }

    fn click(&mut self, index: usize) -> bool {
        let mut next = None;
        let props = TagInputProps::new(&self.tags).suggestions(&self.suggestions);
        let hit = self.editor.select_visible(index, &props, &mut |t| next = Some(t));
        if let Some(tags) = next {
            self.reports.push(tags.clone());
            self.tags = tags;
        }
        hit
    }
}

#[test]
fn typing_building_a_collection() {
    let mut form = Form::new(&[], &[]);
    form.type_text("  TypeScript  ");
    form.key(KeyCode::Enter);
    form.type_text("Rust");
    form.key(KeyCode::Enter);
    form.type_text("typescript");
    form.key(KeyCode::Enter);

    assert_eq!(form.tags, strings(&["typescript", "rust"]));
    assert_eq!(form.reports.len(), 2);

    form.key(KeyCode::Backspace);
    assert_eq!(form.tags, strings(&["typescript"]));
}

#[test]
fn suggestion_dropdown_filters_out_present_tags() {
    let mut form = Form::new(&["react", "nextjs"], &["react", "vue", "remix"]);
    form.type_text("re");
    assert_eq!(form.shown(), strings(&["remix"]));

    form.type_text("x");
    assert!(form.shown().is_empty());
}

#[test]
fn mouse_selection_races_blur() {
    let mut form = Form::new(&[], &["remix", "react"]);
    form.type_text("re");

    let pressed = Instant::now();
    form.editor.blur(pressed);
    form.editor.tick(pressed + Duration::from_millis(199));
    assert_eq!(form.editor.visibility(), SuggestionVisibility::Visible);
    assert!(form.click(0));
    assert_eq!(form.tags, strings(&["remix"]));

    form.editor.focus();
    form.type_text("re");
    let pressed = Instant::now();
    form.editor.blur(pressed);
    form.editor.tick(pressed + Duration::from_millis(200));
    assert!(!form.click(0));
    assert_eq!(form.tags, strings(&["remix"]));
}

#[test]
fn pure_actions_preserve_order() {
    let tags = strings(&["a", "b", "c", "d"]);
    assert_eq!(apply_action(&tags, &TagAction::Remove("b".into())), strings(&["a", "c", "d"]));
    assert_eq!(apply_action(&tags, &TagAction::RemoveLast), strings(&["a", "b", "c"]));
    assert_eq!(apply_action(&tags, &TagAction::Commit("   ".into())), tags);
    assert_eq!(apply_action(&[], &TagAction::RemoveLast), Vec::<String>::new());
}

#[test]
fn collections_persist_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("tags.db");
    let path = path.to_str().unwrap();

    {
        let mut db = Database::new(path).unwrap();
        db.save_tags("course", &strings(&["go", "backend", "sql"])).unwrap();
        db.save_tags("other", &strings(&["Go"])).unwrap();
    }

    let db = Database::new(path).unwrap();
    let course = db.get_collection("course").unwrap().unwrap();
    assert_eq!(course.tags, strings(&["go", "backend", "sql"]));
    assert_eq!(db.all_tags().unwrap(), strings(&["Go", "backend", "go", "sql"]));
    let names: Vec<String> = db.collections_with_tag("GO").unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, strings(&["course", "other"]));
}

#[test]
fn config_file_drives_editor_settings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "placeholder = \"Topic...\"\nsuggestions = [\"rust\"]\nblur_grace_ms = 50\n\n[key_bindings]\ncommit = \",\"\n",
    )
    .unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.placeholder, "Topic...");
    assert_eq!(config.blur_grace(), Duration::from_millis(50));
    assert_eq!(config.key_bindings.quit, "Ctrl+q");

    let bindings = TagInputBindings::from_config(&config.key_bindings).unwrap();
    let mut form = Form::new(&[], &[]);
    form.bindings = bindings;
    form.type_text("cli,tui,");
    assert_eq!(form.tags, strings(&["cli", "tui"]));
}
