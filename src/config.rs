use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default = "default_blur_grace_ms")]
    pub blur_grace_ms: u64,
    #[serde(default = "default_max_visible_suggestions")]
    pub max_visible_suggestions: u16,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_commit")]
    pub commit: String,
    #[serde(default = "default_remove_last")]
    pub remove_last: String,
    #[serde(default = "default_next_field")]
    pub next_field: String,
    #[serde(default = "default_suggestion_up")]
    pub suggestion_up: String,
    #[serde(default = "default_suggestion_down")]
    pub suggestion_down: String,
    #[serde(default = "default_remove_chip")]
    pub remove_chip: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_copy")]
    pub copy: String,
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_word_left")]
    pub word_left: String,
    #[serde(default = "default_word_right")]
    pub word_right: String,
    #[serde(default = "default_undo")]
    pub undo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_chip_bg")]
    pub chip_bg: String,
    #[serde(default = "default_placeholder_fg")]
    pub placeholder_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            placeholder: default_placeholder(),
            suggestions: Vec::new(),
            blur_grace_ms: default_blur_grace_ms(),
            max_visible_suggestions: default_max_visible_suggestions(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            commit: default_commit(),
            remove_last: default_remove_last(),
            next_field: default_next_field(),
            suggestion_up: default_suggestion_up(),
            suggestion_down: default_suggestion_down(),
            remove_chip: default_remove_chip(),
            save: default_save(),
            copy: default_copy(),
            quit: default_quit(),
            help: default_help(),
            word_left: default_word_left(),
            word_right: default_word_right(),
            undo: default_undo(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            chip_bg: default_chip_bg(),
            placeholder_fg: default_placeholder_fg(),
        }
    }
}

impl Theme {
    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            highlight_fg: "white".to_string(),
            chip_bg: "lightcyan".to_string(),
            placeholder_fg: "gray".to_string(),
        });

        themes.insert("monochrome".to_string(), Theme {
            fg: "white".to_string(),
            bg: "black".to_string(),
            highlight_bg: "white".to_string(),
            highlight_fg: "black".to_string(),
            chip_bg: "darkgray".to_string(),
            placeholder_fg: "gray".to_string(),
        });

        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    // Fallback only; the profile's path is applied at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("tags.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/tagin/tags.db".to_string()
    }
}

fn default_placeholder() -> String {
    "Add a tag...".to_string()
}

fn default_blur_grace_ms() -> u64 {
    200
}

fn default_max_visible_suggestions() -> u16 {
    6
}

fn default_commit() -> String {
    "Enter".to_string()
}

fn default_remove_last() -> String {
    "Backspace".to_string()
}

fn default_next_field() -> String {
    "Tab".to_string()
}

fn default_suggestion_up() -> String {
    "Up".to_string()
}

fn default_suggestion_down() -> String {
    "Down".to_string()
}

fn default_remove_chip() -> String {
    "Delete".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_copy() -> String {
    "Ctrl+y".to_string()
}

fn default_quit() -> String {
    "Ctrl+q".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_word_left() -> String {
    "Ctrl+Left".to_string()
}

fn default_word_right() -> String {
    "Ctrl+Right".to_string()
}

fn default_undo() -> String {
    "Ctrl+z".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_chip_bg() -> String {
    "darkgray".to_string()
}

fn default_placeholder_fg() -> String {
    "gray".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Invalid key binding for {field}: {reason}")]
    KeyBindingError { field: &'static str, reason: String },
}

impl Config {
    /// Load configuration from the profile's config file, or create default if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        let mut config = Self::load_from_path(&config_path)?;

        // Ensure database path matches profile (in case config was manually edited)
        config.database_path = Self::default_database_path_for_profile(profile);

        Ok(config)
    }

    /// Load configuration from an explicit file, writing defaults there if it doesn't exist
    pub fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            config.validate_key_bindings()?;
            info!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            let mut config = Config::default();
            if let Err(e) = config.save_to_path(config_path) {
                warn!(path = %config_path.display(), error = %e, "failed to write default config");
                return Err(e);
            }
            info!(path = %config_path.display(), "wrote default config");
            Ok(config)
        }
    }

    /// Save configuration to an explicit file
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("tags.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/tagin-dev/tags.db".to_string(),
                utils::Profile::Prod => "~/.local/share/tagin/tags.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Grace delay between the input losing focus and suggestions hiding
    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }

    /// Get the currently active theme
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::default()
        }
    }

    /// Make sure every key binding string parses
    pub fn validate_key_bindings(&self) -> Result<(), ConfigError> {
        let kb = &self.key_bindings;
        let fields: [(&'static str, &str); 13] = [
            ("commit", kb.commit.as_str()),
            ("remove_last", kb.remove_last.as_str()),
            ("next_field", kb.next_field.as_str()),
            ("suggestion_up", kb.suggestion_up.as_str()),
            ("suggestion_down", kb.suggestion_down.as_str()),
            ("remove_chip", kb.remove_chip.as_str()),
            ("save", kb.save.as_str()),
            ("copy", kb.copy.as_str()),
            ("quit", kb.quit.as_str()),
            ("help", kb.help.as_str()),
            ("word_left", kb.word_left.as_str()),
            ("word_right", kb.word_right.as_str()),
            ("undo", kb.undo.as_str()),
        ];
        for (field, value) in fields {
            utils::parse_key_binding(value)
                .map_err(|reason| ConfigError::KeyBindingError { field, reason })?;
        }
        Ok(())
    }
}
