pub mod config;
pub mod database;
pub mod models;
pub mod tags;
pub mod utils;
pub mod cli;
pub mod tui;

pub use config::Config;
pub use database::Database;
pub use models::Collection;
pub use tags::{apply_action, filter_suggestions, normalize_tag, TagAction};
pub use tui::widgets::tag_input::{TagInput, TagInputProps, SuggestionVisibility};
pub use utils::Profile;
