use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;
use tracing::info;

use crate::database::{Database, DatabaseError};
use crate::models::Collection;
use crate::tags::{apply_action, filter_suggestions, format_tags_brackets, merge_suggestions, parse_tags, TagAction};

pub const DEFAULT_COLLECTION: &str = "default";

#[derive(Parser)]
#[command(name = "tagin")]
#[command(about = "Edit named tag collections with autocomplete suggestions")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive editor (default if no subcommand)
    Edit {
        /// Collection name
        #[arg(default_value = DEFAULT_COLLECTION)]
        name: String,
    },
    /// Add tags to a collection, creating it if needed
    Add {
        /// Collection name
        name: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: String,
    },
    /// Remove one tag from a collection
    Remove {
        /// Collection name
        name: String,
        /// Tag to remove (exact match)
        tag: String,
    },
    /// Show one collection, or all of them
    List {
        /// Collection name
        name: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show the suggestions the editor would offer for a query
    Suggest {
        /// Collection name
        name: String,
        /// Text typed so far
        query: String,
    },
    /// List collections containing a tag
    Find {
        /// Tag to look for (case-insensitive)
        tag: String,
    },
    /// Delete a collection
    Delete {
        /// Collection name
        name: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error("No tags given")]
    NoTags,
    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),
    #[error("Failed to encode JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Handle the add command. Returns the collection's tags afterwards.
pub fn handle_add(db: &mut Database, name: &str, tags: &str, out: &mut dyn Write) -> Result<Vec<String>, CliError> {
    let new_tags = parse_tags(Some(tags));
    if new_tags.is_empty() {
        return Err(CliError::NoTags);
    }

    let collection = db.get_or_create_collection(name)?;
    let updated = new_tags.into_iter()
        .fold(collection.tags.clone(), |acc, tag| apply_action(&acc, &TagAction::Commit(tag)));
    let added = updated.len() - collection.tags.len();

    if added > 0 {
        db.save_tags(name, &updated)?;
    }
    info!(collection = name, added, "add command");
    writeln!(out, "Added {} tag(s) to '{}': {}", added, name, format_tags_brackets(&updated))?;

    Ok(updated)
}

/// Handle the remove command
pub fn handle_remove(db: &mut Database, name: &str, tag: &str, out: &mut dyn Write) -> Result<Vec<String>, CliError> {
    let collection = db.get_collection(name)?
        .ok_or_else(|| CliError::CollectionNotFound(name.to_string()))?;
    let updated = apply_action(&collection.tags, &TagAction::Remove(tag.to_string()));

    if updated == collection.tags {
        writeln!(out, "'{}' has no tag '{}'", name, tag)?;
    } else {
        db.save_tags(name, &updated)?;
        info!(collection = name, tag, "remove command");
        writeln!(out, "Removed '{}' from '{}'", tag, name)?;
    }

    Ok(updated)
}

/// Handle the list command
pub fn handle_list(db: &Database, name: Option<&str>, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let collections = match name {
        Some(name) => vec![db.get_collection(name)?
            .ok_or_else(|| CliError::CollectionNotFound(name.to_string()))?],
        None => db.list_collections()?,
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &collections)?;
        writeln!(out)?;
        return Ok(());
    }

    if collections.is_empty() {
        writeln!(out, "No collections yet")?;
    }
    for collection in &collections {
        write_collection_line(out, collection)?;
    }
    Ok(())
}

fn write_collection_line(out: &mut dyn Write, collection: &Collection) -> std::io::Result<()> {
    if collection.tags.is_empty() {
        writeln!(out, "{}: (no tags)", collection.name)
    } else {
        writeln!(out, "{}: {}", collection.name, format_tags_brackets(&collection.tags))
    }
}

/// Handle the suggest command. Candidates are the configured suggestions plus every stored tag.
pub fn handle_suggest(
    db: &Database,
    name: &str,
    query: &str,
    configured: &[String],
    limit: usize,
    out: &mut dyn Write,
) -> Result<Vec<String>, CliError> {
    let current = db.get_collection(name)?.map(|c| c.tags).unwrap_or_default();
    let known = db.all_tags()?;
    let candidates = merge_suggestions(&[configured, &known]);

    let matches: Vec<String> = if query.is_empty() {
        Vec::new()
    } else {
        filter_suggestions(&candidates, &current, query)
            .into_iter()
            .take(limit)
            .map(String::from)
            .collect()
    };

    for suggestion in &matches {
        writeln!(out, "{}", suggestion)?;
    }
    Ok(matches)
}

/// Handle the find command
pub fn handle_find(db: &Database, tag: &str, out: &mut dyn Write) -> Result<Vec<String>, CliError> {
    let collections = db.collections_with_tag(tag)?;
    if collections.is_empty() {
        writeln!(out, "No collections tagged '{}'", tag)?;
    }
    for collection in &collections {
        write_collection_line(out, collection)?;
    }
    Ok(collections.into_iter().map(|c| c.name).collect())
}

/// Handle the delete command
pub fn handle_delete(db: &mut Database, name: &str, out: &mut dyn Write) -> Result<(), CliError> {
    db.delete_collection(name)?;
    info!(collection = name, "delete command");
    writeln!(out, "Collection '{}' deleted successfully", name)?;
    Ok(())
}
