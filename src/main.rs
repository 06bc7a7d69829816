use clap::Parser;
use color_eyre::Result;
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use tagin::cli::{Cli, Commands, DEFAULT_COLLECTION};
use tagin::utils::{expand_path, get_data_dir};
use tagin::{Config, Database, Profile};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TAGIN_LOG";
const LOG_FILE: &str = "tagin.log";

/// Log to a file in the data dir; the terminal belongs to the editor.
/// Commands that don't take over the terminal fall back to stderr.
fn init_tracing(profile: Profile, interactive: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let log_file = get_data_dir(profile).and_then(|dir| {
        fs::create_dir_all(&dir).ok()?;
        OpenOptions::new().create(true).append(true).open(dir.join(LOG_FILE)).ok()
    });

    match log_file {
        Some(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None if !interactive => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .compact()
                .with_writer(io::stderr)
                .try_init();
        }
        None => {}
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    let command = cli.command.unwrap_or(Commands::Edit {
        name: DEFAULT_COLLECTION.to_string(),
    });
    init_tracing(profile, matches!(command, Commands::Edit { .. }));

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(&expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };

    let db_path = config.get_database_path();
    let mut db = Database::new(
        db_path.to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Edit { name } => {
            drop(out);
            let app = tagin::tui::App::new(config, db, &name)?;
            tagin::tui::run_event_loop(app)?;
        }
        Commands::Add { name, tags } => {
            tagin::cli::handle_add(&mut db, &name, &tags, &mut out)?;
        }
        Commands::Remove { name, tag } => {
            tagin::cli::handle_remove(&mut db, &name, &tag, &mut out)?;
        }
        Commands::List { name, json } => {
            tagin::cli::handle_list(&db, name.as_deref(), json, &mut out)?;
        }
        Commands::Suggest { name, query } => {
            let limit = config.max_visible_suggestions as usize;
            tagin::cli::handle_suggest(&db, &name, &query, &config.suggestions, limit, &mut out)?;
        }
        Commands::Find { tag } => {
            tagin::cli::handle_find(&db, &tag, &mut out)?;
        }
        Commands::Delete { name } => {
            tagin::cli::handle_delete(&mut db, &name, &mut out)?;
        }
    }

    Ok(())
}
