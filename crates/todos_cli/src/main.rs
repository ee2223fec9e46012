//! Terminal shell for the todos list.
//!
//! # Responsibility
//! - Map subcommands onto add/edit/delete and print the resulting list.
//! - Flush pending snapshot writes before exiting.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use todos_core::{AppConfig, Change, IgnoreReason, Item, ItemId, TodoApp, ABOUT_URL};

#[derive(Parser)]
#[command(name = "todos")]
#[command(about = "Keep a short to-do list on this device", version)]
struct Cli {
    /// SQLite file holding the list (default: $TODOS_DB_PATH or the temp dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (default: $TODOS_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the list
    List,
    /// Append a todo
    Add {
        /// Todo text; an empty string is ignored
        text: String,
    },
    /// Replace the text of a todo
    Edit {
        id: ItemId,
        /// Replacement text; may be empty
        text: String,
    },
    /// Remove a todo
    Delete { id: ItemId },
    /// Remove every todo
    Clear,
    /// Print the project link
    About,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = todos_core::init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let command = cli.command.unwrap_or(Command::List);
    if let Command::About = command {
        println!("{ABOUT_URL}");
        return Ok(());
    }

    let mut app = TodoApp::open_at(&config.db_path)?;
    match command {
        Command::List | Command::About => {}
        Command::Add { text } => report(&app.add(text)),
        Command::Edit { id, text } => report(&app.edit(id, text)),
        Command::Delete { id } => report(&app.delete(id)),
        Command::Clear => println!("removed {} todo(s)", app.clear()),
    }

    print!("{}", render_list(app.items()));

    if !app.flush() || app.failed_writes() > 0 {
        return Err("failed to save the list".into());
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(log_dir) = cli.log_dir.clone() {
        config.log_dir = Some(log_dir);
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }
    config
}

fn report(change: &Change) {
    if let Change::Ignored(reason) = change {
        match reason {
            IgnoreReason::EmptyText => println!("nothing added: text is empty"),
            IgnoreReason::UnknownId(id) => println!("no todo with id {id}"),
        }
    }
}

fn render_list(items: &[Item]) -> String {
    if items.is_empty() {
        return "(no todos)\n".to_string();
    }

    let id_width = items
        .iter()
        .map(|item| item.id.to_string().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{:>id_width$}  {}", item.id, item.text);
    }
    out
}
