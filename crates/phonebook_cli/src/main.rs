//! `phonebook` command-line front-end.
//!
//! # Responsibility
//! - Map subcommands onto the core phonebook context (form, list, filter).
//! - Report duplicate names and invalid input on stderr with exit code 1.

use clap::{Parser, Subcommand};
use log::info;
use phonebook_core::db::open_db;
use phonebook_core::{
    init_logging, ContactId, ContactRow, FormError, Phonebook, PhonebookConfig,
    SqliteKeyValueStorage, StoreError,
};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "phonebook")]
#[command(about = "Local phonebook: add, delete and filter contacts")]
#[command(
    after_help = "Environment:\n  PHONEBOOK_DB_PATH     SQLite file holding contacts\n  PHONEBOOK_LOG_LEVEL   Log verbosity\n  PHONEBOOK_LOG_DIR     Absolute directory for rolling logs"
)]
struct Cli {
    /// SQLite file holding the contacts slot.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a contact.
    Add { name: String, number: String },
    /// Delete a contact by id.
    Delete { id: String },
    /// List contacts, optionally filtered by name.
    List {
        #[arg(long, short = 'f', default_value = "")]
        filter: String,
    },
}

/// Failure surfaced to the terminal.
enum CliError {
    /// Blocking notice for the user (duplicate name, invalid input).
    Notice(String),
    Fatal(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = resolve_config(&cli);

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Notice(message)) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
        Err(CliError::Fatal(message)) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}

fn resolve_config(cli: &Cli) -> PhonebookConfig {
    let mut config = PhonebookConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config
}

fn run(cli: &Cli, config: &PhonebookConfig) -> Result<(), CliError> {
    let conn = open_db(&config.db_path).map_err(|err| {
        CliError::Fatal(format!(
            "cannot open `{}`: {err}",
            config.db_path.display()
        ))
    })?;
    let storage =
        SqliteKeyValueStorage::try_new(&conn).map_err(|err| CliError::Fatal(err.to_string()))?;
    let mut phonebook = Phonebook::open(storage).map_err(|err| CliError::Fatal(err.to_string()))?;

    match &cli.command {
        Commands::Add { name, number } => {
            let contact = phonebook
                .add_contact(name.as_str(), number.as_str())
                .map_err(|err| match err {
                    FormError::Store(inner @ (StoreError::Storage(_) | StoreError::Encode(_))) => {
                        CliError::Fatal(inner.to_string())
                    }
                    other => CliError::Notice(other.to_string()),
                })?;
            info!("event=cli_add module=cli status=ok");
            if cli.json {
                println!("{}", json!({ "added": ContactRow::from(&contact) }));
            } else {
                println!("added {}  {}: {}", contact.id, contact.name, contact.number);
            }
        }
        Commands::Delete { id } => {
            let removed = phonebook
                .delete_contact(&ContactId::from(id.as_str()))
                .map_err(|err| CliError::Fatal(err.to_string()))?;
            info!(
                "event=cli_delete module=cli status=ok removed={}",
                removed.is_some()
            );
            if cli.json {
                println!(
                    "{}",
                    json!({ "deleted": removed.as_ref().map(ContactRow::from) })
                );
            } else if let Some(contact) = removed {
                println!("deleted {}  {}: {}", contact.id, contact.name, contact.number);
            } else {
                println!("no contact with id {id}");
            }
        }
        Commands::List { filter } => {
            phonebook.set_filter(filter.as_str());
            let rows = phonebook.visible_rows();
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "filter": filter,
                        "total": phonebook.store().len(),
                        "contacts": rows,
                    })
                );
            } else {
                print_rows(&rows);
            }
        }
    }

    Ok(())
}

fn print_rows(rows: &[ContactRow]) {
    if rows.is_empty() {
        println!("No contacts.");
        return;
    }
    for row in rows {
        println!("{}  {}", row.id, row.label);
    }
}
