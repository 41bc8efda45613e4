//! Command-line front end for the plant catalog.
//!
//! Every subcommand maps to one catalog manager operation and prints JSON on
//! success. Failures print the error message to stderr and exit with 1.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "plantcatalog", version, about = "Manage a SQLite plant catalog")]
struct Cli {
    /// Catalog database file. Falls back to `PLANT_CATALOG_DB_PATH`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a plant from a JSON object.
    Add {
        #[arg(long)]
        json: String,
    },
    /// Delete the plant with this catalog number.
    Delete { catalog_number: String },
    /// List every plant.
    List,
    /// List plants with the given food type.
    Search { food_type: String },
    /// Show one plant by catalog number.
    Get { catalog_number: String },
    /// Overwrite a stored plant from a JSON object (or `null`).
    Update {
        #[arg(long)]
        json: String,
    },
    /// Print the core library version.
    Version,
}

impl Cli {
    fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or(plantcatalog_core::default_log_level())
    }
}

impl From<Command> for commands::Request {
    fn from(command: Command) -> Self {
        match command {
            Command::Add { json } => Self::Add(json),
            Command::Delete { catalog_number } => Self::Delete(catalog_number),
            Command::List => Self::List,
            Command::Search { food_type } => Self::Search(food_type),
            Command::Get { catalog_number } => Self::Get(catalog_number),
            Command::Update { json } => Self::Update(json),
            Command::Version => Self::Version,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = plantcatalog_core::init_logging(cli.log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = config::resolve_db_path(cli.db);
    match commands::execute(&db_path, cli.command.into()) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
