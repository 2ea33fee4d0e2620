//! Command line parsing and dispatch

mod commands;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracepin_config::{logging, TracepinConfig};

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "tracepin")]
#[command(about = "Insert and manage variable debug statements in JavaScript and TypeScript sources")]
#[command(version)]
pub struct Cli {
    /// Directory holding `.tracepin.toml` (defaults to the current directory)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// A source file plus an optional language override.
#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    /// Source file (.js, .jsx, .ts, .tsx, .vue, .svelte, .astro, .html)
    pub file: PathBuf,

    /// Language when the extension is missing or misleading
    /// (e.g. "typescript", "tsx", "vue")
    #[arg(long)]
    pub kind: Option<String>,
}

/// Where the selected variable is.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    #[command(flatten)]
    pub source: FileArgs,

    /// One-based line of the selection
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub line: u64,

    /// The selected variable or expression
    #[arg(long)]
    pub variable: String,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Insert a debug statement for the selected variable
    ///
    /// Prints the edited document unless --write is given.
    Insert {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Edit the file in place
        #[arg(long)]
        write: bool,

        /// Print classification, resolution and edit as JSON
        #[arg(long, conflicts_with = "write")]
        json: bool,
    },
    /// Show how the selected variable is classified
    Classify {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Show the script region that contains a line
    Extract {
        #[command(flatten)]
        source: FileArgs,

        /// One-based line inside the wanted script region
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,

        /// Print the region and its offsets as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the debug statements in a file
    List {
        #[command(flatten)]
        source: FileArgs,

        #[arg(long)]
        json: bool,
    },
    /// Comment out every debug statement
    Comment {
        #[command(flatten)]
        source: FileArgs,

        #[arg(long)]
        write: bool,
    },
    /// Restore every commented debug statement
    Uncomment {
        #[command(flatten)]
        source: FileArgs,

        #[arg(long)]
        write: bool,
    },
    /// Remove every debug statement, commented or not
    Delete {
        #[command(flatten)]
        source: FileArgs,

        #[arg(long)]
        write: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let config = TracepinConfig::load(&config_dir)
        .with_context(|| format!("Failed to load configuration from {}", config_dir.display()))?;
    logging::initialize(&config.logging);

    match cli.command {
        Commands::Insert {
            selection,
            write,
            json,
        } => commands::insert(&config, &selection, write, json),
        Commands::Classify { selection } => commands::classify(&selection),
        Commands::Extract { source, line, json } => commands::extract(&source, line, json),
        Commands::List { source, json } => commands::list(&config, &source, json),
        Commands::Comment { source, write } => {
            commands::housekeep(&config, &source, write, commands::Housekeeping::Comment)
        }
        Commands::Uncomment { source, write } => {
            commands::housekeep(&config, &source, write, commands::Housekeeping::Uncomment)
        }
        Commands::Delete { source, write } => {
            commands::housekeep(&config, &source, write, commands::Housekeeping::Delete)
        }
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
