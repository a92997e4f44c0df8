use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use paman_core::config::StoreConfig;
use paman_core::store::{convert_file, Store};
use paman_core::{insert, list_all, parse_record, search, PamanError, VERSION};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PAMAN_LOG";

#[derive(Parser, Debug)]
#[command(name = "paman")]
#[command(version, about = "Manage site passwords in an obscured local file", long_about = None)]
struct Cli {
    /// Database file [default: .paman_database, or $PAMAN_DATABASE]
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a new credential and print its generated password
    #[command(short_flag = 'a')]
    Add {
        /// Credential as <site>:<username>
        credential: String,
    },

    /// Convert a file between obscured and plain text, in place
    #[command(short_flag = 'c')]
    Convert {
        file: PathBuf,
    },

    /// Delete the database file
    #[command(short_flag = 'd')]
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the database to <database>_plain.txt
    #[command(short_flag = 'e')]
    Export,

    /// List all credentials
    #[command(short_flag = 'l')]
    List,

    /// Print credentials containing the query
    #[command(short_flag = 's')]
    Search {
        query: String,
    },

    /// Print the program version
    #[command(short_flag = 'v')]
    Version,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };
    let config = StoreConfig::resolve(cli.database);
    debug!(database = %config.database.display(), ?command, "dispatch");

    match command {
        Commands::Add { credential } => {
            let credential = parse_record(&credential)?;
            let store = Store::open_with(&config)?;
            let mut rng = StdRng::from_entropy();
            let password = match insert(&store, &credential, &mut rng) {
                Ok(password) => password,
                Err(err) => {
                    if let PamanError::DuplicateCredential { matches, .. } = &err {
                        for line in matches {
                            println!("{line}");
                        }
                    }
                    return Err(err.into());
                }
            };
            println!("{password}");
        }

        Commands::Convert { file } => {
            convert_file(&file)?;
        }

        Commands::Delete { yes } => {
            let store = Store::open_with(&config)?;
            if yes || confirm_delete(&config.database)? {
                store.delete()?;
                println!("{} deleted.", config.database.display());
            }
        }

        Commands::Export => {
            let store = Store::open_with(&config)?;
            store.export_to_file(&config.plain_export_path())?;
        }

        Commands::List => {
            let store = Store::open_with(&config)?;
            let mut stdout = io::stdout().lock();
            list_all(&store, &mut stdout)?;
        }

        Commands::Search { query } => {
            let store = Store::open_with(&config)?;
            let mut stdout = io::stdout().lock();
            for line in search(&store, &query)? {
                writeln!(stdout, "{line}")?;
            }
        }

        Commands::Version => {
            println!("paman version {VERSION}");
        }
    }

    Ok(())
}

/// Only an answer starting with `Y` confirms.
fn confirm_delete(database: &Path) -> Result<bool> {
    print!("Do you want to delete {}? (Y/n): ", database.display());
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("read confirmation")?;
    Ok(answer.starts_with('Y'))
}
