//! tweet-creds - capture and manage the API credentials used by tweet-mine
//!
//! The harvester authenticates with four opaque secrets issued by the
//! provider's developer portal: consumer key/secret and access token/secret.
//! This tool writes them to the credential file that tweet-mine reads at
//! startup.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libtweetmine::credentials::{resolve_credentials_path, Credentials};
use libtweetmine::error::CredentialError;
use libtweetmine::logging;
use tracing::error;

#[derive(Parser)]
#[command(name = "tweet-creds")]
#[command(about = "Manage the API credentials used by tweet-mine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture all four secrets and write the credential file
    Set {
        /// Read the four values from stdin, one per line, in the order
        /// consumer key, consumer secret, access token, token secret
        /// (for automation)
        #[arg(long)]
        stdin: bool,
    },

    /// Report which credential values are present (without showing them)
    Status,

    /// Delete the credential file
    Delete {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_default(cli.verbose);

    if let Err(e) = run(cli.command) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Set { stdin } => set_credentials(stdin),
        Commands::Status => show_status(),
        Commands::Delete { force } => delete_credentials(force),
    }
}

const FIELD_PROMPTS: [&str; 4] = [
    "Consumer Key",
    "Consumer Secret",
    "Access Token",
    "Token Secret",
];

fn set_credentials(from_stdin: bool) -> Result<()> {
    println!("tweet-mine needs an app registered with the provider's developer portal.");
    println!("The four values below are stored locally and nowhere else.\n");

    let values = if from_stdin {
        read_values_from_stdin()?
    } else {
        prompt_for_values()?
    };

    let [consumer_key, consumer_secret, access_token, token_secret] = values;
    let credentials =
        Credentials::from_parts(consumer_key, consumer_secret, access_token, token_secret);

    let path = resolve_credentials_path()?;
    credentials.save_to_path(&path)?;
    println!("Credentials saved to {}", path.display());
    Ok(())
}

fn prompt_for_values() -> Result<[String; 4]> {
    let mut values: [String; 4] = Default::default();
    for (slot, prompt) in values.iter_mut().zip(FIELD_PROMPTS) {
        *slot = rpassword::prompt_password(format!("{prompt}: "))
            .with_context(|| format!("failed to read {prompt}"))?;
    }
    Ok(values)
}

fn read_values_from_stdin() -> Result<[String; 4]> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut values: [String; 4] = Default::default();
    for (slot, prompt) in values.iter_mut().zip(FIELD_PROMPTS) {
        *slot = lines
            .next()
            .with_context(|| format!("stdin ended before {prompt}"))?
            .context("failed to read from stdin")?
            .trim()
            .to_string();
    }
    Ok(values)
}

fn show_status() -> Result<()> {
    let path = resolve_credentials_path()?;
    match Credentials::load_from_path(&path) {
        Ok(_) => {
            println!("Credential file: {}", path.display());
            println!("All four values are present.");
        }
        Err(CredentialError::NotFound { .. }) => {
            println!("No credential file at {}.", path.display());
            println!("Run `tweet-creds set` to create one.");
        }
        Err(CredentialError::MissingField(field)) => {
            println!("Credential file: {}", path.display());
            println!("Value '{field}' is missing or empty. Run `tweet-creds set` to fix it.");
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}

fn delete_credentials(force: bool) -> Result<()> {
    let path = resolve_credentials_path()?;
    if !path.exists() {
        println!("No credential file at {}.", path.display());
        return Ok(());
    }

    if !force {
        print!("Delete {}? [y/N]: ", path.display());
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    std::fs::remove_file(&path)
        .with_context(|| format!("failed to delete {}", path.display()))?;
    println!("Deleted {}.", path.display());
    Ok(())
}
