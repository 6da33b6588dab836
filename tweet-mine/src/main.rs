//! tweet-mine - harvest an account's recent posts into dated CSV files
//!
//! Runs in one of two modes: a single handle (`-s`) or a CSV list of
//! `name,handle` rows (`-f`). Every account is harvested concurrently
//! against a shared rate budget and exported to its own file.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{ArgGroup, Parser};
use libtweetmine::budget::RateBudget;
use libtweetmine::export::CsvExporter;
use libtweetmine::harvest::{harvest_all, HarvestOptions};
use libtweetmine::source::twitter::TwitterTimeline;
use libtweetmine::{input, logging, Account, ContentMode, Credentials};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tweet-mine")]
#[command(about = "Harvest recent posts from social accounts into CSV files", long_about = None)]
#[command(group(ArgGroup::new("accounts").required(true).args(["file", "single"])))]
struct Cli {
    /// File mode: CSV file of name,handle rows to harvest
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Single mode: one handle to harvest
    #[arg(short, long, value_name = "HANDLE")]
    single: Option<String>,

    /// Directory for the harvested CSV files
    #[arg(short, long, default_value = "output/", value_name = "DIR")]
    dir: PathBuf,

    /// Number of most recent posts to harvest per account
    #[arg(short = 'n', long = "count", default_value_t = 10)]
    count: u32,

    /// Extended mode: include replies and reposts
    #[arg(short, long)]
    extended: bool,

    /// Cap on accounts harvested at once (default: all at once)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_default(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{}", e);
        process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> libtweetmine::Result<()> {
    // Credentials are checked before any account work starts.
    let credentials = Credentials::load()?;

    let accounts = match (&cli.file, &cli.single) {
        (Some(path), _) => input::read_account_list(path)?,
        (None, Some(handle)) => vec![Account::new(handle.clone())],
        // clap's arg group guarantees one of the two is present.
        (None, None) => unreachable!("clap enforces the account mode group"),
    };

    let mode = if cli.extended {
        info!("running in extended mode: replies and reposts included");
        ContentMode::Extended
    } else {
        info!("running in normal mode: replies and reposts excluded");
        ContentMode::Normal
    };

    println!("Mining posts...");

    let source = Arc::new(TwitterTimeline::new(&credentials)?);
    let budget = Arc::new(RateBudget::new());
    let exporter = Arc::new(CsvExporter::new(cli.dir));

    let summary = harvest_all(
        source,
        budget,
        exporter,
        accounts,
        HarvestOptions {
            count: cli.count,
            mode,
            jobs: cli.jobs,
        },
    )
    .await;

    info!(
        elapsed = ?summary.elapsed,
        pages = summary.pages,
        ok = summary.accounts_ok,
        failed = summary.accounts_failed,
        "run complete"
    );
    println!(
        "\n...Completed in {:.2?} using {} page fetches ({} accounts ok, {} failed)",
        summary.elapsed, summary.pages, summary.accounts_ok, summary.accounts_failed
    );

    Ok(())
}
