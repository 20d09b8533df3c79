use std::path::PathBuf;

use clap::Parser;
use fedipost_engine::DEFAULT_LEDGER_FILENAME;

/// Announce newly published site items on a Mastodon instance.
///
/// Credentials come from MASTODON_BASE_URL and MASTODON_OAUTH_TOKEN, read
/// from the environment or a `.env` file in the working directory.
#[derive(Debug, Parser)]
#[command(name = "fedipost")]
#[command(version)]
pub struct Cli {
    /// JSON array of candidate items produced by the site build
    #[arg(long)]
    pub items: PathBuf,

    /// RON file with composition settings; defaults apply when missing
    #[arg(long, default_value = "fedipost.ron")]
    pub settings: PathBuf,

    /// Ledger of already announced identifiers
    #[arg(long, env = "FEDIPOST_LEDGER", default_value = DEFAULT_LEDGER_FILENAME)]
    pub ledger: PathBuf,

    /// Compose and log messages without posting or updating the ledger
    #[arg(long)]
    pub dry_run: bool,

    /// Log dispatch failures and exit successfully so the host build continues
    #[arg(long)]
    pub tolerate_failures: bool,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
