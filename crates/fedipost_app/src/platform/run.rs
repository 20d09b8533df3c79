use std::process::ExitCode;
use std::sync::Arc;

use fedipost_engine::{
    ChannelSettings, ConfigError, Credentials, DispatchError, Dispatcher, HtmlStripper,
    LedgerStore, MastodonChannel,
};
use fedipost_logging::{fedipost_error, fedipost_info, fedipost_warn};

use super::inputs::{load_items, load_settings};
use crate::cli::Cli;

/// Same status the site plugin historically exited with on missing credentials.
const EXIT_CONFIG: u8 = 9;
const EXIT_INPUT: u8 = 2;
const EXIT_DISPATCH: u8 = 1;

/// Why a run stopped.
#[derive(Debug)]
pub enum RunFailure {
    Config(ConfigError),
    Input(anyhow::Error),
    Dispatch(DispatchError),
}

impl RunFailure {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunFailure::Config(_) => ExitCode::from(EXIT_CONFIG),
            RunFailure::Input(_) => ExitCode::from(EXIT_INPUT),
            RunFailure::Dispatch(_) => ExitCode::from(EXIT_DISPATCH),
        }
    }

    pub fn log(&self) {
        match self {
            RunFailure::Config(err) => fedipost_error!("Configuration error: {}", err),
            RunFailure::Input(err) => fedipost_error!("Input error: {:#}", err),
            RunFailure::Dispatch(err) => fedipost_error!("Dispatch failed: {}", err),
        }
    }
}

pub fn run(cli: &Cli) -> Result<(), RunFailure> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            fedipost_warn!("Ignoring unreadable .env file: {}", err);
        }
    }

    // A bad configuration stops here, before any ledger or network access.
    let channel = if cli.dry_run {
        None
    } else {
        let credentials = Credentials::from_env()
            .validate()
            .map_err(RunFailure::Config)?;
        let channel = MastodonChannel::new(credentials, ChannelSettings::default())
            .map_err(|err| RunFailure::Input(anyhow::Error::new(err)))?;
        Some(channel)
    };

    let settings = load_settings(&cli.settings).map_err(RunFailure::Config)?;
    let items = load_items(&cli.items).map_err(RunFailure::Input)?;
    let dispatcher = Dispatcher::new(
        LedgerStore::new(cli.ledger.clone()),
        settings,
        Arc::new(HtmlStripper),
    );

    let result = match &channel {
        Some(channel) => dispatcher.run_blocking(channel, items),
        None => dispatcher.preview(items),
    };

    match result {
        Ok(report) if report.is_noop() => Ok(()),
        Ok(report) if cli.dry_run => {
            fedipost_info!(
                "Dry run: {} item(s) would be announced",
                report.previewed.len()
            );
            Ok(())
        }
        Ok(report) => {
            fedipost_info!("Announced {} item(s)", report.announced.len());
            Ok(())
        }
        Err(err) if cli.tolerate_failures => {
            fedipost_error!("Dispatch failed, continuing as requested: {}", err);
            Ok(())
        }
        Err(err) => Err(RunFailure::Dispatch(err)),
    }
}
