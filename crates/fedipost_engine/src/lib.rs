//! Fedipost engine: ledger file, markup stripping, outbound channel and cycle execution.
mod credentials;
mod dispatch;
mod outbound;
mod persist;
mod strip;
mod types;

pub use credentials::{
    ApiCredentials, ConfigError, Credentials, ENV_BASE_URL, ENV_OAUTH_TOKEN, ENV_PASSWORD,
    ENV_USERNAME,
};
pub use dispatch::Dispatcher;
pub use outbound::{ChannelSettings, MastodonChannel, Outbound};
pub use persist::{
    ensure_output_dir, AtomicFileWriter, LedgerStore, PersistError, DEFAULT_LEDGER_FILENAME,
};
pub use strip::HtmlStripper;
pub use types::{DispatchError, DispatchReport, StatusId, SubmitError, SubmitFailureKind};
