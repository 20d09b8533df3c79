use std::fmt;

use fedipost_core::CycleReport;

use crate::persist::PersistError;

/// Identifier the remote service assigned to a posted status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusId(pub String);

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SubmitError {
    pub kind: SubmitFailureKind,
    pub message: String,
}

impl SubmitError {
    pub(crate) fn new(kind: SubmitFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
}

impl fmt::Display for SubmitFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitFailureKind::InvalidUrl => write!(f, "invalid url"),
            SubmitFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            SubmitFailureKind::Timeout => write!(f, "timeout"),
            SubmitFailureKind::Network => write!(f, "network error"),
            SubmitFailureKind::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

/// What a finished cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Identifiers announced and recorded in the ledger.
    pub announced: Vec<String>,
    /// Messages composed but not sent because of a dry run.
    pub previewed: Vec<String>,
    /// Whether the ledger file was rewritten.
    pub ledger_written: bool,
}

impl DispatchReport {
    pub(crate) fn from_cycle(report: CycleReport, ledger_written: bool) -> Self {
        Self {
            announced: report.announced,
            previewed: Vec::new(),
            ledger_written,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.announced.is_empty() && self.previewed.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("failed to load ledger: {0}")]
    Load(#[source] PersistError),
    /// The batch stopped at `id`; nothing from this batch was recorded.
    #[error("announcing {id} failed: {source}")]
    Submission {
        id: String,
        /// Items announced earlier in the same batch; they will be announced
        /// again by the next cycle.
        announced: Vec<String>,
        #[source]
        source: SubmitError,
    },
    /// Every item was announced but the ledger was not updated, so the next
    /// cycle announces them again.
    #[error("announced {} item(s) but failed to record them: {source}", .announced.len())]
    Persistence {
        announced: Vec<String>,
        #[source]
        source: PersistError,
    },
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
