use crate::{Item, Ledger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Ledger loaded and candidates received from the content pipeline.
    Begin { ledger: Ledger, candidates: Vec<Item> },
    /// The outbound channel accepted the announcement for `id`.
    Announced { id: String },
    /// The outbound channel rejected or failed the announcement for `id`.
    AnnounceFailed { id: String, reason: String },
    /// The merged ledger was written.
    Persisted,
    /// Writing the merged ledger failed.
    PersistFailed { reason: String },
}
