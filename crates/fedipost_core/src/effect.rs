use crate::{Item, Ledger};

/// Work the cycle asks its executor to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Compose and submit the announcement for `item`.
    Announce { item: Item },
    /// Persist the whole ledger in one write.
    Persist { ledger: Ledger },
}
