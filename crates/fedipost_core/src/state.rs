use crate::{Item, Ledger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Committing,
    Done,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleFailure {
    /// The batch stopped at `id`; the ledger was not touched.
    Submission { id: String, reason: String },
    /// Every item was announced but the ledger write failed, so the batch
    /// will be announced again by the next cycle.
    Persistence { reason: String },
}

/// Outcome of one dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CycleReport {
    pub phase: Phase,
    /// Identifiers accepted by the outbound channel, in submission order.
    pub announced: Vec<String>,
    /// Identifiers found new but not (yet) announced.
    pub pending: Vec<String>,
    pub failure: Option<CycleFailure>,
}

/// State of a single dispatch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CycleState {
    phase: Phase,
    before: Ledger,
    batch: Vec<Item>,
    next: usize,
    failure: Option<CycleFailure>,
}

impl CycleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Items found new by the diff, in announcement order.
    pub fn batch(&self) -> &[Item] {
        &self.batch
    }

    pub fn report(&self) -> CycleReport {
        let (announced, pending) = self.batch.split_at(self.next);
        CycleReport {
            phase: self.phase,
            announced: announced.iter().map(|item| item.id.clone()).collect(),
            pending: pending.iter().map(|item| item.id.clone()).collect(),
            failure: self.failure.clone(),
        }
    }

    pub(crate) fn begin(&mut self, ledger: Ledger, batch: Vec<Item>) {
        self.before = ledger;
        self.batch = batch;
        self.next = 0;
        self.phase = if self.batch.is_empty() {
            Phase::Done
        } else {
            Phase::Submitting
        };
    }

    pub(crate) fn current(&self) -> Option<&Item> {
        self.batch.get(self.next)
    }

    /// Marks the current item announced; returns the next one, if any.
    pub(crate) fn advance(&mut self) -> Option<&Item> {
        self.next += 1;
        self.batch.get(self.next)
    }

    /// Ledger before the cycle merged with every batch identifier.
    pub(crate) fn commit(&mut self) -> Ledger {
        self.phase = Phase::Committing;
        self.before
            .merged(self.batch.iter().map(|item| item.id.as_str()))
    }

    pub(crate) fn finish(&mut self) {
        self.phase = Phase::Done;
    }

    pub(crate) fn fail(&mut self, failure: CycleFailure) {
        self.phase = Phase::Failed;
        self.failure = Some(failure);
    }
}
