use std::collections::VecDeque;
use std::sync::Arc;

use fedipost_core::{compose, update, ComposeSettings, CycleState, Effect, Item, MarkupStripper, Msg};
use fedipost_logging::{fedipost_error, fedipost_info, fedipost_warn};

use crate::outbound::Outbound;
use crate::persist::{LedgerStore, PersistError};
use crate::{DispatchError, DispatchReport, SubmitError};

/// Runs one dispatch cycle: load ledger, diff, announce each new item in
/// order, then record the whole batch in a single ledger write.
///
/// Cycles must not overlap on the same ledger file.
pub struct Dispatcher {
    store: LedgerStore,
    settings: ComposeSettings,
    stripper: Arc<dyn MarkupStripper>,
}

impl Dispatcher {
    pub fn new(
        store: LedgerStore,
        settings: ComposeSettings,
        stripper: Arc<dyn MarkupStripper>,
    ) -> Self {
        Self {
            store,
            settings,
            stripper,
        }
    }

    pub async fn run(
        &self,
        outbound: &dyn Outbound,
        candidates: Vec<Item>,
    ) -> Result<DispatchReport, DispatchError> {
        let (mut state, effects) = self.begin(candidates)?;
        if state.phase().is_terminal() {
            fedipost_info!("Nothing new to announce");
            return Ok(DispatchReport::from_cycle(state.report(), false));
        }
        self.log_batch(&state);

        let mut queue: VecDeque<Effect> = effects.into();
        let mut submit_failure: Option<(String, SubmitError)> = None;
        let mut persist_failure: Option<PersistError> = None;
        let mut ledger_written = false;

        while let Some(effect) = queue.pop_front() {
            let msg = match effect {
                Effect::Announce { item } => {
                    let message = compose(&item, &self.settings, self.stripper.as_ref());
                    match outbound.submit(&message, self.settings.visibility).await {
                        Ok(status) => {
                            fedipost_info!("Announced {} as status {}", item.id, status);
                            Msg::Announced { id: item.id }
                        }
                        Err(err) => {
                            fedipost_error!("Announcing {} failed: {}", item.id, err);
                            let reason = err.to_string();
                            submit_failure = Some((item.id.clone(), err));
                            Msg::AnnounceFailed {
                                id: item.id,
                                reason,
                            }
                        }
                    }
                }
                Effect::Persist { ledger } => match self.store.save(&ledger) {
                    Ok(_) => {
                        ledger_written = true;
                        Msg::Persisted
                    }
                    Err(err) => {
                        fedipost_error!(
                            "Recording the batch in {:?} failed: {}; it will be announced again next cycle",
                            self.store.path(),
                            err
                        );
                        let reason = err.to_string();
                        persist_failure = Some(err);
                        Msg::PersistFailed { reason }
                    }
                },
            };
            let (next, effects) = update(state, msg);
            state = next;
            queue.extend(effects);
        }

        let report = state.report();
        if let Some((id, source)) = submit_failure {
            if !report.announced.is_empty() {
                fedipost_warn!(
                    "{} item(s) announced before the failure are not recorded and will be announced again",
                    report.announced.len()
                );
            }
            return Err(DispatchError::Submission {
                id,
                announced: report.announced,
                source,
            });
        }
        if let Some(source) = persist_failure {
            return Err(DispatchError::Persistence {
                announced: report.announced,
                source,
            });
        }
        Ok(DispatchReport::from_cycle(report, ledger_written))
    }

    /// Blocking wrapper around [`Dispatcher::run`] for synchronous callers.
    pub fn run_blocking(
        &self,
        outbound: &dyn Outbound,
        candidates: Vec<Item>,
    ) -> Result<DispatchReport, DispatchError> {
        let runtime = tokio::runtime::Runtime::new().map_err(DispatchError::Runtime)?;
        runtime.block_on(self.run(outbound, candidates))
    }

    /// Composes and logs the messages a cycle would send, without submitting
    /// anything or touching the ledger file.
    pub fn preview(&self, candidates: Vec<Item>) -> Result<DispatchReport, DispatchError> {
        let (state, _effects) = self.begin(candidates)?;
        if state.phase().is_terminal() {
            fedipost_info!("Nothing new to announce");
        } else {
            self.log_batch(&state);
        }

        let mut previewed = Vec::with_capacity(state.batch().len());
        for item in state.batch() {
            let message = compose(item, &self.settings, self.stripper.as_ref());
            fedipost_info!(
                "Dry run, would post {} ({}):\n{}",
                item.id,
                self.settings.visibility,
                message
            );
            previewed.push(item.id.clone());
        }

        Ok(DispatchReport {
            announced: Vec::new(),
            previewed,
            ledger_written: false,
        })
    }

    fn begin(&self, candidates: Vec<Item>) -> Result<(CycleState, Vec<Effect>), DispatchError> {
        let ledger = self.store.load().map_err(DispatchError::Load)?;
        Ok(update(CycleState::new(), Msg::Begin { ledger, candidates }))
    }

    fn log_batch(&self, state: &CycleState) {
        fedipost_info!("Items found to announce: {}", state.batch().len());
        for item in state.batch() {
            fedipost_info!(
                "  {} ({})",
                self.stripper.strip(&item.title),
                item.permalink()
            );
        }
    }
}
