use crate::{CycleFailure, CycleState, Effect, Msg, Phase};

/// Pure update function: applies a message to the cycle and returns any effects.
///
/// The ledger is only handed out for persistence once every item of the batch
/// was announced. Messages that do not belong to the current phase are ignored.
pub fn update(mut state: CycleState, msg: Msg) -> (CycleState, Vec<Effect>) {
    let effects = match (state.phase(), msg) {
        (Phase::Idle, Msg::Begin { ledger, candidates }) => {
            let batch = ledger.unannounced(&candidates);
            state.begin(ledger, batch);
            announce_current(&state)
        }
        (Phase::Submitting, Msg::Announced { id }) => {
            if !is_current(&state, &id) {
                return (state, Vec::new());
            }
            match state.advance().cloned() {
                Some(item) => vec![Effect::Announce { item }],
                None => {
                    let ledger = state.commit();
                    vec![Effect::Persist { ledger }]
                }
            }
        }
        (Phase::Submitting, Msg::AnnounceFailed { id, reason }) => {
            if !is_current(&state, &id) {
                return (state, Vec::new());
            }
            // Nothing announced so far in this batch reaches the ledger.
            state.fail(CycleFailure::Submission { id, reason });
            Vec::new()
        }
        (Phase::Committing, Msg::Persisted) => {
            state.finish();
            Vec::new()
        }
        (Phase::Committing, Msg::PersistFailed { reason }) => {
            state.fail(CycleFailure::Persistence { reason });
            Vec::new()
        }
        _ => Vec::new(),
    };

    (state, effects)
}

fn is_current(state: &CycleState, id: &str) -> bool {
    state.current().is_some_and(|item| item.id == id)
}

fn announce_current(state: &CycleState) -> Vec<Effect> {
    state
        .current()
        .map(|item| Effect::Announce { item: item.clone() })
        .into_iter()
        .collect()
}
