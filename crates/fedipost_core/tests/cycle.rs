use std::sync::Once;

use fedipost_core::{update, CycleFailure, CycleState, Effect, Item, Ledger, Msg, Phase};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(fedipost_logging::initialize_for_tests);
}

fn item(id: &str) -> Item {
    Item::new("https://blog.example", id, id, "")
}

fn ledger(ids: &[&str]) -> Ledger {
    ids.iter().copied().collect()
}

fn begin(known: &[&str], candidates: Vec<Item>) -> (CycleState, Vec<Effect>) {
    update(
        CycleState::new(),
        Msg::Begin {
            ledger: ledger(known),
            candidates,
        },
    )
}

#[test]
fn announces_only_new_items_then_persists_union() {
    init_logging();
    let b = Item::new("https://blog.example", "/b.html", "Hi", "World");
    let (state, effects) = begin(&["/a.html"], vec![item("/a.html"), b.clone()]);

    assert_eq!(state.phase(), Phase::Submitting);
    assert_eq!(effects, vec![Effect::Announce { item: b }]);

    let (state, effects) = update(
        state,
        Msg::Announced {
            id: "/b.html".to_string(),
        },
    );
    assert_eq!(state.phase(), Phase::Committing);
    assert_eq!(
        effects,
        vec![Effect::Persist {
            ledger: ledger(&["/a.html", "/b.html"]),
        }]
    );

    let (state, effects) = update(state, Msg::Persisted);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Done);
    let report = state.report();
    assert_eq!(report.announced, vec!["/b.html".to_string()]);
    assert!(report.pending.is_empty());
    assert_eq!(report.failure, None);
}

#[test]
fn empty_diff_finishes_without_effects() {
    init_logging();
    let (state, effects) = begin(&["/a.html", "/b.html"], vec![item("/a.html"), item("/b.html")]);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Done);
    assert!(state.phase().is_terminal());
    assert!(state.batch().is_empty());
}

#[test]
fn items_are_announced_one_at_a_time_in_order() {
    init_logging();
    let (state, effects) = begin(&[], vec![item("/1"), item("/2"), item("/3")]);
    assert_eq!(effects, vec![Effect::Announce { item: item("/1") }]);

    let (state, effects) = update(state, Msg::Announced { id: "/1".into() });
    assert_eq!(effects, vec![Effect::Announce { item: item("/2") }]);

    let (state, effects) = update(state, Msg::Announced { id: "/2".into() });
    assert_eq!(effects, vec![Effect::Announce { item: item("/3") }]);

    let (_state, effects) = update(state, Msg::Announced { id: "/3".into() });
    assert_eq!(
        effects,
        vec![Effect::Persist {
            ledger: ledger(&["/1", "/2", "/3"]),
        }]
    );
}

#[test]
fn failure_mid_batch_never_persists() {
    init_logging();
    let (state, _) = begin(&["/old"], vec![item("/1"), item("/2"), item("/3")]);
    let (state, _) = update(state, Msg::Announced { id: "/1".into() });
    let (state, effects) = update(
        state,
        Msg::AnnounceFailed {
            id: "/2".into(),
            reason: "http status 500".into(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Failed);
    let report = state.report();
    assert_eq!(report.announced, vec!["/1".to_string()]);
    assert_eq!(report.pending, vec!["/2".to_string(), "/3".to_string()]);
    assert_eq!(
        report.failure,
        Some(CycleFailure::Submission {
            id: "/2".into(),
            reason: "http status 500".into(),
        })
    );

    // A late success after the failure must not resurrect the batch.
    let (state, effects) = update(state, Msg::Announced { id: "/2".into() });
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Failed);
}

#[test]
fn persist_failure_is_reported_after_full_batch() {
    init_logging();
    let (state, _) = begin(&[], vec![item("/1")]);
    let (state, _) = update(state, Msg::Announced { id: "/1".into() });
    let (state, _) = update(
        state,
        Msg::PersistFailed {
            reason: "disk full".into(),
        },
    );

    assert_eq!(state.phase(), Phase::Failed);
    let report = state.report();
    assert_eq!(report.announced, vec!["/1".to_string()]);
    assert_eq!(
        report.failure,
        Some(CycleFailure::Persistence {
            reason: "disk full".into()
        })
    );
}

#[test]
fn acknowledgement_for_wrong_item_is_ignored() {
    init_logging();
    let (state, _) = begin(&[], vec![item("/1"), item("/2")]);
    let (next, effects) = update(state.clone(), Msg::Announced { id: "/2".into() });
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn failure_for_wrong_item_is_ignored() {
    init_logging();
    let (state, _) = begin(&[], vec![item("/1"), item("/2")]);
    let (next, effects) = update(
        state.clone(),
        Msg::AnnounceFailed {
            id: "/2".into(),
            reason: "stray".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(next, state);
    assert!(!next.phase().is_terminal());

    // The real item can still be announced afterwards.
    let (next, effects) = update(next, Msg::Announced { id: "/1".into() });
    assert_eq!(effects, vec![Effect::Announce { item: item("/2") }]);
    assert_eq!(next.phase(), Phase::Submitting);
}
