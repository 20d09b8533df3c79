use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, Once};

use fedipost_core::{ComposeSettings, Item, Ledger, Visibility};
use fedipost_engine::{
    DispatchError, Dispatcher, HtmlStripper, LedgerStore, Outbound, PersistError, StatusId,
    SubmitError, SubmitFailureKind,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(fedipost_logging::initialize_for_tests);
}

/// Records every submission; fails the submission whose message contains `fail_on`.
#[derive(Default)]
struct RecordingOutbound {
    sent: Mutex<Vec<(String, Visibility)>>,
    fail_on: Option<String>,
}

impl RecordingOutbound {
    fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<(String, Visibility)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Outbound for RecordingOutbound {
    async fn submit(&self, message: &str, visibility: Visibility) -> Result<StatusId, SubmitError> {
        if self
            .fail_on
            .as_deref()
            .is_some_and(|marker| message.contains(marker))
        {
            return Err(SubmitError {
                kind: SubmitFailureKind::HttpStatus(503),
                message: "unavailable".to_string(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((message.to_string(), visibility));
        Ok(StatusId(sent.len().to_string()))
    }
}

struct Fixture {
    _temp: TempDir,
    store: LedgerStore,
}

impl Fixture {
    fn with_ledger(ids: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let store = LedgerStore::new(temp.path().join("posted_on_Mastodon.txt"));
        if !ids.is_empty() {
            store.save(&ids.iter().copied().collect()).unwrap();
        }
        Self { _temp: temp, store }
    }

    fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            self.store.clone(),
            ComposeSettings::default(),
            Arc::new(HtmlStripper),
        )
    }

    fn ledger_text(&self) -> Option<String> {
        fs::read_to_string(self.store.path()).ok()
    }
}

fn item(path: &str, title: &str, summary: &str) -> Item {
    Item::new("https://blog.example", path, title, summary)
}

#[tokio::test]
async fn announces_new_item_and_records_it() {
    init_logging();
    let fixture = Fixture::with_ledger(&["/a.html"]);
    let outbound = RecordingOutbound::default();

    let report = fixture
        .dispatcher()
        .run(&outbound, vec![item("/a.html", "Old", "x"), item("/b.html", "Hi", "World")])
        .await
        .expect("cycle ok");

    assert_eq!(report.announced, vec!["/b.html".to_string()]);
    assert!(report.ledger_written);
    assert_eq!(
        outbound.sent(),
        vec![(
            "Hi\n\nWorld\nRead more: https://blog.example/b.html\n\n".to_string(),
            Visibility::Direct
        )]
    );
    assert_eq!(fixture.ledger_text().unwrap(), "/a.html\n/b.html\n");
}

#[tokio::test]
async fn nothing_new_means_no_submission_and_no_write() {
    init_logging();
    let fixture = Fixture::with_ledger(&["/a.html"]);
    let before = fs::metadata(fixture.store.path()).unwrap().modified().unwrap();
    let outbound = RecordingOutbound::default();

    let report = fixture
        .dispatcher()
        .run(&outbound, vec![item("/a.html", "Old", "x")])
        .await
        .unwrap();

    assert!(report.is_noop());
    assert!(!report.ledger_written);
    assert!(outbound.sent().is_empty());
    let after = fs::metadata(fixture.store.path()).unwrap().modified().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn empty_corpus_without_ledger_creates_nothing() {
    init_logging();
    let fixture = Fixture::with_ledger(&[]);
    let report = fixture
        .dispatcher()
        .run(&RecordingOutbound::default(), Vec::new())
        .await
        .unwrap();
    assert!(report.is_noop());
    assert_eq!(fixture.ledger_text(), None);
}

#[tokio::test]
async fn failure_mid_batch_leaves_ledger_untouched() {
    init_logging();
    let fixture = Fixture::with_ledger(&["/old.html"]);
    let outbound = RecordingOutbound::failing_on("Second");

    let err = fixture
        .dispatcher()
        .run(&outbound, vec![
            item("/1.html", "First", "one"),
            item("/2.html", "Second", "two"),
            item("/3.html", "Third", "three"),
        ])
        .await
        .unwrap_err();

    match err {
        DispatchError::Submission {
            id,
            announced,
            source,
        } => {
            assert_eq!(id, "/2.html");
            assert_eq!(announced, vec!["/1.html".to_string()]);
            assert_eq!(source.kind, SubmitFailureKind::HttpStatus(503));
        }
        other => panic!("unexpected error {other:?}"),
    }
    // The third item was never attempted.
    assert_eq!(outbound.sent().len(), 1);
    assert_eq!(fixture.ledger_text().unwrap(), "/old.html\n");
}

#[tokio::test]
async fn retry_after_failure_announces_remaining_items() {
    init_logging();
    let fixture = Fixture::with_ledger(&[]);
    let items = vec![item("/1.html", "First", "one"), item("/2.html", "Second", "two")];

    let failing = RecordingOutbound::failing_on("Second");
    let result = fixture.dispatcher().run(&failing, items.clone()).await;
    assert!(result.is_err());
    assert_eq!(fixture.ledger_text(), None);

    let healthy = RecordingOutbound::default();
    let report = fixture.dispatcher().run(&healthy, items).await.unwrap();
    // At-least-once: the first item goes out a second time.
    assert_eq!(report.announced.len(), 2);
    assert_eq!(healthy.sent().len(), 2);
    assert_eq!(fixture.ledger_text().unwrap(), "/1.html\n/2.html\n");
}

/// Delegates to a [`RecordingOutbound`], then turns the ledger directory into
/// a plain file so the ledger write that follows the batch cannot succeed.
struct DirBlockingOutbound {
    inner: RecordingOutbound,
    ledger_dir: PathBuf,
}

#[async_trait::async_trait]
impl Outbound for DirBlockingOutbound {
    async fn submit(&self, message: &str, visibility: Visibility) -> Result<StatusId, SubmitError> {
        if !self.ledger_dir.exists() {
            fs::write(&self.ledger_dir, "x").unwrap();
        }
        self.inner.submit(message, visibility).await
    }
}

#[tokio::test]
async fn persistence_failure_reports_announced_items() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let ledger_dir = temp.path().join("state");
    // The ledger does not exist yet, so the load at the start of the cycle succeeds.
    let store = LedgerStore::new(ledger_dir.join("posted.txt"));
    let outbound = DirBlockingOutbound {
        inner: RecordingOutbound::default(),
        ledger_dir: ledger_dir.clone(),
    };
    let dispatcher = Dispatcher::new(store, ComposeSettings::default(), Arc::new(HtmlStripper));

    let err = dispatcher
        .run(&outbound, vec![item("/1.html", "First", "one")])
        .await
        .unwrap_err();

    assert_eq!(outbound.inner.sent().len(), 1);
    match err {
        DispatchError::Persistence { announced, source } => {
            assert_eq!(announced, vec!["/1.html".to_string()]);
            assert!(matches!(source, PersistError::OutputDir(_)));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(fs::read_to_string(&ledger_dir).unwrap(), "x");
}

#[test]
fn preview_composes_without_side_effects() {
    init_logging();
    let fixture = Fixture::with_ledger(&["/a.html"]);

    let report = fixture
        .dispatcher()
        .preview(vec![item("/a.html", "Old", "x"), item("/b.html", "Hi", "World")])
        .unwrap();

    assert_eq!(report.previewed, vec!["/b.html".to_string()]);
    assert!(report.announced.is_empty());
    assert_eq!(fixture.ledger_text().unwrap(), "/a.html\n");
}

#[test]
fn run_blocking_drives_a_full_cycle() {
    init_logging();
    let fixture = Fixture::with_ledger(&[]);
    let outbound = RecordingOutbound::default();

    let report = fixture
        .dispatcher()
        .run_blocking(&outbound, vec![item("/x.html", "X", "<p>body</p>")])
        .unwrap();

    assert_eq!(report.announced, vec!["/x.html".to_string()]);
    assert_eq!(fixture.store.load().unwrap(), Ledger::from_iter(["/x.html"]));
}
