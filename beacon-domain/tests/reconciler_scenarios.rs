use async_trait::async_trait;
use beacon_domain::notifications::{
    CycleOutcome, CycleReport, DismissOutcome, KeyValueSeenSetStore, Notification,
    NotificationError, NotificationId, NotificationLevel, NotificationPresenter,
    NotificationTransport, PresenterError, PresenterHandle, Reconciler, ReconcilerEvent,
    ReconcilerOptions, SeenSet, SeenSetStore, TransportError,
};
use beacon_domain::storage::{FilesystemKeyValueStore, InMemoryKeyValueStore};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::Semaphore;

const KEY: &str = "swan-notifications";

// --- Mock collaborators ---

struct ScriptedTransport {
    response: Mutex<Result<Vec<Notification>, TransportError>>,
    fetches: AtomicUsize,
    gate: Option<Semaphore>,
}

impl ScriptedTransport {
    fn new(list: Vec<Notification>) -> Self {
        Self {
            response: Mutex::new(Ok(list)),
            fetches: AtomicUsize::new(0),
            gate: None,
        }
    }

    fn gated(list: Vec<Notification>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(list)
        }
    }

    fn set_list(&self, list: Vec<Notification>) {
        *self.response.lock().unwrap() = Ok(list);
    }

    fn fail_with(&self, error: TransportError) {
        *self.response.lock().unwrap() = Err(error);
    }
}

#[async_trait]
impl NotificationTransport for ScriptedTransport {
    async fn fetch(&self) -> Result<Vec<Notification>, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| TransportError::Network(e.to_string()))?
                .forget();
        }
        self.response.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct RecordingPresenter {
    next_handle: AtomicU64,
    shown: Mutex<Vec<(NotificationId, PresenterHandle)>>,
    removed: Mutex<Vec<PresenterHandle>>,
    fail_remove: AtomicBool,
}

impl RecordingPresenter {
    fn shown_ids(&self) -> Vec<NotificationId> {
        self.shown.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }

    fn handle_of(&self, id: &NotificationId) -> PresenterHandle {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(shown_id, _)| shown_id == id)
            .map(|(_, handle)| *handle)
            .unwrap()
    }

    fn removed(&self) -> Vec<PresenterHandle> {
        self.removed.lock().unwrap().clone()
    }

    fn call_count(&self) -> usize {
        self.shown.lock().unwrap().len() + self.removed.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationPresenter for RecordingPresenter {
    async fn show(&self, notification: &Notification) -> Result<PresenterHandle, PresenterError> {
        let handle = PresenterHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.shown.lock().unwrap().push((notification.id.clone(), handle));
        Ok(handle)
    }

    async fn remove(&self, handle: PresenterHandle) -> Result<(), PresenterError> {
        self.removed.lock().unwrap().push(handle);
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(PresenterError::Remove("widget already destroyed".to_string()));
        }
        Ok(())
    }
}

// --- Helpers ---

fn id(raw: u64) -> NotificationId {
    NotificationId::from(raw)
}

fn note(raw: u64, dismissible: bool) -> Notification {
    Notification::new(
        id(raw),
        format!("notification {}", raw),
        NotificationLevel::Info,
        dismissible,
    )
}

fn seen(raw: &[u64]) -> SeenSet {
    raw.iter().copied().map(NotificationId::from).collect()
}

fn completed(outcome: CycleOutcome) -> CycleReport {
    match outcome {
        CycleOutcome::Completed(report) => report,
        CycleOutcome::Coalesced => panic!("cycle unexpectedly coalesced"),
    }
}

struct Harness {
    transport: Arc<ScriptedTransport>,
    presenter: Arc<RecordingPresenter>,
    backing: Arc<InMemoryKeyValueStore>,
    reconciler: Arc<Reconciler>,
}

impl Harness {
    async fn new(list: Vec<Notification>) -> Self {
        Self::with(
            ScriptedTransport::new(list),
            Arc::new(InMemoryKeyValueStore::new()),
            ReconcilerOptions::default(),
        )
        .await
    }

    /// A session over `backing`, which other harnesses may share.
    async fn sharing(
        list: Vec<Notification>,
        backing: &Arc<InMemoryKeyValueStore>,
        options: ReconcilerOptions,
    ) -> Self {
        Self::with(ScriptedTransport::new(list), backing.clone(), options).await
    }

    async fn with(
        transport: ScriptedTransport,
        backing: Arc<InMemoryKeyValueStore>,
        options: ReconcilerOptions,
    ) -> Self {
        let transport = Arc::new(transport);
        let presenter = Arc::new(RecordingPresenter::default());
        let store = Arc::new(KeyValueSeenSetStore::new(backing.clone(), KEY));
        let reconciler = Arc::new(
            Reconciler::new(transport.clone(), presenter.clone(), store, options).await,
        );
        Self {
            transport,
            presenter,
            backing,
            reconciler,
        }
    }

    async fn cycle(&self) -> CycleReport {
        completed(self.reconciler.run_cycle().await.unwrap())
    }

    fn stored(&self) -> Option<String> {
        self.backing.get(KEY)
    }
}

// --- Scenarios ---

#[tokio::test]
async fn test_scenario_dismissal_suppresses_reshow() {
    let h = Harness::new(vec![note(1, true)]).await;

    h.cycle().await;
    assert_eq!(h.presenter.shown_ids(), vec![id(1)]);

    let outcome = h.reconciler.on_dismiss(&id(1)).await.unwrap();
    assert_eq!(outcome, DismissOutcome::Remembered);
    assert_eq!(h.reconciler.seen_set().await, seen(&[1]));
    assert_eq!(h.stored().as_deref(), Some("1"));

    let report = h.cycle().await;
    assert!(report.shown.is_empty());
    assert_eq!(h.presenter.shown_ids(), vec![id(1)]);
}

#[tokio::test]
async fn test_scenario_server_resolution_retracts_then_garbage_collects() {
    let h = Harness::new(vec![note(2, false)]).await;
    h.cycle().await;
    let handle = h.presenter.handle_of(&id(2));

    h.transport.set_list(vec![]);
    let report = h.cycle().await;
    assert_eq!(h.presenter.removed(), vec![handle]);
    assert_eq!(report.resolved, vec![id(2)]);
    assert_eq!(h.reconciler.seen_set().await, seen(&[2]));
    assert_eq!(h.stored().as_deref(), Some("2"));
    assert!(h.reconciler.registry_entries().await.is_empty());

    let report = h.cycle().await;
    assert_eq!(report.garbage_collected, vec![id(2)]);
    assert!(h.reconciler.seen_set().await.is_empty());
    assert_eq!(h.stored().as_deref(), Some(""));
}

#[tokio::test]
async fn test_scenario_failed_fetch_changes_nothing() {
    let h = Harness::new(vec![note(1, true), note(2, true)]).await;
    h.cycle().await;
    h.reconciler.on_dismiss(&id(1)).await.unwrap();

    let entries_before = h.reconciler.registry_entries().await;
    let seen_before = h.reconciler.seen_set().await;
    let stored_before = h.stored();
    let calls_before = h.presenter.call_count();
    let mut events = h.reconciler.subscribe_to_events();

    h.transport.fail_with(TransportError::Network("connection reset".to_string()));
    match h.reconciler.run_cycle().await {
        Err(NotificationError::Transport(TransportError::Network(msg))) => {
            assert_eq!(msg, "connection reset")
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(h.reconciler.registry_entries().await, entries_before);
    assert_eq!(h.reconciler.seen_set().await, seen_before);
    assert_eq!(h.stored(), stored_before);
    assert_eq!(h.presenter.call_count(), calls_before);
    assert!(matches!(
        events.recv().await.unwrap(),
        ReconcilerEvent::CycleFailed(TransportError::Network(_))
    ));
}

// --- Properties ---

#[tokio::test]
async fn test_seen_ids_are_not_reshown_in_a_new_session() {
    let backing = Arc::new(InMemoryKeyValueStore::new());
    let list = vec![note(1, true), note(2, true)];
    let first = Harness::sharing(list.clone(), &backing, ReconcilerOptions::default()).await;
    first.cycle().await;
    first.reconciler.on_dismiss(&id(1)).await.unwrap();
    drop(first);

    let second = Harness::sharing(list, &backing, ReconcilerOptions::default()).await;
    let report = second.cycle().await;
    assert_eq!(report.shown, vec![id(2)]);
    assert_eq!(report.suppressed, vec![id(1)]);
}

#[tokio::test]
async fn test_dismissal_is_durable_before_the_next_cycle() {
    let temp_dir = TempDir::new().unwrap();
    let kv = Arc::new(FilesystemKeyValueStore::new(temp_dir.path()));
    let transport = Arc::new(ScriptedTransport::new(vec![note(9, true)]));
    let presenter = Arc::new(RecordingPresenter::default());
    let reconciler = Reconciler::new(
        transport,
        presenter,
        Arc::new(KeyValueSeenSetStore::new(kv, KEY)),
        ReconcilerOptions::default(),
    )
    .await;
    completed(reconciler.run_cycle().await.unwrap());

    reconciler.on_dismiss(&id(9)).await.unwrap();

    let fresh =
        KeyValueSeenSetStore::new(Arc::new(FilesystemKeyValueStore::new(temp_dir.path())), KEY);
    assert_eq!(fresh.load().await, seen(&[9]));
}

#[tokio::test]
async fn test_garbage_collected_id_is_shown_again_when_it_returns() {
    let h = Harness::new(vec![note(5, true)]).await;
    h.cycle().await;
    h.reconciler.on_dismiss(&id(5)).await.unwrap();

    h.transport.set_list(vec![]);
    let report = h.cycle().await;
    // Hidden entries leave quietly; only the stale seen id goes.
    assert!(report.resolved.is_empty());
    assert_eq!(report.garbage_collected, vec![id(5)]);
    assert!(h.reconciler.seen_set().await.is_empty());

    h.transport.set_list(vec![note(5, true)]);
    let report = h.cycle().await;
    assert_eq!(report.shown, vec![id(5)]);
    assert_eq!(h.presenter.shown_ids(), vec![id(5), id(5)]);
}

#[tokio::test]
async fn test_unchanged_list_is_idempotent() {
    let h = Harness::new(vec![note(1, true), note(2, false), note(3, true)]).await;
    let first = h.cycle().await;
    assert_eq!(first.shown, vec![id(1), id(2), id(3)]);
    let calls = h.presenter.call_count();

    let second = h.cycle().await;
    assert!(second.shown.is_empty());
    assert!(second.resolved.is_empty());
    assert_eq!(h.presenter.call_count(), calls);
}

#[tokio::test]
async fn test_new_notifications_are_shown_in_server_order() {
    let h = Harness::new(vec![note(30, false), note(10, false), note(20, false)]).await;
    h.cycle().await;
    assert_eq!(h.presenter.shown_ids(), vec![id(30), id(10), id(20)]);
}

// --- Failure handling ---

#[tokio::test]
async fn test_remove_failure_does_not_stop_the_cycle() {
    let h = Harness::new(vec![note(1, false), note(2, false)]).await;
    h.cycle().await;
    h.presenter.fail_remove.store(true, Ordering::SeqCst);

    h.transport.set_list(vec![note(3, false)]);
    let report = h.cycle().await;

    assert_eq!(report.shown, vec![id(3)]);
    assert_eq!(report.resolved, vec![id(1), id(2)]);
    assert_eq!(report.presenter_errors.len(), 2);
    assert!(report.persisted);
    assert_eq!(h.stored().as_deref(), Some("1,2"));
}

#[tokio::test]
async fn test_failed_save_is_retried_next_cycle() {
    let h = Harness::new(vec![note(1, false)]).await;
    h.cycle().await;

    h.backing.set_fail_writes(true);
    h.transport.set_list(vec![]);
    let report = h.cycle().await;
    assert!(!report.persisted);
    assert_eq!(h.reconciler.seen_set().await, seen(&[1]));
    assert_eq!(h.stored().as_deref(), Some(""));

    h.backing.set_fail_writes(false);
    h.transport.set_list(vec![note(1, false)]);
    let report = h.cycle().await;
    assert!(report.persisted);
    assert_eq!(report.suppressed, vec![id(1)]);
    assert_eq!(h.stored().as_deref(), Some("1"));
}

#[tokio::test]
async fn test_failed_dismissal_save_is_retried_next_cycle() {
    let h = Harness::new(vec![note(4, true)]).await;
    h.cycle().await;

    h.backing.set_fail_writes(true);
    assert_eq!(
        h.reconciler.on_dismiss(&id(4)).await.unwrap(),
        DismissOutcome::RememberedPendingSave
    );
    assert_eq!(h.stored().as_deref(), Some(""));

    h.backing.set_fail_writes(false);
    assert!(h.cycle().await.persisted);
    assert_eq!(h.stored().as_deref(), Some("4"));
}

#[tokio::test]
async fn test_repeated_dismissal_is_already_seen() {
    let h = Harness::new(vec![note(6, true)]).await;
    h.cycle().await;
    assert_eq!(h.reconciler.on_dismiss(&id(6)).await.unwrap(), DismissOutcome::Remembered);
    assert_eq!(h.reconciler.on_dismiss(&id(6)).await.unwrap(), DismissOutcome::AlreadySeen);
}

// --- Concurrency ---

#[tokio::test]
async fn test_cycle_requested_while_one_is_in_flight_is_coalesced() {
    let h = Harness::with(
        ScriptedTransport::gated(vec![note(1, true)]),
        Arc::new(InMemoryKeyValueStore::new()),
        ReconcilerOptions::default(),
    )
    .await;

    let background = h.reconciler.clone();
    let in_flight = tokio::spawn(async move { background.run_cycle().await });
    while h.transport.fetches.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert_eq!(h.reconciler.run_cycle().await.unwrap(), CycleOutcome::Coalesced);
    assert_eq!(h.transport.fetches.load(Ordering::SeqCst), 1);

    h.transport.gate.as_ref().unwrap().add_permits(1);
    let report = completed(in_flight.await.unwrap().unwrap());
    assert_eq!(report.shown, vec![id(1)]);
}

#[tokio::test]
async fn test_dismissal_from_another_session_closes_notification_when_synced() {
    let backing = Arc::new(InMemoryKeyValueStore::new());
    let options = ReconcilerOptions {
        sync_external_dismissals: true,
    };
    let list = vec![note(1, true), note(2, true)];
    let here = Harness::sharing(list.clone(), &backing, options).await;
    let elsewhere = Harness::sharing(list, &backing, options).await;
    here.cycle().await;
    elsewhere.cycle().await;

    elsewhere.reconciler.on_dismiss(&id(1)).await.unwrap();
    assert_eq!(backing.get(KEY).as_deref(), Some("1"));

    let report = here.cycle().await;
    assert_eq!(report.externally_dismissed, vec![id(1)]);
    assert_eq!(here.presenter.removed(), vec![here.presenter.handle_of(&id(1))]);
    assert_eq!(here.reconciler.seen_set().await, seen(&[1]));

    let entries = here.reconciler.registry_entries().await;
    let (_, entry) = entries.iter().find(|(entry_id, _)| *entry_id == id(1)).unwrap();
    assert!(!entry.is_visible());
}

// --- Dismissal sink and events ---

#[tokio::test]
async fn test_dismissal_sink_forwards_until_reconciler_is_dropped() {
    let h = Harness::new(vec![note(1, true)]).await;
    h.cycle().await;
    let sink = h.reconciler.dismissal_sink();

    assert_eq!(sink.dismiss(&id(1)).await.unwrap(), DismissOutcome::Remembered);

    drop(h);
    assert!(matches!(sink.dismiss(&id(1)).await, Err(NotificationError::ReconcilerGone)));
}

#[tokio::test]
async fn test_events_follow_the_cycle() {
    let h = Harness::new(vec![note(1, true)]).await;
    let mut events = h.reconciler.subscribe_to_events();

    h.cycle().await;
    let handle = h.presenter.handle_of(&id(1));
    assert_eq!(events.recv().await.unwrap(), ReconcilerEvent::Shown { id: id(1), handle });
    assert!(matches!(
        events.recv().await.unwrap(),
        ReconcilerEvent::CycleCompleted(report) if report.shown == vec![id(1)]
    ));

    h.reconciler.on_dismiss(&id(1)).await.unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        ReconcilerEvent::Dismissed {
            id: id(1),
            outcome: DismissOutcome::Remembered
        }
    );
}
