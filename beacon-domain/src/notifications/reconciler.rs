//! The reconciliation engine.
//!
//! A [`Reconciler`] owns the session's [`NotificationRegistry`] and the resident
//! [`SeenSet`]. Each call to [`Reconciler::run_cycle`] fetches the server list,
//! shows what is new, retracts what the server resolved, garbage-collects the
//! seen-set and persists it. [`Reconciler::on_dismiss`] records user closes.
//!
//! Only the fetch happens outside the state lock. The mutation phase of a cycle
//! and every dismissal are serialised by one `tokio::sync::Mutex`. Presenters
//! report closes from their own task (see [`DismissalSink`]); a dismissal made
//! while [`NotificationPresenter::show`] or [`NotificationPresenter::remove`] is
//! still being awaited fails with [`NotificationError::ReentrantDismissal`].

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use super::errors::{NotificationError, PresenterError, TransportError};
use super::persistence_iface::SeenSetStore;
use super::presenter::NotificationPresenter;
use super::registry::NotificationRegistry;
use super::seen_set::SeenSet;
use super::transport::NotificationTransport;
use super::types::{Notification, NotificationId, PresenterHandle, RegistryEntry};

const EVENT_CHANNEL_CAPACITY: usize = 128;

tokio::task_local! {
    /// Set while a presenter call is awaited with the state locked.
    static PRESENTER_CALL: ();
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilerOptions {
    /// Merge ids dismissed by other sessions sharing the same storage into the
    /// resident seen-set on every cycle, closing them here as well.
    pub sync_external_dismissals: bool,
}

/// What a single completed cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Newly presented, in server order.
    pub shown: Vec<NotificationId>,
    /// Reported by the server but held back because they are in the seen-set.
    pub suppressed: Vec<NotificationId>,
    /// Visible notifications the server stopped reporting; retracted and added to the seen-set.
    pub resolved: Vec<NotificationId>,
    /// Seen ids dropped because the server no longer reports them.
    pub garbage_collected: Vec<NotificationId>,
    /// Visible notifications closed because another session dismissed them.
    pub externally_dismissed: Vec<NotificationId>,
    pub presenter_errors: Vec<(NotificationId, PresenterError)>,
    /// Whether the seen-set reached durable storage at the end of the cycle.
    pub persisted: bool,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    /// Another cycle was in flight; this trigger was dropped.
    Coalesced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    /// Added to the seen-set and persisted.
    Remembered,
    /// Added to the seen-set; the save failed and is retried on the next cycle.
    RememberedPendingSave,
    /// Not dismissible: hidden for this session only.
    NotRemembered,
    AlreadySeen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcilerEvent {
    Shown { id: NotificationId, handle: PresenterHandle },
    Removed { id: NotificationId },
    Dismissed { id: NotificationId, outcome: DismissOutcome },
    CycleCompleted(CycleReport),
    CycleFailed(TransportError),
}

struct ReconcilerState {
    registry: NotificationRegistry,
    seen: SeenSet,
    /// The last save did not reach storage.
    pending_save: bool,
}

/// Clears the in-flight flag however the cycle ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Reconciler {
    transport: Arc<dyn NotificationTransport>,
    presenter: Arc<dyn NotificationPresenter>,
    store: Arc<dyn SeenSetStore>,
    options: ReconcilerOptions,
    state: Mutex<ReconcilerState>,
    cycle_in_flight: AtomicBool,
    event_publisher: broadcast::Sender<ReconcilerEvent>,
}

impl Reconciler {
    /// Creates a reconciler for one host session, loading the seen-set once.
    ///
    /// # Arguments
    ///
    /// * `transport` - Source of the server's current notification list.
    /// * `presenter` - Host surface that displays notifications.
    /// * `store` - Durable home of the seen-set.
    /// * `options` - See [`ReconcilerOptions`].
    pub async fn new(
        transport: Arc<dyn NotificationTransport>,
        presenter: Arc<dyn NotificationPresenter>,
        store: Arc<dyn SeenSetStore>,
        options: ReconcilerOptions,
    ) -> Self {
        let seen = store.load().await;
        info!("Reconciler starting with {} seen notification ids", seen.len());
        let (event_publisher, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            transport,
            presenter,
            store,
            options,
            state: Mutex::new(ReconcilerState {
                registry: NotificationRegistry::new(),
                seen,
                pending_save: false,
            }),
            cycle_in_flight: AtomicBool::new(false),
            event_publisher,
        }
    }

    pub fn subscribe_to_events(&self) -> broadcast::Receiver<ReconcilerEvent> {
        self.event_publisher.subscribe()
    }

    /// A weak handle presenters use to report user closes.
    pub fn dismissal_sink(self: &Arc<Self>) -> DismissalSink {
        DismissalSink {
            reconciler: Arc::downgrade(self),
        }
    }

    /// Copy of the resident seen-set.
    pub async fn seen_set(&self) -> SeenSet {
        self.state.lock().await.seen.clone()
    }

    /// Copy of every registry entry, ordered by id.
    pub async fn registry_entries(&self) -> Vec<(NotificationId, RegistryEntry)> {
        let state = self.state.lock().await;
        state
            .registry
            .entries()
            .map(|(id, entry)| (id.clone(), entry.clone()))
            .collect()
    }

    async fn present(
        &self,
        notification: &Notification,
    ) -> Result<PresenterHandle, PresenterError> {
        PRESENTER_CALL.scope((), self.presenter.show(notification)).await
    }

    async fn retract(&self, handle: PresenterHandle) -> Result<(), PresenterError> {
        PRESENTER_CALL.scope((), self.presenter.remove(handle)).await
    }

    fn publish(&self, event: ReconcilerEvent) {
        // No subscribers is not an error.
        let _ = self.event_publisher.send(event);
    }

    /// Runs one reconciliation cycle.
    ///
    /// # Returns
    ///
    /// [`CycleOutcome::Coalesced`] if a cycle is already in flight, otherwise the
    /// [`CycleReport`] of the completed cycle. Presenter and save failures are
    /// recorded in the report; they do not fail the cycle.
    ///
    /// # Errors
    ///
    /// [`NotificationError::Transport`] if the fetch fails. Nothing is mutated
    /// and the presenter is not called.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, NotificationError> {
        let _in_flight = match InFlightGuard::acquire(&self.cycle_in_flight) {
            Some(guard) => guard,
            None => {
                debug!("Reconciliation cycle already in flight; coalescing trigger");
                return Ok(CycleOutcome::Coalesced);
            }
        };

        let current_list = match self.transport.fetch().await {
            Ok(list) => list,
            Err(e) => {
                warn!("Fetching notifications failed, cycle aborted: {}", e);
                self.publish(ReconcilerEvent::CycleFailed(e.clone()));
                return Err(e.into());
            }
        };
        debug!("Fetched {} notifications", current_list.len());

        let external_seen = if self.options.sync_external_dismissals {
            Some(self.store.load().await)
        } else {
            None
        };

        let mut state = self.state.lock().await;
        let ReconcilerState {
            registry,
            seen,
            pending_save,
        } = &mut *state;

        let mut events = Vec::new();
        let mut presenter_errors = Vec::new();

        let mut externally_dismissed = Vec::new();
        if let Some(external) = external_seen {
            seen.extend(external.iter().cloned());
            for (id, entry) in registry.entries_mut() {
                if !entry.is_visible() || !seen.contains(id) {
                    continue;
                }
                if let Some(handle) = entry.hide() {
                    if let Err(e) = self.retract(handle).await {
                        error!(
                            "Failed to retract notification '{}' dismissed elsewhere: {}",
                            id, e
                        );
                        presenter_errors.push((id.clone(), e));
                    }
                }
                externally_dismissed.push(id.clone());
                events.push(ReconcilerEvent::Removed { id: id.clone() });
            }
        }

        let current_ids: BTreeSet<NotificationId> =
            current_list.iter().map(|n| n.id.clone()).collect();

        let mut shown = Vec::new();
        let mut suppressed = Vec::new();
        let mut processed = HashSet::new();
        for notification in &current_list {
            if !processed.insert(notification.id.clone()) {
                debug!("Ignoring duplicate entry for notification '{}'", notification.id);
                continue;
            }
            if registry.has(&notification.id) {
                continue;
            }
            if seen.contains(&notification.id) {
                suppressed.push(notification.id.clone());
                continue;
            }
            match self.present(notification).await {
                Ok(handle) => {
                    debug!("Showing notification '{}'", notification.id);
                    registry.upsert(
                        notification.id.clone(),
                        RegistryEntry::shown(notification.clone(), handle),
                    );
                    shown.push(notification.id.clone());
                    events.push(ReconcilerEvent::Shown {
                        id: notification.id.clone(),
                        handle,
                    });
                }
                Err(e) => {
                    // No entry, so the next cycle tries again.
                    error!("Failed to show notification '{}': {}", notification.id, e);
                    presenter_errors.push((notification.id.clone(), e));
                }
            }
        }

        let stale: Vec<NotificationId> = registry
            .ids()
            .filter(|id| !current_ids.contains(*id))
            .cloned()
            .collect();
        let mut resolved = Vec::new();
        for id in stale {
            let Some(mut entry) = registry.remove(&id) else {
                continue;
            };
            if !entry.is_visible() {
                continue;
            }
            if let Some(handle) = entry.hide() {
                if let Err(e) = self.retract(handle).await {
                    error!("Failed to retract resolved notification '{}': {}", id, e);
                    presenter_errors.push((id.clone(), e));
                }
            }
            debug!("Notification '{}' resolved by the server", id);
            events.push(ReconcilerEvent::Removed { id: id.clone() });
            resolved.push(id);
        }

        let garbage_collected = seen.retain_collect(|id| current_ids.contains(id));
        seen.extend(resolved.iter().cloned());

        if *pending_save {
            info!("Retrying seen-set save that failed earlier");
        }
        let persisted = match self.store.save(seen).await {
            Ok(()) => {
                *pending_save = false;
                true
            }
            Err(e) => {
                warn!("Failed to persist seen-set; retrying next cycle: {}", e);
                *pending_save = true;
                false
            }
        };

        let report = CycleReport {
            shown,
            suppressed,
            resolved,
            garbage_collected,
            externally_dismissed,
            presenter_errors,
            persisted,
            completed_at: Utc::now(),
        };
        let visible = registry.visible_count();
        let tracked = registry.len();
        drop(state);

        info!(
            visible,
            tracked,
            shown = report.shown.len(),
            suppressed = report.suppressed.len(),
            resolved = report.resolved.len(),
            garbage_collected = report.garbage_collected.len(),
            persisted = report.persisted,
            "Reconciliation cycle completed"
        );
        for event in events {
            self.publish(event);
        }
        self.publish(ReconcilerEvent::CycleCompleted(report.clone()));
        Ok(CycleOutcome::Completed(report))
    }

    /// Records that the user closed notification `id`.
    ///
    /// The entry is marked hidden. A dismissible notification not yet in the
    /// seen-set is added and persisted before this returns.
    ///
    /// # Errors
    ///
    /// [`NotificationError::NotFound`] if `id` is not tracked in this session,
    /// [`NotificationError::ReentrantDismissal`] if called from inside a presenter call.
    pub async fn on_dismiss(
        &self,
        id: &NotificationId,
    ) -> Result<DismissOutcome, NotificationError> {
        if PRESENTER_CALL.try_with(|_| ()).is_ok() {
            warn!("Dismissal of '{}' reported from inside a presenter call; rejected", id);
            return Err(NotificationError::ReentrantDismissal(id.clone()));
        }
        let mut state = self.state.lock().await;
        let ReconcilerState {
            registry,
            seen,
            pending_save,
        } = &mut *state;

        let entry = registry
            .get_mut(id)
            .ok_or_else(|| NotificationError::NotFound(id.clone()))?;
        // The presenter already closed it; the handle is spent.
        entry.hide();

        let outcome = if !entry.notification.dismissible {
            DismissOutcome::NotRemembered
        } else if !seen.insert(id.clone()) {
            DismissOutcome::AlreadySeen
        } else {
            match self.store.save(seen).await {
                Ok(()) => {
                    *pending_save = false;
                    DismissOutcome::Remembered
                }
                Err(e) => {
                    warn!("Failed to persist dismissal of '{}'; retrying next cycle: {}", id, e);
                    *pending_save = true;
                    DismissOutcome::RememberedPendingSave
                }
            }
        };
        drop(state);

        debug!("Notification '{}' dismissed: {:?}", id, outcome);
        self.publish(ReconcilerEvent::Dismissed {
            id: id.clone(),
            outcome,
        });
        Ok(outcome)
    }
}

/// Weak reference to a [`Reconciler`] held by presenters.
#[derive(Clone)]
pub struct DismissalSink {
    reconciler: Weak<Reconciler>,
}

impl DismissalSink {
    /// Forwards a user close to [`Reconciler::on_dismiss`].
    ///
    /// # Errors
    ///
    /// [`NotificationError::ReconcilerGone`] once the reconciler has been dropped.
    pub async fn dismiss(&self, id: &NotificationId) -> Result<DismissOutcome, NotificationError> {
        let reconciler = self
            .reconciler
            .upgrade()
            .ok_or(NotificationError::ReconcilerGone)?;
        reconciler.on_dismiss(id).await
    }
}
