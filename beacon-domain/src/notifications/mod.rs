//! Notification reconciliation and deduplication.
//!
//! Fetches the server-authoritative notification list, shows each notification
//! at most once per seen-set lifetime, and remembers user dismissals across
//! sessions.
//!
//! Main entry points:
//! - [`Reconciler`]: per-session owner of the registry and seen-set.
//! - [`Scheduler`]: runs cycles on an interval or on host lifecycle events.
//! - [`KeyValueSeenSetStore`]: durable seen-set over any key/value store.
//! - [`NotificationTransport`] and [`NotificationPresenter`]: the host's side.

pub mod errors;
pub mod persistence;
pub mod persistence_iface;
pub mod presenter;
pub mod reconciler;
pub mod registry;
pub mod scheduler;
pub mod seen_set;
pub mod transport;
pub mod types;

pub use errors::{
    InvalidNotificationId, NotificationError, PersistenceError, PresenterError, TransportError,
};
pub use persistence::KeyValueSeenSetStore;
pub use persistence_iface::SeenSetStore;
pub use presenter::NotificationPresenter;
pub use reconciler::{
    CycleOutcome, CycleReport, DismissOutcome, DismissalSink, Reconciler, ReconcilerEvent,
    ReconcilerOptions,
};
pub use registry::NotificationRegistry;
pub use scheduler::{HostEvent, Scheduler, SchedulerHandle, SchedulerMode};
pub use seen_set::SeenSet;
pub use transport::{decode_status_payload, NotificationTransport};
pub use types::{Notification, NotificationId, NotificationLevel, PresenterHandle, RegistryEntry};
