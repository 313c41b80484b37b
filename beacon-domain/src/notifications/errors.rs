use beacon_core::CoreError;
use thiserror::Error;

use super::types::NotificationId;

/// A value that cannot serve as a [`NotificationId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid notification id '{raw}': {reason}")]
pub struct InvalidNotificationId {
    pub raw: String,
    pub reason: &'static str,
}

impl InvalidNotificationId {
    pub fn new(raw: impl Into<String>, reason: &'static str) -> Self {
        Self {
            raw: raw.into(),
            reason,
        }
    }
}

/// Failure to obtain the current notification list. Both kinds abort the cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Notification source unreachable: {0}")]
    Network(String),

    #[error("Failed to decode notification payload: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}

/// Failure to write the durable seen-set.
#[derive(Debug, Error)]
#[error("Persistence error during operation '{operation}': {message}: {source}")]
pub struct PersistenceError {
    pub operation: String,
    pub message: String,
    #[source]
    pub source: CoreError,
}

impl PersistenceError {
    pub fn from_core(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: CoreError,
    ) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }
}

/// The host UI could not render or retract a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenterError {
    #[error("Failed to show notification: {0}")]
    Show(String),

    #[error("Failed to remove notification: {0}")]
    Remove(String),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification '{0}' is not tracked in this session.")]
    NotFound(NotificationId),

    #[error(transparent)]
    InvalidId(#[from] InvalidNotificationId),

    #[error("Reconciliation cycle aborted: {0}")]
    Transport(#[from] TransportError),

    #[error("The reconciler for this session has been shut down.")]
    ReconcilerGone,

    #[error("The notification scheduler is no longer running.")]
    SchedulerStopped,

    /// A close was reported while the reconciler was awaiting the presenter.
    #[error("Dismissal of '{0}' was reported from inside a presenter call.")]
    ReentrantDismissal(NotificationId),
}
