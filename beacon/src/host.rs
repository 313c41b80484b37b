//! Host-side collaborators for the demo binary.

use async_trait::async_trait;
use beacon_domain::notifications::{
    decode_status_payload, Notification, NotificationPresenter, NotificationTransport,
    PresenterError, PresenterHandle, TransportError,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Re-reads a JSON status snapshot on every fetch.
///
/// Whatever writes the file plays the part of the status endpoint. A missing or
/// unreadable file counts as the source being unreachable.
pub struct SnapshotFileTransport {
    path: PathBuf,
}

impl SnapshotFileTransport {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl NotificationTransport for SnapshotFileTransport {
    async fn fetch(&self) -> Result<Vec<Notification>, TransportError> {
        debug!("Reading status snapshot from {:?}", self.path);
        let payload = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TransportError::Network(format!("cannot read {:?}: {}", self.path, e)))?;
        decode_status_payload(&payload)
    }
}

/// Writes shown and retracted notifications to the log.
#[derive(Default)]
pub struct LoggingPresenter {
    next_handle: AtomicU64,
}

#[async_trait]
impl NotificationPresenter for LoggingPresenter {
    async fn show(&self, notification: &Notification) -> Result<PresenterHandle, PresenterError> {
        let handle = PresenterHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed));
        info!(
            id = %notification.id,
            level = %notification.level,
            dismissible = notification.dismissible,
            handle = handle.raw(),
            "NOTIFICATION: {}",
            notification.message
        );
        Ok(handle)
    }

    async fn remove(&self, handle: PresenterHandle) -> Result<(), PresenterError> {
        info!(handle = handle.raw(), "Notification retracted");
        Ok(())
    }
}
