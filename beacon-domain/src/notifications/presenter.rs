//! Host UI surface that renders notifications.

use async_trait::async_trait;

use super::errors::PresenterError;
use super::types::{Notification, PresenterHandle};

/// Renders and retracts notifications.
///
/// Implementations report user closes back through a
/// [`DismissalSink`](super::reconciler::DismissalSink), once per close.
#[async_trait]
pub trait NotificationPresenter: Send + Sync {
    /// Displays `notification` and returns a handle to the displayed instance.
    async fn show(&self, notification: &Notification) -> Result<PresenterHandle, PresenterError>;

    /// Retracts a previously displayed instance.
    async fn remove(&self, handle: PresenterHandle) -> Result<(), PresenterError>;
}
