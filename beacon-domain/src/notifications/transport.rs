//! Source of the server-authoritative notification list.

use async_trait::async_trait;

use super::errors::TransportError;
use super::types::Notification;

/// Fetches the list of notifications currently active on the server.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Returns the current list in server order. Either error kind aborts the cycle.
    async fn fetch(&self) -> Result<Vec<Notification>, TransportError>;
}

/// Decodes a status endpoint body: a JSON array of notification objects.
///
/// # Arguments
///
/// * `payload` - Body as received, e.g.
///   `[{"id": 7, "message": "Maintenance at 18:00", "level": "warning", "dismissible": true}]`.
///
/// # Returns
///
/// The notifications in payload order. Integer ids become their decimal string;
/// `level` defaults to `info` and `dismissible` to `false`.
///
/// # Errors
///
/// [`TransportError::Decode`] if the body is not such an array, or if any id is
/// empty or contains `,`. One bad entry rejects the whole payload.
pub fn decode_status_payload(payload: &str) -> Result<Vec<Notification>, TransportError> {
    Ok(serde_json::from_str(payload)?)
}
