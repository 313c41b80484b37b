use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::InvalidNotificationId;

/// Separator used when the seen-set is written to durable storage.
pub const ID_DELIMITER: char = ',';

/// Server-assigned identifier of a logical notification.
///
/// The status endpoint sends ids as JSON strings or integers; both normalise to
/// the same textual form so `7` and `"7"` compare equal. An id is never empty,
/// never contains [`ID_DELIMITER`] and never contains control characters, so it
/// always survives a round trip through the comma-joined storage format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "WireId", into = "String")]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidNotificationId> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidNotificationId::new(raw, "id is empty"));
        }
        if trimmed.contains(ID_DELIMITER) {
            return Err(InvalidNotificationId::new(raw, "id contains the storage delimiter ','"));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(InvalidNotificationId::new(raw, "id contains control characters"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NotificationId> for String {
    fn from(id: NotificationId) -> Self {
        id.0
    }
}

impl From<u64> for NotificationId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<&str> for NotificationId {
    type Error = InvalidNotificationId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Shape of an id on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl TryFrom<WireId> for NotificationId {
    type Error = InvalidNotificationId;

    fn try_from(wire: WireId) -> Result<Self, Self::Error> {
        match wire {
            WireId::Text(text) => Self::new(text),
            WireId::Signed(number) => Self::new(number.to_string()),
            WireId::Unsigned(number) => Self::new(number.to_string()),
        }
    }
}

/// Severity tag forwarded untouched to the presenter.
///
/// The engine never branches on it; unrecognised tags are kept verbatim in
/// [`NotificationLevel::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Other(String),
}

impl NotificationLevel {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
            NotificationLevel::Other(tag) => tag,
        }
    }
}

impl From<String> for NotificationLevel {
    fn from(tag: String) -> Self {
        match tag.to_lowercase().as_str() {
            "info" => NotificationLevel::Info,
            "success" => NotificationLevel::Success,
            "warning" | "warn" => NotificationLevel::Warning,
            "error" => NotificationLevel::Error,
            _ => NotificationLevel::Other(tag),
        }
    }
}

impl From<NotificationLevel> for String {
    fn from(level: NotificationLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification as reported by the server. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(default)]
    pub level: NotificationLevel,
    /// Whether a user close should be remembered permanently.
    #[serde(default)]
    pub dismissible: bool,
}

impl Notification {
    pub fn new(
        id: NotificationId,
        message: impl Into<String>,
        level: NotificationLevel,
        dismissible: bool,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            level,
            dismissible,
        }
    }
}

/// Opaque reference to a displayed notification, minted by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PresenterHandle(u64);

impl PresenterHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Session-scoped bookkeeping for one notification the reconciler has observed.
///
/// `visible` and `presenter_handle` only change together, through [`RegistryEntry::shown`]
/// and [`RegistryEntry::hide`], so a visible entry always owns exactly one handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub notification: Notification,
    visible: bool,
    presenter_handle: Option<PresenterHandle>,
}

impl RegistryEntry {
    pub fn shown(notification: Notification, handle: PresenterHandle) -> Self {
        Self {
            notification,
            visible: true,
            presenter_handle: Some(handle),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn presenter_handle(&self) -> Option<PresenterHandle> {
        self.presenter_handle
    }

    /// Marks the entry hidden and hands back the handle it held, if any.
    pub fn hide(&mut self) -> Option<PresenterHandle> {
        self.visible = false;
        self.presenter_handle.take()
    }
}
