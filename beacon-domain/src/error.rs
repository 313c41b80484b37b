//! Top-level error type of the domain layer.

use beacon_core::CoreError;
use thiserror::Error;

use crate::notifications::NotificationError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Notification(#[from] NotificationError),
}

pub type DomainResult<T> = Result<T, DomainError>;
