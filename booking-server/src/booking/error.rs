use crate::store::StoreError;
use shared::types::ReservationId;
use thiserror::Error;

/// Booking errors surfaced to the caller
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Scheduling conflict with reservation(s) {conflicting:?}")]
    SchedulingConflict { conflicting: Vec<ReservationId> },

    #[error("Reservation store unavailable")]
    StoreUnavailable,

    #[error("Storage error: {0}")]
    Store(String),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

/// 将存储错误归类为业务错误
impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => Self::StoreUnavailable,
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::SlotTaken(conflicting) => {
                // The adapter caught an overlap the pre-flight check missed
                // (concurrent booking); same outcome for the caller.
                tracing::debug!(?conflicting, "Write-time scheduling conflict");
                Self::SchedulingConflict { conflicting }
            }
            other => {
                tracing::error!(error = %other, "Storage error");
                Self::Store(other.to_string())
            }
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
