//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Reservation identifier (snowflake-style, see [`crate::util::snowflake_id`])
pub type ReservationId = i64;

/// Notification identifier
pub type NotificationId = i64;
