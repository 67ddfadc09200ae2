//! Notification Model

use crate::types::{NotificationId, ReservationId, Timestamp};
use crate::util;
use serde::{Deserialize, Serialize};

/// Notification record tied to a user and optionally a reservation
///
/// Created once by the engine, immutable afterwards. Delivery, read
/// state and deletion belong to the notification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<ReservationId>,
    pub created_at: Timestamp,
}

impl Notification {
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        reservation_id: Option<ReservationId>,
    ) -> Self {
        Self {
            id: util::snowflake_id(),
            user_id: user_id.into(),
            message: message.into(),
            reservation_id,
            created_at: util::now_millis(),
        }
    }
}
