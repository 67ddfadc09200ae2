//! Notification Emitter
//!
//! Fire-and-forget creation of notification records on reservation
//! lifecycle events. A failed write is logged and swallowed; it never
//! rolls back or fails the reservation operation that triggered it.

use crate::store::{NotificationSink, StoreResult};
use shared::models::Notification;
use shared::types::ReservationId;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationEmitter {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationEmitter {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Persist a notification record, best-effort
    pub fn emit(
        &self,
        user_id: &str,
        message: impl Into<String>,
        reservation_id: Option<ReservationId>,
    ) {
        let notification = Notification::new(user_id, message, reservation_id);
        if let Err(e) = self.sink.append(notification) {
            tracing::warn!(user_id = %user_id, error = %e, "Failed to persist notification");
        }
    }

    /// Notifications for a user, newest first
    pub fn for_user(&self, user_id: &str) -> StoreResult<Vec<Notification>> {
        self.sink.for_user(user_id)
    }
}

impl std::fmt::Debug for NotificationEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationEmitter").finish()
    }
}
