//! Reservation lifecycle events
//!
//! Broadcast after a successful commit so that interested parties
//! (schedule views, availability boards) can refresh without polling.

use serde::{Deserialize, Serialize};
use shared::models::Reservation;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReservationEvent {
    Created(Reservation),
    Updated(Reservation),
    Cancelled(Reservation),
}

impl ReservationEvent {
    pub fn reservation(&self) -> &Reservation {
        match self {
            Self::Created(r) | Self::Updated(r) | Self::Cancelled(r) => r,
        }
    }
}
