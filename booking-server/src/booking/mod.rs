//! ReservationManager - lifecycle orchestration for reservations
//!
//! This module handles:
//! - Input validation and timestamp parsing
//! - Ownership/role authorization
//! - Conflict detection against the room's active reservations
//! - Persistence through the storage adapter
//! - Best-effort notification emission and event broadcasting
//!
//! # Operation Flow
//!
//! ```text
//! create(actor, req)
//!     ├─ 1. Role gate (participants are read-only)
//!     ├─ 2. Validate room_id, parse start/end, start < end
//!     ├─ 3. Resolve owner (coordinator may book on behalf of others)
//!     ├─ 4. Room directory check (when a directory is wired in)
//!     ├─ 5. Conflict check against active reservations of the room
//!     ├─ 6. Persist (adapter re-verifies overlap at write time)
//!     ├─ 7. Emit notification to the owner (best-effort)
//!     ├─ 8. Broadcast Created event
//!     └─ 9. Return the persisted reservation
//! ```
//!
//! Reservations are never deleted; cancellation is a status change and
//! history is preserved.

mod conflict;
mod error;
mod event;
#[cfg(test)]
mod tests;

pub use conflict::{ConflictChecker, ConflictOutcome};
pub use error::{BookingError, BookingResult};
pub use event::ReservationEvent;

use crate::directory::{RoomAvailability, RoomDirectory};
use crate::notify::NotificationEmitter;
use crate::store::ReservationStore;
use shared::models::{
    Notification, Principal, Reservation, ReservationCreate, ReservationFilter, ReservationQuery,
    ReservationStatus, ReservationUpdate, TimeSlot,
};
use shared::types::ReservationId;
use shared::util;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

pub struct ReservationManager<S: ReservationStore> {
    store: S,
    notifier: NotificationEmitter,
    /// Optional room directory; without it room ids are opaque and
    /// creates proceed unchecked
    rooms: Option<Arc<dyn RoomDirectory>>,
    event_tx: broadcast::Sender<ReservationEvent>,
}

impl<S: ReservationStore> std::fmt::Debug for ReservationManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("store", &"<ReservationStore>")
            .field("rooms", &self.rooms.is_some())
            .finish()
    }
}

impl<S: ReservationStore> ReservationManager<S> {
    pub fn new(store: S, notifier: NotificationEmitter) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            notifier,
            rooms: None,
            event_tx,
        }
    }

    /// Wire in the room directory integration
    pub fn with_room_directory(mut self, rooms: Arc<dyn RoomDirectory>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    /// Subscribe to lifecycle event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<ReservationEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage adapter
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========== Operations ==========

    /// Create a reservation
    pub fn create(&self, actor: &Principal, req: ReservationCreate) -> BookingResult<Reservation> {
        self.authorize_booking(actor)?;

        if req.room_id.trim().is_empty() {
            return Err(BookingError::validation("room_id is required"));
        }
        let slot = parse_slot(&req.start, &req.end)?;

        // Only a coordinator can book on behalf of another user;
        // everyone else books for themselves.
        let owner_id = if actor.is_coordinator() {
            req.owner_id
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| actor.id.clone())
        } else {
            actor.id.clone()
        };

        self.check_room(&req.room_id)?;

        if let ConflictOutcome::Conflict(conflicting) =
            ConflictChecker::new(&self.store).check(&req.room_id, slot, None)?
        {
            return Err(BookingError::SchedulingConflict { conflicting });
        }

        let now = util::now_millis();
        let reservation = Reservation {
            id: util::snowflake_id(),
            room_id: req.room_id,
            owner_id: owner_id.clone(),
            discipline_id: req.discipline_id,
            start: slot.start,
            end: slot.end,
            participants: dedup(req.participants.unwrap_or_default()),
            status: ReservationStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let stored = self.store.insert(reservation)?;
        tracing::info!(
            reservation_id = stored.id,
            room_id = %stored.room_id,
            owner_id = %owner_id,
            "Reservation created"
        );

        self.notifier.emit(
            &owner_id,
            format!("Reservation created: {}", stored.id),
            Some(stored.id),
        );
        self.broadcast(ReservationEvent::Created(stored.clone()));
        Ok(stored)
    }

    /// Update a reservation (time/room move, status transition,
    /// participants replacement, coordinator-only ownership change)
    pub fn update(
        &self,
        actor: &Principal,
        id: ReservationId,
        patch: ReservationUpdate,
    ) -> BookingResult<Reservation> {
        self.authorize_booking(actor)?;

        let mut reservation = self.store.load(id)?.ok_or(BookingError::NotFound(id))?;
        if !actor.can_manage(&reservation.owner_id) {
            return Err(BookingError::forbidden(
                "only the owner or a coordinator may modify this reservation",
            ));
        }

        if patch.touches_slot() {
            if reservation.status.is_terminal() {
                return Err(BookingError::validation(format!(
                    "cannot move a {} reservation",
                    reservation.status.as_str()
                )));
            }

            let room_id = match &patch.room_id {
                Some(room) if room.trim().is_empty() => {
                    return Err(BookingError::validation("room_id is required"));
                }
                Some(room) => room.clone(),
                None => reservation.room_id.clone(),
            };
            let start = match &patch.start {
                Some(raw) => parse_timestamp(raw)?,
                None => reservation.start,
            };
            let end = match &patch.end {
                Some(raw) => parse_timestamp(raw)?,
                None => reservation.end,
            };
            let slot = TimeSlot::new(start, end);
            if !slot.is_valid() {
                return Err(BookingError::validation("start must precede end"));
            }

            if let ConflictOutcome::Conflict(conflicting) =
                ConflictChecker::new(&self.store).check(&room_id, slot, Some(id))?
            {
                return Err(BookingError::SchedulingConflict { conflicting });
            }

            reservation.room_id = room_id;
            reservation.start = slot.start;
            reservation.end = slot.end;
        }

        if let Some(raw) = &patch.status {
            let requested = ReservationStatus::parse(raw)
                .ok_or_else(|| BookingError::validation(format!("invalid status: {raw}")))?;
            reservation.status = apply_transition(reservation.status, requested)?;
        }

        if let Some(owner) = &patch.owner_id {
            if !actor.is_coordinator() {
                return Err(BookingError::forbidden(
                    "only a coordinator may reassign ownership",
                ));
            }
            if owner.trim().is_empty() {
                return Err(BookingError::validation("owner_id is required"));
            }
            reservation.owner_id = owner.clone();
        }

        if let Some(participants) = patch.participants {
            reservation.participants = dedup(participants);
        }

        let stored = self.store.update(reservation)?;
        tracing::info!(reservation_id = stored.id, "Reservation updated");

        self.notifier.emit(
            &actor.id,
            format!("Reservation updated: {}", stored.id),
            Some(stored.id),
        );
        self.broadcast(ReservationEvent::Updated(stored.clone()));
        Ok(stored)
    }

    /// Cancel a reservation
    ///
    /// Cancelling an already-cancelled reservation is an idempotent
    /// no-op; a rejected one cannot be cancelled (terminal states are
    /// never left).
    pub fn cancel(&self, actor: &Principal, id: ReservationId) -> BookingResult<Reservation> {
        self.authorize_booking(actor)?;

        let mut reservation = self.store.load(id)?.ok_or(BookingError::NotFound(id))?;
        if !actor.can_manage(&reservation.owner_id) {
            return Err(BookingError::forbidden(
                "only the owner or a coordinator may cancel this reservation",
            ));
        }

        match reservation.status {
            ReservationStatus::Cancelled => {
                tracing::debug!(reservation_id = id, "Reservation already cancelled");
                return Ok(reservation);
            }
            ReservationStatus::Rejected => {
                return Err(BookingError::validation(
                    "cannot cancel a rejected reservation",
                ));
            }
            ReservationStatus::Active => {}
        }

        reservation.status = ReservationStatus::Cancelled;
        let stored = self.store.update(reservation)?;
        tracing::info!(reservation_id = stored.id, "Reservation cancelled");

        self.notifier.emit(
            &actor.id,
            format!("Reservation cancelled: {}", stored.id),
            Some(stored.id),
        );
        self.broadcast(ReservationEvent::Cancelled(stored.clone()));
        Ok(stored)
    }

    /// List reservations; public listings default to active bookings
    pub fn list(&self, query: &ReservationQuery) -> BookingResult<Vec<Reservation>> {
        let filter = resolve_filter(query)?;
        Ok(self.store.list(&filter)?)
    }

    /// Fetch a single reservation by id
    pub fn get(&self, id: ReservationId) -> BookingResult<Reservation> {
        self.store.load(id)?.ok_or(BookingError::NotFound(id))
    }

    /// Notifications for a user, newest first
    pub fn notifications_for(&self, user_id: &str) -> BookingResult<Vec<Notification>> {
        Ok(self.notifier.for_user(user_id)?)
    }

    // ========== Internals ==========

    fn authorize_booking(&self, actor: &Principal) -> BookingResult<()> {
        if !actor.can_book() {
            return Err(BookingError::forbidden(
                "participants cannot manage reservations",
            ));
        }
        Ok(())
    }

    /// Room directory gate for creates. `Unknown` is accepted: the
    /// directory is advisory and room ids stay opaque without it.
    fn check_room(&self, room_id: &str) -> BookingResult<()> {
        let Some(rooms) = &self.rooms else {
            return Ok(());
        };
        match rooms.availability(room_id) {
            RoomAvailability::Bookable => Ok(()),
            RoomAvailability::Unavailable => Err(BookingError::validation(format!(
                "room {room_id} is not bookable"
            ))),
            RoomAvailability::Unknown => {
                tracing::debug!(room_id = %room_id, "Room unknown to directory, accepting");
                Ok(())
            }
        }
    }

    fn broadcast(&self, event: ReservationEvent) {
        if self.event_tx.receiver_count() > 0 && self.event_tx.send(event).is_err() {
            tracing::warn!("Event broadcast failed: no active receivers");
        }
    }
}

/// Status transitions are one-way out of `active`; re-asserting the
/// current status is a no-op.
fn apply_transition(
    current: ReservationStatus,
    requested: ReservationStatus,
) -> BookingResult<ReservationStatus> {
    if current == requested {
        return Ok(current);
    }
    if current.is_terminal() {
        return Err(BookingError::validation(format!(
            "cannot change a {} reservation to {}",
            current.as_str(),
            requested.as_str()
        )));
    }
    Ok(requested)
}

fn parse_timestamp(raw: &str) -> BookingResult<shared::types::Timestamp> {
    crate::utils::parse_timestamp(raw)
        .ok_or_else(|| BookingError::validation(format!("invalid timestamp: {raw:?}")))
}

fn parse_slot(start: &str, end: &str) -> BookingResult<TimeSlot> {
    let slot = TimeSlot::new(parse_timestamp(start)?, parse_timestamp(end)?);
    if !slot.is_valid() {
        return Err(BookingError::validation("start must precede end"));
    }
    Ok(slot)
}

/// Participants are a set: order irrelevant, duplicates collapse
fn dedup(mut participants: Vec<String>) -> Vec<String> {
    participants.sort_unstable();
    participants.dedup();
    participants
}

fn resolve_filter(query: &ReservationQuery) -> BookingResult<ReservationFilter> {
    let from = match &query.from {
        Some(raw) => Some(parse_timestamp(raw)?),
        None => None,
    };
    let to = match &query.to {
        Some(raw) => Some(parse_timestamp(raw)?),
        None => None,
    };
    let status = match &query.status {
        // Public listings only surface active bookings by default
        None => Some(ReservationStatus::Active),
        Some(raw) => Some(
            ReservationStatus::parse(raw)
                .ok_or_else(|| BookingError::validation(format!("invalid status: {raw}")))?,
        ),
    };
    Ok(ReservationFilter {
        room_id: query.room_id.clone().filter(|r| !r.trim().is_empty()),
        owner_id: query.owner_id.clone().filter(|o| !o.trim().is_empty()),
        from,
        to,
        status,
    })
}
