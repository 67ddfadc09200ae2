//! In-memory reservation store
//!
//! Backs unit tests and embedded deployments that do not need
//! durability. The write lock is held across the overlap check and the
//! map mutation, which is what makes concurrent bookings of the same
//! room safe here.
//!
//! The store can be switched unavailable to exercise the
//! `StoreUnavailable` failure mode; there is deliberately no fallback
//! data of any kind.

use super::{NotificationSink, ReservationStore, StoreError, StoreResult};
use parking_lot::RwLock;
use shared::models::{Notification, Reservation, ReservationFilter};
use shared::types::ReservationId;
use shared::util;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
struct State {
    reservations: HashMap<ReservationId, Reservation>,
    notifications: Vec<Notification>,
}

/// Reservation store backed by process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the availability switch (test scenarios for the
    /// store-unreachable failure mode)
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    fn guard(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    fn overlapping(state: &State, candidate: &Reservation) -> Vec<ReservationId> {
        let mut conflicting: Vec<ReservationId> = state
            .reservations
            .values()
            .filter(|existing| {
                existing.id != candidate.id
                    && existing.room_id == candidate.room_id
                    && existing.is_active()
                    && existing.slot().overlaps(&candidate.slot())
            })
            .map(|existing| existing.id)
            .collect();
        conflicting.sort_unstable();
        conflicting
    }
}

impl ReservationStore for MemoryStore {
    fn load(&self, id: ReservationId) -> StoreResult<Option<Reservation>> {
        self.guard()?;
        Ok(self.state.read().reservations.get(&id).cloned())
    }

    fn find_active_for_room(
        &self,
        room_id: &str,
        exclude: Option<ReservationId>,
    ) -> StoreResult<Vec<Reservation>> {
        self.guard()?;
        let state = self.state.read();
        let mut found: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.room_id == room_id && r.is_active() && Some(r.id) != exclude)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.start);
        Ok(found)
    }

    fn insert(&self, mut reservation: Reservation) -> StoreResult<Reservation> {
        self.guard()?;
        let mut state = self.state.write();

        if reservation.is_active() {
            let conflicting = Self::overlapping(&state, &reservation);
            if !conflicting.is_empty() {
                return Err(StoreError::SlotTaken(conflicting));
            }
        }

        let now = util::now_millis();
        reservation.created_at = now;
        reservation.updated_at = now;
        state.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    fn update(&self, mut reservation: Reservation) -> StoreResult<Reservation> {
        self.guard()?;
        let mut state = self.state.write();

        let previous = state
            .reservations
            .get(&reservation.id)
            .ok_or(StoreError::NotFound(reservation.id))?;
        reservation.created_at = previous.created_at;

        if reservation.is_active() {
            let conflicting = Self::overlapping(&state, &reservation);
            if !conflicting.is_empty() {
                return Err(StoreError::SlotTaken(conflicting));
            }
        }

        reservation.updated_at = util::now_millis();
        state.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    fn list(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>> {
        self.guard()?;
        let state = self.state.read();
        let mut found: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.start);
        Ok(found)
    }
}

impl NotificationSink for MemoryStore {
    fn append(&self, notification: Notification) -> StoreResult<()> {
        self.guard()?;
        self.state.write().notifications.push(notification);
        Ok(())
    }

    fn for_user(&self, user_id: &str) -> StoreResult<Vec<Notification>> {
        self.guard()?;
        let state = self.state.read();
        let mut found: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        Ok(found)
    }
}
