//! Conflict Checker
//!
//! Pure predicate over the store's candidate query: no side effects,
//! safe to call repeatedly. The candidate set is every active
//! reservation of the room minus the optional exclusion (a reservation
//! being updated must not collide with itself).

use crate::store::{ReservationStore, StoreResult};
use shared::models::{Reservation, TimeSlot};
use shared::types::ReservationId;

/// Outcome of a conflict check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictOutcome {
    Clear,
    /// Ids of the active reservations blocking the candidate slot
    Conflict(Vec<ReservationId>),
}

impl ConflictOutcome {
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }
}

pub struct ConflictChecker<'a, S: ReservationStore> {
    store: &'a S,
}

impl<'a, S: ReservationStore> ConflictChecker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Test a candidate slot against the room's active reservations
    ///
    /// Precondition: `slot` is well-formed (`start < end`); degenerate
    /// slots are rejected by validation before reaching this point.
    pub fn check(
        &self,
        room_id: &str,
        slot: TimeSlot,
        exclude: Option<ReservationId>,
    ) -> StoreResult<ConflictOutcome> {
        let candidates = self.store.find_active_for_room(room_id, exclude)?;
        Ok(scan(&candidates, slot))
    }
}

/// Apply the overlap predicate to an already-fetched candidate set
pub fn scan(candidates: &[Reservation], slot: TimeSlot) -> ConflictOutcome {
    let conflicting: Vec<ReservationId> = candidates
        .iter()
        .filter(|existing| existing.slot().overlaps(&slot))
        .map(|existing| existing.id)
        .collect();

    if conflicting.is_empty() {
        ConflictOutcome::Clear
    } else {
        ConflictOutcome::Conflict(conflicting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ReservationStatus;

    fn candidate(id: ReservationId, start: i64, end: i64) -> Reservation {
        Reservation {
            id,
            room_id: "r1".into(),
            owner_id: "p1".into(),
            discipline_id: None,
            start,
            end,
            participants: vec![],
            status: ReservationStatus::Active,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn clear_when_no_candidate_overlaps() {
        let candidates = [candidate(1, 0, 1000), candidate(2, 2000, 3000)];
        assert!(scan(&candidates, TimeSlot::new(1000, 2000)).is_clear());
    }

    #[test]
    fn reports_every_blocking_reservation() {
        let candidates = [
            candidate(1, 0, 1000),
            candidate(2, 500, 1500),
            candidate(3, 900, 2000),
        ];
        match scan(&candidates, TimeSlot::new(800, 1200)) {
            ConflictOutcome::Conflict(ids) => assert_eq!(ids, vec![1, 2, 3]),
            ConflictOutcome::Clear => panic!("expected a conflict"),
        }
    }
}
