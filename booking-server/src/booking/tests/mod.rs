use super::*;
use crate::directory::{RoomAvailability, StaticRoomDirectory};
use crate::store::{MemoryStore, RedbStore};
use crate::utils;
use shared::models::Role;

fn create_test_manager() -> ReservationManager<RedbStore> {
    let store = RedbStore::open_in_memory().unwrap();
    let notifier = NotificationEmitter::new(Arc::new(store.clone()));
    ReservationManager::new(store, notifier)
}

fn create_memory_manager() -> (ReservationManager<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    let notifier = NotificationEmitter::new(Arc::new(store.clone()));
    (ReservationManager::new(store.clone(), notifier), store)
}

fn coordinator() -> Principal {
    Principal::new("coord-1", Role::Coordinator)
}

fn instructor(id: &str) -> Principal {
    Principal::new(id, Role::Instructor)
}

fn participant(id: &str) -> Principal {
    Principal::new(id, Role::Participant)
}

/// Create payload for a room and a time window on 2024-01-15
fn booking(room: &str, start: &str, end: &str) -> ReservationCreate {
    ReservationCreate {
        room_id: room.to_string(),
        start: format!("2024-01-15T{start}"),
        end: format!("2024-01-15T{end}"),
        discipline_id: None,
        participants: None,
        owner_id: None,
    }
}

fn millis(time: &str) -> i64 {
    utils::parse_timestamp(&format!("2024-01-15T{time}")).unwrap()
}

/// Assert a validation failure and surface the message on mismatch
fn expect_validation<T: std::fmt::Debug>(result: BookingResult<T>) {
    match result {
        Err(BookingError::Validation(_)) => {}
        other => panic!("expected Validation error, got {other:?}"),
    }
}

fn expect_conflict<T: std::fmt::Debug>(result: BookingResult<T>) -> Vec<ReservationId> {
    match result {
        Err(BookingError::SchedulingConflict { conflicting }) => conflicting,
        other => panic!("expected SchedulingConflict, got {other:?}"),
    }
}

mod test_boundary;
