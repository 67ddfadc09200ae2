//! redb-based reservation store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `reservations` | `id` | `Reservation` (JSON) | Record store |
//! | `active_slots` | `(room_id, id)` | `()` | Active-per-room index |
//! | `notifications` | `id` | `Notification` (JSON) | Notification log |
//!
//! The `active_slots` index holds active reservation ids only; it is
//! maintained in the same write transaction as the record itself.
//! redb write transactions are single-writer, so the overlap re-check
//! performed inside `insert`/`update` cannot interleave with another
//! booking of the same room.

use super::{NotificationSink, ReservationStore, StoreError, StoreResult};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{Notification, Reservation, ReservationFilter};
use shared::types::ReservationId;
use shared::util;
use std::path::Path;
use std::sync::Arc;

/// Reservation records: key = id, value = JSON-serialized Reservation
const RESERVATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("reservations");

/// Active reservation index: key = (room_id, reservation_id), value = empty
const ACTIVE_SLOTS_TABLE: TableDefinition<(&str, u64), ()> = TableDefinition::new("active_slots");

/// Notification records: key = id, value = JSON-serialized Notification
const NOTIFICATIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("notifications");

fn key(id: ReservationId) -> u64 {
    id as u64
}

/// Reservation store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    ///
    /// redb commits with immediate durability: once `commit()` returns,
    /// the reservation survives power loss with the file in a
    /// consistent state.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init_tables(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(db)
    }

    fn init_tables(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_SLOTS_TABLE)?;
            let _ = write_txn.open_table(NOTIFICATIONS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }
}

/// Ids of active reservations whose slot overlaps the candidate,
/// the candidate itself excluded
fn conflicting_ids(active_in_room: &[Reservation], candidate: &Reservation) -> Vec<ReservationId> {
    active_in_room
        .iter()
        .filter(|existing| existing.id != candidate.id && existing.slot().overlaps(&candidate.slot()))
        .map(|existing| existing.id)
        .collect()
}

impl ReservationStore for RedbStore {
    fn load(&self, id: ReservationId) -> StoreResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        match table.get(key(id))? {
            Some(raw) => Ok(Some(serde_json::from_slice(raw.value())?)),
            None => Ok(None),
        }
    }

    fn find_active_for_room(
        &self,
        room_id: &str,
        exclude: Option<ReservationId>,
    ) -> StoreResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let reservations = read_txn.open_table(RESERVATIONS_TABLE)?;
        let index = read_txn.open_table(ACTIVE_SLOTS_TABLE)?;

        let range_start = (room_id, 0u64);
        let range_end = (room_id, u64::MAX);

        let mut found = Vec::new();
        for entry in index.range(range_start..=range_end)? {
            let (index_key, _) = entry?;
            let (_, id) = index_key.value();
            if exclude.is_some_and(|e| key(e) == id) {
                continue;
            }
            let Some(raw) = reservations.get(id)? else {
                continue;
            };
            found.push(serde_json::from_slice(raw.value())?);
        }
        Ok(found)
    }

    fn insert(&self, mut reservation: Reservation) -> StoreResult<Reservation> {
        let write_txn = self.db.begin_write()?;
        {
            let mut reservations = write_txn.open_table(RESERVATIONS_TABLE)?;
            let mut index = write_txn.open_table(ACTIVE_SLOTS_TABLE)?;

            if reservation.is_active() {
                let mut active_in_room = Vec::new();
                let range_start = (reservation.room_id.as_str(), 0u64);
                let range_end = (reservation.room_id.as_str(), u64::MAX);
                for entry in index.range(range_start..=range_end)? {
                    let (index_key, _) = entry?;
                    let (_, id) = index_key.value();
                    if let Some(raw) = reservations.get(id)? {
                        active_in_room.push(serde_json::from_slice(raw.value())?);
                    }
                }
                let conflicting = conflicting_ids(&active_in_room, &reservation);
                if !conflicting.is_empty() {
                    return Err(StoreError::SlotTaken(conflicting));
                }
            }

            let now = util::now_millis();
            reservation.created_at = now;
            reservation.updated_at = now;

            let data = serde_json::to_vec(&reservation)?;
            reservations.insert(key(reservation.id), data.as_slice())?;
            if reservation.is_active() {
                index.insert((reservation.room_id.as_str(), key(reservation.id)), ())?;
            }
        }
        write_txn.commit()?;
        Ok(reservation)
    }

    fn update(&self, mut reservation: Reservation) -> StoreResult<Reservation> {
        let write_txn = self.db.begin_write()?;
        {
            let mut reservations = write_txn.open_table(RESERVATIONS_TABLE)?;
            let mut index = write_txn.open_table(ACTIVE_SLOTS_TABLE)?;

            let previous: Reservation = match reservations.get(key(reservation.id))? {
                Some(raw) => serde_json::from_slice(raw.value())?,
                None => return Err(StoreError::NotFound(reservation.id)),
            };

            if reservation.is_active() {
                let mut active_in_room = Vec::new();
                let range_start = (reservation.room_id.as_str(), 0u64);
                let range_end = (reservation.room_id.as_str(), u64::MAX);
                for entry in index.range(range_start..=range_end)? {
                    let (index_key, _) = entry?;
                    let (_, id) = index_key.value();
                    if let Some(raw) = reservations.get(id)? {
                        active_in_room.push(serde_json::from_slice(raw.value())?);
                    }
                }
                let conflicting = conflicting_ids(&active_in_room, &reservation);
                if !conflicting.is_empty() {
                    return Err(StoreError::SlotTaken(conflicting));
                }
            }

            reservation.created_at = previous.created_at;
            reservation.updated_at = util::now_millis();

            // Index follows the record: old entry out, new entry in
            if previous.is_active() {
                index.remove((previous.room_id.as_str(), key(previous.id)))?;
            }
            if reservation.is_active() {
                index.insert((reservation.room_id.as_str(), key(reservation.id)), ())?;
            }

            let data = serde_json::to_vec(&reservation)?;
            reservations.insert(key(reservation.id), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(reservation)
    }

    fn list(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;

        let mut found = Vec::new();
        for entry in table.iter()? {
            let (_, raw) = entry?;
            let reservation: Reservation = serde_json::from_slice(raw.value())?;
            if filter.matches(&reservation) {
                found.push(reservation);
            }
        }
        found.sort_by_key(|r| r.start);
        Ok(found)
    }
}

impl NotificationSink for RedbStore {
    fn append(&self, notification: Notification) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(NOTIFICATIONS_TABLE)?;
            let data = serde_json::to_vec(&notification)?;
            table.insert(notification.id as u64, data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn for_user(&self, user_id: &str) -> StoreResult<Vec<Notification>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(NOTIFICATIONS_TABLE)?;

        let mut found = Vec::new();
        for entry in table.iter()? {
            let (_, raw) = entry?;
            let notification: Notification = serde_json::from_slice(raw.value())?;
            if notification.user_id == user_id {
                found.push(notification);
            }
        }
        found.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        Ok(found)
    }
}
