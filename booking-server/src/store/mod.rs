//! Storage Adapters
//!
//! One canonical reservation model, one adapter interface, one
//! implementation per storage technology. The lifecycle manager only
//! talks to [`ReservationStore`]/[`NotificationSink`]; it never sees a
//! query dialect.
//!
//! # Write-time conflict enforcement
//!
//! The manager-level conflict check is a friendly pre-flight; the
//! adapter is the authority. `insert`/`update` re-verify the overlap
//! predicate against active reservations of the target room inside the
//! same write transaction (or under the same write lock) that commits
//! the record, and fail with [`StoreError::SlotTaken`] when another
//! booking got there first. This is what keeps the per-room no-overlap
//! invariant true under concurrent calls.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use shared::models::{Notification, Reservation, ReservationFilter};
use shared::types::ReservationId;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Reservation store unavailable")]
    Unavailable,

    #[error("Reservation not found: {0}")]
    NotFound(ReservationId),

    #[error("Slot taken by reservation(s): {0:?}")]
    SlotTaken(Vec<ReservationId>),

    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Reservation persistence interface
pub trait ReservationStore: Send + Sync {
    /// Fetch a reservation by id
    fn load(&self, id: ReservationId) -> StoreResult<Option<Reservation>>;

    /// Candidate query for conflict detection: active reservations of a
    /// room, minus the excluded id (self-exclusion on update)
    fn find_active_for_room(
        &self,
        room_id: &str,
        exclude: Option<ReservationId>,
    ) -> StoreResult<Vec<Reservation>>;

    /// Persist a new reservation, stamping `created_at`/`updated_at`.
    /// Fails with [`StoreError::SlotTaken`] when an active reservation
    /// of the same room overlaps at commit time.
    fn insert(&self, reservation: Reservation) -> StoreResult<Reservation>;

    /// Persist a mutated reservation, stamping `updated_at`. Overlap is
    /// re-verified (excluding the reservation itself) when the record
    /// is active.
    fn update(&self, reservation: Reservation) -> StoreResult<Reservation>;

    /// Filtered listing; every filter field is an AND conjunct
    fn list(&self, filter: &ReservationFilter) -> StoreResult<Vec<Reservation>>;
}

/// Notification persistence interface (append-only)
pub trait NotificationSink: Send + Sync {
    fn append(&self, notification: Notification) -> StoreResult<()>;

    /// Notifications for a user, newest first
    fn for_user(&self, user_id: &str) -> StoreResult<Vec<Notification>>;
}
