//! Campus booking engine
//!
//! Reservation conflict-detection and lifecycle core for the room
//! reservation system. The HTTP surface, identity provider and room
//! directory are external collaborators; this crate exposes the
//! [`booking::ReservationManager`] entry points they call.

pub mod booking;
pub mod config;
pub mod directory;
pub mod notify;
pub mod store;
pub mod utils;

// Re-exports
pub use booking::{BookingError, BookingResult, ReservationManager};
pub use config::Config;
pub use notify::NotificationEmitter;
pub use store::{MemoryStore, RedbStore, ReservationStore};

/// Open the durable reservation store under the configured working
/// directory, creating it on first start
pub fn open_store(config: &Config) -> store::StoreResult<RedbStore> {
    std::fs::create_dir_all(&config.work_dir)?;
    let store = RedbStore::open(config.db_path())?;
    tracing::info!(path = %config.db_path().display(), "Reservation store opened");
    Ok(store)
}
