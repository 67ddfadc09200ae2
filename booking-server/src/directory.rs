//! Room Directory Capability
//!
//! The room/equipment directory is an external collaborator; the engine
//! only needs a yes/no/unknown answer on bookability. When no directory
//! is wired in, creates proceed unchecked and the room id is treated as
//! opaque.

use std::collections::HashMap;

/// Bookability of a room as reported by the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomAvailability {
    /// Room exists and accepts reservations
    Bookable,
    /// Room exists but is closed for booking (maintenance, retired)
    Unavailable,
    /// Directory cannot answer; the engine accepts the reservation
    Unknown,
}

/// Lookup interface implemented by the directory integration
pub trait RoomDirectory: Send + Sync {
    fn availability(&self, room_id: &str) -> RoomAvailability;
}

/// Fixed directory built from a known room table
///
/// Rooms not present in the table report [`RoomAvailability::Unknown`].
#[derive(Debug, Default)]
pub struct StaticRoomDirectory {
    rooms: HashMap<String, RoomAvailability>,
}

impl StaticRoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, room_id: impl Into<String>, availability: RoomAvailability) {
        self.rooms.insert(room_id.into(), availability);
    }
}

impl RoomDirectory for StaticRoomDirectory {
    fn availability(&self, room_id: &str) -> RoomAvailability {
        self.rooms
            .get(room_id)
            .copied()
            .unwrap_or(RoomAvailability::Unknown)
    }
}
