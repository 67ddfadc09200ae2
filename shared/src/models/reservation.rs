//! Reservation Model
//!
//! Canonical reservation entity plus the request/query payloads accepted
//! by the lifecycle manager. Timestamps are Unix millis end to end;
//! date-string parsing happens once at the engine boundary.

use crate::types::{ReservationId, Timestamp};
use serde::{Deserialize, Serialize};

/// Reservation status
///
/// `Cancelled` and `Rejected` are terminal: no transition resumes an
/// inactive reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Cancelled,
    Rejected,
}

impl ReservationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Rejected)
    }

    /// Parse a caller-supplied status string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "cancelled" => Some(Self::Cancelled),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }
}

/// Half-open time range `[start, end)` in Unix millis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeSlot {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// A slot is well-formed when it has positive length
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Strict half-open overlap test: back-to-back slots do not overlap
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub room_id: String,
    pub owner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discipline_id: Option<String>,
    pub start: Timestamp,
    pub end: Timestamp,
    /// Attendee user ids; order irrelevant, deduplicated on write
    #[serde(default)]
    pub participants: Vec<String>,
    pub status: ReservationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reservation {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::new(self.start, self.end)
    }

    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Active
    }
}

/// Create reservation payload
///
/// `start`/`end` arrive as date strings and are parsed by the engine so
/// that malformed input surfaces as a validation failure, not a decode
/// error in the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub room_id: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub discipline_id: Option<String>,
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    /// Coordinator-only: book on behalf of this user
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Update reservation payload (patch semantics: absent field = unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// One of `active`/`cancelled`/`rejected`
    #[serde(default)]
    pub status: Option<String>,
    /// Replaces the participant set wholesale
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    /// Coordinator-only: reassign ownership
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl ReservationUpdate {
    /// Does this patch move the reservation in time or space?
    pub fn touches_slot(&self) -> bool {
        self.room_id.is_some() || self.start.is_some() || self.end.is_some()
    }
}

/// List query as supplied by the caller (dates still unparsed)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationQuery {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Inclusive lower bound on `start`
    #[serde(default)]
    pub from: Option<String>,
    /// Inclusive upper bound on `start`
    #[serde(default)]
    pub to: Option<String>,
    /// Defaults to `active` when absent
    #[serde(default)]
    pub status: Option<String>,
}

/// Resolved list filter handed to the storage adapter
#[derive(Debug, Clone)]
pub struct ReservationFilter {
    pub room_id: Option<String>,
    pub owner_id: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub status: Option<ReservationStatus>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if let Some(room) = &self.room_id
            && reservation.room_id != *room
        {
            return false;
        }
        if let Some(owner) = &self.owner_id
            && reservation.owner_id != *owner
        {
            return false;
        }
        if let Some(from) = self.from
            && reservation.start < from
        {
            return false;
        }
        if let Some(to) = self.to
            && reservation.start > to
        {
            return false;
        }
        if let Some(status) = self.status
            && reservation.status != status
        {
            return false;
        }
        true
    }
}
