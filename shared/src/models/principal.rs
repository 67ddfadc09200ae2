//! Authenticated principal
//!
//! Supplied by the identity provider. The engine trusts the id/role pair
//! as-is and never re-validates credentials.

use serde::{Deserialize, Serialize};

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Elevated role: may book on behalf of others and override ownership checks
    Coordinator,
    /// May create and manage own reservations
    Instructor,
    /// Read-only access (students, guests)
    Participant,
}

/// The authenticated actor performing an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn is_coordinator(&self) -> bool {
        self.role == Role::Coordinator
    }

    /// Ownership rule for mutations: the owner or any coordinator
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.is_coordinator() || self.id == owner_id
    }

    /// Participants cannot create or mutate reservations
    pub fn can_book(&self) -> bool {
        matches!(self.role, Role::Coordinator | Role::Instructor)
    }
}
