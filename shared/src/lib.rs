//! Shared types for the campus booking system
//!
//! Domain models and utility types used by the booking engine and by
//! the HTTP layer that fronts it.

pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
