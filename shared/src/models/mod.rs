//! Domain models shared between the booking engine and its callers

pub mod notification;
pub mod principal;
pub mod reservation;

pub use notification::Notification;
pub use principal::{Principal, Role};
pub use reservation::{
    Reservation, ReservationCreate, ReservationFilter, ReservationQuery, ReservationStatus,
    ReservationUpdate, TimeSlot,
};
