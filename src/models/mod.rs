//! Data models shared by the engine and the API.

pub mod appointment;

pub use appointment::{Appointment, AppointmentStatus, StatusColor};
