//! API module for CarePortal
//!
//! Stateless JSON endpoints over the triage engine and the appointment
//! categorizer. Every request carries its own data; nothing is stored.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::configure;

use crate::engine::questions::TriageProtocol;

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub protocol: TriageProtocol,
}

impl AppState {
    pub fn new(protocol: TriageProtocol) -> Self {
        Self { protocol }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TriageProtocol::standard())
    }
}
