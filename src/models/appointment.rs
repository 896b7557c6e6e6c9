use std::fmt;

use serde::{Deserialize, Serialize};

/// Appointment snapshot as delivered by the scheduling backend.
///
/// `appointment_datetime` is kept as the raw ISO 8601 string so a single
/// malformed record cannot fail deserialization of a whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub appointment_datetime: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_visit: Option<String>,
}

impl Appointment {
    pub fn new(
        id: impl Into<String>,
        appointment_datetime: impl Into<String>,
        status: AppointmentStatus,
    ) -> Self {
        Self {
            id: id.into(),
            appointment_datetime: appointment_datetime.into(),
            status,
            patient_name: None,
            doctor_name: None,
            clinic_name: None,
            reason_for_visit: None,
        }
    }
}

/// Appointment status. Unrecognized wire values are kept in `Other`
/// instead of failing to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
    Other(String),
}

impl AppointmentStatus {
    /// The five statuses the backend is known to emit, in lifecycle order.
    pub const KNOWN: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Other(raw) => raw,
        }
    }

    /// No further transitions are possible from this status.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    /// Allowed lifecycle moves: pending -> confirmed | cancelled,
    /// confirmed -> completed | cancelled | no_show.
    pub fn can_transition_to(&self, next: &AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }
}

impl From<String> for AppointmentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => AppointmentStatus::Pending,
            "confirmed" => AppointmentStatus::Confirmed,
            "completed" => AppointmentStatus::Completed,
            "cancelled" => AppointmentStatus::Cancelled,
            "no_show" => AppointmentStatus::NoShow,
            _ => AppointmentStatus::Other(raw),
        }
    }
}

impl From<&str> for AppointmentStatus {
    fn from(raw: &str) -> Self {
        AppointmentStatus::from(raw.to_string())
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge color the portal renders for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Yellow,
    Green,
    Blue,
    Red,
    Orange,
    Gray,
}

impl StatusColor {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusColor::Yellow => "yellow",
            StatusColor::Green => "green",
            StatusColor::Blue => "blue",
            StatusColor::Red => "red",
            StatusColor::Orange => "orange",
            StatusColor::Gray => "gray",
        }
    }
}
