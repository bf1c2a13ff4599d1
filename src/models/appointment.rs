//! Appointment model and its status lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Lifecycle status of an appointment.
///
/// ```text
/// pending ──► confirmed ──► completed
///    │            │
///    └────────────┴──► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Dates proposed, waiting for the donor to pick one.
    #[default]
    Pending,
    /// The donor picked a date.
    Confirmed,
    /// The donation took place.
    Completed,
    /// Called off.
    Cancelled,
}

impl AppointmentStatus {
    /// Pending and confirmed appointments block new ones for the same donor.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Completed and cancelled appointments never change again.
    pub fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A donation appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The donor the appointment is for.
    pub donor_id: RecordId,
    /// Candidate dates offered to the donor (three for proposals, possibly
    /// none for appointments an admin booked directly).
    #[serde(default)]
    pub proposed_dates: Vec<NaiveDate>,
    /// The date the donor picked.
    pub confirmed_date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Set once an admin edits the appointment directly.
    #[serde(default)]
    pub admin_modified: bool,
    /// The admin who last edited the appointment.
    pub modified_by: Option<RecordId>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Returns true if `date` is one of the proposed dates.
    pub fn offers(&self, date: NaiveDate) -> bool {
        self.proposed_dates.contains(&date)
    }

    /// A confirmed appointment on or after `today` (pending ones have no date yet).
    pub fn is_upcoming_confirmed(&self, today: NaiveDate) -> bool {
        self.status == AppointmentStatus::Confirmed
            && self.confirmed_date.is_some_and(|date| date >= today)
    }
}

/// Fields needed to insert an appointment into the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    /// The donor.
    pub donor_id: RecordId,
    /// Candidate dates.
    #[serde(default)]
    pub proposed_dates: Vec<NaiveDate>,
    /// Pre-confirmed date; when present the appointment starts confirmed.
    #[serde(default)]
    pub confirmed_date: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl NewAppointment {
    /// The initial status implied by the fields.
    pub fn initial_status(&self) -> AppointmentStatus {
        if self.confirmed_date.is_some() {
            AppointmentStatus::Confirmed
        } else {
            AppointmentStatus::Pending
        }
    }
}

/// Admin partial update of an appointment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppointmentUpdate {
    /// Target status; must be a legal transition.
    pub status: Option<AppointmentStatus>,
    /// Replacement confirmed date.
    pub confirmed_date: Option<NaiveDate>,
    /// Replacement candidate dates.
    pub proposed_dates: Option<Vec<NaiveDate>>,
    /// Replacement notes.
    pub notes: Option<String>,
}
