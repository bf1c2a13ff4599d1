//! Donor summaries and the "expiring soon" recall queue.
//!
//! The queue lists donors the clinic should contact: they are due to donate
//! within the recall window (or are already overdue) and nothing is booked
//! for them yet.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{Appointment, AppointmentStatus, Donation, Donor, Suspension};

use super::eligibility::{EligibilityResult, evaluate_eligibility};

/// Default recall window, in days after today.
pub const EXPIRING_WINDOW_DAYS: i64 = 14;

/// A donor together with their computed eligibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorSummary {
    /// The donor record.
    #[serde(flatten)]
    pub donor: Donor,
    /// Eligibility on the evaluation date.
    #[serde(flatten)]
    pub eligibility: EligibilityResult,
    /// Earliest confirmed appointment on or after the evaluation date.
    pub next_appointment_date: Option<NaiveDate>,
}

/// Builds the summary for one donor.
pub fn summarize_donor(
    donor: &Donor,
    donations: &[Donation],
    suspensions: &[Suspension],
    appointments: &[Appointment],
    today: NaiveDate,
) -> DonorSummary {
    let next_appointment_date = appointments
        .iter()
        .filter(|a| a.donor_id == donor.id && a.is_upcoming_confirmed(today))
        .filter_map(|a| a.confirmed_date)
        .min();

    DonorSummary {
        donor: donor.clone(),
        eligibility: evaluate_eligibility(donor, donations, suspensions, today),
        next_appointment_date,
    }
}

/// An appointment keeps its donor out of the queue while it is pending, or
/// confirmed for today or later.
fn blocks_recall(appointment: &Appointment, today: NaiveDate) -> bool {
    appointment.status == AppointmentStatus::Pending || appointment.is_upcoming_confirmed(today)
}

/// Donors due within [`EXPIRING_WINDOW_DAYS`] of `today`, overdue donors
/// included, sorted by due date.
///
/// # Example
///
/// ```
/// use donor_scheduler::calculation::expiring_soon;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
/// assert!(expiring_soon(&[], &[], &[], &[], today).is_empty());
/// ```
pub fn expiring_soon(
    donors: &[Donor],
    donations: &[Donation],
    suspensions: &[Suspension],
    appointments: &[Appointment],
    today: NaiveDate,
) -> Vec<DonorSummary> {
    expiring_within(
        donors,
        donations,
        suspensions,
        appointments,
        today,
        EXPIRING_WINDOW_DAYS,
    )
}

/// Same as [`expiring_soon`] with an explicit window.
///
/// Only active, non-suspended donors without a blocking appointment are
/// considered. A donor is listed when their due date falls strictly before
/// `today + window_days`; donors without a due date (never donated) are not
/// listed. Ties on the due date are broken by donor id.
pub fn expiring_within(
    donors: &[Donor],
    donations: &[Donation],
    suspensions: &[Suspension],
    appointments: &[Appointment],
    today: NaiveDate,
    window_days: i64,
) -> Vec<DonorSummary> {
    let horizon = today + Duration::days(window_days);

    let mut expiring: Vec<DonorSummary> = donors
        .iter()
        .filter(|donor| donor.is_active && !donor.is_suspended)
        .filter(|donor| {
            !appointments
                .iter()
                .any(|a| a.donor_id == donor.id && blocks_recall(a, today))
        })
        .map(|donor| summarize_donor(donor, donations, suspensions, appointments, today))
        .filter(|summary| {
            summary
                .eligibility
                .next_due_date
                .is_some_and(|due| due < horizon)
        })
        .collect();

    expiring.sort_by_key(|summary| (summary.eligibility.next_due_date, summary.donor.id));
    expiring
}
