//! Booking assessment for a candidate appointment date.
//!
//! Combines the capacity resolved for a date, the bookings already taken on
//! it and the donor's eligibility into a single verdict.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentStatus};

use super::capacity::CapacityResult;
use super::eligibility::EligibilityResult;

/// Verdict for booking a donor on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum BookingVerdict {
    /// The date can be booked; `remaining` slots are left before this booking.
    Available {
        /// Free slots on the date.
        remaining: u32,
    },
    /// The clinic is closed on the date.
    Closed,
    /// Every slot on the date is taken.
    Full,
    /// A suspension covers the date.
    DonorSuspended {
        /// End of the suspension, when known from a record.
        until: Option<NaiveDate>,
    },
    /// The date falls before the donor's next due date.
    NotYetEligible {
        /// First eligible date.
        due: NaiveDate,
    },
}

impl BookingVerdict {
    /// Returns true for [`BookingVerdict::Available`].
    pub fn is_available(&self) -> bool {
        matches!(self, BookingVerdict::Available { .. })
    }
}

/// The assessment of one candidate date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingAssessment {
    /// The candidate date.
    pub date: NaiveDate,
    /// Capacity on the date.
    pub capacity: u32,
    /// Confirmed appointments already on the date.
    pub booked: u32,
    /// The verdict.
    #[serde(flatten)]
    pub verdict: BookingVerdict,
    /// Human-readable explanation of the verdict.
    pub reasoning: String,
}

/// Counts confirmed appointments on `date`, skipping `exclude_id` (the
/// appointment being confirmed, if it is already in the list).
pub fn booked_on(date: NaiveDate, appointments: &[Appointment], exclude_id: Option<u64>) -> u32 {
    let count = appointments
        .iter()
        .filter(|a| Some(a.id) != exclude_id)
        .filter(|a| a.status == AppointmentStatus::Confirmed)
        .filter(|a| a.confirmed_date == Some(date))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Decides whether a donor can be booked on `capacity.date`.
///
/// Checks run in a fixed order and the first failure wins: closed date,
/// donor suspension, due date, then remaining capacity. Suspension and due
/// date are judged on the candidate date, not on the evaluation date, so a
/// donor who becomes eligible next week can be booked for next week.
///
/// `suspended_flag` is the donor's `is_suspended` flag, which blocks the
/// booking even without a suspension record.
///
/// # Example
///
/// ```
/// use donor_scheduler::calculation::{assess_booking, check_capacity, BookingVerdict};
/// use donor_scheduler::models::Schedule;
/// use chrono::NaiveDate;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let capacity = check_capacity(monday, &Schedule::default(), &[], &[]);
/// let assessment = assess_booking(&capacity, 7, None, false);
/// assert_eq!(assessment.verdict, BookingVerdict::Available { remaining: 3 });
/// ```
pub fn assess_booking(
    capacity: &CapacityResult,
    booked: u32,
    eligibility: Option<&EligibilityResult>,
    suspended_flag: bool,
) -> BookingAssessment {
    let date = capacity.date;

    let (verdict, reasoning) = if !capacity.is_open || capacity.capacity == 0 {
        (
            BookingVerdict::Closed,
            format!("Closed: {}", capacity.reasoning),
        )
    } else if let Some(until) = eligibility
        .and_then(|e| e.suspended_until)
        .filter(|end| *end > date)
    {
        (
            BookingVerdict::DonorSuspended { until: Some(until) },
            format!("Donor is suspended until {}", until),
        )
    } else if suspended_flag {
        (
            BookingVerdict::DonorSuspended { until: None },
            "Donor is flagged as suspended".to_string(),
        )
    } else if let Some(due) = eligibility
        .and_then(|e| e.next_due_date)
        .filter(|due| *due > date)
    {
        (
            BookingVerdict::NotYetEligible { due },
            format!("Donor is not eligible before {}", due),
        )
    } else if booked >= capacity.capacity {
        (
            BookingVerdict::Full,
            format!("{} of {} slots already booked", booked, capacity.capacity),
        )
    } else {
        let remaining = capacity.capacity - booked;
        (
            BookingVerdict::Available { remaining },
            format!(
                "{} of {} slots free on {}",
                remaining, capacity.capacity, date
            ),
        )
    };

    BookingAssessment {
        date,
        capacity: capacity.capacity,
        booked,
        verdict,
        reasoning,
    }
}
