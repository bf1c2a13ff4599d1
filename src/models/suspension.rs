//! Donor suspensions.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// A period during which a donor may not donate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suspension {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The suspended donor.
    pub donor_id: RecordId,
    /// First day of the suspension.
    pub start_date: NaiveDate,
    /// Length of the suspension in calendar months.
    pub duration_months: u32,
    /// `start_date + duration_months`, or the day it was ended early.
    pub end_date: NaiveDate,
    /// Why the donor was suspended.
    pub reason: String,
    /// Cleared when an admin ends the suspension.
    pub is_active: bool,
    /// The admin who created the suspension.
    pub created_by: RecordId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Suspension {
    /// True while the suspension gates eligibility on `today`: it is flagged
    /// active and its end date has not been reached.
    pub fn is_in_force(&self, today: NaiveDate) -> bool {
        self.is_active && self.end_date > today
    }
}

/// Adds whole calendar months. A day that does not exist in the target
/// month rolls over into the next one, so Jan 31 + 1 month is Mar 2 in a
/// leap year.
///
/// ```
/// use chrono::NaiveDate;
/// use donor_scheduler::models::add_months;
///
/// let jan_31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(add_months(jan_31, 1), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
/// ```
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let month0 = i64::from(date.month0()) + i64::from(months);
    let year = i64::from(date.year()) + month0 / 12;

    i32::try_from(year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, (month0 % 12) as u32 + 1, 1))
        .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day0()))))
        .unwrap_or(NaiveDate::MAX)
}

/// Fields needed to suspend a donor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSuspension {
    /// The donor to suspend.
    pub donor_id: RecordId,
    /// First day of the suspension.
    pub start_date: NaiveDate,
    /// Length in months (must be positive).
    pub duration_months: u32,
    /// Why the donor is suspended.
    pub reason: String,
}

impl NewSuspension {
    /// The derived end date.
    pub fn end_date(&self) -> NaiveDate {
        add_months(self.start_date, self.duration_months)
    }
}
