//! Per-date capacity lookup.
//!
//! Capacity for a calendar date is resolved through three tiers, in strict
//! precedence order: excluded dates, special capacities, then the weekly
//! schedule.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{ExcludedDate, Schedule, SpecialCapacity};

/// Which tier decided a date's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacitySource {
    /// The date is in the excluded dates list.
    Excluded,
    /// The date has a special capacity override.
    Special,
    /// The weekday default from the schedule.
    Weekly,
}

/// The capacity resolved for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityResult {
    /// The date checked.
    pub date: NaiveDate,
    /// Whether appointments may be booked on the date.
    pub is_open: bool,
    /// Maximum bookings on the date (0 when excluded).
    pub capacity: u32,
    /// The tier that decided.
    pub source: CapacitySource,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Resolves whether the clinic is open on `date` and for how many donors.
///
/// Excluded dates always close the clinic, even when a special capacity is
/// also set for the same date. A special capacity always opens the date,
/// even when its weekday is closed in the schedule.
///
/// # Example
///
/// ```
/// use donor_scheduler::calculation::check_capacity;
/// use donor_scheduler::models::{ExcludedDate, Schedule, SpecialCapacity};
/// use chrono::{NaiveDate, Utc};
///
/// let christmas = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
/// let excluded = vec![ExcludedDate {
///     id: 1,
///     date: christmas,
///     reason: "Christmas".to_string(),
///     created_at: Utc::now(),
/// }];
/// let special = vec![SpecialCapacity {
///     id: 1,
///     date: christmas,
///     capacity: 20,
///     created_at: Utc::now(),
/// }];
///
/// let result = check_capacity(christmas, &Schedule::default(), &excluded, &special);
/// assert!(!result.is_open);
/// assert_eq!(result.capacity, 0);
/// ```
pub fn check_capacity(
    date: NaiveDate,
    schedule: &Schedule,
    excluded: &[ExcludedDate],
    special: &[SpecialCapacity],
) -> CapacityResult {
    if let Some(closed) = excluded.iter().find(|e| e.date == date) {
        let reasoning = if closed.reason.is_empty() {
            format!("{} is an excluded date - closed", date)
        } else {
            format!("{} is an excluded date ({}) - closed", date, closed.reason)
        };
        return CapacityResult {
            date,
            is_open: false,
            capacity: 0,
            source: CapacitySource::Excluded,
            reasoning,
        };
    }

    if let Some(override_entry) = special.iter().find(|s| s.date == date) {
        return CapacityResult {
            date,
            is_open: true,
            capacity: override_entry.capacity,
            source: CapacitySource::Special,
            reasoning: format!(
                "{} has a special capacity of {}",
                date, override_entry.capacity
            ),
        };
    }

    let weekday = date.weekday();
    let slot = schedule.day(weekday);
    let reasoning = if slot.open {
        format!("{} is open with capacity {}", weekday, slot.capacity)
    } else {
        format!("{} is closed in the weekly schedule", weekday)
    };

    CapacityResult {
        date,
        is_open: slot.open,
        capacity: slot.capacity,
        source: CapacitySource::Weekly,
        reasoning,
    }
}
