//! Weekly opening schedule and its per-date exceptions.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Opening flag and donor capacity for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Whether the clinic collects donations on this weekday.
    pub open: bool,
    /// Maximum number of donors that may book on this weekday.
    pub capacity: u32,
}

impl DaySchedule {
    /// An open day with the given capacity.
    pub const fn open(capacity: u32) -> Self {
        Self {
            open: true,
            capacity,
        }
    }

    /// A closed day; the capacity is kept for when it reopens.
    pub const fn closed(capacity: u32) -> Self {
        Self {
            open: false,
            capacity,
        }
    }
}

/// The clinic's weekly schedule. There is exactly one per store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Monday.
    pub monday: DaySchedule,
    /// Tuesday.
    pub tuesday: DaySchedule,
    /// Wednesday.
    pub wednesday: DaySchedule,
    /// Thursday.
    pub thursday: DaySchedule,
    /// Friday.
    pub friday: DaySchedule,
    /// Saturday.
    pub saturday: DaySchedule,
    /// Sunday.
    pub sunday: DaySchedule,
}

impl Schedule {
    /// Returns the slot for `weekday`.
    pub fn day(&self, weekday: Weekday) -> DaySchedule {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

impl Default for Schedule {
    /// Monday, Tuesday and Friday open; Tuesday takes one donor fewer.
    fn default() -> Self {
        Self {
            monday: DaySchedule::open(10),
            tuesday: DaySchedule::open(9),
            wednesday: DaySchedule::closed(10),
            thursday: DaySchedule::closed(10),
            friday: DaySchedule::open(10),
            saturday: DaySchedule::closed(10),
            sunday: DaySchedule::closed(10),
        }
    }
}

/// A calendar date on which the clinic is closed (holiday, maintenance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedDate {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The closed date.
    pub date: NaiveDate,
    /// Why the clinic is closed.
    #[serde(default)]
    pub reason: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to exclude a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExcludedDate {
    /// The date to close.
    pub date: NaiveDate,
    /// Why.
    #[serde(default)]
    pub reason: String,
}

/// A calendar date whose capacity overrides the weekday default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCapacity {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The date being overridden.
    pub date: NaiveDate,
    /// Capacity on that date.
    pub capacity: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to set a special capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSpecialCapacity {
    /// The date being overridden.
    pub date: NaiveDate,
    /// Capacity on that date.
    pub capacity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_matches_clinic_week() {
        let schedule = Schedule::default();
        assert_eq!(schedule.day(Weekday::Mon), DaySchedule::open(10));
        assert_eq!(schedule.day(Weekday::Tue), DaySchedule::open(9));
        assert!(!schedule.day(Weekday::Wed).open);
        assert!(!schedule.day(Weekday::Thu).open);
        assert!(schedule.day(Weekday::Fri).open);
        assert!(!schedule.day(Weekday::Sat).open);
        assert!(!schedule.day(Weekday::Sun).open);
    }

    #[test]
    fn test_schedule_deserializes_from_json() {
        let json = r#"{
            "monday": {"open": true, "capacity": 4},
            "tuesday": {"open": false, "capacity": 0},
            "wednesday": {"open": false, "capacity": 0},
            "thursday": {"open": false, "capacity": 0},
            "friday": {"open": false, "capacity": 0},
            "saturday": {"open": true, "capacity": 12},
            "sunday": {"open": false, "capacity": 0}
        }"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.day(Weekday::Sat), DaySchedule::open(12));
        assert_eq!(schedule.day(Weekday::Mon).capacity, 4);
    }
}
