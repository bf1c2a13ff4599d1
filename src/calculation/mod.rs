//! Eligibility and scheduling calculations.
//!
//! This module contains the pure functions at the heart of the scheduler:
//! eligibility evaluation, per-date capacity lookup, the active-appointment
//! conflict guard, the expiring-soon recall queue and booking assessment
//! for candidate appointment dates. None of them touch the store; callers
//! pass in a snapshot of the records they need.

mod booking;
mod capacity;
mod conflict;
mod eligibility;
mod queue;

pub use booking::{BookingAssessment, BookingVerdict, assess_booking, booked_on};
pub use capacity::{CapacityResult, CapacitySource, check_capacity};
pub use conflict::has_active_appointment;
pub use eligibility::{
    EligibilityResult, FEMALE_DONATION_INTERVAL_MONTHS, MALE_DONATION_INTERVAL_MONTHS,
    active_suspension, donation_interval_months, evaluate_eligibility,
};
pub use queue::{
    DonorSummary, EXPIRING_WINDOW_DAYS, expiring_soon, expiring_within, summarize_donor,
};
