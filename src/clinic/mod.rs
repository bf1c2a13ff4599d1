//! Clinic operations over a [`Store`](crate::store::Store).
//!
//! These functions load what the calculators need from the store, run
//! them, and persist the outcome. They validate input, enforce the
//! appointment lifecycle and keep derived flags (such as a donor's
//! suspended flag) in step with the records. The evaluation date is
//! always passed in.

mod appointments;
mod donations;
mod donors;
mod suspensions;

pub use appointments::{
    Availability, Completion, Proposal, availability, cancel_appointment, complete_appointment,
    confirm_appointment, create_appointment, donor_appointments, propose_appointment,
    resolve_proposed_dates, update_appointment,
};
pub use donations::{donor_donations, record_donation, update_donation};
pub use donors::{
    bootstrap_admin, create_donor, donor_summary, expiring_donors, list_donor_summaries,
    update_donor, update_profile,
};
pub use suspensions::{end_suspension, suspend_donor};
