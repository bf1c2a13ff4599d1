//! Domain models for the donor scheduler.
//!
//! This module contains the core data structures: donors, donations,
//! suspensions, appointments and the clinic's weekly schedule.

mod appointment;
mod donation;
mod donor;
mod schedule;
mod suspension;

/// Identifier assigned by the store to every record.
pub type RecordId = u64;

pub use appointment::{Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment};
pub use donation::{Donation, DonationStatus, DonationUpdate, NewDonation};
pub use donor::{Donor, DonorUpdate, Gender, NewDonor, ProfileUpdate};
pub use schedule::{
    DaySchedule, ExcludedDate, NewExcludedDate, NewSpecialCapacity, Schedule, SpecialCapacity,
};
pub use suspension::{NewSuspension, Suspension, add_months};
