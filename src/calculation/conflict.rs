//! Guard against overlapping appointments.

use crate::models::Appointment;

/// Returns true if `donor_id` already holds a pending or confirmed appointment.
///
/// The date of the existing appointment does not matter: any non-terminal
/// appointment blocks a new one.
///
/// ```
/// use donor_scheduler::calculation::has_active_appointment;
///
/// assert!(!has_active_appointment(1, &[]));
/// ```
pub fn has_active_appointment(donor_id: u64, appointments: &[Appointment]) -> bool {
    appointments
        .iter()
        .any(|a| a.donor_id == donor_id && a.status.is_active())
}
