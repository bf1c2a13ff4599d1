//! Appointment proposals, confirmations and their lifecycle.
//!
//! Every operation that puts a date on an appointment runs the booking
//! assessment for that date first: the date must be open, have a free slot
//! and fall inside the donor's eligibility window.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::calculation::{
    BookingAssessment, CapacityResult, assess_booking, booked_on, check_capacity,
    evaluate_eligibility, has_active_appointment,
};
use crate::error::{SchedulerError, SchedulerResult};
use crate::identity::Principal;
use crate::models::{
    Appointment, AppointmentStatus, AppointmentUpdate, Donation, DonationStatus, Donor,
    NewAppointment, NewDonation, RecordId,
};
use crate::store::{Store, atomically};

/// A freshly proposed appointment with the assessment of each offered date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Proposal {
    /// The pending appointment.
    pub appointment: Appointment,
    /// One assessment per proposed date, in the same order.
    pub assessments: Vec<BookingAssessment>,
}

/// A completed appointment and the donation it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    /// The appointment, now completed.
    pub appointment: Appointment,
    /// The completed donation dated on the appointment day.
    pub donation: Donation,
}

/// Capacity and booking verdict for one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Availability {
    /// Capacity resolved for the date.
    pub capacity: CapacityResult,
    /// Booking verdict, for a specific donor when one was given.
    pub booking: BookingAssessment,
}

/// Fills the proposal slots the caller left empty with `today + offset`.
///
/// There are as many slots as offsets (or requested dates, if more were
/// given).
///
/// ```
/// use chrono::NaiveDate;
/// use donor_scheduler::clinic::resolve_proposed_dates;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let picked = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let dates = resolve_proposed_dates(&[Some(picked), None], &[7, 14, 21], today);
/// assert_eq!(
///     dates,
///     vec![
///         picked,
///         NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 6, 22).unwrap(),
///     ]
/// );
/// ```
pub fn resolve_proposed_dates(
    requested: &[Option<NaiveDate>],
    offsets_days: &[i64],
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let slots = requested.len().max(offsets_days.len());
    (0..slots)
        .filter_map(|i| {
            requested
                .get(i)
                .copied()
                .flatten()
                .or_else(|| offsets_days.get(i).map(|days| today + Duration::days(*days)))
        })
        .collect()
}

fn assess(
    store: &dyn Store,
    donor: Option<&Donor>,
    date: NaiveDate,
    exclude_id: Option<RecordId>,
    today: NaiveDate,
) -> Availability {
    let capacity = check_capacity(
        date,
        &store.schedule(),
        &store.list_excluded_dates(),
        &store.list_special_capacities(),
    );
    let booked = booked_on(
        date,
        &store.list_appointments(None, Some(AppointmentStatus::Confirmed)),
        exclude_id,
    );

    let booking = match donor {
        Some(donor) => {
            let eligibility = evaluate_eligibility(
                donor,
                &store.list_donations(Some(donor.id)),
                &store.list_suspensions(Some(donor.id)),
                today,
            );
            assess_booking(&capacity, booked, Some(&eligibility), donor.is_suspended)
        }
        None => assess_booking(&capacity, booked, None, false),
    };

    Availability { capacity, booking }
}

fn require_bookable(
    store: &dyn Store,
    donor: &Donor,
    date: NaiveDate,
    exclude_id: Option<RecordId>,
    today: NaiveDate,
) -> SchedulerResult<()> {
    if date < today {
        return Err(SchedulerError::validation(
            "date",
            format!("{} is in the past", date),
        ));
    }

    let booking = assess(store, Some(donor), date, exclude_id, today).booking;
    if booking.verdict.is_available() {
        Ok(())
    } else {
        Err(SchedulerError::conflict(format!(
            "{} cannot be booked: {}",
            date, booking.reasoning
        )))
    }
}

fn require_active(donor: &Donor) -> SchedulerResult<()> {
    if donor.is_active {
        Ok(())
    } else {
        Err(SchedulerError::conflict(format!(
            "donor {} is not active",
            donor.id
        )))
    }
}

fn require_not_past(dates: &[NaiveDate], today: NaiveDate) -> SchedulerResult<()> {
    match dates.iter().find(|d| **d < today) {
        Some(past) => Err(SchedulerError::validation(
            "proposed_dates",
            format!("{} is in the past", past),
        )),
        None => Ok(()),
    }
}

fn require_no_active_appointment(store: &dyn Store, donor_id: RecordId) -> SchedulerResult<()> {
    if has_active_appointment(donor_id, &store.list_appointments(Some(donor_id), None)) {
        Err(SchedulerError::conflict(format!(
            "donor {} already has a pending or confirmed appointment",
            donor_id
        )))
    } else {
        Ok(())
    }
}

fn require_transition(appointment: &Appointment, next: AppointmentStatus) -> SchedulerResult<()> {
    if appointment.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(SchedulerError::conflict(format!(
            "appointment {} is {} and cannot become {}",
            appointment.id, appointment.status, next
        )))
    }
}

/// Capacity and booking verdict for `date`, optionally for one donor.
pub fn availability(
    store: &dyn Store,
    date: NaiveDate,
    donor_id: Option<RecordId>,
    today: NaiveDate,
) -> SchedulerResult<Availability> {
    let donor = donor_id.map(|id| store.get_donor(id)).transpose()?;
    Ok(assess(store, donor.as_ref(), date, None, today))
}

/// Offers a donor candidate dates.
///
/// Missing dates are filled from `offsets_days`. The proposal is stored as
/// pending even when some dates are not bookable; the returned assessments
/// tell the admin which ones are.
pub fn propose_appointment(
    store: &mut dyn Store,
    donor_id: RecordId,
    requested: &[Option<NaiveDate>],
    offsets_days: &[i64],
    notes: String,
    today: NaiveDate,
) -> SchedulerResult<Proposal> {
    let donor = store.get_donor(donor_id)?;
    require_active(&donor)?;
    require_no_active_appointment(store, donor_id)?;

    let proposed_dates = resolve_proposed_dates(requested, offsets_days, today);
    if proposed_dates.is_empty() {
        return Err(SchedulerError::validation(
            "proposed_dates",
            "at least one date is required",
        ));
    }
    require_not_past(&proposed_dates, today)?;

    let appointment = store.create_appointment(NewAppointment {
        donor_id,
        proposed_dates,
        confirmed_date: None,
        notes,
    })?;

    let assessments = appointment
        .proposed_dates
        .iter()
        .map(|date| assess(store, Some(&donor), *date, None, today).booking)
        .collect();

    Ok(Proposal {
        appointment,
        assessments,
    })
}

/// Books an appointment directly. The donor must be active and no proposed
/// date may be in the past. With a `confirmed_date` the date must be
/// bookable and the appointment starts confirmed.
pub fn create_appointment(
    store: &mut dyn Store,
    appointment: NewAppointment,
    today: NaiveDate,
) -> SchedulerResult<Appointment> {
    let donor = store.get_donor(appointment.donor_id)?;
    require_active(&donor)?;
    require_no_active_appointment(store, donor.id)?;
    require_not_past(&appointment.proposed_dates, today)?;

    if let Some(date) = appointment.confirmed_date {
        require_bookable(store, &donor, date, None, today)?;
    }
    store.create_appointment(appointment)
}

/// Confirms a pending appointment on `selected_date`.
///
/// The caller must own the appointment or be an admin. The date must be one
/// of the proposed dates (when there are any) and must be bookable.
pub fn confirm_appointment(
    store: &mut dyn Store,
    id: RecordId,
    selected_date: NaiveDate,
    actor: &Principal,
    today: NaiveDate,
) -> SchedulerResult<Appointment> {
    let mut appointment = store.get_appointment(id)?;
    actor.require_self_or_admin(appointment.donor_id)?;
    require_transition(&appointment, AppointmentStatus::Confirmed)?;

    if !appointment.proposed_dates.is_empty() && !appointment.offers(selected_date) {
        return Err(SchedulerError::validation(
            "selected_date",
            format!("{} is not one of the proposed dates", selected_date),
        ));
    }

    let donor = store.get_donor(appointment.donor_id)?;
    require_bookable(store, &donor, selected_date, Some(id), today)?;

    appointment.status = AppointmentStatus::Confirmed;
    appointment.confirmed_date = Some(selected_date);
    if actor.id != appointment.donor_id {
        appointment.admin_modified = true;
        appointment.modified_by = Some(actor.id);
    }
    store.update_appointment(appointment)
}

/// Cancels a pending or confirmed appointment.
pub fn cancel_appointment(
    store: &mut dyn Store,
    id: RecordId,
    actor: &Principal,
) -> SchedulerResult<Appointment> {
    let mut appointment = store.get_appointment(id)?;
    require_transition(&appointment, AppointmentStatus::Cancelled)?;

    appointment.status = AppointmentStatus::Cancelled;
    appointment.admin_modified = true;
    appointment.modified_by = Some(actor.id);
    store.update_appointment(appointment)
}

fn record_appointment_donation(
    store: &mut dyn Store,
    appointment: &Appointment,
) -> SchedulerResult<Donation> {
    let donation_date = appointment.confirmed_date.ok_or_else(|| {
        SchedulerError::validation("confirmed_date", "a completed appointment needs a date")
    })?;
    store.create_donation(NewDonation {
        donor_id: appointment.donor_id,
        donation_date,
        status: DonationStatus::Completed,
        notes: format!("Appointment {}", appointment.id),
    })
}

/// Marks a confirmed appointment completed and records the donation.
pub fn complete_appointment(
    store: &mut dyn Store,
    id: RecordId,
    actor: &Principal,
) -> SchedulerResult<Completion> {
    let mut appointment = store.get_appointment(id)?;
    require_transition(&appointment, AppointmentStatus::Completed)?;

    appointment.status = AppointmentStatus::Completed;
    appointment.admin_modified = true;
    appointment.modified_by = Some(actor.id);
    atomically(store, |store| {
        let donation = record_appointment_donation(store, &appointment)?;
        let appointment = store.update_appointment(appointment)?;
        Ok(Completion {
            appointment,
            donation,
        })
    })
}

/// Applies an admin edit.
///
/// A status change must be a legal transition. Whenever the appointment
/// ends up confirmed on a new date, that date must be bookable. Moving to
/// completed records the donation as [`complete_appointment`] does.
pub fn update_appointment(
    store: &mut dyn Store,
    id: RecordId,
    update: AppointmentUpdate,
    actor: &Principal,
    today: NaiveDate,
) -> SchedulerResult<Appointment> {
    let mut appointment = store.get_appointment(id)?;
    let previous_status = appointment.status;
    let previous_date = appointment.confirmed_date;

    let status = update.status.unwrap_or(previous_status);
    if status != previous_status {
        require_transition(&appointment, status)?;
    }

    if let Some(dates) = update.proposed_dates {
        appointment.proposed_dates = dates;
    }
    if let Some(date) = update.confirmed_date {
        appointment.confirmed_date = Some(date);
    }
    if let Some(notes) = update.notes {
        appointment.notes = notes;
    }

    if status == AppointmentStatus::Confirmed
        && (previous_status != status || appointment.confirmed_date != previous_date)
    {
        let date = appointment.confirmed_date.ok_or_else(|| {
            SchedulerError::validation("confirmed_date", "required to confirm an appointment")
        })?;
        let donor = store.get_donor(appointment.donor_id)?;
        require_bookable(store, &donor, date, Some(id), today)?;
    }

    appointment.status = status;
    appointment.admin_modified = true;
    appointment.modified_by = Some(actor.id);

    atomically(store, |store| {
        if status == AppointmentStatus::Completed && previous_status != status {
            record_appointment_donation(store, &appointment)?;
        }
        store.update_appointment(appointment)
    })
}

/// A donor's appointments, newest first.
pub fn donor_appointments(
    store: &dyn Store,
    donor_id: RecordId,
) -> SchedulerResult<Vec<Appointment>> {
    store.get_donor(donor_id)?;
    let mut appointments = store.list_appointments(Some(donor_id), None);
    appointments.reverse();
    Ok(appointments)
}
