//! Record storage.
//!
//! The [`Store`] trait is the seam between the clinic operations and the
//! place records live. Every mutation returns the stored record or an
//! explicit error; list operations return records in ascending id order.
//! A failed mutation leaves the store as it was.

mod memory;

pub use memory::MemoryStore;

use crate::error::SchedulerResult;
use crate::models::{
    Appointment, AppointmentStatus, Donation, Donor, ExcludedDate, NewAppointment, NewDonation,
    NewDonor, NewExcludedDate, NewSpecialCapacity, NewSuspension, RecordId, Schedule,
    SpecialCapacity, Suspension,
};

/// CRUD over the clinic's records.
///
/// Implementations assign ids and timestamps. Updates replace the whole
/// record with the one passed in, keyed by its id.
pub trait Store: Send + Sync {
    /// All donors (users).
    fn list_donors(&self) -> Vec<Donor>;
    /// Looks up one donor.
    fn get_donor(&self, id: RecordId) -> SchedulerResult<Donor>;
    /// Looks up a donor by email, ignoring case.
    fn find_donor_by_email(&self, email: &str) -> Option<Donor>;
    /// Inserts a donor. Fails with a conflict when the email is taken.
    fn create_donor(&mut self, donor: NewDonor) -> SchedulerResult<Donor>;
    /// Replaces a donor.
    fn update_donor(&mut self, donor: Donor) -> SchedulerResult<Donor>;
    /// Removes a donor along with their donations, appointments and suspensions.
    fn delete_donor(&mut self, id: RecordId) -> SchedulerResult<()>;

    /// Donations, optionally only those of one donor.
    fn list_donations(&self, donor_id: Option<RecordId>) -> Vec<Donation>;
    /// Looks up one donation.
    fn get_donation(&self, id: RecordId) -> SchedulerResult<Donation>;
    /// Inserts a donation.
    fn create_donation(&mut self, donation: NewDonation) -> SchedulerResult<Donation>;
    /// Replaces a donation.
    fn update_donation(&mut self, donation: Donation) -> SchedulerResult<Donation>;
    /// Removes a donation.
    fn delete_donation(&mut self, id: RecordId) -> SchedulerResult<()>;

    /// Appointments, optionally filtered by donor and status.
    fn list_appointments(
        &self,
        donor_id: Option<RecordId>,
        status: Option<AppointmentStatus>,
    ) -> Vec<Appointment>;
    /// Looks up one appointment.
    fn get_appointment(&self, id: RecordId) -> SchedulerResult<Appointment>;
    /// Inserts an appointment; its status follows [`NewAppointment::initial_status`].
    fn create_appointment(&mut self, appointment: NewAppointment) -> SchedulerResult<Appointment>;
    /// Replaces an appointment.
    fn update_appointment(&mut self, appointment: Appointment) -> SchedulerResult<Appointment>;
    /// Removes an appointment.
    fn delete_appointment(&mut self, id: RecordId) -> SchedulerResult<()>;

    /// Suspensions, optionally only those of one donor.
    fn list_suspensions(&self, donor_id: Option<RecordId>) -> Vec<Suspension>;
    /// Looks up one suspension.
    fn get_suspension(&self, id: RecordId) -> SchedulerResult<Suspension>;
    /// Inserts an active suspension created by `created_by`.
    fn create_suspension(
        &mut self,
        suspension: NewSuspension,
        created_by: RecordId,
    ) -> SchedulerResult<Suspension>;
    /// Replaces a suspension.
    fn update_suspension(&mut self, suspension: Suspension) -> SchedulerResult<Suspension>;

    /// The weekly schedule.
    fn schedule(&self) -> Schedule;
    /// Overwrites the weekly schedule.
    fn update_schedule(&mut self, schedule: Schedule) -> SchedulerResult<Schedule>;

    /// Excluded dates.
    fn list_excluded_dates(&self) -> Vec<ExcludedDate>;
    /// Adds an excluded date. Fails with a conflict when the date is already excluded.
    fn add_excluded_date(&mut self, excluded: NewExcludedDate) -> SchedulerResult<ExcludedDate>;
    /// Removes an excluded date.
    fn delete_excluded_date(&mut self, id: RecordId) -> SchedulerResult<()>;

    /// Special capacities.
    fn list_special_capacities(&self) -> Vec<SpecialCapacity>;
    /// Sets the capacity for a date, replacing an existing override for it.
    fn set_special_capacity(
        &mut self,
        special: NewSpecialCapacity,
    ) -> SchedulerResult<SpecialCapacity>;
    /// Removes a special capacity.
    fn delete_special_capacity(&mut self, id: RecordId) -> SchedulerResult<()>;

    /// Starts a unit of work. Mutations made until the matching
    /// [`commit`](Store::commit) are kept in memory only. Units nest; only
    /// the outermost commit persists.
    fn begin(&mut self);
    /// Ends a unit of work and persists it. If persisting fails, every
    /// change made since the outermost [`begin`](Store::begin) is undone.
    fn commit(&mut self) -> SchedulerResult<()>;
    /// Undoes every change made since the outermost [`begin`](Store::begin).
    fn rollback(&mut self);
}

/// Runs `work` as one unit: either all of its changes are kept and
/// persisted, or none are.
///
/// ```
/// use donor_scheduler::error::SchedulerError;
/// use donor_scheduler::models::NewDonor;
/// use donor_scheduler::store::{MemoryStore, Store, atomically};
///
/// let mut store = MemoryStore::in_memory();
/// let result: Result<(), _> = atomically(&mut store, |store| {
///     store.create_donor(NewDonor {
///         email: "anna@example.com".to_string(),
///         ..NewDonor::default()
///     })?;
///     Err(SchedulerError::conflict("changed my mind"))
/// });
///
/// assert!(result.is_err());
/// assert!(store.list_donors().is_empty());
/// ```
pub fn atomically<T>(
    store: &mut dyn Store,
    work: impl FnOnce(&mut dyn Store) -> SchedulerResult<T>,
) -> SchedulerResult<T> {
    store.begin();
    match work(&mut *store) {
        Ok(value) => {
            store.commit()?;
            Ok(value)
        }
        Err(err) => {
            store.rollback();
            Err(err)
        }
    }
}
