//! In-memory store with an optional JSON snapshot file.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    Appointment, AppointmentStatus, Donation, Donor, ExcludedDate, NewAppointment, NewDonation,
    NewDonor, NewExcludedDate, NewSpecialCapacity, NewSuspension, RecordId, Schedule,
    SpecialCapacity, Suspension,
};

use super::Store;

/// One id-indexed collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Table<T> {
    next_id: RecordId,
    rows: BTreeMap<RecordId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn get(&self, id: RecordId, entity: &'static str) -> SchedulerResult<T> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or(SchedulerError::NotFound { entity, id })
    }

    fn insert(&mut self, build: impl FnOnce(RecordId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn replace(&mut self, id: RecordId, row: T, entity: &'static str) -> SchedulerResult<T> {
        match self.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(SchedulerError::NotFound { entity, id }),
        }
    }

    fn remove(&mut self, id: RecordId, entity: &'static str) -> SchedulerResult<()> {
        self.rows
            .remove(&id)
            .map(|_| ())
            .ok_or(SchedulerError::NotFound { entity, id })
    }

    /// Keeps `next_id` ahead of every stored id (hand-edited snapshots).
    fn reindex(&mut self) {
        if let Some(last) = self.rows.keys().next_back() {
            self.next_id = self.next_id.max(last + 1);
        }
    }
}

/// Everything the store holds, as written to the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    donors: Table<Donor>,
    #[serde(default)]
    donations: Table<Donation>,
    #[serde(default)]
    appointments: Table<Appointment>,
    #[serde(default)]
    suspensions: Table<Suspension>,
    #[serde(default)]
    schedule: Schedule,
    #[serde(default)]
    excluded_dates: Table<ExcludedDate>,
    #[serde(default)]
    special_capacities: Table<SpecialCapacity>,
}

impl Snapshot {
    fn new(schedule: Schedule) -> Self {
        Self {
            donors: Table::default(),
            donations: Table::default(),
            appointments: Table::default(),
            suspensions: Table::default(),
            schedule,
            excluded_dates: Table::default(),
            special_capacities: Table::default(),
        }
    }

    fn reindex(&mut self) {
        self.donors.reindex();
        self.donations.reindex();
        self.appointments.reindex();
        self.suspensions.reindex();
        self.excluded_dates.reindex();
        self.special_capacities.reindex();
    }
}

/// Snapshot taken by the outermost [`Store::begin`].
#[derive(Debug, Clone)]
struct Batch {
    saved: Snapshot,
    depth: u32,
}

/// A [`Store`] kept in memory, optionally mirrored to a JSON file.
///
/// With a data file, every mutation rewrites the whole snapshot before
/// returning: the JSON is written to a sibling `.tmp` file which is then
/// renamed over the data file. Each mutation works on a copy of the
/// snapshot that replaces the live one only after it was written, so a
/// failed write leaves memory and file unchanged. A failed write is
/// reported to the caller and not retried.
///
/// # Example
///
/// ```
/// use donor_scheduler::models::NewDonor;
/// use donor_scheduler::store::{MemoryStore, Store};
///
/// let mut store = MemoryStore::in_memory();
/// let donor = store
///     .create_donor(NewDonor {
///         email: "anna@example.com".to_string(),
///         is_active: true,
///         ..NewDonor::default()
///     })
///     .unwrap();
/// assert_eq!(donor.id, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    snapshot: Snapshot,
    path: Option<PathBuf>,
    batch: Option<Batch>,
}

fn persistence(path: &Path, error: impl Display) -> SchedulerError {
    SchedulerError::Persistence {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

impl MemoryStore {
    /// An empty, memory-only store with the given weekly schedule.
    pub fn new(schedule: Schedule) -> Self {
        Self {
            snapshot: Snapshot::new(schedule),
            path: None,
            batch: None,
        }
    }

    /// An empty, memory-only store with the default weekly schedule.
    pub fn in_memory() -> Self {
        Self::new(Schedule::default())
    }

    /// Opens the snapshot at `path`, or starts empty with `default_schedule`
    /// when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>, default_schedule: Schedule) -> SchedulerResult<Self> {
        let path = path.into();

        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| persistence(&path, e))?;
            let mut snapshot: Snapshot =
                serde_json::from_str(&content).map_err(|e| persistence(&path, e))?;
            snapshot.reindex();
            debug!(path = %path.display(), donors = snapshot.donors.rows.len(), "Loaded snapshot");
            snapshot
        } else {
            debug!(path = %path.display(), "No snapshot found, starting empty");
            Snapshot::new(default_schedule)
        };

        Ok(Self {
            snapshot,
            path: Some(path),
            batch: None,
        })
    }

    /// The snapshot file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn persist(&self, snapshot: &Snapshot) -> SchedulerResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| persistence(path, e))?;
        }

        let json = serde_json::to_vec_pretty(snapshot).map_err(|e| persistence(path, e))?;
        let mut tmp = OsString::from(path.as_os_str());
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(|e| persistence(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| persistence(path, e))?;
        debug!(path = %path.display(), "Snapshot flushed");
        Ok(())
    }

    /// Applies `change` to a copy of the snapshot and swaps the copy in once
    /// it is persisted. Inside a unit of work persisting waits for the
    /// outermost commit.
    fn mutate<R>(
        &mut self,
        change: impl FnOnce(&mut Snapshot) -> SchedulerResult<R>,
    ) -> SchedulerResult<R> {
        let mut next = self.snapshot.clone();
        let result = change(&mut next)?;
        if self.batch.is_none() {
            self.persist(&next)?;
        }
        self.snapshot = next;
        Ok(result)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn email_taken(snapshot: &Snapshot, email: &str) -> bool {
    snapshot
        .donors
        .values()
        .any(|d| d.email.eq_ignore_ascii_case(email))
}

impl Store for MemoryStore {
    fn list_donors(&self) -> Vec<Donor> {
        self.snapshot.donors.values().cloned().collect()
    }

    fn get_donor(&self, id: RecordId) -> SchedulerResult<Donor> {
        self.snapshot.donors.get(id, "donor")
    }

    fn find_donor_by_email(&self, email: &str) -> Option<Donor> {
        self.snapshot
            .donors
            .values()
            .find(|d| d.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    fn create_donor(&mut self, donor: NewDonor) -> SchedulerResult<Donor> {
        self.mutate(|snapshot| {
            if email_taken(snapshot, &donor.email) {
                return Err(SchedulerError::conflict(format!(
                    "email {} is already registered",
                    donor.email
                )));
            }

            let now = Utc::now();
            Ok(snapshot.donors.insert(|id| Donor {
                id,
                email: donor.email,
                first_name: donor.first_name,
                last_name: donor.last_name,
                phone_number: donor.phone_number,
                gender: donor.gender,
                blood_type: donor.blood_type,
                birth_date: donor.birth_date,
                is_admin: donor.is_admin,
                is_active: donor.is_active,
                is_suspended: donor.is_suspended,
                created_at: now,
                updated_at: now,
            }))
        })
    }

    fn update_donor(&mut self, mut donor: Donor) -> SchedulerResult<Donor> {
        donor.updated_at = Utc::now();
        self.mutate(|snapshot| snapshot.donors.replace(donor.id, donor, "donor"))
    }

    fn delete_donor(&mut self, id: RecordId) -> SchedulerResult<()> {
        self.mutate(|snapshot| {
            snapshot.donors.remove(id, "donor")?;
            snapshot.donations.rows.retain(|_, d| d.donor_id != id);
            snapshot.appointments.rows.retain(|_, a| a.donor_id != id);
            snapshot.suspensions.rows.retain(|_, s| s.donor_id != id);
            Ok(())
        })
    }

    fn list_donations(&self, donor_id: Option<RecordId>) -> Vec<Donation> {
        self.snapshot
            .donations
            .values()
            .filter(|d| donor_id.is_none_or(|id| d.donor_id == id))
            .cloned()
            .collect()
    }

    fn get_donation(&self, id: RecordId) -> SchedulerResult<Donation> {
        self.snapshot.donations.get(id, "donation")
    }

    fn create_donation(&mut self, donation: NewDonation) -> SchedulerResult<Donation> {
        let now = Utc::now();
        self.mutate(|snapshot| {
            Ok(snapshot.donations.insert(|id| Donation {
                id,
                donor_id: donation.donor_id,
                donation_date: donation.donation_date,
                status: donation.status,
                notes: donation.notes,
                created_at: now,
                updated_at: now,
            }))
        })
    }

    fn update_donation(&mut self, mut donation: Donation) -> SchedulerResult<Donation> {
        donation.updated_at = Utc::now();
        self.mutate(|snapshot| {
            snapshot
                .donations
                .replace(donation.id, donation, "donation")
        })
    }

    fn delete_donation(&mut self, id: RecordId) -> SchedulerResult<()> {
        self.mutate(|snapshot| snapshot.donations.remove(id, "donation"))
    }

    fn list_appointments(
        &self,
        donor_id: Option<RecordId>,
        status: Option<AppointmentStatus>,
    ) -> Vec<Appointment> {
        self.snapshot
            .appointments
            .values()
            .filter(|a| donor_id.is_none_or(|id| a.donor_id == id))
            .filter(|a| status.is_none_or(|s| a.status == s))
            .cloned()
            .collect()
    }

    fn get_appointment(&self, id: RecordId) -> SchedulerResult<Appointment> {
        self.snapshot.appointments.get(id, "appointment")
    }

    fn create_appointment(&mut self, appointment: NewAppointment) -> SchedulerResult<Appointment> {
        let now = Utc::now();
        let status = appointment.initial_status();
        self.mutate(|snapshot| {
            Ok(snapshot.appointments.insert(|id| Appointment {
                id,
                donor_id: appointment.donor_id,
                proposed_dates: appointment.proposed_dates,
                confirmed_date: appointment.confirmed_date,
                status,
                admin_modified: false,
                modified_by: None,
                notes: appointment.notes,
                created_at: now,
                updated_at: now,
            }))
        })
    }

    fn update_appointment(&mut self, mut appointment: Appointment) -> SchedulerResult<Appointment> {
        appointment.updated_at = Utc::now();
        self.mutate(|snapshot| {
            snapshot
                .appointments
                .replace(appointment.id, appointment, "appointment")
        })
    }

    fn delete_appointment(&mut self, id: RecordId) -> SchedulerResult<()> {
        self.mutate(|snapshot| snapshot.appointments.remove(id, "appointment"))
    }

    fn list_suspensions(&self, donor_id: Option<RecordId>) -> Vec<Suspension> {
        self.snapshot
            .suspensions
            .values()
            .filter(|s| donor_id.is_none_or(|id| s.donor_id == id))
            .cloned()
            .collect()
    }

    fn get_suspension(&self, id: RecordId) -> SchedulerResult<Suspension> {
        self.snapshot.suspensions.get(id, "suspension")
    }

    fn create_suspension(
        &mut self,
        suspension: NewSuspension,
        created_by: RecordId,
    ) -> SchedulerResult<Suspension> {
        let end_date = suspension.end_date();
        self.mutate(|snapshot| {
            Ok(snapshot.suspensions.insert(|id| Suspension {
                id,
                donor_id: suspension.donor_id,
                start_date: suspension.start_date,
                duration_months: suspension.duration_months,
                end_date,
                reason: suspension.reason,
                is_active: true,
                created_by,
                created_at: Utc::now(),
            }))
        })
    }

    fn update_suspension(&mut self, suspension: Suspension) -> SchedulerResult<Suspension> {
        self.mutate(|snapshot| {
            snapshot
                .suspensions
                .replace(suspension.id, suspension, "suspension")
        })
    }

    fn schedule(&self) -> Schedule {
        self.snapshot.schedule.clone()
    }

    fn update_schedule(&mut self, schedule: Schedule) -> SchedulerResult<Schedule> {
        self.mutate(|snapshot| {
            snapshot.schedule = schedule.clone();
            Ok(schedule)
        })
    }

    fn list_excluded_dates(&self) -> Vec<ExcludedDate> {
        self.snapshot.excluded_dates.values().cloned().collect()
    }

    fn add_excluded_date(&mut self, excluded: NewExcludedDate) -> SchedulerResult<ExcludedDate> {
        self.mutate(|snapshot| {
            if snapshot
                .excluded_dates
                .values()
                .any(|e| e.date == excluded.date)
            {
                return Err(SchedulerError::conflict(format!(
                    "{} is already excluded",
                    excluded.date
                )));
            }

            Ok(snapshot.excluded_dates.insert(|id| ExcludedDate {
                id,
                date: excluded.date,
                reason: excluded.reason,
                created_at: Utc::now(),
            }))
        })
    }

    fn delete_excluded_date(&mut self, id: RecordId) -> SchedulerResult<()> {
        self.mutate(|snapshot| snapshot.excluded_dates.remove(id, "excluded date"))
    }

    fn list_special_capacities(&self) -> Vec<SpecialCapacity> {
        self.snapshot.special_capacities.values().cloned().collect()
    }

    fn set_special_capacity(
        &mut self,
        special: NewSpecialCapacity,
    ) -> SchedulerResult<SpecialCapacity> {
        self.mutate(|snapshot| {
            let existing = snapshot
                .special_capacities
                .rows
                .values_mut()
                .find(|s| s.date == special.date);

            Ok(match existing {
                Some(entry) => {
                    entry.capacity = special.capacity;
                    entry.clone()
                }
                None => snapshot.special_capacities.insert(|id| SpecialCapacity {
                    id,
                    date: special.date,
                    capacity: special.capacity,
                    created_at: Utc::now(),
                }),
            })
        })
    }

    fn delete_special_capacity(&mut self, id: RecordId) -> SchedulerResult<()> {
        self.mutate(|snapshot| snapshot.special_capacities.remove(id, "special capacity"))
    }

    fn begin(&mut self) {
        match &mut self.batch {
            Some(batch) => batch.depth += 1,
            None => {
                self.batch = Some(Batch {
                    saved: self.snapshot.clone(),
                    depth: 1,
                })
            }
        }
    }

    fn commit(&mut self) -> SchedulerResult<()> {
        match self.batch.take() {
            Some(mut batch) if batch.depth > 1 => {
                batch.depth -= 1;
                self.batch = Some(batch);
                Ok(())
            }
            Some(batch) => {
                if let Err(err) = self.persist(&self.snapshot) {
                    self.snapshot = batch.saved;
                    return Err(err);
                }
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn rollback(&mut self) {
        if let Some(batch) = self.batch.take() {
            self.snapshot = batch.saved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DaySchedule, DonationStatus};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_donor(email: &str) -> NewDonor {
        NewDonor {
            email: email.to_string(),
            is_active: true,
            ..NewDonor::default()
        }
    }

    fn new_donation(donor_id: RecordId, on: NaiveDate) -> NewDonation {
        NewDonation {
            donor_id,
            donation_date: on,
            status: DonationStatus::Completed,
            notes: String::new(),
        }
    }

    fn new_appointment(donor_id: RecordId) -> NewAppointment {
        NewAppointment {
            donor_id,
            proposed_dates: vec![date(2024, 6, 3), date(2024, 6, 10), date(2024, 6, 17)],
            confirmed_date: None,
            notes: String::new(),
        }
    }

    // ==========================================================================
    // Tables
    // ==========================================================================

    #[test]
    fn test_ids_are_assigned_in_order() {
        let mut store = MemoryStore::in_memory();
        let first = store.create_donor(new_donor("a@example.com")).unwrap();
        let second = store.create_donor(new_donor("b@example.com")).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_duplicate_email_is_a_conflict() {
        let mut store = MemoryStore::in_memory();
        store.create_donor(new_donor("a@example.com")).unwrap();
        let result = store.create_donor(new_donor("A@Example.com"));
        assert!(matches!(result, Err(SchedulerError::Conflict { .. })));
    }

    #[test]
    fn test_missing_records_are_not_found() {
        let mut store = MemoryStore::in_memory();
        assert!(matches!(
            store.get_donor(9),
            Err(SchedulerError::NotFound { entity: "donor", id: 9 })
        ));
        assert!(matches!(
            store.delete_appointment(3),
            Err(SchedulerError::NotFound { entity: "appointment", .. })
        ));
    }

    #[test]
    fn test_list_filters() {
        let mut store = MemoryStore::in_memory();
        store.create_donation(new_donation(1, date(2024, 1, 1))).unwrap();
        store.create_donation(new_donation(2, date(2024, 2, 1))).unwrap();
        store.create_appointment(new_appointment(1)).unwrap();
        let mut confirmed = new_appointment(2);
        confirmed.confirmed_date = Some(date(2024, 6, 3));
        store.create_appointment(confirmed).unwrap();

        assert_eq!(store.list_donations(Some(2)).len(), 1);
        assert_eq!(store.list_donations(None).len(), 2);
        assert_eq!(
            store
                .list_appointments(None, Some(AppointmentStatus::Confirmed))
                .len(),
            1
        );
        assert_eq!(store.list_appointments(Some(1), None).len(), 1);
        assert!(store
            .list_appointments(Some(1), Some(AppointmentStatus::Confirmed))
            .is_empty());
    }

    #[test]
    fn test_delete_donor_removes_their_records() {
        let mut store = MemoryStore::in_memory();
        let donor = store.create_donor(new_donor("a@example.com")).unwrap();
        store.create_donation(new_donation(donor.id, date(2024, 1, 1))).unwrap();
        store.create_donation(new_donation(99, date(2024, 1, 1))).unwrap();
        store.create_appointment(new_appointment(donor.id)).unwrap();

        store.delete_donor(donor.id).unwrap();

        assert!(store.list_donors().is_empty());
        assert_eq!(store.list_donations(None).len(), 1);
        assert!(store.list_appointments(None, None).is_empty());
    }

    // ==========================================================================
    // Schedule exceptions
    // ==========================================================================

    #[test]
    fn test_duplicate_excluded_date_is_a_conflict() {
        let mut store = MemoryStore::in_memory();
        let christmas = NewExcludedDate {
            date: date(2024, 12, 25),
            reason: "Christmas".to_string(),
        };
        store.add_excluded_date(christmas.clone()).unwrap();
        let result = store.add_excluded_date(christmas);
        assert!(matches!(result, Err(SchedulerError::Conflict { .. })));
        assert_eq!(store.list_excluded_dates().len(), 1);
    }

    #[test]
    fn test_special_capacity_replaces_same_date() {
        let mut store = MemoryStore::in_memory();
        let first = store
            .set_special_capacity(NewSpecialCapacity {
                date: date(2024, 6, 8),
                capacity: 5,
            })
            .unwrap();
        let second = store
            .set_special_capacity(NewSpecialCapacity {
                date: date(2024, 6, 8),
                capacity: 12,
            })
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.list_special_capacities().len(), 1);
        assert_eq!(store.list_special_capacities()[0].capacity, 12);
    }

    #[test]
    fn test_update_schedule() {
        let mut store = MemoryStore::in_memory();
        let mut schedule = store.schedule();
        schedule.saturday = DaySchedule::open(6);
        store.update_schedule(schedule.clone()).unwrap();
        assert_eq!(store.schedule(), schedule);
    }

    // ==========================================================================
    // Snapshot file
    // ==========================================================================

    #[test]
    fn test_snapshot_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("clinic.json");

        {
            let mut store = MemoryStore::open(&path, Schedule::default()).unwrap();
            let donor = store.create_donor(new_donor("a@example.com")).unwrap();
            store
                .create_suspension(
                    NewSuspension {
                        donor_id: donor.id,
                        start_date: date(2024, 1, 1),
                        duration_months: 6,
                        reason: "travel".to_string(),
                    },
                    donor.id,
                )
                .unwrap();
        }

        assert!(path.exists());
        let mut store = MemoryStore::open(&path, Schedule::default()).unwrap();
        assert_eq!(store.list_donors().len(), 1);
        assert_eq!(store.list_suspensions(None)[0].end_date, date(2024, 7, 1));

        let next = store.create_donor(new_donor("b@example.com")).unwrap();
        assert_eq!(next.id, 2);
    }

    #[test]
    fn test_missing_file_starts_with_default_schedule() {
        let dir = TempDir::new().unwrap();
        let mut schedule = Schedule::default();
        schedule.sunday = DaySchedule::open(3);

        let store = MemoryStore::open(dir.path().join("clinic.json"), schedule.clone()).unwrap();
        assert_eq!(store.schedule(), schedule);
        assert!(store.list_donors().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_is_a_persistence_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        fs::write(&path, "{ not json").unwrap();

        let result = MemoryStore::open(&path, Schedule::default());
        assert!(matches!(result, Err(SchedulerError::Persistence { .. })));
    }

    #[test]
    fn test_hand_edited_snapshot_keeps_ids_unique() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        let mut store = MemoryStore::open(&path, Schedule::default()).unwrap();
        store.create_donor(new_donor("a@example.com")).unwrap();

        let mut json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        json["donors"]["next_id"] = serde_json::json!(1);
        fs::write(&path, serde_json::to_string(&json).unwrap()).unwrap();

        let mut store = MemoryStore::open(&path, Schedule::default()).unwrap();
        let donor = store.create_donor(new_donor("b@example.com")).unwrap();
        assert_eq!(donor.id, 2);
    }

    // ==========================================================================
    // Failed writes and units of work
    // ==========================================================================

    /// A store whose data directory is a regular file, so every write fails.
    fn unwritable_store(dir: &TempDir) -> MemoryStore {
        let blocker = dir.path().join("data");
        fs::write(&blocker, "").unwrap();
        MemoryStore::open(blocker.join("clinic.json"), Schedule::default()).unwrap()
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = unwritable_store(&dir);

        let result = store.create_donor(new_donor("a@example.com"));
        assert!(matches!(result, Err(SchedulerError::Persistence { .. })));
        assert!(store.list_donors().is_empty());
        assert!(store.find_donor_by_email("a@example.com").is_none());

        // A retry hits the same write error instead of a duplicate email.
        let retry = store.create_donor(new_donor("a@example.com"));
        assert!(matches!(retry, Err(SchedulerError::Persistence { .. })));
    }

    #[test]
    fn test_failed_write_keeps_ids_free() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("clinic.json");
        let mut store = MemoryStore::open(&path, Schedule::default()).unwrap();
        let donor = store.create_donor(new_donor("a@example.com")).unwrap();

        fs::remove_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data"), "").unwrap();
        assert!(store.create_donation(new_donation(donor.id, date(2024, 1, 1))).is_err());
        assert!(store.delete_donor(donor.id).is_err());
        assert_eq!(store.list_donors().len(), 1);

        fs::remove_file(dir.path().join("data")).unwrap();
        let donation = store
            .create_donation(new_donation(donor.id, date(2024, 1, 1)))
            .unwrap();
        assert_eq!(donation.id, 1);
    }

    #[test]
    fn test_rollback_discards_the_unit() {
        let mut store = MemoryStore::in_memory();
        store.create_donor(new_donor("a@example.com")).unwrap();

        store.begin();
        store.create_donor(new_donor("b@example.com")).unwrap();
        store.delete_donor(1).unwrap();
        store.rollback();

        let donors = store.list_donors();
        assert_eq!(donors.len(), 1);
        assert_eq!(donors[0].email, "a@example.com");
    }

    #[test]
    fn test_unit_is_written_once_at_outermost_commit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clinic.json");
        let mut store = MemoryStore::open(&path, Schedule::default()).unwrap();

        store.begin();
        store.create_donor(new_donor("a@example.com")).unwrap();
        store.begin();
        store.create_donor(new_donor("b@example.com")).unwrap();
        store.commit().unwrap();
        assert!(!path.exists());

        store.commit().unwrap();
        let reopened = MemoryStore::open(&path, Schedule::default()).unwrap();
        assert_eq!(reopened.list_donors().len(), 2);
    }

    #[test]
    fn test_failed_commit_restores_state_before_begin() {
        let dir = TempDir::new().unwrap();
        let mut store = unwritable_store(&dir);

        store.begin();
        store.create_donor(new_donor("a@example.com")).unwrap();
        assert_eq!(store.list_donors().len(), 1);

        let result = store.commit();
        assert!(matches!(result, Err(SchedulerError::Persistence { .. })));
        assert!(store.list_donors().is_empty());
    }

    #[test]
    fn test_atomically_rolls_back_on_error() {
        let mut store = MemoryStore::in_memory();
        let result: SchedulerResult<()> = crate::store::atomically(&mut store, |store| {
            store.create_donor(new_donor("a@example.com"))?;
            Err(SchedulerError::conflict("stop"))
        });

        assert!(matches!(result, Err(SchedulerError::Conflict { .. })));
        assert!(store.list_donors().is_empty());
    }
}
