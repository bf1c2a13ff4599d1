//! Donor records and their computed summaries.

use chrono::NaiveDate;

use crate::calculation::{DonorSummary, expiring_within, summarize_donor};
use crate::error::{SchedulerError, SchedulerResult};
use crate::models::{
    Donation, DonationStatus, Donor, DonorUpdate, NewDonation, NewDonor, ProfileUpdate, RecordId,
};
use crate::store::{Store, atomically};

/// Creates a donor after checking the email.
pub fn create_donor(store: &mut dyn Store, mut donor: NewDonor) -> SchedulerResult<Donor> {
    donor.email = donor.email.trim().to_string();
    if donor.email.is_empty() {
        return Err(SchedulerError::validation("email", "must not be empty"));
    }
    if !donor.email.contains('@') {
        return Err(SchedulerError::validation(
            "email",
            format!("'{}' is not an email address", donor.email),
        ));
    }
    store.create_donor(donor)
}

/// Applies an admin update.
///
/// `last_donation_date` corrects the date of the donor's most recent
/// completed donation, or records a completed donation on that date when
/// the donor has none.
pub fn update_donor(
    store: &mut dyn Store,
    id: RecordId,
    update: DonorUpdate,
) -> SchedulerResult<Donor> {
    let mut donor = store.get_donor(id)?;
    update.apply_to(&mut donor);
    atomically(store, |store| {
        let donor = store.update_donor(donor)?;
        if let Some(date) = update.last_donation_date {
            set_last_donation_date(store, id, date)?;
        }
        Ok(donor)
    })
}

/// Applies a self-service profile update.
pub fn update_profile(
    store: &mut dyn Store,
    id: RecordId,
    update: ProfileUpdate,
) -> SchedulerResult<Donor> {
    update_donor(store, id, update.into())
}

fn set_last_donation_date(
    store: &mut dyn Store,
    donor_id: RecordId,
    date: NaiveDate,
) -> SchedulerResult<Donation> {
    let latest = store
        .list_donations(Some(donor_id))
        .into_iter()
        .filter(Donation::is_completed)
        .max_by_key(|d| (d.donation_date, d.id));

    match latest {
        Some(mut donation) => {
            donation.donation_date = date;
            store.update_donation(donation)
        }
        None => store.create_donation(NewDonation {
            donor_id,
            donation_date: date,
            status: DonationStatus::Completed,
            notes: "Recorded from donor profile".to_string(),
        }),
    }
}

/// The summary of one donor on `today`.
pub fn donor_summary(
    store: &dyn Store,
    id: RecordId,
    today: NaiveDate,
) -> SchedulerResult<DonorSummary> {
    let donor = store.get_donor(id)?;
    Ok(summarize_donor(
        &donor,
        &store.list_donations(Some(id)),
        &store.list_suspensions(Some(id)),
        &store.list_appointments(Some(id), None),
        today,
    ))
}

/// Summaries of every donor, in id order.
pub fn list_donor_summaries(store: &dyn Store, today: NaiveDate) -> Vec<DonorSummary> {
    let donations = store.list_donations(None);
    let suspensions = store.list_suspensions(None);
    let appointments = store.list_appointments(None, None);

    store
        .list_donors()
        .iter()
        .map(|donor| summarize_donor(donor, &donations, &suspensions, &appointments, today))
        .collect()
}

/// The recall queue over the whole store.
pub fn expiring_donors(store: &dyn Store, today: NaiveDate, window_days: i64) -> Vec<DonorSummary> {
    expiring_within(
        &store.list_donors(),
        &store.list_donations(None),
        &store.list_suspensions(None),
        &store.list_appointments(None, None),
        today,
        window_days,
    )
}

/// Creates `admin` as an active administrator when the store holds no users.
///
/// Returns the created donor, or `None` when users already exist.
pub fn bootstrap_admin(store: &mut dyn Store, admin: NewDonor) -> SchedulerResult<Option<Donor>> {
    if !store.list_donors().is_empty() {
        return Ok(None);
    }

    let admin = NewDonor {
        is_admin: true,
        is_active: true,
        is_suspended: false,
        ..admin
    };
    create_donor(store, admin).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_donor(email: &str, gender: Gender) -> NewDonor {
        NewDonor {
            email: email.to_string(),
            first_name: "Test".to_string(),
            gender: Some(gender),
            is_active: true,
            ..NewDonor::default()
        }
    }

    fn completed(donor_id: RecordId, on: NaiveDate) -> NewDonation {
        NewDonation {
            donor_id,
            donation_date: on,
            status: DonationStatus::Completed,
            notes: String::new(),
        }
    }

    #[test]
    fn test_create_donor_trims_and_checks_email() {
        let mut store = MemoryStore::in_memory();

        let donor = create_donor(&mut store, new_donor("  anna@example.com ", Gender::Female)).unwrap();
        assert_eq!(donor.email, "anna@example.com");

        let empty = create_donor(&mut store, new_donor("   ", Gender::Female));
        assert!(matches!(empty, Err(SchedulerError::Validation { .. })));

        let bogus = create_donor(&mut store, new_donor("anna", Gender::Female));
        assert!(matches!(bogus, Err(SchedulerError::Validation { .. })));
    }

    #[test]
    fn test_update_rewrites_latest_completed_donation() {
        let mut store = MemoryStore::in_memory();
        let donor = create_donor(&mut store, new_donor("a@example.com", Gender::Male)).unwrap();
        store.create_donation(completed(donor.id, date(2023, 6, 1))).unwrap();
        store.create_donation(completed(donor.id, date(2024, 1, 1))).unwrap();

        let update = DonorUpdate {
            last_donation_date: Some(date(2024, 2, 1)),
            ..DonorUpdate::default()
        };
        update_donor(&mut store, donor.id, update).unwrap();

        let mut dates: Vec<NaiveDate> = store
            .list_donations(Some(donor.id))
            .iter()
            .map(|d| d.donation_date)
            .collect();
        dates.sort();
        assert_eq!(dates, vec![date(2023, 6, 1), date(2024, 2, 1)]);
    }

    #[test]
    fn test_update_records_donation_when_none_exists() {
        let mut store = MemoryStore::in_memory();
        let donor = create_donor(&mut store, new_donor("a@example.com", Gender::Male)).unwrap();

        let update = DonorUpdate {
            first_name: Some("Marco".to_string()),
            last_donation_date: Some(date(2024, 1, 1)),
            ..DonorUpdate::default()
        };
        let updated = update_donor(&mut store, donor.id, update).unwrap();

        assert_eq!(updated.first_name, "Marco");
        let summary = donor_summary(&store, donor.id, date(2024, 4, 5)).unwrap();
        assert_eq!(summary.eligibility.next_due_date, Some(date(2024, 4, 1)));
    }

    #[test]
    fn test_profile_update_keeps_privileged_fields() {
        let mut store = MemoryStore::in_memory();
        let donor = create_donor(&mut store, new_donor("a@example.com", Gender::Male)).unwrap();

        let update = ProfileUpdate {
            blood_type: Some("0-".to_string()),
            ..ProfileUpdate::default()
        };
        let updated = update_profile(&mut store, donor.id, update).unwrap();

        assert_eq!(updated.blood_type, "0-");
        assert!(!updated.is_admin);
        assert!(updated.is_active);
    }

    #[test]
    fn test_update_missing_donor_is_not_found() {
        let mut store = MemoryStore::in_memory();
        let result = update_donor(&mut store, 42, DonorUpdate::default());
        assert!(matches!(result, Err(SchedulerError::NotFound { id: 42, .. })));
    }

    #[test]
    fn test_expiring_donors_over_store() {
        let mut store = MemoryStore::in_memory();
        let due = create_donor(&mut store, new_donor("due@example.com", Gender::Male)).unwrap();
        let fresh = create_donor(&mut store, new_donor("fresh@example.com", Gender::Female)).unwrap();
        store.create_donation(completed(due.id, date(2024, 1, 1))).unwrap();
        store.create_donation(completed(fresh.id, date(2024, 3, 1))).unwrap();

        let queue = expiring_donors(&store, date(2024, 4, 5), 14);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].donor.id, due.id);

        assert_eq!(list_donor_summaries(&store, date(2024, 4, 5)).len(), 2);
    }

    #[test]
    fn test_bootstrap_admin_only_on_empty_store() {
        let mut store = MemoryStore::in_memory();

        let admin = bootstrap_admin(&mut store, new_donor("admin@example.com", Gender::Female))
            .unwrap()
            .unwrap();
        assert!(admin.is_admin);
        assert!(admin.is_active);

        let again = bootstrap_admin(&mut store, new_donor("other@example.com", Gender::Male)).unwrap();
        assert!(again.is_none());
        assert_eq!(store.list_donors().len(), 1);
    }
}
