//! Donation history.

use crate::error::SchedulerResult;
use crate::models::{Donation, DonationUpdate, NewDonation, RecordId};
use crate::store::Store;

/// Records a donation for an existing donor.
pub fn record_donation(store: &mut dyn Store, donation: NewDonation) -> SchedulerResult<Donation> {
    store.get_donor(donation.donor_id)?;
    store.create_donation(donation)
}

/// Applies a partial update to a donation.
pub fn update_donation(
    store: &mut dyn Store,
    id: RecordId,
    update: DonationUpdate,
) -> SchedulerResult<Donation> {
    let mut donation = store.get_donation(id)?;
    update.apply_to(&mut donation);
    store.update_donation(donation)
}

/// A donor's donations, newest first.
pub fn donor_donations(store: &dyn Store, donor_id: RecordId) -> SchedulerResult<Vec<Donation>> {
    store.get_donor(donor_id)?;
    let mut donations = store.list_donations(Some(donor_id));
    donations.sort_by(|a, b| b.donation_date.cmp(&a.donation_date).then(b.id.cmp(&a.id)));
    Ok(donations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;
    use crate::models::{DonationStatus, NewDonor};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with_donor() -> MemoryStore {
        let mut store = MemoryStore::in_memory();
        store
            .create_donor(NewDonor {
                email: "a@example.com".to_string(),
                is_active: true,
                ..NewDonor::default()
            })
            .unwrap();
        store
    }

    fn donation(donor_id: RecordId, on: NaiveDate) -> NewDonation {
        NewDonation {
            donor_id,
            donation_date: on,
            status: DonationStatus::Completed,
            notes: String::new(),
        }
    }

    #[test]
    fn test_record_requires_existing_donor() {
        let mut store = store_with_donor();
        assert!(record_donation(&mut store, donation(1, date(2024, 1, 1))).is_ok());

        let result = record_donation(&mut store, donation(7, date(2024, 1, 1)));
        assert!(matches!(
            result,
            Err(SchedulerError::NotFound { entity: "donor", id: 7 })
        ));
    }

    #[test]
    fn test_cancel_donation_through_update() {
        let mut store = store_with_donor();
        let recorded = record_donation(&mut store, donation(1, date(2024, 1, 1))).unwrap();

        let update = DonationUpdate {
            status: Some(DonationStatus::Cancelled),
            ..DonationUpdate::default()
        };
        let updated = update_donation(&mut store, recorded.id, update).unwrap();

        assert_eq!(updated.status, DonationStatus::Cancelled);
        assert_eq!(updated.donation_date, date(2024, 1, 1));
    }

    #[test]
    fn test_donor_donations_newest_first() {
        let mut store = store_with_donor();
        record_donation(&mut store, donation(1, date(2023, 1, 1))).unwrap();
        record_donation(&mut store, donation(1, date(2024, 1, 1))).unwrap();

        let donations = donor_donations(&store, 1).unwrap();
        assert_eq!(donations[0].donation_date, date(2024, 1, 1));
        assert!(donor_donations(&store, 2).is_err());
    }
}
