//! Donation records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Outcome of a donation visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    /// Blood was collected. Counts toward eligibility.
    #[default]
    Completed,
    /// The visit did not result in a donation.
    Cancelled,
}

/// A single donation in a donor's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The donor who donated.
    pub donor_id: RecordId,
    /// Calendar date of the donation.
    pub donation_date: NaiveDate,
    /// Completed or cancelled.
    pub status: DonationStatus,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Donation {
    /// Returns true if this donation counts toward eligibility.
    pub fn is_completed(&self) -> bool {
        self.status == DonationStatus::Completed
    }
}

/// Fields needed to record a donation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonation {
    /// The donor.
    pub donor_id: RecordId,
    /// Calendar date of the donation.
    pub donation_date: NaiveDate,
    /// Defaults to completed.
    #[serde(default)]
    pub status: DonationStatus,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

/// Partial update of a donation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonationUpdate {
    /// Corrected donation date.
    pub donation_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<DonationStatus>,
    /// Replacement notes.
    pub notes: Option<String>,
}

impl DonationUpdate {
    /// Applies present fields to `donation`.
    pub fn apply_to(&self, donation: &mut Donation) {
        if let Some(date) = self.donation_date {
            donation.donation_date = date;
        }
        if let Some(status) = self.status {
            donation.status = status;
        }
        if let Some(notes) = &self.notes {
            donation.notes = notes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_donation_defaults_to_completed() {
        let json = r#"{"donor_id": 3, "donation_date": "2024-01-01"}"#;
        let new_donation: NewDonation = serde_json::from_str(json).unwrap();
        assert_eq!(new_donation.status, DonationStatus::Completed);
        assert_eq!(
            new_donation.donation_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let json = r#"{"donor_id": 3, "donation_date": "01/01/2024"}"#;
        let result: Result<NewDonation, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_can_cancel_a_donation() {
        let mut donation = Donation {
            id: 1,
            donor_id: 3,
            donation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: DonationStatus::Completed,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        DonationUpdate {
            status: Some(DonationStatus::Cancelled),
            ..DonationUpdate::default()
        }
        .apply_to(&mut donation);
        assert!(!donation.is_completed());
    }
}
