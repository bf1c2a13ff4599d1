//! Donor eligibility evaluation.
//!
//! This module derives, from a donor's completed donations and suspensions,
//! how long ago they last donated and when they may donate next.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Donation, Donor, Suspension, add_months};

/// Months between donations for male donors.
pub const MALE_DONATION_INTERVAL_MONTHS: u32 = 3;

/// Months between donations for female donors (and donors of unknown gender).
pub const FEMALE_DONATION_INTERVAL_MONTHS: u32 = 6;

/// The result of evaluating a donor's eligibility on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// The donor evaluated.
    pub donor_id: u64,
    /// Number of completed donations on record.
    pub total_donations: usize,
    /// Most recent completed donation, if any.
    pub last_donation_date: Option<NaiveDate>,
    /// Whole days between the last donation and the evaluation date.
    pub days_since_last_donation: Option<i64>,
    /// The gender-based interval applied.
    pub interval_months: u32,
    /// End date of the suspension gating the donor, if one is in force.
    pub suspended_until: Option<NaiveDate>,
    /// First day the donor may donate again. `None` means no completed
    /// donation exists and the donor is not held back by the interval.
    pub next_due_date: Option<NaiveDate>,
    /// Whether the donor may donate on the evaluation date.
    pub is_eligible: bool,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

impl EligibilityResult {
    /// Days past the due date (negative while the due date is still ahead).
    pub fn days_overdue(&self, today: NaiveDate) -> Option<i64> {
        self.next_due_date.map(|due| (today - due).num_days())
    }
}

/// Returns the minimum months between donations for `donor`.
///
/// ```
/// use donor_scheduler::calculation::donation_interval_months;
/// use donor_scheduler::models::{Donor, Gender};
/// # use chrono::Utc;
/// # let donor = Donor {
/// #     id: 1, email: "a@b.c".into(), first_name: "A".into(), last_name: "B".into(),
/// #     phone_number: String::new(), gender: Some(Gender::Male), blood_type: String::new(),
/// #     birth_date: None, is_admin: false, is_active: true, is_suspended: false,
/// #     created_at: Utc::now(), updated_at: Utc::now(),
/// # };
/// assert_eq!(donation_interval_months(&donor), 3);
/// ```
pub fn donation_interval_months(donor: &Donor) -> u32 {
    if donor.is_male() {
        MALE_DONATION_INTERVAL_MONTHS
    } else {
        FEMALE_DONATION_INTERVAL_MONTHS
    }
}

/// Finds the suspension gating `donor_id` on `today`.
///
/// The first suspension in collection order that is in force wins; when
/// several overlap, the earlier-created one decides.
pub fn active_suspension<'a>(
    donor_id: u64,
    suspensions: &'a [Suspension],
    today: NaiveDate,
) -> Option<&'a Suspension> {
    suspensions
        .iter()
        .find(|s| s.donor_id == donor_id && s.is_in_force(today))
}

/// Evaluates a donor's eligibility on `today`.
///
/// `donations` and `suspensions` may contain records of other donors; only
/// the donor's own completed donations and suspensions are considered.
///
/// # Rules
///
/// 1. The last donation is the latest completed donation.
/// 2. The interval is 3 months for male donors and 6 months otherwise.
/// 3. A suspension in force pushes the due date to the suspension's end;
///    otherwise the due date is the last donation plus the interval.
/// 4. Without a completed donation there is no due date.
///
/// A donor flagged as suspended, or with a suspension in force, is never
/// eligible whatever the due date says.
///
/// # Example
///
/// ```
/// use donor_scheduler::calculation::evaluate_eligibility;
/// use donor_scheduler::models::{Donation, DonationStatus, Donor, Gender};
/// use chrono::{NaiveDate, Utc};
///
/// let donor = Donor {
///     id: 1,
///     email: "mario@example.com".to_string(),
///     first_name: "Mario".to_string(),
///     last_name: "Rossi".to_string(),
///     phone_number: String::new(),
///     gender: Some(Gender::Male),
///     blood_type: "A+".to_string(),
///     birth_date: None,
///     is_admin: false,
///     is_active: true,
///     is_suspended: false,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// let donations = vec![Donation {
///     id: 1,
///     donor_id: 1,
///     donation_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     status: DonationStatus::Completed,
///     notes: String::new(),
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// }];
///
/// let today = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();
/// let result = evaluate_eligibility(&donor, &donations, &[], today);
///
/// assert_eq!(result.next_due_date, NaiveDate::from_ymd_opt(2024, 4, 1));
/// assert_eq!(result.days_since_last_donation, Some(95));
/// assert!(result.is_eligible);
/// ```
pub fn evaluate_eligibility(
    donor: &Donor,
    donations: &[Donation],
    suspensions: &[Suspension],
    today: NaiveDate,
) -> EligibilityResult {
    let completed: Vec<&Donation> = donations
        .iter()
        .filter(|d| d.donor_id == donor.id && d.is_completed())
        .collect();

    let last_donation_date = completed.iter().map(|d| d.donation_date).max();
    let days_since_last_donation = last_donation_date.map(|last| (today - last).num_days());
    let interval_months = donation_interval_months(donor);
    let suspended_until = active_suspension(donor.id, suspensions, today).map(|s| s.end_date);

    let next_due_date = last_donation_date.map(|last| match suspended_until {
        Some(end_date) => end_date,
        None => add_months(last, interval_months),
    });

    let is_eligible = !donor.is_suspended
        && suspended_until.is_none()
        && next_due_date.is_none_or(|due| due <= today);

    let reasoning = match (last_donation_date, suspended_until, next_due_date) {
        _ if donor.is_suspended && suspended_until.is_none() => {
            "Donor is flagged as suspended - not eligible".to_string()
        }
        (None, Some(end), _) => format!(
            "No completed donations, but suspended until {} - not eligible",
            end
        ),
        (None, None, _) => "No completed donations on record - eligible immediately".to_string(),
        (Some(last), Some(end), _) => format!(
            "Last donation {}; suspension in force until {} overrides the {}-month interval",
            last, end, interval_months
        ),
        (Some(last), None, Some(due)) if due <= today => format!(
            "Last donation {} + {} months = {}, due date reached",
            last, interval_months, due
        ),
        (Some(last), None, Some(due)) => format!(
            "Last donation {} + {} months = {}, not yet due",
            last, interval_months, due
        ),
        (Some(last), None, None) => format!("Last donation {}", last),
    };

    EligibilityResult {
        donor_id: donor.id,
        total_donations: completed.len(),
        last_donation_date,
        days_since_last_donation,
        interval_months,
        suspended_until,
        next_due_date,
        is_eligible,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DonationStatus, Gender};
    use chrono::Utc;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_donor(id: u64, gender: Gender) -> Donor {
        Donor {
            id,
            email: format!("donor{}@example.com", id),
            first_name: "Test".to_string(),
            last_name: "Donor".to_string(),
            phone_number: String::new(),
            gender: Some(gender),
            blood_type: "0-".to_string(),
            birth_date: None,
            is_admin: false,
            is_active: true,
            is_suspended: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_donation(id: u64, donor_id: u64, on: NaiveDate, status: DonationStatus) -> Donation {
        Donation {
            id,
            donor_id,
            donation_date: on,
            status,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn create_suspension(id: u64, donor_id: u64, end_date: NaiveDate, is_active: bool) -> Suspension {
        Suspension {
            id,
            donor_id,
            start_date: date(2024, 1, 1),
            duration_months: 1,
            end_date,
            reason: "test".to_string(),
            is_active,
            created_by: 1,
            created_at: Utc::now(),
        }
    }

    // ==========================================================================
    // No donations
    // ==========================================================================
    #[test]
    fn test_no_donations_means_no_due_date_and_eligible() {
        let donor = create_donor(1, Gender::Male);
        let result = evaluate_eligibility(&donor, &[], &[], date(2024, 4, 5));

        assert_eq!(result.last_donation_date, None);
        assert_eq!(result.days_since_last_donation, None);
        assert_eq!(result.next_due_date, None);
        assert_eq!(result.total_donations, 0);
        assert!(result.is_eligible);
        assert!(result.reasoning.contains("eligible immediately"));
    }

    #[test]
    fn test_only_cancelled_donations_count_as_none() {
        let donor = create_donor(1, Gender::Female);
        let donations = vec![create_donation(1, 1, date(2024, 3, 1), DonationStatus::Cancelled)];
        let result = evaluate_eligibility(&donor, &donations, &[], date(2024, 4, 5));

        assert_eq!(result.last_donation_date, None);
        assert_eq!(result.next_due_date, None);
        assert!(result.is_eligible);
    }

    // ==========================================================================
    // Gender intervals
    // ==========================================================================
    #[test]
    fn test_male_interval_is_three_months() {
        let donor = create_donor(1, Gender::Male);
        let donations = vec![create_donation(1, 1, date(2024, 1, 1), DonationStatus::Completed)];
        let result = evaluate_eligibility(&donor, &donations, &[], date(2024, 4, 5));

        assert_eq!(result.interval_months, 3);
        assert_eq!(result.next_due_date, Some(date(2024, 4, 1)));
        assert_eq!(result.days_since_last_donation, Some(95));
        assert_eq!(result.days_overdue(date(2024, 4, 5)), Some(4));
        assert!(result.is_eligible);
    }

    #[test]
    fn test_female_interval_is_six_months() {
        let donor = create_donor(1, Gender::Female);
        let donations = vec![create_donation(1, 1, date(2024, 1, 1), DonationStatus::Completed)];
        let result = evaluate_eligibility(&donor, &donations, &[], date(2024, 4, 5));

        assert_eq!(result.interval_months, 6);
        assert_eq!(result.next_due_date, Some(date(2024, 7, 1)));
        assert!(!result.is_eligible);
        assert!(result.reasoning.contains("not yet due"));
    }

    #[test]
    fn test_unknown_gender_uses_longer_interval() {
        let mut donor = create_donor(1, Gender::Male);
        donor.gender = None;
        assert_eq!(donation_interval_months(&donor), FEMALE_DONATION_INTERVAL_MONTHS);
    }

    #[test]
    fn test_latest_completed_donation_wins() {
        let donor = create_donor(1, Gender::Male);
        let donations = vec![
            create_donation(1, 1, date(2023, 6, 1), DonationStatus::Completed),
            create_donation(2, 1, date(2024, 2, 10), DonationStatus::Completed),
            create_donation(3, 1, date(2024, 3, 1), DonationStatus::Cancelled),
            create_donation(4, 2, date(2024, 3, 20), DonationStatus::Completed),
        ];
        let result = evaluate_eligibility(&donor, &donations, &[], date(2024, 4, 5));

        assert_eq!(result.last_donation_date, Some(date(2024, 2, 10)));
        assert_eq!(result.total_donations, 2);
        assert_eq!(result.next_due_date, Some(date(2024, 5, 10)));
    }

    #[test]
    fn test_due_date_on_today_is_eligible() {
        let donor = create_donor(1, Gender::Male);
        let donations = vec![create_donation(1, 1, date(2024, 1, 5), DonationStatus::Completed)];
        let result = evaluate_eligibility(&donor, &donations, &[], date(2024, 4, 5));
        assert_eq!(result.next_due_date, Some(date(2024, 4, 5)));
        assert!(result.is_eligible);
    }

    // ==========================================================================
    // Suspensions
    // ==========================================================================
    #[test]
    fn test_active_suspension_overrides_due_date() {
        let donor = create_donor(1, Gender::Male);
        let donations = vec![create_donation(1, 1, date(2024, 1, 1), DonationStatus::Completed)];
        let suspensions = vec![create_suspension(1, 1, date(2024, 9, 1), true)];
        let result = evaluate_eligibility(&donor, &donations, &suspensions, date(2024, 4, 5));

        assert_eq!(result.suspended_until, Some(date(2024, 9, 1)));
        assert_eq!(result.next_due_date, Some(date(2024, 9, 1)));
        assert!(!result.is_eligible);
    }

    #[test]
    fn test_suspension_ending_before_interval_still_overrides() {
        let donor = create_donor(1, Gender::Female);
        let donations = vec![create_donation(1, 1, date(2024, 3, 1), DonationStatus::Completed)];
        let suspensions = vec![create_suspension(1, 1, date(2024, 5, 1), true)];
        let result = evaluate_eligibility(&donor, &donations, &suspensions, date(2024, 4, 5));

        assert_eq!(result.next_due_date, Some(date(2024, 5, 1)));
    }

    #[test]
    fn test_expired_or_ended_suspension_is_ignored() {
        let donor = create_donor(1, Gender::Male);
        let donations = vec![create_donation(1, 1, date(2024, 1, 1), DonationStatus::Completed)];
        let suspensions = vec![
            create_suspension(1, 1, date(2024, 3, 1), true),
            create_suspension(2, 1, date(2024, 12, 1), false),
        ];
        let result = evaluate_eligibility(&donor, &donations, &suspensions, date(2024, 4, 5));

        assert_eq!(result.suspended_until, None);
        assert_eq!(result.next_due_date, Some(date(2024, 4, 1)));
        assert!(result.is_eligible);
    }

    #[test]
    fn test_first_suspension_in_collection_order_wins() {
        let donor = create_donor(1, Gender::Male);
        let donations = vec![create_donation(1, 1, date(2024, 1, 1), DonationStatus::Completed)];
        let suspensions = vec![
            create_suspension(1, 1, date(2024, 6, 1), true),
            create_suspension(2, 1, date(2024, 12, 1), true),
        ];
        let result = evaluate_eligibility(&donor, &donations, &suspensions, date(2024, 4, 5));

        assert_eq!(result.next_due_date, Some(date(2024, 6, 1)));
    }

    #[test]
    fn test_suspension_without_donations_blocks_but_leaves_due_date_undefined() {
        let donor = create_donor(1, Gender::Male);
        let suspensions = vec![create_suspension(1, 1, date(2024, 6, 1), true)];
        let result = evaluate_eligibility(&donor, &[], &suspensions, date(2024, 4, 5));

        assert_eq!(result.next_due_date, None);
        assert_eq!(result.suspended_until, Some(date(2024, 6, 1)));
        assert!(!result.is_eligible);
    }

    #[test]
    fn test_suspended_flag_alone_blocks_eligibility() {
        let mut donor = create_donor(1, Gender::Male);
        donor.is_suspended = true;
        let donations = vec![create_donation(1, 1, date(2023, 1, 1), DonationStatus::Completed)];
        let result = evaluate_eligibility(&donor, &donations, &[], date(2024, 4, 5));

        assert_eq!(result.next_due_date, Some(date(2023, 4, 1)));
        assert!(!result.is_eligible);
        assert!(result.reasoning.contains("flagged as suspended"));
    }

    #[test]
    fn test_other_donors_suspension_is_ignored() {
        let suspensions = vec![create_suspension(1, 2, date(2024, 12, 1), true)];
        assert!(active_suspension(1, &suspensions, date(2024, 4, 5)).is_none());
    }

    // ==========================================================================
    // Properties
    // ==========================================================================
    proptest! {
        #[test]
        fn prop_no_completed_donations_never_has_due_date(
            offset in 0i64..3650,
            male in any::<bool>(),
        ) {
            let gender = if male { Gender::Male } else { Gender::Female };
            let donor = create_donor(1, gender);
            let today = date(2020, 1, 1) + chrono::Duration::days(offset);
            let result = evaluate_eligibility(&donor, &[], &[], today);
            prop_assert_eq!(result.next_due_date, None);
            prop_assert!(result.is_eligible);
        }

        #[test]
        fn prop_due_date_is_last_donation_plus_gender_interval(
            offset in 0i64..3650,
            gap in 0i64..400,
            male in any::<bool>(),
        ) {
            let gender = if male { Gender::Male } else { Gender::Female };
            let donor = create_donor(1, gender);
            let last = date(2015, 1, 1) + chrono::Duration::days(offset);
            let today = last + chrono::Duration::days(gap);
            let donations = vec![create_donation(1, 1, last, DonationStatus::Completed)];
            let result = evaluate_eligibility(&donor, &donations, &[], today);

            let months = if male { 3 } else { 6 };
            prop_assert_eq!(result.next_due_date, Some(add_months(last, months)));
            prop_assert_eq!(result.days_since_last_donation, Some(gap));
        }
    }
}
