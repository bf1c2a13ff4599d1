//! Donor model and related types.
//!
//! A donor is any user of the clinic system; administrators are donors with
//! the `is_admin` flag set.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Donor gender, which fixes the minimum interval between donations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male donors may donate every 3 months.
    #[serde(alias = "M")]
    Male,
    /// Female donors may donate every 6 months.
    #[serde(alias = "F")]
    Female,
}

/// A registered donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// Unique contact email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Gender, when known. Unknown gender uses the longer interval.
    pub gender: Option<Gender>,
    /// Blood group (free text, e.g. "0+").
    #[serde(default)]
    pub blood_type: String,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Whether the donor may use the admin endpoints.
    pub is_admin: bool,
    /// Inactive donors are kept for history but never queued.
    pub is_active: bool,
    /// Set while a suspension is in force.
    pub is_suspended: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Donor {
    /// Returns "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the donor is male.
    pub fn is_male(&self) -> bool {
        self.gender == Some(Gender::Male)
    }
}

/// Fields needed to create a donor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDonor {
    /// Unique contact email (required, non-empty).
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: String,
    /// Gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Blood group.
    #[serde(default)]
    pub blood_type: String,
    /// Date of birth.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Admin flag.
    #[serde(default)]
    pub is_admin: bool,
    /// Active flag, defaults to true.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Suspended flag.
    #[serde(default)]
    pub is_suspended: bool,
}

fn default_true() -> bool {
    true
}

/// Admin partial update of a donor. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonorUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New phone number.
    #[serde(alias = "phone")]
    pub phone_number: Option<String>,
    /// New blood group.
    pub blood_type: Option<String>,
    /// New gender.
    pub gender: Option<Gender>,
    /// New date of birth.
    pub birth_date: Option<NaiveDate>,
    /// New active flag.
    pub is_active: Option<bool>,
    /// New admin flag.
    pub is_admin: Option<bool>,
    /// New suspended flag.
    pub is_suspended: Option<bool>,
    /// Corrects the donor's most recent completed donation date (or records one).
    pub last_donation_date: Option<NaiveDate>,
}

impl DonorUpdate {
    /// Applies the plain field changes to `donor`. `last_donation_date` is
    /// handled by the caller since it touches the donation collection.
    pub fn apply_to(&self, donor: &mut Donor) {
        if let Some(first_name) = &self.first_name {
            donor.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            donor.last_name = last_name.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            donor.phone_number = phone_number.clone();
        }
        if let Some(blood_type) = &self.blood_type {
            donor.blood_type = blood_type.clone();
        }
        if let Some(gender) = self.gender {
            donor.gender = Some(gender);
        }
        if let Some(birth_date) = self.birth_date {
            donor.birth_date = Some(birth_date);
        }
        if let Some(is_active) = self.is_active {
            donor.is_active = is_active;
        }
        if let Some(is_admin) = self.is_admin {
            donor.is_admin = is_admin;
        }
        if let Some(is_suspended) = self.is_suspended {
            donor.is_suspended = is_suspended;
        }
    }
}

/// Self-service profile update. Carries no privileged fields, so a donor
/// cannot grant themselves admin rights or lift a suspension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New phone number.
    #[serde(alias = "phone")]
    pub phone_number: Option<String>,
    /// New blood group.
    pub blood_type: Option<String>,
    /// New gender.
    pub gender: Option<Gender>,
    /// New date of birth.
    pub birth_date: Option<NaiveDate>,
}

impl From<ProfileUpdate> for DonorUpdate {
    fn from(update: ProfileUpdate) -> Self {
        DonorUpdate {
            first_name: update.first_name,
            last_name: update.last_name,
            phone_number: update.phone_number,
            blood_type: update.blood_type,
            gender: update.gender,
            birth_date: update.birth_date,
            ..DonorUpdate::default()
        }
    }
}
