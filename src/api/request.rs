//! Request types for the donor scheduler API.
//!
//! Record payloads (`NewDonor`, `DonorUpdate`, `NewSuspension`, ...) are
//! taken straight from [`crate::models`]; this module holds the bodies and
//! query strings that exist only on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AppointmentStatus, RecordId};

/// Body of `POST /api/admin/appointments/propose`.
///
/// Dates left out default to today plus the configured offsets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProposeRequest {
    /// The donor to invite.
    pub donor_id: RecordId,
    /// First candidate date.
    #[serde(default)]
    pub proposed_date_1: Option<NaiveDate>,
    /// Second candidate date.
    #[serde(default)]
    pub proposed_date_2: Option<NaiveDate>,
    /// Third candidate date.
    #[serde(default)]
    pub proposed_date_3: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

impl ProposeRequest {
    /// The three requested slots in order.
    pub fn requested_dates(&self) -> [Option<NaiveDate>; 3] {
        [
            self.proposed_date_1,
            self.proposed_date_2,
            self.proposed_date_3,
        ]
    }
}

/// Body of `POST /api/appointments/:id/confirm`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRequest {
    /// The proposed date the donor picked.
    pub selected_date: NaiveDate,
}

/// Filters for `GET /api/admin/appointments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentQuery {
    /// Only this status.
    pub status: Option<AppointmentStatus>,
    /// Only this donor.
    pub donor_id: Option<RecordId>,
}

/// Optional donor filter for list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonorQuery {
    /// Only this donor.
    pub donor_id: Option<RecordId>,
}

/// Query of `GET /api/admin/availability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// The date to check.
    pub date: NaiveDate,
    /// Assess the date for this donor.
    pub donor_id: Option<RecordId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propose_request_with_partial_dates() {
        let json = r#"{"donor_id": 4, "proposed_date_2": "2024-06-10"}"#;
        let request: ProposeRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.donor_id, 4);
        assert_eq!(
            request.requested_dates(),
            [None, NaiveDate::from_ymd_opt(2024, 6, 10), None]
        );
        assert!(request.notes.is_empty());
    }

    #[test]
    fn test_propose_request_requires_donor() {
        let result: Result<ProposeRequest, _> = serde_json::from_str("{}");
        let error = result.unwrap_err().to_string();
        assert!(error.contains("missing field `donor_id`"));
    }

    #[test]
    fn test_confirm_request_rejects_bad_date() {
        let result: Result<ConfirmRequest, _> =
            serde_json::from_str(r#"{"selected_date": "10/06/2024"}"#);
        assert!(result.is_err());
    }
}
