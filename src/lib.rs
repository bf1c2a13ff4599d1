//! Donor eligibility and appointment scheduling for a blood donation clinic.
//!
//! The crate decides when each donor may give blood again, which clinic days
//! still have room, and which donors are about to become eligible and should
//! be invited. It exposes those decisions over an HTTP API backed by a
//! snapshot-persisted store.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use donor_scheduler::models::add_months;
//!
//! // A male donor who gave blood on 31 January may return on 1 May.
//! let last = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! assert_eq!(add_months(last, 3), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clinic;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod store;
pub mod telemetry;
