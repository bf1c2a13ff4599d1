//! HTTP API for the donor scheduler.
//!
//! Donors reach their own records under `/api`, admins manage the clinic
//! under `/api/admin`. The caller is identified per request through the
//! configured [`crate::identity::IdentityProvider`].

mod extract;
mod handlers;
mod request;
mod response;
mod state;

pub use extract::{Admin, ApiJson, ApiPath, ApiQuery};
pub use handlers::{HealthResponse, create_router};
pub use request::{AppointmentQuery, AvailabilityQuery, ConfirmRequest, DonorQuery, ProposeRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::{AppState, Clock};
