//! HTTP request handlers for the donor scheduler API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints. Handlers take the store lock once, call into
//! [`crate::clinic`], and log the outcome under a per-request correlation id.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::DonorSummary;
use crate::clinic::{self, Availability, Completion, Proposal};
use crate::error::SchedulerResult;
use crate::identity::Principal;
use crate::models::{
    Appointment, AppointmentUpdate, Donation, DonationUpdate, Donor, DonorUpdate, ExcludedDate,
    NewAppointment, NewDonation, NewDonor, NewExcludedDate, NewSpecialCapacity, NewSuspension,
    ProfileUpdate, RecordId, Schedule, SpecialCapacity, Suspension,
};

use super::extract::{Admin, ApiJson, ApiPath, ApiQuery};
use super::request::{
    AppointmentQuery, AvailabilityQuery, ConfirmRequest, DonorQuery, ProposeRequest,
};
use super::response::ApiErrorResponse;
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
///
/// ```text
/// GET  /health
/// /api          principal-scoped routes (the caller's own records)
/// /api/admin    admin routes
/// ```
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/expiring", get(expiring_users))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/donations", get(list_donations).post(create_donation))
        .route(
            "/donations/:id",
            get(get_donation)
                .put(update_donation)
                .delete(delete_donation),
        )
        .route("/donors/:id/donations", get(donor_donations))
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/appointments/propose", post(propose_appointment))
        .route(
            "/appointments/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/appointments/:id/cancel", post(cancel_appointment))
        .route("/appointments/:id/complete", post(complete_appointment))
        .route("/donors/:id/appointments", get(donor_appointments))
        .route("/schedule", get(get_schedule).put(update_schedule))
        .route(
            "/excluded-dates",
            get(list_excluded_dates).post(add_excluded_date),
        )
        .route(
            "/excluded-dates/:id",
            axum::routing::delete(delete_excluded_date),
        )
        .route(
            "/special-capacities",
            get(list_special_capacities).post(set_special_capacity),
        )
        .route(
            "/special-capacities/:id",
            axum::routing::delete(delete_special_capacity),
        )
        .route("/availability", get(availability))
        .route("/suspensions", get(list_suspensions).post(create_suspension))
        .route("/suspensions/:id/end", put(end_suspension));

    let api = Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/donations", get(my_donations))
        .route("/me/appointments", get(my_appointments))
        .route("/appointments/:id/confirm", post(confirm_appointment))
        .nest("/admin", admin);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
}

/// Logs a failed operation and converts the error for the response.
fn respond<T>(
    correlation_id: Uuid,
    operation: &'static str,
    result: SchedulerResult<T>,
) -> ApiResult<T> {
    result.map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            operation,
            error = %err,
            "Request failed"
        );
        err.into()
    })
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the service is up.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Principal-scoped routes
// =============================================================================

async fn get_me(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<DonorSummary>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let summary = respond(
        correlation_id,
        "get_me",
        clinic::donor_summary(&**store, principal.id, state.today()),
    )?;
    info!(correlation_id = %correlation_id, donor_id = principal.id, "Profile served");
    Ok(Json(summary))
}

async fn update_me(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<Json<DonorSummary>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    respond(
        correlation_id,
        "update_me",
        clinic::update_profile(&mut **store, principal.id, update),
    )?;
    let summary = respond(
        correlation_id,
        "update_me",
        clinic::donor_summary(&**store, principal.id, state.today()),
    )?;
    info!(correlation_id = %correlation_id, donor_id = principal.id, "Profile updated");
    Ok(Json(summary))
}

async fn my_donations(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<Donation>>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let donations = respond(
        correlation_id,
        "my_donations",
        clinic::donor_donations(&**store, principal.id),
    )?;
    info!(correlation_id = %correlation_id, donor_id = principal.id, donations = donations.len(), "Own donations listed");
    Ok(Json(donations))
}

async fn my_appointments(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<Appointment>>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let appointments = respond(
        correlation_id,
        "my_appointments",
        clinic::donor_appointments(&**store, principal.id),
    )?;
    info!(correlation_id = %correlation_id, donor_id = principal.id, appointments = appointments.len(), "Own appointments listed");
    Ok(Json(appointments))
}

async fn confirm_appointment(
    State(state): State<AppState>,
    principal: Principal,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(request): ApiJson<ConfirmRequest>,
) -> ApiResult<Json<Appointment>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let appointment = respond(
        correlation_id,
        "confirm_appointment",
        clinic::confirm_appointment(
            &mut **store,
            id,
            request.selected_date,
            &principal,
            state.today(),
        ),
    )?;
    info!(
        correlation_id = %correlation_id,
        appointment_id = id,
        donor_id = appointment.donor_id,
        date = %request.selected_date,
        "Appointment confirmed"
    );
    Ok(Json(appointment))
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> ApiResult<Json<Vec<DonorSummary>>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let donors = clinic::list_donor_summaries(&**store, state.today());
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donors = donors.len(),
        "Donors listed"
    );
    Ok(Json(donors))
}

async fn expiring_users(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> ApiResult<Json<Vec<DonorSummary>>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let window = state.config().scheduling().expiring_window_days;
    let queue = clinic::expiring_donors(&**store, state.today(), window);
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        window_days = window,
        donors = queue.len(),
        "Expiring donors listed"
    );
    Ok(Json(queue))
}

async fn create_user(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(donor): ApiJson<NewDonor>,
) -> ApiResult<(StatusCode, Json<Donor>)> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let created = respond(
        correlation_id,
        "create_user",
        clinic::create_donor(&mut **store, donor),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donor_id = created.id,
        "Donor created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_user(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<DonorSummary>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let summary = respond(
        correlation_id,
        "get_user",
        clinic::donor_summary(&**store, id, state.today()),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donor_id = id, "Donor served");
    Ok(Json(summary))
}

async fn update_user(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(update): ApiJson<DonorUpdate>,
) -> ApiResult<Json<DonorSummary>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    respond(
        correlation_id,
        "update_user",
        clinic::update_donor(&mut **store, id, update),
    )?;
    let summary = respond(
        correlation_id,
        "update_user",
        clinic::donor_summary(&**store, id, state.today()),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donor_id = id, "Donor updated");
    Ok(Json(summary))
}

async fn delete_user(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    respond(correlation_id, "delete_user", store.delete_donor(id))?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donor_id = id, "Donor deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Donations
// =============================================================================

async fn list_donations(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiQuery(query): ApiQuery<DonorQuery>,
) -> ApiResult<Json<Vec<Donation>>> {
    let correlation_id = Uuid::new_v4();
    let donations = state.read().await.list_donations(query.donor_id);
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donor_id = ?query.donor_id,
        donations = donations.len(),
        "Donations listed"
    );
    Ok(Json(donations))
}

async fn create_donation(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(donation): ApiJson<NewDonation>,
) -> ApiResult<(StatusCode, Json<Donation>)> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let created = respond(
        correlation_id,
        "create_donation",
        clinic::record_donation(&mut **store, donation),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donor_id = created.donor_id,
        donation_id = created.id,
        date = %created.donation_date,
        "Donation recorded"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_donation(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<Donation>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let donation = respond(correlation_id, "get_donation", store.get_donation(id))?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donation_id = id, "Donation served");
    Ok(Json(donation))
}

async fn update_donation(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(update): ApiJson<DonationUpdate>,
) -> ApiResult<Json<Donation>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let donation = respond(
        correlation_id,
        "update_donation",
        clinic::update_donation(&mut **store, id, update),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donation_id = id, "Donation updated");
    Ok(Json(donation))
}

async fn delete_donation(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    respond(correlation_id, "delete_donation", store.delete_donation(id))?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donation_id = id, "Donation deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn donor_donations(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<Vec<Donation>>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let donations = respond(
        correlation_id,
        "donor_donations",
        clinic::donor_donations(&**store, id),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donor_id = id, donations = donations.len(), "Donor donations listed");
    Ok(Json(donations))
}

// =============================================================================
// Appointments
// =============================================================================

async fn list_appointments(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiQuery(query): ApiQuery<AppointmentQuery>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let correlation_id = Uuid::new_v4();
    let appointments = state
        .read()
        .await
        .list_appointments(query.donor_id, query.status);
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donor_id = ?query.donor_id,
        status = ?query.status,
        appointments = appointments.len(),
        "Appointments listed"
    );
    Ok(Json(appointments))
}

async fn create_appointment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(appointment): ApiJson<NewAppointment>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let created = respond(
        correlation_id,
        "create_appointment",
        clinic::create_appointment(&mut **store, appointment, state.today()),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        appointment_id = created.id,
        donor_id = created.donor_id,
        status = %created.status,
        "Appointment created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn propose_appointment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(request): ApiJson<ProposeRequest>,
) -> ApiResult<(StatusCode, Json<Proposal>)> {
    let correlation_id = Uuid::new_v4();
    let offsets = state.config().scheduling().proposal_offsets_days.clone();
    let requested = request.requested_dates();

    let mut store = state.write().await;
    let proposal = respond(
        correlation_id,
        "propose_appointment",
        clinic::propose_appointment(
            &mut **store,
            request.donor_id,
            &requested,
            &offsets,
            request.notes,
            state.today(),
        ),
    )?;

    let bookable = proposal
        .assessments
        .iter()
        .filter(|a| a.verdict.is_available())
        .count();
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        appointment_id = proposal.appointment.id,
        donor_id = request.donor_id,
        bookable_dates = bookable,
        "Appointment proposed"
    );
    Ok((StatusCode::CREATED, Json(proposal)))
}

async fn get_appointment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<Appointment>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let appointment = respond(correlation_id, "get_appointment", store.get_appointment(id))?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, appointment_id = id, "Appointment served");
    Ok(Json(appointment))
}

async fn update_appointment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
    ApiJson(update): ApiJson<AppointmentUpdate>,
) -> ApiResult<Json<Appointment>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let appointment = respond(
        correlation_id,
        "update_appointment",
        clinic::update_appointment(&mut **store, id, update, &admin, state.today()),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        appointment_id = id,
        status = %appointment.status,
        "Appointment updated"
    );
    Ok(Json(appointment))
}

async fn delete_appointment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    respond(
        correlation_id,
        "delete_appointment",
        store.delete_appointment(id),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, appointment_id = id, "Appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn cancel_appointment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<Appointment>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let appointment = respond(
        correlation_id,
        "cancel_appointment",
        clinic::cancel_appointment(&mut **store, id, &admin),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, appointment_id = id, "Appointment cancelled");
    Ok(Json(appointment))
}

async fn complete_appointment(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<Completion>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let completion = respond(
        correlation_id,
        "complete_appointment",
        clinic::complete_appointment(&mut **store, id, &admin),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        appointment_id = id,
        donation_id = completion.donation.id,
        "Appointment completed"
    );
    Ok(Json(completion))
}

async fn donor_appointments(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let appointments = respond(
        correlation_id,
        "donor_appointments",
        clinic::donor_appointments(&**store, id),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, donor_id = id, appointments = appointments.len(), "Donor appointments listed");
    Ok(Json(appointments))
}

// =============================================================================
// Schedule
// =============================================================================

async fn get_schedule(State(state): State<AppState>, Admin(admin): Admin) -> Json<Schedule> {
    let correlation_id = Uuid::new_v4();
    let schedule = state.read().await.schedule();
    info!(correlation_id = %correlation_id, admin_id = admin.id, "Weekly schedule served");
    Json(schedule)
}

async fn update_schedule(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(schedule): ApiJson<Schedule>,
) -> ApiResult<Json<Schedule>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let schedule = respond(
        correlation_id,
        "update_schedule",
        store.update_schedule(schedule),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, "Weekly schedule updated");
    Ok(Json(schedule))
}

async fn list_excluded_dates(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> Json<Vec<ExcludedDate>> {
    let correlation_id = Uuid::new_v4();
    let dates = state.read().await.list_excluded_dates();
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        dates = dates.len(),
        "Excluded dates listed"
    );
    Json(dates)
}

async fn add_excluded_date(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(excluded): ApiJson<NewExcludedDate>,
) -> ApiResult<(StatusCode, Json<ExcludedDate>)> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let created = respond(
        correlation_id,
        "add_excluded_date",
        store.add_excluded_date(excluded),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        date = %created.date,
        "Date excluded"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_excluded_date(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    respond(
        correlation_id,
        "delete_excluded_date",
        store.delete_excluded_date(id),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, excluded_date_id = id, "Excluded date removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_special_capacities(
    State(state): State<AppState>,
    Admin(admin): Admin,
) -> Json<Vec<SpecialCapacity>> {
    let correlation_id = Uuid::new_v4();
    let capacities = state.read().await.list_special_capacities();
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        dates = capacities.len(),
        "Special capacities listed"
    );
    Json(capacities)
}

async fn set_special_capacity(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(special): ApiJson<NewSpecialCapacity>,
) -> ApiResult<Json<SpecialCapacity>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let stored = respond(
        correlation_id,
        "set_special_capacity",
        store.set_special_capacity(special),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        date = %stored.date,
        capacity = stored.capacity,
        "Special capacity set"
    );
    Ok(Json(stored))
}

async fn delete_special_capacity(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    respond(
        correlation_id,
        "delete_special_capacity",
        store.delete_special_capacity(id),
    )?;
    info!(correlation_id = %correlation_id, admin_id = admin.id, special_capacity_id = id, "Special capacity removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn availability(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> ApiResult<Json<Availability>> {
    let correlation_id = Uuid::new_v4();
    let store = state.read().await;
    let report = respond(
        correlation_id,
        "availability",
        clinic::availability(&**store, query.date, query.donor_id, state.today()),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        date = %query.date,
        donor_id = ?query.donor_id,
        "Availability checked"
    );
    Ok(Json(report))
}

// =============================================================================
// Suspensions
// =============================================================================

async fn list_suspensions(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiQuery(query): ApiQuery<DonorQuery>,
) -> Json<Vec<Suspension>> {
    let correlation_id = Uuid::new_v4();
    let suspensions = state.read().await.list_suspensions(query.donor_id);
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donor_id = ?query.donor_id,
        suspensions = suspensions.len(),
        "Suspensions listed"
    );
    Json(suspensions)
}

async fn create_suspension(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiJson(suspension): ApiJson<NewSuspension>,
) -> ApiResult<(StatusCode, Json<Suspension>)> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let created = respond(
        correlation_id,
        "create_suspension",
        clinic::suspend_donor(&mut **store, suspension, &admin),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donor_id = created.donor_id,
        until = %created.end_date,
        "Donor suspended"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn end_suspension(
    State(state): State<AppState>,
    Admin(admin): Admin,
    ApiPath(id): ApiPath<RecordId>,
) -> ApiResult<Json<Suspension>> {
    let correlation_id = Uuid::new_v4();
    let mut store = state.write().await;
    let ended = respond(
        correlation_id,
        "end_suspension",
        clinic::end_suspension(&mut **store, id, state.today()),
    )?;
    info!(
        correlation_id = %correlation_id,
        admin_id = admin.id,
        donor_id = ended.donor_id,
        suspension_id = id,
        "Suspension ended"
    );
    Ok(Json(ended))
}
