//! # Availability Handlers
//!
//! Answers "which slots can still be booked with this employee on this
//! date". Each request loads the employee's stored schedule and holidays,
//! validates them into a [`ProviderAvailabilityConfig`], reads the day's
//! active appointments and runs the slot generator against the current
//! local time.
//!
//! A closed day and a fully booked day both produce an empty
//! `available_slots` list. An employee without a slot duration is a `400`
//! configuration error instead, so clients can tell the two apart.
//!
//! [`ProviderAvailabilityConfig`]: bookslot_core::models::availability::ProviderAvailabilityConfig

use axum::{
    Json,
    extract::{Path, State},
};
use bookslot_core::{
    engine::{AppointmentStore, BookingIndex, MeridiemPolicy, available_slots},
    errors::{BookingError, BookingResult},
    models::slot::AvailabilityResponse,
};
use bookslot_db::{
    models::{DbEmployee, DbHoliday},
    repositories::{appointment::PgAppointmentStore, employee},
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Slots for today, in the configured timezone.
///
/// # Endpoint
///
/// ```text
/// GET /api/employees/:id/availability
/// ```
#[axum::debug_handler]
pub async fn get_availability_today(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let now = state.local_now();
    availability_for(&state, id, now.date(), now).await.map(Json)
}

/// Slots for an explicit `YYYY-MM-DD` date.
///
/// # Endpoint
///
/// ```text
/// GET /api/employees/:id/availability/:date
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - The date is not `YYYY-MM-DD`
/// * `BookingError::NotFound` - No employee with this ID
/// * `BookingError::Configuration` - The employee has no slot duration
/// * `BookingError::MalformedTimeRange` / `InvalidScheduleEntry` /
///   `MalformedBookingTime` - Stored data is corrupt
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path((id, date)): Path<(Uuid, String)>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = parse_date(&date)?;
    availability_for(&state, id, date, state.local_now()).await.map(Json)
}

pub(crate) async fn availability_for(
    state: &ApiState,
    id: Uuid,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<AvailabilityResponse, AppError> {
    let (employee, holidays) = load_employee(state, id).await?;
    let store = PgAppointmentStore::new(state.db_pool.clone());

    let response = resolve_availability(
        &employee,
        &holidays,
        store,
        state.meridiem_policy,
        date,
        now,
    )
    .await?;

    Ok(response)
}

pub(crate) async fn load_employee(
    state: &ApiState,
    id: Uuid,
) -> Result<(DbEmployee, Vec<DbHoliday>), AppError> {
    let employee = employee::get_employee_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Employee with ID {} not found", id)))?;

    let holidays = employee::get_holidays_by_employee_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    Ok((employee, holidays))
}

/// Runs the availability engine for an already loaded employee.
pub async fn resolve_availability<S: AppointmentStore>(
    employee: &DbEmployee,
    holidays: &[DbHoliday],
    store: S,
    policy: MeridiemPolicy,
    date: NaiveDate,
    now: NaiveDateTime,
) -> BookingResult<AvailabilityResponse> {
    let config = employee.availability_config(holidays, policy)?;
    tracing::debug!(
        "Resolving availability for employee {} on {} at {}",
        employee.id,
        date,
        now
    );

    available_slots(&config, &BookingIndex::new(store), date, now).await
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        AppError(BookingError::Validation(format!(
            "Invalid date '{}'. Expected YYYY-MM-DD",
            raw
        )))
    })
}
