use axum::{
    Json,
    extract::{Path, State},
};
use bookslot_core::{
    engine::booking_index::parse_booking_time,
    errors::BookingError,
    models::{
        appointment::{
            AppointmentStatus, BookedInterval, CreateBookingRequest, CreateBookingResponse,
            UpdateAppointmentStatusRequest, UpdateAppointmentStatusResponse,
        },
        slot::AvailabilityResponse,
    },
};
use bookslot_db::{
    models::DbAppointment,
    repositories::appointment::{self, BookingOutcome, PgAppointmentStore},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::availability::{load_employee, resolve_availability},
    middleware::error_handling::AppError,
};

/// Books one of the slots currently offered for the employee.
///
/// The requested `booking_time` must match an offered slot exactly, using
/// the slot's `display` label (`"9:00 AM - 9:30 AM"`).
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let requested = parse_requested_time(&payload.booking_time)?;
    let (employee, holidays) = load_employee(&state, payload.employee_id).await?;

    let availability = resolve_availability(
        &employee,
        &holidays,
        PgAppointmentStore::new(state.db_pool.clone()),
        state.meridiem_policy,
        payload.booking_date,
        state.local_now(),
    )
    .await?;
    ensure_offered(&availability, &requested)?;

    let outcome = appointment::create_appointment(
        &state.db_pool,
        employee.id,
        payload.booking_date,
        &requested,
    )
    .await
    .map_err(BookingError::Database)?;

    match outcome {
        BookingOutcome::Created(appointment) => {
            tracing::info!(
                "Booked {} on {} for employee {}",
                appointment.booking_time,
                appointment.booking_date,
                appointment.employee_id
            );
            Ok(Json(booking_response(appointment)))
        }
        BookingOutcome::Conflict => Err(AppError(BookingError::Conflict(format!(
            "{} on {} was booked by someone else",
            requested.display(),
            payload.booking_date
        )))),
    }
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentStatusRequest>,
) -> Result<Json<UpdateAppointmentStatusResponse>, AppError> {
    validate_status(&payload.status)?;

    let appointment = appointment::update_appointment_status(&state.db_pool, id, &payload.status)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

    Ok(Json(UpdateAppointmentStatusResponse {
        id: appointment.id,
        status: appointment.status(),
    }))
}

/// Parses a client supplied `h:mm AM - h:mm PM` label.
pub fn parse_requested_time(raw: &str) -> Result<BookedInterval, AppError> {
    parse_booking_time(raw).map_err(|_| {
        AppError(BookingError::Validation(format!(
            "Invalid booking time '{}'. Expected a slot label like '9:00 AM - 9:30 AM'",
            raw
        )))
    })
}

/// Fails with a conflict unless `requested` is one of the offered slots.
pub fn ensure_offered(
    availability: &AvailabilityResponse,
    requested: &BookedInterval,
) -> Result<(), AppError> {
    let offered = availability
        .available_slots
        .iter()
        .any(|slot| slot.start == requested.start && slot.end == requested.end);

    if offered {
        Ok(())
    } else {
        Err(AppError(BookingError::Conflict(format!(
            "{} is not available on {}",
            requested.display(),
            availability.date
        ))))
    }
}

pub fn validate_status(status: &AppointmentStatus) -> Result<(), AppError> {
    if status.as_str().trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Status must not be empty".to_string(),
        )));
    }
    Ok(())
}

pub fn booking_response(appointment: DbAppointment) -> CreateBookingResponse {
    let status = appointment.status();
    CreateBookingResponse {
        id: appointment.id,
        employee_id: appointment.employee_id,
        booking_date: appointment.booking_date,
        booking_time: appointment.booking_time,
        status,
    }
}
