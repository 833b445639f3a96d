use crate::models::DbAppointment;
use async_trait::async_trait;
use bookslot_core::{
    engine::{AppointmentStore, booking_index::parse_booking_time},
    models::appointment::{AppointmentRecord, AppointmentStatus, BookedInterval},
};
use chrono::{NaiveDate, Utc};
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Result of a booking attempt.
#[derive(Debug)]
pub enum BookingOutcome {
    Created(DbAppointment),
    /// An active appointment already holds an overlapping window.
    Conflict,
}

/// Reads appointments straight from PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgAppointmentStore {
    pool: Pool<Postgres>,
}

impl PgAppointmentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn appointments_on(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentRecord>> {
        let appointments = sqlx::query_as::<_, DbAppointment>(
            r#"
            SELECT id, employee_id, booking_date, booking_time, status, created_at
            FROM appointments
            WHERE employee_id = $1 AND booking_date = $2 AND status <> 'Cancelled'
            "#,
        )
        .bind(provider_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments.into_iter().map(AppointmentRecord::from).collect())
    }
}

/// Books `interval` for the employee unless an active appointment overlaps it.
///
/// The employee row is locked for the length of the transaction, so two
/// concurrent bookings for the same employee run one after the other.
pub async fn create_appointment(
    pool: &Pool<Postgres>,
    employee_id: Uuid,
    booking_date: NaiveDate,
    interval: &BookedInterval,
) -> Result<BookingOutcome> {
    let mut tx = pool.begin().await?;

    sqlx::query_scalar::<_, Uuid>("SELECT id FROM employees WHERE id = $1 FOR UPDATE")
        .bind(employee_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| eyre!("Employee {} not found", employee_id))?;

    let active = sqlx::query_scalar::<_, String>(
        r#"
        SELECT booking_time
        FROM appointments
        WHERE employee_id = $1 AND booking_date = $2 AND status <> 'Cancelled'
        "#,
    )
    .bind(employee_id)
    .bind(booking_date)
    .fetch_all(&mut *tx)
    .await?;

    for booking_time in &active {
        let existing = parse_booking_time(booking_time)?;
        if interval.start < existing.end && interval.end > existing.start {
            tracing::debug!(
                "Booking {} on {} overlaps existing {}",
                interval.display(),
                booking_date,
                booking_time
            );
            tx.rollback().await?;
            return Ok(BookingOutcome::Conflict);
        }
    }

    let inserted = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, employee_id, booking_date, booking_time, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, employee_id, booking_date, booking_time, status, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(employee_id)
    .bind(booking_date)
    .bind(interval.display())
    .bind(AppointmentStatus::Pending.as_str())
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await;

    let appointment = match inserted {
        Ok(appointment) => appointment,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tx.rollback().await?;
            return Ok(BookingOutcome::Conflict);
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;
    tracing::debug!("Appointment created successfully: id={}", appointment.id);
    Ok(BookingOutcome::Created(appointment))
}

pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: &AppointmentStatus,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2
        WHERE id = $1
        RETURNING id, employee_id, booking_date, booking_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}
