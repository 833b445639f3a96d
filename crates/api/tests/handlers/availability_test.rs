use axum::http::StatusCode;
use bookslot_api::{
    handlers::availability::{parse_date, resolve_availability},
    middleware::error_handling::AppError,
};
use bookslot_core::{
    engine::MeridiemPolicy,
    errors::BookingError,
    models::{appointment::AppointmentRecord, slot::AvailabilityResponse},
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{
    TestContext, appointment, build_state, employee, holiday, monday, utc,
};

// Mirrors the availability handler with the repositories swapped for mocks.
async fn availability_with_mocks(
    ctx: &TestContext,
    id: Uuid,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<AvailabilityResponse, AppError> {
    let employee = ctx
        .employee_repo
        .get_employee_by_id(id)
        .await?
        .ok_or_else(|| {
            AppError(BookingError::NotFound(format!("Employee with ID {} not found", id)))
        })?;
    let holidays = ctx.employee_repo.get_holidays_by_employee_id(id).await?;

    Ok(resolve_availability(
        &employee,
        &holidays,
        &ctx.appointment_repo,
        MeridiemPolicy::Convert,
        date,
        now,
    )
    .await?)
}

fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn starts(response: &AvailabilityResponse) -> Vec<String> {
    response
        .available_slots
        .iter()
        .map(|slot| slot.start.format("%H:%M").to_string())
        .collect()
}

#[test_log::test(tokio::test)]
async fn test_availability_for_open_day() {
    let mut ctx = TestContext::new();
    let employee = employee(vec![("Monday", vec!["9:00 AM-12:00 PM"])], Some(30));
    let id = employee.id;

    ctx.employee_repo
        .expect_get_employee_by_id()
        .with(predicate::eq(id))
        .times(1)
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.employee_repo
        .expect_get_holidays_by_employee_id()
        .returning(|_| Ok(vec![]));
    ctx.appointment_repo
        .expect_appointments_on()
        .with(predicate::eq(id), predicate::eq(monday()))
        .returning(|_, _| Ok(vec![]));

    let response = availability_with_mocks(&ctx, id, monday(), at(monday(), 7, 0))
        .await
        .unwrap();

    assert_eq!(response.employee_id, id);
    assert_eq!(response.slot_duration, 30);
    assert_eq!(
        starts(&response),
        vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
    );
    assert_eq!(response.available_slots[5].display, "11:30 AM - 12:00 PM");
}

#[test_log::test(tokio::test)]
async fn test_availability_skips_booked_slots() {
    let mut ctx = TestContext::new();
    let employee = employee(vec![("monday", vec!["09:00-12:00"])], Some(30));
    let id = employee.id;

    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.employee_repo
        .expect_get_holidays_by_employee_id()
        .returning(|_| Ok(vec![]));
    ctx.appointment_repo
        .expect_appointments_on()
        .returning(move |_, _| {
            Ok(vec![
                AppointmentRecord::from(appointment(id, "10:00 AM - 10:30 AM", "Confirmed")),
                AppointmentRecord::from(appointment(id, "11:00 AM - 11:30 AM", "Cancelled")),
            ])
        });

    let response = availability_with_mocks(&ctx, id, monday(), at(monday(), 7, 0))
        .await
        .unwrap();

    assert_eq!(
        starts(&response),
        vec!["09:00", "09:30", "10:30", "11:00", "11:30"]
    );
}

#[tokio::test]
async fn test_availability_for_unknown_employee() {
    let mut ctx = TestContext::new();
    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(|_| Ok(None));
    ctx.employee_repo.expect_get_holidays_by_employee_id().never();

    let error = availability_with_mocks(&ctx, Uuid::new_v4(), monday(), at(monday(), 7, 0))
        .await
        .unwrap_err();

    assert_eq!(error.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_slot_duration_is_a_client_error() {
    let mut ctx = TestContext::new();
    let employee = employee(vec![("monday", vec!["09:00-12:00"])], None);
    let id = employee.id;

    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.employee_repo
        .expect_get_holidays_by_employee_id()
        .returning(|_| Ok(vec![]));
    ctx.appointment_repo.expect_appointments_on().never();

    let error = availability_with_mocks(&ctx, id, monday(), at(monday(), 7, 0))
        .await
        .unwrap_err();

    assert!(matches!(error.0, BookingError::Configuration(_)));
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_corrupt_schedule_is_a_server_error() {
    let mut ctx = TestContext::new();
    let employee = employee(vec![("monday", vec!["09:00-12:00", "11:00-13:00"])], Some(30));
    let id = employee.id;

    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.employee_repo
        .expect_get_holidays_by_employee_id()
        .returning(|_| Ok(vec![]));

    let error = availability_with_mocks(&ctx, id, monday(), at(monday(), 7, 0))
        .await
        .unwrap_err();

    assert!(matches!(error.0, BookingError::InvalidScheduleEntry { .. }));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_corrupt_booking_is_a_server_error() {
    let mut ctx = TestContext::new();
    let employee = employee(vec![("monday", vec!["09:00-12:00"])], Some(30));
    let id = employee.id;

    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.employee_repo
        .expect_get_holidays_by_employee_id()
        .returning(|_| Ok(vec![]));
    ctx.appointment_repo
        .expect_appointments_on()
        .returning(move |_, _| {
            Ok(vec![AppointmentRecord::from(appointment(id, "10:00-10:30", "Pending"))])
        });

    let error = availability_with_mocks(&ctx, id, monday(), at(monday(), 7, 0))
        .await
        .unwrap_err();

    assert!(matches!(error.0, BookingError::MalformedBookingTime { .. }));
    assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test_log::test(tokio::test)]
async fn test_closed_holiday_returns_empty_slots() {
    let mut ctx = TestContext::new();
    let employee = employee(vec![("monday", vec!["09:00-12:00"])], Some(30));
    let id = employee.id;

    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.employee_repo
        .expect_get_holidays_by_employee_id()
        .returning(move |_| Ok(vec![holiday(id, "2024-06-03", None)]));
    ctx.appointment_repo.expect_appointments_on().never();

    let response = availability_with_mocks(&ctx, id, monday(), at(monday(), 7, 0))
        .await
        .unwrap();

    assert!(response.available_slots.is_empty());
    assert_eq!(response.date, monday());
}

#[test_log::test(tokio::test)]
async fn test_today_uses_configured_timezone() {
    let mut ctx = TestContext::new();
    let employee = employee(vec![("monday", vec!["09:00-12:00"])], Some(30));
    let id = employee.id;

    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(move |_| Ok(Some(employee.clone())));
    ctx.employee_repo
        .expect_get_holidays_by_employee_id()
        .returning(|_| Ok(vec![]));
    ctx.appointment_repo
        .expect_appointments_on()
        .returning(|_, _| Ok(vec![]));

    // 13:10 UTC is 09:10 in New York during daylight saving time.
    let state = build_state(utc(2024, 6, 3, 13, 10), chrono_tz::America::New_York);
    let now = state.local_now();

    let response = availability_with_mocks(&ctx, id, now.date(), now).await.unwrap();

    assert_eq!(response.date, monday());
    assert_eq!(starts(&response), vec!["09:30", "10:00", "10:30", "11:00", "11:30"]);
}

#[tokio::test]
async fn test_repository_failure_is_a_database_error() {
    let mut ctx = TestContext::new();
    ctx.employee_repo
        .expect_get_employee_by_id()
        .returning(|_| Err(eyre::eyre!("connection refused")));

    let error = availability_with_mocks(&ctx, Uuid::new_v4(), monday(), at(monday(), 7, 0))
        .await
        .unwrap_err();

    assert!(matches!(error.0, BookingError::Database(_)));
}

#[rstest]
#[case("2024-06-03", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())]
#[case(" 2024-12-25 ", NaiveDate::from_ymd_opt(2024, 12, 25).unwrap())]
fn test_parse_date(#[case] raw: &str, #[case] expected: NaiveDate) {
    assert_eq!(parse_date(raw).unwrap(), expected);
}

#[rstest]
#[case("2024-13-01")]
#[case("03-06-2024")]
#[case("tomorrow")]
fn test_parse_date_rejects_invalid(#[case] raw: &str) {
    let error = parse_date(raw).unwrap_err();

    assert!(matches!(error.0, BookingError::Validation(_)));
    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
}
