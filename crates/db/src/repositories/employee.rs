use crate::models::{DbEmployee, DbHoliday};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_employee_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEmployee>> {
    tracing::debug!("Getting employee by id: {}", id);

    let employee = sqlx::query_as::<_, DbEmployee>(
        r#"
        SELECT id, name, days, slot_duration, break_duration, created_at
        FROM employees
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if employee.is_none() {
        tracing::debug!("Employee not found: id={}", id);
    }

    Ok(employee)
}

/// Holidays in insertion order, so a later duplicate replaces an earlier one.
pub async fn get_holidays_by_employee_id(
    pool: &Pool<Postgres>,
    employee_id: Uuid,
) -> Result<Vec<DbHoliday>> {
    let holidays = sqlx::query_as::<_, DbHoliday>(
        r#"
        SELECT id, employee_id, date, hours, created_at
        FROM holidays
        WHERE employee_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    Ok(holidays)
}
