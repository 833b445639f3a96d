use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_holidays_employee_id ON holidays(employee_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_employee_date ON appointments(employee_id, booking_date)",
    // One active appointment per employee, date and time label.
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS uniq_appointments_active_slot
    ON appointments(employee_id, booking_date, booking_time)
    WHERE status <> 'Cancelled'
    "#,
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create employees table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            days JSONB NOT NULL DEFAULT '{}'::jsonb,
            slot_duration INTEGER NULL,
            break_duration INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create holidays table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS holidays (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            date VARCHAR(10) NOT NULL,
            hours JSONB NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            booking_date DATE NOT NULL,
            booking_time VARCHAR(64) NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'Pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Prepared statements take a single command each
    for index in INDEXES {
        sqlx::query(index).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
