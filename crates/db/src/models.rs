use bookslot_core::{
    engine::MeridiemPolicy,
    errors::BookingResult,
    models::{
        appointment::{AppointmentRecord, AppointmentStatus},
        availability::{ProviderAvailabilityConfig, RawHoliday, RawOpeningHours},
    },
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEmployee {
    pub id: Uuid,
    pub name: String,
    /// Weekday name to raw range strings.
    pub days: Json<RawOpeningHours>,
    pub slot_duration: Option<i32>,
    pub break_duration: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl DbEmployee {
    /// Validates the stored schedule and builds the engine's view of it.
    pub fn availability_config(
        &self,
        holidays: &[DbHoliday],
        policy: MeridiemPolicy,
    ) -> BookingResult<ProviderAvailabilityConfig> {
        let raw_holidays: Vec<RawHoliday> = holidays.iter().map(DbHoliday::to_raw).collect();

        ProviderAvailabilityConfig::from_raw(
            self.id,
            &self.days.0,
            &raw_holidays,
            self.slot_duration.map(i64::from),
            self.break_duration.map(i64::from),
            policy,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbHoliday {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// `YYYY-MM-DD` or `MM-DD`.
    pub date: String,
    /// Special hours for the day; `NULL` closes it.
    pub hours: Option<Json<Vec<String>>>,
    pub created_at: DateTime<Utc>,
}

impl DbHoliday {
    pub fn to_raw(&self) -> RawHoliday {
        RawHoliday {
            date: self.date.clone(),
            hours: self.hours.as_ref().map(|hours| hours.0.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub booking_date: NaiveDate,
    pub booking_time: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn status(&self) -> AppointmentStatus {
        self.status
            .parse()
            .unwrap_or_else(|never| match never {})
    }
}

impl From<DbAppointment> for AppointmentRecord {
    fn from(appointment: DbAppointment) -> Self {
        let status = appointment.status();
        AppointmentRecord {
            id: appointment.id,
            booking_time: appointment.booking_time,
            status,
        }
    }
}
