use async_trait::async_trait;
use bookslot_core::{
    engine::AppointmentStore,
    models::appointment::{AppointmentRecord, AppointmentStatus, BookedInterval},
};
use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use crate::{
    models::{DbAppointment, DbEmployee, DbHoliday},
    repositories::appointment::BookingOutcome,
};

mock! {
    pub EmployeeRepo {
        pub async fn get_employee_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbEmployee>>;

        pub async fn get_holidays_by_employee_id(
            &self,
            employee_id: Uuid,
        ) -> eyre::Result<Vec<DbHoliday>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn create_appointment(
            &self,
            employee_id: Uuid,
            booking_date: NaiveDate,
            interval: BookedInterval,
        ) -> eyre::Result<BookingOutcome>;

        pub async fn update_appointment_status(
            &self,
            id: Uuid,
            status: AppointmentStatus,
        ) -> eyre::Result<Option<DbAppointment>>;
    }

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn appointments_on(
            &self,
            provider_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<AppointmentRecord>>;
    }
}
