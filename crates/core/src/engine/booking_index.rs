use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::appointment::{AppointmentRecord, BookedInterval},
};

/// Read access to stored appointments.
///
/// A read must reflect every appointment committed before it started.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn appointments_on(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> eyre::Result<Vec<AppointmentRecord>>;
}

#[async_trait]
impl<'a, S: AppointmentStore + ?Sized> AppointmentStore for &'a S {
    async fn appointments_on(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> eyre::Result<Vec<AppointmentRecord>> {
        (**self).appointments_on(provider_id, date).await
    }
}

pub struct BookingIndex<S> {
    store: S,
}

impl<S: AppointmentStore> BookingIndex<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reserved intervals of a provider on `date`, sorted by start.
    pub async fn booked_intervals_for(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> BookingResult<Vec<BookedInterval>> {
        let records = self.store.appointments_on(provider_id, date).await?;
        debug!(
            "Loaded {} appointments for provider {} on {}",
            records.len(),
            provider_id,
            date
        );
        booked_intervals(&records)
    }
}

/// Parses every non-cancelled record. One malformed record fails the whole
/// call, since dropping it would offer an occupied slot.
pub fn booked_intervals(records: &[AppointmentRecord]) -> BookingResult<Vec<BookedInterval>> {
    let mut intervals = records
        .iter()
        .filter(|record| record.status.blocks_slot())
        .map(|record| parse_booking_time(&record.booking_time))
        .collect::<BookingResult<Vec<_>>>()?;
    intervals.sort_by_key(|interval| interval.start);
    Ok(intervals)
}

/// Parses a stored `h:mm AM - h:mm PM` pair into 24-hour bounds.
pub fn parse_booking_time(raw: &str) -> BookingResult<BookedInterval> {
    let (start, end) = raw
        .split_once('-')
        .ok_or_else(|| BookingError::malformed_booking(raw, "expected 'start - end'"))?;

    let start = parse_clock(raw, start)?;
    let end = parse_clock(raw, end)?;
    if start >= end {
        return Err(BookingError::malformed_booking(raw, "end is not after start"));
    }
    Ok(BookedInterval { start, end })
}

fn parse_clock(raw: &str, bound: &str) -> BookingResult<NaiveTime> {
    NaiveTime::parse_from_str(bound.trim(), "%I:%M %p")
        .map_err(|e| BookingError::malformed_booking(raw, format!("'{}': {e}", bound.trim())))
}
