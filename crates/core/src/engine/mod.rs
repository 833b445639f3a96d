//! # Availability engine
//!
//! Resolves a provider's bookable slots for one date:
//!
//! ```text
//! raw schedule + holidays -> opening_hours -> open ranges
//!                                                  |
//!                  booking_index (store) -> slot_generator -> slots
//! ```
//!
//! Everything here except [`BookingIndex`] is pure. The booked intervals for
//! the date are gathered in full before generation starts.

pub mod booking_index;
pub mod opening_hours;
pub mod slot_generator;
pub mod time_range;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

pub use booking_index::{AppointmentStore, BookingIndex};
pub use time_range::MeridiemPolicy;

use crate::{
    errors::BookingResult,
    models::{availability::ProviderAvailabilityConfig, slot::AvailabilityResponse},
};

/// Computes the slots a provider offers on `date`, as seen at `now`
/// (both in the provider's local time).
pub async fn available_slots<S: AppointmentStore>(
    config: &ProviderAvailabilityConfig,
    index: &BookingIndex<S>,
    date: NaiveDate,
    now: NaiveDateTime,
) -> BookingResult<AvailabilityResponse> {
    let settings = config.settings;
    let open_ranges = opening_hours::for_date(config, date);

    let available_slots = if open_ranges.is_empty() {
        debug!("Provider {} is closed on {}", config.provider_id, date);
        Vec::new()
    } else {
        let booked = index.booked_intervals_for(config.provider_id, date).await?;
        slot_generator::generate(&open_ranges, &booked, &settings, date, now)
    };

    debug!(
        "Provider {} has {} open ranges and {} free slots on {}",
        config.provider_id,
        open_ranges.len(),
        available_slots.len(),
        date
    );

    Ok(AvailabilityResponse {
        employee_id: config.provider_id,
        date,
        available_slots,
        slot_duration: settings.slot_duration(),
        break_duration: settings.break_duration(),
    })
}
