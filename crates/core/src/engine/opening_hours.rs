//! Builds typed opening hours from stored provider data and resolves the
//! open intervals for a given date.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::warn;
use uuid::Uuid;

use crate::{
    engine::time_range::{MeridiemPolicy, parse_time_range_with},
    errors::{BookingError, BookingResult},
    models::availability::{
        ExceptionDate, ExceptionSet, HolidayException, ProviderAvailabilityConfig, RawHoliday,
        RawOpeningHours, SlotSettings, TimeInterval, WeeklySchedule,
    },
};

pub fn build_weekly_schedule(
    raw: &RawOpeningHours,
    policy: MeridiemPolicy,
) -> BookingResult<WeeklySchedule> {
    let mut schedule = WeeklySchedule::new();
    let mut seen = HashSet::new();
    for (day, ranges) in &raw.days {
        let weekday: Weekday = day
            .trim()
            .parse()
            .map_err(|_| BookingError::invalid_entry(day.clone(), "unknown weekday"))?;
        // "Monday", "monday" and "mon" all name the same day.
        if !seen.insert(weekday) {
            return Err(BookingError::invalid_entry(day.clone(), "duplicate weekday"));
        }
        let context = day.trim().to_ascii_lowercase();
        schedule.set_day(weekday, parse_ranges(&context, ranges, policy)?)?;
    }
    Ok(schedule)
}

pub fn build_exceptions(raw: &[RawHoliday], policy: MeridiemPolicy) -> BookingResult<ExceptionSet> {
    let mut exceptions = ExceptionSet::new();
    for holiday in raw {
        let date = ExceptionDate::parse(&holiday.date)?;
        let context = format!("holiday {date}");
        let ranges = match &holiday.hours {
            Some(hours) => parse_ranges(&context, hours, policy)?,
            None => Vec::new(),
        };
        if exceptions.insert(HolidayException { date, ranges })? {
            warn!("Duplicate exception for {}; keeping the later entry", date);
        }
    }
    Ok(exceptions)
}

fn parse_ranges(
    context: &str,
    raw: &[String],
    policy: MeridiemPolicy,
) -> BookingResult<Vec<TimeInterval>> {
    raw.iter()
        .enumerate()
        .map(|(i, range)| {
            parse_time_range_with(range, policy)?.into_interval(&format!("{context}[{i}]"))
        })
        .collect()
}

impl ProviderAvailabilityConfig {
    /// Builds a provider's configuration from its stored columns.
    ///
    /// Slot settings are checked first so a provider without a slot duration
    /// reports a configuration error even if its schedule is also broken.
    pub fn from_raw(
        provider_id: Uuid,
        days: &RawOpeningHours,
        holidays: &[RawHoliday],
        slot_duration: Option<i64>,
        break_duration: Option<i64>,
        policy: MeridiemPolicy,
    ) -> BookingResult<Self> {
        let settings = SlotSettings::new(slot_duration, break_duration)?;
        Ok(Self {
            provider_id,
            weekly_schedule: build_weekly_schedule(days, policy)?,
            exceptions: build_exceptions(holidays, policy)?,
            settings,
        })
    }
}

/// Open intervals on `date`, ordered ascending.
///
/// An exception for the date replaces the weekly ranges entirely, even when
/// it has no ranges (closed).
pub fn for_date(config: &ProviderAvailabilityConfig, date: NaiveDate) -> Vec<TimeInterval> {
    match config.exceptions.lookup(date) {
        Some(ranges) => ranges.to_vec(),
        None => config.weekly_schedule.ranges(date.weekday()).to_vec(),
    }
}
