use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

/// A half-open `[start, end)` window within one calendar day.
///
/// The only way to build one is [`TimeInterval::new`], so `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeInterval {
    pub fn new(start: NaiveTime, end: NaiveTime) -> BookingResult<Self> {
        if start >= end {
            return Err(BookingError::invalid_entry(
                format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
                "start must be before end",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Sorts one day's ranges and rejects overlaps. Touching ranges are fine.
pub(crate) fn normalize_ranges(
    context: &str,
    mut ranges: Vec<TimeInterval>,
) -> BookingResult<Vec<TimeInterval>> {
    ranges.sort_by_key(|r| r.start);
    for pair in ranges.windows(2) {
        if pair[0].overlaps(&pair[1]) {
            return Err(BookingError::invalid_entry(
                context,
                format!(
                    "{}-{} overlaps {}-{}",
                    pair[0].start.format("%H:%M"),
                    pair[0].end.format("%H:%M"),
                    pair[1].start.format("%H:%M"),
                    pair[1].end.format("%H:%M"),
                ),
            ));
        }
    }
    Ok(ranges)
}

/// Recurring opening hours, one ordered list of ranges per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<TimeInterval>; 7],
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_day(&mut self, weekday: Weekday, ranges: Vec<TimeInterval>) -> BookingResult<()> {
        let context = weekday_name(weekday);
        self.days[weekday.num_days_from_monday() as usize] = normalize_ranges(context, ranges)?;
        Ok(())
    }

    pub fn ranges(&self, weekday: Weekday) -> &[TimeInterval] {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }
}

pub(crate) fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Key of an exception: a single date, or the same month/day every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionDate {
    Exact(NaiveDate),
    Annual { month: u32, day: u32 },
}

impl ExceptionDate {
    /// Parses `YYYY-MM-DD` or the recurring `MM-DD` form.
    pub fn parse(raw: &str) -> BookingResult<Self> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Self::Exact(date));
        }

        let invalid = || BookingError::invalid_entry(format!("holiday {raw}"), "unrecognized date");
        let (month, day) = raw.split_once('-').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        // 2000 is a leap year, so 02-29 stays expressible.
        NaiveDate::from_ymd_opt(2000, month, day).ok_or_else(invalid)?;
        Ok(Self::Annual { month, day })
    }
}

impl std::fmt::Display for ExceptionDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Annual { month, day } => write!(f, "{month:02}-{day:02}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayException {
    pub date: ExceptionDate,
    /// Empty means closed for the whole day.
    pub ranges: Vec<TimeInterval>,
}

/// Date-keyed overrides of the weekly schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionSet {
    entries: HashMap<ExceptionDate, Vec<TimeInterval>>,
}

impl ExceptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exception, replacing any earlier one for the same key.
    /// Returns `true` when an entry was replaced.
    pub fn insert(&mut self, exception: HolidayException) -> BookingResult<bool> {
        let context = format!("holiday {}", exception.date);
        let ranges = normalize_ranges(&context, exception.ranges)?;
        Ok(self.entries.insert(exception.date, ranges).is_some())
    }

    /// Exact-date entries win over annual ones.
    pub fn lookup(&self, date: NaiveDate) -> Option<&[TimeInterval]> {
        self.entries
            .get(&ExceptionDate::Exact(date))
            .or_else(|| {
                self.entries.get(&ExceptionDate::Annual {
                    month: date.month(),
                    day: date.day(),
                })
            })
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Slot length and the mandatory idle time after each slot, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSettings {
    slot_duration_minutes: u32,
    break_duration_minutes: u32,
}

impl SlotSettings {
    pub fn new(slot_duration: Option<i64>, break_duration: Option<i64>) -> BookingResult<Self> {
        let slot = slot_duration.ok_or_else(|| {
            BookingError::Configuration("Slot duration not set for this employee".to_string())
        })?;
        if slot <= 0 || slot > i64::from(u16::MAX) {
            return Err(BookingError::Configuration(format!(
                "Slot duration must be a positive number of minutes, got {slot}"
            )));
        }

        let brk = break_duration.unwrap_or(0);
        if !(0..=i64::from(u16::MAX)).contains(&brk) {
            return Err(BookingError::Configuration(format!(
                "Break duration must be a non-negative number of minutes, got {brk}"
            )));
        }

        Ok(Self {
            slot_duration_minutes: slot as u32,
            break_duration_minutes: brk as u32,
        })
    }

    pub fn slot_duration(&self) -> u32 {
        self.slot_duration_minutes
    }

    pub fn break_duration(&self) -> u32 {
        self.break_duration_minutes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAvailabilityConfig {
    pub provider_id: Uuid,
    pub weekly_schedule: WeeklySchedule,
    pub exceptions: ExceptionSet,
    pub settings: SlotSettings,
}

/// Stored weekly schedule: weekday name to raw range strings,
/// e.g. `{"monday": ["09:00-12:00", "13:00-17:00"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOpeningHours {
    pub days: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHoliday {
    /// `YYYY-MM-DD`, or `MM-DD` for a yearly holiday.
    pub date: String,
    #[serde(default)]
    pub hours: Option<Vec<String>>,
}
