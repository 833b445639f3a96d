//! Normalization of human-entered time ranges such as `9:00-17:30` or
//! `9:00 AM-5:00 PM` into canonical 24-hour `HH:MM-HH:MM`.

use std::str::FromStr;

use chrono::NaiveTime;

use crate::{
    errors::{BookingError, BookingResult},
    models::availability::TimeInterval,
};

/// How `AM`/`PM` markers in stored ranges are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeridiemPolicy {
    /// Convert marked sides from 12-hour to 24-hour time.
    #[default]
    Convert,
    /// Drop the markers and read the digits as 24-hour time.
    /// Only correct for data that was 24-hour with decorative markers.
    StripLegacy,
}

impl FromStr for MeridiemPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "convert" => Ok(Self::Convert),
            "strip" | "strip_legacy" | "legacy" => Ok(Self::StripLegacy),
            other => Err(format!("unknown meridiem policy '{other}'")),
        }
    }
}

/// Start and end of a parsed range. Ordering is not checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ParsedRange {
    pub fn canonical(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    /// Validates `start < end`; `context` names the schedule entry on failure.
    pub fn into_interval(self, context: &str) -> BookingResult<TimeInterval> {
        TimeInterval::new(self.start, self.end).map_err(|_| {
            BookingError::invalid_entry(
                context,
                format!("range {} does not end after it starts", self.canonical()),
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

pub fn parse_time_range(raw: &str) -> BookingResult<ParsedRange> {
    parse_time_range_with(raw, MeridiemPolicy::default())
}

pub fn parse_time_range_with(raw: &str, policy: MeridiemPolicy) -> BookingResult<ParsedRange> {
    let mut sides = raw.split('-');
    let (Some(start), Some(end), None) = (sides.next(), sides.next(), sides.next()) else {
        return Err(BookingError::malformed_range(
            raw,
            "expected exactly one '-' separator",
        ));
    };

    Ok(ParsedRange {
        start: parse_side(raw, start, policy)?,
        end: parse_side(raw, end, policy)?,
    })
}

/// Parses and re-renders a range as `HH:MM-HH:MM`.
pub fn canonicalize(raw: &str) -> BookingResult<String> {
    parse_time_range(raw).map(|range| range.canonical())
}

fn parse_side(raw: &str, side: &str, policy: MeridiemPolicy) -> BookingResult<NaiveTime> {
    let (clock, meridiem) = split_meridiem(side.trim());
    let clock: String = clock.chars().filter(|c| !c.is_whitespace()).collect();

    let mut parts = clock.split(':');
    let (Some(hour), Some(minute), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(BookingError::malformed_range(
            raw,
            format!("'{}' is not of the form H:MM", side.trim()),
        ));
    };

    let hour = parse_digits(raw, hour, "hour")?;
    let minute = parse_digits(raw, minute, "minute")?;

    let hour = match (meridiem, policy) {
        (Some(meridiem), MeridiemPolicy::Convert) => {
            if !(1..=12).contains(&hour) {
                return Err(BookingError::malformed_range(
                    raw,
                    format!("hour {hour} is not valid on a 12-hour clock"),
                ));
            }
            match meridiem {
                Meridiem::Am => hour % 12,
                Meridiem::Pm => hour % 12 + 12,
            }
        }
        _ => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        BookingError::malformed_range(raw, format!("{hour:02}:{minute:02} is not a valid time"))
    })
}

fn split_meridiem(side: &str) -> (&str, Option<Meridiem>) {
    if side.len() >= 2 && side.is_char_boundary(side.len() - 2) {
        let (clock, marker) = side.split_at(side.len() - 2);
        if marker.eq_ignore_ascii_case("am") {
            return (clock, Some(Meridiem::Am));
        }
        if marker.eq_ignore_ascii_case("pm") {
            return (clock, Some(Meridiem::Pm));
        }
    }
    (side, None)
}

fn parse_digits(raw: &str, digits: &str, what: &str) -> BookingResult<u32> {
    if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BookingError::malformed_range(
            raw,
            format!("{what} '{digits}' is not numeric"),
        ));
    }
    digits
        .parse()
        .map_err(|_| BookingError::malformed_range(raw, format!("{what} '{digits}' is not numeric")))
}
