//! # Slot generation
//!
//! Turns a day's open ranges into fixed-length bookable slots.
//!
//! For each open range, in the order given:
//!
//! 1. On the current day, a range that has already ended is skipped.
//! 2. The cursor starts at the range start. On the current day a cursor in the
//!    past moves to `now`, rounded up to the next whole minute and then to the
//!    next multiple of the slot duration within the hour.
//! 3. While a full slot fits before the range end, the slot is offered unless
//!    it overlaps any booking, then the cursor advances by slot plus break.
//!
//! Truncated slots are never produced and ranges are never merged.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use tracing::debug;

use crate::models::{
    appointment::BookedInterval,
    availability::{SlotSettings, TimeInterval},
    slot::SlotCandidate,
};

pub fn generate(
    open_ranges: &[TimeInterval],
    booked: &[BookedInterval],
    settings: &SlotSettings,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<SlotCandidate> {
    let slot = Duration::minutes(i64::from(settings.slot_duration()));
    let step = slot + Duration::minutes(i64::from(settings.break_duration()));
    let is_today = now.date() == date;

    let booked: Vec<(NaiveDateTime, NaiveDateTime)> = booked
        .iter()
        .map(|b| (date.and_time(b.start), date.and_time(b.end)))
        .collect();

    let mut slots = Vec::new();
    for range in open_ranges {
        let range_start = date.and_time(range.start());
        let range_end = date.and_time(range.end());

        if is_today && range_end <= now {
            debug!("Skipping range {} - {} that ended before {}", range.start(), range.end(), now);
            continue;
        }

        let mut cursor = range_start;
        if is_today && cursor < now {
            cursor = round_up_to_slot(now, settings.slot_duration());
        }

        // Stepping past the last representable date ends the range.
        while let Some(slot_end) = cursor.checked_add_signed(slot) {
            if slot_end > range_end {
                break;
            }
            let is_free = booked
                .iter()
                .all(|&(booked_start, booked_end)| !(cursor < booked_end && slot_end > booked_start));

            if is_free && (!is_today || slot_end > now) {
                slots.push(SlotCandidate::new(cursor.time(), slot_end.time()));
            }

            match cursor.checked_add_signed(step) {
                Some(next) => cursor = next,
                None => break,
            }
        }
    }

    slots
}

/// Rounds `now` up to a whole minute, then up to the next multiple of
/// `slot_minutes` counted from the top of the hour.
pub fn round_up_to_slot(now: NaiveDateTime, slot_minutes: u32) -> NaiveDateTime {
    let mut cursor = now
        - Duration::seconds(i64::from(now.second()))
        - Duration::nanoseconds(i64::from(now.nanosecond()));
    if cursor < now {
        cursor += Duration::minutes(1);
    }

    let remainder = cursor.minute() % slot_minutes;
    if remainder > 0 {
        cursor += Duration::minutes(i64::from(slot_minutes - remainder));
    }
    cursor
}
