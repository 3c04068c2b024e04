//! Weekday-relative slot generation.
//!
//! Walks a cursor across one day's work window, emitting `duration`-long slots
//! separated by `buffer` minutes. Slots overlapping the break window are rejected.
//!
//! A rejected candidate advances the cursor by `duration` only, not by
//! `duration + buffer`. The cursor therefore re-probes through the break in
//! duration-sized steps instead of jumping to the break end, which decides where
//! the first post-break slot lands (13:30 rather than 13:00 for a 12:00–13:00
//! break with 60/15 sizing).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::schedule::{weekday_name, TimeSlotConfig, WeeklyScheduleEntry};
use crate::time::TimeOfDay;

/// A candidate slot within a day, not yet attached to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl SlotInterval {
    /// Zero for an inverted interval.
    pub fn duration_minutes(&self) -> u32 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Half-open overlap test: `[a, b)` and `[c, d)` share at least one minute.
    pub fn overlaps(&self, start: TimeOfDay, end: TimeOfDay) -> bool {
        !(self.end <= start || self.start >= end)
    }
}

/// Generate the ordered slots for one weekday template.
///
/// Returns an empty list for disabled entries, for entries that fail
/// [`WeeklyScheduleEntry::validate`], and for a zero duration. No slot ever ends
/// after `entry.end`.
pub fn generate_slots(entry: &WeeklyScheduleEntry, config: &TimeSlotConfig) -> Vec<SlotInterval> {
    if !entry.enabled {
        return Vec::new();
    }
    if let Err(e) = entry.validate() {
        warn!(day = weekday_name(entry.weekday), error = %e, "invalid template, no slots");
        return Vec::new();
    }
    let duration = config.duration_minutes;
    if duration == 0 {
        return Vec::new();
    }

    let brk = entry.effective_break();
    let mut slots = Vec::new();
    let mut cursor = entry.start;

    while let Some(slot_end) = cursor.checked_add_minutes(duration).filter(|&e| e <= entry.end) {
        let candidate = SlotInterval {
            start: cursor,
            end: slot_end,
        };

        let step = match brk {
            Some((break_start, break_end)) if candidate.overlaps(break_start, break_end) => {
                Some(duration)
            }
            _ => {
                slots.push(candidate);
                duration.checked_add(config.buffer_minutes)
            }
        };

        // A step past u32 is also past the end of the day.
        match step.and_then(|step| cursor.checked_add_minutes(step)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    slots
}
