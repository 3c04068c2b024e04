//! Named presets that rewrite a weekly template in bulk.
//!
//! | Preset          | Mon–Fri                          | Sat–Sun                |
//! |-----------------|----------------------------------|------------------------|
//! | `weekdaysOnly`  | 09:00–17:00, break 12:00–13:00   | disabled               |
//! | `weekendOnly`   | disabled                         | 10:00–16:00, no break  |
//! | `daily`         | 09:00–17:00, break 12:00–13:00   | 09:00–17:00, break 12:00–13:00 |
//!
//! Disabling a day only clears `enabled`; its times are kept. `daily` never
//! disables anything.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::SlotError;
use crate::schedule::{WeeklySchedule, WeeklyScheduleEntry};
use crate::time::TimeOfDay;

const WORKDAY_START: TimeOfDay = TimeOfDay::hm(9, 0);
const WORKDAY_END: TimeOfDay = TimeOfDay::hm(17, 0);
const LUNCH_START: TimeOfDay = TimeOfDay::hm(12, 0);
const LUNCH_END: TimeOfDay = TimeOfDay::hm(13, 0);
const WEEKEND_START: TimeOfDay = TimeOfDay::hm(10, 0);
const WEEKEND_END: TimeOfDay = TimeOfDay::hm(16, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecurringPattern {
    WeekdaysOnly,
    WeekendOnly,
    Daily,
}

impl fmt::Display for RecurringPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecurringPattern::WeekdaysOnly => "weekdaysOnly",
            RecurringPattern::WeekendOnly => "weekendOnly",
            RecurringPattern::Daily => "daily",
        })
    }
}

impl FromStr for RecurringPattern {
    type Err = SlotError;

    /// Accepts camelCase, kebab-case and snake_case spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "weekdaysonly" | "weekdays" => Ok(RecurringPattern::WeekdaysOnly),
            "weekendonly" | "weekends" | "weekend" => Ok(RecurringPattern::WeekendOnly),
            "daily" => Ok(RecurringPattern::Daily),
            _ => Err(SlotError::InvalidInput(format!("unknown recurring pattern '{}'", s))),
        }
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

fn workday(day: Weekday) -> WeeklyScheduleEntry {
    WeeklyScheduleEntry::open(day, WORKDAY_START, WORKDAY_END).with_break(LUNCH_START, LUNCH_END)
}

fn weekend_day(day: Weekday) -> WeeklyScheduleEntry {
    WeeklyScheduleEntry::open(day, WEEKEND_START, WEEKEND_END)
}

fn switched_off(entry: &WeeklyScheduleEntry) -> WeeklyScheduleEntry {
    WeeklyScheduleEntry {
        enabled: false,
        ..entry.clone()
    }
}

/// Return a new template with `pattern` applied to `current`. `current` is not modified.
pub fn apply_pattern(pattern: RecurringPattern, current: &WeeklySchedule) -> WeeklySchedule {
    WeeklySchedule::from_entries(current.iter().map(|entry| {
        let day = entry.weekday;
        match pattern {
            RecurringPattern::WeekdaysOnly if is_weekend(day) => switched_off(entry),
            RecurringPattern::WeekdaysOnly => workday(day),
            RecurringPattern::WeekendOnly if is_weekend(day) => weekend_day(day),
            RecurringPattern::WeekendOnly => switched_off(entry),
            RecurringPattern::Daily => workday(day),
        }
    }))
}
