//! Wall-clock minute-of-day values.
//!
//! Weekly templates and slots are date-independent, so they are expressed as
//! minutes since local midnight rather than full datetimes. `24:00` is accepted
//! as an end-of-day marker; nothing later is.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SlotError};

/// Minutes in one day. `TimeOfDay` ranges over `0..=MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time, stored as minutes since midnight.
///
/// Serialized as a zero-padded `"HH:MM"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Const constructor for literal times.
    ///
    /// # Panics
    /// Panics if `minute >= 60` or the time is past `24:00`. In a `const` item
    /// that is a compile error. Use [`TimeOfDay::from_hm`] for runtime input.
    pub const fn hm(hour: u32, minute: u32) -> TimeOfDay {
        assert!(minute < 60 && hour * 60 + minute <= MINUTES_PER_DAY);
        TimeOfDay(hour * 60 + minute)
    }

    /// Build from hour and minute. Fails outside `00:00..=24:00`.
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        let minutes = hour.checked_mul(60).and_then(|m| m.checked_add(minute));
        match minutes {
            Some(minutes) if minute < 60 => Self::from_minutes(minutes),
            _ => Err(SlotError::InvalidTime(format!("{:02}:{:02}", hour, minute))),
        }
    }

    /// Build from minutes since midnight. Fails past `24:00`.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidTime(format!(
                "{} minutes is past the end of the day",
                minutes
            )));
        }
        Ok(TimeOfDay(minutes))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Add minutes, returning `None` if the result would pass `24:00`.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<TimeOfDay> {
        self.0
            .checked_add(minutes)
            .filter(|&m| m <= MINUTES_PER_DAY)
            .map(TimeOfDay)
    }

    /// Anchor this time to a calendar date. `24:00` becomes midnight of the next day.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    /// Parse `"H:MM"` or `"HH:MM"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
