//! Weekly availability template and slot sizing configuration.
//!
//! A [`WeeklySchedule`] holds exactly one [`WeeklyScheduleEntry`] per weekday.
//! Entries are plain data; inconsistent entries are reported by
//! [`WeeklyScheduleEntry::validate`] and produce zero slots downstream instead
//! of failing a whole computation.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, Weekday};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::time::TimeOfDay;

/// Weekdays in template order (Monday first).
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Lowercase key used in serialized templates, e.g. `"monday"`.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parse a weekday name. Accepts full and three-letter names in any case.
pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| SlotError::InvalidInput(format!("unknown weekday '{}'", s)))
}

mod weekday_serde {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(super::weekday_key(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_weekday(&raw).map_err(serde::de::Error::custom)
    }
}

const DEFAULT_START: TimeOfDay = TimeOfDay::hm(9, 0);
const DEFAULT_END: TimeOfDay = TimeOfDay::hm(17, 0);

/// The recurring template for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyScheduleEntry {
    #[serde(with = "weekday_serde")]
    pub weekday: Weekday,
    pub enabled: bool,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_start: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_end: Option<TimeOfDay>,
}

impl WeeklyScheduleEntry {
    /// A disabled day with the default 09:00–17:00 window filled in.
    pub fn disabled(weekday: Weekday) -> Self {
        Self {
            weekday,
            enabled: false,
            start: DEFAULT_START,
            end: DEFAULT_END,
            break_start: None,
            break_end: None,
        }
    }

    /// An enabled day without a break.
    pub fn open(weekday: Weekday, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            weekday,
            enabled: true,
            start,
            end,
            break_start: None,
            break_end: None,
        }
    }

    pub fn with_break(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.break_start = Some(start);
        self.break_end = Some(end);
        self
    }

    /// The break window, if it is complete and lies inside the work window.
    ///
    /// Requires `start <= break_start < break_end <= end`; anything else is
    /// treated as no break at all.
    pub fn effective_break(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        match (self.break_start, self.break_end) {
            (Some(bs), Some(be)) if self.start <= bs && bs < be && be <= self.end => Some((bs, be)),
            _ => None,
        }
    }

    /// Check that an enabled entry has a non-empty work window.
    ///
    /// Disabled entries are always valid regardless of their times.
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.start >= self.end {
            return Err(SlotError::Validation(format!(
                "{}: start {} must be before end {}",
                weekday_name(self.weekday),
                self.start,
                self.end
            )));
        }
        Ok(())
    }
}

/// One template entry per weekday, Monday through Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    entries: [WeeklyScheduleEntry; 7],
}

impl Default for WeeklySchedule {
    /// Every day disabled.
    fn default() -> Self {
        Self {
            entries: WEEK.map(WeeklyScheduleEntry::disabled),
        }
    }
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of entries; days not listed stay disabled. Later entries
    /// for the same weekday replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = WeeklyScheduleEntry>) -> Self {
        entries.into_iter().fold(Self::default(), Self::with_entry)
    }

    pub fn get(&self, day: Weekday) -> &WeeklyScheduleEntry {
        &self.entries[day.num_days_from_monday() as usize]
    }

    /// Return a copy with the entry for `entry.weekday` replaced.
    pub fn with_entry(mut self, entry: WeeklyScheduleEntry) -> Self {
        let idx = entry.weekday.num_days_from_monday() as usize;
        self.entries[idx] = entry;
        self
    }

    /// Entries in Monday-first order.
    pub fn iter(&self) -> impl Iterator<Item = &WeeklyScheduleEntry> {
        self.entries.iter()
    }

    /// Every invalid day, in Monday-first order. An empty result means the
    /// whole template is usable.
    pub fn validation_issues(&self) -> Vec<SlotError> {
        self.iter().filter_map(|e| e.validate().err()).collect()
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for entry in self.iter() {
            map.serialize_entry(weekday_key(entry.weekday), entry)?;
        }
        map.end()
    }
}

/// Wire shape of a single day inside a template map. The weekday comes from the
/// map key; times may be omitted only for disabled days.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayRecord {
    #[serde(default)]
    enabled: bool,
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "blank_as_none")]
    break_start: Option<TimeOfDay>,
    #[serde(default, deserialize_with = "blank_as_none")]
    break_end: Option<TimeOfDay>,
}

/// Form hosts send `""` for an unset break field.
fn blank_as_none<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<TimeOfDay>, D::Error> {
    match Option::<String>::deserialize(d)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

impl DayRecord {
    fn into_entry(self, weekday: Weekday) -> Result<WeeklyScheduleEntry> {
        let (start, end) = match (self.start, self.end) {
            (Some(s), Some(e)) => (s, e),
            (s, e) if !self.enabled => (s.unwrap_or(DEFAULT_START), e.unwrap_or(DEFAULT_END)),
            _ => {
                return Err(SlotError::InvalidInput(format!(
                    "{} is enabled but has no start/end time",
                    weekday_name(weekday)
                )))
            }
        };
        Ok(WeeklyScheduleEntry {
            weekday,
            enabled: self.enabled,
            start,
            end,
            break_start: self.break_start,
            break_end: self.break_end,
        })
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: BTreeMap<String, DayRecord> = BTreeMap::deserialize(deserializer)?;
        let mut schedule = WeeklySchedule::default();
        let mut seen = [false; 7];
        for (key, record) in raw {
            let weekday = parse_weekday(&key).map_err(de::Error::custom)?;
            let idx = weekday.num_days_from_monday() as usize;
            if seen[idx] {
                return Err(de::Error::custom(format!(
                    "{} appears more than once",
                    weekday_name(weekday)
                )));
            }
            seen[idx] = true;
            let entry = record.into_entry(weekday).map_err(de::Error::custom)?;
            schedule = schedule.with_entry(entry);
        }
        Ok(schedule)
    }
}

/// Slot sizing and the advance booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotConfig {
    pub duration_minutes: u32,
    #[serde(default)]
    pub buffer_minutes: u32,
    #[serde(default)]
    pub min_advance_days: u32,
    #[serde(default)]
    pub max_advance_days: u32,
}

impl Default for TimeSlotConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 60,
            buffer_minutes: 15,
            min_advance_days: 1,
            max_advance_days: 30,
        }
    }
}

impl TimeSlotConfig {
    /// A zero-length slot can never be produced, so this is a hard error.
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes == 0 {
            return Err(SlotError::Config(
                "durationMinutes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The inclusive date range `[today + minAdvanceDays, today + maxAdvanceDays]`.
    ///
    /// If `maxAdvanceDays < minAdvanceDays` the range is inverted and computes
    /// to no slots.
    pub fn advance_window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let shift = |days: u32| {
            today
                .checked_add_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MAX)
        };
        (shift(self.min_advance_days), shift(self.max_advance_days))
    }
}
