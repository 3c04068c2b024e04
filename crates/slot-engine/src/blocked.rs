//! Date-specific availability exceptions.
//!
//! Three shapes of exception are supported: a whole day, a window within a day,
//! and an inclusive span of whole days. [`BlockedDateRegistry`] indexes a list
//! of them for per-date and per-slot lookups.
//!
//! Partial-day blocks only remove slots they fully contain. A slot that merely
//! overlaps a partial block stays bookable.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::generator::SlotInterval;
use crate::time::TimeOfDay;

/// A single availability exception with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockedDate {
    #[serde(rename_all = "camelCase")]
    FullDay {
        date: NaiveDate,
        #[serde(default)]
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    PartialDay {
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        #[serde(default)]
        reason: String,
    },
    #[serde(rename_all = "camelCase")]
    DateRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
        #[serde(default)]
        reason: String,
    },
}

impl BlockedDate {
    pub fn full_day(date: NaiveDate, reason: impl Into<String>) -> Self {
        BlockedDate::FullDay {
            date,
            reason: reason.into(),
        }
    }

    pub fn partial_day(
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        reason: impl Into<String>,
    ) -> Self {
        BlockedDate::PartialDay {
            date,
            start,
            end,
            reason: reason.into(),
        }
    }

    pub fn date_range(start_date: NaiveDate, end_date: NaiveDate, reason: impl Into<String>) -> Self {
        BlockedDate::DateRange {
            start_date,
            end_date,
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            BlockedDate::FullDay { reason, .. }
            | BlockedDate::PartialDay { reason, .. }
            | BlockedDate::DateRange { reason, .. } => reason,
        }
    }
}

/// Lookup index over a set of [`BlockedDate`]s.
///
/// Date ranges are kept as inclusive spans rather than materialized day by day,
/// so a multi-year range costs the same as a single day. An inverted range
/// (`end_date < start_date`) blocks nothing.
#[derive(Debug, Clone, Default)]
pub struct BlockedDateRegistry {
    full_days: BTreeSet<NaiveDate>,
    ranges: Vec<(NaiveDate, NaiveDate)>,
    partial: BTreeMap<NaiveDate, Vec<(TimeOfDay, TimeOfDay)>>,
}

impl BlockedDateRegistry {
    pub fn new(blocked: &[BlockedDate]) -> Self {
        let mut registry = Self::default();
        for entry in blocked {
            match *entry {
                BlockedDate::FullDay { date, .. } => {
                    registry.full_days.insert(date);
                }
                BlockedDate::PartialDay {
                    date, start, end, ..
                } => {
                    registry.partial.entry(date).or_default().push((start, end));
                }
                BlockedDate::DateRange {
                    start_date,
                    end_date,
                    ..
                } => {
                    if start_date <= end_date {
                        registry.ranges.push((start_date, end_date));
                    }
                }
            }
        }
        registry
    }

    pub fn is_empty(&self) -> bool {
        self.full_days.is_empty() && self.ranges.is_empty() && self.partial.is_empty()
    }

    /// True iff a full-day block, or a day covered by a date range, matches `date`.
    pub fn is_fully_blocked(&self, date: NaiveDate) -> bool {
        self.full_days.contains(&date)
            || self
                .ranges
                .iter()
                .any(|&(start, end)| start <= date && date <= end)
    }

    /// True iff a partial-day block on `date` fully contains `slot`.
    ///
    /// Containment is `blocked.start <= slot.start && blocked.end >= slot.end`.
    /// Partial overlap does not block.
    pub fn is_slot_blocked(&self, date: NaiveDate, slot: &SlotInterval) -> bool {
        self.partial.get(&date).is_some_and(|windows| {
            windows
                .iter()
                .any(|&(start, end)| start <= slot.start && end >= slot.end)
        })
    }
}
