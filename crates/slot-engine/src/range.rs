//! Concrete availability over a calendar date range.
//!
//! For each date in `[start_date, end_date]`, applies that weekday's template via
//! [`generate_slots`], drops fully-blocked days and contained partial blocks, and
//! emits dated slots in day-then-time order.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::blocked::{BlockedDate, BlockedDateRegistry};
use crate::error::Result;
use crate::generator::generate_slots;
use crate::schedule::{TimeSlotConfig, WeeklySchedule};
use crate::time::TimeOfDay;

/// A bookable slot on a specific date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedSlot {
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub consultant_id: String,
}

impl ComputedSlot {
    /// Zero when a decoded slot ends before it starts.
    pub fn duration_minutes(&self) -> u32 {
        self.end_time.minutes().saturating_sub(self.start_time.minutes())
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start_time.on(self.date)
    }

    /// End as a local datetime. A slot ending at 24:00 ends at midnight of the next day.
    pub fn end(&self) -> NaiveDateTime {
        self.end_time.on(self.date)
    }
}

/// Compute every bookable slot for `consultant_id` between `start_date` and
/// `end_date`, both inclusive.
///
/// An inverted range returns an empty list. Invalid weekday templates contribute
/// no slots and do not fail the call.
///
/// # Errors
/// Returns `SlotError::Config` if `config.duration_minutes` is zero.
pub fn compute_slots(
    start_date: NaiveDate,
    end_date: NaiveDate,
    schedule: &WeeklySchedule,
    config: &TimeSlotConfig,
    blocked: &[BlockedDate],
    consultant_id: &str,
) -> Result<Vec<ComputedSlot>> {
    config.validate()?;

    if end_date < start_date {
        debug!(%start_date, %end_date, "inverted date range, nothing to compute");
        return Ok(Vec::new());
    }

    let registry = BlockedDateRegistry::new(blocked);

    // The weekly template repeats, so generate each weekday's slots once.
    let per_weekday: Vec<_> = schedule
        .iter()
        .map(|entry| generate_slots(entry, config))
        .collect();

    let mut out = Vec::new();
    let mut days = 0usize;
    for date in start_date.iter_days().take_while(|d| *d <= end_date) {
        days += 1;
        if registry.is_fully_blocked(date) {
            trace!(%date, "day fully blocked");
            continue;
        }
        let template = &per_weekday[date.weekday().num_days_from_monday() as usize];
        out.extend(
            template
                .iter()
                .filter(|slot| !registry.is_slot_blocked(date, slot))
                .map(|slot| ComputedSlot {
                    date,
                    start_time: slot.start,
                    end_time: slot.end,
                    consultant_id: consultant_id.to_string(),
                }),
        );
    }

    debug!(
        consultant_id,
        %start_date,
        %end_date,
        days,
        slots = out.len(),
        "computed availability"
    );
    Ok(out)
}
