//! Render computed availability to interchange formats.
//!
//! [`ExportPayload`] bundles everything a consumer needs: who the consultant is,
//! the requested range, the template and config that produced the slots, the
//! exceptions applied, and the slots themselves. [`export`] turns a payload into
//! bytes in one of three formats:
//!
//! - `json` — pretty-printed dump of the whole payload plus `totalSlots` and `exportedAt`
//! - `csv` — one row per slot: `Date,Day,Start Time,End Time,Duration,Available`
//! - `ical` — RFC 5545 calendar with one `VEVENT` per slot (see [`crate::ical`])
//!
//! The export timestamp is a parameter, so identical inputs always produce
//! identical bytes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blocked::BlockedDate;
use crate::error::{Result, SlotError};
use crate::ical;
use crate::range::{compute_slots, ComputedSlot};
use crate::schedule::{weekday_name, TimeSlotConfig, WeeklySchedule};

/// Identity of the consultant whose availability is exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// IANA timezone the weekly template is expressed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Consultant {
    /// # Errors
    /// Returns `SlotError::InvalidTimezone` if `timezone` is not an IANA zone name.
    pub fn new(id: impl Into<String>, name: impl Into<String>, timezone: &str) -> Result<Self> {
        let consultant = Self {
            id: id.into(),
            name: name.into(),
            timezone: timezone.to_string(),
        };
        consultant.tz()?;
        Ok(consultant)
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| SlotError::InvalidTimezone(self.timezone.clone()))
    }

    /// Name for human-facing text, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Inclusive calendar range of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Everything the exporter renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub consultant: Consultant,
    pub date_range: DateSpan,
    pub weekly_schedule: WeeklySchedule,
    pub time_slot_config: TimeSlotConfig,
    pub blocked_dates: Vec<BlockedDate>,
    pub available_slots: Vec<ComputedSlot>,
}

impl ExportPayload {
    /// Compute slots for `date_range` and bundle them with their inputs.
    ///
    /// # Errors
    /// Fails on an invalid consultant timezone or a zero slot duration.
    pub fn build(
        consultant: Consultant,
        date_range: DateSpan,
        weekly_schedule: WeeklySchedule,
        time_slot_config: TimeSlotConfig,
        blocked_dates: Vec<BlockedDate>,
    ) -> Result<Self> {
        consultant.tz()?;
        let available_slots = compute_slots(
            date_range.start,
            date_range.end,
            &weekly_schedule,
            &time_slot_config,
            &blocked_dates,
            &consultant.id,
        )?;
        Ok(Self {
            consultant,
            date_range,
            weekly_schedule,
            time_slot_config,
            blocked_dates,
            available_slots,
        })
    }
}

/// A decoded JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(flatten)]
    pub payload: ExportPayload,
    pub total_slots: usize,
    pub exported_at: DateTime<Utc>,
}

impl ExportDocument {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Output-side twin of [`ExportDocument`] that borrows the payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    #[serde(flatten)]
    payload: &'a ExportPayload,
    total_slots: usize,
    exported_at: DateTime<Utc>,
}

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Ical,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Ical => "ics",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Ical => "text/calendar",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Ical => "ical",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "ical" | "ics" | "icalendar" => Ok(ExportFormat::Ical),
            _ => Err(SlotError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Render `payload` in the format named by `format`.
///
/// # Errors
/// Returns `SlotError::UnsupportedFormat` for an unknown format name, before
/// any rendering happens.
pub fn export(payload: &ExportPayload, format: &str, exported_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let format: ExportFormat = format.parse()?;
    render(payload, format, exported_at)
}

/// Render `payload` in an already-parsed format.
pub fn render(payload: &ExportPayload, format: ExportFormat, exported_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let bytes = match format {
        ExportFormat::Json => render_json(payload, exported_at)?,
        ExportFormat::Csv => render_csv(payload),
        ExportFormat::Ical => ical::render_ical(payload, exported_at)?,
    };
    debug!(
        consultant_id = %payload.consultant.id,
        %format,
        slots = payload.available_slots.len(),
        bytes = bytes.len(),
        "rendered export"
    );
    Ok(bytes)
}

pub fn render_json(payload: &ExportPayload, exported_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let doc = JsonDocument {
        payload,
        total_slots: payload.available_slots.len(),
        exported_at,
    };
    Ok(serde_json::to_vec_pretty(&doc)?)
}

pub const CSV_HEADER: &str = "Date,Day,Start Time,End Time,Duration,Available";

/// One header row, then one row per slot. Rows are `\n`-separated with no
/// trailing newline.
pub fn render_csv(payload: &ExportPayload) -> Vec<u8> {
    let duration = payload.time_slot_config.duration_minutes;
    let mut lines = Vec::with_capacity(payload.available_slots.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for slot in &payload.available_slots {
        lines.push(format!(
            "{},{},{},{},{}m,true",
            slot.date.format("%Y-%m-%d"),
            weekday_name(slot.date.weekday()),
            slot.start_time,
            slot.end_time,
            duration
        ));
    }
    lines.join("\n").into_bytes()
}
