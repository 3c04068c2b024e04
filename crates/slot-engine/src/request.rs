//! Host-facing request envelope.
//!
//! Hosts (the CLI, the WASM bindings) receive one JSON document describing a
//! consultant and their availability settings. This module validates it at the
//! boundary and turns it into an [`ExportPayload`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::blocked::BlockedDate;
use crate::error::Result;
use crate::export::{Consultant, DateSpan, ExportPayload};
use crate::schedule::{TimeSlotConfig, WeeklySchedule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub consultant: Consultant,
    pub weekly_schedule: WeeklySchedule,
    #[serde(default)]
    pub time_slot_config: TimeSlotConfig,
    #[serde(default)]
    pub blocked_dates: Vec<BlockedDate>,
    /// Explicit range. When absent, the advance booking window is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateSpan>,
}

impl AvailabilityRequest {
    /// Parse and validate a request document.
    ///
    /// # Errors
    /// Fails on malformed JSON, unknown weekdays or blocked-date tags, bad
    /// `"HH:MM"` times, an invalid timezone or a zero slot duration.
    pub fn from_json(json: &str) -> Result<Self> {
        let request: AvailabilityRequest = serde_json::from_str(json)?;
        request.consultant.tz()?;
        request.time_slot_config.validate()?;
        Ok(request)
    }

    /// The explicit range if one was given, else `today`'s advance booking window.
    pub fn resolve_range(&self, today: NaiveDate) -> DateSpan {
        self.date_range.unwrap_or_else(|| {
            let (start, end) = self.time_slot_config.advance_window(today);
            DateSpan { start, end }
        })
    }

    pub fn into_payload(self, range: DateSpan) -> Result<ExportPayload> {
        ExportPayload::build(
            self.consultant,
            range,
            self.weekly_schedule,
            self.time_slot_config,
            self.blocked_dates,
        )
    }
}
