//! WASM bindings for slot-engine.
//!
//! Exposes slot computation, export and recurring presets to the browser
//! dashboard via `wasm-bindgen`. All structured values cross the boundary as
//! JSON strings in the same camelCase shape the engine serializes.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use slot_engine::{AvailabilityRequest, DateSpan, RecurringPattern, WeeklySchedule};
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Parse a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    s.parse::<NaiveDate>()
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

/// Parse an RFC 3339 timestamp into UTC.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, JsValue> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| JsValue::from_str(&format!("Invalid timestamp '{}': {}", s, e)))
}

/// Resolve the range: the request's own `dateRange`, else the advance booking
/// window relative to `today`.
fn resolve(request: &AvailabilityRequest, today: &str) -> Result<DateSpan, JsValue> {
    Ok(request.resolve_range(parse_date(today)?))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute bookable slots for a request.
///
/// `request_json` is an `AvailabilityRequest` document. `today` (`YYYY-MM-DD`)
/// anchors the advance booking window when the request has no `dateRange`.
/// Returns a JSON array of `{date, startTime, endTime, consultantId}`.
#[wasm_bindgen(js_name = "computeSlots")]
pub fn compute_slots(request_json: &str, today: &str) -> Result<String, JsValue> {
    let request = AvailabilityRequest::from_json(request_json).map_err(js_err)?;
    let span = resolve(&request, today)?;
    let slots = slot_engine::compute_slots(
        span.start,
        span.end,
        &request.weekly_schedule,
        &request.time_slot_config,
        &request.blocked_dates,
        &request.consultant.id,
    )
    .map_err(js_err)?;

    serde_json::to_string(&slots)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Export a request's availability as `json`, `csv` or `ical`.
///
/// `exported_at` is an RFC 3339 timestamp stamped into the output, so the same
/// arguments always yield the same text. Throws on an unsupported format.
#[wasm_bindgen(js_name = "exportSchedule")]
pub fn export_schedule(
    request_json: &str,
    format: &str,
    today: &str,
    exported_at: &str,
) -> Result<String, JsValue> {
    let request = AvailabilityRequest::from_json(request_json).map_err(js_err)?;
    let span = resolve(&request, today)?;
    let exported_at = parse_timestamp(exported_at)?;
    let payload = request.into_payload(span).map_err(js_err)?;
    let bytes = slot_engine::export(&payload, format, exported_at).map_err(js_err)?;

    String::from_utf8(bytes).map_err(js_err)
}

/// Apply a recurring preset to a weekly schedule.
///
/// `pattern` is `weekdaysOnly`, `weekendOnly` or `daily` (kebab-case also
/// accepted). Returns the rewritten schedule as JSON.
#[wasm_bindgen(js_name = "applyPattern")]
pub fn apply_pattern(pattern: &str, schedule_json: &str) -> Result<String, JsValue> {
    let pattern: RecurringPattern = pattern.parse().map_err(js_err)?;
    let current: WeeklySchedule = serde_json::from_str(schedule_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid schedule JSON: {}", e)))?;
    let updated = slot_engine::apply_pattern(pattern, &current);

    serde_json::to_string(&updated)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
