//! iCalendar (RFC 5545) rendering of computed slots.
//!
//! Each slot becomes one `VEVENT`. Slot times are consultant-local wall-clock
//! values; they are resolved through the consultant's zone and written as UTC
//! (`...Z`), so the document needs no `VTIMEZONE`. Content lines end in CRLF and
//! are folded at 75 octets.
//!
//! Around DST transitions a repeated local time takes its first occurrence and a
//! skipped local time shifts forward by the length of the gap.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::Result;
use crate::export::ExportPayload;
use crate::range::ComputedSlot;

pub const PRODID: &str = "-//Slot Engine//Consultant Availability//EN";

const MAX_LINE_OCTETS: usize = 75;

/// Render the payload's slots as a `VCALENDAR` document.
///
/// # Errors
/// Returns `SlotError::InvalidTimezone` if the consultant's timezone is not an
/// IANA zone name.
pub fn render_ical(payload: &ExportPayload, exported_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let tz = payload.consultant.tz()?;
    let name = payload.consultant.display_name();
    let duration = payload.time_slot_config.duration_minutes;
    let dtstamp = exported_at.format("%Y%m%dT%H%M%SZ").to_string();

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{}", PRODID));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    push_line(&mut out, &format!("X-WR-CALNAME:{}", escape_text(&format!("{} availability", name))));
    push_line(&mut out, &format!("X-WR-TIMEZONE:{}", tz.name()));

    for slot in &payload.available_slots {
        let start = slot.start();
        let end = event_end(start, duration);

        push_line(&mut out, "BEGIN:VEVENT");
        push_line(&mut out, &format!("UID:{}", escape_text(&event_uid(slot))));
        push_line(&mut out, &format!("DTSTAMP:{}", dtstamp));
        push_line(&mut out, &format!("DTSTART:{}", utc_stamp(start, tz)));
        push_line(&mut out, &format!("DTEND:{}", utc_stamp(end, tz)));
        push_line(&mut out, &format!("SUMMARY:{}", escape_text(&format!("Available - {}", name))));
        push_line(
            &mut out,
            &format!(
                "DESCRIPTION:{}",
                escape_text(&format!("Available {}-minute consultation slot with {}", duration, name))
            ),
        );
        push_line(&mut out, "TRANSP:TRANSPARENT");
        push_line(&mut out, "END:VEVENT");
    }

    push_line(&mut out, "END:VCALENDAR");
    Ok(out.into_bytes())
}

/// Stable event id built from the slot's date, start time and consultant.
pub fn event_uid(slot: &ComputedSlot) -> String {
    format!(
        "{}-{:02}{:02}-{}@slot-engine",
        slot.date.format("%Y%m%d"),
        slot.start_time.hour(),
        slot.start_time.minute(),
        slot.consultant_id
    )
}

/// `start + duration_minutes`, carrying minutes into hours and hours into the
/// next day.
pub fn event_end(start: NaiveDateTime, duration_minutes: u32) -> NaiveDateTime {
    start + Duration::minutes(i64::from(duration_minutes))
}

/// Resolve a wall-clock time in `tz` to an instant.
pub fn to_utc(local: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Read the skipped time with the offset in force before the gap.
            let before = tz.offset_from_utc_datetime(&(local - Duration::days(1))).fix();
            Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(before.local_minus_utc()))))
        }
    }
}

/// `YYYYMMDDTHHMMSSZ` for a local time in `tz`.
fn utc_stamp(local: NaiveDateTime, tz: Tz) -> String {
    to_utc(local, tz).format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape a TEXT value: backslash, semicolon, comma and newlines.
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Append a content line, folding it so no physical line exceeds 75 octets.
/// Continuation lines start with a single space.
fn push_line(out: &mut String, line: &str) {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if used + len > budget {
            out.push_str("\r\n ");
            // The leading space counts against the continuation line.
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.push(c);
        used += len;
    }
    out.push_str("\r\n");
}
