//! Tests for JSON, CSV and iCalendar export.

use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use slot_engine::export::{export, render_csv, ExportDocument, ExportFormat, CSV_HEADER};
use slot_engine::ical::{event_end, event_uid, to_utc};
use slot_engine::{
    BlockedDate, Consultant, DateSpan, ExportPayload, SlotError, TimeOfDay, TimeSlotConfig,
    WeeklySchedule, WeeklyScheduleEntry,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn exported_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 8, 30, 0).unwrap()
}

fn payload_with(consultant: Consultant, duration: u32) -> ExportPayload {
    let schedule = WeeklySchedule::from_entries(
        [Weekday::Mon, Weekday::Tue, Weekday::Wed].map(|day| {
            WeeklyScheduleEntry::open(day, t("09:00"), t("17:00")).with_break(t("12:00"), t("13:00"))
        }),
    );
    let config = TimeSlotConfig {
        duration_minutes: duration,
        buffer_minutes: 15,
        min_advance_days: 1,
        max_advance_days: 30,
    };
    let blocked = vec![
        BlockedDate::full_day(d("2026-03-17"), "Holiday"),
        BlockedDate::partial_day(d("2026-03-18"), t("14:00"), t("16:00"), "Staff meeting"),
    ];
    ExportPayload::build(
        consultant,
        DateSpan {
            start: d("2026-03-16"),
            end: d("2026-03-22"),
        },
        schedule,
        config,
        blocked,
    )
    .unwrap()
}

fn payload() -> ExportPayload {
    payload_with(Consultant::new("c-42", "Dana Reyes", "Europe/London").unwrap(), 60)
}

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

// ── Format selection ────────────────────────────────────────────────────────

#[test]
fn format_names_parse() {
    assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
    assert_eq!("ical".parse::<ExportFormat>().unwrap(), ExportFormat::Ical);
    assert_eq!("ics".parse::<ExportFormat>().unwrap(), ExportFormat::Ical);
    assert_eq!(ExportFormat::Ical.extension(), "ics");
    assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
}

#[test]
fn unsupported_format_fails_without_output() {
    let result = export(&payload(), "xml", exported_at());
    match result {
        Err(SlotError::UnsupportedFormat(name)) => assert_eq!(name, "xml"),
        other => panic!("expected UnsupportedFormat, got {:?}", other.map(|b| b.len())),
    }
}

// ── CSV ─────────────────────────────────────────────────────────────────────

#[test]
fn csv_has_header_and_one_row_per_slot() {
    let p = payload();
    let csv = text(export(&p, "csv", exported_at()).unwrap());
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], CSV_HEADER);
    assert_eq!(lines.len() - 1, p.available_slots.len());
    assert_eq!(lines[1], "2026-03-16,Monday,09:00,10:00,60m,true");
}

#[test]
fn csv_reflects_blocked_dates() {
    let p = payload();
    let csv = text(render_csv(&p));

    // Tuesday is fully blocked, Wednesday loses 14:45-15:45 only.
    assert!(!csv.contains("2026-03-17"));
    assert!(csv.contains("2026-03-18,Wednesday,13:30,14:30,60m,true"));
    assert!(!csv.contains("2026-03-18,Wednesday,14:45"));
    // Mon 5 + Wed 4
    assert_eq!(p.available_slots.len(), 9);
}

#[test]
fn csv_for_empty_payload_is_header_only() {
    let mut p = payload();
    p.available_slots.clear();
    assert_eq!(text(render_csv(&p)), CSV_HEADER);
}

// ── JSON ────────────────────────────────────────────────────────────────────

#[test]
fn json_has_documented_top_level_keys_in_order() {
    let json = text(export(&payload(), "json", exported_at()).unwrap());
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();

    assert_eq!(
        keys,
        vec![
            "consultant",
            "dateRange",
            "weeklySchedule",
            "timeSlotConfig",
            "blockedDates",
            "availableSlots",
            "totalSlots",
            "exportedAt",
        ]
    );
    assert_eq!(value["totalSlots"], 9);
    assert_eq!(value["timeSlotConfig"]["durationMinutes"], 60);
    assert_eq!(value["weeklySchedule"]["monday"]["breakStart"], "12:00");
    assert_eq!(value["blockedDates"][0]["type"], "fullDay");
    assert_eq!(value["availableSlots"][0]["startTime"], "09:00");
    // Pretty-printed.
    assert!(json.contains("\n  \"consultant\""));
}

#[test]
fn json_round_trip_preserves_count_and_endpoints() {
    let p = payload();
    let bytes = export(&p, "json", exported_at()).unwrap();
    let doc = ExportDocument::from_json(&bytes).unwrap();

    assert_eq!(doc.total_slots, p.available_slots.len());
    assert_eq!(doc.payload.available_slots.first(), p.available_slots.first());
    assert_eq!(doc.payload.available_slots.last(), p.available_slots.last());
    assert_eq!(doc.exported_at, exported_at());
    assert_eq!(doc.payload, p);
}

#[test]
fn export_is_deterministic() {
    let p = payload();
    for format in ["json", "csv", "ical"] {
        assert_eq!(
            export(&p, format, exported_at()).unwrap(),
            export(&p, format, exported_at()).unwrap(),
            "{} export should be byte-identical",
            format
        );
    }
}

// ── iCalendar ───────────────────────────────────────────────────────────────

#[test]
fn ical_wraps_one_event_per_slot() {
    let p = payload();
    let ics = text(export(&p, "ical", exported_at()).unwrap());

    assert!(ics.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
    assert_eq!(ics.matches("BEGIN:VEVENT").count(), p.available_slots.len());
    assert_eq!(ics.matches("END:VEVENT").count(), p.available_slots.len());
}

#[test]
fn ical_event_fields_use_consultant_timezone() {
    let ics = text(export(&payload(), "ical", exported_at()).unwrap());

    // London is on GMT until the end of March.
    assert!(ics.contains("UID:20260316-0900-c-42@slot-engine\r\n"));
    assert!(ics.contains("DTSTART:20260316T090000Z\r\n"));
    assert!(ics.contains("DTEND:20260316T100000Z\r\n"));
    assert!(ics.contains("DTSTAMP:20260310T083000Z\r\n"));
    assert!(ics.contains("SUMMARY:Available - Dana Reyes\r\n"));
}

#[test]
fn ical_utc_consultant_uses_z_suffix() {
    let p = payload_with(Consultant::new("c-1", "", "UTC").unwrap(), 60);
    let ics = text(export(&p, "ical", exported_at()).unwrap());

    assert!(ics.contains("DTSTART:20260316T090000Z\r\n"));
    // Falls back to the id when no name is set.
    assert!(ics.contains("SUMMARY:Available - c-1\r\n"));
}

#[test]
fn ical_converts_local_times_to_utc() {
    // 09:00 in Tokyo (UTC+9) is midnight UTC the same day.
    let p = payload_with(Consultant::new("c-7", "Kenji", "Asia/Tokyo").unwrap(), 60);
    let ics = text(export(&p, "ical", exported_at()).unwrap());

    assert!(ics.contains("DTSTART:20260316T000000Z\r\n"));
    assert!(ics.contains("DTEND:20260316T010000Z\r\n"));
    assert!(ics.contains("X-WR-TIMEZONE:Asia/Tokyo\r\n"));
}

#[test]
fn ical_never_references_an_undefined_timezone() {
    for zone in ["Europe/London", "Asia/Tokyo", "America/New_York", "UTC"] {
        let p = payload_with(Consultant::new("c-42", "Dana", zone).unwrap(), 60);
        let ics = text(export(&p, "ical", exported_at()).unwrap());
        assert!(!ics.contains("TZID="), "{zone}");
        assert!(!ics.contains("VTIMEZONE"), "{zone}");
        for line in ics.lines().filter(|l| l.starts_with("DTSTART") || l.starts_with("DTEND")) {
            assert!(line.ends_with('Z'), "{zone}: {line}");
        }
    }
}

#[test]
fn utc_resolution_follows_dst_offsets() {
    let ny: chrono_tz::Tz = "America/New_York".parse().unwrap();
    let at = |date: &str, h, m| d(date).and_hms_opt(h, m, 0).unwrap();
    let utc = |date: &str, h, m| Utc.from_utc_datetime(&at(date, h, m));

    // Winter (EST, UTC-5) and summer (EDT, UTC-4).
    assert_eq!(to_utc(at("2026-01-12", 9, 0), ny), utc("2026-01-12", 14, 0));
    assert_eq!(to_utc(at("2026-07-13", 9, 0), ny), utc("2026-07-13", 13, 0));
    // 02:30 is skipped on 8 March 2026 and shifts forward to 03:30 EDT.
    assert_eq!(to_utc(at("2026-03-08", 2, 30), ny), utc("2026-03-08", 7, 30));
    // 01:30 happens twice on 1 November 2026; the first (EDT) wins.
    assert_eq!(to_utc(at("2026-11-01", 1, 30), ny), utc("2026-11-01", 5, 30));
}

#[test]
fn ical_end_carries_minutes_into_the_hour() {
    // 10:30 + 45 must become 11:15, not 10:75.
    let start = d("2026-03-16").and_hms_opt(10, 30, 0).unwrap();
    assert_eq!(
        event_end(start, 45),
        d("2026-03-16").and_hms_opt(11, 15, 0).unwrap()
    );
    assert_eq!(
        event_end(d("2026-03-16").and_hms_opt(23, 30, 0).unwrap(), 45),
        d("2026-03-17").and_hms_opt(0, 15, 0).unwrap()
    );

    let p = payload_with(Consultant::new("c-42", "Dana", "Europe/London").unwrap(), 50);
    let ics = text(export(&p, "ical", exported_at()).unwrap());
    // Slots: 09:00-09:50, 10:05-10:55, 11:10-12:00 ...
    assert!(ics.contains("DTSTART:20260316T100500Z\r\n"));
    assert!(ics.contains("DTEND:20260316T105500Z\r\n"));
    assert!(ics.contains("DTEND:20260316T120000Z\r\n"));
    assert!(!ics.contains("T1060"));
}

#[test]
fn ical_uid_is_stable_per_date_start_and_consultant() {
    let p = payload();
    let uids: Vec<String> = p.available_slots.iter().map(event_uid).collect();
    let mut unique = uids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), uids.len());
}

#[test]
fn ical_escapes_text_and_folds_long_lines() {
    let name = "Dr. Alexandria Montgomery-Fitzwilliam, Senior Admissions; Visa & Scholarship Advisor";
    let p = payload_with(Consultant::new("c-9", name, "UTC").unwrap(), 60);
    let ics = text(export(&p, "ical", exported_at()).unwrap());

    for line in ics.split("\r\n") {
        assert!(line.len() <= 75, "line exceeds 75 octets: {:?}", line);
    }
    let unfolded = ics.replace("\r\n ", "");
    assert!(unfolded.contains(r"Montgomery-Fitzwilliam\, Senior Admissions\; Visa"));
}

#[test]
fn ical_rejects_unknown_timezone() {
    assert!(matches!(
        Consultant::new("c-1", "x", "Mars/Olympus"),
        Err(SlotError::InvalidTimezone(_))
    ));
}
