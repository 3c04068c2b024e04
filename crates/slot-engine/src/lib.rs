//! # slot-engine
//!
//! Deterministic consultant availability for booking and calendar consumers.
//!
//! Given a recurring weekly template, a slot sizing configuration and a set of
//! blocked dates, computes the bookable slots over any calendar range and
//! exports them as JSON, CSV or iCalendar. Every operation is a pure function
//! of its inputs; nothing is retained between calls.
//!
//! ## Modules
//!
//! - [`time`] — `TimeOfDay` minute-of-day values
//! - [`schedule`] — weekly template entries and `TimeSlotConfig`
//! - [`generator`] — one weekday template → ordered candidate slots
//! - [`blocked`] — full-day, partial-day and date-range exceptions
//! - [`range`] — calendar range → dated, filtered slots
//! - [`export`] / [`ical`] — JSON, CSV and iCalendar rendering
//! - [`pattern`] — weekdays-only / weekend-only / daily presets
//! - [`request`] — JSON request envelope for hosts
//! - [`error`] — Error types
//!
//! ## Example
//!
//! ```
//! use chrono::{NaiveDate, Weekday};
//! use slot_engine::{compute_slots, TimeOfDay, TimeSlotConfig, WeeklySchedule, WeeklyScheduleEntry};
//!
//! let monday = WeeklyScheduleEntry::open(Weekday::Mon, TimeOfDay::hm(9, 0), TimeOfDay::hm(12, 0));
//! let schedule = WeeklySchedule::from_entries([monday]);
//! let config = TimeSlotConfig { duration_minutes: 60, buffer_minutes: 0, ..Default::default() };
//! let day = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//!
//! let slots = compute_slots(day, day, &schedule, &config, &[], "c-1").unwrap();
//! assert_eq!(slots.len(), 3);
//! assert_eq!(slots[2].start_time.to_string(), "11:00");
//! ```

pub mod blocked;
pub mod error;
pub mod export;
pub mod generator;
pub mod ical;
pub mod pattern;
pub mod range;
pub mod request;
pub mod schedule;
pub mod time;

pub use blocked::{BlockedDate, BlockedDateRegistry};
pub use error::SlotError;
pub use export::{export, Consultant, DateSpan, ExportDocument, ExportFormat, ExportPayload};
pub use generator::{generate_slots, SlotInterval};
pub use pattern::{apply_pattern, RecurringPattern};
pub use range::{compute_slots, ComputedSlot};
pub use request::AvailabilityRequest;
pub use schedule::{TimeSlotConfig, WeeklySchedule, WeeklyScheduleEntry};
pub use time::TimeOfDay;
