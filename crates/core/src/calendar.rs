//! Calendar rules: qualifying volunteer days, weekday names, slot clock times.
//!
//! Volunteers are only scheduled on weekends and public holidays. Holiday
//! data comes from a [`HolidayCalendar`] implementation (the HTTP client in
//! `docent-providers` in production, [`FixedHolidays`] in tests).

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use serde::Serialize;

/// Clock-time format used for slot start/end times.
pub const SLOT_TIME_FORMAT: &str = "%H:%M";

// ---------------------------------------------------------------------------
// Holidays
// ---------------------------------------------------------------------------

/// Source of public holidays for the configured region.
///
/// Implementations are expected to cache per year and to degrade to an
/// empty set when the upstream source is unavailable.
#[async_trait]
pub trait HolidayCalendar: Send + Sync {
    /// All public holidays in `year`.
    async fn holidays(&self, year: i32) -> BTreeSet<NaiveDate>;

    /// Whether `date` is a public holiday.
    async fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays(date.year()).await.contains(&date)
    }
}

/// A static holiday list.
#[derive(Debug, Clone, Default)]
pub struct FixedHolidays(pub BTreeSet<NaiveDate>);

impl FixedHolidays {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self(dates.into_iter().collect())
    }
}

#[async_trait]
impl HolidayCalendar for FixedHolidays {
    async fn holidays(&self, year: i32) -> BTreeSet<NaiveDate> {
        self.0.iter().copied().filter(|d| d.year() == year).collect()
    }
}

// ---------------------------------------------------------------------------
// Qualifying days
// ---------------------------------------------------------------------------

/// Why a date qualifies for volunteering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualifyingReason {
    Weekend,
    Holiday,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns the reason `date` qualifies, or `None` for an ordinary weekday.
///
/// Weekends short-circuit without consulting the holiday calendar.
pub async fn qualifying_reason(
    date: NaiveDate,
    holidays: &dyn HolidayCalendar,
) -> Option<QualifyingReason> {
    if is_weekend(date) {
        return Some(QualifyingReason::Weekend);
    }
    if holidays.is_holiday(date).await {
        return Some(QualifyingReason::Holiday);
    }
    None
}

/// Whether volunteers are needed on `date` (weekend or public holiday).
pub async fn is_qualifying_day(date: NaiveDate, holidays: &dyn HolidayCalendar) -> bool {
    qualifying_reason(date, holidays).await.is_some()
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// English weekday name, e.g. `"Saturday"`.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// e.g. `"Saturday, March 8, 2025"`.
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// e.g. `"Mar 8, 2025"`.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// e.g. `"2:00 PM"`.
pub fn twelve_hour_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

// ---------------------------------------------------------------------------
// Slot clock times
// ---------------------------------------------------------------------------

/// Parse a strict `HH:mm` 24-hour clock time.
pub fn parse_slot_time(value: &str) -> Result<NaiveTime, String> {
    let well_formed = value.len() == 5 && value.as_bytes()[2] == b':';
    if !well_formed {
        return Err(format!("Invalid time '{value}'. Expected HH:mm"));
    }
    NaiveTime::parse_from_str(value, SLOT_TIME_FORMAT)
        .map_err(|_| format!("Invalid time '{value}'. Expected HH:mm"))
}

/// Validate a slot's start/end pair: both `HH:mm`, start before end.
pub fn validate_slot_times(start: &str, end: &str) -> Result<(), String> {
    let start_time = parse_slot_time(start)?;
    let end_time = parse_slot_time(end)?;
    if start_time >= end_time {
        return Err(format!("Slot start {start} must be before end {end}"));
    }
    Ok(())
}

/// Compact display of a slot's hours: `"11 - 14"`, `"9:30 - 17"`.
pub fn slot_display_text(start: &str, end: &str) -> String {
    format!("{} - {}", compact_time(start), compact_time(end))
}

fn compact_time(value: &str) -> String {
    match parse_slot_time(value) {
        Ok(time) if time.minute() > 0 => format!("{}:{:02}", time.hour(), time.minute()),
        Ok(time) => time.hour().to_string(),
        Err(_) => value.to_string(),
    }
}
