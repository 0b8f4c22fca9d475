//! Appointment slots.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

/// Days ahead offered for appointments by default
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

const OPENING_HOUR: u32 = 9;
const CLOSING_HOUR: u32 = 18;

/// Half-hour slots from opening until the last slot before closing
/// (09:00 to 17:30)
#[must_use]
pub fn time_slots() -> Vec<NaiveTime> {
    (OPENING_HOUR..CLOSING_HOUR)
        .flat_map(|hour| [0, 30].map(|minute| NaiveTime::from_hms_opt(hour, minute, 0)))
        .flatten()
        .collect()
}

/// The `window` days after `today`, skipping Sundays
///
/// `today` itself is never offered.
#[must_use]
pub fn available_dates(today: NaiveDate, window: u32) -> Vec<NaiveDate> {
    (1..=u64::from(window))
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter(|date| date.weekday() != Weekday::Sun)
        .collect()
}

/// `Wednesday, January 1, 2025`
#[must_use]
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `09:30`
#[must_use]
pub fn format_slot(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn eighteen_half_hour_slots() {
        let slots: Vec<_> = time_slots().into_iter().map(format_slot).collect();

        assert_eq!(slots.len(), 18);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.get(1).map(String::as_str), Some("09:30"));
        assert_eq!(slots.last().map(String::as_str), Some("17:30"));
    }

    #[test]
    fn two_weeks_without_sundays() {
        // Wednesday
        let today = date(2025, 1, 1);
        let dates = available_dates(today, DEFAULT_WINDOW_DAYS);

        assert_eq!(dates.len(), 12);
        assert_eq!(dates.first(), Some(&date(2025, 1, 2)));
        assert_eq!(dates.last(), Some(&date(2025, 1, 15)));
        assert!(!dates.contains(&date(2025, 1, 5)));
        assert!(!dates.contains(&today));
    }

    #[test]
    fn long_date_format() {
        assert_eq!(format_long_date(date(2025, 1, 6)), "Monday, January 6, 2025");
        assert_eq!(format_long_date(date(2025, 11, 22)), "Saturday, November 22, 2025");
    }
}
