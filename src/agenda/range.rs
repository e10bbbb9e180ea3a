use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;

/// Agenda view modes, mirroring the console's month/week/day/list tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Month,
    Week,
    Day,
    List,
}

impl ViewMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "month" => Some(ViewMode::Month),
            "week" => Some(ViewMode::Week),
            "day" => Some(ViewMode::Day),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
            ViewMode::List => "list",
        }
    }
}

/// Half-open fetch window `[start, end)` for a view mode and reference date.
///
/// - month: first of the previous month through first of the month after the
///   next, so the month grid can peek into adjacent months.
/// - week: the ISO week (Monday start) containing the reference date.
/// - day: the reference date through the next day.
/// - list: the reference date through 14 days later.
pub fn fetch_window(view: ViewMode, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    match view {
        ViewMode::Month => {
            let first = first_of_month(reference);
            (shift_months(first, -1), shift_months(first, 2))
        }
        ViewMode::Week => {
            let monday =
                reference - Duration::days(reference.weekday().num_days_from_monday() as i64);
            (monday, monday + Duration::days(7))
        }
        ViewMode::Day => (reference, reference + Duration::days(1)),
        ViewMode::List => (reference, reference + Duration::days(14)),
    }
}

/// The days a window covers, in order. Used to build week/day columns.
pub fn window_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut d = start;
    while d < end {
        days.push(d);
        d += Duration::days(1);
    }
    days
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn shift_months(first: NaiveDate, delta: i32) -> NaiveDate {
    let months = first.year() * 12 + first.month0() as i32 + delta;
    NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1).unwrap()
}
