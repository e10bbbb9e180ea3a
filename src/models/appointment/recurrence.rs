use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Dates within `[window_start, window_end)` on which a series produces an
/// occurrence, walking the window day by day.
///
/// Biweekly parity is anchored on the series' own start date; monthly means
/// the same day-of-month as the start (months without that day are skipped).
pub fn occurrence_dates(
    rule: &str,
    series_start: NaiveDate,
    until: Option<NaiveDate>,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    if window_end <= window_start {
        return dates;
    }

    let mut d = window_start.max(series_start);
    let mut last = window_end - Duration::days(1);
    if let Some(u) = until {
        last = last.min(u);
    }

    while d <= last {
        let hit = match rule {
            "daily" => true,
            "weekdays" => !matches!(d.weekday(), Weekday::Sat | Weekday::Sun),
            "weekly" => d.weekday() == series_start.weekday(),
            "biweekly" => {
                // Same weekday means the gap is a whole number of weeks.
                d.weekday() == series_start.weekday()
                    && (d - series_start).num_days() / 7 % 2 == 0
            }
            "monthly" => d.day() == series_start.day(),
            _ => false,
        };
        if hit {
            dates.push(d);
        }
        d += Duration::days(1);
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_fills_the_window() {
        let dates = occurrence_dates("daily", d(2026, 8, 1), None, d(2026, 8, 3), d(2026, 8, 10));
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], d(2026, 8, 3));
        assert_eq!(dates[6], d(2026, 8, 9));
    }

    #[test]
    fn weekdays_skip_weekends() {
        // 2026-08-03 is a Monday; the week window holds exactly Mon..Fri.
        let dates =
            occurrence_dates("weekdays", d(2026, 8, 1), None, d(2026, 8, 3), d(2026, 8, 10));
        assert_eq!(dates.len(), 5);
        assert!(dates.iter().all(|x| x.weekday().num_days_from_monday() < 5));
    }

    #[test]
    fn weekly_lands_on_the_series_weekday() {
        // Series starts Tuesday 2026-08-04.
        let dates =
            occurrence_dates("weekly", d(2026, 8, 4), None, d(2026, 8, 1), d(2026, 8, 31));
        assert_eq!(dates, vec![d(2026, 8, 4), d(2026, 8, 11), d(2026, 8, 18), d(2026, 8, 25)]);
    }

    #[test]
    fn biweekly_keeps_series_parity() {
        let dates =
            occurrence_dates("biweekly", d(2026, 8, 4), None, d(2026, 8, 1), d(2026, 9, 2));
        assert_eq!(dates, vec![d(2026, 8, 4), d(2026, 8, 18), d(2026, 9, 1)]);
    }

    #[test]
    fn monthly_uses_the_start_day_of_month() {
        let dates =
            occurrence_dates("monthly", d(2026, 1, 31), None, d(2026, 1, 1), d(2026, 5, 1));
        // February and April 2026 have no 31st.
        assert_eq!(dates, vec![d(2026, 1, 31), d(2026, 3, 31)]);
    }

    #[test]
    fn until_truncates_the_series() {
        let dates = occurrence_dates(
            "daily",
            d(2026, 8, 1),
            Some(d(2026, 8, 5)),
            d(2026, 8, 3),
            d(2026, 8, 10),
        );
        assert_eq!(dates, vec![d(2026, 8, 3), d(2026, 8, 4), d(2026, 8, 5)]);
    }

    #[test]
    fn window_before_series_start_is_empty() {
        let dates = occurrence_dates("daily", d(2026, 8, 20), None, d(2026, 8, 3), d(2026, 8, 10));
        assert!(dates.is_empty());
    }
}
