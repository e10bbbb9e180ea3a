use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{DATE_FMT, DATETIME_FMT};
use crate::errors::AppError;

pub const KINDS: &[&str] = &["meeting", "internal", "task", "blocked"];
pub const RECURRENCES: &[&str] = &["none", "daily", "weekdays", "weekly", "biweekly", "monthly"];

/// How far in the past a new start time may lie before it is rejected.
pub const PAST_GRACE_MINUTES: i64 = 5;

/// Whether an edit or delete targets one occurrence or the whole series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Single,
    All,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::All
    }
}

/// A stored appointment row. A recurring series is one master row
/// (`recurrence != 'none'`, `series_id` NULL); single-occurrence overrides
/// carry `series_id` pointing at their master and `original_start` naming
/// the occurrence they replace.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Appointment {
    pub id: i64,
    pub series_id: Option<i64>,
    pub original_start: Option<String>,
    pub title: String,
    pub kind: String,
    pub starts_at: String,
    pub ends_at: String,
    pub location: String,
    pub description: String,
    pub meeting_link: String,
    pub recurrence: String,
    pub recurrence_until: Option<String>,
    pub user_id: Option<i64>,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Appointment {
    /// Project this row onto concrete occurrence times. `generated` marks
    /// occurrences expanded from a recurring master (their id is the
    /// master's id).
    pub fn occurrence(&self, starts_at: String, ends_at: String, generated: bool) -> Occurrence {
        Occurrence {
            id: self.id,
            series_id: if generated { Some(self.id) } else { self.series_id },
            title: self.title.clone(),
            kind: self.kind.clone(),
            starts_at,
            ends_at,
            location: self.location.clone(),
            description: self.description.clone(),
            meeting_link: self.meeting_link.clone(),
            recurrence: self.recurrence.clone(),
            user_id: self.user_id,
            order_id: self.order_id,
            customer_id: self.customer_id,
            case_id: self.case_id,
            repair_id: self.repair_id,
            generated,
        }
    }
}

/// One concrete calendar entry inside a fetch window.
#[derive(Debug, Clone, Serialize)]
pub struct Occurrence {
    pub id: i64,
    pub series_id: Option<i64>,
    pub title: String,
    pub kind: String,
    pub starts_at: String,
    pub ends_at: String,
    pub location: String,
    pub description: String,
    pub meeting_link: String,
    pub recurrence: String,
    pub user_id: Option<i64>,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
    pub generated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub title: String,
    #[serde(default)]
    pub kind: Option<String>,
    pub starts_at: String,
    pub ends_at: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meeting_link: String,
    #[serde(default)]
    pub recurrence: Option<String>,
    pub recurrence_until: Option<String>,
    pub user_id: Option<i64>,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
}

/// Absent fields stay unchanged; empty strings clear optional text fields
/// and `recurrence_until`, zero link ids clear the link.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub meeting_link: Option<String>,
    pub recurrence: Option<String>,
    pub recurrence_until: Option<String>,
    pub user_id: Option<i64>,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
}

/// Parse a timestamp in storage format, with or without seconds.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|_| AppError::Validation(format!("Invalid timestamp '{s}', expected YYYY-MM-DDTHH:MM:SS")))
}

pub fn parse_date(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|_| AppError::Validation(format!("Invalid date '{s}', expected YYYY-MM-DD")))
}

/// Parse and check an appointment's time pair. The end must lie after the
/// start; when `now` is given, the start may not be more than five minutes
/// in the past.
pub fn validate_times(
    starts_at: &str,
    ends_at: &str,
    now: Option<NaiveDateTime>,
) -> Result<(NaiveDateTime, NaiveDateTime), AppError> {
    let start = parse_datetime(starts_at)?;
    let end = parse_datetime(ends_at)?;
    if end <= start {
        return Err(AppError::Validation(
            "End time must be after start time".to_string(),
        ));
    }
    if let Some(now) = now {
        if start < now - Duration::minutes(PAST_GRACE_MINUTES) {
            return Err(AppError::Validation(
                "Start time cannot be more than 5 minutes in the past".to_string(),
            ));
        }
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    #[test]
    fn rejects_end_before_or_at_start() {
        assert!(validate_times("2026-08-04T10:00:00", "2026-08-04T10:00:00", None).is_err());
        assert!(validate_times("2026-08-04T10:00:00", "2026-08-04T09:00:00", None).is_err());
        assert!(validate_times("2026-08-04T10:00:00", "2026-08-04T10:30:00", None).is_ok());
    }

    #[test]
    fn rejects_starts_more_than_five_minutes_past() {
        let now = dt("2026-08-04T12:00:00");
        assert!(validate_times("2026-08-04T11:54:00", "2026-08-04T13:00:00", Some(now)).is_err());
        // Inside the grace window is fine.
        assert!(validate_times("2026-08-04T11:56:00", "2026-08-04T13:00:00", Some(now)).is_ok());
        assert!(validate_times("2026-08-04T12:30:00", "2026-08-04T13:00:00", Some(now)).is_ok());
    }

    #[test]
    fn accepts_minute_precision_input() {
        let (start, end) = validate_times("2026-08-04T09:30", "2026-08-04T10:00", None).unwrap();
        assert_eq!(start, dt("2026-08-04T09:30:00"));
        assert_eq!(end, dt("2026-08-04T10:00:00"));
    }
}
