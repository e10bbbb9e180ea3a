use chrono::{NaiveDate, NaiveDateTime};

use crate::db::{DATETIME_FMT, DbPool, now_string};
use crate::errors::AppError;

use super::recurrence::occurrence_dates;
use super::types::*;

pub async fn create(
    pool: &DbPool,
    new: &NewAppointment,
    now: NaiveDateTime,
) -> Result<i64, AppError> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let kind = new.kind.clone().unwrap_or_else(|| "meeting".to_string());
    if !KINDS.contains(&kind.as_str()) {
        return Err(AppError::Validation(format!("Unknown appointment kind '{kind}'")));
    }
    let recurrence = new.recurrence.clone().unwrap_or_else(|| "none".to_string());
    if !RECURRENCES.contains(&recurrence.as_str()) {
        return Err(AppError::Validation(format!(
            "Unknown recurrence rule '{recurrence}'"
        )));
    }
    let (start, end) = validate_times(&new.starts_at, &new.ends_at, Some(now))?;
    if let Some(until) = new.recurrence_until.as_deref().filter(|s| !s.is_empty()) {
        if parse_date(until)? < start.date() {
            return Err(AppError::Validation(
                "Recurrence end date lies before the first occurrence".to_string(),
            ));
        }
    }

    let stamp = now_string();
    let result = sqlx::query(
        "INSERT INTO appointments (title, kind, starts_at, ends_at, location, description, \
                                   meeting_link, recurrence, recurrence_until, user_id, order_id, \
                                   customer_id, case_id, repair_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(&kind)
    .bind(start.format(DATETIME_FMT).to_string())
    .bind(end.format(DATETIME_FMT).to_string())
    .bind(&new.location)
    .bind(&new.description)
    .bind(&new.meeting_link)
    .bind(&recurrence)
    .bind(new.recurrence_until.as_deref().filter(|s| !s.is_empty()))
    .bind(new.user_id)
    .bind(new.order_id)
    .bind(new.customer_id)
    .bind(new.case_id)
    .bind(new.repair_id)
    .bind(&stamp)
    .bind(&stamp)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn find_by_id(pool: &DbPool, id: i64) -> Result<Option<Appointment>, AppError> {
    let appointment = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(appointment)
}

/// Apply a patch to one stored row. The merged time pair is re-validated;
/// the past-start check only fires when the patch actually moves the start.
async fn apply_patch(
    pool: &DbPool,
    existing: &Appointment,
    patch: &AppointmentPatch,
    now: NaiveDateTime,
) -> Result<(), AppError> {
    let title = patch.title.clone().unwrap_or_else(|| existing.title.clone());
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let kind = patch.kind.clone().unwrap_or_else(|| existing.kind.clone());
    if !KINDS.contains(&kind.as_str()) {
        return Err(AppError::Validation(format!("Unknown appointment kind '{kind}'")));
    }
    let recurrence = patch
        .recurrence
        .clone()
        .unwrap_or_else(|| existing.recurrence.clone());
    if !RECURRENCES.contains(&recurrence.as_str()) {
        return Err(AppError::Validation(format!(
            "Unknown recurrence rule '{recurrence}'"
        )));
    }

    let starts_at = patch.starts_at.clone().unwrap_or_else(|| existing.starts_at.clone());
    let ends_at = patch.ends_at.clone().unwrap_or_else(|| existing.ends_at.clone());
    let past_check = if patch.starts_at.is_some() { Some(now) } else { None };
    let (start, end) = validate_times(&starts_at, &ends_at, past_check)?;

    let text = |p: &Option<String>, e: &str| p.clone().unwrap_or_else(|| e.to_string());
    let clearable = |p: Option<&str>, e: &Option<String>| match p {
        Some("") => None,
        Some(v) => Some(v.to_string()),
        None => e.clone(),
    };
    let link = |p: Option<i64>, e: Option<i64>| match p {
        Some(0) => None,
        Some(v) => Some(v),
        None => e,
    };

    sqlx::query(
        "UPDATE appointments SET title = ?, kind = ?, starts_at = ?, ends_at = ?, location = ?, \
                                 description = ?, meeting_link = ?, recurrence = ?, \
                                 recurrence_until = ?, user_id = ?, order_id = ?, customer_id = ?, \
                                 case_id = ?, repair_id = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(title.trim())
    .bind(&kind)
    .bind(start.format(DATETIME_FMT).to_string())
    .bind(end.format(DATETIME_FMT).to_string())
    .bind(text(&patch.location, &existing.location))
    .bind(text(&patch.description, &existing.description))
    .bind(text(&patch.meeting_link, &existing.meeting_link))
    .bind(&recurrence)
    .bind(clearable(patch.recurrence_until.as_deref(), &existing.recurrence_until))
    .bind(link(patch.user_id, existing.user_id))
    .bind(link(patch.order_id, existing.order_id))
    .bind(link(patch.customer_id, existing.customer_id))
    .bind(link(patch.case_id, existing.case_id))
    .bind(link(patch.repair_id, existing.repair_id))
    .bind(now_string())
    .bind(existing.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Edit an appointment. For a recurring master with `scope=single`,
/// `original_start` names the occurrence being edited; the slot is excluded
/// from expansion and an override row is materialized carrying the edit.
/// Returns the id of the row that now holds the data (the override's id for
/// a materialized single edit).
pub async fn update(
    pool: &DbPool,
    id: i64,
    scope: Scope,
    original_start: Option<&str>,
    patch: &AppointmentPatch,
    now: NaiveDateTime,
) -> Result<i64, AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let is_master = existing.recurrence != "none" && existing.series_id.is_none();
    if scope == Scope::Single && is_master {
        let original = original_start.ok_or_else(|| {
            AppError::Validation(
                "original_start is required to edit a single occurrence of a series".to_string(),
            )
        })?;
        let original = parse_datetime(original)?;
        return materialize_override(pool, &existing, original, patch, now).await;
    }

    // Whole series, a plain appointment, or an already-materialized override.
    apply_patch(pool, &existing, patch, now).await?;
    Ok(id)
}

/// Exclude the original slot and write a standalone row carrying the edited
/// occurrence. The override keeps `series_id`/`original_start` so later
/// series-wide deletes cascade to it.
async fn materialize_override(
    pool: &DbPool,
    master: &Appointment,
    original_start: NaiveDateTime,
    patch: &AppointmentPatch,
    now: NaiveDateTime,
) -> Result<i64, AppError> {
    // The occurrence keeps the master's duration unless the patch moves it.
    let master_start = parse_datetime(&master.starts_at)?;
    let master_end = parse_datetime(&master.ends_at)?;
    let occurrence_end = original_start + (master_end - master_start);

    let starts_at = patch
        .starts_at
        .clone()
        .unwrap_or_else(|| original_start.format(DATETIME_FMT).to_string());
    let ends_at = patch
        .ends_at
        .clone()
        .unwrap_or_else(|| occurrence_end.format(DATETIME_FMT).to_string());
    let past_check = if patch.starts_at.is_some() { Some(now) } else { None };
    let (start, end) = validate_times(&starts_at, &ends_at, past_check)?;

    let title = patch.title.clone().unwrap_or_else(|| master.title.clone());
    if title.trim().is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let kind = patch.kind.clone().unwrap_or_else(|| master.kind.clone());
    if !KINDS.contains(&kind.as_str()) {
        return Err(AppError::Validation(format!("Unknown appointment kind '{kind}'")));
    }

    let text = |p: &Option<String>, e: &str| p.clone().unwrap_or_else(|| e.to_string());
    let link = |p: Option<i64>, e: Option<i64>| match p {
        Some(0) => None,
        Some(v) => Some(v),
        None => e,
    };

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT OR IGNORE INTO appointment_exclusions (series_id, excluded_start) VALUES (?, ?)",
    )
    .bind(master.id)
    .bind(original_start.format(DATETIME_FMT).to_string())
    .execute(&mut *tx)
    .await?;

    let stamp = now_string();
    let result = sqlx::query(
        "INSERT INTO appointments (series_id, original_start, title, kind, starts_at, ends_at, \
                                   location, description, meeting_link, recurrence, user_id, \
                                   order_id, customer_id, case_id, repair_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'none', ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(master.id)
    .bind(original_start.format(DATETIME_FMT).to_string())
    .bind(title.trim())
    .bind(&kind)
    .bind(start.format(DATETIME_FMT).to_string())
    .bind(end.format(DATETIME_FMT).to_string())
    .bind(text(&patch.location, &master.location))
    .bind(text(&patch.description, &master.description))
    .bind(text(&patch.meeting_link, &master.meeting_link))
    .bind(link(patch.user_id, master.user_id))
    .bind(link(patch.order_id, master.order_id))
    .bind(link(patch.customer_id, master.customer_id))
    .bind(link(patch.case_id, master.case_id))
    .bind(link(patch.repair_id, master.repair_id))
    .bind(&stamp)
    .bind(&stamp)
    .execute(&mut *tx)
    .await?;
    let override_id = result.last_insert_rowid();
    tx.commit().await?;
    Ok(override_id)
}

/// Delete an appointment. `scope=single` on a recurring master records an
/// exclusion instead of touching the row; deleting a master cascades to its
/// overrides and exclusions.
pub async fn delete(
    pool: &DbPool,
    id: i64,
    scope: Scope,
    original_start: Option<&str>,
) -> Result<(), AppError> {
    let existing = find_by_id(pool, id).await?.ok_or(AppError::NotFound)?;

    let is_master = existing.recurrence != "none" && existing.series_id.is_none();
    if scope == Scope::Single && is_master {
        let original = original_start.ok_or_else(|| {
            AppError::Validation(
                "original_start is required to delete a single occurrence of a series".to_string(),
            )
        })?;
        let original = parse_datetime(original)?;
        sqlx::query(
            "INSERT OR IGNORE INTO appointment_exclusions (series_id, excluded_start) \
             VALUES (?, ?)",
        )
        .bind(id)
        .bind(original.format(DATETIME_FMT).to_string())
        .execute(pool)
        .await?;
        return Ok(());
    }

    sqlx::query("DELETE FROM appointments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// All concrete calendar entries inside `[window_start, window_end)`,
/// optionally restricted to one owning user: plain rows, materialized
/// overrides, and recurring series expanded slot by slot minus their
/// exclusions. Sorted by start.
pub async fn find_in_window(
    pool: &DbPool,
    window_start: NaiveDate,
    window_end: NaiveDate,
    user_id: Option<i64>,
) -> Result<Vec<Occurrence>, AppError> {
    let win_start = window_start.and_hms_opt(0, 0, 0).unwrap();
    let win_end = window_end.and_hms_opt(0, 0, 0).unwrap();
    let win_start_s = win_start.format(DATETIME_FMT).to_string();
    let win_end_s = win_end.format(DATETIME_FMT).to_string();

    // Plain rows and overrides that overlap the window.
    let mut sql = String::from(
        "SELECT * FROM appointments \
         WHERE recurrence = 'none' AND starts_at < ? AND ends_at > ?",
    );
    if user_id.is_some() {
        sql.push_str(" AND user_id = ?");
    }
    let mut query = sqlx::query_as::<_, Appointment>(&sql)
        .bind(&win_end_s)
        .bind(&win_start_s);
    if let Some(u) = user_id {
        query = query.bind(u);
    }
    let stored = query.fetch_all(pool).await?;

    let mut occurrences: Vec<Occurrence> = stored
        .into_iter()
        .map(|a| {
            let starts_at = a.starts_at.clone();
            let ends_at = a.ends_at.clone();
            a.occurrence(starts_at, ends_at, false)
        })
        .collect();

    // Recurring masters whose series could still reach the window.
    let mut sql = String::from(
        "SELECT * FROM appointments \
         WHERE recurrence != 'none' AND series_id IS NULL AND starts_at < ? \
           AND (recurrence_until IS NULL OR recurrence_until >= ?)",
    );
    if user_id.is_some() {
        sql.push_str(" AND user_id = ?");
    }
    let mut query = sqlx::query_as::<_, Appointment>(&sql)
        .bind(&win_end_s)
        .bind(window_start.format(crate::db::DATE_FMT).to_string());
    if let Some(u) = user_id {
        query = query.bind(u);
    }
    let masters = query.fetch_all(pool).await?;

    for master in &masters {
        let start = parse_datetime(&master.starts_at)?;
        let end = parse_datetime(&master.ends_at)?;
        let duration = end - start;
        let until = match master.recurrence_until.as_deref() {
            Some(u) => Some(parse_date(u)?),
            None => None,
        };

        let excluded: Vec<String> = sqlx::query_scalar(
            "SELECT excluded_start FROM appointment_exclusions WHERE series_id = ?",
        )
        .bind(master.id)
        .fetch_all(pool)
        .await?;

        // Expansion starts a week early so multi-day occurrences that begin
        // before the window but spill into it are still produced; the
        // overlap filter below drops the rest.
        let expand_start = window_start - chrono::Duration::days(7);
        for date in occurrence_dates(
            &master.recurrence,
            start.date(),
            until,
            expand_start,
            window_end,
        ) {
            let occ_start = date.and_time(start.time());
            let occ_end = occ_start + duration;
            if occ_start >= win_end || occ_end <= win_start {
                continue;
            }
            let occ_start_s = occ_start.format(DATETIME_FMT).to_string();
            if excluded.iter().any(|e| e == &occ_start_s) {
                continue;
            }
            occurrences.push(master.occurrence(
                occ_start_s,
                occ_end.format(DATETIME_FMT).to_string(),
                true,
            ));
        }
    }

    occurrences.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then(a.id.cmp(&b.id)));
    Ok(occurrences)
}
