use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::db::DATETIME_FMT;

/// Pixel geometry for the week/day time grid.
///
/// The console compresses the hours outside the working band (07:00–20:00)
/// into two fixed-height strips so a day column never grows past
/// `2 × collapsed_height + 13 × hour_height`, whatever the data looks like.
/// The defaults are the console's hard-coded values.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub hour_height: f64,
    pub collapsed_height: f64,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub min_block_height: f64,
    pub modal_z: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            hour_height: 60.0,
            collapsed_height: 40.0,
            work_start_hour: 7,
            work_end_hour: 20,
            min_block_height: 20.0,
            modal_z: 1000,
        }
    }
}

impl GridConfig {
    /// Total height of a day column in pixels.
    pub fn total_height(&self, show_all_hours: bool) -> f64 {
        if show_all_hours {
            24.0 * self.hour_height
        } else {
            let work_hours = (self.work_end_hour - self.work_start_hour) as f64;
            2.0 * self.collapsed_height + work_hours * self.hour_height
        }
    }

    /// Vertical offset for a time of day.
    ///
    /// Linear when all hours are shown. Otherwise the day is split into three
    /// bands; the off-hours bands render at `collapsed_height` with position
    /// interpolated by fraction-of-band-elapsed, the working band at full
    /// hour height. Continuous at both band boundaries.
    pub fn position(&self, hour: u32, minute: u32, show_all_hours: bool) -> f64 {
        let t = hour as f64 + minute as f64 / 60.0;
        if show_all_hours {
            return t * self.hour_height;
        }

        let work_start = self.work_start_hour as f64;
        let work_end = self.work_end_hour as f64;
        if t < work_start {
            t / work_start * self.collapsed_height
        } else if t < work_end {
            self.collapsed_height + (t - work_start) * self.hour_height
        } else {
            self.collapsed_height
                + (work_end - work_start) * self.hour_height
                + (t - work_end) / (24.0 - work_end) * self.collapsed_height
        }
    }

    /// Stacking order for a block: shorter blocks stack higher so they stay
    /// clickable under longer neighbours, and everything stays under the
    /// modal layer.
    pub fn z_index(&self, height: f64) -> i32 {
        (self.modal_z - 1 - height.round() as i32).max(1)
    }
}

/// An appointment occurrence reduced to what the grid needs.
#[derive(Debug, Clone)]
pub struct GridEvent {
    pub id: i64,
    pub series_id: Option<i64>,
    pub title: String,
    pub kind: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A positioned block in a day column.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutBlock {
    pub appointment_id: i64,
    pub series_id: Option<i64>,
    pub title: String,
    pub kind: String,
    pub clipped_start: String,
    pub clipped_end: String,
    pub continues_before: bool,
    pub continues_after: bool,
    pub top: f64,
    pub height: f64,
    pub z_index: i32,
}

/// Clip `[start, end)` to one day column. Returns `None` when the event does
/// not touch the day. Segments of a multi-day event clipped over consecutive
/// days reconstruct the original range with no gaps or overlaps.
pub fn clip_to_day(
    start: NaiveDateTime,
    end: NaiveDateTime,
    day: NaiveDate,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let day_start = day.and_hms_opt(0, 0, 0).unwrap();
    let day_end = (day + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap();
    let s = start.max(day_start);
    let e = end.min(day_end);
    if s < e { Some((s, e)) } else { None }
}

/// Lay out every event touching `day` as a positioned block, sorted by top
/// offset.
pub fn layout_day(
    cfg: &GridConfig,
    day: NaiveDate,
    show_all_hours: bool,
    events: &[GridEvent],
) -> Vec<LayoutBlock> {
    let mut blocks: Vec<LayoutBlock> = Vec::new();

    for ev in events {
        let Some((s, e)) = clip_to_day(ev.start, ev.end, day) else {
            continue;
        };
        let top = cfg.position(s.hour(), s.minute(), show_all_hours);
        // An end on the next midnight sits at the very bottom of the column.
        let bottom = if e.date() > day {
            cfg.total_height(show_all_hours)
        } else {
            cfg.position(e.hour(), e.minute(), show_all_hours)
        };
        let height = (bottom - top).max(cfg.min_block_height);

        blocks.push(LayoutBlock {
            appointment_id: ev.id,
            series_id: ev.series_id,
            title: ev.title.clone(),
            kind: ev.kind.clone(),
            clipped_start: s.format(DATETIME_FMT).to_string(),
            clipped_end: e.format(DATETIME_FMT).to_string(),
            continues_before: ev.start < s,
            continues_after: ev.end > e,
            top,
            height,
            z_index: cfg.z_index(height),
        });
    }

    blocks.sort_by(|a, b| a.top.total_cmp(&b.top));
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn position_is_monotonic_in_both_modes() {
        let cfg = GridConfig::default();
        for &show_all in &[false, true] {
            let mut prev = -1.0f64;
            for hour in 0..24 {
                for minute in 0..60 {
                    let y = cfg.position(hour, minute, show_all);
                    assert!(
                        y >= prev,
                        "position({hour}, {minute}, {show_all}) = {y} < {prev}"
                    );
                    prev = y;
                }
            }
        }
    }

    #[test]
    fn position_is_continuous_at_band_boundaries() {
        let cfg = GridConfig::default();
        // Exactly at the boundary the work-band formula takes over; the
        // collapsed band must have interpolated up to the same pixel.
        assert_eq!(cfg.position(7, 0, false), cfg.collapsed_height);
        assert_eq!(
            cfg.position(20, 0, false),
            cfg.collapsed_height + 13.0 * cfg.hour_height
        );
        // One minute on either side stays within a minute's worth of pixels.
        let before = cfg.position(6, 59, false);
        assert!((cfg.position(7, 0, false) - before) < cfg.collapsed_height / (7.0 * 60.0) * 1.01);
        let after = cfg.position(20, 1, false);
        assert!((after - cfg.position(20, 0, false)) < cfg.collapsed_height / (4.0 * 60.0) * 1.01);
    }

    #[test]
    fn collapsed_total_height_is_constant() {
        let cfg = GridConfig::default();
        assert_eq!(
            cfg.total_height(false),
            2.0 * cfg.collapsed_height + 13.0 * cfg.hour_height
        );
        // The last representable minute still fits inside the column.
        assert!(cfg.position(23, 59, false) < cfg.total_height(false));
    }

    #[test]
    fn show_all_hours_is_linear() {
        let cfg = GridConfig::default();
        assert_eq!(cfg.position(0, 0, true), 0.0);
        assert_eq!(cfg.position(12, 30, true), 12.5 * cfg.hour_height);
        assert_eq!(cfg.total_height(true), 24.0 * cfg.hour_height);
    }

    #[test]
    fn multi_day_clipping_reconstructs_the_original_range() {
        let start = dt(2026, 8, 3, 22, 15);
        let end = dt(2026, 8, 6, 9, 30);

        let mut segments = Vec::new();
        let mut day = start.date();
        while day <= end.date() {
            if let Some(seg) = clip_to_day(start, end, day) {
                segments.push(seg);
            }
            day += Duration::days(1);
        }

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].0, start);
        assert_eq!(segments.last().unwrap().1, end);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0, "gap or overlap between day segments");
        }
    }

    #[test]
    fn clipping_skips_days_outside_the_event() {
        let start = dt(2026, 8, 4, 10, 0);
        let end = dt(2026, 8, 4, 11, 0);
        assert!(clip_to_day(start, end, NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()).is_none());
        assert_eq!(
            clip_to_day(start, end, start.date()),
            Some((start, end)),
        );
    }

    #[test]
    fn short_events_get_minimum_height_and_higher_z() {
        let cfg = GridConfig::default();
        let day = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
        let events = vec![
            GridEvent {
                id: 1,
                series_id: None,
                title: "Sensor cleaning".into(),
                kind: "task".into(),
                start: dt(2026, 8, 4, 9, 0),
                end: dt(2026, 8, 4, 9, 5),
            },
            GridEvent {
                id: 2,
                series_id: None,
                title: "Intake".into(),
                kind: "meeting".into(),
                start: dt(2026, 8, 4, 9, 0),
                end: dt(2026, 8, 4, 12, 0),
            },
        ];

        let blocks = layout_day(&cfg, day, false, &events);
        assert_eq!(blocks.len(), 2);
        let short = blocks.iter().find(|b| b.appointment_id == 1).unwrap();
        let long = blocks.iter().find(|b| b.appointment_id == 2).unwrap();

        assert_eq!(short.height, cfg.min_block_height);
        assert!(short.z_index > long.z_index, "short block must stack on top");
        assert!(short.z_index < cfg.modal_z);
        assert!(long.z_index >= 1);
    }

    #[test]
    fn overnight_block_reaches_the_column_bottom() {
        let cfg = GridConfig::default();
        let day = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
        let events = vec![GridEvent {
            id: 7,
            series_id: None,
            title: "Blocked".into(),
            kind: "blocked".into(),
            start: dt(2026, 8, 4, 21, 0),
            end: dt(2026, 8, 5, 8, 0),
        }];

        let blocks = layout_day(&cfg, day, false, &events);
        assert_eq!(blocks.len(), 1);
        let b = &blocks[0];
        assert!(b.continues_after);
        assert!(!b.continues_before);
        assert_eq!(b.top + b.height, cfg.total_height(false));
    }
}
