use super::types::Occurrence;

/// Serialize a set of expanded occurrences as an iCalendar document.
///
/// Times are written as floating local times (the storage format has no
/// zone), text values are escaped per RFC 5545 and lines end in CRLF.
pub fn build_ics(occurrences: &[Occurrence], calendar_name: &str) -> String {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//lenswerk//agenda//NL".to_string(),
        format!("X-WR-CALNAME:{}", escape_text(calendar_name)),
    ];

    for occ in occurrences {
        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:lenswerk-{}-{}", occ.id, compact(&occ.starts_at)));
        lines.push(format!("DTSTART:{}", compact(&occ.starts_at)));
        lines.push(format!("DTEND:{}", compact(&occ.ends_at)));
        lines.push(format!("SUMMARY:{}", escape_text(&occ.title)));
        if !occ.location.is_empty() {
            lines.push(format!("LOCATION:{}", escape_text(&occ.location)));
        }
        if !occ.description.is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(&occ.description)));
        }
        if !occ.meeting_link.is_empty() {
            lines.push(format!("URL:{}", escape_text(&occ.meeting_link)));
        }
        lines.push(format!("CATEGORIES:{}", escape_text(&occ.kind)));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}

/// `2026-08-04T09:30:00` → `20260804T093000`.
fn compact(stored: &str) -> String {
    stored.chars().filter(|c| c.is_ascii_digit() || *c == 'T').collect()
}

/// Escape TEXT values: backslash, semicolon, comma, and newlines.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
