//! ForeUp tee-sheet adapter.
//!
//! ForeUp booking pages (and their `times` data endpoint) carry slot
//! objects shaped like:
//!
//! ```json
//! {"time": "2025-06-01 07:30", "available_spots": 4, "green_fee": 45.0, "holes": 18}
//! ```
//!
//! The body may be the raw JSON response or a page embedding that array in
//! a script tag; both are handled by scanning for a balanced array whose
//! objects carry a `time` field.

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;

use super::{default_end, extract_balanced_array, TimeSlot};
use crate::platform::BookingPlatform;

pub(super) fn parse_slots(body: &str, course_key: &str) -> Vec<TimeSlot> {
    let candidate_re = Regex::new(r#"(?is)\[\s*\{[^\[\]]*?"time""#).expect("valid regex");

    for m in candidate_re.find_iter(body) {
        let Some(array_str) = extract_balanced_array(&body[m.start()..]) else {
            continue;
        };
        let Ok(serde_json::Value::Array(entries)) = serde_json::from_str(array_str) else {
            continue;
        };

        let slots: Vec<TimeSlot> = entries
            .iter()
            .filter_map(|entry| slot_from_entry(entry, course_key))
            .collect();
        if !slots.is_empty() {
            return slots;
        }
    }

    vec![]
}

fn slot_from_entry(entry: &serde_json::Value, course_key: &str) -> Option<TimeSlot> {
    let time = entry.get("time")?.as_str()?;
    let start_dt = parse_foreup_time(time)?;

    let open_spots = entry
        .get("available_spots")?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())?;

    let price = entry.get("green_fee").and_then(|v| {
        v.as_f64()
            .or_else(|| v.as_str().and_then(|s| s.parse::<f64>().ok()))
    });

    let start: NaiveTime = start_dt.time();
    let end = entry
        .get("end_time")
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M").ok())
        .or_else(|| default_end(start))?;

    TimeSlot::checked(
        course_key,
        start_dt.date(),
        start,
        end,
        open_spots,
        price,
        BookingPlatform::ForeUp,
    )
}

fn parse_foreup_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sheet_json() -> String {
        json!([
            {"time": "2025-06-01 07:30", "available_spots": 4, "green_fee": 45.0, "holes": 18},
            {"time": "2025-06-01 07:45", "available_spots": 2, "green_fee": "45.00", "holes": 18},
            {"time": "2025-06-01 08:00", "available_spots": 0, "holes": 18}
        ])
        .to_string()
    }

    #[test]
    fn parses_raw_endpoint_response() {
        let slots = parse_slots(&sheet_json(), "course-1");
        assert_eq!(slots.len(), 3);

        let first = &slots[0];
        assert_eq!(first.course_key, "course-1");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(first.start, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(first.end, NaiveTime::from_hms_opt(7, 45, 0).unwrap());
        assert_eq!(first.open_spots, 4);
        assert_eq!(first.price, Some(45.0));

        // String-typed fee parses too; missing fee stays None.
        assert_eq!(slots[1].price, Some(45.0));
        assert_eq!(slots[2].price, None);
        assert_eq!(slots[2].open_spots, 0);
    }

    #[test]
    fn parses_array_embedded_in_script_tag() {
        let html = format!(
            "<html><body><script>var SCHEDULE = {};</script></body></html>",
            sheet_json()
        );
        let slots = parse_slots(&html, "course-1");
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn entries_with_malformed_times_are_skipped() {
        let body = json!([
            {"time": "not a time", "available_spots": 4},
            {"time": "2025-06-01 09:00", "available_spots": 3}
        ])
        .to_string();
        let slots = parse_slots(&body, "course-1");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn page_without_tee_sheet_yields_nothing() {
        let slots = parse_slots("<html><body>No times here.</body></html>", "course-1");
        assert!(slots.is_empty());
    }
}
