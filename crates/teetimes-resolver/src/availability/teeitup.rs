//! TeeItUp (EZLinks) adapter.
//!
//! TeeItUp course portals expose a `teetimes` array of objects like:
//!
//! ```json
//! {
//!   "teetime": "2025-06-01T07:30:00",
//!   "maxPlayers": 4,
//!   "bookedPlayers": 1,
//!   "rates": [{"name": "18 Holes", "greenFeeWalking": 4500}]
//! }
//! ```
//!
//! Rates are in cents. Open spots are `maxPlayers - bookedPlayers`.

use chrono::NaiveDateTime;
use regex::Regex;

use super::{default_end, extract_balanced_array, TimeSlot};
use crate::platform::BookingPlatform;

pub(super) fn parse_slots(body: &str, course_key: &str) -> Vec<TimeSlot> {
    let marker_re = Regex::new(r#"(?is)"teetimes"\s*:\s*\["#).expect("valid regex");

    for m in marker_re.find_iter(body) {
        // The marker ends at the opening `[` of the array.
        let array_start = m.end() - 1;
        let Some(array_str) = extract_balanced_array(&body[array_start..]) else {
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
    let teetime = entry.get("teetime")?.as_str()?;
    let start_dt = parse_teeitup_time(teetime)?;

    let max_players = entry.get("maxPlayers")?.as_u64()?;
    let booked = entry
        .get("bookedPlayers")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    let open_spots = u32::try_from(max_players.saturating_sub(booked)).ok()?;

    let price = entry
        .get("rates")
        .and_then(|v| v.as_array())
        .and_then(|rates| rates.first())
        .and_then(rate_in_dollars);

    let start = start_dt.time();
    let end = default_end(start)?;

    TimeSlot::checked(
        course_key,
        start_dt.date(),
        start,
        end,
        open_spots,
        price,
        BookingPlatform::TeeItUp,
    )
}

/// Rates carry cent-denominated fees under a few field names depending on
/// cart configuration.
fn rate_in_dollars(rate: &serde_json::Value) -> Option<f64> {
    let cents = rate
        .get("greenFeeWalking")
        .or_else(|| rate.get("greenFeeCart"))
        .or_else(|| rate.get("greenFee"))?
        .as_f64()?;
    Some(cents / 100.0)
}

fn parse_teeitup_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    fn portal_json() -> String {
        json!({
            "courseName": "Pebble Creek",
            "teetimes": [
                {
                    "teetime": "2025-06-01T07:30:00",
                    "maxPlayers": 4,
                    "bookedPlayers": 1,
                    "rates": [{"name": "18 Holes", "greenFeeWalking": 4500}]
                },
                {
                    "teetime": "2025-06-01T07:40:00",
                    "maxPlayers": 4,
                    "rates": [{"name": "18 Holes Cart", "greenFeeCart": 6000}]
                }
            ]
        })
        .to_string()
    }

    #[test]
    fn parses_portal_payload() {
        let slots = parse_slots(&portal_json(), "course-2");
        assert_eq!(slots.len(), 2);

        let first = &slots[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(first.start, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(first.open_spots, 3, "maxPlayers minus bookedPlayers");
        assert_eq!(first.price, Some(45.0), "cents converted to dollars");

        assert_eq!(slots[1].open_spots, 4, "missing bookedPlayers means none");
        assert_eq!(slots[1].price, Some(60.0));
    }

    #[test]
    fn fully_booked_slot_reports_zero_spots() {
        let body = json!({
            "teetimes": [
                {"teetime": "2025-06-01T08:00:00", "maxPlayers": 4, "bookedPlayers": 4}
            ]
        })
        .to_string();
        let slots = parse_slots(&body, "course-2");
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].open_spots, 0);
        assert_eq!(slots[0].price, None);
    }

    #[test]
    fn body_without_teetimes_yields_nothing() {
        let body = json!({"courseName": "Pebble Creek", "holes": 18}).to_string();
        assert!(parse_slots(&body, "course-2").is_empty());
    }
}
