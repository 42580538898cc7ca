//! Chronogolf (Lightspeed Golf) adapter.
//!
//! Chronogolf club pages embed slot objects shaped like:
//!
//! ```json
//! {
//!   "date": "2025-06-01",
//!   "start_time": "07:30",
//!   "free_slots": 3,
//!   "out_of_capacity": false,
//!   "green_fees": [{"price": 45.0}]
//! }
//! ```

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use super::{default_end, extract_balanced_array, TimeSlot};
use crate::platform::BookingPlatform;

pub(super) fn parse_slots(body: &str, course_key: &str) -> Vec<TimeSlot> {
    // Slot objects carry nested arrays (green_fees) whose position relative
    // to start_time varies, so match every array-of-objects opener and keep
    // the first balanced array that actually holds slot entries.
    let candidate_re = Regex::new(r"\[\s*\{").expect("valid regex");

    for m in candidate_re.find_iter(body) {
        let Some(array_str) = extract_balanced_array(&body[m.start()..]) else {
            continue;
        };
        if !array_str.contains("\"start_time\"") {
            continue;
        }
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
    // Slots the club has closed out are not bookable.
    if entry
        .get("out_of_capacity")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
    {
        return None;
    }

    let date = entry
        .get("date")?
        .as_str()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;
    let start = entry
        .get("start_time")?
        .as_str()
        .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M").ok())?;

    let open_spots = entry
        .get("free_slots")?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())?;

    let price = entry
        .get("green_fees")
        .and_then(|v| v.as_array())
        .and_then(|fees| fees.first())
        .and_then(|fee| fee.get("price"))
        .and_then(serde_json::Value::as_f64);

    let end = default_end(start)?;

    TimeSlot::checked(
        course_key,
        date,
        start,
        end,
        open_spots,
        price,
        BookingPlatform::Chronogolf,
    )
}
