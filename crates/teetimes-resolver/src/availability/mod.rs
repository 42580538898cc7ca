//! Availability normalization.
//!
//! Converts a verified booking page (or the tee-sheet JSON it embeds) into
//! structured, comparable time slots. Platform adapters are selected by the
//! same fingerprints used during verification; an unrecognized platform is
//! a diagnostic plus an empty slot list, never a hard failure; partial
//! coverage across vendors is expected.

mod chronogolf;
mod foreup;
mod teeitup;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::NormalizeError;
use crate::platform::BookingPlatform;
use crate::resolve::Resolver;

/// Assumed slot length when the tee sheet publishes start times only.
const DEFAULT_TEE_INTERVAL_MIN: i64 = 15;

/// One bookable tee time. Produced fresh on every normalization call and
/// never cached by the engine.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSlot {
    pub course_key: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub open_spots: u32,
    pub price: Option<f64>,
    pub platform: BookingPlatform,
}

impl TimeSlot {
    /// Build a slot, enforcing `start < end`. Slots that would wrap past
    /// midnight or otherwise invert are rejected.
    fn checked(
        course_key: &str,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        open_spots: u32,
        price: Option<f64>,
        platform: BookingPlatform,
    ) -> Option<Self> {
        if start >= end {
            tracing::debug!(%date, %start, %end, "skipping slot with non-positive duration");
            return None;
        }
        Some(Self {
            course_key: course_key.to_string(),
            date,
            start,
            end,
            open_spots,
            price,
            platform,
        })
    }
}

/// End time for a start-only slot: one default tee interval later, unless
/// that would cross midnight.
fn default_end(start: NaiveTime) -> Option<NaiveTime> {
    let (end, wrapped) =
        start.overflowing_add_signed(chrono::Duration::minutes(DEFAULT_TEE_INTERVAL_MIN));
    if wrapped == 0 {
        Some(end)
    } else {
        None
    }
}

/// Fetch a verified booking page and normalize its schedule into time
/// slots. Traffic goes through the resolver so it shares the per-host
/// throttle with resolution runs.
///
/// # Errors
///
/// Returns [`NormalizeError::Fetch`] when the booking page cannot be
/// retrieved. An unrecognized platform is logged and yields `Ok(vec![])`.
pub async fn fetch_availability(
    resolver: &Resolver,
    course_key: &str,
    booking_url: &str,
) -> Result<Vec<TimeSlot>, NormalizeError> {
    let page = resolver.throttled_fetch(booking_url).await?;

    let platform = BookingPlatform::from_url(&page.final_url)
        .or_else(|| BookingPlatform::detect(&page.body));

    let slots = match platform {
        Some(BookingPlatform::ForeUp) => foreup::parse_slots(&page.body, course_key),
        Some(BookingPlatform::TeeItUp) => teeitup::parse_slots(&page.body, course_key),
        Some(BookingPlatform::Chronogolf) => chronogolf::parse_slots(&page.body, course_key),
        Some(other) => {
            tracing::warn!(
                course = %course_key,
                url = %page.final_url,
                platform = other.as_str(),
                "no availability adapter for platform"
            );
            return Ok(vec![]);
        }
        None => {
            let diag = NormalizeError::UnrecognizedPlatform {
                url: page.final_url.clone(),
            };
            tracing::warn!(course = %course_key, error = %diag, "cannot normalize availability");
            return Ok(vec![]);
        }
    };

    tracing::debug!(
        course = %course_key,
        url = %page.final_url,
        count = slots.len(),
        "normalized availability"
    );
    Ok(slots)
}

/// Try to extract a balanced JSON array from the start of `s`.
///
/// Scans character-by-character tracking bracket depth, respecting string
/// literals and escape sequences. Returns the shortest prefix forming a
/// complete array, or `None` if the array is unterminated. Only `]` at
/// depth 0 triggers a return, so malformed input like `[42}` is rejected.
pub(crate) fn extract_balanced_array(s: &str) -> Option<&str> {
    if !s.starts_with('[') {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            '}' => depth -= 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_array_accepts_nested_objects() {
        let s = r#"[{"a": 1}, {"b": 2}] trailing"#;
        assert_eq!(extract_balanced_array(s), Some(r#"[{"a": 1}, {"b": 2}]"#));
    }

    #[test]
    fn balanced_array_rejects_mismatched_closer() {
        assert_eq!(extract_balanced_array("[42}"), None);
    }

    #[test]
    fn balanced_array_ignores_brackets_inside_strings() {
        let s = r#"[{"note": "open ] daily"}]"#;
        assert_eq!(extract_balanced_array(s), Some(s));
    }

    #[test]
    fn slot_with_inverted_times_is_rejected() {
        let slot = TimeSlot::checked(
            "k",
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            4,
            None,
            BookingPlatform::ForeUp,
        );
        assert!(slot.is_none());
    }

    #[test]
    fn default_end_near_midnight_is_rejected() {
        let start = NaiveTime::from_hms_opt(23, 55, 0).unwrap();
        assert!(default_end(start).is_none());
    }

    #[test]
    fn default_end_adds_one_tee_interval() {
        let start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
        assert_eq!(
            default_end(start),
            Some(NaiveTime::from_hms_opt(7, 45, 0).unwrap())
        );
    }
}
