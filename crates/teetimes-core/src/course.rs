//! Course catalog record and stable course identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One golf course as stored in the catalog.
///
/// The engine reads records by key and writes back booking-URL updates;
/// it never creates or deletes records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Stable identity, see [`make_course_key`].
    pub key: String,
    pub name: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub zip: Option<String>,
    /// Course homepage, used as the discovery seed when no booking URL
    /// is known or the known one is stale.
    #[serde(default)]
    pub website_url: Option<String>,
    /// Last verified booking URL. Only ever set from a verified candidate.
    #[serde(default)]
    pub booking_url: Option<String>,
    #[serde(default)]
    pub last_verified: Option<DateTime<Utc>>,
    /// Count of resolution attempts in a row that ended without a verified
    /// booking URL. Reset to zero on any successful verification.
    #[serde(default)]
    pub consecutive_failures: u32,
}

impl CourseRecord {
    /// Whether the stored booking URL is older than `staleness_hours`
    /// (or has never been verified at all).
    #[must_use]
    pub fn is_stale(&self, staleness_hours: i64, now: DateTime<Utc>) -> bool {
        match self.last_verified {
            Some(at) => now.signed_duration_since(at) > chrono::Duration::hours(staleness_hours),
            None => true,
        }
    }
}

/// Compute the stable catalog key for a course.
///
/// SHA-256 over `name || city || state`, normalised to lower-case name/city,
/// upper-case state. Hex-encoded.
#[must_use]
pub fn make_course_key(name: &str, city: &str, state: &str) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}\x00{}",
        name.trim().to_lowercase(),
        city.trim().to_lowercase(),
        state.trim().to_uppercase(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
