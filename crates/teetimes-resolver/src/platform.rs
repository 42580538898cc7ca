//! Booking platform fingerprints.
//!
//! Most public courses book through a handful of hosted tee-sheet vendors.
//! Recognizing a vendor URL or embed is the strongest signal a page is (or
//! links to) a live booking interface, and it selects the availability
//! adapter later on.

use serde::Serialize;

/// Hosted tee-sheet platforms the engine can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingPlatform {
    ForeUp,
    TeeItUp,
    Chronogolf,
    GolfNow,
    TeeSnap,
    ClubProphet,
}

impl BookingPlatform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BookingPlatform::ForeUp => "foreup",
            BookingPlatform::TeeItUp => "teeitup",
            BookingPlatform::Chronogolf => "chronogolf",
            BookingPlatform::GolfNow => "golfnow",
            BookingPlatform::TeeSnap => "teesnap",
            BookingPlatform::ClubProphet => "club_prophet",
        }
    }

    /// Detect a platform from a URL (href, iframe src, or final fetch URL).
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let lowered = url.to_ascii_lowercase();
        if lowered.contains("foreupsoftware.com") || lowered.contains("foreup.com") {
            Some(BookingPlatform::ForeUp)
        } else if lowered.contains("teeitup.com") || lowered.contains("teeitup.golf") {
            Some(BookingPlatform::TeeItUp)
        } else if lowered.contains("chronogolf.com") || lowered.contains("lightspeedgolf") {
            Some(BookingPlatform::Chronogolf)
        } else if lowered.contains("golfnow.com") {
            Some(BookingPlatform::GolfNow)
        } else if lowered.contains("teesnap.net") {
            Some(BookingPlatform::TeeSnap)
        } else if lowered.contains("cps.golf") || lowered.contains("clubprophet") {
            Some(BookingPlatform::ClubProphet)
        } else {
            None
        }
    }

    /// Detect a platform from page content (script/iframe embeds, widget
    /// globals). Checked on the *target* page during verification and by
    /// the availability normalizer to pick an adapter.
    #[must_use]
    pub fn detect(html: &str) -> Option<Self> {
        let lowered = html.to_ascii_lowercase();
        if lowered.contains("foreupsoftware.com") || lowered.contains("foreup_booking") {
            Some(BookingPlatform::ForeUp)
        } else if lowered.contains("teeitup") || lowered.contains("data-golf-facility") {
            Some(BookingPlatform::TeeItUp)
        } else if lowered.contains("chronogolf") || lowered.contains("lightspeedgolf") {
            Some(BookingPlatform::Chronogolf)
        } else if lowered.contains("golfnow.com/tee-times") || lowered.contains("gn-widget") {
            Some(BookingPlatform::GolfNow)
        } else if lowered.contains("teesnap") {
            Some(BookingPlatform::TeeSnap)
        } else if lowered.contains("cps.golf") || lowered.contains("clubprophet") {
            Some(BookingPlatform::ClubProphet)
        } else {
            None
        }
    }
}

impl std::fmt::Display for BookingPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
