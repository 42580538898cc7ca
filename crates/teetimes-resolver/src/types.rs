//! Ephemeral artifacts of the fetch → classify → verify pipeline.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::error::FetchError;
use crate::platform::BookingPlatform;

/// The outcome of one HTTP page fetch. Lives only for the duration of a
/// single resolution step; never persisted.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The URL that was requested.
    pub url: String,
    /// The URL after following redirects; relative hrefs resolve against this.
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// How a candidate URL was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMethod {
    /// A known booking platform embed or outbound link.
    PlatformEmbed,
    /// An anchor whose text matched the booking vocabulary.
    AnchorVocabulary,
    /// The injected extraction capability proposed the URL.
    AiAssisted,
}

impl ClassificationMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationMethod::PlatformEmbed => "platform_embed",
            ClassificationMethod::AnchorVocabulary => "anchor_vocabulary",
            ClassificationMethod::AiAssisted => "ai_assisted",
        }
    }
}

/// An unverified URL suspected of being a booking interface.
#[derive(Debug, Clone)]
pub struct BookingCandidate {
    /// Absolute URL, already resolved against the page it was found on.
    pub url: String,
    /// In `(0, 1]`; candidates are consumed in descending order.
    pub confidence: f64,
    pub method: ClassificationMethod,
}

/// A candidate confirmed reachable and recognizable as a booking interface.
/// This is the only artifact that may be written back into the catalog.
#[derive(Debug, Clone)]
pub struct VerifiedBooking {
    pub url: String,
    pub platform: Option<BookingPlatform>,
    pub method: ClassificationMethod,
    pub verified_at: DateTime<Utc>,
}

/// Result of resolving one course.
#[derive(Debug)]
pub enum ResolutionOutcome {
    /// A new (or re-discovered) booking URL was verified.
    Verified(VerifiedBooking),
    /// The stored booking URL still verifies; nothing to rewrite.
    Unchanged,
    Failed(FailureReason),
}

/// Why a resolution attempt produced no verified booking URL.
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error("seed fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The record has neither a usable booking URL nor a website to crawl.
    #[error("course has no booking URL or website to start from")]
    MissingSeedUrl,

    /// Expected outcome, not a fault: the page had no recognizable booking
    /// signal and the capability (if any) proposed nothing.
    #[error("no booking candidate found on seed page")]
    NoCandidateFound,

    /// Candidates existed but none fetched as a live booking interface.
    #[error("no candidate verified as a booking interface")]
    VerificationFailed,
}
