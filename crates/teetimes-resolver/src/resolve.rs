//! Per-course resolution: fetch → classify → verify.

use std::sync::Arc;

use chrono::Utc;
use teetimes_core::{AppConfig, CourseRecord};

use crate::capability::ExtractCapability;
use crate::classify::{classify, is_booking_interface};
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::platform::BookingPlatform;
use crate::throttle::HostThrottle;
use crate::types::{FailureReason, FetchResult, ResolutionOutcome, VerifiedBooking};

/// Drives the fetch → classify → verify workflow for one course at a time.
///
/// Holds the fetcher and the shared per-host throttle; all network traffic
/// for a resolution run flows through one `Resolver`. Each course's
/// resolution is internally sequential; parallelism across courses is the
/// run driver's concern (see [`crate::run`]).
pub struct Resolver {
    fetcher: PageFetcher,
    throttle: HostThrottle,
    staleness_hours: i64,
    max_candidates: usize,
    capability: Option<Arc<dyn ExtractCapability>>,
}

impl Resolver {
    /// Build a resolver from the engine configuration, without AI
    /// assistance.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            throttle: HostThrottle::new(config.inter_request_delay_ms),
            staleness_hours: config.staleness_hours,
            max_candidates: config.max_candidates,
            capability: None,
        })
    }

    /// Inject an AI-assisted extraction capability consulted when the
    /// heuristics find nothing.
    #[must_use]
    pub fn with_capability(mut self, capability: Arc<dyn ExtractCapability>) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Resolve one course to a current booking URL.
    ///
    /// The discovery seed is the stored booking URL while fresh, else the
    /// course website, else the stale booking URL as a last resort. A seed
    /// that is the stored URL and still verifies short-circuits to
    /// [`ResolutionOutcome::Unchanged`] after exactly one fetch. Otherwise
    /// the seed page is classified and candidates are verified greedily in
    /// descending-confidence order; the first candidate whose target page
    /// independently looks like a booking interface wins. The record itself
    /// is not mutated here; the caller applies the outcome.
    pub async fn resolve_course(&self, record: &CourseRecord) -> ResolutionOutcome {
        let now = Utc::now();
        let fresh_booking_url = record
            .booking_url
            .as_deref()
            .filter(|_| !record.is_stale(self.staleness_hours, now));

        let seed_url = match fresh_booking_url
            .or(record.website_url.as_deref())
            .or(record.booking_url.as_deref())
        {
            Some(url) => url,
            None => {
                tracing::warn!(course = %record.key, "record has no seed URL");
                return ResolutionOutcome::Failed(FailureReason::MissingSeedUrl);
            }
        };

        let seed_page = match self.throttled_fetch(seed_url).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(course = %record.key, seed_url, error = %err, "seed fetch failed");
                return ResolutionOutcome::Failed(FailureReason::Fetch(err));
            }
        };

        // Direct re-verification path: the stored URL (fresh, or stale with
        // no website to crawl) still books, so skip the classifier entirely.
        if record.booking_url.as_deref() == Some(seed_url) && is_booking_interface(&seed_page) {
            tracing::debug!(course = %record.key, seed_url, "stored booking URL re-verified");
            return ResolutionOutcome::Unchanged;
        }

        let candidates = classify(&seed_page, self.capability.as_deref()).await;
        if candidates.is_empty() {
            tracing::info!(course = %record.key, seed_url, "no booking candidate on seed page");
            return ResolutionOutcome::Failed(FailureReason::NoCandidateFound);
        }

        for candidate in candidates.into_iter().take(self.max_candidates) {
            let target = match self.throttled_fetch(&candidate.url).await {
                Ok(page) => page,
                Err(err) => {
                    tracing::debug!(
                        course = %record.key,
                        url = %candidate.url,
                        error = %err,
                        "candidate fetch failed, trying next"
                    );
                    continue;
                }
            };

            if is_booking_interface(&target) {
                let platform = BookingPlatform::from_url(&target.final_url)
                    .or_else(|| BookingPlatform::detect(&target.body));
                tracing::info!(
                    course = %record.key,
                    url = %target.final_url,
                    method = candidate.method.as_str(),
                    platform = platform.map(BookingPlatform::as_str),
                    "booking URL verified"
                );
                return ResolutionOutcome::Verified(VerifiedBooking {
                    url: target.final_url,
                    platform,
                    method: candidate.method,
                    verified_at: Utc::now(),
                });
            }

            tracing::debug!(
                course = %record.key,
                url = %candidate.url,
                "candidate reachable but not a booking interface"
            );
        }

        ResolutionOutcome::Failed(FailureReason::VerificationFailed)
    }

    /// Fetch a page for the availability normalizer, subject to the same
    /// per-host politeness as resolution traffic.
    ///
    /// # Errors
    ///
    /// Propagates [`FetchError`] from the underlying fetch.
    pub async fn throttled_fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        self.throttle.acquire(url).await;
        self.fetcher.fetch(url).await
    }
}
