//! Run-level orchestration: resolve a set of courses with bounded
//! parallelism and write outcomes back to the catalog.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use teetimes_catalog::{CourseCatalog, StoreError};
use teetimes_core::CourseRecord;

use crate::resolve::Resolver;
use crate::types::{FailureReason, ResolutionOutcome};

/// Cooperative run cancellation. Cancelling stops dispatching new course
/// resolutions; in-flight fetches finish or time out naturally so no
/// record is left half-updated.
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Aggregated results of one resolution run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub verified: usize,
    pub unchanged: usize,
    /// Courses not dispatched because the run was cancelled.
    pub skipped: usize,
    /// Per-course failures, reported at the end of the run. A failure here
    /// never aborts processing of the remaining courses.
    pub failed: Vec<(String, FailureReason)>,
}

impl RunSummary {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Apply a resolution outcome to a course record.
///
/// `Verified` installs the new URL and resets the failure counter;
/// `Unchanged` refreshes the verification timestamp and also resets the
/// counter; `Failed` increments the counter by exactly one. Pure so the
/// counter invariants are testable without any network.
pub fn apply_outcome(record: &mut CourseRecord, outcome: &ResolutionOutcome, now: DateTime<Utc>) {
    match outcome {
        ResolutionOutcome::Verified(booking) => {
            record.booking_url = Some(booking.url.clone());
            record.last_verified = Some(booking.verified_at);
            record.consecutive_failures = 0;
        }
        ResolutionOutcome::Unchanged => {
            record.last_verified = Some(now);
            record.consecutive_failures = 0;
        }
        ResolutionOutcome::Failed(_) => {
            record.consecutive_failures = record.consecutive_failures.saturating_add(1);
        }
    }
}

enum CourseResult {
    Verified,
    Unchanged,
    Failed(String, FailureReason),
    Skipped,
}

/// Resolve every course in `keys`, writing each outcome back to the
/// catalog as it lands. Courses are independent units of work run through
/// a bounded worker pool; each course's own pipeline stays sequential.
///
/// # Errors
///
/// Returns [`StoreError`] only for catalog-level faults (unreadable file,
/// unknown key); these are fatal to the run. Per-course resolution
/// failures are collected in the [`RunSummary`] instead.
pub async fn resolve_all(
    resolver: &Resolver,
    catalog: &CourseCatalog,
    keys: &[String],
    max_concurrent: usize,
    failure_alert_threshold: u32,
    cancel: &CancelFlag,
) -> Result<RunSummary, StoreError> {
    let max_concurrent = max_concurrent.max(1);

    let results: Vec<Result<CourseResult, StoreError>> = stream::iter(keys)
        .map(|key| async move {
            if cancel.is_cancelled() {
                tracing::info!(course = %key, "run cancelled, skipping dispatch");
                return Ok(CourseResult::Skipped);
            }

            let mut record = catalog
                .get(key)?
                .ok_or_else(|| StoreError::UnknownCourse { key: key.clone() })?;

            let outcome = resolver.resolve_course(&record).await;
            apply_outcome(&mut record, &outcome, Utc::now());

            if record.consecutive_failures >= failure_alert_threshold {
                tracing::warn!(
                    course = %record.key,
                    failures = record.consecutive_failures,
                    "course has exceeded the failure alert threshold"
                );
            }

            catalog.update(&record)?;

            Ok(match outcome {
                ResolutionOutcome::Verified(_) => CourseResult::Verified,
                ResolutionOutcome::Unchanged => CourseResult::Unchanged,
                ResolutionOutcome::Failed(reason) => {
                    CourseResult::Failed(record.key.clone(), reason)
                }
            })
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut summary = RunSummary::default();
    for result in results {
        match result? {
            CourseResult::Verified => summary.verified += 1,
            CourseResult::Unchanged => summary.unchanged += 1,
            CourseResult::Skipped => summary.skipped += 1,
            CourseResult::Failed(key, reason) => summary.failed.push((key, reason)),
        }
    }

    tracing::info!(
        verified = summary.verified,
        unchanged = summary.unchanged,
        failed = summary.failed.len(),
        skipped = summary.skipped,
        "resolution run complete"
    );

    Ok(summary)
}
