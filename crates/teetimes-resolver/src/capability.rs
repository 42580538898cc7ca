//! Pluggable AI-assisted extraction capability.
//!
//! The engine's control flow is deterministic given this interface's
//! output: heuristics run first, and only when they produce nothing does
//! the classifier consult an injected capability. The engine never
//! implements a model client itself; callers wire one in (or pass `None`
//! to disable AI assistance). Tests use a stub.

use async_trait::async_trait;

/// A best-guess booking URL proposed by an extraction capability.
#[derive(Debug, Clone)]
pub struct ExtractedBooking {
    pub url: String,
    /// In `(0, 1]`; the classifier clamps out-of-range values.
    pub confidence: f64,
}

/// Narrow interface for model-backed booking-URL extraction.
#[async_trait]
pub trait ExtractCapability: Send + Sync {
    /// Inspect page text and propose a booking URL, or `None` when the
    /// capability finds nothing. Capability-internal failures should be
    /// handled (and logged) by the implementation and reported as `None`;
    /// the engine treats absence and failure identically.
    async fn extract(&self, page_text: &str) -> Option<ExtractedBooking>;
}
