//! Course-discovery and booking-URL-resolution engine.
//!
//! Takes a possibly stale course record and produces a verified, current
//! booking URL: fetch the seed page, classify it into ranked booking
//! candidates (heuristics first, pluggable AI capability as a fallback),
//! verify candidates greedily, and write the winner back to the catalog.
//! A separate normalizer turns verified booking pages into structured
//! tee-time slots.

pub mod availability;
pub mod capability;
pub mod classify;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod resolve;
pub mod run;
pub mod throttle;
pub mod types;

mod retry;

pub use availability::{fetch_availability, TimeSlot};
pub use capability::{ExtractCapability, ExtractedBooking};
pub use classify::classify;
pub use error::{FetchError, NormalizeError};
pub use fetch::PageFetcher;
pub use platform::BookingPlatform;
pub use resolve::Resolver;
pub use run::{resolve_all, CancelFlag, RunSummary};
pub use types::{
    BookingCandidate, ClassificationMethod, FailureReason, FetchResult, ResolutionOutcome,
    VerifiedBooking,
};
