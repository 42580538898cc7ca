//! Link/page classification: turn a fetched page into ranked booking
//! candidates.
//!
//! Pure with respect to the network; classification inspects the fetched
//! body only. Signals, strongest first: booking-platform embeds, platform
//! outbound links, anchors matching the booking vocabulary, and finally an
//! injected AI capability when the heuristics come up empty.

use regex::Regex;

use crate::capability::ExtractCapability;
use crate::platform::BookingPlatform;
use crate::types::{BookingCandidate, ClassificationMethod, FetchResult};

/// Anchor-text vocabulary that marks a link (or page) as booking-related.
/// Matched case-insensitively against tag-stripped text.
pub(crate) const BOOKING_VOCABULARY: &[&str] = &[
    "book a tee time",
    "book tee times",
    "tee times",
    "tee time",
    "tee sheet",
    "book now",
    "book online",
    "online booking",
    "reservations",
];

/// Vocabulary terms strong enough to carry a higher confidence on their own.
const TEE_TIME_TERMS: &[&str] = &["tee time", "tee times", "book a tee time", "book tee times"];

/// Produce booking candidates from a fetched page, ordered by descending
/// confidence. An empty result means "no candidate found", an expected
/// outcome, not an error.
///
/// Relative hrefs are resolved against the page's final (post-redirect)
/// URL. Duplicate URLs keep their highest-confidence occurrence.
pub async fn classify(
    page: &FetchResult,
    capability: Option<&dyn ExtractCapability>,
) -> Vec<BookingCandidate> {
    let mut candidates = heuristic_candidates(page);

    if candidates.is_empty() {
        if let Some(capability) = capability {
            if let Some(extracted) = capability.extract(&page.body).await {
                if let Some(url) = resolve_href(&page.final_url, &extracted.url) {
                    tracing::debug!(
                        page = %page.final_url,
                        url,
                        confidence = extracted.confidence,
                        "capability proposed booking candidate"
                    );
                    candidates.push(BookingCandidate {
                        url,
                        confidence: extracted.confidence.clamp(0.01, 1.0),
                        method: ClassificationMethod::AiAssisted,
                    });
                }
            }
        }
    }

    dedup_by_confidence(candidates)
}

fn heuristic_candidates(page: &FetchResult) -> Vec<BookingCandidate> {
    let mut candidates = Vec::new();

    // Strongest signal: a hosted tee-sheet vendor embedded in the page.
    let embed_re =
        Regex::new(r#"(?is)<(?:iframe|script)\b[^>]*src=["']([^"']+)["']"#).expect("valid regex");
    for cap in embed_re.captures_iter(&page.body) {
        let src = cap.get(1).map_or("", |m| m.as_str());
        if BookingPlatform::from_url(src).is_some() {
            if let Some(url) = resolve_href(&page.final_url, src) {
                candidates.push(BookingCandidate {
                    url,
                    confidence: 0.95,
                    method: ClassificationMethod::PlatformEmbed,
                });
            }
        }
    }

    let anchor_re =
        Regex::new(r#"(?is)<a\b[^>]*href=["']([^"']+)["'][^>]*>(.*?)</a>"#).expect("valid regex");
    for cap in anchor_re.captures_iter(&page.body) {
        let href = cap.get(1).map_or("", |m| m.as_str());
        if !is_followable(href) {
            continue;
        }

        // A link out to a known platform is almost as strong as an embed.
        if BookingPlatform::from_url(href).is_some() {
            if let Some(url) = resolve_href(&page.final_url, href) {
                candidates.push(BookingCandidate {
                    url,
                    confidence: 0.9,
                    method: ClassificationMethod::PlatformEmbed,
                });
            }
            continue;
        }

        let text = strip_tags(cap.get(2).map_or("", |m| m.as_str()));
        let lowered = text.to_lowercase();
        if BOOKING_VOCABULARY.iter().any(|t| lowered.contains(t)) {
            let confidence = if TEE_TIME_TERMS.iter().any(|t| lowered.contains(t)) {
                0.7
            } else {
                0.55
            };
            if let Some(url) = resolve_href(&page.final_url, href) {
                candidates.push(BookingCandidate {
                    url,
                    confidence,
                    method: ClassificationMethod::AnchorVocabulary,
                });
            }
        }
    }

    candidates
}

/// Whether a fetched page itself looks like a live booking interface.
///
/// Applied to the *target* page during verification: a platform
/// fingerprint in the final URL or body, or the booking vocabulary in the
/// page text.
#[must_use]
pub fn is_booking_interface(page: &FetchResult) -> bool {
    if BookingPlatform::from_url(&page.final_url).is_some()
        || BookingPlatform::detect(&page.body).is_some()
    {
        return true;
    }
    let lowered = page.body.to_lowercase();
    BOOKING_VOCABULARY.iter().any(|t| lowered.contains(t))
}

fn is_followable(href: &str) -> bool {
    let trimmed = href.trim();
    !(trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("mailto:")
        || trimmed.starts_with("tel:")
        || trimmed.starts_with("javascript:"))
}

/// Resolve an href against the page it appeared on. Absolute URLs pass
/// through; anything that cannot resolve to a fetchable URL is dropped.
fn resolve_href(base: &str, href: &str) -> Option<String> {
    let base = reqwest::Url::parse(base).ok()?;
    let resolved = base.join(href.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

/// Drop markup and collapse runs of whitespace, so text split across
/// nested tags still matches multi-word vocabulary phrases.
fn strip_tags(html: &str) -> String {
    let tag_re = Regex::new(r"<[^>]+>").expect("valid regex");
    let text = tag_re.replace_all(html, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the highest-confidence instance of each URL and order the result
/// by descending confidence.
fn dedup_by_confidence(mut candidates: Vec<BookingCandidate>) -> Vec<BookingCandidate> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut seen: Vec<String> = Vec::new();
    candidates.retain(|c| {
        if seen.iter().any(|u| u == &c.url) {
            false
        } else {
            seen.push(c.url.clone());
            true
        }
    });
    candidates
}
