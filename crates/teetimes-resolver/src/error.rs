use thiserror::Error;

/// Errors from a single page fetch, surfaced after the retry budget is spent.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("too many redirects fetching {url}")]
    TooManyRedirects { url: String },

    #[error("bot challenge page served for {url}")]
    BotChallenge { url: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Errors from availability normalization.
///
/// `UnrecognizedPlatform` is produced as a diagnostic when a verified booking
/// page matches no known platform fingerprint; the normalizer logs it and
/// returns an empty slot list rather than failing the call.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("failed to fetch booking page: {0}")]
    Fetch(#[from] FetchError),

    #[error("no recognized booking platform on {url}")]
    UnrecognizedPlatform { url: String },
}
