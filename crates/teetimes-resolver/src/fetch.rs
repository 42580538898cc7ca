//! Resilient page retrieval for course and booking pages.

use std::time::Duration;

use reqwest::Client;
use teetimes_core::AppConfig;

use crate::error::FetchError;
use crate::retry::retry_with_backoff;
use crate::types::FetchResult;

/// HTTP fetcher with configured timeout, redirect ceiling, user-agent, and
/// retry policy.
///
/// Outcome classes per attempt: 2xx succeeds; 4xx fails immediately; 5xx is
/// retried with exponential backoff up to the retry budget; a timeout is
/// retried exactly once and then surfaced. The fetcher holds no shared
/// mutable state; politeness throttling lives in
/// [`crate::throttle::HostThrottle`].
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl PageFetcher {
    /// Creates a `PageFetcher` from the engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        })
    }

    /// Fetches `url`, following redirects, and returns the final page.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`]: `url` does not parse (not retried).
    /// - [`FetchError::HttpStatus`]: 4xx immediately, 5xx after the retry
    ///   budget is exhausted.
    /// - [`FetchError::Timeout`]: after the single timeout retry.
    /// - [`FetchError::TooManyRedirects`]: redirect ceiling exceeded.
    /// - [`FetchError::BotChallenge`]: the response is an anti-bot
    ///   interstitial, not real content.
    /// - [`FetchError::Network`]: connection failure after retries.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        match self.fetch_with_retries(url).await {
            Err(FetchError::Timeout { .. }) => {
                tracing::debug!(url, "fetch timed out, retrying once");
                self.fetch_with_retries(url).await
            }
            other => other,
        }
    }

    async fn fetch_with_retries(&self, url: &str) -> Result<FetchResult, FetchError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(url)
        })
        .await
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchResult, FetchError> {
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| classify_send_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| classify_send_error(e, url))?;

        if looks_like_bot_challenge(&body) {
            return Err(FetchError::BotChallenge {
                url: url.to_owned(),
            });
        }

        Ok(FetchResult {
            url: url.to_owned(),
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn classify_send_error(err: reqwest::Error, url: &str) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_owned(),
        }
    } else if err.is_redirect() {
        FetchError::TooManyRedirects {
            url: url.to_owned(),
        }
    } else {
        FetchError::Network(err)
    }
}

/// Heuristic for anti-bot interstitials that come back with a 200 status.
/// A challenge page has no booking content, so treating it as a fetch
/// failure is more honest than classifying an interstitial.
fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");

    has_cloudflare_banner
        || has_challenge_platform
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}
