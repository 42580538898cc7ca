//! Per-host politeness throttle.
//!
//! Concurrent workers resolving different courses may still hit the same
//! booking host (many courses share a tee-sheet vendor). This throttle is
//! the only shared mutable state in the engine: each host gets a minimum
//! inter-request interval, and workers reserve send slots under a lock so
//! bursts against one host serialize instead of tripping anti-bot defenses.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

pub struct HostThrottle {
    min_gap: Duration,
    /// Earliest instant the next request to each host may be sent.
    next_allowed: Mutex<HashMap<String, Instant>>,
}

impl HostThrottle {
    #[must_use]
    pub fn new(min_gap_ms: u64) -> Self {
        Self {
            min_gap: Duration::from_millis(min_gap_ms),
            next_allowed: Mutex::new(HashMap::new()),
        }
    }

    /// Wait until a request to `url`'s host is allowed. Reserves the slot
    /// before sleeping, so concurrent callers for one host queue up with
    /// distinct send times.
    pub async fn acquire(&self, url: &str) {
        if self.min_gap.is_zero() {
            return;
        }
        let host = host_of(url);

        let send_at = {
            let mut map = self.next_allowed.lock().await;
            let now = Instant::now();
            let slot = map.entry(host).or_insert(now);
            let send_at = (*slot).max(now);
            *slot = send_at + self.min_gap;
            send_at
        };

        tokio::time::sleep_until(send_at).await;
    }
}

fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_extraction_falls_back_to_raw_string() {
        assert_eq!(host_of("https://foreupsoftware.com/booking/1"), "foreupsoftware.com");
        assert_eq!(host_of("not a url"), "not a url");
    }

    #[tokio::test]
    async fn same_host_requests_are_spaced_out() {
        let throttle = HostThrottle::new(50);
        let start = Instant::now();
        throttle.acquire("https://foreupsoftware.com/a").await;
        throttle.acquire("https://foreupsoftware.com/b").await;
        throttle.acquire("https://foreupsoftware.com/c").await;
        assert!(
            start.elapsed() >= Duration::from_millis(100),
            "three same-host acquires must span two full gaps"
        );
    }

    #[tokio::test]
    async fn different_hosts_do_not_block_each_other() {
        let throttle = HostThrottle::new(200);
        let start = Instant::now();
        throttle.acquire("https://foreupsoftware.com/a").await;
        throttle.acquire("https://chronogolf.com/b").await;
        throttle.acquire("https://teesnap.net/c").await;
        assert!(
            start.elapsed() < Duration::from_millis(150),
            "distinct hosts must not serialize"
        );
    }

    #[tokio::test]
    async fn zero_gap_disables_throttling() {
        let throttle = HostThrottle::new(0);
        let start = Instant::now();
        for _ in 0..10 {
            throttle.acquire("https://foreupsoftware.com/a").await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
