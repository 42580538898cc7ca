use std::path::PathBuf;

/// Runtime configuration for the resolution engine, loaded from env vars.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the course catalog JSON file.
    pub catalog_path: PathBuf,
    pub log_level: String,
    /// Total per-request timeout in seconds.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Maximum redirects followed per fetch before the fetch fails.
    pub max_redirects: usize,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `base * 2^attempt` seconds.
    pub retry_backoff_base_secs: u64,
    /// Upper bound on courses resolved in parallel.
    pub max_concurrent_courses: usize,
    /// Minimum gap between requests to the same host, in milliseconds.
    pub inter_request_delay_ms: u64,
    /// Age in hours after which a stored booking URL is considered stale
    /// and full re-discovery runs instead of direct re-verification.
    pub staleness_hours: i64,
    /// Maximum classifier candidates the orchestrator will try to verify.
    pub max_candidates: usize,
    /// Failure count at which a course is flagged in the run summary.
    /// The engine never deletes records; this is reporting only.
    pub failure_alert_threshold: u32,
}
