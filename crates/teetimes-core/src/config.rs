use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if an env var holds a value that fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup; no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let catalog_path = PathBuf::from(or_default("TEETIMES_CATALOG_PATH", "./golf_courses.json"));
    let log_level = or_default("TEETIMES_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("TEETIMES_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TEETIMES_USER_AGENT", "teetimes/0.1 (tee-time-resolver)");
    let max_redirects = parse_usize("TEETIMES_MAX_REDIRECTS", "5")?;
    let max_retries = parse_u32("TEETIMES_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("TEETIMES_RETRY_BACKOFF_BASE_SECS", "2")?;
    let max_concurrent_courses = parse_usize("TEETIMES_MAX_CONCURRENT_COURSES", "4")?;
    let inter_request_delay_ms = parse_u64("TEETIMES_INTER_REQUEST_DELAY_MS", "500")?;
    let staleness_hours = parse_i64("TEETIMES_STALENESS_HOURS", "168")?;
    let max_candidates = parse_usize("TEETIMES_MAX_CANDIDATES", "3")?;
    let failure_alert_threshold = parse_u32("TEETIMES_FAILURE_ALERT_THRESHOLD", "5")?;

    Ok(AppConfig {
        catalog_path,
        log_level,
        request_timeout_secs,
        user_agent,
        max_redirects,
        max_retries,
        retry_backoff_base_secs,
        max_concurrent_courses,
        inter_request_delay_ms,
        staleness_hours,
        max_candidates,
        failure_alert_threshold,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_succeeds_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.catalog_path.to_str(), Some("./golf_courses.json"));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.user_agent, "teetimes/0.1 (tee-time-resolver)");
        assert_eq!(cfg.max_redirects, 5);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.retry_backoff_base_secs, 2);
        assert_eq!(cfg.max_concurrent_courses, 4);
        assert_eq!(cfg.inter_request_delay_ms, 500);
        assert_eq!(cfg.staleness_hours, 168);
        assert_eq!(cfg.max_candidates, 3);
        assert_eq!(cfg.failure_alert_threshold, 5);
    }

    #[test]
    fn catalog_path_override() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_CATALOG_PATH", "/data/courses.json");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.catalog_path.to_str(), Some("/data/courses.json"));
    }

    #[test]
    fn request_timeout_secs_override() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_REQUEST_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.request_timeout_secs, 60);
    }

    #[test]
    fn request_timeout_secs_invalid() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TEETIMES_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(TEETIMES_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn max_concurrent_courses_override() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_MAX_CONCURRENT_COURSES", "8");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_concurrent_courses, 8);
    }

    #[test]
    fn max_concurrent_courses_invalid() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_MAX_CONCURRENT_COURSES", "many");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TEETIMES_MAX_CONCURRENT_COURSES"),
            "expected InvalidEnvVar(TEETIMES_MAX_CONCURRENT_COURSES), got: {result:?}"
        );
    }

    #[test]
    fn staleness_hours_override() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_STALENESS_HOURS", "24");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.staleness_hours, 24);
    }

    #[test]
    fn staleness_hours_invalid() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_STALENESS_HOURS", "a week");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TEETIMES_STALENESS_HOURS"),
            "expected InvalidEnvVar(TEETIMES_STALENESS_HOURS), got: {result:?}"
        );
    }

    #[test]
    fn inter_request_delay_ms_override() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_INTER_REQUEST_DELAY_MS", "1000");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.inter_request_delay_ms, 1000);
    }

    #[test]
    fn max_retries_invalid() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_MAX_RETRIES", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TEETIMES_MAX_RETRIES"),
            "expected InvalidEnvVar(TEETIMES_MAX_RETRIES), got: {result:?}"
        );
    }

    #[test]
    fn user_agent_override() {
        let mut map = HashMap::new();
        map.insert("TEETIMES_USER_AGENT", "custom-agent/2.0");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.user_agent, "custom-agent/2.0");
    }
}
