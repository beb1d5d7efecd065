use std::time::Duration;

use chrono::NaiveDate;

use crate::error::{AppError, Result};

pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Profile used when `SCORECARD_PROFILE` is not set.
pub const DEFAULT_PROFILE: &str = "eurusd";

/// Per-fetch timeout (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Jitter range between consecutive upstream requests (milliseconds).
/// FRED allows 120 requests per minute per key.
pub const FETCH_PACING_MS: (u64, u64) = (250, 750);

/// FRED keys are 32 lower-case alphanumeric characters.
pub const FRED_KEY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub fred_api_key: String,
    pub fred_base_url: String,
    /// Profile slug from the indicator registry (SCORECARD_PROFILE)
    pub profile: String,
    pub fetch_timeout: Duration,
    /// Inclusive jitter range between fetches, in ms (FETCH_PACING_MS, "min-max" or "n")
    pub pacing_ms: (u64, u64),
    /// Lower bound for fetched observations (FRED_OBSERVATION_START, YYYY-MM-DD)
    pub observation_start: Option<NaiveDate>,
    pub output: OutputFormat,
    /// Re-run the scorecard on this interval instead of exiting (REFRESH_INTERVAL_SECS)
    pub refresh_interval: Option<Duration>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. A missing or malformed
    /// credential is an error here so no fetch is ever attempted with it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fred_api_key = parse_api_key(lookup("FRED_API_KEY"))?;

        let fetch_timeout_secs = match lookup("FETCH_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                AppError::Config("FETCH_TIMEOUT_SECS must be a positive number of seconds".to_string())
            })?,
            None => FETCH_TIMEOUT_SECS,
        };

        let pacing_ms = match lookup("FETCH_PACING_MS") {
            Some(raw) => parse_pacing(&raw)?,
            None => FETCH_PACING_MS,
        };

        let observation_start = lookup("FRED_OBSERVATION_START")
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                    AppError::Config(format!("FRED_OBSERVATION_START must be YYYY-MM-DD: {e}"))
                })
            })
            .transpose()?;

        let output = match lookup("OUTPUT_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => OutputFormat::Text,
            Some("json") => OutputFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "OUTPUT_FORMAT must be 'text' or 'json', got '{other}'"
                )))
            }
        };

        let refresh_interval = lookup("REFRESH_INTERVAL_SECS")
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .ok_or_else(|| {
                        AppError::Config("REFRESH_INTERVAL_SECS must be a positive number of seconds".to_string())
                    })
            })
            .transpose()?;

        Ok(Self {
            fred_api_key,
            fred_base_url: lookup("FRED_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| FRED_BASE_URL.to_string()),
            profile: lookup("SCORECARD_PROFILE")
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            pacing_ms,
            observation_start,
            output,
            refresh_interval,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_api_key(raw: Option<String>) -> Result<String> {
    // Sanitize: keys pasted from the FRED site often carry whitespace.
    let key = raw.map(|k| k.trim().to_lowercase()).unwrap_or_default();

    if key.is_empty() {
        return Err(AppError::Config(
            "FRED_API_KEY is not set. Export it or add it to .env".to_string(),
        ));
    }

    if key.len() != FRED_KEY_LEN || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Config(format!(
            "FRED_API_KEY must be {} alphanumeric characters (got {} characters)",
            FRED_KEY_LEN,
            key.len()
        )));
    }

    Ok(key)
}

fn parse_pacing(raw: &str) -> Result<(u64, u64)> {
    let invalid = || AppError::Config(format!("FETCH_PACING_MS must be 'min-max' or a single value in ms, got '{raw}'"));

    let (min, max) = match raw.trim().split_once('-') {
        Some((lo, hi)) => (
            lo.trim().parse::<u64>().map_err(|_| invalid())?,
            hi.trim().parse::<u64>().map_err(|_| invalid())?,
        ),
        None => {
            let ms = raw.trim().parse::<u64>().map_err(|_| invalid())?;
            (ms, ms)
        }
    };

    if min > max {
        return Err(invalid());
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "abcdef0123456789abcdef0123456789";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[("FRED_API_KEY", KEY)])).unwrap();
        assert_eq!(cfg.fred_api_key, KEY);
        assert_eq!(cfg.fred_base_url, FRED_BASE_URL);
        assert_eq!(cfg.profile, DEFAULT_PROFILE);
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(FETCH_TIMEOUT_SECS));
        assert_eq!(cfg.pacing_ms, FETCH_PACING_MS);
        assert_eq!(cfg.output, OutputFormat::Text);
        assert!(cfg.observation_start.is_none());
        assert!(cfg.refresh_interval.is_none());
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("FRED_API_KEY"));
    }

    #[test]
    fn test_malformed_key_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[("FRED_API_KEY", "short")])).unwrap_err();
        assert!(err.to_string().contains("5 characters"));
        // never echo the key itself
        assert!(!err.to_string().contains("short"));
    }

    #[test]
    fn test_key_is_sanitized() {
        let padded = format!("  {}\n", KEY.to_uppercase());
        let cfg = Config::from_lookup(lookup_from(&[("FRED_API_KEY", &padded)])).unwrap();
        assert_eq!(cfg.fred_api_key, KEY);
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("FRED_API_KEY", KEY),
            ("FRED_BASE_URL", "http://localhost:8080/fred/"),
            ("SCORECARD_PROFILE", "EURUSD-Events"),
            ("FETCH_TIMEOUT_SECS", "3"),
            ("FETCH_PACING_MS", "0-10"),
            ("FRED_OBSERVATION_START", "2015-01-01"),
            ("OUTPUT_FORMAT", "json"),
            ("REFRESH_INTERVAL_SECS", "300"),
        ]))
        .unwrap();

        assert_eq!(cfg.fred_base_url, "http://localhost:8080/fred");
        assert_eq!(cfg.profile, "eurusd-events");
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(3));
        assert_eq!(cfg.pacing_ms, (0, 10));
        assert_eq!(cfg.observation_start, NaiveDate::from_ymd_opt(2015, 1, 1));
        assert_eq!(cfg.output, OutputFormat::Json);
        assert_eq!(cfg.refresh_interval, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_invalid_settings() {
        for (key, value) in [
            ("FETCH_TIMEOUT_SECS", "0"),
            ("FETCH_TIMEOUT_SECS", "soon"),
            ("FETCH_PACING_MS", "500-100"),
            ("FETCH_PACING_MS", "fast"),
            ("FRED_OBSERVATION_START", "01/01/2015"),
            ("OUTPUT_FORMAT", "yaml"),
            ("REFRESH_INTERVAL_SECS", "0"),
        ] {
            let result = Config::from_lookup(lookup_from(&[("FRED_API_KEY", KEY), (key, value)]));
            assert!(result.is_err(), "{key}={value} should be rejected");
        }
    }

    #[test]
    fn test_single_pacing_value() {
        assert_eq!(parse_pacing("100").unwrap(), (100, 100));
    }
}
