// crates/aiva-editor/src/config.rs
//
// Runtime settings, read from the environment (a `.env` file is loaded by
// the binary before this runs). Unparseable values keep the default.

use std::time::Duration;

use tracing::warn;

use aiva_backend::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use aiva_backend::worker::DEFAULT_CONCURRENCY;
use aiva_core::clock::DEFAULT_REFRESH_RATE_HZ;

#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Base URL of the processing backend.
    pub backend_url:         String,
    pub request_timeout:     Duration,
    /// Free-running tick rate when no playback surface drives the clock.
    pub refresh_rate_hz:     u32,
    /// Backend requests allowed on the wire at once.
    pub max_concurrent_jobs: u32,
    pub undo_depth:          usize,
    pub toast_lifetime:      Duration,
    /// Refuse a second job of the same kind on a clip while one is processing.
    pub single_flight_jobs:  bool,
    /// Voice commands are ignored unless the transcript contains this word.
    pub wake_word:           Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            backend_url:         DEFAULT_BASE_URL.to_string(),
            request_timeout:     DEFAULT_TIMEOUT,
            refresh_rate_hz:     DEFAULT_REFRESH_RATE_HZ,
            max_concurrent_jobs: DEFAULT_CONCURRENCY,
            undo_depth:          100,
            toast_lifetime:      Duration::from_secs(4),
            single_flight_jobs:  false,
            wake_word:           None,
        }
    }
}

impl EditorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` is this over `std::env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            backend_url: lookup("AIVA_BACKEND_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(d.backend_url),
            request_timeout: parsed(&lookup, "AIVA_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.request_timeout),
            refresh_rate_hz: parsed(&lookup, "AIVA_REFRESH_RATE_HZ")
                .filter(|&hz: &u32| hz > 0)
                .unwrap_or(d.refresh_rate_hz),
            max_concurrent_jobs: parsed(&lookup, "AIVA_MAX_CONCURRENT_JOBS")
                .filter(|&n: &u32| n > 0)
                .unwrap_or(d.max_concurrent_jobs),
            undo_depth: parsed(&lookup, "AIVA_UNDO_DEPTH").unwrap_or(d.undo_depth),
            toast_lifetime: parsed(&lookup, "AIVA_TOAST_SECS")
                .map(Duration::from_secs)
                .unwrap_or(d.toast_lifetime),
            single_flight_jobs: lookup("AIVA_SINGLE_FLIGHT_JOBS")
                .and_then(|v| parse_flag("AIVA_SINGLE_FLIGHT_JOBS", &v))
                .unwrap_or(d.single_flight_jobs),
            wake_word: lookup("AIVA_WAKE_WORD")
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{key}={raw:?} is not a valid value, using default");
            None
        }
    }
}

fn parse_flag(key: &str, raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on"  => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!("{key}={raw:?} is not a boolean, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> EditorConfig {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        EditorConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(from_pairs(&[]), EditorConfig::default());
    }

    #[test]
    fn values_are_read() {
        let c = from_pairs(&[
            ("AIVA_BACKEND_URL", "http://gpu-box:8000"),
            ("AIVA_REFRESH_RATE_HZ", "120"),
            ("AIVA_SINGLE_FLIGHT_JOBS", "yes"),
            ("AIVA_WAKE_WORD", " Jarvis "),
            ("AIVA_TOAST_SECS", "2"),
        ]);
        assert_eq!(c.backend_url, "http://gpu-box:8000");
        assert_eq!(c.refresh_rate_hz, 120);
        assert!(c.single_flight_jobs);
        assert_eq!(c.wake_word.as_deref(), Some("jarvis"));
        assert_eq!(c.toast_lifetime, Duration::from_secs(2));
    }

    #[test]
    fn garbage_keeps_defaults() {
        let c = from_pairs(&[
            ("AIVA_REFRESH_RATE_HZ", "fast"),
            ("AIVA_MAX_CONCURRENT_JOBS", "0"),
            ("AIVA_SINGLE_FLIGHT_JOBS", "maybe"),
            ("AIVA_WAKE_WORD", "   "),
        ]);
        let d = EditorConfig::default();
        assert_eq!(c.refresh_rate_hz, d.refresh_rate_hz);
        assert_eq!(c.max_concurrent_jobs, d.max_concurrent_jobs);
        assert!(!c.single_flight_jobs);
        assert_eq!(c.wake_word, None);
    }
}
