use serde::Deserialize;

use crate::atoms::constants::SLICE_LENGTH_SECONDS;
use crate::atoms::error::{ActivityError, Result};

/// Validated counter configuration: `activity.window` and
/// `activity.fuzz_threshold` from §6's recognized options. The
/// `redis.*` options live in `activity-redis`'s own config type, since
/// this crate has no transport of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ActivityConfig {
    /// Rolling window length, in seconds. Must be a positive exact
    /// multiple of `SLICE_LENGTH_SECONDS` (15s).
    pub window_seconds: i64,
    /// Counts at or above this threshold are reported exactly, unfuzzed.
    pub fuzz_threshold: u64,
}

impl ActivityConfig {
    /// Fails fast on a window/slice mismatch or a zero threshold, rather
    /// than letting an inconsistent configuration reach request handling.
    pub fn validate(&self) -> Result<()> {
        if self.fuzz_threshold == 0 {
            return Err(ActivityError::Configuration(
                "activity.fuzz_threshold must be a positive integer".into(),
            ));
        }
        if self.window_seconds <= 0 || self.window_seconds % SLICE_LENGTH_SECONDS != 0 {
            return Err(ActivityError::Configuration(format!(
                "activity.window ({}s) must be a positive exact multiple of {SLICE_LENGTH_SECONDS}s",
                self.window_seconds
            )));
        }
        Ok(())
    }

    pub fn slice_count(&self) -> i64 {
        self.window_seconds / SLICE_LENGTH_SECONDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_threshold() {
        let config = ActivityConfig {
            window_seconds: 900,
            fuzz_threshold: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_multiple_window() {
        let config = ActivityConfig {
            window_seconds: 901,
            fuzz_threshold: 100,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn accepts_valid_config() {
        let config = ActivityConfig {
            window_seconds: 900,
            fuzz_threshold: 100,
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.slice_count(), 60);
    }
}
