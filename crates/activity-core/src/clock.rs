use std::time::{SystemTime, UNIX_EPOCH};

use crate::atoms::constants::SLICE_LENGTH_SECONDS;

/// Injectable wall-clock source for the slice rotation scheme.
///
/// Production code uses [`SystemClock`]; tests pin a fixed instant so that
/// slice arithmetic is deterministic.
pub trait Clock: Send + Sync {
    fn now_unix_seconds(&self) -> i64;
}

/// Reads the OS wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the unix epoch")
            .as_secs() as i64
    }
}

/// Maps a wall-clock reading to an integer slice index:
/// `floor(now_unix_seconds / SLICE_LENGTH_SECONDS)`.
pub fn current_slice(clock: &dyn Clock) -> i64 {
    clock.now_unix_seconds().div_euclid(SLICE_LENGTH_SECONDS)
}
