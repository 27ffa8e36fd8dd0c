use rand::Rng;

use crate::atoms::constants::FUZZ_DECAY_SECONDS;
use crate::types::ActivityInfo;

/// Injectable source of jitter randomness. Production code draws from the
/// thread-local RNG ([`ThreadRng`]); tests substitute a fixed draw.
pub trait JitterRng: Send + Sync {
    /// Draws a uniformly distributed integer in `[0, max_inclusive]`.
    fn uniform(&self, max_inclusive: u64) -> u64;
}

/// Draws from `rand`'s thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRng;

impl JitterRng for ThreadRng {
    fn uniform(&self, max_inclusive: u64) -> u64 {
        rand::rng().random_range(0..=max_inclusive)
    }
}

/// Injectable rounding function for the decay-based jitter ceiling.
pub trait RoundFn: Send + Sync {
    fn round(&self, x: f64) -> u64;
}

/// Round-half-up: ties round away from zero. This is the convention this
/// crate's test suite is written against (jitter ceiling of 4 at
/// `count = 10`, per §9 open question 1); the other documented variant,
/// round-half-even, would also be a valid choice but isn't the one used
/// here.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundHalfUp;

impl RoundFn for RoundHalfUp {
    fn round(&self, x: f64) -> u64 {
        x.round() as u64
    }
}

/// Transforms an exact count into a reported `ActivityInfo`.
///
/// Counts at or above `fuzz_threshold` are reported exactly. Smaller counts
/// are perturbed upward by a uniform draw whose ceiling decays toward zero
/// as the count grows, so low-traffic contexts can't be used to infer
/// individual-visitor presence.
pub fn from_count(
    fuzz_threshold: u64,
    count: u64,
    rng: &dyn JitterRng,
    round_fn: &dyn RoundFn,
) -> ActivityInfo {
    if count >= fuzz_threshold {
        return ActivityInfo::new(count, false);
    }

    let decay = (-(count as f64) / FUZZ_DECAY_SECONDS).exp();
    let jitter_ceiling = round_fn.round(5.0 * decay);
    let jitter = rng.uniform(jitter_ceiling);

    ActivityInfo::new(count + jitter, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRng(u64);
    impl JitterRng for FixedRng {
        fn uniform(&self, _max_inclusive: u64) -> u64 {
            self.0
        }
    }

    #[test]
    fn fuzzed_if_small() {
        let info = from_count(100, 99, &FixedRng(3), &RoundHalfUp);
        assert_eq!(info.count, 102);
        assert!(info.is_fuzzed);
    }

    #[test]
    fn not_fuzzed_if_at_or_above_threshold() {
        let info = from_count(100, 101, &ThreadRng, &RoundHalfUp);
        assert_eq!(info.count, 101);
        assert!(!info.is_fuzzed);

        let info = from_count(10, 28, &ThreadRng, &RoundHalfUp);
        assert_eq!(info.count, 28);
        assert!(!info.is_fuzzed);
    }

    #[test]
    fn range_of_fuzzing_at_count_10() {
        for _ in 0..1000 {
            let info = from_count(100, 10, &ThreadRng, &RoundHalfUp);
            assert!(info.count >= 10);
            assert!(info.count <= 14);
            assert!(info.is_fuzzed);
        }
    }

    #[test]
    fn jitter_ceiling_at_count_zero_is_five() {
        // round(5 * exp(0)) == 5.
        let info = from_count(1, 0, &FixedRng(5), &RoundHalfUp);
        assert_eq!(info.count, 5);
    }
}
