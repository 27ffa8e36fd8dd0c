use crate::atoms::constants::SLICE_LENGTH_SECONDS;
use crate::atoms::error::{ActivityError, Result};
use crate::clock::{current_slice, Clock};
use crate::keys::slice_key;
use crate::store::{ActivityStore, BatchBuilder};

/// The HLL-slice rotation engine: writes to the current slice, reads by
/// merging the last `slice_count` slices, sets TTLs so slices self-evict.
///
/// Owns no state beyond its fixed configuration; every other input (store,
/// clock, context) is threaded through the call.
#[derive(Debug, Clone, Copy)]
pub struct ActivityCounter {
    slice_count: i64,
}

impl ActivityCounter {
    /// Builds a counter for a window of `activity_window_seconds`. Fails if
    /// the window isn't an exact multiple of `SLICE_LENGTH_SECONDS`.
    pub fn new(activity_window_seconds: i64) -> Result<Self> {
        if activity_window_seconds <= 0
            || activity_window_seconds % SLICE_LENGTH_SECONDS != 0
        {
            return Err(ActivityError::Configuration(format!(
                "activity_window_seconds ({activity_window_seconds}) must be a positive exact multiple of {SLICE_LENGTH_SECONDS}"
            )));
        }
        Ok(Self {
            slice_count: activity_window_seconds / SLICE_LENGTH_SECONDS,
        })
    }

    pub fn slice_count(&self) -> i64 {
        self.slice_count
    }

    /// Adds `visitor_id` to the current slice's HLL and sets its expiration
    /// far enough out to survive the full window plus one slice of grace.
    /// Both commands are issued as a single pipelined batch.
    pub async fn record(
        &self,
        store: &dyn ActivityStore,
        clock: &dyn Clock,
        context_id: &str,
        visitor_id: &str,
    ) -> Result<()> {
        let slice = current_slice(clock);
        let key = slice_key(context_id, slice, 0);
        let expire_at = (slice + self.slice_count + 1) * SLICE_LENGTH_SECONDS;

        let mut batch = BatchBuilder::new();
        batch.pfadd(key.clone(), visitor_id).expire_at(key, expire_at);
        store.execute_batch(batch.into_commands()).await
    }

    /// Merges the `slice_count` most recent slices for `context_id` and
    /// returns the cardinality estimate.
    pub async fn count(
        &self,
        store: &dyn ActivityStore,
        clock: &dyn Clock,
        context_id: &str,
    ) -> Result<u64> {
        let counts = self
            .count_many(store, clock, std::slice::from_ref(&context_id.to_string()))
            .await?;
        Ok(counts[0])
    }

    /// Merges the `slice_count` most recent slices for each of
    /// `context_ids`, in one pipelined multi-key cardinality round trip.
    /// Results are positionally aligned with `context_ids`.
    pub async fn count_many(
        &self,
        store: &dyn ActivityStore,
        clock: &dyn Clock,
        context_ids: &[String],
    ) -> Result<Vec<u64>> {
        if context_ids.is_empty() {
            return Ok(Vec::new());
        }

        let slice = current_slice(clock);
        let key_sets: Vec<Vec<String>> = context_ids
            .iter()
            .map(|id| self.keys_for(id, slice))
            .collect();

        store.pfcount_many(&key_sets).await
    }

    /// Keys for the `slice_count` most recent slices, newest first.
    fn keys_for(&self, context_id: &str, current_slice: i64) -> Vec<String> {
        (0..self.slice_count)
            .map(|offset| slice_key(context_id, current_slice, -offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock as _;

    struct FixedClock(i64);
    impl Clock for FixedClock {
        fn now_unix_seconds(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn rejects_non_multiple_window() {
        assert!(ActivityCounter::new(901).is_err());
        assert!(ActivityCounter::new(0).is_err());
        assert!(ActivityCounter::new(-15).is_err());
    }

    #[test]
    fn accepts_exact_multiple_window() {
        let counter = ActivityCounter::new(900).unwrap();
        assert_eq!(counter.slice_count(), 60);
    }

    #[test]
    fn keys_for_s2_scenario() {
        // now=1200, window=900 -> slice=80, slice_count=60 -> keys context/80..context/21.
        let counter = ActivityCounter::new(900).unwrap();
        let clock = FixedClock(1200);
        let slice = current_slice(&clock);
        let keys = counter.keys_for("context", slice);
        assert_eq!(keys.len(), 60);
        assert_eq!(keys.first().unwrap(), "context/80");
        assert_eq!(keys.last().unwrap(), "context/21");
    }

    #[test]
    fn record_key_and_expiry_match_s1_scenario() {
        // now=1202, SLICE_LENGTH=15, window=900 -> slice=80, slice_count=60.
        // expire_at = (80 + 60 + 1) * 15 = 2115.
        let counter = ActivityCounter::new(900).unwrap();
        let clock = FixedClock(1202);
        let slice = current_slice(&clock);
        let key = slice_key("context", slice, 0);
        assert_eq!(key, "context/80");
        let expire_at = (slice + counter.slice_count() + 1) * SLICE_LENGTH_SECONDS;
        assert_eq!(expire_at, 2115);
    }
}
