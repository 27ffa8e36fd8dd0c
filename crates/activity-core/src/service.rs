use std::collections::HashMap;
use std::sync::Arc;

use crate::atoms::error::Result;
use crate::cache::ResultCache;
use crate::clock::{Clock, SystemClock};
use crate::config::ActivityConfig;
use crate::counter::ActivityCounter;
use crate::coordinator::QueryCoordinator;
use crate::fuzz::{JitterRng, RoundFn, RoundHalfUp, ThreadRng};
use crate::health;
use crate::ingest;
use crate::store::ActivityStore;
use crate::types::ActivityInfo;

/// Top-level facade wiring the Counter, Cache, Query Coordinator, and
/// Ingest path together over a shared store handle.
///
/// Generic over the injectable clock, RNG, and rounding capabilities
/// (§9's "re-architect as injectable capabilities" note) so production
/// code can default to `SystemClock`/`ThreadRng`/`RoundHalfUp` while tests
/// substitute deterministic stand-ins.
pub struct ActivityService<C = SystemClock, R = ThreadRng, F = RoundHalfUp>
where
    C: Clock,
    R: JitterRng,
    F: RoundFn,
{
    store: Arc<dyn ActivityStore>,
    clock: C,
    rng: R,
    round_fn: F,
    counter: ActivityCounter,
    cache: ResultCache,
    fuzz_threshold: u64,
}

impl ActivityService<SystemClock, ThreadRng, RoundHalfUp> {
    /// Builds a service with the production clock, RNG, and rounding mode.
    pub fn new(store: Arc<dyn ActivityStore>, config: ActivityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock: SystemClock,
            rng: ThreadRng,
            round_fn: RoundHalfUp,
            counter: ActivityCounter::new(config.window_seconds)?,
            cache: ResultCache::new(),
            fuzz_threshold: config.fuzz_threshold,
        })
    }
}

impl<C, R, F> ActivityService<C, R, F>
where
    C: Clock,
    R: JitterRng,
    F: RoundFn,
{
    /// Builds a service from fully specified collaborators; used by tests
    /// to inject a fixed clock, RNG, and rounding function.
    pub fn with_collaborators(
        store: Arc<dyn ActivityStore>,
        clock: C,
        rng: R,
        round_fn: F,
        config: ActivityConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            clock,
            rng,
            round_fn,
            counter: ActivityCounter::new(config.window_seconds)?,
            cache: ResultCache::new(),
            fuzz_threshold: config.fuzz_threshold,
        })
    }

    pub async fn is_healthy(&self) -> bool {
        health::is_healthy(self.store.as_ref()).await
    }

    pub async fn record_activity(&self, context_id: &str, visitor_id: &str) -> Result<()> {
        ingest::record_activity(
            self.store.as_ref(),
            &self.clock,
            &self.counter,
            context_id,
            visitor_id,
        )
        .await
    }

    pub async fn count_activity(&self, context_id: &str) -> Result<ActivityInfo> {
        self.coordinator().count_one(context_id).await
    }

    pub async fn count_activity_multi(
        &self,
        context_ids: &[String],
    ) -> Result<HashMap<String, ActivityInfo>> {
        self.coordinator().count_many(context_ids).await
    }

    fn coordinator(&self) -> QueryCoordinator<'_> {
        QueryCoordinator {
            store: self.store.as_ref(),
            clock: &self.clock,
            counter: &self.counter,
            cache: &self.cache,
            rng: &self.rng,
            round_fn: &self.round_fn,
            fuzz_threshold: self.fuzz_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BatchCommand;
    use async_trait::async_trait;
    use std::collections::HashMap as StdHashMap;
    use std::sync::Mutex;

    struct FixedClock(i64);
    impl Clock for FixedClock {
        fn now_unix_seconds(&self) -> i64 {
            self.0
        }
    }

    struct FixedRng(u64);
    impl JitterRng for FixedRng {
        fn uniform(&self, _max_inclusive: u64) -> u64 {
            self.0
        }
    }

    #[derive(Default)]
    struct FakeStore {
        strings: Mutex<StdHashMap<String, String>>,
        hlls: Mutex<StdHashMap<String, u64>>,
    }

    #[async_trait]
    impl ActivityStore for FakeStore {
        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
            let strings = self.strings.lock().unwrap();
            Ok(keys.iter().map(|k| strings.get(k).cloned()).collect())
        }

        async fn pfcount_many(&self, key_sets: &[Vec<String>]) -> Result<Vec<u64>> {
            let hlls = self.hlls.lock().unwrap();
            Ok(key_sets
                .iter()
                .map(|keys| keys.iter().filter_map(|k| hlls.get(k)).sum())
                .collect())
        }

        async fn execute_batch(&self, commands: Vec<BatchCommand>) -> Result<()> {
            for command in commands {
                match command {
                    BatchCommand::PfAdd { key, .. } => {
                        *self.hlls.lock().unwrap().entry(key).or_insert(0) += 1;
                    }
                    BatchCommand::ExpireAt { .. } => {}
                    BatchCommand::SetEx { key, value, .. } => {
                        self.strings.lock().unwrap().insert(key, value);
                    }
                }
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn record_then_count_reflects_the_write() {
        let store: Arc<dyn ActivityStore> = Arc::new(FakeStore::default());
        let service = ActivityService::with_collaborators(
            store,
            FixedClock(1202),
            FixedRng(0),
            RoundHalfUp,
            ActivityConfig {
                window_seconds: 900,
                fuzz_threshold: 100,
            },
        )
        .unwrap();

        service.record_activity("context", "visitor").await.unwrap();
        let info = service.count_activity("context").await.unwrap();
        assert_eq!(info.count, 1);
        assert!(info.is_fuzzed);
    }

    #[tokio::test]
    async fn invalid_ingest_id_is_silently_dropped() {
        let store: Arc<dyn ActivityStore> = Arc::new(FakeStore::default());
        let service = ActivityService::with_collaborators(
            store,
            FixedClock(1202),
            FixedRng(0),
            RoundHalfUp,
            ActivityConfig {
                window_seconds: 900,
                fuzz_threshold: 100,
            },
        )
        .unwrap();

        assert!(service.record_activity("bad id", "visitor").await.is_ok());
    }

    #[tokio::test]
    async fn empty_multi_count_short_circuits() {
        let store: Arc<dyn ActivityStore> = Arc::new(FakeStore::default());
        let service = ActivityService::with_collaborators(
            store,
            FixedClock(1202),
            FixedRng(0),
            RoundHalfUp,
            ActivityConfig {
                window_seconds: 900,
                fuzz_threshold: 100,
            },
        )
        .unwrap();

        let result = service.count_activity_multi(&[]).await.unwrap();
        assert!(result.is_empty());
    }
}
