use std::collections::HashMap;

use crate::atoms::constants::CACHE_TTL_SECONDS;
use crate::atoms::error::Result;
use crate::keys::cache_key;
use crate::store::{ActivityStore, BatchBuilder};
use crate::types::ActivityInfo;

/// Short-lived memoization of per-context `ActivityInfo`, absorbing read
/// bursts in front of the Counter. Shares the backing store with the
/// Counter but owns a disjoint key suffix (`/cached`) and speaks plain
/// string values rather than HLLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultCache;

impl ResultCache {
    pub fn new() -> Self {
        Self
    }

    /// Fetches cached entries for `context_ids` in one round trip. Context
    /// ids with no cache entry, or whose cached payload fails to decode,
    /// are simply absent from the returned map (treated as a miss; a decode
    /// failure is logged but not surfaced as an error).
    pub async fn get_many(
        &self,
        store: &dyn ActivityStore,
        context_ids: &[String],
    ) -> Result<HashMap<String, ActivityInfo>> {
        if context_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<String> = context_ids.iter().map(|id| cache_key(id)).collect();
        let raw = store.mget(&keys).await?;

        let mut hits = HashMap::with_capacity(context_ids.len());
        for (context_id, value) in context_ids.iter().zip(raw) {
            let Some(value) = value else { continue };
            match ActivityInfo::from_json(&value) {
                Ok(info) => {
                    hits.insert(context_id.clone(), info);
                }
                Err(err) => {
                    log::warn!(
                        "cache payload for {context_id:?} failed to decode, treating as a miss: {err}"
                    );
                }
            }
        }
        Ok(hits)
    }

    /// Refills the cache for every entry in `entries`, in one pipelined
    /// batch, each with the fixed cache TTL.
    pub async fn set_many(
        &self,
        store: &dyn ActivityStore,
        entries: &HashMap<String, ActivityInfo>,
    ) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut batch = BatchBuilder::new();
        for (context_id, info) in entries {
            batch.setex(cache_key(context_id), CACHE_TTL_SECONDS, info.to_json());
        }
        store.execute_batch(batch.into_commands()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BatchCommand;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        values: HashMap<String, String>,
        batches: Mutex<Vec<Vec<BatchCommand>>>,
    }

    #[async_trait]
    impl ActivityStore for FakeStore {
        async fn ping(&self) -> Result<()> {
            Ok(())
        }

        async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
            Ok(keys.iter().map(|k| self.values.get(k).cloned()).collect())
        }

        async fn pfcount_many(&self, key_sets: &[Vec<String>]) -> Result<Vec<u64>> {
            Ok(vec![0; key_sets.len()])
        }

        async fn execute_batch(&self, commands: Vec<BatchCommand>) -> Result<()> {
            self.batches.lock().unwrap().push(commands);
            Ok(())
        }
    }

    #[tokio::test]
    async fn get_many_skips_missing_and_malformed() {
        let mut values = HashMap::new();
        values.insert("a/cached".to_string(), r#"{"count":5,"is_fuzzed":false}"#.to_string());
        values.insert("b/cached".to_string(), "not json".to_string());
        let store = FakeStore {
            values,
            ..Default::default()
        };

        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let hits = ResultCache::new().get_many(&store, &ids).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits["a"], ActivityInfo::new(5, false));
    }

    #[tokio::test]
    async fn set_many_issues_one_batch() {
        let store = FakeStore::default();
        let mut entries = HashMap::new();
        entries.insert("a".to_string(), ActivityInfo::new(5, false));
        entries.insert("b".to_string(), ActivityInfo::new(9, true));

        ResultCache::new().set_many(&store, &entries).await.unwrap();

        let batches = store.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
    }

    #[tokio::test]
    async fn empty_input_short_circuits() {
        let store = FakeStore::default();
        let hits = ResultCache::new().get_many(&store, &[]).await.unwrap();
        assert!(hits.is_empty());
        ResultCache::new().set_many(&store, &HashMap::new()).await.unwrap();
        assert!(store.batches.lock().unwrap().is_empty());
    }
}
