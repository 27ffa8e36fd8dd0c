use std::collections::HashMap;

use crate::atoms::error::{ActivityError, Result};
use crate::cache::ResultCache;
use crate::clock::Clock;
use crate::counter::ActivityCounter;
use crate::fuzz::{self, JitterRng, RoundFn};
use crate::store::ActivityStore;
use crate::types::ActivityInfo;
use crate::validator::is_valid_identifier;

/// Composes Validator → Cache → Counter → Fuzzing → Cache-refill into the
/// query path. Borrows every collaborator for the duration of a single
/// call; it owns no state of its own.
pub struct QueryCoordinator<'a> {
    pub store: &'a dyn ActivityStore,
    pub clock: &'a dyn Clock,
    pub counter: &'a ActivityCounter,
    pub cache: &'a ResultCache,
    pub rng: &'a dyn JitterRng,
    pub round_fn: &'a dyn RoundFn,
    pub fuzz_threshold: u64,
}

impl<'a> QueryCoordinator<'a> {
    /// Thin wrapper over `count_many` for a single id.
    pub async fn count_one(&self, context_id: &str) -> Result<ActivityInfo> {
        let ids = vec![context_id.to_string()];
        let mut result = self.count_many(&ids).await?;
        Ok(result.remove(context_id).unwrap_or(ActivityInfo::new(0, false)))
    }

    /// Validates, probes the cache, fills misses from the Counter, fuzzes
    /// new results, refills the cache, and returns the merged map.
    ///
    /// Duplicate ids in `context_ids` collapse to a single key in the
    /// result map. Empty input returns an empty map with no backing-store
    /// calls.
    pub async fn count_many(
        &self,
        context_ids: &[String],
    ) -> Result<HashMap<String, ActivityInfo>> {
        if context_ids.is_empty() {
            return Ok(HashMap::new());
        }

        for id in context_ids {
            if !is_valid_identifier(id) {
                return Err(ActivityError::InvalidContextId);
            }
        }

        let mut hits = self.cache.get_many(self.store, context_ids).await?;

        let missing: Vec<String> = context_ids
            .iter()
            .filter(|id| !hits.contains_key(*id))
            .cloned()
            .collect();

        if missing.is_empty() {
            return Ok(hits);
        }

        let raw_counts = self
            .counter
            .count_many(self.store, self.clock, &missing)
            .await?;

        let mut fresh = HashMap::with_capacity(missing.len());
        for (id, raw_count) in missing.into_iter().zip(raw_counts) {
            let info = fuzz::from_count(self.fuzz_threshold, raw_count, self.rng, self.round_fn);
            fresh.insert(id, info);
        }

        if !fresh.is_empty() {
            self.cache.set_many(self.store, &fresh).await?;
        }

        hits.extend(fresh);
        Ok(hits)
    }
}
