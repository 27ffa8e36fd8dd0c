use async_trait::async_trait;

use crate::atoms::error::Result;

/// A single write-side command in a pipelined, transaction-free batch.
///
/// The backing store is not assumed to support transactions (§5); batches
/// are pipelined for round-trip efficiency only, not atomicity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchCommand {
    /// Adds `member` to the HLL sketch at `key`, creating it if absent.
    PfAdd { key: String, member: String },
    /// Sets an absolute expiration time on `key`.
    ExpireAt { key: String, unix_seconds: i64 },
    /// Sets `key` to `value` with a relative expiration in seconds.
    SetEx {
        key: String,
        ttl_seconds: u64,
        value: String,
    },
}

/// Accumulates [`BatchCommand`]s for a single pipelined round trip.
///
/// Every write path in this crate goes through a `BatchBuilder` rather than
/// issuing commands one at a time, so the number of backing-store round
/// trips stays independent of the number of keys touched.
#[derive(Debug, Default, Clone)]
pub struct BatchBuilder {
    commands: Vec<BatchCommand>,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pfadd(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.commands.push(BatchCommand::PfAdd {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn expire_at(&mut self, key: impl Into<String>, unix_seconds: i64) -> &mut Self {
        self.commands.push(BatchCommand::ExpireAt {
            key: key.into(),
            unix_seconds,
        });
        self
    }

    pub fn setex(
        &mut self,
        key: impl Into<String>,
        ttl_seconds: u64,
        value: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(BatchCommand::SetEx {
            key: key.into(),
            ttl_seconds,
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn into_commands(self) -> Vec<BatchCommand> {
        self.commands
    }
}

/// Abstraction over the backing KV store's activity-relevant surface.
///
/// This is the only seam between core logic and the transport: a fake
/// in-memory implementation backs this crate's own tests, while
/// `activity-redis` provides the real Redis-protocol implementation. Kept
/// small and dyn-compatible (`async-trait`) so it can be shared behind an
/// `Arc<dyn ActivityStore>` without generic contagion through call sites.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Round-trips a liveness probe to the backing store.
    async fn ping(&self) -> Result<()>;

    /// Fetches the raw string values for `keys` in one round trip. A
    /// missing key is `None` at the corresponding position.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// For each entry in `key_sets`, returns the merged HLL cardinality
    /// across that entry's keys, in one pipelined round trip. Positionally
    /// aligned with `key_sets`.
    async fn pfcount_many(&self, key_sets: &[Vec<String>]) -> Result<Vec<u64>>;

    /// Executes every command in `commands` as one pipelined, non-atomic
    /// batch.
    async fn execute_batch(&self, commands: Vec<BatchCommand>) -> Result<()>;
}
