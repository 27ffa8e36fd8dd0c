use std::time::Duration;

use activity_core::{ActivityError, ActivityStore, BatchCommand, Result};
use async_trait::async_trait;
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use serde::Deserialize;

/// Connection and timeout settings for a `RedisStore`.
///
/// Mirrors the `redis.*` options from §6's recognized configuration:
/// `redis.url` and `redis.max_connections`. `command_timeout` has no
/// spec-named knob but every command is bounded by one regardless, so a
/// stalled connection can't wedge a caller forever.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisStoreConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(rename = "command_timeout_millis", with = "duration_millis")]
    pub command_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1/".to_string(),
            max_connections: 100,
            command_timeout: Duration::from_millis(100),
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// `ActivityStore` backed by a pooled Redis connection.
///
/// Every operation is one pipelined, non-atomic round trip to the pool
/// (§5's concurrency contract): the pipeline is never wrapped in
/// `MULTI`/`EXEC`, since the spec explicitly calls for transaction-free
/// batching, not atomicity.
pub struct RedisStore {
    pool: Pool<RedisConnectionManager>,
    command_timeout: Duration,
}

impl RedisStore {
    /// Builds the connection pool and verifies connectivity with a PING.
    pub async fn connect(config: &RedisStoreConfig) -> Result<Self> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|err| ActivityError::BackingStoreUnavailable(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .build(manager)
            .await
            .map_err(|err| ActivityError::BackingStoreUnavailable(err.to_string()))?;

        let store = Self {
            pool,
            command_timeout: config.command_timeout,
        };
        store.ping().await?;
        Ok(store)
    }

    async fn timed<T, Fut>(&self, fut: Fut) -> Result<T>
    where
        Fut: std::future::Future<Output = redis::RedisResult<T>>,
    {
        tokio::time::timeout(self.command_timeout, fut)
            .await
            .map_err(|_| {
                log::warn!(
                    "redis command exceeded the {:?} timeout",
                    self.command_timeout
                );
                ActivityError::BackingStoreUnavailable("command timed out".into())
            })?
            .map_err(|err| {
                log::warn!("redis command failed: {err}");
                store_err(err)
            })
    }

    async fn checkout(&self) -> Result<bb8::PooledConnection<'_, RedisConnectionManager>> {
        self.pool.get().await.map_err(|err| {
            log::warn!("redis pool checkout failed: {err}");
            ActivityError::BackingStoreUnavailable(format!("pool checkout failed: {err}"))
        })
    }
}

fn store_err(err: redis::RedisError) -> ActivityError {
    ActivityError::BackingStoreUnavailable(err.to_string())
}

#[async_trait]
impl ActivityStore for RedisStore {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.checkout().await?;
        self.timed(redis::cmd("PING").query_async::<_, ()>(&mut *conn))
            .await
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.checkout().await?;
        self.timed(
            redis::cmd("MGET")
                .arg(keys)
                .query_async::<_, Vec<Option<String>>>(&mut *conn),
        )
        .await
    }

    async fn pfcount_many(&self, key_sets: &[Vec<String>]) -> Result<Vec<u64>> {
        if key_sets.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.checkout().await?;

        let mut pipe = redis::pipe();
        for keys in key_sets {
            pipe.cmd("PFCOUNT").arg(keys);
        }
        self.timed(pipe.query_async::<_, Vec<u64>>(&mut *conn)).await
    }

    async fn execute_batch(&self, commands: Vec<BatchCommand>) -> Result<()> {
        if commands.is_empty() {
            return Ok(());
        }
        let mut conn = self.checkout().await?;

        let mut pipe = redis::pipe();
        for command in commands {
            match command {
                BatchCommand::PfAdd { key, member } => {
                    pipe.cmd("PFADD").arg(key).arg(member).ignore();
                }
                BatchCommand::ExpireAt { key, unix_seconds } => {
                    pipe.cmd("EXPIREAT").arg(key).arg(unix_seconds).ignore();
                }
                BatchCommand::SetEx {
                    key,
                    ttl_seconds,
                    value,
                } => {
                    pipe.cmd("SETEX").arg(key).arg(ttl_seconds).arg(value).ignore();
                }
            }
        }
        self.timed(pipe.query_async::<_, ()>(&mut *conn)).await
    }
}
