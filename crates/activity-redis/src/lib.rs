//! Redis-backed `ActivityStore`: a pooled, pipelined adapter over the
//! `redis` crate's async connection support.

mod store;

pub use store::{RedisStore, RedisStoreConfig};
