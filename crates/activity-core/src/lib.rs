//! Rolling-window distinct-visitor activity counting over an external
//! key/value store: sliced-HLL rotation, a short-lived result cache, a
//! privacy-preserving fuzzing transform, and the query/ingest paths that
//! compose them.
//!
//! This crate is pure core logic — no network transport. An
//! `ActivityStore` implementation (e.g. `activity-redis`) supplies the
//! backing store; this crate never talks to one directly.

pub mod atoms;
pub mod cache;
pub mod clock;
pub mod config;
pub mod counter;
pub mod coordinator;
pub mod fuzz;
pub mod health;
pub mod ingest;
pub mod keys;
pub mod service;
pub mod store;
pub mod types;
pub mod validator;

pub use atoms::error::{ActivityError, Result};
pub use cache::ResultCache;
pub use clock::{current_slice, Clock, SystemClock};
pub use config::ActivityConfig;
pub use counter::ActivityCounter;
pub use coordinator::QueryCoordinator;
pub use fuzz::{JitterRng, RoundFn, RoundHalfUp, ThreadRng};
pub use health::is_healthy;
pub use ingest::{fingerprint, record_activity};
pub use keys::{cache_key, slice_key};
pub use service::ActivityService;
pub use store::{ActivityStore, BatchBuilder, BatchCommand};
pub use types::ActivityInfo;
pub use validator::is_valid_identifier;
