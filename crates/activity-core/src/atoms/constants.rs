// ── Activity Core: Constants ───────────────────────────────────────────────
// Named constants for the crate live here, collected in one place to keep
// magic numbers out of the component modules.

/// Width of one rotating HLL time slice, in seconds.
pub const SLICE_LENGTH_SECONDS: i64 = 15;

/// How long a cached `ActivityInfo` is considered fresh, in seconds.
pub const CACHE_TTL_SECONDS: u64 = 30;

/// Decay constant used by the fuzzing transform's jitter ceiling.
pub const FUZZ_DECAY_SECONDS: f64 = 60.0;

/// Upper bound on context_id / visitor_id length, per the identifier grammar.
pub const MAX_IDENTIFIER_LENGTH: usize = 50;

/// Upper bound on context_id length accepted by the pixel beacon route.
pub const MAX_PIXEL_CONTEXT_ID_LENGTH: usize = 40;
