// ── Activity Core Atoms ────────────────────────────────────────────────────
// Pure constants and error types — zero side effects, no I/O.
// Dependency rule: atoms may only depend on std and external pure crates.
// Nothing here may import from the component modules above it.

pub mod constants;
pub mod error;
