use thiserror::Error;

pub type Result<T> = std::result::Result<T, ActivityError>;

/// Single canonical error enum for the counter service, built with
/// `thiserror`. Variants are coarse-grained by domain; store adapters
/// (e.g. `activity-redis`) map their own errors down into
/// `BackingStoreUnavailable` rather than leaking transport-specific types.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// A context_id or visitor_id failed the identifier grammar
    /// `^[A-Za-z0-9_]{0,50}$`. Surfaced from the count operations; the
    /// entire batch fails. The record path swallows this instead (§4.7).
    #[error("context_id or visitor_id failed the identifier grammar")]
    InvalidContextId,

    /// A command against the backing store failed or timed out.
    #[error("backing store unavailable: {0}")]
    BackingStoreUnavailable(String),

    /// Configuration failed validation at startup. Fatal; the process must
    /// refuse to serve rather than run with an inconsistent window/slice
    /// relationship.
    #[error("invalid activity configuration: {0}")]
    Configuration(String),
}
