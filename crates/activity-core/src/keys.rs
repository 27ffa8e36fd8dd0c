/// Encodes a `(context_id, slice_index)` pair as a backing-store key, with
/// an optional integer offset applied to the slice index (may be negative).
///
/// Does not validate `context_id` — validation is the Validator's job,
/// upstream of anything that reaches the key space.
pub fn slice_key(context_id: &str, slice_index: i64, offset: i64) -> String {
    format!("{context_id}/{}", slice_index + offset)
}

/// Encodes the cache key for a context's memoized `ActivityInfo`.
pub fn cache_key(context_id: &str) -> String {
    format!("{context_id}/cached")
}
