use sha1::{Digest, Sha1};

use crate::atoms::error::Result;
use crate::clock::Clock;
use crate::counter::ActivityCounter;
use crate::store::ActivityStore;
use crate::validator::is_valid_identifier;

/// Records a single visitor hit against `context_id`.
///
/// Best-effort: an invalid `context_id` or `visitor_id` is silently
/// dropped rather than raised, so that a beacon endpoint fed attacker-
/// controlled input can't be turned into an error flood.
pub async fn record_activity(
    store: &dyn ActivityStore,
    clock: &dyn Clock,
    counter: &ActivityCounter,
    context_id: &str,
    visitor_id: &str,
) -> Result<()> {
    if !is_valid_identifier(context_id) || !is_valid_identifier(visitor_id) {
        return Ok(());
    }
    counter.record(store, clock, context_id, visitor_id).await
}

/// Fingerprints a visitor from their remote address and user-agent string,
/// matching the beacon endpoint's `visitor_id` derivation:
/// `sha1_hex(remote_addr_bytes + user_agent_bytes)`.
pub fn fingerprint(remote_addr: &str, user_agent: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(remote_addr.as_bytes());
    hasher.update(user_agent.as_bytes());
    hex::encode(hasher.finalize())
}
