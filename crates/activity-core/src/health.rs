use crate::store::ActivityStore;

/// Pings the backing store and collapses any failure into `false`.
///
/// The caller (e.g. an HTTP gateway) is responsible for translating that
/// into whatever unhealthy response its transport uses; this crate never
/// produces a status code itself.
pub async fn is_healthy(store: &dyn ActivityStore) -> bool {
    store.ping().await.is_ok()
}
