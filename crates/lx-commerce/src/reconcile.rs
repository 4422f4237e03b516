//! Server-authoritative badge counts.

use lx_api_types::CartCountResponse;
use lx_client::calls::{self, get_json};
use lx_client::Transport;
use lx_storage::KeyValueStore;
use tracing::{debug, warn};

use crate::binder::{BadgeKind, CommerceBinder};

/// There is no wishlist count endpoint yet; set a path here to enable it.
pub const WISHLIST_COUNT_PATH: Option<&str> = None;

/// Fetch the session's cart count and let it override the local badge.
/// Failures are logged and otherwise ignored.
pub async fn reconcile_cart_count<S: KeyValueStore>(
    transport: &dyn Transport,
    binder: &CommerceBinder<S>,
) -> Option<u64> {
    match calls::fetch_cart_count(transport).await {
        Ok(Some(count)) => {
            debug!(count, "server cart count");
            binder.apply_server_count(BadgeKind::Cart, count);
            Some(count)
        }
        Ok(None) => {
            debug!("server reported no cart count");
            None
        }
        Err(err) => {
            warn!(error = %err, "failed to fetch cart count");
            None
        }
    }
}

pub async fn reconcile_wishlist_count<S: KeyValueStore>(
    transport: &dyn Transport,
    binder: &CommerceBinder<S>,
) -> Option<u64> {
    let Some(path) = WISHLIST_COUNT_PATH else {
        return None;
    };
    match get_json::<CartCountResponse>(transport, path).await {
        Ok(CartCountResponse { count: Some(count) }) => {
            binder.apply_server_count(BadgeKind::Wishlist, count);
            Some(count)
        }
        Ok(_) => None,
        Err(err) => {
            warn!(error = %err, "failed to fetch wishlist count");
            None
        }
    }
}
