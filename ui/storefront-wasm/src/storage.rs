//! `localStorage` behind the `KeyValueStore` seam.

use anyhow::{Result, anyhow};
use lx_storage::KeyValueStore;

use crate::dom;

/// Fails every call when the browser denies storage (private mode, disabled
/// cookies); the commerce store then carries on in memory.
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

impl BrowserStore {
    pub fn local() -> Self {
        let storage = dom::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage is unavailable");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| anyhow!("localStorage is unavailable"))
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|err| anyhow!("reading {key}: {}", dom::js_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| anyhow!("writing {key}: {}", dom::js_message(&err)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| anyhow!("removing {key}: {}", dom::js_message(&err)))
    }
}
