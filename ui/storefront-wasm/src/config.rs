//! Reads the page's embedded `#lx-config` block.

use lx_client::ClientConfig;

use crate::dom;

pub fn load() -> ClientConfig {
    dom::by_id("lx-config")
        .and_then(|el| el.text_content())
        .map(|raw| ClientConfig::from_json(&raw))
        .unwrap_or_default()
}
