//! Page-level configuration.
//!
//! Pages may embed `<script type="application/json" id="lx-config">` with any
//! subset of these fields; everything else falls back to the defaults below.

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for API paths. Empty means same origin.
    pub api_base: String,
    pub cart_key: String,
    pub wishlist_key: String,
    pub notice_ms: u32,
    pub cart_animation_ms: u32,
    pub countdown_days: u32,
    pub carousel_ms: u32,
    /// Load every admin tab at start-up instead of on first activation.
    pub eager_admin_load: bool,
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            cart_key: "cart".to_owned(),
            wishlist_key: "wishlist".to_owned(),
            notice_ms: 3_000,
            cart_animation_ms: 500,
            countdown_days: 7,
            carousel_ms: 5_000,
            eager_admin_load: true,
            log_filter: "info".to_owned(),
        }
    }
}

impl ClientConfig {
    /// Parse an embedded config block, falling back to defaults on bad input.
    pub fn from_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "ignoring malformed client config");
                Self::default()
            }
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ClientConfig::from_json(r#"{"api_base": "https://shop.test/", "carousel_ms": 8000}"#);
        assert_eq!(config.carousel_ms, 8_000);
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.api_url("/api/cart/count"), "https://shop.test/api/cart/count");
    }

    #[test]
    fn malformed_config_is_ignored() {
        assert_eq!(ClientConfig::from_json("{oops"), ClientConfig::default());
        assert_eq!(ClientConfig::from_json(""), ClientConfig::default());
        assert_eq!(ClientConfig::default().api_url("/api/subscribe"), "/api/subscribe");
    }
}
