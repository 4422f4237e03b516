//! Product-card wishlist and cart buttons, and the navigation badges.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use lx_client::{ClientConfig, Notifier, Transport};
use lx_commerce::reconcile::{reconcile_cart_count, reconcile_wishlist_count};
use lx_commerce::{
    BadgeKind, BadgeView, Clock, CommerceBinder, IndicatorSurface, LocalCommerceStore, ProductRef,
    StorageKeys,
};
use tracing::{debug, info};
use web_sys::{Element, MouseEvent};

use crate::dom;
use crate::storage::BrowserStore;

pub type ShopBinder = CommerceBinder<BrowserStore>;

pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

/// Badges hang off the `/cart` and `/wishlist` navigation links.
pub struct NavBadges;

impl NavBadges {
    fn badge(kind: BadgeKind) -> Option<Element> {
        if let Some(existing) = dom::by_id(kind.element_id()) {
            return Some(existing);
        }
        let link = dom::query(&format!(r#"a[href="{}"]"#, kind.link_href()))?;
        let badge = dom::create_element("span")?;
        badge.set_id(kind.element_id());
        badge.set_class_name(kind.element_id());
        link.append_child(&badge).ok()?;
        Some(badge)
    }
}

impl IndicatorSurface for NavBadges {
    fn show_badge(&self, kind: BadgeKind, view: &BadgeView) {
        let Some(badge) = Self::badge(kind) else {
            debug!(badge = kind.element_id(), "no navigation link for badge");
            return;
        };
        if view.visible {
            dom::set_text(&badge, &view.text);
            dom::set_display(&badge, "flex");
        } else {
            dom::set_display(&badge, "none");
        }
    }
}

fn product_for(button: &Element) -> Option<ProductRef> {
    let card = dom::closest(button, ".product-card")?;
    let id = card.get_attribute("data-product-id")?;
    let name = dom::query_within(&card, ".product-title")
        .map(|title| dom::text_of(&title))
        .unwrap_or_default();
    let data_price = button.get_attribute("data-price");
    Some(ProductRef::from_card(&id, &name, data_price.as_deref(), &dom::text_of(button)))
}

pub fn init(config: &ClientConfig, notifier: Rc<dyn Notifier>) -> Rc<ShopBinder> {
    let keys = StorageKeys {
        cart: config.cart_key.clone(),
        wishlist: config.wishlist_key.clone(),
    };
    let store = LocalCommerceStore::with_keys(BrowserStore::local(), keys, Rc::new(JsClock), notifier);
    let binder = Rc::new(CommerceBinder::new(store, Rc::new(NavBadges)));

    let mut bound = 0;
    for button in dom::query_all(".action-btn.wishlist") {
        if let Some(product) = product_for(&button) {
            button.set_inner_html(binder.wishlist_control(&product.id).label_html());
        }
        let binder = binder.clone();
        let target = button.clone();
        dom::on(&button, "click", move |event: MouseEvent| {
            event.prevent_default();
            event.stop_propagation();
            let Some(product) = product_for(&target) else {
                debug!("wishlist button outside a product card");
                return;
            };
            let control = binder.on_wishlist_click(&product);
            target.set_inner_html(control.label_html());
        });
        bound += 1;
    }

    let animation_ms = config.cart_animation_ms;
    for button in dom::query_all(".action-btn.cart") {
        let binder = binder.clone();
        let target = button.clone();
        dom::on(&button, "click", move |event: MouseEvent| {
            event.prevent_default();
            event.stop_propagation();
            let Some(product) = product_for(&target) else {
                debug!("cart button outside a product card");
                return;
            };
            binder.on_cart_click(&product);
            dom::add_class(&target, "adding");
            let target = target.clone();
            Timeout::new(animation_ms, move || dom::remove_class(&target, "adding")).forget();
        });
        bound += 1;
    }

    binder.refresh_indicators();
    info!(bound, degraded = binder.store().is_degraded(), "storefront controls bound");
    binder
}

/// Let the backend's counts override the local badges once they arrive.
pub fn reconcile(transport: Rc<dyn Transport>, binder: Rc<ShopBinder>) {
    wasm_bindgen_futures::spawn_local(async move {
        reconcile_cart_count(transport.as_ref(), &binder).await;
        reconcile_wishlist_count(transport.as_ref(), &binder).await;
    });
}
