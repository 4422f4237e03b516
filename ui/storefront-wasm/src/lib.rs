//! Browser entry point for the storefront, checkout and back-office pages.
//!
//! The page type is detected from the markup: `#tab-title` marks the admin
//! dashboard, `#checkout-form` the checkout page; anything else is treated as
//! a storefront page.

pub mod admin;
pub mod api;
pub mod checkout;
pub mod config;
pub mod dom;
pub mod forms;
pub mod logging;
pub mod notify;
pub mod shop;
pub mod storage;
pub mod widgets;

use std::cell::RefCell;
use std::rc::Rc;

use lx_client::{Notifier, Transport};
use tracing::info;
use wasm_bindgen::prelude::*;

thread_local! {
    static TIMERS: RefCell<Option<widgets::PageTimers>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Storefront,
    Checkout,
    Admin,
}

impl Page {
    fn detect() -> Self {
        if dom::by_id("tab-title").is_some() {
            Page::Admin
        } else if dom::by_id("checkout-form").is_some() {
            Page::Checkout
        } else {
            Page::Storefront
        }
    }
}

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = config::load();
    logging::init(&config.log_filter);

    let page = Page::detect();
    info!(?page, api_base = %config.api_base, "starting");
    let transport: Rc<dyn Transport> = Rc::new(api::FetchTransport::new(&config));

    if page == Page::Admin {
        return admin::init(&config, transport);
    }

    let notifier: Rc<dyn Notifier> = Rc::new(notify::DomNotifier::new(config.notice_ms));
    let timers = widgets::init(&config);
    info!(
        countdown = timers.countdown_running(),
        carousel = timers.carousel_running(),
        "page widgets started"
    );
    TIMERS.with(|slot| *slot.borrow_mut() = Some(timers));

    forms::init(transport.clone(), notifier.clone());
    let binder = shop::init(&config, notifier);
    shop::reconcile(transport.clone(), binder);

    if page == Page::Checkout {
        checkout::init(transport);
    }
    Ok(())
}
