//! Toast notifications.
//!
//! One toast at a time: a new notice removes whatever is on screen, slides in
//! shortly after insertion, and fades out after the configured lifetime.

use gloo_timers::callback::Timeout;
use lx_client::{Notice, Notifier};
use tracing::debug;
use web_sys::Element;

use crate::dom;

const SHOW_DELAY_MS: u32 = 10;
const FADE_MS: u32 = 300;

pub struct DomNotifier {
    lifetime_ms: u32,
}

impl DomNotifier {
    pub fn new(lifetime_ms: u32) -> Self {
        Self { lifetime_ms }
    }
}

fn dismiss(toast: Element) {
    dom::remove_class(&toast, "show");
    Timeout::new(FADE_MS, move || toast.remove()).forget();
}

impl Notifier for DomNotifier {
    fn notify(&self, notice: Notice) {
        for stale in dom::query_all(".notification") {
            stale.remove();
        }
        let (Some(body), Some(toast), Some(text), Some(close)) = (
            dom::body(),
            dom::create_element("div"),
            dom::create_element("span"),
            dom::create_element("button"),
        ) else {
            debug!(message = %notice.message, "no document for notification");
            return;
        };

        toast.set_class_name(&format!("notification {}", notice.kind.css_class()));
        dom::set_text(&text, &notice.message);
        close.set_class_name("notification-close");
        dom::set_text(&close, "\u{00d7}");
        let _ = toast.append_child(&text);
        let _ = toast.append_child(&close);
        if body.append_child(&toast).is_err() {
            return;
        }

        {
            let toast = toast.clone();
            dom::on(&close, "click", move |_: web_sys::MouseEvent| dismiss(toast.clone()));
        }
        {
            let toast = toast.clone();
            Timeout::new(SHOW_DELAY_MS, move || dom::add_class(&toast, "show")).forget();
        }
        Timeout::new(self.lifetime_ms, move || dismiss(toast)).forget();
    }
}
