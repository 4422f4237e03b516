//! Page chrome: navigation, dropdowns, the video modal, scroll effects, the
//! giveaway countdown and the testimonial carousel.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::{Interval, Timeout};
use lx_client::ClientConfig;
use lx_commerce::carousel::Carousel;
use lx_commerce::countdown::{Countdown, Tick};
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlIFrameElement, KeyboardEvent, MouseEvent};

use crate::dom;

/// Repeating timers owned by the page; dropping this cancels them.
#[derive(Default)]
pub struct PageTimers {
    countdown: Rc<RefCell<Option<Interval>>>,
    carousel: Option<Interval>,
}

pub fn init(config: &ClientConfig) -> PageTimers {
    init_navigation();
    init_dropdowns();
    init_video_modal();
    init_fade_in();
    PageTimers {
        countdown: init_countdown(config),
        carousel: init_carousel(config),
    }
}

fn init_navigation() {
    let (Some(hamburger), Some(menu)) = (dom::query(".hamburger"), dom::query(".nav-menu")) else {
        debug!("no mobile navigation");
        return;
    };
    {
        let (toggle, menu) = (hamburger.clone(), menu.clone());
        dom::on(&hamburger, "click", move |_: MouseEvent| {
            let open = !dom::has_class(&toggle, "active");
            dom::toggle_class(&toggle, "active", open);
            dom::toggle_class(&menu, "active", open);
        });
    }
    for link in dom::query_all(".nav-link") {
        let (hamburger, menu) = (hamburger.clone(), menu.clone());
        dom::on(&link, "click", move |_: MouseEvent| {
            dom::remove_class(&hamburger, "active");
            dom::remove_class(&menu, "active");
        });
    }

    if let (Some(window), Some(navbar)) = (dom::window(), dom::query(".navbar")) {
        let scrolled = window.clone();
        dom::on(&window, "scroll", move |_: Event| {
            let y = scrolled.scroll_y().unwrap_or_default();
            let (padding, background) = if y > 100.0 {
                ("10px 0", "rgba(26, 26, 26, 0.98)")
            } else {
                ("15px 0", "rgba(26, 26, 26, 0.95)")
            };
            dom::set_style(&navbar, "padding", padding);
            dom::set_style(&navbar, "background-color", background);
        });
    }
}

fn set_dropdown(button: &Element, open: bool) {
    if let Some(content) = button.next_element_sibling() {
        dom::toggle_class(&content, "active", open);
    }
    dom::toggle_class(button, "active", open);
    if let Some(icon) = dom::query_within(button, "i") {
        let angle = if open { "rotate(180deg)" } else { "rotate(0deg)" };
        dom::set_style(&icon, "transform", angle);
    }
}

fn init_dropdowns() {
    let buttons = Rc::new(dom::query_all(".dropdown-btn"));
    if buttons.is_empty() {
        return;
    }
    for button in buttons.iter() {
        let (all, this) = (buttons.clone(), button.clone());
        dom::on(button, "click", move |event: MouseEvent| {
            event.prevent_default();
            event.stop_propagation();
            let open = !dom::has_class(&this, "active");
            for other in all.iter().filter(|other| **other != this) {
                set_dropdown(other, false);
            }
            set_dropdown(&this, open);
        });
    }

    let Some(document) = dom::document() else {
        return;
    };
    {
        let all = buttons.clone();
        dom::on(&document, "click", move |event: MouseEvent| {
            let inside = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|t| dom::closest(&t, ".product-dropdown"))
                .is_some();
            if !inside {
                all.iter().for_each(|b| set_dropdown(b, false));
            }
        });
    }
    dom::on(&document, "keydown", move |event: KeyboardEvent| {
        if event.key() == "Escape" {
            buttons.iter().for_each(|b| set_dropdown(b, false));
        }
    });
}

fn init_video_modal() {
    let placeholders = dom::query_all(".video-placeholder");
    let (Some(modal), Some(player)) = (
        dom::query(".video-modal"),
        dom::by_id_typed::<HtmlIFrameElement>("video-player"),
    ) else {
        if !placeholders.is_empty() {
            debug!("video placeholders without a modal");
        }
        return;
    };

    for placeholder in placeholders {
        let (modal, player, source) = (modal.clone(), player.clone(), placeholder.clone());
        dom::on(&placeholder, "click", move |_: MouseEvent| {
            if let Some(url) = source.get_attribute("data-video").filter(|u| !u.is_empty()) {
                player.set_src(&url);
                dom::add_class(&modal, "active");
            }
        });
    }

    let close = {
        let (modal, player) = (modal.clone(), player.clone());
        move || {
            dom::remove_class(&modal, "active");
            player.set_src("");
        }
    };
    if let Some(button) = dom::query_within(&modal, ".close-modal") {
        let close = close.clone();
        dom::on(&button, "click", move |_: MouseEvent| close());
    }
    let backdrop = modal.clone();
    dom::on(&modal, "click", move |event: MouseEvent| {
        if dom::targets(&event, &backdrop) {
            close();
        }
    });
}

fn init_fade_in() {
    let elements = Rc::new(dom::query_all(".fade-in"));
    let Some(window) = dom::window() else {
        return;
    };
    if elements.is_empty() {
        return;
    }
    let check = {
        let window = window.clone();
        move || {
            let height = window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or_default();
            for el in elements.iter() {
                let rect = el.get_bounding_client_rect();
                if rect.top() <= height * 0.8 && rect.bottom() >= 0.0 {
                    dom::add_class(el, "visible");
                }
            }
        }
    };
    {
        let check = check.clone();
        Timeout::new(100, move || check()).forget();
    }
    for event in ["scroll", "resize"] {
        let check = check.clone();
        dom::on(&window, event, move |_: Event| check());
    }
}

fn init_countdown(config: &ClientConfig) -> Rc<RefCell<Option<Interval>>> {
    let slot = Rc::new(RefCell::new(None));
    let fields: Vec<(&'static str, Element)> = ["days", "hours", "minutes", "seconds"]
        .into_iter()
        .filter_map(|id| dom::by_id(id).map(|el| (id, el)))
        .collect();
    if fields.is_empty() {
        return slot;
    }

    let horizon = Duration::from_secs(u64::from(config.countdown_days) * 24 * 60 * 60);
    let countdown = Countdown::starting_at(js_sys::Date::now() as i64, horizon);
    let handle = slot.clone();
    let interval = Interval::new(1_000, move || {
        let tick = countdown.tick(js_sys::Date::now() as i64);
        for (id, text) in tick.display().fields() {
            if let Some((_, el)) = fields.iter().find(|(field, _)| *field == id) {
                dom::set_text(el, text);
            }
        }
        if let Tick::Finished(_) = tick {
            // Cancelled from a fresh task: the interval's closure is running.
            let handle = handle.clone();
            Timeout::new(0, move || drop(handle.borrow_mut().take())).forget();
        }
    });
    *slot.borrow_mut() = Some(interval);
    slot
}

fn init_carousel(config: &ClientConfig) -> Option<Interval> {
    let slides = Rc::new(dom::query_all(".testimonial-slide"));
    let carousel = Rc::new(RefCell::new(Carousel::new(slides.len())?));

    let show = {
        let slides = slides.clone();
        move |index: usize| {
            for (i, slide) in slides.iter().enumerate() {
                dom::toggle_class(slide, "active", i == index);
            }
        }
    };

    if let (Some(prev), Some(next)) = (dom::query(".testimonial-prev"), dom::query(".testimonial-next")) {
        {
            let (carousel, show) = (carousel.clone(), show.clone());
            dom::on(&next, "click", move |_: MouseEvent| {
                let index = carousel.borrow_mut().next();
                show(index);
            });
        }
        {
            let (carousel, show) = (carousel.clone(), show.clone());
            dom::on(&prev, "click", move |_: MouseEvent| {
                let index = carousel.borrow_mut().prev();
                show(index);
            });
        }
    }

    if !carousel.borrow().auto_advances() {
        return None;
    }
    Some(Interval::new(config.carousel_ms, move || {
        let index = carousel.borrow_mut().next();
        show(index);
    }))
}

impl PageTimers {
    pub fn countdown_running(&self) -> bool {
        self.countdown.borrow().is_some()
    }

    pub fn carousel_running(&self) -> bool {
        self.carousel.is_some()
    }
}
