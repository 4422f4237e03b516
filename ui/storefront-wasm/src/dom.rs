//! DOM helpers.
//!
//! Every lookup returns `Option`: pages only carry some of the widgets, and a
//! missing element turns the feature that needs it into a no-op.

use std::cell::RefCell;

use tracing::debug;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, EventTarget, HtmlElement, HtmlInputElement, HtmlTextAreaElement, Window};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    match document().and_then(|doc| doc.query_selector_all(selector).ok()) {
        Some(list) => collect(&list),
        None => Vec::new(),
    }
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    match parent.query_selector_all(selector) {
        Ok(list) => collect(&list),
        Err(_) => Vec::new(),
    }
}

pub fn query_within(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok()?
}

fn collect(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok()?
}

pub fn create_element(tag: &str) -> Option<Element> {
    document()?.create_element(tag).ok()
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn text_of(el: &Element) -> String {
    el.text_content().unwrap_or_default().trim().to_string()
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property(property, value);
    }
}

pub fn set_display(el: &Element, value: &str) {
    set_style(el, "display", value);
}

/// Trimmed value of an `<input>` or `<textarea>`.
pub fn field_value(el: &Element) -> String {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value().trim().to_string()
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.value().trim().to_string()
    } else {
        String::new()
    }
}

pub fn set_field_value(el: &Element, value: &str) {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    }
}

/// Attach a listener and hand back its closure; the listener stops working
/// once the closure is dropped.
pub fn listen<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static) -> Option<Closure<dyn FnMut(E)>>
where
    E: FromWasmAbi + 'static,
{
    let cb = Closure::<dyn FnMut(E)>::new(handler);
    match target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        Ok(()) => Some(cb),
        Err(err) => {
            debug!(event, error = ?err, "listener not attached");
            None
        }
    }
}

/// Attach a listener for the lifetime of the page.
pub fn on<E>(target: &EventTarget, event: &str, handler: impl FnMut(E) + 'static)
where
    E: FromWasmAbi + 'static,
{
    if let Some(cb) = listen(target, event, handler) {
        cb.forget();
    }
}

/// Listeners belonging to one render of a container. Installing the next
/// set drops the previous one, releasing whatever its closures captured.
pub struct Listeners<T> {
    current: RefCell<Vec<T>>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            current: RefCell::new(Vec::new()),
        }
    }
}

impl<T> Listeners<T> {
    /// Returns how many listeners were released.
    pub fn replace(&self, next: Vec<T>) -> usize {
        let previous = self.current.replace(next);
        previous.len()
    }

    pub fn len(&self) -> usize {
        self.current.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.borrow().is_empty()
    }
}

/// `true` when the event fired on `el` itself rather than a descendant.
pub fn targets(event: &web_sys::Event, el: &Element) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|t| &t == el)
}

pub fn js_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}
