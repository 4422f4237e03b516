//! Checkout page: the Stripe payment element and the PayPal buttons, both
//! loaded by the page as globals.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lx_client::Transport;
use lx_commerce::checkout::{
    self, CheckoutOrder, ORDER_CONFIRMATION_PATH, PaymentMethod, PaypalOutcome,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{Element, Event, HtmlInputElement};

use crate::dom;

#[wasm_bindgen]
extern "C" {
    type Stripe;
    type StripeElements;
    type StripePaymentElement;
    type PaypalButtons;

    #[wasm_bindgen(js_name = Stripe, catch)]
    fn stripe(publishable_key: &str) -> Result<Stripe, JsValue>;

    #[wasm_bindgen(method)]
    fn elements(this: &Stripe, options: &JsValue) -> StripeElements;

    #[wasm_bindgen(method, js_name = confirmPayment)]
    fn confirm_payment(this: &Stripe, options: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(method)]
    fn create(this: &StripeElements, kind: &str) -> StripePaymentElement;

    #[wasm_bindgen(method)]
    fn mount(this: &StripePaymentElement, selector: &str);

    #[wasm_bindgen(js_namespace = paypal, js_name = Buttons, catch)]
    fn paypal_buttons(options: &JsValue) -> Result<PaypalButtons, JsValue>;

    #[wasm_bindgen(method)]
    fn render(this: &PaypalButtons, selector: &str) -> js_sys::Promise;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementsOptions<'a> {
    appearance: Appearance,
    client_secret: &'a str,
}

#[derive(Serialize)]
struct Appearance {
    theme: &'static str,
}

struct CheckoutPage {
    transport: Rc<dyn Transport>,
    order: CheckoutOrder,
    form: Element,
    stripe_key: Option<String>,
    card_ready: Cell<bool>,
    paypal_ready: Cell<bool>,
    elements: RefCell<Option<(Stripe, StripeElements)>>,
}

fn field(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn set_error(message: &str) {
    if let Some(el) = dom::by_id("error-message") {
        dom::set_text(&el, message);
    }
}

impl CheckoutPage {
    fn selected_method() -> Option<PaymentMethod> {
        dom::query(r#"input[name="payment_method"]:checked"#)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.value().parse().ok())
    }

    fn show(self: &Rc<Self>, method: PaymentMethod) {
        let panels = method.panels();
        for (id, visible) in [("payment-element", panels.card), ("paypal-button-container", panels.paypal)] {
            if let Some(el) = dom::by_id(id) {
                dom::set_display(&el, if visible { "block" } else { "none" });
            }
        }
        match method {
            PaymentMethod::CreditCard if !self.card_ready.replace(true) => {
                let page = self.clone();
                wasm_bindgen_futures::spawn_local(async move { page.init_card().await });
            }
            PaymentMethod::Paypal if !self.paypal_ready.replace(true) => self.init_paypal(),
            _ => {}
        }
    }

    async fn init_card(self: Rc<Self>) {
        let Some(key) = self.stripe_key.as_deref() else {
            warn!("checkout form has no data-stripe-key");
            return;
        };
        let client_secret = match checkout::start_card_payment(self.transport.as_ref(), &self.order).await {
            Ok(secret) => secret,
            Err(err) => {
                set_error(&err.user_message());
                return;
            }
        };
        let stripe = match stripe(key) {
            Ok(stripe) => stripe,
            Err(err) => {
                warn!(error = %dom::js_message(&err), "Stripe.js is not loaded");
                return;
            }
        };
        let options = ElementsOptions {
            appearance: Appearance { theme: "stripe" },
            client_secret: &client_secret,
        };
        let options = match serde_wasm_bindgen::to_value(&options) {
            Ok(options) => options,
            Err(err) => {
                warn!(error = %err, "could not build Stripe options");
                return;
            }
        };
        let elements = stripe.elements(&options);
        elements.create("payment").mount("#payment-element");
        *self.elements.borrow_mut() = Some((stripe, elements));

        let page = self.clone();
        dom::on(&self.form, "submit", move |event: Event| {
            event.prevent_default();
            if Self::selected_method() != Some(PaymentMethod::CreditCard) {
                return;
            }
            let page = page.clone();
            wasm_bindgen_futures::spawn_local(async move { page.confirm_card().await });
        });
        info!(order_id = %self.order.order_id, "card payment ready");
    }

    async fn confirm_card(&self) {
        let promise = {
            let elements = self.elements.borrow();
            let Some((stripe, elements)) = elements.as_ref() else {
                return;
            };
            let origin = dom::window()
                .and_then(|w| w.location().origin().ok())
                .unwrap_or_default();
            let params = js_sys::Object::new();
            let confirm = js_sys::Object::new();
            let _ = js_sys::Reflect::set(
                &confirm,
                &"return_url".into(),
                &format!("{origin}{ORDER_CONFIRMATION_PATH}").into(),
            );
            let _ = js_sys::Reflect::set(&params, &"elements".into(), elements);
            let _ = js_sys::Reflect::set(&params, &"confirmParams".into(), &confirm);
            stripe.confirm_payment(&params)
        };
        match JsFuture::from(promise).await {
            Ok(result) => {
                if let Some(error) = field(&result, "error") {
                    let message = field(&error, "message")
                        .and_then(|m| m.as_string())
                        .unwrap_or_default();
                    set_error(&message);
                }
            }
            Err(err) => set_error(&dom::js_message(&err)),
        }
    }

    fn init_paypal(self: &Rc<Self>) {
        let create_order = {
            let page = self.clone();
            Closure::<dyn FnMut(JsValue, JsValue) -> js_sys::Promise>::new(move |_data: JsValue, _actions: JsValue| {
                let page = page.clone();
                future_to_promise(async move {
                    checkout::start_paypal_payment(page.transport.as_ref(), &page.order)
                        .await
                        .map(|id| JsValue::from_str(&id))
                        .map_err(|err| JsValue::from_str(&err.user_message()))
                })
            })
        };
        let on_approve = {
            let page = self.clone();
            Closure::<dyn FnMut(JsValue, JsValue) -> js_sys::Promise>::new(move |data: JsValue, _actions: JsValue| {
                let page = page.clone();
                let payment_id = field(&data, "paymentID").and_then(|v| v.as_string()).unwrap_or_default();
                let payer_id = field(&data, "payerID").and_then(|v| v.as_string()).unwrap_or_default();
                future_to_promise(async move {
                    match checkout::approve_paypal_payment(page.transport.as_ref(), &payment_id, &payer_id).await {
                        PaypalOutcome::Completed { redirect } => {
                            if let Some(window) = dom::window() {
                                let _ = window.location().set_href(redirect);
                            }
                        }
                        PaypalOutcome::Failed { alert } => {
                            if let Some(window) = dom::window() {
                                let _ = window.alert_with_message(&alert);
                            }
                        }
                    }
                    Ok(JsValue::UNDEFINED)
                })
            })
        };

        let options = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&options, &"createOrder".into(), create_order.as_ref());
        let _ = js_sys::Reflect::set(&options, &"onApprove".into(), on_approve.as_ref());
        match paypal_buttons(&options) {
            Ok(buttons) => {
                let _ = buttons.render("#paypal-button-container");
                create_order.forget();
                on_approve.forget();
            }
            Err(err) => warn!(error = %dom::js_message(&err), "PayPal SDK is not loaded"),
        }
    }
}

pub fn init(transport: Rc<dyn Transport>) {
    let Some(form) = dom::by_id("checkout-form") else {
        return;
    };
    let order = CheckoutOrder::from_attributes(
        form.get_attribute("data-order-id").as_deref(),
        form.get_attribute("data-amount").as_deref(),
    );
    let Some(order) = order else {
        warn!("checkout form is missing its order id or amount");
        return;
    };
    let page = Rc::new(CheckoutPage {
        transport,
        order,
        stripe_key: form.get_attribute("data-stripe-key"),
        form,
        card_ready: Cell::new(false),
        paypal_ready: Cell::new(false),
        elements: RefCell::new(None),
    });

    for radio in dom::query_all(r#"input[name="payment_method"]"#) {
        let page = page.clone();
        dom::on(&radio, "change", move |event: Event| {
            let method = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.value().parse::<PaymentMethod>().ok());
            match method {
                Some(method) => page.show(method),
                None => debug!("unknown payment method selected"),
            }
        });
    }
    match CheckoutPage::selected_method() {
        Some(method) => page.show(method),
        None => debug!("no payment method selected"),
    }
}
