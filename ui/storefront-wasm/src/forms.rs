//! Newsletter, contact and giveaway-entry form submission.

use std::rc::Rc;

use lx_client::{Notifier, Transport};
use lx_commerce::forms::{self, ContactInput, FormOutcome};
use web_sys::{Event, HtmlFormElement};

use crate::dom;

#[derive(Clone, Copy)]
enum Kind {
    Newsletter,
    Contact,
    Giveaway,
}

const FORMS: [(&str, Kind); 3] = [
    ("newsletter-form", Kind::Newsletter),
    ("contact-form", Kind::Contact),
    ("giveaway-form", Kind::Giveaway),
];

fn field(form: &HtmlFormElement, selector: &str) -> String {
    dom::query_within(form, selector)
        .map(|el| dom::field_value(&el))
        .unwrap_or_default()
}

async fn submit(kind: Kind, form: &HtmlFormElement, transport: &dyn Transport, notifier: &dyn Notifier) -> FormOutcome {
    let email = field(form, r#"input[type="email"]"#);
    match kind {
        Kind::Newsletter => forms::submit_newsletter(transport, notifier, &email).await,
        Kind::Giveaway => forms::submit_giveaway_entry(transport, notifier, &email).await,
        Kind::Contact => {
            let input = ContactInput {
                name: field(form, r#"input[type="text"]"#),
                email,
                message: field(form, "textarea"),
            };
            forms::submit_contact(transport, notifier, &input).await
        }
    }
}

pub fn init(transport: Rc<dyn Transport>, notifier: Rc<dyn Notifier>) {
    for (id, kind) in FORMS {
        let Some(form) = dom::by_id_typed::<HtmlFormElement>(id) else {
            continue;
        };
        let (transport, notifier, target) = (transport.clone(), notifier.clone(), form.clone());
        dom::on(&form, "submit", move |event: Event| {
            event.prevent_default();
            let (transport, notifier, form) = (transport.clone(), notifier.clone(), target.clone());
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = submit(kind, &form, transport.as_ref(), notifier.as_ref()).await;
                if outcome.should_reset() {
                    form.reset();
                }
            });
        });
    }
}
