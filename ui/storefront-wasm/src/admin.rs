//! Back-office page: DOM implementations of the admin view seams and the
//! wiring of every tab.

use std::rc::Rc;

use lx_admin::dashboard::{Dashboard, StatsView};
use lx_admin::resources::{Giveaways, Messages, Products, RecentMessages, Sections, Subscribers, Videos};
use lx_admin::row::rows_html;
use lx_admin::{
    ActionHandler, AdminContext, Dialogs, EditorSpec, EditorView, FieldKind, FieldValue, LocalTask, Loadable,
    Resource, ResourceController, Row, RowAction, Spawner, TabRouter, TabView, TableView,
};
use lx_api_types::{RecordId, SectionVisibility};
use lx_client::{ClientConfig, MultipartForm, Transport};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, HtmlFormElement, HtmlInputElement, MouseEvent};

use crate::dom;

// ── Seams ──

/// A `<tbody>` (or card container) replaced wholesale on each load.
pub struct DomTable {
    container_id: &'static str,
    buttons: dom::Listeners<Closure<dyn FnMut(MouseEvent)>>,
}

impl DomTable {
    pub fn new(container_id: &'static str) -> Rc<Self> {
        Rc::new(Self {
            container_id,
            buttons: dom::Listeners::default(),
        })
    }
}

impl TableView for DomTable {
    fn replace_rows(&self, rows: &[Row], actions: &[RowAction]) {
        match dom::by_id(self.container_id) {
            Some(container) => container.set_inner_html(&rows_html(rows, actions)),
            None => debug!(container = self.container_id, "table container missing"),
        }
    }

    // Row actions spawn their network work, so no listener being released
    // here is still on the stack.
    fn bind_actions(&self, actions: &[RowAction], handler: ActionHandler) -> usize {
        let mut bound = Vec::new();
        if let Some(container) = dom::by_id(self.container_id) {
            for action in actions {
                for button in dom::query_all_within(&container, &action.selector()) {
                    let Some(id) = button.get_attribute("data-id") else {
                        continue;
                    };
                    let (handler, kind) = (handler.clone(), action.kind);
                    let listener = dom::listen(&button, "click", move |_: MouseEvent| {
                        handler(kind, RecordId::new(id.clone()))
                    });
                    bound.extend(listener);
                }
            }
        }
        let count = bound.len();
        let released = self.buttons.replace(bound);
        debug!(container = self.container_id, count, released, "row actions bound");
        count
    }
}

pub struct WindowDialogs;

impl Dialogs for WindowDialogs {
    fn confirm(&self, prompt: &str) -> bool {
        dom::window()
            .and_then(|w| w.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(window) = dom::window() {
            let _ = window.alert_with_message(message);
        }
    }
}

pub struct LocalSpawner;

impl Spawner for LocalSpawner {
    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

pub struct StatsPanel;

impl StatsView for StatsPanel {
    fn show_stat(&self, element_id: &str, value: &str) {
        if let Some(el) = dom::by_id(element_id) {
            dom::set_text(&el, value);
        }
    }
}

/// Panels are `#<id>-tab`; menu entries carry `data-tab="<id>"`.
pub struct DomTabs;

impl TabView for DomTabs {
    fn set_active(&self, tab_id: &str, active: bool) {
        if let Some(panel) = dom::by_id(&format!("{tab_id}-tab")) {
            dom::toggle_class(&panel, "active", active);
        }
        for item in dom::query_all(&format!(r#".menu-item[data-tab="{tab_id}"]"#)) {
            dom::toggle_class(&item, "active", active);
        }
    }

    fn set_title(&self, title: &str) {
        if let Some(heading) = dom::by_id("tab-title") {
            dom::set_text(&heading, title);
        }
    }
}

// ── Editor modals ──

/// Element ids of one resource's modal form.
#[derive(Clone, Copy)]
struct EditorIds {
    modal: &'static str,
    form: &'static str,
    title: &'static str,
    open_button: &'static str,
    preview: Option<(&'static str, &'static str)>,
}

const PRODUCT_MODAL: EditorIds = EditorIds {
    modal: "product-modal",
    form: "product-form",
    title: "product-modal-title",
    open_button: "add-product-btn",
    preview: Some(("product-image", "image-preview")),
};

const VIDEO_MODAL: EditorIds = EditorIds {
    modal: "video-form-modal",
    form: "video-form",
    title: "video-modal-title",
    open_button: "add-video-btn",
    preview: None,
};

const GIVEAWAY_MODAL: EditorIds = EditorIds {
    modal: "giveaway-modal",
    form: "giveaway-form",
    title: "giveaway-modal-title",
    open_button: "set-giveaway-btn",
    preview: None,
};

pub struct DomEditor {
    ids: EditorIds,
    spec: &'static EditorSpec,
}

impl DomEditor {
    fn input_for(&self, name: &str) -> Option<Element> {
        let field = self.spec.fields.iter().find(|f| f.name == name)?;
        dom::by_id(field.input_id)
    }

    /// Read the form into a multipart body, loading any chosen files.
    async fn collect(&self) -> Result<MultipartForm, JsValue> {
        let mut form = MultipartForm::new();
        for field in self.spec.fields {
            let Some(el) = dom::by_id(field.input_id) else {
                continue;
            };
            match field.kind {
                FieldKind::Text => form.push_text(field.name, dom::field_value(&el)),
                FieldKind::Checkbox => {
                    let checked = el.dyn_ref::<HtmlInputElement>().is_some_and(|i| i.checked());
                    form.push_text(field.name, checked.to_string());
                }
                FieldKind::File => {
                    let file = el
                        .dyn_ref::<HtmlInputElement>()
                        .and_then(|input| input.files())
                        .and_then(|files| files.get(0));
                    if let Some(file) = file {
                        let buffer = JsFuture::from(file.array_buffer()).await?;
                        let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                        form.push_file(field.name, file.name(), file.type_(), bytes);
                    }
                }
            }
        }
        Ok(form)
    }
}

impl EditorView for DomEditor {
    fn open(&self, title: &str, values: &[(&'static str, FieldValue)]) {
        if let Some(form) = dom::by_id_typed::<HtmlFormElement>(self.ids.form) {
            form.reset();
        }
        if let Some(heading) = dom::by_id(self.ids.title) {
            dom::set_text(&heading, title);
        }
        if let Some(preview) = self.ids.preview.and_then(|(_, id)| dom::by_id(id)) {
            preview.set_inner_html("");
        }
        for (name, value) in values {
            let Some(input) = self.input_for(name) else {
                continue;
            };
            match value {
                FieldValue::Text(text) => dom::set_field_value(&input, text),
                FieldValue::Checked(checked) => {
                    if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
                        input.set_checked(*checked);
                    }
                }
            }
        }
        if let Some(modal) = dom::by_id(self.ids.modal) {
            dom::add_class(&modal, "active");
        }
    }

    fn close(&self) {
        if let Some(modal) = dom::by_id(self.ids.modal) {
            dom::remove_class(&modal, "active");
        }
    }
}

fn bind_image_preview(input_id: &str, preview_id: &'static str) {
    let Some(input) = dom::by_id_typed::<HtmlInputElement>(input_id) else {
        return;
    };
    let source = input.clone();
    dom::on(&input, "change", move |_: Event| {
        let Some(file) = source.files().and_then(|files| files.get(0)) else {
            return;
        };
        let (Ok(url), Some(preview)) = (web_sys::Url::create_object_url_with_blob(&file), dom::by_id(preview_id))
        else {
            return;
        };
        let img = format!(r#"<img src="{url}" alt="Preview">"#);
        preview.set_inner_html(&img);
    });
}

/// Wire the modal's open button, dismissal and submission to `controller`.
fn bind_editor<R: Resource>(controller: &Rc<ResourceController<R>>, editor: Rc<DomEditor>) {
    let ids = editor.ids;
    if let Some(button) = dom::by_id(ids.open_button) {
        let controller = controller.clone();
        dom::on(&button, "click", move |_: MouseEvent| {
            if let Err(err) = controller.open_create() {
                debug!(error = %err, "editor not opened");
            }
        });
    }

    if let Some(modal) = dom::by_id(ids.modal) {
        let dismiss = {
            let controller = controller.clone();
            move || {
                if let Err(err) = controller.close_editor() {
                    debug!(error = %err, "editor not closed");
                }
            }
        };
        if let Some(close) = dom::query_within(&modal, ".close-modal") {
            let dismiss = dismiss.clone();
            dom::on(&close, "click", move |_: MouseEvent| dismiss());
        }
        let backdrop = modal.clone();
        dom::on(&modal, "click", move |event: MouseEvent| {
            if dom::targets(&event, &backdrop) {
                dismiss();
            }
        });
    }

    if let Some((input, preview)) = ids.preview {
        bind_image_preview(input, preview);
    }

    let Some(form) = dom::by_id(ids.form) else {
        debug!(form = ids.form, "editor form missing");
        return;
    };
    let controller = controller.clone();
    dom::on(&form, "submit", move |event: Event| {
        event.prevent_default();
        let (controller, editor) = (controller.clone(), editor.clone());
        wasm_bindgen_futures::spawn_local(async move {
            let form = match editor.collect().await {
                Ok(form) => form,
                Err(err) => {
                    warn!(error = %dom::js_message(&err), "could not read the form");
                    controller.dialogs().alert(lx_client::GENERIC_FAILURE);
                    return;
                }
            };
            if let Err(err) = controller.submit(form).await {
                debug!(error = %err, "submit ignored");
            }
        });
    });
}

fn editable<R: Resource>(
    resource: R,
    ctx: &AdminContext,
    table: &'static str,
    ids: EditorIds,
) -> Rc<ResourceController<R>> {
    let Some(spec) = resource.editor() else {
        return ResourceController::new(resource, ctx.clone(), DomTable::new(table), None);
    };
    let editor = Rc::new(DomEditor { ids, spec });
    let controller = ResourceController::new(resource, ctx.clone(), DomTable::new(table), Some(editor.clone()));
    bind_editor(&controller, editor);
    controller
}

// ── Page ──

fn bind_section_save(sections: Rc<ResourceController<Sections>>) {
    let Some(button) = dom::by_id("save-sections-btn") else {
        return;
    };
    dom::on(&button, "click", move |_: MouseEvent| {
        let toggles: Vec<SectionVisibility> =
            dom::query_all(r#"#section-visibility input[type="checkbox"]"#)
                .into_iter()
                .filter_map(|el| {
                    let section_name = el.get_attribute("data-section")?;
                    let visible = el.dyn_ref::<HtmlInputElement>()?.checked();
                    Some(SectionVisibility { section_name, visible })
                })
                .collect();
        let sections = sections.clone();
        wasm_bindgen_futures::spawn_local(async move {
            sections.save_visibility(&toggles).await;
        });
    });
}

fn bind_profile_menu() {
    let (Some(profile), Some(document)) = (dom::query(".user-profile"), dom::document()) else {
        return;
    };
    let toggle = profile.clone();
    dom::on(&profile, "click", move |event: MouseEvent| {
        event.stop_propagation();
        let open = !dom::has_class(&toggle, "active");
        dom::toggle_class(&toggle, "active", open);
    });
    dom::on(&document, "click", move |_: MouseEvent| dom::remove_class(&profile, "active"));
}

pub fn init(config: &ClientConfig, transport: Rc<dyn Transport>) -> Result<(), JsValue> {
    let ctx = AdminContext {
        transport,
        dialogs: Rc::new(WindowDialogs),
        spawner: Rc::new(LocalSpawner),
    };

    let products = editable(Products, &ctx, "products-table", PRODUCT_MODAL);
    let videos = editable(Videos, &ctx, "videos-table", VIDEO_MODAL);
    let giveaway = editable(Giveaways, &ctx, "giveaway-table", GIVEAWAY_MODAL);
    let sections = ResourceController::new(Sections, ctx.clone(), DomTable::new("section-visibility"), None);
    let messages = ResourceController::new(Messages, ctx.clone(), DomTable::new("messages-table"), None);
    let subscribers =
        ResourceController::new(Subscribers, ctx.clone(), DomTable::new("subscribers-table"), None);
    let recent = ResourceController::new(RecentMessages, ctx.clone(), DomTable::new("recent-messages"), None);
    let dashboard = Rc::new(Dashboard::new(&ctx, Rc::new(StatsPanel), recent));
    bind_section_save(sections.clone());
    bind_profile_menu();

    let initial = dom::query(".menu-item.active[data-tab]")
        .and_then(|item| item.get_attribute("data-tab"))
        .unwrap_or_else(|| "dashboard".to_string());
    let router = Rc::new(TabRouter::new(Rc::new(DomTabs), &initial).map_err(|e| JsValue::from_str(&e.to_string()))?);

    let loaders: [(&str, Rc<dyn Loadable>); 7] = [
        ("dashboard", dashboard),
        ("products", products),
        ("sections", sections),
        ("messages", messages),
        ("subscribers", subscribers),
        ("videos", videos),
        ("giveaway", giveaway),
    ];
    for (tab_id, loader) in &loaders {
        router
            .register(tab_id, loader.clone())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
    }

    for item in dom::query_all(".menu-item[data-tab]") {
        let Some(tab_id) = item.get_attribute("data-tab") else {
            continue;
        };
        let router = router.clone();
        dom::on(&item, "click", move |_: MouseEvent| {
            let (router, tab_id) = (router.clone(), tab_id.clone());
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = router.activate(&tab_id).await {
                    warn!(error = %err, "tab not activated");
                }
            });
        });
    }

    if config.eager_admin_load {
        let started = router.reload_all(ctx.spawner.as_ref());
        info!(started, "loading every admin tab");
    } else if let Some((_, loader)) = loaders.iter().find(|(id, _)| *id == initial) {
        let loader = loader.clone();
        ctx.spawner.spawn(Box::pin(async move { loader.reload().await }));
    }
    Ok(())
}
