//! Descriptors for each back-office entity.

use lx_api_types::{
    Giveaway, HttpMethod, Message, Product, RecordId, Section, SectionVisibility, Subscriber, Video,
};
use lx_client::{ApiError, calls, paths};
use tracing::warn;

use crate::controller::ResourceController;
use crate::format::{capitalize, date, date_time, money, truncate, upload_url};
use crate::resource::{EditorSpec, FormField, Resource};
use crate::row::{Cell, Row, RowAction, RowLayout};
use crate::view::FieldValue;

const SNIPPET_CHARS: usize = 50;

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ── Products ──

pub struct Products;

static PRODUCT_EDITOR: EditorSpec = EditorSpec {
    create_title: "Add New Product",
    edit_title: "Edit Product",
    fields: &[
        FormField::text("name", "product-name"),
        FormField::text("description", "product-description"),
        FormField::text("details", "product-details"),
        FormField::text("price", "product-price"),
        FormField::checkbox("visible", "product-visible"),
        FormField::file("image", "product-image"),
    ],
};

impl Resource for Products {
    type Record = Product;

    fn noun(&self) -> &'static str {
        "product"
    }

    fn list_path(&self) -> &'static str {
        paths::ADMIN_PRODUCTS
    }

    fn record_id(&self, record: &Product) -> Option<RecordId> {
        Some(record.id.clone())
    }

    fn row(&self, p: &Product) -> Row {
        Row::table(
            p.id.clone(),
            vec![
                Cell::Image {
                    src: upload_url("products", p.image.as_deref(), (50, 50)),
                    alt: p.name.clone(),
                    width: None,
                },
                Cell::text(&p.name),
                Cell::text(truncate(&text(&p.description), SNIPPET_CHARS)),
                Cell::text(money(p.price)),
                Cell::text(if p.visible { "Visible" } else { "Hidden" }),
                Cell::Actions,
            ],
        )
    }

    fn actions(&self) -> &'static [RowAction] {
        const ACTIONS: &[RowAction] = &[RowAction::edit("edit-product"), RowAction::delete("delete-product")];
        ACTIONS
    }

    fn editor(&self) -> Option<&'static EditorSpec> {
        Some(&PRODUCT_EDITOR)
    }

    fn form_values(&self, p: &Product) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("name", FieldValue::Text(p.name.clone())),
            ("description", FieldValue::Text(text(&p.description))),
            ("details", FieldValue::Text(text(&p.details))),
            ("price", FieldValue::Text(p.price.to_string())),
            ("visible", FieldValue::Checked(p.visible)),
        ]
    }
}

// ── Sections ──

pub struct Sections;

impl Resource for Sections {
    type Record = Section;

    fn noun(&self) -> &'static str {
        "section"
    }

    fn list_path(&self) -> &'static str {
        paths::ADMIN_SECTIONS
    }

    fn record_id(&self, record: &Section) -> Option<RecordId> {
        record.id.clone()
    }

    fn row(&self, s: &Section) -> Row {
        Row {
            id: s.id.clone(),
            layout: RowLayout::ToggleCard {
                key: s.section_name.clone(),
                title: format!("{} Section", capitalize(&s.section_name)),
                description: format!(
                    "Show or hide the {} section on the main website",
                    s.section_name
                ),
                checked: s.visible,
            },
        }
    }
}

impl ResourceController<Sections> {
    /// Persist the toggles as currently set on the page. Returns whether the
    /// backend accepted them.
    pub async fn save_visibility(&self, toggles: &[SectionVisibility]) -> bool {
        match calls::save_sections(self.transport(), toggles).await {
            Ok(envelope) => {
                self.dialogs().alert(envelope.display_message());
                true
            }
            Err(err) => {
                warn!(error = %err, "saving section visibility failed");
                self.dialogs().alert(&err.user_message());
                false
            }
        }
    }
}

// ── Messages ──

fn message_detail(m: &Message) -> String {
    format!(
        "From: {} <{}>\nReceived: {}\n\n{}",
        m.name,
        m.email,
        date_time(m.created_at.as_deref()),
        m.message
    )
}

pub struct Messages;

impl Resource for Messages {
    type Record = Message;

    fn noun(&self) -> &'static str {
        "message"
    }

    fn list_path(&self) -> &'static str {
        paths::ADMIN_MESSAGES
    }

    fn record_id(&self, record: &Message) -> Option<RecordId> {
        Some(record.id.clone())
    }

    fn row(&self, m: &Message) -> Row {
        Row::table(
            m.id.clone(),
            vec![
                Cell::text(&m.name),
                Cell::text(&m.email),
                Cell::text(&m.message),
                Cell::text(date_time(m.created_at.as_deref())),
                Cell::Actions,
            ],
        )
    }

    fn actions(&self) -> &'static [RowAction] {
        const ACTIONS: &[RowAction] = &[RowAction::view("view-message"), RowAction::delete("delete-message")];
        ACTIONS
    }

    fn detail(&self, m: &Message) -> String {
        message_detail(m)
    }
}

/// The dashboard's latest-messages panel.
pub struct RecentMessages;

impl Resource for RecentMessages {
    type Record = Message;

    fn noun(&self) -> &'static str {
        "message"
    }

    fn list_path(&self) -> &'static str {
        paths::ADMIN_RECENT_MESSAGES
    }

    fn mutate_path(&self) -> &'static str {
        paths::ADMIN_MESSAGES
    }

    fn record_id(&self, record: &Message) -> Option<RecordId> {
        Some(record.id.clone())
    }

    fn row(&self, m: &Message) -> Row {
        Row::table(
            m.id.clone(),
            vec![
                Cell::text(&m.name),
                Cell::text(&m.email),
                Cell::text(truncate(&m.message, SNIPPET_CHARS)),
                Cell::text(date(m.created_at.as_deref())),
                Cell::Actions,
            ],
        )
    }

    fn actions(&self) -> &'static [RowAction] {
        const ACTIONS: &[RowAction] = &[RowAction::view("view-message")];
        ACTIONS
    }

    fn detail(&self, m: &Message) -> String {
        message_detail(m)
    }
}

// ── Subscribers ──

pub struct Subscribers;

impl Resource for Subscribers {
    type Record = Subscriber;

    fn noun(&self) -> &'static str {
        "subscriber"
    }

    fn list_path(&self) -> &'static str {
        paths::ADMIN_SUBSCRIBERS
    }

    fn record_id(&self, record: &Subscriber) -> Option<RecordId> {
        Some(record.id.clone())
    }

    fn row(&self, s: &Subscriber) -> Row {
        Row::table(
            s.id.clone(),
            vec![
                Cell::text(&s.email),
                Cell::text(date(s.created_at.as_deref())),
                Cell::Actions,
            ],
        )
    }

    fn actions(&self) -> &'static [RowAction] {
        const ACTIONS: &[RowAction] = &[RowAction::delete("delete-subscriber")];
        ACTIONS
    }
}

// ── Videos ──

pub struct Videos;

static VIDEO_EDITOR: EditorSpec = EditorSpec {
    create_title: "Add New Video",
    edit_title: "Edit Video",
    fields: &[
        FormField::text("title", "video-title"),
        FormField::text("description", "video-description"),
        FormField::text("video_url", "video-url"),
        FormField::file("thumbnail", "video-thumbnail"),
    ],
};

impl Resource for Videos {
    type Record = Video;

    fn noun(&self) -> &'static str {
        "video"
    }

    fn list_path(&self) -> &'static str {
        paths::ADMIN_VIDEOS
    }

    fn record_id(&self, record: &Video) -> Option<RecordId> {
        Some(record.id.clone())
    }

    fn row(&self, v: &Video) -> Row {
        Row::table(
            v.id.clone(),
            vec![
                Cell::text(&v.title),
                Cell::text(text(&v.description)),
                Cell::text(text(&v.video_url)),
                Cell::Image {
                    src: upload_url("videos", v.thumbnail.as_deref(), (100, 60)),
                    alt: "Thumbnail".to_owned(),
                    width: Some(100),
                },
                Cell::Actions,
            ],
        )
    }

    fn actions(&self) -> &'static [RowAction] {
        const ACTIONS: &[RowAction] = &[RowAction::edit("edit-video"), RowAction::delete("delete-video")];
        ACTIONS
    }

    fn editor(&self) -> Option<&'static EditorSpec> {
        Some(&VIDEO_EDITOR)
    }

    fn form_values(&self, v: &Video) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("title", FieldValue::Text(v.title.clone())),
            ("description", FieldValue::Text(text(&v.description))),
            ("video_url", FieldValue::Text(text(&v.video_url))),
        ]
    }
}

// ── Giveaway ──

/// The single current giveaway. The endpoint answers with one object, or
/// `{}` when none is set, and saves with POST whether creating or updating.
pub struct Giveaways;

static GIVEAWAY_EDITOR: EditorSpec = EditorSpec {
    create_title: "Set Giveaway",
    edit_title: "Edit Giveaway",
    fields: &[
        FormField::text("title", "giveaway-title"),
        FormField::text("description", "giveaway-description"),
        FormField::text("end_date", "giveaway-end-date"),
        FormField::file("image", "giveaway-image"),
    ],
};

impl Resource for Giveaways {
    type Record = Giveaway;

    fn noun(&self) -> &'static str {
        "giveaway"
    }

    fn list_path(&self) -> &'static str {
        paths::ADMIN_GIVEAWAY
    }

    fn update_method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn record_id(&self, record: &Giveaway) -> Option<RecordId> {
        Some(record.id.clone())
    }

    fn row(&self, g: &Giveaway) -> Row {
        Row::table(
            g.id.clone(),
            vec![
                Cell::text(&g.title),
                Cell::text(text(&g.description)),
                Cell::Image {
                    src: upload_url("giveaway", g.image.as_deref(), (100, 60)),
                    alt: "Giveaway Image".to_owned(),
                    width: Some(100),
                },
                Cell::text(date(g.end_date.as_deref())),
                Cell::text(g.participants_count.to_string()),
                Cell::Actions,
            ],
        )
    }

    fn actions(&self) -> &'static [RowAction] {
        const ACTIONS: &[RowAction] = &[RowAction::edit("edit-giveaway"), RowAction::delete("delete-giveaway")];
        ACTIONS
    }

    fn empty_row(&self) -> Option<Row> {
        Some(Row::banner(6, "No current giveaway set."))
    }

    fn editor(&self) -> Option<&'static EditorSpec> {
        Some(&GIVEAWAY_EDITOR)
    }

    fn form_values(&self, g: &Giveaway) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("title", FieldValue::Text(g.title.clone())),
            ("description", FieldValue::Text(text(&g.description))),
            ("end_date", FieldValue::Text(date(g.end_date.as_deref()))),
        ]
    }

    fn decode_list(&self, body: serde_json::Value) -> Result<Vec<Giveaway>, ApiError> {
        let absent = match &body {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if absent {
            return Ok(Vec::new());
        }
        let decoded = if body.is_array() {
            serde_json::from_value(body)
        } else {
            serde_json::from_value(body).map(|giveaway| vec![giveaway])
        };
        decoded.map_err(|err| ApiError::Decode(err.to_string()))
    }
}
