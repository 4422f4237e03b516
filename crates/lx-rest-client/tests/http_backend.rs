//! Drives the client crates against an in-process axum backend over real HTTP.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use lx_admin::resources::Subscribers;
use lx_admin::testing::{FakeTable, QueueSpawner, ScriptedDialogs};
use lx_admin::{AdminContext, LoadOutcome, ResourceController, RowActionKind};
use lx_api_types::{DeleteRequest, Envelope, RecordId, SubscribeRequest, Subscriber};
use lx_client::testing::NoticeLog;
use lx_client::{ApiError, MultipartForm, NoticeKind, Transport, calls, paths};
use lx_commerce::clock::SystemClock;
use lx_commerce::forms::{FormOutcome, submit_newsletter};
use lx_commerce::reconcile::reconcile_cart_count;
use lx_commerce::{BadgeKind, BadgeView, CommerceBinder, IndicatorSurface, LocalCommerceStore};
use lx_rest_client::RestTransport;
use lx_storage::InMemoryStore;
use serde_json::{Value, json};

#[derive(Default)]
struct Backend {
    subscribers: Vec<Subscriber>,
    next_id: u64,
    /// (field name, file name) for each multipart part received.
    upload_parts: Vec<(String, Option<String>)>,
}

type Shared = Arc<Mutex<Backend>>;

async fn list_subscribers(State(state): State<Shared>) -> Json<Vec<Subscriber>> {
    let backend = state.lock().unwrap_or_else(|e| e.into_inner());
    Json(backend.subscribers.clone())
}

async fn delete_subscriber(
    State(state): State<Shared>,
    Json(body): Json<DeleteRequest>,
) -> (StatusCode, Json<Envelope>) {
    let mut backend = state.lock().unwrap_or_else(|e| e.into_inner());
    let before = backend.subscribers.len();
    backend.subscribers.retain(|s| s.id != body.id);
    if backend.subscribers.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(Envelope::failed("Subscriber not found")),
        );
    }
    (
        StatusCode::OK,
        Json(Envelope::ok("Subscriber deleted successfully")),
    )
}

async fn subscribe(
    State(state): State<Shared>,
    Json(body): Json<SubscribeRequest>,
) -> (StatusCode, Json<Envelope>) {
    let mut backend = state.lock().unwrap_or_else(|e| e.into_inner());
    if backend.subscribers.iter().any(|s| s.email == body.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(Envelope::failed("Email already subscribed")),
        );
    }
    backend.next_id += 1;
    let id = RecordId::new(backend.next_id.to_string());
    backend.subscribers.push(Subscriber {
        id,
        email: body.email,
        created_at: Some("2026-03-01T10:00:00".into()),
    });
    (
        StatusCode::OK,
        Json(Envelope::ok("Thank you for subscribing!")),
    )
}

async fn cart_count() -> Json<Value> {
    Json(json!({"count": 3}))
}

async fn create_product(State(state): State<Shared>, mut multipart: Multipart) -> Json<Envelope> {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let _ = field.bytes().await;
        parts.push((name, file_name));
    }
    state.lock().unwrap_or_else(|e| e.into_inner()).upload_parts = parts;
    Json(Envelope::ok("Product added successfully"))
}

async fn broken_stats() -> (StatusCode, &'static str) {
    (StatusCode::OK, "<html>not json</html>")
}

async fn spawn_backend(seed: Vec<Subscriber>) -> anyhow::Result<(String, Shared)> {
    let next_id = seed.len() as u64;
    let state: Shared = Arc::new(Mutex::new(Backend {
        subscribers: seed,
        next_id,
        ..Backend::default()
    }));
    let app = Router::new()
        .route(
            paths::ADMIN_SUBSCRIBERS,
            get(list_subscribers).delete(delete_subscriber),
        )
        .route(paths::SUBSCRIBE, post(subscribe))
        .route(paths::CART_COUNT, get(cart_count))
        .route(paths::ADMIN_PRODUCTS, post(create_product))
        .route(paths::ADMIN_STATS, get(broken_stats))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/"), state))
}

fn subscriber(id: u64, email: &str) -> Subscriber {
    Subscriber {
        id: RecordId::new(id.to_string()),
        email: email.into(),
        created_at: None,
    }
}

#[tokio::test]
async fn delete_round_trip_reloads_the_table() -> anyhow::Result<()> {
    let (base, state) =
        spawn_backend(vec![subscriber(1, "ann@example.com"), subscriber(2, "bo@example.com")]).await?;

    let table = Rc::new(FakeTable::default());
    let dialogs = Rc::new(ScriptedDialogs::answering(true));
    let spawner = Rc::new(QueueSpawner::default());
    let ctx = AdminContext {
        transport: Rc::new(RestTransport::new(Some(base))),
        dialogs: dialogs.clone(),
        spawner: spawner.clone(),
    };
    let controller = ResourceController::new(Subscribers, ctx, table.clone(), None);

    assert_eq!(controller.load().await, LoadOutcome::Rendered(2));
    assert!(table.click(RowActionKind::Delete, "2"));
    spawner.run_until_idle().await;

    assert_eq!(table.row_ids(), ["1"]);
    assert_eq!(dialogs.alerts(), ["Subscriber deleted successfully"]);
    assert_eq!(state.lock().unwrap_or_else(|e| e.into_inner()).subscribers.len(), 1);
    Ok(())
}

#[tokio::test]
async fn missing_record_surfaces_server_message() -> anyhow::Result<()> {
    let (base, _state) = spawn_backend(vec![subscriber(1, "ann@example.com")]).await?;
    let dialogs = Rc::new(ScriptedDialogs::answering(true));
    let ctx = AdminContext {
        transport: Rc::new(RestTransport::new(Some(base))),
        dialogs: dialogs.clone(),
        spawner: Rc::new(QueueSpawner::default()),
    };
    let controller = ResourceController::new(Subscribers, ctx, Rc::new(FakeTable::default()), None);

    controller.delete(&RecordId::new("9")).await;
    assert_eq!(dialogs.alerts(), ["Subscriber not found"]);
    Ok(())
}

#[tokio::test]
async fn duplicate_subscription_is_rejected() -> anyhow::Result<()> {
    let (base, _state) = spawn_backend(Vec::new()).await?;
    let transport = RestTransport::new(Some(base));
    let notices = NoticeLog::new();

    assert_eq!(
        submit_newsletter(&transport, &notices, " new@example.com ").await,
        FormOutcome::Accepted
    );
    assert_eq!(
        submit_newsletter(&transport, &notices, "new@example.com").await,
        FormOutcome::Rejected
    );
    let last = notices.last().ok_or_else(|| anyhow::anyhow!("no notice"))?;
    assert_eq!(last.kind, NoticeKind::Error);
    assert_eq!(last.message, "Email already subscribed");
    Ok(())
}

#[derive(Default)]
struct Nav(RefCell<HashMap<BadgeKind, BadgeView>>);

impl IndicatorSurface for Nav {
    fn show_badge(&self, kind: BadgeKind, view: &BadgeView) {
        self.0.borrow_mut().insert(kind, view.clone());
    }
}

#[tokio::test]
async fn cart_badge_follows_server_count() -> anyhow::Result<()> {
    let (base, _state) = spawn_backend(Vec::new()).await?;
    let transport = RestTransport::new(Some(base));
    let nav = Rc::new(Nav::default());
    let store = LocalCommerceStore::new(
        InMemoryStore::new(),
        Rc::new(SystemClock),
        Rc::new(NoticeLog::new()),
    );
    let binder = CommerceBinder::new(store, nav.clone());

    assert_eq!(reconcile_cart_count(&transport, &binder).await, Some(3));
    let badge = nav.0.borrow().get(&BadgeKind::Cart).cloned();
    assert_eq!(badge.map(|b| b.text), Some("3".into()));
    Ok(())
}

#[tokio::test]
async fn multipart_upload_keeps_fields_and_file_names() -> anyhow::Result<()> {
    let (base, state) = spawn_backend(Vec::new()).await?;
    let transport = RestTransport::new(Some(base));

    let mut form = MultipartForm::new()
        .text("name", "Tourbillon")
        .text("price", "1200")
        .text("visible", "true");
    form.push_file("image", "watch.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
    let request = lx_client::ApiRequest::multipart(
        lx_api_types::HttpMethod::Post,
        paths::ADMIN_PRODUCTS,
        form,
    );
    let envelope = calls::mutate(&transport, request).await?;
    assert_eq!(envelope.message, "Product added successfully");

    let parts = state.lock().unwrap_or_else(|e| e.into_inner()).upload_parts.clone();
    assert_eq!(
        parts,
        [
            ("name".to_owned(), None),
            ("price".to_owned(), None),
            ("visible".to_owned(), None),
            ("image".to_owned(), Some("watch.png".to_owned())),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn non_json_success_is_a_decode_error() -> anyhow::Result<()> {
    let (base, _state) = spawn_backend(Vec::new()).await?;
    let transport = RestTransport::new(Some(base));
    let err = transport
        .send(lx_client::ApiRequest::get(paths::ADMIN_STATS))
        .await
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected a decode error"))?;
    assert!(matches!(err, ApiError::Decode(_)));
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() -> anyhow::Result<()> {
    let transport = RestTransport::new(Some("http://127.0.0.1:9".into()));
    let err = calls::fetch_cart_count(&transport).await.err();
    assert!(matches!(err, Some(ApiError::Transport(_))));
    Ok(())
}
