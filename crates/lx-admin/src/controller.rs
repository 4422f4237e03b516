//! The fetch → render → bind → mutate cycle shared by every back-office tab.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use lx_api_types::{DeleteRequest, HttpMethod, RecordId};
use lx_client::{ApiError, ApiRequest, MultipartForm, Transport, calls};
use tracing::{debug, info, warn};

use crate::editor::{EditSurface, EditorError, TransitionError};
use crate::resource::{EditorSpec, Resource};
use crate::row::{Row, RowActionKind};
use crate::view::{ActionHandler, Dialogs, EditorView, Spawner, TableView};

/// Collaborators shared by all controllers on a page.
#[derive(Clone)]
pub struct AdminContext {
    pub transport: Rc<dyn Transport>,
    pub dialogs: Rc<dyn Dialogs>,
    pub spawner: Rc<dyn Spawner>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Rows rendered from this many records.
    Rendered(usize),
    /// A newer load was issued while this one was in flight; its result was dropped.
    Superseded,
    /// The previous rows stay on screen.
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved,
    Failed(ApiError),
}

pub struct ResourceController<R: Resource> {
    resource: R,
    ctx: AdminContext,
    view: Rc<dyn TableView>,
    editor: Option<Rc<dyn EditorView>>,
    snapshot: RefCell<Vec<R::Record>>,
    generation: Cell<u64>,
    surface: RefCell<EditSurface>,
    this: Weak<Self>,
}

impl<R: Resource> ResourceController<R> {
    pub fn new(
        resource: R,
        ctx: AdminContext,
        view: Rc<dyn TableView>,
        editor: Option<Rc<dyn EditorView>>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            resource,
            ctx,
            view,
            editor,
            snapshot: RefCell::new(Vec::new()),
            generation: Cell::new(0),
            surface: RefCell::new(EditSurface::Closed),
            this: this.clone(),
        })
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn transport(&self) -> &dyn Transport {
        self.ctx.transport.as_ref()
    }

    pub fn dialogs(&self) -> &dyn Dialogs {
        self.ctx.dialogs.as_ref()
    }

    pub fn snapshot(&self) -> Vec<R::Record> {
        self.snapshot.borrow().clone()
    }

    pub fn surface(&self) -> EditSurface {
        self.surface.borrow().clone()
    }

    pub async fn load(&self) -> LoadOutcome {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let fetched = self.fetch().await;
        if generation != self.generation.get() {
            debug!(resource = self.resource.noun(), generation, "discarding superseded load");
            return LoadOutcome::Superseded;
        }
        match fetched {
            Ok(records) => LoadOutcome::Rendered(self.render(records)),
            Err(err) => {
                warn!(resource = self.resource.noun(), error = %err, "load failed, keeping previous rows");
                LoadOutcome::Failed(err)
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<R::Record>, ApiError> {
        let response = self
            .ctx
            .transport
            .send(ApiRequest::get(self.resource.list_path()))
            .await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                message: response.server_message(),
            });
        }
        self.resource.decode_list(response.body)
    }

    fn render(&self, records: Vec<R::Record>) -> usize {
        let mut rows: Vec<Row> = records.iter().map(|r| self.resource.row(r)).collect();
        let count = rows.len();
        if rows.is_empty() {
            rows.extend(self.resource.empty_row());
        }
        *self.snapshot.borrow_mut() = records;

        let actions = self.resource.actions();
        self.view.replace_rows(&rows, actions);
        let bound = self.view.bind_actions(actions, self.action_handler());
        debug!(resource = self.resource.noun(), rows = count, bound, "rendered");
        count
    }

    fn action_handler(&self) -> ActionHandler {
        let this = self.this.clone();
        Rc::new(move |kind, id| {
            if let Some(controller) = this.upgrade() {
                controller.dispatch(kind, id);
            }
        })
    }

    pub fn dispatch(&self, kind: RowActionKind, id: RecordId) {
        match kind {
            RowActionKind::View => self.show_detail(&id),
            RowActionKind::Edit => {
                if let Err(err) = self.open_edit(&id) {
                    warn!(resource = self.resource.noun(), error = %err, "cannot open editor");
                    self.ctx.dialogs.alert(&err.to_string());
                }
            }
            RowActionKind::Delete => {
                let Some(this) = self.this.upgrade() else {
                    return;
                };
                self.ctx.spawner.spawn(Box::pin(async move {
                    this.delete(&id).await;
                }));
            }
        }
    }

    fn find(&self, id: &RecordId) -> Option<R::Record> {
        self.snapshot
            .borrow()
            .iter()
            .find(|record| self.resource.record_id(record).as_ref() == Some(id))
            .cloned()
    }

    fn show_detail(&self, id: &RecordId) {
        match self.find(id) {
            Some(record) => self.ctx.dialogs.alert(&self.resource.detail(&record)),
            None => debug!(resource = self.resource.noun(), %id, "view on a record no longer listed"),
        }
    }

    pub async fn delete(&self, id: &RecordId) -> DeleteOutcome {
        if !self.ctx.dialogs.confirm(&self.resource.confirm_prompt()) {
            return DeleteOutcome::Cancelled;
        }
        let body = DeleteRequest { id: id.clone() };
        let result = match ApiRequest::json(HttpMethod::Delete, self.resource.mutate_path(), &body) {
            Ok(request) => calls::mutate(self.ctx.transport.as_ref(), request).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(envelope) => {
                info!(resource = self.resource.noun(), %id, "deleted");
                if !envelope.display_message().is_empty() {
                    self.ctx.dialogs.alert(envelope.display_message());
                }
                self.load().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(resource = self.resource.noun(), %id, error = %err, "delete failed");
                self.ctx.dialogs.alert(&self.failure_text("delete", &err));
                DeleteOutcome::Failed(err)
            }
        }
    }

    /// POST a new record, or save over `existing_id` with the resource's update
    /// verb. The editor closes and the list reloads only on success.
    pub async fn create_or_update(
        &self,
        mut form: MultipartForm,
        existing_id: Option<&RecordId>,
    ) -> SubmitOutcome {
        let method = match existing_id {
            Some(id) => {
                if !form.has_field("id") {
                    form.push_text("id", id.as_str());
                }
                self.resource.update_method()
            }
            None => HttpMethod::Post,
        };
        let request = ApiRequest::multipart(method, self.resource.mutate_path(), form);

        match calls::mutate(self.ctx.transport.as_ref(), request).await {
            Ok(envelope) => {
                info!(resource = self.resource.noun(), method = method.as_str(), "saved");
                if !envelope.display_message().is_empty() {
                    self.ctx.dialogs.alert(envelope.display_message());
                }
                if let Some(editor) = &self.editor {
                    editor.close();
                }
                self.load().await;
                SubmitOutcome::Saved
            }
            Err(err) => {
                warn!(resource = self.resource.noun(), error = %err, "save failed");
                self.ctx.dialogs.alert(&self.failure_text("save", &err));
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub fn open_create(&self) -> Result<(), EditorError> {
        let (spec, editor) = self.editor_parts()?;
        self.surface.borrow_mut().open_for_create()?;
        editor.open(spec.create_title, &[]);
        Ok(())
    }

    pub fn open_edit(&self, id: &RecordId) -> Result<(), EditorError> {
        let (spec, editor) = self.editor_parts()?;
        let record = self
            .find(id)
            .ok_or_else(|| EditorError::UnknownRecord(id.clone()))?;
        self.surface.borrow_mut().open_for_edit(id.clone())?;
        editor.open(spec.edit_title, &self.resource.form_values(&record));
        Ok(())
    }

    pub fn close_editor(&self) -> Result<(), TransitionError> {
        self.surface.borrow_mut().close()?;
        if let Some(editor) = &self.editor {
            editor.close();
        }
        Ok(())
    }

    /// Submit the open editor through [`Self::create_or_update`].
    pub async fn submit(&self, form: MultipartForm) -> Result<SubmitOutcome, TransitionError> {
        let existing = self.surface.borrow_mut().begin_submit()?;
        let outcome = self.create_or_update(form, existing.as_ref()).await;
        self.surface
            .borrow_mut()
            .finish_submit(outcome == SubmitOutcome::Saved)?;
        Ok(outcome)
    }

    fn editor_parts(&self) -> Result<(&'static EditorSpec, &Rc<dyn EditorView>), EditorError> {
        match (self.resource.editor(), &self.editor) {
            (Some(spec), Some(editor)) => Ok((spec, editor)),
            _ => Err(EditorError::Unavailable(self.resource.noun())),
        }
    }

    fn failure_text(&self, verb: &str, err: &ApiError) -> String {
        match err {
            ApiError::Rejected(message) | ApiError::Status { message, .. } if !message.is_empty() => {
                message.clone()
            }
            _ => format!("Failed to {verb} {}.", self.resource.noun()),
        }
    }
}
