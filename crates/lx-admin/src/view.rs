//! Seams between the controllers and whatever draws them.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use lx_api_types::RecordId;

use crate::row::{Row, RowAction, RowActionKind};

pub type ActionHandler = Rc<dyn Fn(RowActionKind, RecordId)>;

pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// A table body (or card container) that is replaced wholesale on each load.
pub trait TableView {
    fn replace_rows(&self, rows: &[Row], actions: &[RowAction]);

    /// Attach `handler` to every action button currently rendered. Returns the
    /// number of buttons bound.
    fn bind_actions(&self, actions: &[RowAction], handler: ActionHandler) -> usize;
}

/// Blocking browser-style dialogs.
pub trait Dialogs {
    fn confirm(&self, prompt: &str) -> bool;
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

/// The modal form of a resource.
pub trait EditorView {
    /// Show the form titled `title`, reset and then filled with `values`.
    fn open(&self, title: &str, values: &[(&'static str, FieldValue)]);
    fn close(&self);
}

/// Runs detached local futures (`spawn_local` in the browser).
pub trait Spawner {
    fn spawn(&self, task: LocalTask);
}
