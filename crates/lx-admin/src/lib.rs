//! Back-office tables: one generic controller driven by per-entity
//! descriptors, plus the dashboard and the tab router.

pub mod controller;
pub mod dashboard;
pub mod editor;
pub mod format;
pub mod resource;
pub mod resources;
pub mod row;
pub mod tabs;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use controller::{AdminContext, DeleteOutcome, LoadOutcome, ResourceController, SubmitOutcome};
pub use editor::{EditSurface, EditorError, TransitionError};
pub use resource::{EditorSpec, FieldKind, FormField, Resource};
pub use row::{Cell, Row, RowAction, RowActionKind, RowLayout};
pub use tabs::{Activation, Loadable, RouterError, TabRouter, TabView};
pub use view::{ActionHandler, Dialogs, EditorView, FieldValue, LocalTask, Spawner, TableView};
