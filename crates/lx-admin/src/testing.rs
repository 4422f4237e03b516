//! In-memory views, dialogs and a manual spawner for driving controllers.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use lx_api_types::RecordId;

use crate::row::{Row, RowAction, RowActionKind};
use crate::view::{ActionHandler, Dialogs, EditorView, FieldValue, LocalTask, Spawner, TableView};

#[derive(Default)]
pub struct FakeTable {
    rows: RefCell<Vec<Row>>,
    actions: RefCell<Vec<RowAction>>,
    handler: RefCell<Option<ActionHandler>>,
    bound: Cell<usize>,
    renders: Cell<usize>,
}

impl FakeTable {
    pub fn rows(&self) -> Vec<Row> {
        self.rows.borrow().clone()
    }

    pub fn row_ids(&self) -> Vec<String> {
        self.rows
            .borrow()
            .iter()
            .filter_map(|row| row.id.as_ref().map(|id| id.as_str().to_owned()))
            .collect()
    }

    pub fn renders(&self) -> usize {
        self.renders.get()
    }

    pub fn bound(&self) -> usize {
        self.bound.get()
    }

    /// Click the `kind` button of row `id`; false when no such button is bound.
    pub fn click(&self, kind: RowActionKind, id: &str) -> bool {
        let has_button = self.actions.borrow().iter().any(|a| a.kind == kind)
            && self.row_ids().iter().any(|row_id| row_id == id);
        let handler = self.handler.borrow().clone();
        match handler {
            Some(handler) if has_button => {
                handler(kind, RecordId::new(id));
                true
            }
            _ => false,
        }
    }
}

impl TableView for FakeTable {
    fn replace_rows(&self, rows: &[Row], _actions: &[RowAction]) {
        self.renders.set(self.renders.get() + 1);
        *self.rows.borrow_mut() = rows.to_vec();
        *self.handler.borrow_mut() = None;
        self.bound.set(0);
    }

    fn bind_actions(&self, actions: &[RowAction], handler: ActionHandler) -> usize {
        let with_id = self.rows.borrow().iter().filter(|row| row.id.is_some()).count();
        let count = with_id * actions.len();
        *self.actions.borrow_mut() = actions.to_vec();
        *self.handler.borrow_mut() = Some(handler);
        self.bound.set(count);
        count
    }
}

#[derive(Default)]
pub struct ScriptedDialogs {
    answer: Cell<bool>,
    prompts: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl ScriptedDialogs {
    pub fn answering(answer: bool) -> Self {
        let dialogs = Self::default();
        dialogs.answer.set(answer);
        dialogs
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.set(answer);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.borrow_mut().push(prompt.to_owned());
        self.answer.get()
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }
}

#[derive(Default)]
pub struct FakeEditor {
    open: Cell<bool>,
    title: RefCell<String>,
    values: RefCell<Vec<(&'static str, FieldValue)>>,
}

impl FakeEditor {
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.values
            .borrow()
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.clone())
    }
}

impl EditorView for FakeEditor {
    fn open(&self, title: &str, values: &[(&'static str, FieldValue)]) {
        self.open.set(true);
        *self.title.borrow_mut() = title.to_owned();
        *self.values.borrow_mut() = values.to_vec();
    }

    fn close(&self) {
        self.open.set(false);
    }
}

/// Queues spawned tasks until the test runs them.
#[derive(Default)]
pub struct QueueSpawner {
    tasks: RefCell<VecDeque<LocalTask>>,
}

impl QueueSpawner {
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub async fn run_until_idle(&self) {
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => task.await,
                None => break,
            }
        }
    }
}

impl Spawner for QueueSpawner {
    fn spawn(&self, task: LocalTask) {
        self.tasks.borrow_mut().push_back(task);
    }
}
