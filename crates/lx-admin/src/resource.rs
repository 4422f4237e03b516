use lx_api_types::{HttpMethod, RecordId};
use lx_client::ApiError;
use serde::de::DeserializeOwned;

use crate::row::{Row, RowAction};
use crate::view::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
    File,
}

/// One input of an editor form: the multipart field `name`, read from the
/// element `input_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub input_id: &'static str,
    pub kind: FieldKind,
}

impl FormField {
    pub const fn text(name: &'static str, input_id: &'static str) -> Self {
        Self {
            name,
            input_id,
            kind: FieldKind::Text,
        }
    }

    pub const fn checkbox(name: &'static str, input_id: &'static str) -> Self {
        Self {
            name,
            input_id,
            kind: FieldKind::Checkbox,
        }
    }

    pub const fn file(name: &'static str, input_id: &'static str) -> Self {
        Self {
            name,
            input_id,
            kind: FieldKind::File,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSpec {
    pub create_title: &'static str,
    pub edit_title: &'static str,
    pub fields: &'static [FormField],
}

/// Describes one back-office entity to the generic controller.
pub trait Resource: 'static {
    type Record: DeserializeOwned + Clone + 'static;

    /// Singular noun used in prompts and logs.
    fn noun(&self) -> &'static str;

    fn list_path(&self) -> &'static str;

    /// Target of DELETE and of editor submissions.
    fn mutate_path(&self) -> &'static str {
        self.list_path()
    }

    /// Verb for saving over an existing record.
    fn update_method(&self) -> HttpMethod {
        HttpMethod::Put
    }

    fn record_id(&self, record: &Self::Record) -> Option<RecordId>;

    fn row(&self, record: &Self::Record) -> Row;

    fn actions(&self) -> &'static [RowAction] {
        &[]
    }

    /// Rendered in place of the rows when the listing is empty.
    fn empty_row(&self) -> Option<Row> {
        None
    }

    fn confirm_prompt(&self) -> String {
        format!("Delete this {}?", self.noun())
    }

    fn editor(&self) -> Option<&'static EditorSpec> {
        None
    }

    /// Values to pre-fill the editor with when editing `record`.
    fn form_values(&self, _record: &Self::Record) -> Vec<(&'static str, FieldValue)> {
        Vec::new()
    }

    /// Text shown by the `View` action.
    fn detail(&self, _record: &Self::Record) -> String {
        String::new()
    }

    fn decode_list(&self, body: serde_json::Value) -> Result<Vec<Self::Record>, ApiError> {
        if body.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}
