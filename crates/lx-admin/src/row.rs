//! Table rows as data, rendered to markup in one place.

use lx_api_types::RecordId;

use crate::format::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowActionKind {
    View,
    Edit,
    Delete,
}

impl RowActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RowActionKind::View => "view",
            RowActionKind::Edit => "edit",
            RowActionKind::Delete => "delete",
        }
    }
}

/// A per-row button. `class` is the selector the page binds handlers by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAction {
    pub kind: RowActionKind,
    pub class: &'static str,
    pub label: &'static str,
}

impl RowAction {
    pub const fn view(class: &'static str) -> Self {
        Self {
            kind: RowActionKind::View,
            class,
            label: "View",
        }
    }

    pub const fn edit(class: &'static str) -> Self {
        Self {
            kind: RowActionKind::Edit,
            class,
            label: "Edit",
        }
    }

    pub const fn delete(class: &'static str) -> Self {
        Self {
            kind: RowActionKind::Delete,
            class,
            label: "Delete",
        }
    }

    fn button_style(&self) -> &'static str {
        match self.kind {
            RowActionKind::Delete => "btn-danger",
            _ => "btn-secondary",
        }
    }

    pub fn selector(&self) -> String {
        format!(".{}", self.class)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Image {
        src: String,
        alt: String,
        width: Option<u32>,
    },
    /// The resource's row actions, addressed to the row's id.
    Actions,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowLayout {
    TableRow(Vec<Cell>),
    /// A notice spanning the whole table, e.g. an empty state.
    Banner { colspan: u32, text: String },
    ToggleCard {
        key: String,
        title: String,
        description: String,
        checked: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: Option<RecordId>,
    pub layout: RowLayout,
}

impl Row {
    pub fn table(id: RecordId, cells: Vec<Cell>) -> Self {
        Self {
            id: Some(id),
            layout: RowLayout::TableRow(cells),
        }
    }

    pub fn banner(colspan: u32, text: impl Into<String>) -> Self {
        Self {
            id: None,
            layout: RowLayout::Banner {
                colspan,
                text: text.into(),
            },
        }
    }

    pub fn to_html(&self, actions: &[RowAction]) -> String {
        match &self.layout {
            RowLayout::TableRow(cells) => {
                let mut html = String::from("<tr>");
                for cell in cells {
                    html.push_str("<td>");
                    html.push_str(&self.cell_html(cell, actions));
                    html.push_str("</td>");
                }
                html.push_str("</tr>");
                html
            }
            RowLayout::Banner { colspan, text } => {
                format!(r#"<tr><td colspan="{colspan}">{}</td></tr>"#, escape_html(text))
            }
            RowLayout::ToggleCard {
                key,
                title,
                description,
                checked,
            } => format!(
                concat!(
                    r#"<div class="toggle-card"><div class="toggle-info"><h3>{}</h3><p>{}</p></div>"#,
                    r#"<label class="toggle-switch"><input type="checkbox" data-section="{}"{}>"#,
                    r#"<span class="slider"></span></label></div>"#
                ),
                escape_html(title),
                escape_html(description),
                escape_html(key),
                if *checked { " checked" } else { "" },
            ),
        }
    }

    fn cell_html(&self, cell: &Cell, actions: &[RowAction]) -> String {
        match cell {
            Cell::Text(text) => escape_html(text),
            Cell::Image { src, alt, width } => match width {
                Some(width) => format!(
                    r#"<img src="{}" alt="{}" style="width:{width}px;">"#,
                    escape_html(src),
                    escape_html(alt)
                ),
                None => format!(r#"<img src="{}" alt="{}">"#, escape_html(src), escape_html(alt)),
            },
            Cell::Actions => {
                let Some(id) = &self.id else {
                    return String::new();
                };
                actions
                    .iter()
                    .map(|action| {
                        format!(
                            r#"<button class="{} {}" data-action="{}" data-id="{}">{}</button>"#,
                            action.button_style(),
                            action.class,
                            action.kind.as_str(),
                            escape_html(id.as_str()),
                            action.label
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
    }
}

/// Markup for a full table body.
pub fn rows_html(rows: &[Row], actions: &[RowAction]) -> String {
    rows.iter().map(|row| row.to_html(actions)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIONS: &[RowAction] = &[RowAction::edit("edit-product"), RowAction::delete("delete-product")];

    #[test]
    fn action_buttons_carry_the_row_id() {
        let row = Row::table(RecordId::new("7"), vec![Cell::text("Ring"), Cell::Actions]);
        let html = row.to_html(ACTIONS);
        assert!(html.starts_with("<tr><td>Ring</td><td>"));
        assert!(html.contains(r#"<button class="btn-secondary edit-product" data-action="edit" data-id="7">Edit</button>"#));
        assert!(html.contains(r#"<button class="btn-danger delete-product" data-action="delete" data-id="7">Delete</button>"#));
    }

    #[test]
    fn text_is_escaped() {
        let row = Row::table(RecordId::new("1"), vec![Cell::text("<script>")]);
        assert_eq!(row.to_html(&[]), "<tr><td>&lt;script&gt;</td></tr>");
    }

    #[test]
    fn banner_and_toggle_layouts() {
        assert_eq!(
            Row::banner(6, "No current giveaway set.").to_html(&[]),
            r#"<tr><td colspan="6">No current giveaway set.</td></tr>"#
        );
        let card = Row {
            id: None,
            layout: RowLayout::ToggleCard {
                key: "hero".into(),
                title: "Hero Section".into(),
                description: "Show or hide".into(),
                checked: true,
            },
        };
        let html = card.to_html(&[]);
        assert!(html.contains(r#"data-section="hero" checked>"#));
        assert!(rows_html(&[], ACTIONS).is_empty());
    }
}
