//! Edit-surface lifecycle for resources with a create/update form.

use lx_api_types::RecordId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOrigin {
    Create,
    Edit(RecordId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSurface {
    #[default]
    Closed,
    OpenForCreate,
    OpenForEdit(RecordId),
    Submitting { origin: EditOrigin },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot {action} while the editor is {state}")]
pub struct TransitionError {
    pub action: &'static str,
    pub state: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("{0} has no editor on this page")]
    Unavailable(&'static str),
    #[error("record {0} is not in the current listing")]
    UnknownRecord(RecordId),
}

impl EditSurface {
    pub fn state_name(&self) -> &'static str {
        match self {
            EditSurface::Closed => "closed",
            EditSurface::OpenForCreate => "open for create",
            EditSurface::OpenForEdit(_) => "open for edit",
            EditSurface::Submitting { .. } => "submitting",
        }
    }

    fn illegal(&self, action: &'static str) -> TransitionError {
        TransitionError {
            action,
            state: self.state_name(),
        }
    }

    pub fn open_for_create(&mut self) -> Result<(), TransitionError> {
        match self {
            EditSurface::Closed => {
                *self = EditSurface::OpenForCreate;
                Ok(())
            }
            _ => Err(self.illegal("open for create")),
        }
    }

    pub fn open_for_edit(&mut self, id: RecordId) -> Result<(), TransitionError> {
        match self {
            EditSurface::Closed => {
                *self = EditSurface::OpenForEdit(id);
                Ok(())
            }
            _ => Err(self.illegal("open for edit")),
        }
    }

    /// Enter `Submitting`; yields the id being updated, if any.
    pub fn begin_submit(&mut self) -> Result<Option<RecordId>, TransitionError> {
        let origin = match self {
            EditSurface::OpenForCreate => EditOrigin::Create,
            EditSurface::OpenForEdit(id) => EditOrigin::Edit(id.clone()),
            _ => return Err(self.illegal("submit")),
        };
        let existing = match &origin {
            EditOrigin::Create => None,
            EditOrigin::Edit(id) => Some(id.clone()),
        };
        *self = EditSurface::Submitting { origin };
        Ok(existing)
    }

    /// Leave `Submitting`: closed on success, back to the open form on failure.
    pub fn finish_submit(&mut self, succeeded: bool) -> Result<(), TransitionError> {
        let EditSurface::Submitting { origin } = self else {
            return Err(self.illegal("finish submitting"));
        };
        *self = match (succeeded, origin) {
            (true, _) => EditSurface::Closed,
            (false, EditOrigin::Create) => EditSurface::OpenForCreate,
            (false, EditOrigin::Edit(id)) => EditSurface::OpenForEdit(id.clone()),
        };
        Ok(())
    }

    /// Dismiss the form. Closing a closed surface is a no-op.
    pub fn close(&mut self) -> Result<(), TransitionError> {
        match self {
            EditSurface::Submitting { .. } => Err(self.illegal("close")),
            _ => {
                *self = EditSurface::Closed;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_path() -> anyhow::Result<()> {
        let mut surface = EditSurface::default();
        surface.open_for_create()?;
        assert_eq!(surface.begin_submit()?, None);
        surface.finish_submit(true)?;
        assert_eq!(surface, EditSurface::Closed);
        Ok(())
    }

    #[test]
    fn failed_edit_returns_to_form() -> anyhow::Result<()> {
        let mut surface = EditSurface::default();
        surface.open_for_edit(RecordId::new("4"))?;
        assert_eq!(surface.begin_submit()?, Some(RecordId::new("4")));
        surface.finish_submit(false)?;
        assert_eq!(surface, EditSurface::OpenForEdit(RecordId::new("4")));
        Ok(())
    }

    #[test]
    fn illegal_transitions_leave_state_alone() -> anyhow::Result<()> {
        let mut surface = EditSurface::default();
        assert!(surface.begin_submit().is_err());
        assert!(surface.finish_submit(true).is_err());
        assert_eq!(surface, EditSurface::Closed);

        surface.open_for_create()?;
        surface.begin_submit()?;
        let err = surface.close().expect_err("close while submitting");
        assert_eq!(err.to_string(), "cannot close while the editor is submitting");
        assert!(surface.open_for_edit(RecordId::new("1")).is_err());
        assert!(matches!(surface, EditSurface::Submitting { .. }));
        Ok(())
    }
}
