//! Per-section edit lifecycle: `Viewing -> Editing -> Saving -> Viewing`.
//!
//! Every profile section owns one [`SectionEditor`] with its own snapshot, so entering
//! edit on one section never touches the unsaved values of another.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Viewing,
    Editing,
    Saving,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditStateError {
    #[error("section is not being edited")]
    NotEditing,
    #[error("a save is already in progress")]
    SaveInProgress,
}

/// Working copy of one section plus the snapshot taken when editing began.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionEditor<T> {
    working: T,
    snapshot: Option<T>,
    phase: EditPhase,
    last_error: Option<String>,
}

impl<T: Clone> SectionEditor<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            working: value,
            snapshot: None,
            phase: EditPhase::Viewing,
            last_error: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.phase != EditPhase::Viewing
    }

    /// Current working copy, including unsaved edits.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.working
    }

    /// Last committed value: the snapshot while editing, else the working copy.
    #[must_use]
    pub fn committed(&self) -> &T {
        self.snapshot.as_ref().unwrap_or(&self.working)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Snapshot the working copy and start editing. Does nothing when already editing.
    pub fn begin_edit(&mut self) {
        if self.phase != EditPhase::Viewing {
            return;
        }
        self.snapshot = Some(self.working.clone());
        self.last_error = None;
        self.phase = EditPhase::Editing;
    }

    /// # Errors
    ///
    /// Returns `EditStateError::NotEditing` outside `Editing` and `SaveInProgress` while
    /// saving.
    pub fn edit(&mut self) -> Result<&mut T, EditStateError> {
        match self.phase {
            EditPhase::Editing => Ok(&mut self.working),
            EditPhase::Saving => Err(EditStateError::SaveInProgress),
            EditPhase::Viewing => Err(EditStateError::NotEditing),
        }
    }

    /// Restore the snapshot verbatim and go back to viewing.
    ///
    /// # Errors
    ///
    /// Returns `EditStateError::NotEditing` when not editing and `SaveInProgress` while a
    /// save is pending.
    pub fn cancel_edit(&mut self) -> Result<(), EditStateError> {
        match self.phase {
            EditPhase::Viewing => Err(EditStateError::NotEditing),
            EditPhase::Saving => Err(EditStateError::SaveInProgress),
            EditPhase::Editing => {
                if let Some(snapshot) = self.snapshot.take() {
                    self.working = snapshot;
                }
                self.last_error = None;
                self.phase = EditPhase::Viewing;
                Ok(())
            }
        }
    }

    /// Enter `Saving` and hand out the payload to send.
    ///
    /// # Errors
    ///
    /// Returns `EditStateError::NotEditing` when not editing and `SaveInProgress` when a
    /// save is already pending.
    pub fn begin_save(&mut self) -> Result<T, EditStateError> {
        match self.phase {
            EditPhase::Viewing => Err(EditStateError::NotEditing),
            EditPhase::Saving => Err(EditStateError::SaveInProgress),
            EditPhase::Editing => {
                self.phase = EditPhase::Saving;
                self.last_error = None;
                Ok(self.working.clone())
            }
        }
    }

    /// The backend accepted the save: drop the snapshot and go back to viewing.
    pub fn complete_save(&mut self) {
        if self.phase == EditPhase::Saving {
            self.snapshot = None;
            self.phase = EditPhase::Viewing;
        }
    }

    /// The save failed: stay in `Editing` with the user's values and keep the message.
    pub fn fail_save(&mut self, message: impl Into<String>) {
        if self.phase == EditPhase::Saving {
            self.phase = EditPhase::Editing;
        }
        self.last_error = Some(message.into());
    }

    /// Replace the value with server state. Ignored while an edit is open so a reload
    /// never clobbers unsaved input.
    pub fn replace(&mut self, value: T) -> bool {
        if self.phase != EditPhase::Viewing {
            return false;
        }
        self.working = value;
        true
    }
}

/// Add/edit modal for one record of a multi-record section.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordModal<D> {
    draft: Option<D>,
    saving: bool,
    last_error: Option<String>,
}

impl<D> Default for RecordModal<D> {
    fn default() -> Self {
        Self {
            draft: None,
            saving: false,
            last_error: None,
        }
    }
}

impl<D: Clone + Default> RecordModal<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Open with an empty draft.
    pub fn open_add(&mut self) {
        self.open_with(D::default());
    }

    /// Open seeded from an existing record (its id included).
    pub fn open_edit(&mut self, draft: D) {
        self.open_with(draft);
    }

    fn open_with(&mut self, draft: D) {
        self.draft = Some(draft);
        self.saving = false;
        self.last_error = None;
    }

    #[must_use]
    pub fn draft(&self) -> Option<&D> {
        self.draft.as_ref()
    }

    /// # Errors
    ///
    /// Returns `EditStateError::NotEditing` when closed and `SaveInProgress` while saving.
    pub fn draft_mut(&mut self) -> Result<&mut D, EditStateError> {
        if self.saving {
            return Err(EditStateError::SaveInProgress);
        }
        self.draft.as_mut().ok_or(EditStateError::NotEditing)
    }

    pub fn close(&mut self) {
        self.draft = None;
        self.saving = false;
        self.last_error = None;
    }

    /// # Errors
    ///
    /// Returns `EditStateError::NotEditing` when closed and `SaveInProgress` while saving.
    pub fn begin_save(&mut self) -> Result<D, EditStateError> {
        if self.saving {
            return Err(EditStateError::SaveInProgress);
        }
        let draft = self.draft.clone().ok_or(EditStateError::NotEditing)?;
        self.saving = true;
        self.last_error = None;
        Ok(draft)
    }

    /// Success closes the modal.
    pub fn complete_save(&mut self) {
        self.close();
    }

    /// Failure keeps the modal open with the draft as typed.
    pub fn fail_save(&mut self, message: impl Into<String>) {
        self.saving = false;
        self.last_error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommunicationDetails, PersonalDetails};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Form {
        personal: PersonalDetails,
        communication: CommunicationDetails,
    }

    fn seeded() -> Form {
        let mut form = Form::default();
        form.personal.first_name = "Ana".into();
        form.personal.last_name = "Lee".into();
        form.communication.email_id = "ana@example.com".into();
        form.communication.city = "Chennai".into();
        form
    }

    #[test]
    fn cancel_restores_every_field() {
        let original = seeded();
        let mut editor = SectionEditor::new(original.clone());
        editor.begin_edit();
        {
            let form = editor.edit().unwrap();
            form.personal.first_name = "Changed".into();
            form.communication.city = "Madurai".into();
            form.communication.pincode = "625001".into();
        }
        assert_eq!(editor.committed(), &original);
        editor.cancel_edit().unwrap();
        assert_eq!(editor.value(), &original);
        assert_eq!(editor.phase(), EditPhase::Viewing);
    }

    #[test]
    fn failed_save_keeps_user_input() {
        let mut editor = SectionEditor::new(seeded());
        editor.begin_edit();
        editor.edit().unwrap().communication.email_id = "dup@example.com".into();
        let payload = editor.begin_save().unwrap();
        assert_eq!(payload.communication.email_id, "dup@example.com");
        assert_eq!(editor.edit().unwrap_err(), EditStateError::SaveInProgress);

        editor.fail_save("duplicate email");
        assert_eq!(editor.phase(), EditPhase::Editing);
        assert_eq!(editor.value().communication.email_id, "dup@example.com");
        assert_eq!(editor.last_error(), Some("duplicate email"));
    }

    #[test]
    fn successful_save_returns_to_viewing() {
        let mut editor = SectionEditor::new(seeded());
        editor.begin_edit();
        editor.edit().unwrap().personal.last_name = "Li".into();
        editor.begin_save().unwrap();
        editor.complete_save();
        assert_eq!(editor.phase(), EditPhase::Viewing);
        assert_eq!(editor.committed().personal.last_name, "Li");
        assert_eq!(editor.cancel_edit(), Err(EditStateError::NotEditing));
    }

    #[test]
    fn begin_edit_twice_keeps_first_snapshot() {
        let original = seeded();
        let mut editor = SectionEditor::new(original.clone());
        editor.begin_edit();
        editor.edit().unwrap().personal.first_name = "Bea".into();
        editor.begin_edit();
        editor.cancel_edit().unwrap();
        assert_eq!(editor.value(), &original);
    }

    #[test]
    fn replace_is_ignored_while_editing() {
        let mut editor = SectionEditor::new(seeded());
        editor.begin_edit();
        assert!(!editor.replace(Form::default()));
        editor.cancel_edit().unwrap();
        assert!(editor.replace(Form::default()));
        assert_eq!(editor.value(), &Form::default());
    }

    #[test]
    fn independent_sections_do_not_share_snapshots() {
        let mut personal = SectionEditor::new(seeded().personal);
        let mut contact = SectionEditor::new(seeded().communication);
        personal.begin_edit();
        personal.edit().unwrap().first_name = "Draft".into();
        contact.begin_edit();
        contact.edit().unwrap().city = "Draft city".into();
        contact.cancel_edit().unwrap();
        assert_eq!(personal.value().first_name, "Draft");
        assert_eq!(contact.value().city, "Chennai");
    }

    #[test]
    fn modal_lifecycle() {
        let mut modal: RecordModal<PersonalDetails> = RecordModal::new();
        assert!(modal.draft_mut().is_err());
        modal.open_add();
        modal.draft_mut().unwrap().first_name = "New".into();
        let draft = modal.begin_save().unwrap();
        assert_eq!(draft.first_name, "New");
        assert_eq!(modal.begin_save(), Err(EditStateError::SaveInProgress));
        modal.fail_save("boom");
        assert!(modal.is_open());
        assert_eq!(modal.draft().unwrap().first_name, "New");
        modal.begin_save().unwrap();
        modal.complete_save();
        assert!(!modal.is_open());
    }
}
