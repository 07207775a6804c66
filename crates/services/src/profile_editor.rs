use std::sync::Arc;

use portal_api::{ProfileRepository, ProfileUpdate};
use portal_core::edit::{EditStateError, RecordModal, SectionEditor};
use portal_core::model::{
    AcademicDraft, CareerStatus, CommunicationDetails, PersonalDetails, ProfessionalDraft,
    RecordId,
};
use tracing::{error, info};

use crate::error::{FetchError, ProfileEditError};
use crate::profile_service::{AggregatedProfile, ProfileAggregator};

/// Single-record sections edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSection {
    Personal,
    Communication,
    Status,
}

impl FormSection {
    pub const ALL: [FormSection; 3] = [
        FormSection::Personal,
        FormSection::Communication,
        FormSection::Status,
    ];
}

/// How opening one editor affects the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Every section and modal keeps its own unsaved edits.
    #[default]
    Independent,
    /// Opening a section or modal cancels every other open edit.
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Section(FormSection),
    Academic,
    Professional,
}

/// Edit controller for the whole profile page.
///
/// Personal, communication and status each own a [`SectionEditor`]; education and
/// professional entries go through a [`RecordModal`]. Every successful save reloads
/// server state instead of merging the write locally.
pub struct ProfileEditor {
    aggregator: ProfileAggregator,
    profiles: Arc<dyn ProfileRepository>,
    mode: EditMode,
    loaded: AggregatedProfile,
    personal: SectionEditor<PersonalDetails>,
    communication: SectionEditor<CommunicationDetails>,
    status: SectionEditor<CareerStatus>,
    academic: RecordModal<AcademicDraft>,
    professional: RecordModal<ProfessionalDraft>,
}

impl ProfileEditor {
    #[must_use]
    pub fn new(
        aggregator: ProfileAggregator,
        profiles: Arc<dyn ProfileRepository>,
        mode: EditMode,
        loaded: AggregatedProfile,
    ) -> Self {
        let profile = &loaded.profile;
        Self {
            personal: SectionEditor::new(profile.personal.clone()),
            communication: SectionEditor::new(profile.communication.clone()),
            status: SectionEditor::new(profile.status.clone()),
            academic: RecordModal::new(),
            professional: RecordModal::new(),
            aggregator,
            profiles,
            mode,
            loaded,
        }
    }

    /// Load the profile and open an editor over it.
    ///
    /// # Errors
    ///
    /// Returns the aggregator's `FetchError`.
    pub async fn load(
        aggregator: ProfileAggregator,
        profiles: Arc<dyn ProfileRepository>,
        mode: EditMode,
    ) -> Result<Self, FetchError> {
        let loaded = aggregator.load().await?;
        Ok(Self::new(aggregator, profiles, mode, loaded))
    }

    /// Server state as of the last load.
    #[must_use]
    pub fn loaded(&self) -> &AggregatedProfile {
        &self.loaded
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[must_use]
    pub fn personal(&self) -> &SectionEditor<PersonalDetails> {
        &self.personal
    }

    #[must_use]
    pub fn communication(&self) -> &SectionEditor<CommunicationDetails> {
        &self.communication
    }

    #[must_use]
    pub fn status(&self) -> &SectionEditor<CareerStatus> {
        &self.status
    }

    #[must_use]
    pub fn academic_modal(&self) -> &RecordModal<AcademicDraft> {
        &self.academic
    }

    #[must_use]
    pub fn professional_modal(&self) -> &RecordModal<ProfessionalDraft> {
        &self.professional
    }

    #[must_use]
    pub fn is_editing(&self, section: FormSection) -> bool {
        match section {
            FormSection::Personal => self.personal.is_editing(),
            FormSection::Communication => self.communication.is_editing(),
            FormSection::Status => self.status.is_editing(),
        }
    }

    #[must_use]
    pub fn last_error(&self, section: FormSection) -> Option<&str> {
        match section {
            FormSection::Personal => self.personal.last_error(),
            FormSection::Communication => self.communication.last_error(),
            FormSection::Status => self.status.last_error(),
        }
    }

    pub fn begin_edit(&mut self, section: FormSection) {
        self.enter(Target::Section(section));
        match section {
            FormSection::Personal => self.personal.begin_edit(),
            FormSection::Communication => self.communication.begin_edit(),
            FormSection::Status => self.status.begin_edit(),
        }
    }

    /// # Errors
    ///
    /// Returns `EditStateError` when the section is not being edited.
    pub fn cancel_edit(&mut self, section: FormSection) -> Result<(), EditStateError> {
        match section {
            FormSection::Personal => self.personal.cancel_edit(),
            FormSection::Communication => self.communication.cancel_edit(),
            FormSection::Status => self.status.cancel_edit(),
        }
    }

    /// # Errors
    ///
    /// Returns `EditStateError` unless the personal section is being edited.
    pub fn personal_mut(&mut self) -> Result<&mut PersonalDetails, EditStateError> {
        self.personal.edit()
    }

    /// # Errors
    ///
    /// Returns `EditStateError` unless the communication section is being edited.
    pub fn communication_mut(&mut self) -> Result<&mut CommunicationDetails, EditStateError> {
        self.communication.edit()
    }

    /// # Errors
    ///
    /// Returns `EditStateError` unless the status section is being edited.
    pub fn status_mut(&mut self) -> Result<&mut CareerStatus, EditStateError> {
        self.status.edit()
    }

    /// Validate and save one section, then reload the profile.
    ///
    /// On a backend failure the section stays in editing with the typed values and the
    /// backend message.
    ///
    /// # Errors
    ///
    /// Returns `ProfileEditError::Validation` before any request when required fields are
    /// blank, `State` when the section is not being edited, `Fetch` when the save fails,
    /// and `Reload` when the save succeeded but the reload did not.
    pub async fn save(&mut self, section: FormSection) -> Result<(), ProfileEditError> {
        if !self.is_editing(section) {
            return Err(EditStateError::NotEditing.into());
        }
        match section {
            FormSection::Personal => self.personal.value().validate()?,
            FormSection::Communication => self.communication.value().validate()?,
            FormSection::Status => self.status.value().validate()?,
        }
        let session = self.aggregator.session().current()?;

        let result = match section {
            FormSection::Personal => {
                let update = ProfileUpdate {
                    personal: self.personal.begin_save()?,
                    communication: self.communication.committed().clone(),
                };
                self.profiles.update_profile(&session, &update).await
            }
            FormSection::Communication => {
                let update = ProfileUpdate {
                    personal: self.personal.committed().clone(),
                    communication: self.communication.begin_save()?,
                };
                self.profiles.update_profile(&session, &update).await
            }
            FormSection::Status => {
                let status = self.status.begin_save()?;
                self.profiles.set_status(&session, &status).await
            }
        };

        if let Err(api_error) = result {
            let failure = FetchError::from(api_error);
            error!(?section, error = %failure, "profile section save failed");
            match section {
                FormSection::Personal => self.personal.fail_save(failure.to_string()),
                FormSection::Communication => self.communication.fail_save(failure.to_string()),
                FormSection::Status => self.status.fail_save(failure.to_string()),
            }
            return Err(failure.into());
        }

        match section {
            FormSection::Personal => self.personal.complete_save(),
            FormSection::Communication => self.communication.complete_save(),
            FormSection::Status => self.status.complete_save(),
        }
        info!(?section, "profile section saved");
        self.reload().await.map_err(ProfileEditError::Reload)
    }

    /// Reload from the backend. Sections with an open edit keep their working copy.
    ///
    /// # Errors
    ///
    /// Returns the aggregator's `FetchError`; local state is left untouched.
    pub async fn reload(&mut self) -> Result<(), FetchError> {
        let loaded = self.aggregator.load().await?;
        let profile = &loaded.profile;
        self.personal.replace(profile.personal.clone());
        self.communication.replace(profile.communication.clone());
        self.status.replace(profile.status.clone());
        self.loaded = loaded;
        Ok(())
    }

    pub fn open_add_academic(&mut self) {
        self.enter(Target::Academic);
        self.academic.open_add();
    }

    /// Open the academic modal seeded with an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `ProfileEditError::UnknownRecord` when no loaded entry has `id`.
    pub fn open_edit_academic(&mut self, id: RecordId) -> Result<(), ProfileEditError> {
        let record = self
            .loaded
            .profile
            .academic(id)
            .ok_or(ProfileEditError::UnknownRecord(id))?;
        let draft = AcademicDraft::from_record(record);
        self.enter(Target::Academic);
        self.academic.open_edit(draft);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `EditStateError` when the modal is closed or saving.
    pub fn academic_draft_mut(&mut self) -> Result<&mut AcademicDraft, EditStateError> {
        self.academic.draft_mut()
    }

    pub fn close_academic(&mut self) {
        self.academic.close();
    }

    /// Save the academic draft, close the modal and refresh the career history.
    ///
    /// # Errors
    ///
    /// Same as [`Self::save`]; a failed save keeps the modal open with the draft.
    pub async fn save_academic(&mut self) -> Result<(), ProfileEditError> {
        self.academic
            .draft()
            .ok_or(EditStateError::NotEditing)?
            .validate()?;
        let session = self.aggregator.session().current()?;
        let draft = self
            .academic
            .begin_save()?
            .resolved(&self.loaded.references);

        if let Err(api_error) = self.profiles.set_academic(&session, &draft).await {
            let failure = FetchError::from(api_error);
            error!(record = ?draft.id, error = %failure, "academic entry save failed");
            self.academic.fail_save(failure.to_string());
            return Err(failure.into());
        }
        self.academic.complete_save();
        info!(record = ?draft.id, "academic entry saved");
        self.refresh_career_history().await
    }

    pub fn open_add_professional(&mut self) {
        self.enter(Target::Professional);
        self.professional.open_add();
    }

    /// Open the professional modal seeded with an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `ProfileEditError::UnknownRecord` when no loaded entry has `id`.
    pub fn open_edit_professional(&mut self, id: RecordId) -> Result<(), ProfileEditError> {
        let record = self
            .loaded
            .profile
            .professional(id)
            .ok_or(ProfileEditError::UnknownRecord(id))?;
        let draft = ProfessionalDraft::from_record(record);
        self.enter(Target::Professional);
        self.professional.open_edit(draft);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `EditStateError` when the modal is closed or saving.
    pub fn professional_draft_mut(&mut self) -> Result<&mut ProfessionalDraft, EditStateError> {
        self.professional.draft_mut()
    }

    pub fn close_professional(&mut self) {
        self.professional.close();
    }

    /// Save the professional draft, close the modal and refresh the career history.
    ///
    /// # Errors
    ///
    /// Same as [`Self::save`]; a failed save keeps the modal open with the draft.
    pub async fn save_professional(&mut self) -> Result<(), ProfileEditError> {
        self.professional
            .draft()
            .ok_or(EditStateError::NotEditing)?
            .validate()?;
        let session = self.aggregator.session().current()?;
        let draft = self
            .professional
            .begin_save()?
            .resolved(&self.loaded.references);

        if let Err(api_error) = self.profiles.set_professional(&session, &draft).await {
            let failure = FetchError::from(api_error);
            error!(record = ?draft.id, error = %failure, "professional entry save failed");
            self.professional.fail_save(failure.to_string());
            return Err(failure.into());
        }
        self.professional.complete_save();
        info!(record = ?draft.id, "professional entry saved");
        self.refresh_career_history().await
    }

    async fn refresh_career_history(&mut self) -> Result<(), ProfileEditError> {
        let session = self
            .aggregator
            .session()
            .current()
            .map_err(ProfileEditError::Reload)?;
        let history = self
            .aggregator
            .load_career_history(&session)
            .await
            .map_err(ProfileEditError::Reload)?;
        self.loaded.profile.apply_career_history(history);
        self.loaded.completion = self.aggregator.completion_of(&self.loaded.profile);
        Ok(())
    }

    fn enter(&mut self, target: Target) {
        if self.mode == EditMode::Independent {
            return;
        }
        for section in FormSection::ALL {
            if target != Target::Section(section) {
                // a section that is mid-save keeps going
                let _ = self.cancel_edit(section);
            }
        }
        if target != Target::Academic && !self.academic.is_saving() {
            self.academic.close();
        }
        if target != Target::Professional && !self.professional.is_saving() {
            self.professional.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use portal_api::{ApiError, InMemoryPortal, MemorySessionStore, Operation, Portal, ProfileView};
    use portal_core::completion::Checklist;
    use portal_core::model::{
        AcademicRecord, CareerHistory, ReferenceChoice, ReferenceItem, ReferenceKind, Session,
        UserId,
    };

    use crate::session::SessionContext;

    fn seeded() -> InMemoryPortal {
        let mut view = ProfileView::default();
        view.personal.first_name = "Ana".into();
        view.personal.last_name = "Lee".into();
        view.communication.email_id = "ana@example.com".into();
        view.communication.contact_no = "9876543210".into();
        InMemoryPortal::new()
            .with_profile(view)
            .with_reference_list(
                ReferenceKind::Institute,
                vec![ReferenceItem::new(4, "Anna University")],
            )
            .with_career_history(CareerHistory {
                academics: vec![AcademicRecord {
                    id: Some(RecordId::new(50)),
                    institute: "Old School".into(),
                    degree: "HSC".into(),
                    end_date: NaiveDate::from_ymd_opt(2015, 4, 1),
                    ..AcademicRecord::default()
                }],
                ..CareerHistory::default()
            })
    }

    async fn editor(portal: &InMemoryPortal, mode: EditMode) -> ProfileEditor {
        let session = Session::new("tok", UserId::new(1)).unwrap();
        let backend = Portal::in_memory(portal.clone());
        let aggregator = ProfileAggregator::new(
            SessionContext::new(Arc::new(MemorySessionStore::with_session(session))),
            Arc::clone(&backend.profiles),
            backend.references,
            Checklist::full(),
        );
        ProfileEditor::load(aggregator, backend.profiles, mode)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn failed_save_keeps_the_typed_values_and_the_message() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Independent).await;
        portal.fail(
            Operation::UpdateProfile,
            ApiError::Application {
                status: 409,
                message: "duplicate email".into(),
            },
        );

        editor.begin_edit(FormSection::Personal);
        editor.personal_mut().unwrap().first_name = "Anabel".into();
        let err = editor.save(FormSection::Personal).await.unwrap_err();

        assert_eq!(
            err,
            ProfileEditError::Fetch(FetchError::Application("duplicate email".into()))
        );
        assert!(editor.is_editing(FormSection::Personal));
        assert_eq!(editor.personal().value().first_name, "Anabel");
        assert_eq!(editor.last_error(FormSection::Personal), Some("duplicate email"));
        assert_eq!(portal.call_count(Operation::ProfileView), 1);
    }

    #[tokio::test]
    async fn successful_save_reloads_server_state() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Independent).await;

        editor.begin_edit(FormSection::Communication);
        editor.communication_mut().unwrap().city = "Chennai".into();
        editor.save(FormSection::Communication).await.unwrap();

        assert!(!editor.is_editing(FormSection::Communication));
        assert_eq!(portal.call_count(Operation::ProfileView), 2);
        assert_eq!(editor.loaded().profile.communication.city, "Chennai");
        let stored = portal.profile().unwrap();
        assert_eq!(stored.communication.city, "Chennai");
        assert_eq!(stored.personal.first_name, "Ana");
    }

    #[tokio::test]
    async fn validation_blocks_the_request() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Independent).await;

        editor.begin_edit(FormSection::Personal);
        editor.personal_mut().unwrap().last_name = "  ".into();
        let err = editor.save(FormSection::Personal).await.unwrap_err();

        assert!(matches!(err, ProfileEditError::Validation(_)));
        assert_eq!(portal.call_count(Operation::UpdateProfile), 0);
        assert!(editor.is_editing(FormSection::Personal));
    }

    #[tokio::test]
    async fn saving_a_section_that_is_not_open_is_a_state_error() {
        let mut view = ProfileView::default();
        view.personal.first_name = "Ana".into();
        let portal = InMemoryPortal::new().with_profile(view);
        let mut editor = editor(&portal, EditMode::Independent).await;

        let err = editor.save(FormSection::Personal).await.unwrap_err();

        assert_eq!(err, ProfileEditError::State(EditStateError::NotEditing));
        assert_eq!(portal.call_count(Operation::UpdateProfile), 0);
    }

    #[tokio::test]
    async fn independent_sections_keep_their_own_edits() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Independent).await;

        editor.begin_edit(FormSection::Personal);
        editor.personal_mut().unwrap().first_name = "Changed".into();
        editor.begin_edit(FormSection::Communication);
        editor.communication_mut().unwrap().city = "Madurai".into();

        editor.cancel_edit(FormSection::Communication).unwrap();
        assert_eq!(editor.communication().value().city, "");
        assert_eq!(editor.personal().value().first_name, "Changed");
        assert!(editor.is_editing(FormSection::Personal));

        editor.cancel_edit(FormSection::Personal).unwrap();
        assert_eq!(editor.personal().value().first_name, "Ana");
    }

    #[tokio::test]
    async fn exclusive_mode_cancels_the_other_section() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Exclusive).await;

        editor.begin_edit(FormSection::Personal);
        editor.personal_mut().unwrap().first_name = "Changed".into();
        editor.begin_edit(FormSection::Status);

        assert!(!editor.is_editing(FormSection::Personal));
        assert_eq!(editor.personal().value().first_name, "Ana");
        assert!(editor.is_editing(FormSection::Status));

        editor.open_add_academic();
        assert!(!editor.is_editing(FormSection::Status));
        assert!(editor.academic_modal().is_open());
    }

    #[tokio::test]
    async fn academic_modal_resolves_names_and_refreshes_history() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Independent).await;

        editor.open_add_academic();
        {
            let draft = editor.academic_draft_mut().unwrap();
            draft.institute = ReferenceChoice::typed(" anna university ");
            draft.degree = ReferenceChoice::typed("B.E.");
            draft.end_date = NaiveDate::from_ymd_opt(2020, 5, 1);
        }
        editor.save_academic().await.unwrap();

        assert!(!editor.academic_modal().is_open());
        let profile = &editor.loaded().profile;
        assert_eq!(profile.academics.len(), 2);
        let current = profile.current_academic.as_ref().unwrap();
        assert_eq!(current.institute, "Anna University");
        assert_eq!(current.degree, "B.E.");
        assert_eq!(portal.call_count(Operation::CareerHistory), 2);
    }

    #[tokio::test]
    async fn editing_an_entry_updates_it_in_place() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Independent).await;

        editor.open_edit_academic(RecordId::new(50)).unwrap();
        editor.academic_draft_mut().unwrap().degree = ReferenceChoice::typed("HSC (Science)");
        editor.save_academic().await.unwrap();

        let history = portal.career_history_snapshot();
        assert_eq!(history.academics.len(), 1);
        assert_eq!(history.academics[0].degree, "HSC (Science)");
        assert_eq!(
            editor.open_edit_academic(RecordId::new(999)).unwrap_err(),
            ProfileEditError::UnknownRecord(RecordId::new(999))
        );
    }

    #[tokio::test]
    async fn failed_modal_save_keeps_the_draft() {
        let portal = seeded();
        let mut editor = editor(&portal, EditMode::Independent).await;
        portal.fail(Operation::SetProfessional, ApiError::Transport("reset".into()));

        editor.open_add_professional();
        {
            let draft = editor.professional_draft_mut().unwrap();
            draft.company = ReferenceChoice::typed("Acme");
            draft.designation = ReferenceChoice::typed("Engineer");
        }
        let err = editor.save_professional().await.unwrap_err();

        assert_eq!(err, ProfileEditError::Fetch(FetchError::Network("reset".into())));
        let modal = editor.professional_modal();
        assert!(modal.is_open());
        assert!(!modal.is_saving());
        assert_eq!(modal.draft().unwrap().designation, ReferenceChoice::typed("Engineer"));
    }
}
