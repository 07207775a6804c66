use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portal_core::model::{
    AcademicDraft, AcademicRecord, CareerHistory, CareerStatus, CommunicationDetails,
    CompletedCertificate, Course, DeliverableGroup, FeedbackAnswers, FeedbackOption,
    FeedbackQuestion, PaymentSummary, PersonalDetails, ProfessionalDraft, ProfessionalRecord,
    RecordId, ReferenceChoice, ReferenceItem, ReferenceKind, Session, UserCourseId, UserId,
};
use thiserror::Error;

/// Errors surfaced by backend adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("{message}")]
    Application { status: i64, message: String },

    #[error("not found")]
    NotFound,
}

/// Everything the profile-view call returns: the editable sections plus the country and
/// state lists that ride along with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileView {
    pub personal: PersonalDetails,
    pub communication: CommunicationDetails,
    pub status: CareerStatus,
    /// Academic details of the learner's enrollment, used until a career history exists.
    pub enrolled_academic: Option<AcademicRecord>,
    pub countries: Vec<ReferenceItem>,
    pub states: Vec<ReferenceItem>,
}

/// Payload of the single "profile update" call shared by the personal and
/// communication sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub personal: PersonalDetails,
    pub communication: CommunicationDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// Mobile number or email id.
    pub identifier: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub user_id: UserId,
    pub first_name: String,
    pub picture_url: String,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn profile_view(&self, session: &Session) -> Result<ProfileView, ApiError>;

    /// Fetch the profile picture URL; empty when none is set.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn profile_picture(&self, session: &Session) -> Result<String, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn career_history(&self, session: &Session) -> Result<CareerHistory, ApiError>;

    /// Save the personal and communication sections.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Application` with the backend message when the update is
    /// rejected.
    async fn update_profile(&self, session: &Session, update: &ProfileUpdate)
    -> Result<(), ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` when the status cannot be saved.
    async fn set_status(&self, session: &Session, status: &CareerStatus) -> Result<(), ApiError>;

    /// Create (no id) or update (id present) one academic entry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the entry cannot be saved.
    async fn set_academic(&self, session: &Session, draft: &AcademicDraft) -> Result<(), ApiError>;

    /// Create (no id) or update (id present) one professional entry.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the entry cannot be saved.
    async fn set_professional(
        &self,
        session: &Session,
        draft: &ProfessionalDraft,
    ) -> Result<(), ApiError>;
}

#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// Fetch one master list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for lists that only come with the profile view,
    /// and other errors on failure.
    async fn reference_list(
        &self,
        session: &Session,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceItem>, ApiError>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn list_courses(&self, session: &Session) -> Result<Vec<Course>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn deliverables(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<DeliverableGroup>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn payments(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<PaymentSummary, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn completed_certificates(
        &self,
        session: &Session,
    ) -> Result<Vec<CompletedCertificate>, ApiError>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn questions(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<FeedbackQuestion>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` on transport, decode or application failure.
    async fn options(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<FeedbackOption>, ApiError>;

    /// # Errors
    ///
    /// Returns `ApiError` when the answers are rejected.
    async fn submit(
        &self,
        session: &Session,
        course: UserCourseId,
        answers: &FeedbackAnswers,
    ) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Exchange an identifier and OTP for a session token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Application` with the backend message on rejection.
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, ApiError>;
}

/// Backend operations, used by [`InMemoryPortal`] to log calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ProfileView,
    ProfilePicture,
    CareerHistory,
    UpdateProfile,
    SetStatus,
    SetAcademic,
    SetProfessional,
    ReferenceList(ReferenceKind),
    Courses,
    Deliverables,
    Payments,
    Certificates,
    FeedbackQuestions,
    FeedbackOptions,
    SubmitFeedback,
    Login,
}

#[derive(Debug, Default)]
struct PortalState {
    profile: Option<ProfileView>,
    picture: String,
    history: CareerHistory,
    references: HashMap<ReferenceKind, Vec<ReferenceItem>>,
    courses: Vec<Course>,
    deliverables: HashMap<UserCourseId, Vec<DeliverableGroup>>,
    payments: HashMap<UserCourseId, PaymentSummary>,
    certificates: Vec<CompletedCertificate>,
    questions: HashMap<UserCourseId, Vec<FeedbackQuestion>>,
    options: Vec<FeedbackOption>,
    submissions: Vec<(UserCourseId, FeedbackAnswers)>,
    accounts: HashMap<(String, String), LoginGrant>,
    failures: HashMap<Operation, ApiError>,
    calls: Vec<Operation>,
    next_record_id: u64,
}

/// In-memory backend for tests and offline demos.
///
/// Seed it with builder-style setters, make operations fail with [`Self::fail`], and
/// inspect what was called with [`Self::calls`].
#[derive(Clone, Default)]
pub struct InMemoryPortal {
    state: Arc<Mutex<PortalState>>,
}

impl InMemoryPortal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut PortalState) -> R) -> Result<R, ApiError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(f(&mut guard))
    }

    /// Log the call and return the injected failure, if any.
    fn enter(&self, op: Operation) -> Result<(), ApiError> {
        self.with_state(|state| {
            state.calls.push(op);
            state.failures.get(&op).cloned()
        })?
        .map_or(Ok(()), Err)
    }

    fn seed(&self, f: impl FnOnce(&mut PortalState)) {
        // A poisoned fake only happens after a panicking test; nothing left to seed.
        if let Ok(mut guard) = self.state.lock() {
            f(&mut guard);
        }
    }

    #[must_use]
    pub fn with_profile(self, profile: ProfileView) -> Self {
        self.seed(|state| state.profile = Some(profile));
        self
    }

    #[must_use]
    pub fn with_picture(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.seed(|state| state.picture = url);
        self
    }

    #[must_use]
    pub fn with_career_history(self, history: CareerHistory) -> Self {
        self.seed(|state| {
            let highest = history
                .academics
                .iter()
                .filter_map(|record| record.id)
                .chain(history.professions.iter().filter_map(|record| record.id))
                .map(|id| id.value())
                .max()
                .unwrap_or_default();
            state.next_record_id = state.next_record_id.max(highest);
            state.history = history;
        });
        self
    }

    #[must_use]
    pub fn with_reference_list(self, kind: ReferenceKind, items: Vec<ReferenceItem>) -> Self {
        self.seed(|state| {
            state.references.insert(kind, items);
        });
        self
    }

    #[must_use]
    pub fn with_courses(self, courses: Vec<Course>) -> Self {
        self.seed(|state| state.courses = courses);
        self
    }

    #[must_use]
    pub fn with_deliverables(self, course: UserCourseId, groups: Vec<DeliverableGroup>) -> Self {
        self.seed(|state| {
            state.deliverables.insert(course, groups);
        });
        self
    }

    #[must_use]
    pub fn with_payments(self, course: UserCourseId, summary: PaymentSummary) -> Self {
        self.seed(|state| {
            state.payments.insert(course, summary);
        });
        self
    }

    #[must_use]
    pub fn with_certificates(self, certificates: Vec<CompletedCertificate>) -> Self {
        self.seed(|state| state.certificates = certificates);
        self
    }

    #[must_use]
    pub fn with_feedback(
        self,
        course: UserCourseId,
        questions: Vec<FeedbackQuestion>,
        options: Vec<FeedbackOption>,
    ) -> Self {
        self.seed(|state| {
            state.questions.insert(course, questions);
            state.options = options;
        });
        self
    }

    #[must_use]
    pub fn with_account(
        self,
        identifier: impl Into<String>,
        otp: impl Into<String>,
        grant: LoginGrant,
    ) -> Self {
        let key = (identifier.into(), otp.into());
        self.seed(|state| {
            state.accounts.insert(key, grant);
        });
        self
    }

    /// Make every later call of `op` fail with `error`.
    pub fn fail(&self, op: Operation, error: ApiError) {
        self.seed(|state| {
            state.failures.insert(op, error);
        });
    }

    pub fn recover(&self, op: Operation) {
        self.seed(|state| {
            state.failures.remove(&op);
        });
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Operation> {
        self.with_state(|state| state.calls.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn call_count(&self, op: Operation) -> usize {
        self.calls().into_iter().filter(|call| *call == op).count()
    }

    #[must_use]
    pub fn profile(&self) -> Option<ProfileView> {
        self.with_state(|state| state.profile.clone())
            .ok()
            .flatten()
    }

    #[must_use]
    pub fn career_history_snapshot(&self) -> CareerHistory {
        self.with_state(|state| state.history.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<(UserCourseId, FeedbackAnswers)> {
        self.with_state(|state| state.submissions.clone())
            .unwrap_or_default()
    }
}

impl PortalState {
    fn next_id(&mut self) -> RecordId {
        self.next_record_id += 1;
        RecordId::new(self.next_record_id)
    }

    fn reference_name(&self, kind: ReferenceKind, choice: &ReferenceChoice) -> String {
        match choice {
            ReferenceChoice::Selected(id) => self
                .references
                .get(&kind)
                .and_then(|items| items.iter().find(|item| item.id == *id))
                .map(|item| item.name.clone())
                .unwrap_or_default(),
            ReferenceChoice::NewText(text) => text.clone(),
        }
    }
}

fn upsert<T>(
    records: &mut Vec<T>,
    id: Option<RecordId>,
    record: T,
    id_of: impl Fn(&T) -> Option<RecordId>,
) -> Result<(), ApiError> {
    match id {
        None => {
            records.push(record);
            Ok(())
        }
        Some(id) => {
            let slot = records
                .iter_mut()
                .find(|existing| id_of(existing) == Some(id))
                .ok_or(ApiError::NotFound)?;
            *slot = record;
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryPortal {
    async fn profile_view(&self, _session: &Session) -> Result<ProfileView, ApiError> {
        self.enter(Operation::ProfileView)?;
        self.with_state(|state| state.profile.clone())?
            .ok_or(ApiError::NotFound)
    }

    async fn profile_picture(&self, _session: &Session) -> Result<String, ApiError> {
        self.enter(Operation::ProfilePicture)?;
        self.with_state(|state| state.picture.clone())
    }

    async fn career_history(&self, _session: &Session) -> Result<CareerHistory, ApiError> {
        self.enter(Operation::CareerHistory)?;
        self.with_state(|state| state.history.clone())
    }

    async fn update_profile(
        &self,
        _session: &Session,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError> {
        self.enter(Operation::UpdateProfile)?;
        self.with_state(|state| {
            let profile = state.profile.get_or_insert_with(ProfileView::default);
            profile.personal = update.personal.clone();
            profile.communication = update.communication.clone();
        })
    }

    async fn set_status(&self, _session: &Session, status: &CareerStatus) -> Result<(), ApiError> {
        self.enter(Operation::SetStatus)?;
        self.with_state(|state| {
            state.profile.get_or_insert_with(ProfileView::default).status = status.clone();
        })
    }

    async fn set_academic(&self, _session: &Session, draft: &AcademicDraft) -> Result<(), ApiError> {
        self.enter(Operation::SetAcademic)?;
        self.with_state(|state| {
            let id = draft.id.unwrap_or_else(|| state.next_id());
            let record = AcademicRecord {
                id: Some(id),
                institute: state.reference_name(ReferenceKind::Institute, &draft.institute),
                degree: state.reference_name(ReferenceKind::Degree, &draft.degree),
                location: draft.location.clone(),
                end_date: draft.end_date,
            };
            upsert(&mut state.history.academics, draft.id, record, |r| r.id)
        })?
    }

    async fn set_professional(
        &self,
        _session: &Session,
        draft: &ProfessionalDraft,
    ) -> Result<(), ApiError> {
        self.enter(Operation::SetProfessional)?;
        self.with_state(|state| {
            let id = draft.id.unwrap_or_else(|| state.next_id());
            let record = ProfessionalRecord {
                id: Some(id),
                organization: state.reference_name(ReferenceKind::Company, &draft.company),
                designation: state.reference_name(ReferenceKind::Designation, &draft.designation),
                location: draft.location.clone(),
                start_date: draft.start_date,
                end_date: draft.end_date,
            };
            upsert(&mut state.history.professions, draft.id, record, |r| r.id)
        })?
    }
}

#[async_trait]
impl ReferenceRepository for InMemoryPortal {
    async fn reference_list(
        &self,
        _session: &Session,
        kind: ReferenceKind,
    ) -> Result<Vec<ReferenceItem>, ApiError> {
        self.enter(Operation::ReferenceList(kind))?;
        self.with_state(|state| state.references.get(&kind).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl CourseRepository for InMemoryPortal {
    async fn list_courses(&self, _session: &Session) -> Result<Vec<Course>, ApiError> {
        self.enter(Operation::Courses)?;
        self.with_state(|state| state.courses.clone())
    }

    async fn deliverables(
        &self,
        _session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<DeliverableGroup>, ApiError> {
        self.enter(Operation::Deliverables)?;
        self.with_state(|state| state.deliverables.get(&course).cloned().unwrap_or_default())
    }

    async fn payments(
        &self,
        _session: &Session,
        course: UserCourseId,
    ) -> Result<PaymentSummary, ApiError> {
        self.enter(Operation::Payments)?;
        self.with_state(|state| state.payments.get(&course).cloned())?
            .ok_or(ApiError::NotFound)
    }

    async fn completed_certificates(
        &self,
        _session: &Session,
    ) -> Result<Vec<CompletedCertificate>, ApiError> {
        self.enter(Operation::Certificates)?;
        self.with_state(|state| state.certificates.clone())
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryPortal {
    async fn questions(
        &self,
        _session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<FeedbackQuestion>, ApiError> {
        self.enter(Operation::FeedbackQuestions)?;
        self.with_state(|state| state.questions.get(&course).cloned().unwrap_or_default())
    }

    async fn options(
        &self,
        _session: &Session,
        _course: UserCourseId,
    ) -> Result<Vec<FeedbackOption>, ApiError> {
        self.enter(Operation::FeedbackOptions)?;
        self.with_state(|state| state.options.clone())
    }

    async fn submit(
        &self,
        _session: &Session,
        course: UserCourseId,
        answers: &FeedbackAnswers,
    ) -> Result<(), ApiError> {
        self.enter(Operation::SubmitFeedback)?;
        self.with_state(|state| state.submissions.push((course, answers.clone())))
    }
}

#[async_trait]
impl AuthRepository for InMemoryPortal {
    async fn login(&self, request: &LoginRequest) -> Result<LoginGrant, ApiError> {
        self.enter(Operation::Login)?;
        let key = (request.identifier.clone(), request.otp.clone());
        self.with_state(|state| state.accounts.get(&key).cloned())?
            .ok_or_else(|| ApiError::Application {
                status: 401,
                message: "Invalid OTP. Please try again.".to_owned(),
            })
    }
}

/// Aggregates the backend repositories behind trait objects so the HTTP adapter and the
/// in-memory fake are interchangeable.
#[derive(Clone)]
pub struct Portal {
    pub profiles: Arc<dyn ProfileRepository>,
    pub references: Arc<dyn ReferenceRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub auth: Arc<dyn AuthRepository>,
}

impl Portal {
    #[must_use]
    pub fn in_memory(portal: InMemoryPortal) -> Self {
        let profiles: Arc<dyn ProfileRepository> = Arc::new(portal.clone());
        let references: Arc<dyn ReferenceRepository> = Arc::new(portal.clone());
        let courses: Arc<dyn CourseRepository> = Arc::new(portal.clone());
        let feedback: Arc<dyn FeedbackRepository> = Arc::new(portal.clone());
        let auth: Arc<dyn AuthRepository> = Arc::new(portal);
        Self {
            profiles,
            references,
            courses,
            feedback,
            auth,
        }
    }
}
