use std::sync::Arc;

use portal_api::{ApiError, ProfileRepository, ProfileView, ReferenceRepository};
use portal_core::completion::{Checklist, completion};
use portal_core::model::{
    CareerHistory, Identity, Profile, ReferenceItem, ReferenceKind, ReferenceLists, Session,
};
use tracing::{debug, error, warn};

use crate::error::FetchError;
use crate::session::SessionContext;

/// Lists fetched on their own; countries and states come with the profile view.
const FETCHED_LISTS: [ReferenceKind; 6] = [
    ReferenceKind::Status,
    ReferenceKind::Gender,
    ReferenceKind::Institute,
    ReferenceKind::Degree,
    ReferenceKind::Company,
    ReferenceKind::Designation,
];

/// The canonical profile with everything needed to render and edit it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedProfile {
    pub profile: Profile,
    pub references: ReferenceLists,
    pub completion: u8,
}

impl AggregatedProfile {
    /// Display identity cached for headers and sidebars.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            first_name: self.profile.personal.first_name.clone(),
            contact_no: self.profile.communication.contact_no.clone(),
            picture_url: self.profile.picture_url.clone(),
        }
    }
}

/// Loads the profile, its career history and every reference list in one concurrent
/// batch and merges them.
///
/// Only the profile view is primary: when it fails the whole load fails. Every other
/// request degrades to an empty value.
#[derive(Clone)]
pub struct ProfileAggregator {
    session: SessionContext,
    profiles: Arc<dyn ProfileRepository>,
    references: Arc<dyn ReferenceRepository>,
    checklist: Checklist,
}

impl ProfileAggregator {
    #[must_use]
    pub fn new(
        session: SessionContext,
        profiles: Arc<dyn ProfileRepository>,
        references: Arc<dyn ReferenceRepository>,
        checklist: Checklist,
    ) -> Self {
        Self {
            session,
            profiles,
            references,
            checklist,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// Load for the signed-in session and cache the display identity on success.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::AuthMissing` without any request when signed out, or the
    /// error of the profile-view request.
    pub async fn load(&self) -> Result<AggregatedProfile, FetchError> {
        let session = self.session.current()?;
        let aggregated = self.load_with(&session).await?;
        self.session.cache_identity(&aggregated.identity());
        Ok(aggregated)
    }

    /// Load for an explicit session.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::AuthMissing` without any request when the session has no
    /// token or user id, or the error of the profile-view request.
    pub async fn load_with(&self, session: &Session) -> Result<AggregatedProfile, FetchError> {
        session.check()?;
        debug!(user_id = %session.user_id(), "loading profile");

        let profiles = self.profiles.as_ref();
        let refs = self.references.as_ref();
        let (view, picture, history, status, gender, institute, degree, company, designation) = tokio::join!(
            profiles.profile_view(session),
            profiles.profile_picture(session),
            profiles.career_history(session),
            refs.reference_list(session, FETCHED_LISTS[0]),
            refs.reference_list(session, FETCHED_LISTS[1]),
            refs.reference_list(session, FETCHED_LISTS[2]),
            refs.reference_list(session, FETCHED_LISTS[3]),
            refs.reference_list(session, FETCHED_LISTS[4]),
            refs.reference_list(session, FETCHED_LISTS[5]),
        );

        let view = view.map_err(|e| {
            error!(error = %e, "profile view failed");
            FetchError::from(e)
        })?;
        let picture = degrade("profile picture", picture);
        let history = degrade("career history", history);

        let fetched = [status, gender, institute, degree, company, designation];
        let mut references = ReferenceLists::new();
        for (kind, list) in FETCHED_LISTS.into_iter().zip(fetched) {
            references = references.with(kind, degrade(kind.label(), list));
        }

        Ok(self.merge(view, picture, history, references))
    }

    /// Reload only the career history, after a record modal saved.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the history cannot be fetched.
    pub async fn load_career_history(&self, session: &Session) -> Result<CareerHistory, FetchError> {
        session.check()?;
        Ok(self.profiles.career_history(session).await?)
    }

    /// Completion of `profile` against this aggregator's checklist.
    #[must_use]
    pub fn completion_of(&self, profile: &Profile) -> u8 {
        completion(Some(profile), &self.checklist)
    }

    fn merge(
        &self,
        view: ProfileView,
        picture: String,
        history: CareerHistory,
        references: ReferenceLists,
    ) -> AggregatedProfile {
        let mut profile = Profile {
            personal: view.personal,
            communication: view.communication,
            status: view.status,
            current_academic: view.enrolled_academic,
            picture_url: picture,
            ..Profile::default()
        };
        profile.apply_career_history(history);

        let references = with_profile_lists(references, view.countries, view.states);
        let completion = self.completion_of(&profile);
        AggregatedProfile {
            profile,
            references,
            completion,
        }
    }
}

fn with_profile_lists(
    references: ReferenceLists,
    countries: Vec<ReferenceItem>,
    states: Vec<ReferenceItem>,
) -> ReferenceLists {
    references
        .with(ReferenceKind::Country, countries)
        .with(ReferenceKind::State, states)
}

fn degrade<T: Default>(what: &str, result: Result<T, ApiError>) -> T {
    result.unwrap_or_else(|e| {
        warn!(request = what, error = %e, "secondary request failed; using an empty value");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use portal_api::{InMemoryPortal, MemorySessionStore, Operation, Portal};
    use portal_core::model::{AcademicRecord, ProfessionalRecord, UserId};

    fn aggregator(portal: &InMemoryPortal, session: Option<Session>) -> ProfileAggregator {
        let store = match session {
            Some(session) => MemorySessionStore::with_session(session),
            None => MemorySessionStore::new(),
        };
        let backend = Portal::in_memory(portal.clone());
        ProfileAggregator::new(
            SessionContext::new(Arc::new(store)),
            backend.profiles,
            backend.references,
            Checklist::basic(),
        )
    }

    fn session() -> Session {
        Session::new("tok", UserId::new(9)).unwrap()
    }

    fn view() -> ProfileView {
        let mut view = ProfileView::default();
        view.personal.first_name = "Ana".into();
        view.communication.contact_no = "9876543210".into();
        view.countries = vec![ReferenceItem::new(101, "India")];
        view.enrolled_academic = Some(AcademicRecord {
            institute: "Enrolled College".into(),
            ..AcademicRecord::default()
        });
        view
    }

    #[tokio::test]
    async fn signed_out_load_makes_no_request() {
        let portal = InMemoryPortal::new().with_profile(view());
        let err = aggregator(&portal, None).load().await.unwrap_err();
        assert_eq!(err, FetchError::AuthMissing);
        assert!(portal.calls().is_empty());
    }

    #[tokio::test]
    async fn secondary_failures_degrade_to_empty() {
        let portal = InMemoryPortal::new()
            .with_profile(view())
            .with_picture("https://cdn/pic.png")
            .with_reference_list(ReferenceKind::Status, vec![ReferenceItem::new(1, "Student")]);
        portal.fail(
            Operation::ReferenceList(ReferenceKind::Gender),
            ApiError::Transport("reset".into()),
        );
        portal.fail(Operation::CareerHistory, ApiError::Decode("bad".into()));

        let loaded = aggregator(&portal, Some(session())).load().await.unwrap();
        assert!(loaded.references.list(ReferenceKind::Gender).is_empty());
        assert_eq!(loaded.references.list(ReferenceKind::Status).len(), 1);
        assert_eq!(loaded.references.list(ReferenceKind::Country).len(), 1);
        assert_eq!(loaded.profile.picture_url, "https://cdn/pic.png");
        assert_eq!(
            loaded.profile.current_academic.unwrap().institute,
            "Enrolled College"
        );
        assert_eq!(portal.call_count(Operation::ProfileView), 1);
    }

    #[tokio::test]
    async fn profile_view_failure_fails_the_load() {
        let portal = InMemoryPortal::new().with_profile(view());
        portal.fail(
            Operation::ProfileView,
            ApiError::Application {
                status: 500,
                message: "Failed to fetch profile data.".into(),
            },
        );
        let err = aggregator(&portal, Some(session())).load().await.unwrap_err();
        assert_eq!(err, FetchError::Application("Failed to fetch profile data.".into()));
    }

    #[tokio::test]
    async fn career_history_overrides_enrollment_details() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
        let portal = InMemoryPortal::new()
            .with_profile(view())
            .with_career_history(CareerHistory {
                academics: vec![
                    AcademicRecord {
                        institute: "School".into(),
                        end_date: day(2015, 4, 1),
                        ..AcademicRecord::default()
                    },
                    AcademicRecord {
                        institute: "University".into(),
                        end_date: day(2020, 4, 1),
                        ..AcademicRecord::default()
                    },
                ],
                professions: vec![ProfessionalRecord {
                    organization: "Acme".into(),
                    start_date: day(2021, 1, 1),
                    ..ProfessionalRecord::default()
                }],
                total_experience_months: Some(27),
            });

        let loaded = aggregator(&portal, Some(session())).load().await.unwrap();
        let profile = &loaded.profile;
        assert_eq!(profile.current_academic.as_ref().unwrap().institute, "University");
        assert_eq!(profile.current_professional.as_ref().unwrap().organization, "Acme");
        assert_eq!(profile.total_experience.as_deref(), Some("2 years, 3 months"));
    }

    #[tokio::test]
    async fn successful_load_caches_identity_and_scores_completion() {
        let portal = InMemoryPortal::new().with_profile(view());
        let aggregator = aggregator(&portal, Some(session()));
        let loaded = aggregator.load().await.unwrap();

        // first name and contact number out of the ten basic fields
        assert_eq!(loaded.completion, 20);
        let identity = aggregator.session().identity();
        assert_eq!(identity.first_name, "Ana");
        assert_eq!(identity.contact_no, "9876543210");
    }
}
