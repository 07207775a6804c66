use std::sync::Arc;

use chrono::NaiveDate;
use portal_api::CourseRepository;
use portal_core::Clock;
use portal_core::entitlements::{
    AddonFlags, EbookGroup, EligibilityRules, EntitlementPolicy, FeedbackAvailability,
    derive_addons, group_ebook_deliverables,
};
use portal_core::model::{
    CompletedCertificate, Course, DeliverableGroup, PaymentSummary, UserCourseId,
    certificate_download_url, last_achievement,
};
use tracing::{debug, error};
use url::Url;

use crate::error::FetchError;
use crate::session::SessionContext;

/// A course plus everything derived from it for the dashboard and detail views.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOverview {
    pub course: Course,
    pub addons: AddonFlags,
    /// Schedule progress in `0.0..=100.0`.
    pub progress: f64,
    pub can_pay: bool,
    pub can_download_certificate: bool,
    pub feedback: FeedbackAvailability,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateSummary {
    pub certificates: Vec<CompletedCertificate>,
    pub last_achievement: Option<NaiveDate>,
}

impl CertificateSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.certificates.len()
    }
}

/// Course listing and the per-enrollment lookups behind it.
#[derive(Clone)]
pub struct CourseService {
    clock: Clock,
    session: SessionContext,
    courses: Arc<dyn CourseRepository>,
    rules: EligibilityRules,
    policy: EntitlementPolicy,
    certificate_url: Url,
}

impl CourseService {
    #[must_use]
    pub fn new(
        clock: Clock,
        session: SessionContext,
        courses: Arc<dyn CourseRepository>,
        certificate_url: Url,
    ) -> Self {
        Self {
            clock,
            session,
            courses,
            rules: EligibilityRules::default(),
            policy: EntitlementPolicy::default(),
            certificate_url,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: EligibilityRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: EntitlementPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn rules(&self) -> &EligibilityRules {
        &self.rules
    }

    #[must_use]
    pub fn policy(&self) -> &EntitlementPolicy {
        &self.policy
    }

    /// Every enrollment of the signed-in learner.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when signed out or the request fails.
    pub async fn list_courses(&self) -> Result<Vec<Course>, FetchError> {
        let session = self.session.current()?;
        self.courses.list_courses(&session).await.map_err(|e| {
            error!(error = %e, "course list failed");
            FetchError::from(e)
        })
    }

    /// Courses with their derived addons, progress and action gates.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_courses`].
    pub async fn overviews(&self) -> Result<Vec<CourseOverview>, FetchError> {
        let courses = self.list_courses().await?;
        Ok(courses
            .into_iter()
            .map(|course| self.overview(course))
            .collect())
    }

    /// One enrollment by id, looked up in the course list.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Application` when the learner has no such enrollment.
    pub async fn course(&self, id: UserCourseId) -> Result<CourseOverview, FetchError> {
        let course = self
            .list_courses()
            .await?
            .into_iter()
            .find(|course| course.id == id)
            .ok_or_else(|| FetchError::Application(format!("Course {id} was not found.")))?;
        Ok(self.overview(course))
    }

    #[must_use]
    pub fn overview(&self, course: Course) -> CourseOverview {
        CourseOverview {
            addons: self.addons(&course),
            progress: self.progress(&course),
            can_pay: self.rules.can_pay(&course),
            can_download_certificate: self.rules.can_download_certificate(&course),
            feedback: self.rules.feedback_availability(course.certificate_id),
            course,
        }
    }

    #[must_use]
    pub fn addons(&self, course: &Course) -> AddonFlags {
        derive_addons(course, &self.policy)
    }

    #[must_use]
    pub fn ebook_groups(&self, course: &Course) -> Vec<EbookGroup> {
        group_ebook_deliverables(course)
    }

    #[must_use]
    pub fn progress(&self, course: &Course) -> f64 {
        course.progress(self.clock.now())
    }

    /// Concept/level groups of an enrollment's deliverables.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when signed out or the request fails.
    pub async fn deliverables(&self, id: UserCourseId) -> Result<Vec<DeliverableGroup>, FetchError> {
        let session = self.session.current()?;
        debug!(user_course_id = %id, "loading deliverables");
        Ok(self.courses.deliverables(&session, id).await?)
    }

    /// # Errors
    ///
    /// Returns `FetchError` when signed out or the request fails.
    pub async fn payments(&self, id: UserCourseId) -> Result<PaymentSummary, FetchError> {
        let session = self.session.current()?;
        debug!(user_course_id = %id, "loading payments");
        Ok(self.courses.payments(&session, id).await?)
    }

    /// Completed courses with the date of the latest achievement.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when signed out or the request fails.
    pub async fn certificates(&self) -> Result<CertificateSummary, FetchError> {
        let session = self.session.current()?;
        let certificates = self.courses.completed_certificates(&session).await?;
        Ok(CertificateSummary {
            last_achievement: last_achievement(&certificates),
            certificates,
        })
    }

    /// Signed link the certificate can be downloaded from.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::AuthMissing` when nobody is signed in.
    pub fn certificate_download_url(&self, id: UserCourseId) -> Result<Url, FetchError> {
        let session = self.session.current()?;
        Ok(certificate_download_url(
            &self.certificate_url,
            session.token(),
            id,
        ))
    }
}
