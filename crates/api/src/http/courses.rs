use async_trait::async_trait;
use portal_core::model::{
    CompletedCertificate, Course, DeliverableGroup, PaymentRecord, PaymentSummary, Session,
    UserCourseId,
};
use portal_core::wire;

use super::{Call, Discriminator, HttpPortal, paths};
use crate::repository::{ApiError, CourseRepository};

const COURSES_VIEW: Discriminator = Discriminator::Required("my_courses_view");
const DELIVERABLES: Discriminator = Discriminator::Required("my_course_deliverables_list");
const COMPLETED: Discriminator = Discriminator::Source("get_course_completed_students");

#[async_trait]
impl CourseRepository for HttpPortal {
    async fn list_courses(&self, session: &Session) -> Result<Vec<Course>, ApiError> {
        let call = Call::authed(COURSES_VIEW, session);
        self.post(paths::COURSES, call).await?.data_list()
    }

    async fn deliverables(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<DeliverableGroup>, ApiError> {
        let call = Call::authed(DELIVERABLES, session).with("user_course_id", course.value());
        self.post(paths::COURSES, call)
            .await?
            .data_field_list("course_title_code_concept_levels")
    }

    async fn payments(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<PaymentSummary, ApiError> {
        let call = Call::authed(COURSES_VIEW, session).with("user_course_id", course.value());
        let success = self.post(paths::PAYMENTS, call).await?;
        let pending_amount = success
            .extra_value("pending_amount")
            .map_or(0.0, wire::amount_value);
        let payments: Vec<PaymentRecord> = success.data_list()?;
        Ok(PaymentSummary {
            pending_amount,
            payments,
        })
    }

    async fn completed_certificates(
        &self,
        session: &Session,
    ) -> Result<Vec<CompletedCertificate>, ApiError> {
        let call = Call::authed(COMPLETED, session)
            .with_user(session)
            .with("master_app_id", self.config().app_id.to_string());
        self.post(paths::CERTIFICATES, call).await?.data_list()
    }
}
