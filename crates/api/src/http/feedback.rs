use async_trait::async_trait;
use portal_core::model::{FeedbackAnswers, FeedbackOption, FeedbackQuestion, Session, UserCourseId};
use serde_json::{Map, Value};

use super::{Call, Discriminator, HttpPortal};
use crate::repository::{ApiError, FeedbackRepository};

const QUESTIONS: Discriminator = Discriminator::Source("show_feedback");
const OPTIONS: Discriminator = Discriminator::Source("show_feedback_options");
const SUBMIT: Discriminator = Discriminator::Source("submit_feedback");

impl HttpPortal {
    /// Feedback operations live on the public API host and carry the app id.
    fn feedback_call(
        &self,
        discriminator: Discriminator,
        session: &Session,
        course: UserCourseId,
    ) -> Call {
        Call::authed(discriminator, session)
            .with("master_app_id", self.config().app_id)
            .with("user_course_id", course.value())
    }
}

#[async_trait]
impl FeedbackRepository for HttpPortal {
    async fn questions(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<FeedbackQuestion>, ApiError> {
        let call = self.feedback_call(QUESTIONS, session, course);
        self.post_url(&self.config().public_api_url, call)
            .await?
            .data_list()
    }

    async fn options(
        &self,
        session: &Session,
        course: UserCourseId,
    ) -> Result<Vec<FeedbackOption>, ApiError> {
        let call = self.feedback_call(OPTIONS, session, course);
        self.post_url(&self.config().public_api_url, call)
            .await?
            .data_list()
    }

    async fn submit(
        &self,
        session: &Session,
        course: UserCourseId,
        answers: &FeedbackAnswers,
    ) -> Result<(), ApiError> {
        let answers: Map<String, Value> = answers
            .iter()
            .map(|(question, answer)| (question.to_string(), Value::from(answer)))
            .collect();
        let call = self
            .feedback_call(SUBMIT, session, course)
            .with_user(session)
            .with("answers", answers);
        self.post_url(&self.config().public_api_url, call)
            .await
            .map(drop)
    }
}
