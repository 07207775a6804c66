use std::sync::Arc;

use portal_api::FeedbackRepository;
use portal_core::entitlements::{EligibilityRules, FeedbackAvailability};
use portal_core::model::{
    FeedbackAnswers, FeedbackOption, FeedbackQuestion, QuestionKind, UserCourseId,
};
use tracing::{error, info};

use crate::error::{FeedbackError, FetchError};
use crate::session::SessionContext;

/// Questions and answer options of one course's feedback form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub course: UserCourseId,
    pub questions: Vec<FeedbackQuestion>,
    pub options: Vec<FeedbackOption>,
}

impl FeedbackForm {
    /// Questions of one kind, in backend order.
    pub fn questions_of(&self, kind: QuestionKind) -> impl Iterator<Item = &FeedbackQuestion> {
        self.questions
            .iter()
            .filter(move |question| question.kind() == kind)
    }

    #[must_use]
    pub fn options_for(&self, question: &FeedbackQuestion) -> Vec<&FeedbackOption> {
        question.options_for(&self.options)
    }
}

#[derive(Clone)]
pub struct FeedbackService {
    session: SessionContext,
    feedback: Arc<dyn FeedbackRepository>,
    rules: EligibilityRules,
}

impl FeedbackService {
    #[must_use]
    pub fn new(session: SessionContext, feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self {
            session,
            feedback,
            rules: EligibilityRules::default(),
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: EligibilityRules) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn availability(&self, certificate_id: Option<i64>) -> FeedbackAvailability {
        self.rules.feedback_availability(certificate_id)
    }

    /// Fetch questions and options together; both are needed to render the form.
    ///
    /// # Errors
    ///
    /// Returns the first `FetchError` of either request.
    pub async fn load_form(&self, course: UserCourseId) -> Result<FeedbackForm, FetchError> {
        let session = self.session.current()?;
        let (questions, options) = tokio::join!(
            self.feedback.questions(&session, course),
            self.feedback.options(&session, course),
        );
        let (questions, options) = match (questions, options) {
            (Ok(questions), Ok(options)) => (questions, options),
            (Err(e), _) | (_, Err(e)) => {
                error!(user_course_id = %course, error = %e, "feedback form failed to load");
                return Err(e.into());
            }
        };
        Ok(FeedbackForm {
            course,
            questions,
            options,
        })
    }

    /// Submit answers for a course whose certificate stage is `certificate_id`.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::Unavailable` when feedback is not open for the course,
    /// `Validation` when a required question is unanswered (no request is made), and
    /// `Fetch` when the backend rejects the answers.
    pub async fn submit(
        &self,
        form: &FeedbackForm,
        certificate_id: Option<i64>,
        answers: &FeedbackAnswers,
    ) -> Result<(), FeedbackError> {
        let availability = self.availability(certificate_id);
        if let Some(message) = availability.message() {
            return Err(FeedbackError::Unavailable(message.to_owned()));
        }
        answers.validate(&form.questions)?;

        let session = self.session.current()?;
        self.feedback
            .submit(&session, form.course, answers)
            .await
            .map_err(|e| {
                error!(user_course_id = %form.course, error = %e, "feedback submission failed");
                FeedbackError::Fetch(e.into())
            })?;
        info!(user_course_id = %form.course, answers = answers.len(), "feedback submitted");
        Ok(())
    }
}
