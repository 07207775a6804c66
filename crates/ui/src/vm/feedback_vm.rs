use portal_core::model::{FeedbackAnswers, MAX_RATING, QuestionKind};
use serde::Serialize;
use services::FeedbackForm;

pub const COMMENT_PLACEHOLDER: &str = "ENTER YOUR COMMENTS HERE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionInput {
    Radio,
    Comment,
    Rating,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OptionVm {
    pub id: u64,
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionVm {
    pub id: u64,
    /// `"<n>. <question>"`.
    pub label: String,
    pub input: QuestionInput,
    pub required: bool,
    pub options: Vec<OptionVm>,
    pub answer: Option<String>,
    /// Filled stars out of `max_rating`.
    pub stars: u8,
    pub max_rating: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeedbackFormVm {
    pub title: String,
    pub questions: Vec<QuestionVm>,
    pub submitting: bool,
    pub submit_label: &'static str,
}

const GROUPS: [(QuestionKind, QuestionInput); 3] = [
    (QuestionKind::Choice, QuestionInput::Radio),
    (QuestionKind::Comment, QuestionInput::Comment),
    (QuestionKind::Rating, QuestionInput::Rating),
];

impl FeedbackFormVm {
    /// Questions are grouped radio, comment, rating and numbered across the groups.
    /// Questions of any other type are not shown.
    #[must_use]
    pub fn new(
        title: &str,
        form: &FeedbackForm,
        answers: &FeedbackAnswers,
        submitting: bool,
    ) -> Self {
        let questions = GROUPS
            .iter()
            .flat_map(|(kind, input)| {
                form.questions_of(*kind).map(move |question| (*input, question))
            })
            .enumerate()
            .map(|(index, (input, question))| {
                let answer = answers.get(question.id).map(str::to_owned);
                let options = match input {
                    QuestionInput::Radio => form
                        .options_for(question)
                        .into_iter()
                        .map(|option| OptionVm {
                            id: option.id,
                            name: option.name.clone(),
                            selected: answer.as_deref() == Some(option.id.to_string().as_str()),
                        })
                        .collect(),
                    QuestionInput::Comment | QuestionInput::Rating => Vec::new(),
                };
                QuestionVm {
                    id: question.id,
                    label: format!("{}. {}", index + 1, question.name),
                    input,
                    required: question.kind().is_required(),
                    options,
                    stars: match input {
                        QuestionInput::Rating => answers.rating(question.id).unwrap_or(0),
                        QuestionInput::Radio | QuestionInput::Comment => 0,
                    },
                    answer,
                    max_rating: MAX_RATING,
                }
            })
            .collect();

        Self {
            title: title.to_owned(),
            questions,
            submitting,
            submit_label: if submitting { "Submitting..." } else { "Submit" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::{FeedbackOption, FeedbackQuestion, UserCourseId};

    fn question(id: u64, name: &str, type_id: i64, answer_ids: Option<&str>) -> FeedbackQuestion {
        FeedbackQuestion {
            id,
            name: name.into(),
            type_id: Some(type_id),
            answer_ids: answer_ids.map(str::to_owned),
        }
    }

    fn form() -> FeedbackForm {
        FeedbackForm {
            course: UserCourseId::new(8),
            questions: vec![
                question(1, "Rate the trainer", 3, None),
                question(2, "Anything else?", 2, None),
                question(3, "Pace", 1, Some("10,11")),
                question(4, "Legacy", 9, None),
            ],
            options: vec![
                FeedbackOption {
                    id: 10,
                    name: "Too fast".into(),
                },
                FeedbackOption {
                    id: 11,
                    name: "Just right".into(),
                },
                FeedbackOption {
                    id: 12,
                    name: "Unused".into(),
                },
            ],
        }
    }

    #[test]
    fn numbering_runs_across_groups() {
        let vm = FeedbackFormVm::new("AutoCAD", &form(), &FeedbackAnswers::new(), false);
        let labels: Vec<_> = vm.questions.iter().map(|q| q.label.as_str()).collect();
        assert_eq!(
            labels,
            ["1. Pace", "2. Anything else?", "3. Rate the trainer"]
        );
        assert_eq!(vm.questions[0].options.len(), 2);
        assert!(!vm.questions[1].required);
        assert_eq!(vm.submit_label, "Submit");
    }

    #[test]
    fn answers_mark_choices_and_stars() {
        let mut answers = FeedbackAnswers::new();
        answers.set_choice(3, 11);
        answers.set_rating(1, 4);
        let vm = FeedbackFormVm::new("AutoCAD", &form(), &answers, true);

        let selected: Vec<_> = vm.questions[0]
            .options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(selected, ["Just right"]);
        assert_eq!(vm.questions[2].stars, 4);
        assert_eq!(vm.submit_label, "Submitting...");
    }
}
