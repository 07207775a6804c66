mod certificate;
mod course;
mod feedback;
mod ids;
mod payment;
mod profile;
mod reference;
mod session;

pub use certificate::{CompletedCertificate, certificate_download_url, last_achievement};
pub use course::{Addon, Course, Deliverable, DeliverableGroup, PaymentDeliverable};
pub use feedback::{
    FeedbackAnswers, FeedbackOption, FeedbackQuestion, QuestionKind, MAX_RATING,
};
pub use ids::{ParseIdError, RecordId, ReferenceId, UserCourseId, UserId};
pub use payment::{PaymentRecord, PaymentSummary};
pub use profile::{
    AcademicDraft, AcademicRecord, CareerHistory, CareerStatus, CommunicationDetails,
    PersonalDetails, ProfessionalDraft, ProfessionalRecord, Profile, ProfileSection,
    format_total_experience, latest_academic, latest_professional,
};
pub use reference::{ReferenceChoice, ReferenceItem, ReferenceKind, ReferenceLists};
pub use session::{Identity, Session, SessionError};
