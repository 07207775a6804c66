mod certificates_vm;
mod course_card_vm;
mod course_detail_vm;
mod deliverables_vm;
mod feedback_vm;
mod payment_vm;
mod profile_vm;
mod time_fmt;

pub use certificates_vm::{CertificateRowVm, CertificatesVm};
pub use course_card_vm::{
    ButtonVariant, CardActionVm, CourseCardVm, IconLinkVm, StatusBadge, map_course_cards,
};
pub use course_detail_vm::{CourseDetailVm, SelectedEbook, TabVm};
pub use deliverables_vm::{DeliverableGroupVm, DeliverableItemVm, DeliverablesVm};
pub use feedback_vm::{COMMENT_PLACEHOLDER, FeedbackFormVm, OptionVm, QuestionInput, QuestionVm};
pub use payment_vm::{NO_PAYMENTS, PaymentRowVm, PaymentStatus, PaymentVm};
pub use profile_vm::{FieldRowVm, ProfileHeaderVm, ProfileVm, SectionVm};
pub use time_fmt::{MISSING_DATE, format_amount, format_date};
