//! Unlockable course resources and the eligibility predicates behind course actions.

use serde::{Deserialize, Serialize};

use crate::model::{Course, PaymentDeliverable};

/// Addon names that unlock the video tab.
pub const VIDEO_ADDONS: [&str; 2] = ["Expert Video Session", "FTR - Session Videos"];

/// Payment deliverable type that unlocks the e-book tab.
pub const EBOOK_DELIVERABLE_TYPE: &str = "E-Learning Guide";

/// Fallback label for an e-book without a name.
pub const UNNAMED_EBOOK: &str = "Unnamed E-Book";

/// Resource tabs a course enrollment can unlock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonFlags {
    pub syllabus: bool,
    pub ebook: bool,
    pub video: bool,
    pub lab: bool,
    pub quiz: bool,
    pub interview: bool,
    pub links: bool,
    pub more: bool,
}

impl AddonFlags {
    #[must_use]
    pub fn any(&self) -> bool {
        AddonTab::ALL.iter().any(|tab| self.is_enabled(*tab)) || self.more
    }

    #[must_use]
    pub fn is_enabled(&self, tab: AddonTab) -> bool {
        match tab {
            AddonTab::Syllabus => self.syllabus,
            AddonTab::Ebook => self.ebook,
            AddonTab::Video => self.video,
            AddonTab::Lab => self.lab,
            AddonTab::Quiz => self.quiz,
            AddonTab::Interview => self.interview,
            AddonTab::Links => self.links,
        }
    }

    /// Enabled tabs in display order.
    #[must_use]
    pub fn enabled_tabs(&self) -> Vec<AddonTab> {
        AddonTab::ALL
            .into_iter()
            .filter(|tab| self.is_enabled(*tab))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonTab {
    Syllabus,
    Ebook,
    Video,
    Lab,
    Quiz,
    Interview,
    Links,
}

impl AddonTab {
    pub const ALL: [AddonTab; 7] = [
        AddonTab::Syllabus,
        AddonTab::Ebook,
        AddonTab::Video,
        AddonTab::Lab,
        AddonTab::Quiz,
        AddonTab::Interview,
        AddonTab::Links,
    ];

    /// Route key, as used in `defaultTab` links.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            AddonTab::Syllabus => "syllabus",
            AddonTab::Ebook => "ebook",
            AddonTab::Video => "video",
            AddonTab::Lab => "lab",
            AddonTab::Quiz => "quiz",
            AddonTab::Interview => "interview",
            AddonTab::Links => "links",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            AddonTab::Syllabus => "Syllabus",
            AddonTab::Ebook => "E-Book",
            AddonTab::Video => "Videos",
            AddonTab::Lab => "Lab Exercises",
            AddonTab::Quiz => "Quiz",
            AddonTab::Interview => "Interview Questions",
            AddonTab::Links => "Reference Links",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.key() == key)
    }
}

/// Knobs for addon derivation that the backend has not pinned down yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitlementPolicy {
    /// Payment deliverable type that unlocks the syllabus tab. `None` keeps the
    /// syllabus off for every course.
    pub syllabus_deliverable_type: Option<String>,
}

/// Derive the unlocked tabs of `course` from its deliverables.
///
/// A course without a deliverable list unlocks nothing.
#[must_use]
pub fn derive_addons(course: &Course, policy: &EntitlementPolicy) -> AddonFlags {
    let mut flags = AddonFlags::default();
    let Some(deliverables) = course.deliverables.as_deref() else {
        return flags;
    };
    for deliverable in deliverables {
        let addons = deliverable.addons.as_deref().unwrap_or_default();
        if addons
            .iter()
            .filter_map(|addon| addon.name.as_deref())
            .any(|name| VIDEO_ADDONS.contains(&name))
        {
            flags.video = true;
        }
        let items = deliverable
            .user_course_payment_deliverables
            .as_deref()
            .unwrap_or_default();
        if items.iter().any(|item| item.is_type(EBOOK_DELIVERABLE_TYPE)) {
            flags.ebook = true;
        }
        if let Some(syllabus_type) = policy.syllabus_deliverable_type.as_deref() {
            flags.syllabus |= items.iter().any(|item| item.is_type(syllabus_type));
        }
    }
    flags
}

/// E-book names sharing one concept and level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EbookGroup {
    pub key: String,
    pub names: Vec<String>,
}

/// Group the e-learning guides of `course` by `"<concept> - <level>"`, keeping the order
/// in which groups and names first appear.
#[must_use]
pub fn group_ebook_deliverables(course: &Course) -> Vec<EbookGroup> {
    let mut groups: Vec<EbookGroup> = Vec::new();
    for item in course
        .payment_deliverables()
        .filter(|item| item.is_type(EBOOK_DELIVERABLE_TYPE))
    {
        let key = item.concept_level();
        let name = ebook_name(item);
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.names.push(name),
            None => groups.push(EbookGroup {
                key,
                names: vec![name],
            }),
        }
    }
    groups
}

fn ebook_name(item: &PaymentDeliverable) -> String {
    item.course_deliverable_name
        .clone()
        .unwrap_or_else(|| UNNAMED_EBOOK.to_owned())
}

/// Why feedback cannot be given for an enrollment right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackAvailability {
    Open,
    AlreadySubmitted,
    Blocked { reason: String },
}

impl FeedbackAvailability {
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, FeedbackAvailability::Open)
    }

    /// Message to show next to a disabled feedback action.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            FeedbackAvailability::Open => None,
            FeedbackAvailability::AlreadySubmitted => {
                Some("Feedback has already been submitted for this course.")
            }
            FeedbackAvailability::Blocked { reason } => Some(reason),
        }
    }
}

/// Backend enum ids gating payment, certificate and feedback actions.
///
/// The numeric meanings are owned by the backend; the defaults are the values the portal
/// currently ships with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityRules {
    pub blocked_enrollment_source: i64,
    pub payment_blocked_learner_types: Vec<i64>,
    pub excluded_certificate: i64,
    pub excluded_learner_type: i64,
    pub completed_certificate: i64,
    pub feedback_open_certificate: i64,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            blocked_enrollment_source: 3,
            payment_blocked_learner_types: vec![2, 3],
            excluded_certificate: 3,
            excluded_learner_type: 3,
            completed_certificate: 7,
            feedback_open_certificate: 5,
        }
    }
}

impl EligibilityRules {
    /// Whether the payment action is available. Missing ids never block.
    #[must_use]
    pub fn is_enable(&self, enrollment_source_id: Option<i64>, learner_type_id: Option<i64>) -> bool {
        enrollment_source_id != Some(self.blocked_enrollment_source)
            && !learner_type_id
                .is_some_and(|id| self.payment_blocked_learner_types.contains(&id))
    }

    /// Whether certificate download (and the other completion actions) are available.
    #[must_use]
    pub fn is_complete_for_actions(
        &self,
        certificate_id: Option<i64>,
        learner_type_id: Option<i64>,
    ) -> bool {
        certificate_id != Some(self.excluded_certificate)
            && learner_type_id != Some(self.excluded_learner_type)
            && certificate_id == Some(self.completed_certificate)
    }

    #[must_use]
    pub fn feedback_availability(&self, certificate_id: Option<i64>) -> FeedbackAvailability {
        match certificate_id {
            Some(id) if id == self.feedback_open_certificate => FeedbackAvailability::Open,
            Some(id) if id == self.completed_certificate => FeedbackAvailability::AlreadySubmitted,
            _ => FeedbackAvailability::Blocked {
                reason: "Feedback opens once the course reaches its feedback stage.".to_owned(),
            },
        }
    }

    /// Convenience wrapper over [`Self::is_enable`] for a course.
    #[must_use]
    pub fn can_pay(&self, course: &Course) -> bool {
        self.is_enable(course.enrollment_source_id, course.learner_type_id)
    }

    #[must_use]
    pub fn can_download_certificate(&self, course: &Course) -> bool {
        self.is_complete_for_actions(course.certificate_id, course.learner_type_id)
    }
}
