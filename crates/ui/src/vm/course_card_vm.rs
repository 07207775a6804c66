use portal_core::entitlements::AddonTab;
use serde::Serialize;
use services::CourseOverview;

use crate::routes::Route;
use crate::vm::time_fmt::format_date;

const CONGRATULATIONS: &str = "Congratulations! You've finished the course";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    InProgress,
    Completed,
    Other,
}

impl StatusBadge {
    #[must_use]
    pub fn for_status(status: &str) -> Self {
        match status {
            "In Progress" => StatusBadge::InProgress,
            "Completed" | "Closed" | "Payment not Started" => StatusBadge::Completed,
            _ => StatusBadge::Other,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            StatusBadge::InProgress => "inprogress",
            StatusBadge::Completed => "completed",
            StatusBadge::Other => "other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Green,
    Blue,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardActionVm {
    pub label: &'static str,
    pub enabled: bool,
    pub variant: Option<ButtonVariant>,
    pub route: Option<Route>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IconLinkVm {
    pub label: &'static str,
    pub enabled: bool,
    pub route: Option<Route>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourseCardVm {
    pub title: String,
    pub status: String,
    pub badge: StatusBadge,
    pub duration: String,
    pub dates: String,
    pub progress_percent: u8,
    pub progress_label: &'static str,
    /// Bar drawn in the "done" colour.
    pub progress_done: bool,
    /// Only set when the course unlocks at least one resource.
    pub header_link: Option<Route>,
    pub payment: CardActionVm,
    pub feedback: CardActionVm,
    pub certificate: CardActionVm,
    pub icon_links: Vec<IconLinkVm>,
}

fn icon_label(tab: AddonTab) -> &'static str {
    match tab {
        AddonTab::Syllabus => "Syllabus",
        AddonTab::Ebook => "e-book",
        AddonTab::Video => "Videos",
        AddonTab::Lab => "Lab Exercises",
        AddonTab::Quiz => "Quiz",
        AddonTab::Interview => "Interview",
        AddonTab::Links => "Ref. Links",
    }
}

impl From<&CourseOverview> for CourseCardVm {
    fn from(overview: &CourseOverview) -> Self {
        let course = &overview.course;
        let id = course.id;
        let completed = overview.can_download_certificate;
        // `progress` is clamped to 0..=100, so the cast cannot truncate.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let progress_percent = overview.progress.round().clamp(0.0, 100.0) as u8;

        let mut icon_links: Vec<IconLinkVm> = AddonTab::ALL
            .into_iter()
            .map(|tab| {
                let enabled = overview.addons.is_enabled(tab);
                IconLinkVm {
                    label: icon_label(tab),
                    enabled,
                    route: enabled.then_some(Route::CourseDetails { id, tab: Some(tab) }),
                }
            })
            .collect();
        icon_links.push(IconLinkVm {
            label: "View More",
            enabled: overview.addons.more,
            route: None,
        });

        Self {
            title: course.title.clone(),
            status: course.status.clone(),
            badge: StatusBadge::for_status(&course.status),
            duration: format!("{} Hrs", course.duration),
            dates: format!(
                "{} - {}",
                format_date(course.start_date),
                format_date(course.end_date)
            ),
            progress_percent,
            progress_label: if progress_percent == 100 {
                CONGRATULATIONS
            } else {
                "Progress"
            },
            progress_done: completed || course.status == "Closed",
            header_link: overview
                .addons
                .any()
                .then_some(Route::CourseDetails { id, tab: None }),
            payment: CardActionVm {
                label: "Payment",
                enabled: overview.can_pay,
                variant: Some(if overview.can_pay {
                    ButtonVariant::Green
                } else {
                    ButtonVariant::Blue
                }),
                route: overview
                    .can_pay
                    .then_some(Route::Payment { course: Some(id) }),
            },
            feedback: CardActionVm {
                label: "Feedback",
                enabled: completed,
                variant: None,
                route: completed.then_some(Route::Feedback { course: Some(id) }),
            },
            certificate: CardActionVm {
                label: "Certificate",
                enabled: completed,
                variant: None,
                route: None,
            },
            icon_links,
        }
    }
}

#[must_use]
pub fn map_course_cards(overviews: &[CourseOverview]) -> Vec<CourseCardVm> {
    overviews.iter().map(CourseCardVm::from).collect()
}
