use portal_core::entitlements::{AddonTab, EbookGroup};
use portal_core::model::UserCourseId;
use serde::Serialize;
use services::CourseOverview;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabVm {
    pub tab: AddonTab,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectedEbook {
    pub group: String,
    pub name: String,
}

/// Resource tabs of one course plus the e-book accordion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CourseDetailVm {
    pub id: UserCourseId,
    pub title: String,
    enabled: Vec<AddonTab>,
    active_tab: Option<AddonTab>,
    ebook_groups: Vec<EbookGroup>,
    open_group: Option<String>,
    selected_ebook: Option<SelectedEbook>,
}

impl CourseDetailVm {
    /// Opens on `requested` when the course unlocks it, else on the first unlocked tab.
    #[must_use]
    pub fn new(
        overview: &CourseOverview,
        ebook_groups: Vec<EbookGroup>,
        requested: Option<AddonTab>,
    ) -> Self {
        let enabled = overview.addons.enabled_tabs();
        let active_tab = requested
            .filter(|tab| enabled.contains(tab))
            .or_else(|| enabled.first().copied());
        let open_group = match active_tab {
            Some(AddonTab::Ebook) => ebook_groups.first().map(|group| group.key.clone()),
            _ => None,
        };

        Self {
            id: overview.course.id,
            title: overview.course.title.clone(),
            enabled,
            active_tab,
            ebook_groups,
            open_group,
            selected_ebook: None,
        }
    }

    #[must_use]
    pub fn tabs(&self) -> Vec<TabVm> {
        self.enabled
            .iter()
            .map(|tab| TabVm {
                tab: *tab,
                label: tab.display_name(),
                active: self.active_tab == Some(*tab),
            })
            .collect()
    }

    #[must_use]
    pub fn active_tab(&self) -> Option<AddonTab> {
        self.active_tab
    }

    /// `true` when the course unlocks nothing and the page shows an empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    #[must_use]
    pub fn ebook_groups(&self) -> &[EbookGroup] {
        &self.ebook_groups
    }

    #[must_use]
    pub fn is_open(&self, group: &str) -> bool {
        self.open_group.as_deref() == Some(group)
    }

    #[must_use]
    pub fn selected_ebook(&self) -> Option<&SelectedEbook> {
        self.selected_ebook.as_ref()
    }

    /// Switch tabs. Locked tabs are ignored.
    pub fn select_tab(&mut self, tab: AddonTab) {
        if !self.enabled.contains(&tab) {
            return;
        }
        self.active_tab = Some(tab);
        if tab == AddonTab::Ebook && self.open_group.is_none() {
            self.open_group = self.ebook_groups.first().map(|group| group.key.clone());
        }
        self.selected_ebook = None;
    }

    /// At most one group is open; toggling the open one closes it.
    pub fn toggle_group(&mut self, group: &str) {
        if self.is_open(group) {
            self.open_group = None;
        } else if self.ebook_groups.iter().any(|g| g.key == group) {
            self.open_group = Some(group.to_owned());
        }
    }

    pub fn select_ebook(&mut self, group: &str, name: &str) {
        let known = self
            .ebook_groups
            .iter()
            .any(|g| g.key == group && g.names.iter().any(|n| n == name));
        if known {
            self.selected_ebook = Some(SelectedEbook {
                group: group.to_owned(),
                name: name.to_owned(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::entitlements::{AddonFlags, FeedbackAvailability};
    use portal_core::model::Course;

    fn overview(addons: AddonFlags) -> CourseOverview {
        CourseOverview {
            course: Course {
                id: UserCourseId::new(2),
                title: "STAAD Pro".into(),
                ..Course::default()
            },
            addons,
            progress: 0.0,
            can_pay: true,
            can_download_certificate: false,
            feedback: FeedbackAvailability::AlreadySubmitted,
        }
    }

    fn groups() -> Vec<EbookGroup> {
        vec![
            EbookGroup {
                key: "STAAD - L1".into(),
                names: vec!["Basics".into()],
            },
            EbookGroup {
                key: "STAAD - L2".into(),
                names: vec!["Loads".into()],
            },
        ]
    }

    #[test]
    fn requested_tab_wins_when_unlocked() {
        let addons = AddonFlags {
            ebook: true,
            video: true,
            ..AddonFlags::default()
        };
        let vm = CourseDetailVm::new(&overview(addons), groups(), Some(AddonTab::Video));
        assert_eq!(vm.active_tab(), Some(AddonTab::Video));
        assert!(!vm.is_open("STAAD - L1"));

        let labels: Vec<_> = vm.tabs().iter().map(|t| t.label).collect();
        assert_eq!(labels, ["E-Book", "Videos"]);
    }

    #[test]
    fn locked_request_falls_back_and_opens_first_group() {
        let addons = AddonFlags {
            ebook: true,
            ..AddonFlags::default()
        };
        let mut vm = CourseDetailVm::new(&overview(addons), groups(), Some(AddonTab::Lab));
        assert_eq!(vm.active_tab(), Some(AddonTab::Ebook));
        assert!(vm.is_open("STAAD - L1"));

        vm.toggle_group("STAAD - L2");
        assert!(vm.is_open("STAAD - L2") && !vm.is_open("STAAD - L1"));
        vm.toggle_group("STAAD - L2");
        assert!(!vm.is_open("STAAD - L2"));

        vm.select_ebook("STAAD - L1", "Basics");
        assert_eq!(vm.selected_ebook().map(|e| e.name.as_str()), Some("Basics"));
        vm.select_tab(AddonTab::Lab);
        assert_eq!(vm.active_tab(), Some(AddonTab::Ebook));
        vm.select_tab(AddonTab::Ebook);
        assert!(vm.selected_ebook().is_none());
        assert!(vm.is_open("STAAD - L1"));
    }

    #[test]
    fn nothing_unlocked() {
        let vm = CourseDetailVm::new(&overview(AddonFlags::default()), Vec::new(), None);
        assert!(vm.is_empty());
        assert_eq!(vm.active_tab(), None);
    }
}
