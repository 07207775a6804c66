use portal_core::model::DeliverableGroup;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeliverableItemVm {
    pub name: String,
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeliverableGroupVm {
    pub title: String,
    pub items: Vec<DeliverableItemVm>,
    pub open: bool,
}

/// Concept/level accordion of one enrollment's course materials.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeliverablesVm {
    pub groups: Vec<DeliverableGroupVm>,
}

impl DeliverablesVm {
    /// Empty groups are dropped since they have no title to show.
    #[must_use]
    pub fn new(groups: &[DeliverableGroup]) -> Self {
        let groups = groups
            .iter()
            .filter_map(|group| {
                let title = group.title()?;
                let items = group
                    .user_course_payment_deliverables
                    .iter()
                    .map(|item| DeliverableItemVm {
                        name: item.course_deliverable_name.clone().unwrap_or_default(),
                        kind: item.course_deliverable_type_name.clone().unwrap_or_default(),
                    })
                    .collect();
                Some(DeliverableGroupVm {
                    title,
                    items,
                    open: false,
                })
            })
            .collect();
        Self { groups }
    }

    /// Open the group at `index`, closing any other; toggling the open group closes it.
    pub fn toggle(&mut self, index: usize) {
        let was_open = self.groups.get(index).is_some_and(|group| group.open);
        for (i, group) in self.groups.iter_mut().enumerate() {
            group.open = i == index && !was_open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::model::PaymentDeliverable;

    fn group(concept: &str, names: &[&str]) -> DeliverableGroup {
        DeliverableGroup {
            id: None,
            user_course_payment_deliverables: names
                .iter()
                .map(|name| PaymentDeliverable {
                    course_concept_name: Some(concept.into()),
                    course_deliverable_name: Some((*name).into()),
                    ..PaymentDeliverable::default()
                })
                .collect(),
        }
    }

    #[test]
    fn titles_come_from_the_first_item() {
        let vm = DeliverablesVm::new(&[group("Revit", &["Walls", "Roofs"]), group("Empty", &[])]);
        assert_eq!(vm.groups.len(), 1);
        assert_eq!(vm.groups[0].title, "Revit - N/A");
        assert_eq!(vm.groups[0].items.len(), 2);
    }

    #[test]
    fn accordion_keeps_one_group_open() {
        let mut vm = DeliverablesVm::new(&[group("A", &["x"]), group("B", &["y"])]);
        vm.toggle(1);
        assert!(!vm.groups[0].open && vm.groups[1].open);
        vm.toggle(0);
        assert!(vm.groups[0].open && !vm.groups[1].open);
        vm.toggle(0);
        assert!(vm.groups.iter().all(|g| !g.open));
    }
}
