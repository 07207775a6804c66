use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::UserCourseId;
use crate::progress::course_progress;
use crate::wire;

/// One course enrollment as listed on the dashboard.
///
/// The deliverable tree is kept as fetched; everything derived from it (addons, e-book
/// groups) is recomputed on demand and never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub id: UserCourseId,
    #[serde(rename = "course_criteria_title_name", default, deserialize_with = "wire::text")]
    pub title: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub duration: String,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "master_certificate_name", default, deserialize_with = "wire::text")]
    pub status: String,
    #[serde(
        rename = "master_course_enrollment_source_id",
        default,
        deserialize_with = "wire::opt_int"
    )]
    pub enrollment_source_id: Option<i64>,
    #[serde(rename = "master_learner_type_id", default, deserialize_with = "wire::opt_int")]
    pub learner_type_id: Option<i64>,
    #[serde(rename = "master_certificate_id", default, deserialize_with = "wire::opt_int")]
    pub certificate_id: Option<i64>,
    #[serde(default, deserialize_with = "wire::lenient_list")]
    pub deliverables: Option<Vec<Deliverable>>,
}

impl Course {
    /// Display progress (0..=100) at `now`.
    #[must_use]
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        course_progress(self.start_date, self.end_date, &self.status, now)
    }

    /// Every payment deliverable across all deliverables, in order.
    pub fn payment_deliverables(&self) -> impl Iterator<Item = &PaymentDeliverable> {
        self.deliverables
            .iter()
            .flatten()
            .flat_map(|deliverable| deliverable.user_course_payment_deliverables.iter().flatten())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    #[serde(default, deserialize_with = "wire::lenient_list")]
    pub addons: Option<Vec<Addon>>,
    #[serde(default, deserialize_with = "wire::lenient_list")]
    pub user_course_payment_deliverables: Option<Vec<PaymentDeliverable>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub name: Option<String>,
}

impl Addon {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// A purchased course component (e-learning guide, lab sheet, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDeliverable {
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub course_deliverable_type_name: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub course_concept_name: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub course_level_name: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub course_deliverable_name: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub content: Option<String>,
}

impl PaymentDeliverable {
    #[must_use]
    pub fn is_type(&self, type_name: &str) -> bool {
        self.course_deliverable_type_name.as_deref() == Some(type_name)
    }

    /// `"<concept> - <level>"`, with `N/A` standing in for missing parts.
    #[must_use]
    pub fn concept_level(&self) -> String {
        format!(
            "{} - {}",
            self.course_concept_name.as_deref().unwrap_or("N/A"),
            self.course_level_name.as_deref().unwrap_or("N/A")
        )
    }
}

/// A concept/level bucket from the deliverables listing of one enrollment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverableGroup {
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub user_course_payment_deliverables: Vec<PaymentDeliverable>,
}

impl DeliverableGroup {
    /// Title taken from the first item; `None` for an empty group.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.user_course_payment_deliverables
            .first()
            .map(PaymentDeliverable::concept_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entitlements::{EntitlementPolicy, derive_addons};
    use serde_json::json;

    #[test]
    fn deserializes_backend_course_shape() {
        let course: Course = serde_json::from_value(json!({
            "id": 41,
            "course_criteria_title_name": "AutoCAD Mastery",
            "duration": 80,
            "start_date": "2024-01-01T00:00:00.000Z",
            "end_date": "2024-01-31",
            "master_certificate_name": "In Progress",
            "master_course_enrollment_source_id": 1,
            "master_learner_type_id": "2",
            "master_certificate_id": null,
            "deliverables": [{
                "addons": [{"name": "FTR - Session Videos"}],
                "user_course_payment_deliverables": null
            }]
        }))
        .unwrap();

        assert_eq!(course.id, UserCourseId::new(41));
        assert_eq!(course.duration, "80");
        assert_eq!(course.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(course.learner_type_id, Some(2));
        assert_eq!(course.certificate_id, None);
        let deliverables = course.deliverables.unwrap();
        assert_eq!(deliverables.len(), 1);
        assert!(deliverables[0].user_course_payment_deliverables.is_none());
    }

    #[test]
    fn non_list_deliverables_are_absent() {
        let course: Course =
            serde_json::from_value(json!({"id": 1, "deliverables": "n/a"})).unwrap();
        assert!(course.deliverables.is_none());
        assert_eq!(course.payment_deliverables().count(), 0);
    }

    #[test]
    fn one_bad_entry_does_not_sink_the_list() {
        let courses: Vec<Course> = serde_json::from_value(json!([
            {"id": 1, "deliverables": [null, {"addons": [null, {"name": "Expert Video Session"}]}]},
            {"id": "2", "master_learner_type_id": "2"}
        ]))
        .unwrap();

        assert_eq!(courses.len(), 2);
        let flags = derive_addons(&courses[0], &EntitlementPolicy::default());
        assert!(flags.video);
        assert_eq!(courses[1].id, UserCourseId::new(2));
        assert_eq!(courses[1].learner_type_id, Some(2));
    }

    #[test]
    fn missing_id_defaults() {
        let course: Course = serde_json::from_value(json!({"duration": "40"})).unwrap();
        assert_eq!(course.id, UserCourseId::default());
    }

    #[test]
    fn group_title_uses_first_item() {
        let group: DeliverableGroup = serde_json::from_value(json!({
            "id": 3,
            "user_course_payment_deliverables": [
                {"course_concept_name": "Revit", "course_level_name": null},
                {"course_concept_name": "Other", "course_level_name": "L2"}
            ]
        }))
        .unwrap();
        assert_eq!(group.title().as_deref(), Some("Revit - N/A"));
        assert_eq!(DeliverableGroup::default().title(), None);
    }
}
