use portal_core::model::{ProfileSection, ReferenceId, ReferenceKind, ReferenceLists};
use serde::Serialize;
use services::AggregatedProfile;

use crate::vm::time_fmt::format_date;

/// Name, completion ring and avatar shown above the profile form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileHeaderVm {
    pub display_name: String,
    pub completion: u8,
    pub completion_label: String,
    pub picture_url: Option<String>,
    /// Fallback avatar text when there is no picture.
    pub initials: String,
}

impl From<&AggregatedProfile> for ProfileHeaderVm {
    fn from(loaded: &AggregatedProfile) -> Self {
        let personal = &loaded.profile.personal;
        let initials: String = [&personal.first_name, &personal.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        let picture = loaded.profile.picture_url.trim();

        Self {
            display_name: personal.full_name(),
            completion: loaded.completion,
            completion_label: format!("{}% complete", loaded.completion),
            picture_url: (!picture.is_empty()).then(|| picture.to_owned()),
            initials,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldRowVm {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionVm {
    pub title: &'static str,
    pub rows: Vec<FieldRowVm>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProfileVm {
    pub header: ProfileHeaderVm,
    pub total_experience: Option<String>,
    pub sections: Vec<SectionVm>,
}

fn row(label: &'static str, value: impl Into<String>) -> FieldRowVm {
    FieldRowVm {
        label,
        value: value.into(),
    }
}

fn name_of(lists: &ReferenceLists, kind: ReferenceKind, id: Option<ReferenceId>) -> String {
    id.and_then(|id| lists.name_of(kind, id))
        .unwrap_or_default()
        .to_owned()
}

fn section(loaded: &AggregatedProfile, section: ProfileSection) -> SectionVm {
    let profile = &loaded.profile;
    let lists = &loaded.references;
    let rows = match section {
        ProfileSection::Personal => {
            let personal = &profile.personal;
            vec![
                row("First Name", personal.first_name.as_str()),
                row("Last Name", personal.last_name.as_str()),
                row("Gender", name_of(lists, ReferenceKind::Gender, personal.gender_id)),
                row("Date of Birth", format_date(personal.date_of_birth)),
                row("LinkedIn", personal.linkedin_url.as_str()),
            ]
        }
        ProfileSection::Communication => {
            let comm = &profile.communication;
            vec![
                row("Email", comm.email_id.as_str()),
                row("Contact No", comm.contact_no.as_str()),
                row("Door No", comm.door_no.as_str()),
                row("Street", comm.street.as_str()),
                row("Area", comm.area.as_str()),
                row("City", comm.city.as_str()),
                row("State", name_of(lists, ReferenceKind::State, comm.state_id)),
                row("Country", name_of(lists, ReferenceKind::Country, comm.country_id)),
                row("Pincode", comm.pincode.as_str()),
            ]
        }
        ProfileSection::Status => vec![row("Current Status", profile.status.display(lists))],
        ProfileSection::Education => profile
            .academics_latest_first()
            .into_iter()
            .map(|record| {
                let ends = record
                    .end_date
                    .map_or_else(|| "Pursuing".to_owned(), |day| format_date(Some(day)));
                row(
                    "Degree",
                    format!("{}, {} ({ends})", record.degree, record.institute),
                )
            })
            .collect(),
        ProfileSection::Professional => profile
            .professions_latest_first()
            .into_iter()
            .map(|record| {
                let ends = if record.is_current() {
                    "Present".to_owned()
                } else {
                    format_date(record.end_date)
                };
                row(
                    "Role",
                    format!(
                        "{}, {} ({} - {ends})",
                        record.designation,
                        record.organization,
                        format_date(record.start_date)
                    ),
                )
            })
            .collect(),
    };

    SectionVm {
        title: section.label(),
        rows,
    }
}

impl From<&AggregatedProfile> for ProfileVm {
    fn from(loaded: &AggregatedProfile) -> Self {
        Self {
            header: ProfileHeaderVm::from(loaded),
            total_experience: loaded.profile.total_experience.clone(),
            sections: ProfileSection::ALL
                .into_iter()
                .map(|kind| section(loaded, kind))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use portal_core::model::{AcademicRecord, CareerStatus, ReferenceItem};

    fn loaded() -> AggregatedProfile {
        let mut loaded = AggregatedProfile::default();
        loaded.profile.personal.first_name = "ana".into();
        loaded.profile.personal.last_name = "Lee".into();
        loaded.profile.personal.gender_id = Some(ReferenceId::new(1));
        loaded.profile.status = CareerStatus::Text("Freelancer".into());
        loaded.profile.academics = vec![AcademicRecord {
            institute: "IIT".into(),
            degree: "B.Tech".into(),
            end_date: NaiveDate::from_ymd_opt(2020, 5, 1),
            ..AcademicRecord::default()
        }];
        loaded.references =
            ReferenceLists::new().with(ReferenceKind::Gender, vec![ReferenceItem::new(1, "Female")]);
        loaded.completion = 57;
        loaded
    }

    #[test]
    fn header_uses_initials_without_picture() {
        let header = ProfileHeaderVm::from(&loaded());
        assert_eq!(header.display_name, "ana Lee");
        assert_eq!(header.initials, "AL");
        assert_eq!(header.picture_url, None);
        assert_eq!(header.completion_label, "57% complete");
    }

    #[test]
    fn sections_resolve_reference_names() {
        let vm = ProfileVm::from(&loaded());
        assert_eq!(vm.sections.len(), 5);

        let personal = &vm.sections[0];
        assert_eq!(personal.title, "Personal Details");
        assert!(personal.rows.contains(&row("Gender", "Female")));
        assert!(personal.rows.contains(&row("Date of Birth", "--")));

        assert_eq!(vm.sections[2].rows, [row("Current Status", "Freelancer")]);
        assert_eq!(vm.sections[3].rows[0].value, "B.Tech, IIT (1 May, 2020)");
        assert!(vm.sections[4].rows.is_empty());
    }
}
