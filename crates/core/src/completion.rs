//! Profile completion percentage over a fixed, ordered field checklist.

use crate::model::Profile;

/// One checklist entry. A field is filled when it has a value whose trimmed text is
/// non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    FirstName,
    LastName,
    Gender,
    DateOfBirth,
    LinkedinUrl,
    Email,
    ContactNo,
    Country,
    State,
    Address,
    DoorNo,
    Street,
    Area,
    City,
    Pincode,
    Status,
    Institute,
    Degree,
    GraduationDate,
    CompanyName,
    Designation,
    JoiningDate,
    TotalExperience,
}

impl ProfileField {
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::FirstName => "first_name",
            ProfileField::LastName => "last_name",
            ProfileField::Gender => "master_gender_id",
            ProfileField::DateOfBirth => "date_of_birth",
            ProfileField::LinkedinUrl => "linkedin_url",
            ProfileField::Email => "email_id",
            ProfileField::ContactNo => "contact_no",
            ProfileField::Country => "master_country",
            ProfileField::State => "master_state",
            ProfileField::Address => "address",
            ProfileField::DoorNo => "door_no",
            ProfileField::Street => "street",
            ProfileField::Area => "area",
            ProfileField::City => "city",
            ProfileField::Pincode => "pincode",
            ProfileField::Status => "status",
            ProfileField::Institute => "institute",
            ProfileField::Degree => "degree",
            ProfileField::GraduationDate => "graduation_date",
            ProfileField::CompanyName => "company_name",
            ProfileField::Designation => "designation",
            ProfileField::JoiningDate => "joining_date",
            ProfileField::TotalExperience => "total_experience",
        }
    }

    fn is_filled(self, profile: &Profile) -> bool {
        let personal = &profile.personal;
        let contact = &profile.communication;
        let academic = profile.current_academic.as_ref();
        let professional = profile.current_professional.as_ref();
        match self {
            ProfileField::FirstName => filled(&personal.first_name),
            ProfileField::LastName => filled(&personal.last_name),
            ProfileField::Gender => personal.gender_id.is_some(),
            ProfileField::DateOfBirth => personal.date_of_birth.is_some(),
            ProfileField::LinkedinUrl => filled(&personal.linkedin_url),
            ProfileField::Email => filled(&contact.email_id),
            ProfileField::ContactNo => filled(&contact.contact_no),
            ProfileField::Country => contact.country_id.is_some(),
            ProfileField::State => contact.state_id.is_some(),
            ProfileField::Address => filled(&contact.address),
            ProfileField::DoorNo => filled(&contact.door_no),
            ProfileField::Street => filled(&contact.street),
            ProfileField::Area => filled(&contact.area),
            ProfileField::City => filled(&contact.city),
            ProfileField::Pincode => filled(&contact.pincode),
            ProfileField::Status => profile.status.is_set(),
            ProfileField::Institute => academic.is_some_and(|a| filled(&a.institute)),
            ProfileField::Degree => academic.is_some_and(|a| filled(&a.degree)),
            ProfileField::GraduationDate => academic.is_some_and(|a| a.end_date.is_some()),
            ProfileField::CompanyName => professional.is_some_and(|p| filled(&p.organization)),
            ProfileField::Designation => professional.is_some_and(|p| filled(&p.designation)),
            ProfileField::JoiningDate => professional.is_some_and(|p| p.start_date.is_some()),
            ProfileField::TotalExperience => profile.total_experience.as_deref().is_some_and(filled),
        }
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    fields: Vec<ProfileField>,
}

impl Checklist {
    #[must_use]
    pub fn new(fields: Vec<ProfileField>) -> Self {
        Self { fields }
    }

    /// The ten-field checklist used by the header and sidebar.
    #[must_use]
    pub fn basic() -> Self {
        Self::new(vec![
            ProfileField::FirstName,
            ProfileField::LastName,
            ProfileField::Gender,
            ProfileField::DateOfBirth,
            ProfileField::Email,
            ProfileField::ContactNo,
            ProfileField::Country,
            ProfileField::State,
            ProfileField::City,
            ProfileField::Pincode,
        ])
    }

    /// Every field the profile page can fill, across all five sections.
    #[must_use]
    pub fn full() -> Self {
        Self::new(vec![
            ProfileField::FirstName,
            ProfileField::LastName,
            ProfileField::Gender,
            ProfileField::DateOfBirth,
            ProfileField::LinkedinUrl,
            ProfileField::Email,
            ProfileField::ContactNo,
            ProfileField::Country,
            ProfileField::State,
            ProfileField::Address,
            ProfileField::DoorNo,
            ProfileField::Street,
            ProfileField::Area,
            ProfileField::City,
            ProfileField::Pincode,
            ProfileField::Status,
            ProfileField::Institute,
            ProfileField::Degree,
            ProfileField::GraduationDate,
            ProfileField::CompanyName,
            ProfileField::Designation,
            ProfileField::JoiningDate,
            ProfileField::TotalExperience,
        ])
    }

    #[must_use]
    pub fn fields(&self) -> &[ProfileField] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checklist fields still blank on `profile`, in checklist order.
    #[must_use]
    pub fn missing(&self, profile: &Profile) -> Vec<ProfileField> {
        self.fields
            .iter()
            .copied()
            .filter(|field| !field.is_filled(profile))
            .collect()
    }
}

impl Default for Checklist {
    fn default() -> Self {
        Self::full()
    }
}

/// Completion percentage in `0..=100`, rounded half up. No profile, or an empty
/// checklist, gives 0.
#[must_use]
pub fn completion(profile: Option<&Profile>, checklist: &Checklist) -> u8 {
    let Some(profile) = profile else {
        return 0;
    };
    let total = checklist.len();
    if total == 0 {
        return 0;
    }
    let filled = total - checklist.missing(profile).len();
    let percent = (200 * filled + total) / (2 * total);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{AcademicRecord, CareerStatus, ProfessionalRecord, ReferenceId};

    fn complete_profile() -> Profile {
        let mut profile = Profile::default();
        let day = NaiveDate::from_ymd_opt(2020, 1, 1);
        profile.personal.first_name = "Ana".into();
        profile.personal.last_name = "Lee".into();
        profile.personal.gender_id = Some(ReferenceId::new(1));
        profile.personal.date_of_birth = day;
        profile.personal.linkedin_url = "https://linkedin.com/in/ana".into();
        let contact = &mut profile.communication;
        contact.email_id = "ana@example.com".into();
        contact.contact_no = "9999999999".into();
        contact.country_id = Some(ReferenceId::new(101));
        contact.state_id = Some(ReferenceId::new(31));
        contact.address = "Main road".into();
        contact.door_no = "12".into();
        contact.street = "North street".into();
        contact.area = "Central".into();
        contact.city = "Chennai".into();
        contact.pincode = "600001".into();
        profile.status = CareerStatus::Known(ReferenceId::new(2));
        profile.current_academic = Some(AcademicRecord {
            institute: "Anna University".into(),
            degree: "B.E.".into(),
            end_date: day,
            ..AcademicRecord::default()
        });
        profile.current_professional = Some(ProfessionalRecord {
            organization: "Acme".into(),
            designation: "Engineer".into(),
            start_date: day,
            ..ProfessionalRecord::default()
        });
        profile.total_experience = Some("4 years, 2 months".into());
        profile
    }

    #[test]
    fn only_first_name_of_ten_is_ten_percent() {
        let mut profile = Profile::default();
        profile.personal.first_name = "Ana".into();
        assert_eq!(completion(Some(&profile), &Checklist::basic()), 10);
    }

    #[test]
    fn empty_and_absent_profiles_are_zero() {
        assert_eq!(completion(None, &Checklist::full()), 0);
        assert_eq!(completion(Some(&Profile::default()), &Checklist::full()), 0);
        assert_eq!(
            completion(Some(&complete_profile()), &Checklist::new(Vec::new())),
            0
        );
    }

    #[test]
    fn whitespace_does_not_count_as_filled() {
        let mut profile = Profile::default();
        profile.personal.first_name = "   ".into();
        profile.status = CareerStatus::Text(" ".into());
        assert_eq!(completion(Some(&profile), &Checklist::full()), 0);
    }

    #[test]
    fn every_field_filled_is_one_hundred() {
        let profile = complete_profile();
        assert_eq!(completion(Some(&profile), &Checklist::full()), 100);
        assert_eq!(completion(Some(&profile), &Checklist::basic()), 100);
        assert!(Checklist::full().missing(&profile).is_empty());
    }

    #[test]
    fn filling_fields_never_lowers_completion() {
        let checklist = Checklist::full();
        let full = complete_profile();
        let mut profile = Profile::default();
        let mut last = completion(Some(&profile), &checklist);

        let steps: Vec<Box<dyn Fn(&mut Profile) + '_>> = vec![
            Box::new(|p| p.personal.first_name = full.personal.first_name.clone()),
            Box::new(|p| p.personal.gender_id = full.personal.gender_id),
            Box::new(|p| p.communication = full.communication.clone()),
            Box::new(|p| p.status = full.status.clone()),
            Box::new(|p| p.current_academic = full.current_academic.clone()),
            Box::new(|p| p.current_professional = full.current_professional.clone()),
            Box::new(|p| p.personal = full.personal.clone()),
            Box::new(|p| p.total_experience = full.total_experience.clone()),
        ];
        for step in &steps {
            step(&mut profile);
            let next = completion(Some(&profile), &checklist);
            assert!(next >= last, "{next} < {last}");
            assert!(next <= 100);
            last = next;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn rounds_half_up() {
        let mut profile = Profile::default();
        profile.personal.first_name = "Ana".into();
        let checklist = Checklist::new(vec![
            ProfileField::FirstName,
            ProfileField::LastName,
            ProfileField::Email,
            ProfileField::City,
            ProfileField::Pincode,
            ProfileField::Status,
            ProfileField::Degree,
            ProfileField::Area,
        ]);
        // 1/8 = 12.5%
        assert_eq!(completion(Some(&profile), &checklist), 13);
    }
}
