use chrono::NaiveDate;

use crate::error::{RequiredFields, ValidationError};
use crate::model::ids::{RecordId, ReferenceId};
use crate::model::reference::{ReferenceChoice, ReferenceKind, ReferenceLists};

/// Independently editable groups of profile fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileSection {
    Personal,
    Communication,
    Status,
    Education,
    Professional,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 5] = [
        ProfileSection::Personal,
        ProfileSection::Communication,
        ProfileSection::Status,
        ProfileSection::Education,
        ProfileSection::Professional,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProfileSection::Personal => "Personal Details",
            ProfileSection::Communication => "Communication Details",
            ProfileSection::Status => "Current Status",
            ProfileSection::Education => "Education",
            ProfileSection::Professional => "Professional Experience",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonalDetails {
    pub first_name: String,
    pub last_name: String,
    pub gender_id: Option<ReferenceId>,
    pub date_of_birth: Option<NaiveDate>,
    pub linkedin_url: String,
}

impl PersonalDetails {
    /// # Errors
    ///
    /// Returns `ValidationError` when first or last name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("first_name", &self.first_name)
            .text("last_name", &self.last_name)
            .finish()
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunicationDetails {
    pub email_id: String,
    pub contact_no: String,
    pub country_id: Option<ReferenceId>,
    pub state_id: Option<ReferenceId>,
    pub address: String,
    pub door_no: String,
    pub street: String,
    pub area: String,
    pub city: String,
    pub pincode: String,
}

impl CommunicationDetails {
    /// # Errors
    ///
    /// Returns `ValidationError` when email or contact number is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("email_id", &self.email_id)
            .text("contact_no", &self.contact_no)
            .finish()
    }
}

/// Career status: either an entry of the status list or free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CareerStatus {
    #[default]
    Unset,
    Known(ReferenceId),
    Text(String),
}

impl CareerStatus {
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            CareerStatus::Unset => false,
            CareerStatus::Known(_) => true,
            CareerStatus::Text(text) => !text.trim().is_empty(),
        }
    }

    #[must_use]
    pub fn display(&self, lists: &ReferenceLists) -> String {
        match self {
            CareerStatus::Unset => String::new(),
            CareerStatus::Known(id) => lists
                .name_of(ReferenceKind::Status, *id)
                .unwrap_or_default()
                .to_owned(),
            CareerStatus::Text(text) => text.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError` when no status is chosen.
    pub fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new().present("status", self.is_set()).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcademicRecord {
    pub id: Option<RecordId>,
    pub institute: String,
    pub degree: String,
    pub location: String,
    /// Graduation date; `None` means still studying.
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessionalRecord {
    pub id: Option<RecordId>,
    pub organization: String,
    pub designation: String,
    pub location: String,
    pub start_date: Option<NaiveDate>,
    /// `None` means the learner still works there.
    pub end_date: Option<NaiveDate>,
}

impl ProfessionalRecord {
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Academic and professional history as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CareerHistory {
    pub academics: Vec<AcademicRecord>,
    pub professions: Vec<ProfessionalRecord>,
    pub total_experience_months: Option<u32>,
}

/// Latest academic entry by graduation date. A missing date counts as ongoing and wins;
/// ties keep the earlier entry.
#[must_use]
pub fn latest_academic(records: &[AcademicRecord]) -> Option<&AcademicRecord> {
    latest_by(records, |record| record.end_date)
}

/// Latest professional entry by start date, with the same ordering rules as
/// [`latest_academic`].
#[must_use]
pub fn latest_professional(records: &[ProfessionalRecord]) -> Option<&ProfessionalRecord> {
    latest_by(records, |record| record.start_date)
}

fn latest_by<T>(records: &[T], date: impl Fn(&T) -> Option<NaiveDate>) -> Option<&T> {
    let recency = |record: &T| {
        let day = date(record);
        (day.is_none(), day)
    };
    let mut best: Option<&T> = None;
    for record in records {
        match best {
            Some(current) if recency(record) <= recency(current) => {}
            _ => best = Some(record),
        }
    }
    best
}

/// `"<years> years, <months> months"` from a month count.
#[must_use]
pub fn format_total_experience(months: u32) -> String {
    format!("{} years, {} months", months / 12, months % 12)
}

/// The canonical profile assembled from the profile view and the career history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub personal: PersonalDetails,
    pub communication: CommunicationDetails,
    pub status: CareerStatus,
    pub academics: Vec<AcademicRecord>,
    pub professions: Vec<ProfessionalRecord>,
    pub current_academic: Option<AcademicRecord>,
    pub current_professional: Option<ProfessionalRecord>,
    pub total_experience: Option<String>,
    pub picture_url: String,
}

impl Profile {
    /// Overlay career history. Empty lists leave the current entries untouched.
    pub fn apply_career_history(&mut self, history: CareerHistory) {
        if let Some(latest) = latest_academic(&history.academics) {
            self.current_academic = Some(latest.clone());
        }
        if let Some(latest) = latest_professional(&history.professions) {
            self.current_professional = Some(latest.clone());
        }
        if let Some(months) = history.total_experience_months {
            self.total_experience = Some(format_total_experience(months));
        }
        self.academics = history.academics;
        self.professions = history.professions;
    }

    /// Academic entries for display, latest first (ongoing entries lead).
    #[must_use]
    pub fn academics_latest_first(&self) -> Vec<&AcademicRecord> {
        let mut sorted: Vec<&AcademicRecord> = self.academics.iter().collect();
        sorted.sort_by(|a, b| {
            (b.end_date.is_none(), b.end_date).cmp(&(a.end_date.is_none(), a.end_date))
        });
        sorted
    }

    /// Professional entries for display, latest start first.
    #[must_use]
    pub fn professions_latest_first(&self) -> Vec<&ProfessionalRecord> {
        let mut sorted: Vec<&ProfessionalRecord> = self.professions.iter().collect();
        sorted.sort_by(|a, b| {
            (b.start_date.is_none(), b.start_date).cmp(&(a.start_date.is_none(), a.start_date))
        });
        sorted
    }

    #[must_use]
    pub fn academic(&self, id: RecordId) -> Option<&AcademicRecord> {
        self.academics.iter().find(|record| record.id == Some(id))
    }

    #[must_use]
    pub fn professional(&self, id: RecordId) -> Option<&ProfessionalRecord> {
        self.professions.iter().find(|record| record.id == Some(id))
    }
}

/// Modal draft for adding or editing one academic entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcademicDraft {
    /// Present when editing an existing entry; the save then updates instead of creating.
    pub id: Option<RecordId>,
    pub institute: ReferenceChoice,
    pub degree: ReferenceChoice,
    pub location: String,
    pub end_date: Option<NaiveDate>,
}

impl AcademicDraft {
    #[must_use]
    pub fn from_record(record: &AcademicRecord) -> Self {
        Self {
            id: record.id,
            institute: ReferenceChoice::typed(record.institute.clone()),
            degree: ReferenceChoice::typed(record.degree.clone()),
            location: record.location.clone(),
            end_date: record.end_date,
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError` when institute or degree is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .present("institute", !self.institute.is_blank())
            .present("degree", !self.degree.is_blank())
            .finish()
    }

    #[must_use]
    pub fn resolved(self, lists: &ReferenceLists) -> Self {
        Self {
            institute: lists.resolve(ReferenceKind::Institute, self.institute),
            degree: lists.resolve(ReferenceKind::Degree, self.degree),
            ..self
        }
    }
}

/// Modal draft for adding or editing one professional entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessionalDraft {
    pub id: Option<RecordId>,
    pub company: ReferenceChoice,
    pub designation: ReferenceChoice,
    pub location: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ProfessionalDraft {
    #[must_use]
    pub fn from_record(record: &ProfessionalRecord) -> Self {
        Self {
            id: record.id,
            company: ReferenceChoice::typed(record.organization.clone()),
            designation: ReferenceChoice::typed(record.designation.clone()),
            location: record.location.clone(),
            start_date: record.start_date,
            end_date: record.end_date,
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError` when company or designation is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .present("company", !self.company.is_blank())
            .present("designation", !self.designation.is_blank())
            .finish()
    }

    #[must_use]
    pub fn resolved(self, lists: &ReferenceLists) -> Self {
        Self {
            company: lists.resolve(ReferenceKind::Company, self.company),
            designation: lists.resolve(ReferenceKind::Designation, self.designation),
            ..self
        }
    }
}
