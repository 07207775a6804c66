//! Wire shapes of the profile operations and their mapping onto domain types.

use chrono::NaiveDate;
use portal_core::model::{
    AcademicRecord, CareerHistory, CareerStatus, CommunicationDetails, PersonalDetails,
    ProfessionalRecord, RecordId, ReferenceId,
};
use portal_core::wire;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IdRef {
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub id: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CurrentStatusDto {
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub master_status_id: Option<u64>,
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub status_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EnrolledCourseDto {
    #[serde(default, deserialize_with = "wire::text")]
    pub firm_name: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub degree_name: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub location: String,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub graduation_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProfileViewDto {
    #[serde(default, deserialize_with = "wire::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub master_gender_id: Option<u64>,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::text")]
    pub linkedin_url: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub email_id: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub contact_no: String,
    #[serde(default)]
    pub master_countries: Option<IdRef>,
    #[serde(default)]
    pub master_states: Option<IdRef>,
    #[serde(default, deserialize_with = "wire::text")]
    pub address: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub door_no: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub street: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub area: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub city: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub pincode: String,
    #[serde(
        rename = "user_current_status_user_current_status_user_idTousers",
        default,
        deserialize_with = "wire::list_or_empty"
    )]
    pub current_status: Vec<CurrentStatusDto>,
    #[serde(
        rename = "user_courses_user_courses_user_idTousers",
        default,
        deserialize_with = "wire::list_or_empty"
    )]
    pub enrolled_courses: Vec<EnrolledCourseDto>,
}

impl ProfileViewDto {
    pub(crate) fn personal(&self) -> PersonalDetails {
        PersonalDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender_id: self.master_gender_id.map(ReferenceId::new),
            date_of_birth: self.date_of_birth,
            linkedin_url: self.linkedin_url.clone(),
        }
    }

    pub(crate) fn communication(&self) -> CommunicationDetails {
        let id_of = |value: &Option<IdRef>| {
            value
                .as_ref()
                .and_then(|reference| reference.id)
                .map(ReferenceId::new)
        };
        CommunicationDetails {
            email_id: self.email_id.clone(),
            contact_no: self.contact_no.clone(),
            country_id: id_of(&self.master_countries),
            state_id: id_of(&self.master_states),
            address: self.address.clone(),
            door_no: self.door_no.clone(),
            street: self.street.clone(),
            area: self.area.clone(),
            city: self.city.clone(),
            pincode: self.pincode.clone(),
        }
    }

    pub(crate) fn status(&self) -> CareerStatus {
        match self.current_status.first() {
            Some(CurrentStatusDto {
                master_status_id: Some(id),
                ..
            }) => CareerStatus::Known(ReferenceId::new(*id)),
            Some(CurrentStatusDto {
                status_text: Some(text),
                ..
            }) => CareerStatus::Text(text.clone()),
            _ => CareerStatus::Unset,
        }
    }

    pub(crate) fn enrolled_academic(&self) -> Option<AcademicRecord> {
        self.enrolled_courses.first().map(|course| AcademicRecord {
            id: None,
            institute: course.firm_name.clone(),
            degree: course.degree_name.clone(),
            location: course.location.clone(),
            end_date: course.graduation_date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PictureDto {
    #[serde(default, deserialize_with = "wire::text")]
    pub picture: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AcademicDto {
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub id: Option<u64>,
    #[serde(default, alias = "firm_name", deserialize_with = "wire::text")]
    pub institute: String,
    #[serde(default, alias = "degree_name", deserialize_with = "wire::text")]
    pub degree: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub location: String,
    #[serde(default, alias = "graduation_date", deserialize_with = "wire::lenient_date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProfessionDto {
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub id: Option<u64>,
    #[serde(default, alias = "company_name", deserialize_with = "wire::text")]
    pub organization: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub designation: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub location: String,
    #[serde(default, alias = "joining_date", deserialize_with = "wire::lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CareerHistoryDto {
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub user_academics: Vec<AcademicDto>,
    #[serde(default, deserialize_with = "wire::list_or_empty")]
    pub user_professions: Vec<ProfessionDto>,
    /// Total experience in months.
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub total_experience: Option<u64>,
}

impl From<CareerHistoryDto> for CareerHistory {
    fn from(dto: CareerHistoryDto) -> Self {
        CareerHistory {
            academics: dto
                .user_academics
                .into_iter()
                .map(|a| AcademicRecord {
                    id: a.id.map(RecordId::new),
                    institute: a.institute,
                    degree: a.degree,
                    location: a.location,
                    end_date: a.end_date,
                })
                .collect(),
            professions: dto
                .user_professions
                .into_iter()
                .map(|p| ProfessionalRecord {
                    id: p.id.map(RecordId::new),
                    organization: p.organization,
                    designation: p.designation,
                    location: p.location,
                    start_date: p.start_date,
                    end_date: p.end_date,
                })
                .collect(),
            total_experience_months: dto
                .total_experience
                .and_then(|months| u32::try_from(months).ok()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LoginDto {
    #[serde(default, deserialize_with = "wire::opt_text")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "wire::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub profile_picture: String,
}
