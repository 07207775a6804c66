use async_trait::async_trait;
use chrono::NaiveDate;
use portal_core::model::{
    AcademicDraft, CareerHistory, CareerStatus, ProfessionalDraft, ReferenceChoice, Session,
};
use serde_json::Value;

use super::dto::{CareerHistoryDto, PictureDto, ProfileViewDto};
use super::{Call, Discriminator, HttpPortal, paths};
use crate::repository::{ApiError, ProfileRepository, ProfileUpdate, ProfileView};

const PROFILE_VIEW: Discriminator = Discriminator::Required("my_profile_view");
const PROFILE_PICTURE: Discriminator = Discriminator::Required("my_profile_picture");
const CAREER_HISTORY: Discriminator = Discriminator::Required("my_career_history");
const PROFILE_UPDATE: Discriminator = Discriminator::Required("my_profile_update");
const SET_PROFILE: Discriminator = Discriminator::Required("set_profile");

fn day(value: Option<NaiveDate>) -> Value {
    value.map_or(Value::Null, |d| Value::from(d.format("%Y-%m-%d").to_string()))
}

/// Known entries go out as `<id_key>`, typed text as `<text_key>`.
fn with_choice(call: Call, id_key: &str, text_key: &str, choice: &ReferenceChoice) -> Call {
    match choice {
        ReferenceChoice::Selected(id) => call.with(id_key, id.value()),
        ReferenceChoice::NewText(text) => call.with(text_key, text.trim()),
    }
}

fn with_record_id(call: Call, id: Option<portal_core::model::RecordId>) -> Call {
    match id {
        Some(id) => call.with("id", id.value()),
        None => call,
    }
}

#[async_trait]
impl ProfileRepository for HttpPortal {
    async fn profile_view(&self, session: &Session) -> Result<ProfileView, ApiError> {
        let call = Call::authed(PROFILE_VIEW, session).with_user(session);
        let success = self.post(paths::PROFILE_READ, call).await?;
        let countries = success.extra_list("countries_list")?;
        let states = success.extra_list("state_list")?;
        let dto: ProfileViewDto = success.data()?;
        Ok(ProfileView {
            personal: dto.personal(),
            communication: dto.communication(),
            status: dto.status(),
            enrolled_academic: dto.enrolled_academic(),
            countries,
            states,
        })
    }

    async fn profile_picture(&self, session: &Session) -> Result<String, ApiError> {
        let call = Call::authed(PROFILE_PICTURE, session).with_user(session);
        let dto: PictureDto = self.post(paths::PROFILE_READ, call).await?.data()?;
        Ok(dto.picture)
    }

    async fn career_history(&self, session: &Session) -> Result<CareerHistory, ApiError> {
        let call = Call::authed(CAREER_HISTORY, session).with_user(session);
        let dto: CareerHistoryDto = self.post(paths::PROFILE_READ, call).await?.data()?;
        Ok(dto.into())
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<(), ApiError> {
        let personal = &update.personal;
        let contact = &update.communication;
        let call = Call::authed(PROFILE_UPDATE, session)
            .with_user(session)
            .with("first_name", personal.first_name.trim())
            .with("last_name", personal.last_name.trim())
            .with("master_gender_id", personal.gender_id.map(|id| id.value()))
            .with("date_of_birth", day(personal.date_of_birth))
            .with("linkedin_url", personal.linkedin_url.trim())
            .with("email_id", contact.email_id.trim())
            .with("contact_no", contact.contact_no.trim())
            .with("master_country", contact.country_id.map(|id| id.value()))
            .with("master_state", contact.state_id.map(|id| id.value()))
            .with("address", contact.address.as_str())
            .with("door_no", contact.door_no.as_str())
            .with("street", contact.street.as_str())
            .with("area", contact.area.as_str())
            .with("city", contact.city.as_str())
            .with("pincode", contact.pincode.as_str());
        self.post(paths::PROFILE_WRITE, call).await.map(drop)
    }

    async fn set_status(&self, session: &Session, status: &CareerStatus) -> Result<(), ApiError> {
        let call = Call::authed(SET_PROFILE, session)
            .with_user(session)
            .with("type", "status");
        let call = match status {
            CareerStatus::Known(id) => call.with("master_status_id", id.value()),
            CareerStatus::Text(text) => call.with("status_text", text.trim()),
            CareerStatus::Unset => call.with("master_status_id", Value::Null),
        };
        self.post(paths::PROFILE_WRITE, call).await.map(drop)
    }

    async fn set_academic(&self, session: &Session, draft: &AcademicDraft) -> Result<(), ApiError> {
        let call = Call::authed(SET_PROFILE, session)
            .with_user(session)
            .with("type", "academic")
            .with("location", draft.location.trim())
            .with("end_date", day(draft.end_date));
        let call = with_record_id(call, draft.id);
        let call = with_choice(call, "master_institute_id", "institute_name", &draft.institute);
        let call = with_choice(call, "master_degree_id", "degree_name", &draft.degree);
        self.post(paths::PROFILE_WRITE, call).await.map(drop)
    }

    async fn set_professional(
        &self,
        session: &Session,
        draft: &ProfessionalDraft,
    ) -> Result<(), ApiError> {
        let call = Call::authed(SET_PROFILE, session)
            .with_user(session)
            .with("type", "professional")
            .with("location", draft.location.trim())
            .with("start_date", day(draft.start_date))
            .with("end_date", day(draft.end_date));
        let call = with_record_id(call, draft.id);
        let call = with_choice(call, "master_company_id", "company_name", &draft.company);
        let call = with_choice(
            call,
            "master_designation_id",
            "designation_name",
            &draft.designation,
        );
        self.post(paths::PROFILE_WRITE, call).await.map(drop)
    }
}
