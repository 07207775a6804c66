use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::ids::UserCourseId;
use crate::wire;

/// Query key the download endpoint expects the session token under.
const TOKEN_QUERY_KEY: &str = "JEcYWcmNeh";

/// A completed course with an issued certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedCertificate {
    #[serde(default)]
    pub user_course_id: Option<UserCourseId>,
    #[serde(default, deserialize_with = "wire::opt_uint")]
    pub id: Option<u64>,
    #[serde(rename = "course_criteria_title_name", default, deserialize_with = "wire::text")]
    pub title: String,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub certificate_approved_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "wire::lenient_date")]
    pub created_at: Option<NaiveDate>,
}

impl CompletedCertificate {
    /// Issue date shown on the certificate row.
    #[must_use]
    pub fn issued_on(&self) -> Option<NaiveDate> {
        self.certificate_approved_at.or(self.end_date)
    }

    /// Date used to rank achievements.
    #[must_use]
    pub fn achieved_on(&self) -> Option<NaiveDate> {
        self.certificate_approved_at
            .or(self.end_date)
            .or(self.created_at)
    }

    /// Enrollment id to download with, falling back to the row id.
    #[must_use]
    pub fn download_id(&self) -> Option<UserCourseId> {
        self.user_course_id.or(self.id.map(UserCourseId::new))
    }
}

/// Date of the most recent achievement, if any certificate carries a date.
#[must_use]
pub fn last_achievement(certificates: &[CompletedCertificate]) -> Option<NaiveDate> {
    certificates
        .iter()
        .filter_map(CompletedCertificate::achieved_on)
        .max()
}

/// Signed download link; the browser (or caller) fetches it directly.
#[must_use]
pub fn certificate_download_url(base: &Url, token: &str, user_course_id: UserCourseId) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair(TOKEN_QUERY_KEY, token)
        .append_pair("user_course_id", &user_course_id.to_string());
    url
}
