use serde::Serialize;
use services::{CertificateSummary, CourseService};

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CertificateRowVm {
    pub title: String,
    pub issued_on: String,
    /// `None` when the row has no enrollment id or nobody is signed in.
    pub download_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CertificatesVm {
    pub total: usize,
    pub last_achievement: String,
    pub rows: Vec<CertificateRowVm>,
}

impl CertificatesVm {
    /// Download links are signed with the current session through `courses`.
    #[must_use]
    pub fn new(summary: &CertificateSummary, courses: &CourseService) -> Self {
        let rows = summary
            .certificates
            .iter()
            .map(|certificate| CertificateRowVm {
                title: certificate.title.clone(),
                issued_on: format_date(certificate.issued_on()),
                download_url: certificate
                    .download_id()
                    .and_then(|id| courses.certificate_download_url(id).ok())
                    .map(String::from),
            })
            .collect();

        Self {
            total: summary.total(),
            last_achievement: format_date(summary.last_achievement),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chrono::NaiveDate;
    use portal_api::{InMemoryPortal, MemorySessionStore};
    use portal_core::model::{CompletedCertificate, Session, UserCourseId, UserId};
    use services::{AppServices, PortalSettings};
    use url::Url;

    fn summary() -> CertificateSummary {
        CertificateSummary {
            certificates: vec![CompletedCertificate {
                user_course_id: Some(UserCourseId::new(31)),
                title: "AutoCAD".into(),
                end_date: NaiveDate::from_ymd_opt(2024, 2, 1),
                ..CompletedCertificate::default()
            }],
            last_achievement: NaiveDate::from_ymd_opt(2024, 2, 1),
        }
    }

    fn app() -> AppServices {
        let settings = PortalSettings::new(Url::parse("https://certs.example/dl.php").unwrap());
        AppServices::in_memory(
            InMemoryPortal::new(),
            Arc::new(MemorySessionStore::new()),
            settings,
        )
    }

    #[test]
    fn rows_link_only_when_signed_in() {
        let app = app();
        let vm = CertificatesVm::new(&summary(), &app.courses());
        assert_eq!(vm.total, 1);
        assert_eq!(vm.last_achievement, "1 Feb, 2024");
        assert_eq!(vm.rows[0].issued_on, "1 Feb, 2024");
        assert_eq!(vm.rows[0].download_url, None);

        let session = Session::new("tok", UserId::new(1)).unwrap();
        app.session().sign_in(&session).unwrap();
        let vm = CertificatesVm::new(&summary(), &app.courses());
        let url = vm.rows[0].download_url.as_deref().unwrap();
        assert!(url.contains("user_course_id=31"));
        assert!(url.contains("=tok"));
    }
}
