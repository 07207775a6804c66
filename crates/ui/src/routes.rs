use std::fmt;

use portal_core::entitlements::AddonTab;
use portal_core::model::UserCourseId;
use serde::Serialize;
use url::form_urlencoded;

const COURSE_QUERY_KEY: &str = "course";
const TAB_QUERY_KEY: &str = "tab";

/// Every page of the portal. Paths match case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Route {
    Login,
    Privacy,
    Home,
    Dashboard,
    CourseDetails {
        id: UserCourseId,
        tab: Option<AddonTab>,
    },
    Certificates,
    Payment {
        course: Option<UserCourseId>,
    },
    Deliverable {
        course: Option<UserCourseId>,
    },
    Profile,
    ContactUs,
    Feedback {
        course: Option<UserCourseId>,
    },
    NotFound {
        path: String,
    },
}

impl Route {
    /// Sidebar entries, in order.
    pub const NAV: [(&'static str, Route); 6] = [
        ("Dashboard", Route::Dashboard),
        ("Certificates", Route::Certificates),
        ("Payment", Route::Payment { course: None }),
        ("Deliverables", Route::Deliverable { course: None }),
        ("Profile", Route::Profile),
        ("Contact Us", Route::ContactUs),
    ];

    #[must_use]
    pub fn parse(raw: &str) -> Route {
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let param = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        let course = param(COURSE_QUERY_KEY).and_then(|v| v.parse().ok());

        let trimmed = path.trim().trim_end_matches('/').to_ascii_lowercase();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["privacy"] => Route::Privacy,
            ["dashboard"] => Route::Dashboard,
            ["certificates"] => Route::Certificates,
            ["payment"] => Route::Payment { course },
            ["deliverable"] => Route::Deliverable { course },
            ["profile"] => Route::Profile,
            ["contact-us"] => Route::ContactUs,
            ["feedback"] => Route::Feedback { course },
            ["course-details", id] => match id.parse() {
                Ok(id) => Route::CourseDetails {
                    id,
                    tab: param(TAB_QUERY_KEY).and_then(AddonTab::from_key),
                },
                Err(_) => Route::NotFound {
                    path: path.to_owned(),
                },
            },
            _ => Route::NotFound {
                path: path.to_owned(),
            },
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_owned(),
            Route::Privacy => "/privacy".to_owned(),
            Route::Home => "/".to_owned(),
            Route::Dashboard => "/dashboard".to_owned(),
            Route::CourseDetails { id, tab } => {
                with_query(&format!("/course-details/{id}"), TAB_QUERY_KEY, tab.map(AddonTab::key))
            }
            Route::Certificates => "/Certificates".to_owned(),
            Route::Payment { course } => course_query("/payment", *course),
            Route::Deliverable { course } => course_query("/deliverable", *course),
            Route::Profile => "/profile".to_owned(),
            Route::ContactUs => "/Contact-Us".to_owned(),
            Route::Feedback { course } => course_query("/feedback", *course),
            Route::NotFound { path } => path.clone(),
        }
    }

    #[must_use]
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Privacy)
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Privacy => "Privacy Policy",
            Route::Home | Route::Dashboard => "Dashboard",
            Route::CourseDetails { .. } => "Course Details",
            Route::Certificates => "Certificates",
            Route::Payment { .. } => "Payment",
            Route::Deliverable { .. } => "Deliverables",
            Route::Profile => "Profile",
            Route::ContactUs => "Contact Us",
            Route::Feedback { .. } => "Feedback",
            Route::NotFound { .. } => "404 not found",
        }
    }

    /// Where navigation actually lands: protected pages send signed-out users to the
    /// login page, and the login page sends signed-in users to the dashboard.
    #[must_use]
    pub fn guard(self, signed_in: bool) -> Route {
        match self {
            route if route.requires_auth() && !signed_in => Route::Login,
            Route::Login if signed_in => Route::Dashboard,
            route => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn course_query(path: &str, course: Option<UserCourseId>) -> String {
    with_query(path, COURSE_QUERY_KEY, course.map(|id| id.to_string()).as_deref())
}

fn with_query(path: &str, key: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(key, value)
                .finish();
            format!("{path}?{query}")
        }
        None => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_page_case_insensitively() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/certificates"), Route::Certificates);
        assert_eq!(Route::parse("/Contact-Us/"), Route::ContactUs);
        assert_eq!(
            Route::parse("/payment?course=12"),
            Route::Payment {
                course: Some(UserCourseId::new(12))
            }
        );
        assert_eq!(
            Route::parse("/course-details/5?tab=ebook"),
            Route::CourseDetails {
                id: UserCourseId::new(5),
                tab: Some(AddonTab::Ebook)
            }
        );
        assert_eq!(
            Route::parse("/course-details/abc"),
            Route::NotFound {
                path: "/course-details/abc".into()
            }
        );
    }

    #[test]
    fn paths_round_trip_through_parse() {
        let routes = [
            Route::Certificates,
            Route::ContactUs,
            Route::Feedback {
                course: Some(UserCourseId::new(3)),
            },
            Route::CourseDetails {
                id: UserCourseId::new(9),
                tab: Some(AddonTab::Video),
            },
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn guard_redirects_by_session() {
        assert_eq!(Route::Profile.guard(false), Route::Login);
        assert_eq!(Route::Privacy.guard(false), Route::Privacy);
        assert_eq!(Route::Login.guard(true), Route::Dashboard);
        assert_eq!(
            Route::parse("/missing").guard(false),
            Route::Login,
            "unknown pages sit behind the login too"
        );
        assert_eq!(Route::Dashboard.guard(true), Route::Dashboard);
    }

    #[test]
    fn sidebar_pages_are_protected() {
        for (label, route) in Route::NAV {
            assert!(route.requires_auth(), "{label}");
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
