use std::time::Duration;

use httpmock::prelude::*;
use portal_api::{ApiConfig, ApiError, LoginRequest, Portal, ProfileUpdate};
use portal_core::entitlements::{EntitlementPolicy, derive_addons};
use portal_core::model::{
    AcademicDraft, CareerStatus, FeedbackAnswers, ReferenceChoice, ReferenceId, ReferenceKind,
    Session, UserCourseId, UserId,
};
use serde_json::json;

fn config(server: &MockServer) -> ApiConfig {
    ApiConfig::default()
        .with_base_url(server.url("/api"))
        .with_public_api_url(server.url("/pub/public_api"))
        .with_timeout(Duration::from_secs(5))
}

fn session() -> Session {
    Session::new("tok-1", UserId::new(77)).unwrap()
}

#[tokio::test]
async fn profile_view_decodes_sections_and_lists() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/my_profile2")
            .body_includes("\"required\":\"my_profile_view\"")
            .body_includes("\"token\":\"tok-1\"");
        then.status(200).json_body(json!({
            "status": 200,
            "data": {
                "first_name": "Ana",
                "last_name": "Lee",
                "email_id": "ana@example.com",
                "master_countries": {"id": 101},
                "master_states": {"id": 31}
            },
            "countries_list": [{"id": 101, "name": "India"}],
            "state_list": [{"id": 31, "name": "Tamil Nadu"}]
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let view = portal.profiles.profile_view(&session()).await.unwrap();

    mock.assert();
    assert_eq!(view.personal.first_name, "Ana");
    assert_eq!(view.communication.state_id, Some(ReferenceId::new(31)));
    assert_eq!(view.countries.len(), 1);
    assert_eq!(view.states[0].name, "Tamil Nadu");
    assert_eq!(view.status, CareerStatus::Unset);
}

#[tokio::test]
async fn application_errors_surface_the_backend_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/my_profile");
        then.status(200)
            .json_body(json!({"status": 409, "message": "duplicate email"}));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let err = portal
        .profiles
        .update_profile(&session(), &ProfileUpdate::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Application {
            status: 409,
            message: "duplicate email".into()
        }
    );
}

#[tokio::test]
async fn academic_save_sends_id_and_typed_text() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/my_profile")
            .body_includes("\"required\":\"set_profile\"")
            .body_includes("\"type\":\"academic\"")
            .body_includes("\"master_institute_id\":4")
            .body_includes("\"degree_name\":\"B.E.\"");
        then.status(200).json_body(json!({"status": 200, "data": null}));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let draft = AcademicDraft {
        institute: ReferenceChoice::Selected(ReferenceId::new(4)),
        degree: ReferenceChoice::typed(" B.E. "),
        ..AcademicDraft::default()
    };
    portal
        .profiles
        .set_academic(&session(), &draft)
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn courses_keep_nested_deliverables() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/my_courses")
            .body_includes("\"required\":\"my_courses_view\"");
        then.status(200).json_body(json!({
            "status": 200,
            "data": [{
                "id": 5,
                "course_criteria_title_name": "AutoCAD",
                "start_date": "2024-01-01T00:00:00.000Z",
                "end_date": "2024-01-31",
                "master_certificate_name": "In Progress",
                "master_certificate_id": "7",
                "deliverables": [{"addons": [{"name": "Expert Video Session"}]}]
            }]
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let courses = portal.courses.list_courses(&session()).await.unwrap();

    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, UserCourseId::new(5));
    assert_eq!(courses[0].certificate_id, Some(7));
    assert_eq!(courses[0].deliverables.as_ref().map(Vec::len), Some(1));
}

#[tokio::test]
async fn malformed_course_entries_do_not_drop_the_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/my_courses");
        then.status(200).json_body(json!({
            "status": 200,
            "data": [
                {"id": 1, "deliverables": [{"addons": [{"name": "FTR - Session Videos"}]}]},
                {"id": "2", "deliverables": [null, {"addons": [null, {"name": "Expert Video Session"}]}]},
                null,
                {"id": "not-a-number"}
            ]
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let courses = portal.courses.list_courses(&session()).await.unwrap();

    let ids: Vec<_> = courses.iter().map(|course| course.id).collect();
    assert_eq!(ids, [UserCourseId::new(1), UserCourseId::new(2)]);
    let flags = derive_addons(&courses[1], &EntitlementPolicy::default());
    assert!(flags.video);
}

#[tokio::test]
async fn pending_amount_may_arrive_as_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/student_course_payments");
        then.status(200).json_body(json!({
            "status": 200,
            "pending_amount": "1250.50",
            "data": []
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let summary = portal
        .courses
        .payments(&session(), UserCourseId::new(5))
        .await
        .unwrap();

    assert!(!summary.is_fully_paid());
    assert!((summary.pending_amount - 1250.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn payments_read_pending_amount_next_to_data() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/student_course_payments")
            .body_includes("\"user_course_id\":5");
        then.status(200).json_body(json!({
            "status": 200,
            "pending_amount": 0,
            "data": [{"paid_at": "2024-02-01", "receipt_no": "R-1", "paid_amount": "1500"}]
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let summary = portal
        .courses
        .payments(&session(), UserCourseId::new(5))
        .await
        .unwrap();

    assert!(summary.is_fully_paid());
    assert_eq!(summary.payments[0].receipt_no, "R-1");
    assert!((summary.payments[0].paid_amount - 1500.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn deliverables_come_from_concept_levels() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/my_courses")
            .body_includes("\"required\":\"my_course_deliverables_list\"");
        then.status(200).json_body(json!({
            "status": 200,
            "data": {"course_title_code_concept_levels": [{
                "id": 1,
                "user_course_payment_deliverables": [{
                    "id": 9,
                    "course_concept_name": "AutoCAD",
                    "course_level_name": "L1",
                    "course_deliverable_name": "Guide"
                }]
            }]}
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let groups = portal
        .courses
        .deliverables(&session(), UserCourseId::new(5))
        .await
        .unwrap();
    assert_eq!(groups[0].title().as_deref(), Some("AutoCAD - L1"));
}

#[tokio::test]
async fn feedback_goes_to_the_public_api() {
    let server = MockServer::start();
    let questions = server.mock(|when, then| {
        when.method(POST)
            .path("/pub/public_api")
            .body_includes("\"source\":\"show_feedback\"")
            .body_includes("\"master_app_id\":5");
        then.status(200).json_body(json!({
            "status": 200,
            "data": [{"id": 1, "name": "Rate us", "master_question_type_id": 3}]
        }));
    });
    let submit = server.mock(|when, then| {
        when.method(POST)
            .path("/pub/public_api")
            .body_includes("\"source\":\"submit_feedback\"")
            .body_includes("\"1\":\"4\"");
        then.status(200).json_body(json!({"status": 200}));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let course = UserCourseId::new(5);
    let list = portal.feedback.questions(&session(), course).await.unwrap();
    assert_eq!(list[0].name, "Rate us");

    let mut answers = FeedbackAnswers::new();
    answers.set_rating(1, 4);
    portal
        .feedback
        .submit(&session(), course, &answers)
        .await
        .unwrap();

    questions.assert();
    submit.assert();
}

#[tokio::test]
async fn reference_lists_use_master_sources() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/master")
            .body_includes("\"source\":\"get_master_user_current_status\"");
        then.status(200).json_body(json!({
            "status": 200,
            "data": [{"id": 1, "name": "Student"}, {"id": 2, "name": "Working"}]
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let statuses = portal
        .references
        .reference_list(&session(), ReferenceKind::Status)
        .await
        .unwrap();
    assert_eq!(statuses.len(), 2);

    let err = portal
        .references
        .reference_list(&session(), ReferenceKind::Country)
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::NotFound);
}

#[tokio::test]
async fn login_returns_the_grant() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/login")
            .body_includes("\"source\":\"login\"")
            .body_includes("\"package_name\":\"lms.caddcentre.com\"")
            .body_includes("\"password\":\"1234\"");
        then.status(200).json_body(json!({
            "status": 200,
            "data": {"token": "new-token", "id": 77, "first_name": "Ana"}
        }));
    });

    let portal = Portal::http(config(&server)).unwrap();
    let grant = portal
        .auth
        .login(&LoginRequest {
            identifier: "9999999999".into(),
            otp: "1234".into(),
        })
        .await
        .unwrap();
    assert_eq!(grant.token, "new-token");
    assert_eq!(grant.user_id, UserId::new(77));
}

#[tokio::test]
async fn http_401_is_unauthenticated() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/my_courses");
        then.status(401);
    });

    let portal = Portal::http(config(&server)).unwrap();
    let err = portal.courses.list_courses(&session()).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthenticated);
}

#[tokio::test]
async fn slow_backend_times_out_as_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/my_courses");
        then.status(200)
            .delay(Duration::from_millis(800))
            .json_body(json!({"status": 200, "data": []}));
    });

    let portal =
        Portal::http(config(&server).with_timeout(Duration::from_millis(100))).unwrap();
    let err = portal.courses.list_courses(&session()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
}
