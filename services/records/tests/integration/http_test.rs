use axum::http::StatusCode;
use axum_test::{TestRequest, TestServer};
use serde_json::{Value, json};

use registrar_domain::id::IdentityId;
use registrar_domain::role::Role;
use registrar_records::infra::mailer::{SmtpNotifier, SmtpSettings};
use registrar_records::router::build_router;
use registrar_records::state::AppState;
use registrar_testing::auth::MockAuth;

use crate::helpers::setup_db;

async fn server() -> TestServer {
    let notifier = SmtpNotifier::new(&SmtpSettings {
        host: "localhost".to_owned(),
        port: 2525,
        username: None,
        password: None,
        use_tls: false,
        sender_address: "registrar@uni.edu".to_owned(),
        sender_name: "Registrar".to_owned(),
    })
    .unwrap();
    let state = AppState {
        db: setup_db().await,
        notifier,
    };
    TestServer::new(build_router(state)).unwrap()
}

fn as_caller(mut request: TestRequest, auth: &MockAuth) -> TestRequest {
    for (name, value) in auth.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

#[tokio::test]
async fn should_report_liveness_and_readiness() {
    let server = server().await;

    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn should_reject_request_without_caller_headers() {
    let server = server().await;

    let response = server.get("/students").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_forbid_caller_without_role() {
    let server = server().await;
    let nobody = MockAuth::new(IdentityId::new(), std::iter::empty::<Role>());

    let response = as_caller(server.get("/students"), &nobody).await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_create_and_fetch_course_as_admin() {
    let server = server().await;
    let admin = MockAuth::admin();

    let created = as_caller(server.post("/courses"), &admin)
        .json(&json!({
            "course_code": "CS101",
            "title": "Data Structures",
            "credits": 4,
            "description": null,
            "teacher_id": null
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let course: Value = created.json();
    assert_eq!(course["course_code"], "CS101");
    assert_eq!(course["version"], 1);

    let id = course["id"].as_str().unwrap();
    let fetched = as_caller(server.get(&format!("/courses/{id}")), &admin).await;
    fetched.assert_status_ok();
    let details: Value = fetched.json();
    assert_eq!(details["title"], "Data Structures");
    assert_eq!(details["enrollments"], json!([]));
}

#[tokio::test]
async fn should_render_field_errors() {
    let server = server().await;
    let admin = MockAuth::admin();

    let response = as_caller(server.post("/courses"), &admin)
        .json(&json!({
            "course_code": "CS101",
            "title": "DS",
            "credits": 9
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["kind"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["credits", "title"]);
}

#[tokio::test]
async fn should_create_student_with_linked_identity() {
    let server = server().await;
    let admin = MockAuth::admin();

    let created = as_caller(server.post("/students"), &admin)
        .json(&json!({
            "email": "ada@uni.edu",
            "full_name": "Ada Lovelace",
            "password": "secret1",
            "registration_id": "REG-1",
            "department": "Science",
            "date_of_birth": "2004-05-01"
        }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let student: Value = created.json();
    assert!(student["identity_id"].is_string());

    let rejected = as_caller(server.post("/students"), &admin)
        .json(&json!({
            "email": "grace@uni.edu",
            "full_name": "Grace Hopper",
            "password": "123",
            "registration_id": "REG-2",
            "date_of_birth": "2004-05-01"
        }))
        .await;
    rejected.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = rejected.json();
    assert_eq!(body["kind"], "IDENTITY_CREATION_FAILED");
    assert!(!body["reasons"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_scope_own_dashboard_to_students() {
    let server = server().await;
    let admin = MockAuth::admin();

    let response = as_caller(server.get("/dashboard/@me"), &admin).await;

    response.assert_status(StatusCode::FORBIDDEN);
}
