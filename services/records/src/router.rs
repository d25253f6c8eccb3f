use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};

use registrar_core::health::{healthz, readiness};
use registrar_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    attendances::{
        create_attendance, delete_attendance, get_attendance, list_attendances, update_attendance,
    },
    courses::{create_course, delete_course, get_course, list_courses, update_course},
    dashboard::{get_dashboard, get_own_dashboard},
    enrollments::{
        create_enrollment, delete_enrollment, get_enrollment, list_enrollments, update_marks,
    },
    students::{create_student, delete_student, get_student, list_students, update_student},
    teachers::{create_teacher, delete_teacher, get_teacher, list_teachers, update_teacher},
    transcript::{get_own_transcript, get_transcript},
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Students
        .route("/students", get(list_students).post(create_student))
        .route("/students/@me/transcript", get(get_own_transcript))
        .route(
            "/students/{id}",
            get(get_student).patch(update_student).delete(delete_student),
        )
        .route("/students/{id}/transcript", get(get_transcript))
        // Teachers
        .route("/teachers", get(list_teachers).post(create_teacher))
        .route(
            "/teachers/{id}",
            get(get_teacher).patch(update_teacher).delete(delete_teacher),
        )
        // Courses
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
        // Enrollments
        .route("/enrollments", get(list_enrollments).post(create_enrollment))
        .route(
            "/enrollments/{id}",
            get(get_enrollment).delete(delete_enrollment),
        )
        .route("/enrollments/{id}/marks", patch(update_marks))
        // Attendances
        .route("/attendances", get(list_attendances).post(create_attendance))
        .route(
            "/attendances/{id}",
            get(get_attendance)
                .patch(update_attendance)
                .delete(delete_attendance),
        )
        // Dashboards
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/@me", get(get_own_dashboard))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
