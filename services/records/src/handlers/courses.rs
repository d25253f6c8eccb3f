use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use registrar_auth_types::identity::CallerHeaders;
use registrar_domain::id::{CourseId, TeacherId};
use registrar_domain::pagination::PageRequest;

use crate::domain::types::{Course, CourseFields};
use crate::error::RecordsServiceError;
use crate::handlers::enrollments::EnrollmentResponse;
use crate::state::AppState;
use crate::usecase::course::{
    CreateCourseUseCase, DeleteCourseUseCase, GetCourseUseCase, UpdateCourseUseCase,
};
use crate::usecase::visibility::ListCoursesUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CourseResponse {
    pub id: CourseId,
    pub course_code: String,
    pub title: String,
    pub credits: i32,
    pub description: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub version: i32,
    #[serde(serialize_with = "registrar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            course_code: course.course_code,
            title: course.title,
            credits: course.credits,
            description: course.description,
            teacher_id: course.teacher_id,
            version: course.version,
            created_at: course.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CourseDetailsResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub enrollments: Vec<EnrollmentResponse>,
}

// ── GET /courses ─────────────────────────────────────────────────────────────

pub async fn list_courses(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<CourseResponse>>, RecordsServiceError> {
    let usecase = ListCoursesUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let courses = usecase.execute(&caller, page).await?;
    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

// ── POST /courses ────────────────────────────────────────────────────────────

pub async fn create_course(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Json(body): Json<CourseFields>,
) -> Result<(StatusCode, Json<CourseResponse>), RecordsServiceError> {
    let usecase = CreateCourseUseCase {
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
    };
    let course = usecase.execute(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

// ── GET /courses/{id} ────────────────────────────────────────────────────────

pub async fn get_course(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<Json<CourseDetailsResponse>, RecordsServiceError> {
    let usecase = GetCourseUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let details = usecase.execute(&caller, id).await?;
    Ok(Json(CourseDetailsResponse {
        course: details.course.into(),
        enrollments: details.enrollments.into_iter().map(Into::into).collect(),
    }))
}

// ── PATCH /courses/{id} ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCourseRequest {
    pub version: i32,
    #[serde(flatten)]
    pub fields: CourseFields,
}

pub async fn update_course(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
    Json(body): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, RecordsServiceError> {
    let usecase = UpdateCourseUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let course = usecase
        .execute(&caller, id, body.version, body.fields)
        .await?;
    Ok(Json(course.into()))
}

// ── DELETE /courses/{id} ─────────────────────────────────────────────────────

pub async fn delete_course(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<CourseId>,
) -> Result<StatusCode, RecordsServiceError> {
    let usecase = DeleteCourseUseCase {
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        attendances: state.attendance_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
