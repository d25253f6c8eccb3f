use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use registrar_auth_types::identity::CallerHeaders;
use registrar_domain::grade::Grade;
use registrar_domain::id::{CourseId, EnrollmentId, StudentId};
use registrar_domain::pagination::PageRequest;

use crate::domain::types::Enrollment;
use crate::error::RecordsServiceError;
use crate::state::AppState;
use crate::usecase::enrollment::{
    CreateEnrollmentInput, CreateEnrollmentUseCase, DeleteEnrollmentUseCase,
    GetEnrollmentUseCase, UpdateMarksUseCase,
};
use crate::usecase::visibility::ListEnrollmentsUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EnrollmentResponse {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrollment_date: NaiveDate,
    pub marks: Option<i32>,
    pub grade: Option<Grade>,
    pub version: i32,
    #[serde(serialize_with = "registrar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
            enrollment_date: enrollment.enrollment_date,
            marks: enrollment.marks,
            grade: enrollment.grade,
            version: enrollment.version,
            created_at: enrollment.created_at,
        }
    }
}

// ── GET /enrollments ─────────────────────────────────────────────────────────

pub async fn list_enrollments(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<EnrollmentResponse>>, RecordsServiceError> {
    let usecase = ListEnrollmentsUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let enrollments = usecase.execute(&caller, page).await?;
    Ok(Json(enrollments.into_iter().map(Into::into).collect()))
}

// ── POST /enrollments ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrollment_date: Option<NaiveDate>,
}

pub async fn create_enrollment(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), RecordsServiceError> {
    let usecase = CreateEnrollmentUseCase {
        identities: state.identity_provider(),
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        notifier: state.notifier.clone(),
    };
    let enrollment = usecase
        .execute(
            &caller,
            CreateEnrollmentInput {
                student_id: body.student_id,
                course_id: body.course_id,
                enrollment_date: body.enrollment_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(enrollment.into())))
}

// ── GET /enrollments/{id} ────────────────────────────────────────────────────

pub async fn get_enrollment(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<Json<EnrollmentResponse>, RecordsServiceError> {
    let usecase = GetEnrollmentUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let enrollment = usecase.execute(&caller, id).await?;
    Ok(Json(enrollment.into()))
}

// ── PATCH /enrollments/{id}/marks ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMarksRequest {
    pub version: i32,
    /// `null` clears the marks and the grade.
    pub marks: Option<i32>,
}

pub async fn update_marks(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
    Json(body): Json<UpdateMarksRequest>,
) -> Result<Json<EnrollmentResponse>, RecordsServiceError> {
    let usecase = UpdateMarksUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let enrollment = usecase
        .execute(&caller, id, body.version, body.marks)
        .await?;
    Ok(Json(enrollment.into()))
}

// ── DELETE /enrollments/{id} ─────────────────────────────────────────────────

pub async fn delete_enrollment(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<EnrollmentId>,
) -> Result<StatusCode, RecordsServiceError> {
    let usecase = DeleteEnrollmentUseCase {
        enrollments: state.enrollment_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
