use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use registrar_auth_types::identity::CallerHeaders;
use registrar_domain::id::{AttendanceId, CourseId, StudentId};
use registrar_domain::pagination::PageRequest;

use crate::domain::types::{Attendance, AttendanceFields};
use crate::error::RecordsServiceError;
use crate::infra::db::{
    DbAttendanceRepository, DbCourseRepository, DbEnrollmentRepository, DbStudentRepository,
    DbTeacherRepository,
};
use crate::state::AppState;
use crate::usecase::attendance::AttendanceUseCase;

#[derive(Serialize)]
pub struct AttendanceResponse {
    pub id: AttendanceId,
    pub date: NaiveDate,
    pub is_present: bool,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub version: i32,
}

impl From<Attendance> for AttendanceResponse {
    fn from(attendance: Attendance) -> Self {
        Self {
            id: attendance.id,
            date: attendance.date,
            is_present: attendance.is_present,
            student_id: attendance.student_id,
            course_id: attendance.course_id,
            version: attendance.version,
        }
    }
}

fn usecase(
    state: &AppState,
) -> AttendanceUseCase<
    DbStudentRepository,
    DbTeacherRepository,
    DbCourseRepository,
    DbEnrollmentRepository,
    DbAttendanceRepository,
> {
    AttendanceUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
        attendances: state.attendance_repo(),
    }
}

// ── GET /attendances ─────────────────────────────────────────────────────────

pub async fn list_attendances(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<AttendanceResponse>>, RecordsServiceError> {
    let attendances = usecase(&state).list(&caller, page).await?;
    Ok(Json(attendances.into_iter().map(Into::into).collect()))
}

// ── POST /attendances ────────────────────────────────────────────────────────

pub async fn create_attendance(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Json(body): Json<AttendanceFields>,
) -> Result<(StatusCode, Json<AttendanceResponse>), RecordsServiceError> {
    let attendance = usecase(&state).create(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(attendance.into())))
}

// ── GET /attendances/{id} ────────────────────────────────────────────────────

pub async fn get_attendance(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
) -> Result<Json<AttendanceResponse>, RecordsServiceError> {
    let attendance = usecase(&state).get(&caller, id).await?;
    Ok(Json(attendance.into()))
}

// ── PATCH /attendances/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateAttendanceRequest {
    pub version: i32,
    #[serde(flatten)]
    pub fields: AttendanceFields,
}

pub async fn update_attendance(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
    Json(body): Json<UpdateAttendanceRequest>,
) -> Result<Json<AttendanceResponse>, RecordsServiceError> {
    let attendance = usecase(&state)
        .update(&caller, id, body.version, body.fields)
        .await?;
    Ok(Json(attendance.into()))
}

// ── DELETE /attendances/{id} ─────────────────────────────────────────────────

pub async fn delete_attendance(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<AttendanceId>,
) -> Result<StatusCode, RecordsServiceError> {
    usecase(&state).delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
