use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use registrar_auth_types::identity::CallerHeaders;
use registrar_domain::id::{IdentityId, StudentId};
use registrar_domain::pagination::PageRequest;

use crate::domain::types::{NewIdentity, Profile, Student, StudentFields};
use crate::error::RecordsServiceError;
use crate::handlers::enrollments::EnrollmentResponse;
use crate::state::AppState;
use crate::usecase::profile::{
    CreateLinkedProfileUseCase, DeleteStudentUseCase, GetStudentUseCase, ProfileFields,
    UpdateStudentUseCase,
};
use crate::usecase::visibility::ListStudentsUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StudentResponse {
    pub id: StudentId,
    pub registration_id: String,
    pub department: Option<String>,
    pub date_of_birth: NaiveDate,
    pub identity_id: Option<IdentityId>,
    pub version: i32,
    #[serde(serialize_with = "registrar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            registration_id: student.registration_id,
            department: student.department,
            date_of_birth: student.date_of_birth,
            identity_id: student.identity_id,
            version: student.version,
            created_at: student.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct StudentDetailsResponse {
    #[serde(flatten)]
    pub student: StudentResponse,
    pub enrollments: Vec<EnrollmentResponse>,
}

// ── GET /students ────────────────────────────────────────────────────────────

pub async fn list_students(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<StudentResponse>>, RecordsServiceError> {
    let usecase = ListStudentsUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let students = usecase.execute(&caller, page).await?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

// ── POST /students ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateStudentRequest {
    /// Defaults to the email address.
    pub username: Option<String>,
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(flatten)]
    pub fields: StudentFields,
}

pub async fn create_student(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), RecordsServiceError> {
    let usecase = CreateLinkedProfileUseCase {
        identities: state.identity_provider(),
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        notifier: state.notifier.clone(),
    };
    let credentials = NewIdentity {
        username: body.username.unwrap_or_else(|| body.email.clone()),
        email: body.email,
        full_name: body.full_name,
        password: body.password,
    };
    let profile = usecase
        .execute(&caller, credentials, ProfileFields::Student(body.fields))
        .await?;
    let Profile::Student(student) = profile else {
        return Err(anyhow::anyhow!("student creation returned a teacher profile").into());
    };
    Ok((StatusCode::CREATED, Json(student.into())))
}

// ── GET /students/{id} ───────────────────────────────────────────────────────

pub async fn get_student(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<StudentDetailsResponse>, RecordsServiceError> {
    let usecase = GetStudentUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let details = usecase.execute(&caller, id).await?;
    Ok(Json(StudentDetailsResponse {
        student: details.student.into(),
        enrollments: details.enrollments.into_iter().map(Into::into).collect(),
    }))
}

// ── PATCH /students/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateStudentRequest {
    /// The version the client last read.
    pub version: i32,
    #[serde(flatten)]
    pub fields: StudentFields,
}

pub async fn update_student(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Json(body): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, RecordsServiceError> {
    let usecase = UpdateStudentUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let student = usecase
        .execute(&caller, id, body.version, body.fields)
        .await?;
    Ok(Json(student.into()))
}

// ── DELETE /students/{id} ────────────────────────────────────────────────────

pub async fn delete_student(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<StatusCode, RecordsServiceError> {
    let usecase = DeleteStudentUseCase {
        identities: state.identity_provider(),
        students: state.student_repo(),
        enrollments: state.enrollment_repo(),
        attendances: state.attendance_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
