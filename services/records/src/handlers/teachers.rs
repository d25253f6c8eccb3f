use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use registrar_auth_types::identity::CallerHeaders;
use registrar_domain::id::{IdentityId, TeacherId};
use registrar_domain::pagination::PageRequest;

use crate::domain::types::{NewIdentity, Profile, Teacher, TeacherFields};
use crate::error::RecordsServiceError;
use crate::handlers::courses::CourseResponse;
use crate::state::AppState;
use crate::usecase::profile::{
    CreateLinkedProfileUseCase, DeleteTeacherUseCase, GetTeacherUseCase, ListTeachersUseCase,
    ProfileFields, UpdateTeacherInput, UpdateTeacherUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TeacherResponse {
    pub id: TeacherId,
    pub department: String,
    pub identity_id: Option<IdentityId>,
    pub version: i32,
    #[serde(serialize_with = "registrar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Teacher> for TeacherResponse {
    fn from(teacher: Teacher) -> Self {
        Self {
            id: teacher.id,
            department: teacher.department,
            identity_id: teacher.identity_id,
            version: teacher.version,
            created_at: teacher.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct TeacherDetailsResponse {
    #[serde(flatten)]
    pub teacher: TeacherResponse,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub courses: Vec<CourseResponse>,
}

// ── GET /teachers ────────────────────────────────────────────────────────────

pub async fn list_teachers(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<TeacherResponse>>, RecordsServiceError> {
    let usecase = ListTeachersUseCase {
        teachers: state.teacher_repo(),
    };
    let teachers = usecase.execute(&caller, page).await?;
    Ok(Json(teachers.into_iter().map(Into::into).collect()))
}

// ── POST /teachers ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTeacherRequest {
    /// Defaults to the email address.
    pub username: Option<String>,
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(flatten)]
    pub fields: TeacherFields,
}

pub async fn create_teacher(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherResponse>), RecordsServiceError> {
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
        .execute(&caller, credentials, ProfileFields::Teacher(body.fields))
        .await?;
    let Profile::Teacher(teacher) = profile else {
        return Err(anyhow::anyhow!("teacher creation returned a student profile").into());
    };
    Ok((StatusCode::CREATED, Json(teacher.into())))
}

// ── GET /teachers/{id} ───────────────────────────────────────────────────────

pub async fn get_teacher(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<TeacherId>,
) -> Result<Json<TeacherDetailsResponse>, RecordsServiceError> {
    let usecase = GetTeacherUseCase {
        identities: state.identity_provider(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
    };
    let details = usecase.execute(&caller, id).await?;
    let (full_name, email) = match details.identity {
        Some(identity) => (Some(identity.full_name), Some(identity.email)),
        None => (None, None),
    };
    Ok(Json(TeacherDetailsResponse {
        teacher: details.teacher.into(),
        full_name,
        email,
        courses: details.courses.into_iter().map(Into::into).collect(),
    }))
}

// ── PATCH /teachers/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateTeacherRequest {
    pub version: i32,
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub fields: TeacherFields,
}

pub async fn update_teacher(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<TeacherId>,
    Json(body): Json<UpdateTeacherRequest>,
) -> Result<Json<TeacherResponse>, RecordsServiceError> {
    let usecase = UpdateTeacherUseCase {
        identities: state.identity_provider(),
        teachers: state.teacher_repo(),
    };
    let teacher = usecase
        .execute(
            &caller,
            id,
            body.version,
            UpdateTeacherInput {
                fields: body.fields,
                full_name: body.full_name,
            },
        )
        .await?;
    Ok(Json(teacher.into()))
}

// ── DELETE /teachers/{id} ────────────────────────────────────────────────────

pub async fn delete_teacher(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<TeacherId>,
) -> Result<StatusCode, RecordsServiceError> {
    let usecase = DeleteTeacherUseCase {
        identities: state.identity_provider(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
    };
    usecase.execute(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
