use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use serde::Serialize;

use registrar_auth_types::identity::CallerHeaders;
use registrar_domain::grade::Grade;
use registrar_domain::id::{EnrollmentId, StudentId};

use crate::domain::types::{Transcript, TranscriptEntry};
use crate::error::RecordsServiceError;
use crate::handlers::students::StudentResponse;
use crate::state::AppState;
use crate::usecase::transcript::TranscriptUseCase;

#[derive(Serialize)]
pub struct TranscriptEntryResponse {
    pub enrollment_id: EnrollmentId,
    pub course_code: String,
    pub course_title: String,
    pub credits: i32,
    pub enrollment_date: NaiveDate,
    pub marks: Option<i32>,
    pub grade: Option<Grade>,
}

impl From<TranscriptEntry> for TranscriptEntryResponse {
    fn from(entry: TranscriptEntry) -> Self {
        Self {
            enrollment_id: entry.enrollment_id,
            course_code: entry.course_code,
            course_title: entry.course_title,
            credits: entry.credits,
            enrollment_date: entry.enrollment_date,
            marks: entry.marks,
            grade: entry.grade,
        }
    }
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub student: StudentResponse,
    pub entries: Vec<TranscriptEntryResponse>,
    pub average_marks: f64,
}

impl From<Transcript> for TranscriptResponse {
    fn from(transcript: Transcript) -> Self {
        Self {
            student: transcript.student.into(),
            entries: transcript.entries.into_iter().map(Into::into).collect(),
            average_marks: transcript.average_marks,
        }
    }
}

async fn transcript(
    state: &AppState,
    caller: &registrar_domain::caller::CallerContext,
    student_id: Option<StudentId>,
) -> Result<Json<TranscriptResponse>, RecordsServiceError> {
    let usecase = TranscriptUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    };
    let transcript = usecase.execute(caller, student_id).await?;
    Ok(Json(transcript.into()))
}

// ── GET /students/{id}/transcript ────────────────────────────────────────────

pub async fn get_transcript(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<TranscriptResponse>, RecordsServiceError> {
    transcript(&state, &caller, Some(id)).await
}

// ── GET /students/@me/transcript ─────────────────────────────────────────────

pub async fn get_own_transcript(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
) -> Result<Json<TranscriptResponse>, RecordsServiceError> {
    transcript(&state, &caller, None).await
}
