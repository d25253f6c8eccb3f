use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use registrar_core::error::{ServiceError, error_response};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Records service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RecordsServiceError {
    #[error("student not found")]
    StudentNotFound,
    #[error("teacher not found")]
    TeacherNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("enrollment not found")]
    EnrollmentNotFound,
    #[error("attendance not found")]
    AttendanceNotFound,
    #[error("forbidden")]
    Forbidden,
    /// The caller holds a role but has no profile linked to their identity.
    #[error("profile not found for caller")]
    ProfileNotFound,
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("invalid reference: {field}")]
    InvalidReference { field: &'static str },
    #[error("identity creation failed")]
    IdentityCreationFailed { reasons: Vec<String> },
    /// Profile persistence failed after the identity was created.
    /// `rolled_back = false` leaves an orphan identity behind.
    #[error("profile link failed for identity {identity_id}")]
    ProfileLinkFailed { identity_id: Uuid, rolled_back: bool },
    #[error("record was modified concurrently")]
    ConcurrencyConflict,
    #[error("dependent records exist")]
    DependentRecordsExist,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

/// Identity provider failures.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Credential policy violations, all of them.
    #[error("identity rejected: {}", .0.join("; "))]
    Rejected(Vec<String>),
    #[error("identity not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<IdentityError> for RecordsServiceError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Rejected(reasons) => Self::IdentityCreationFailed { reasons },
            IdentityError::NotFound => Self::Internal(anyhow::anyhow!("identity not found")),
            IdentityError::Internal(e) => Self::Internal(e),
        }
    }
}

impl RecordsServiceError {
    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl From<validator::ValidationErrors> for RecordsServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::Validation(fields)
    }
}

impl ServiceError for RecordsServiceError {
    fn status(&self) -> StatusCode {
        match self {
            Self::StudentNotFound
            | Self::TeacherNotFound
            | Self::CourseNotFound
            | Self::EnrollmentNotFound
            | Self::AttendanceNotFound
            | Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Validation(_)
            | Self::InvalidReference { .. }
            | Self::IdentityCreationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ConcurrencyConflict | Self::DependentRecordsExist => StatusCode::CONFLICT,
            Self::ProfileLinkFailed { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::TeacherNotFound => "TEACHER_NOT_FOUND",
            Self::CourseNotFound => "COURSE_NOT_FOUND",
            Self::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
            Self::AttendanceNotFound => "ATTENDANCE_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidReference { .. } => "INVALID_REFERENCE",
            Self::IdentityCreationFailed { .. } => "IDENTITY_CREATION_FAILED",
            Self::ProfileLinkFailed { .. } => "PROFILE_LINK_FAILED",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::DependentRecordsExist => "DEPENDENT_RECORDS_EXIST",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn details(&self) -> Option<serde_json::Map<String, serde_json::Value>> {
        let mut map = serde_json::Map::new();
        match self {
            Self::Validation(fields) => {
                map.insert("fields".to_owned(), serde_json::json!(fields));
            }
            Self::InvalidReference { field } => {
                map.insert("field".to_owned(), serde_json::json!(field));
            }
            Self::IdentityCreationFailed { reasons } => {
                map.insert("reasons".to_owned(), serde_json::json!(reasons));
            }
            Self::ProfileLinkFailed {
                identity_id,
                rolled_back,
            } => {
                map.insert("identity_id".to_owned(), serde_json::json!(identity_id));
                map.insert("rolled_back".to_owned(), serde_json::json!(rolled_back));
            }
            _ => return None,
        }
        Some(map)
    }
}

impl IntoResponse for RecordsServiceError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}
