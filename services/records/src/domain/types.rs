use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use registrar_domain::grade::Grade;
use registrar_domain::id::{
    AttendanceId, CourseId, EnrollmentId, IdentityId, StudentId, TeacherId,
};
use registrar_domain::role::Role;

/// Authentication identity owned by the identity provider.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: IdentityId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub roles: BTreeSet<Role>,
}

/// Credentials for a new identity. The password is plain text until hashed by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIdentity {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Student {
    pub id: StudentId,
    pub registration_id: String,
    pub department: Option<String>,
    pub date_of_birth: NaiveDate,
    pub identity_id: Option<IdentityId>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Teacher {
    pub id: TeacherId,
    pub department: String,
    pub identity_id: Option<IdentityId>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Course {
    pub id: CourseId,
    pub course_code: String,
    pub title: String,
    pub credits: i32,
    pub description: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

/// A student's enrollment in a course. `grade` always equals `compute_grade(marks)`.
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub enrollment_date: NaiveDate,
    pub marks: Option<i32>,
    pub grade: Option<Grade>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Attendance {
    pub id: AttendanceId,
    pub date: NaiveDate,
    pub is_present: bool,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub version: i32,
}

/// A profile of either kind, returned by the lifecycle coordinator.
#[derive(Debug, Clone)]
pub enum Profile {
    Student(Student),
    Teacher(Teacher),
}

impl Profile {
    pub fn identity_id(&self) -> Option<IdentityId> {
        match self {
            Self::Student(s) => s.identity_id,
            Self::Teacher(t) => t.identity_id,
        }
    }
}

// ── Field constraints ────────────────────────────────────────────────────────

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Editable student fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentFields {
    #[validate(
        length(max = 20, message = "must be at most 20 characters"),
        custom(function = "non_blank")
    )]
    pub registration_id: String,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub department: Option<String>,
    pub date_of_birth: NaiveDate,
}

impl StudentFields {
    /// Surrounding whitespace is dropped before validation and storage.
    pub fn trimmed(self) -> Self {
        Self {
            registration_id: self.registration_id.trim().to_owned(),
            department: self.department.map(|d| d.trim().to_owned()),
            ..self
        }
    }
}

/// Editable teacher fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TeacherFields {
    #[validate(
        length(max = 50, message = "must be at most 50 characters"),
        custom(function = "non_blank")
    )]
    pub department: String,
}

impl TeacherFields {
    pub fn trimmed(self) -> Self {
        Self {
            department: self.department.trim().to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CourseFields {
    #[validate(
        length(max = 10, message = "must be at most 10 characters"),
        custom(function = "non_blank")
    )]
    pub course_code: String,
    #[validate(
        length(min = 3, max = 100, message = "must be 3 to 100 characters"),
        custom(function = "non_blank")
    )]
    pub title: String,
    #[validate(range(min = 1, max = 4, message = "must be between 1 and 4"))]
    pub credits: i32,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    pub teacher_id: Option<TeacherId>,
}

impl CourseFields {
    /// Code and title are checked and stored without surrounding whitespace.
    pub fn trimmed(self) -> Self {
        Self {
            course_code: self.course_code.trim().to_owned(),
            title: self.title.trim().to_owned(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceFields {
    pub date: NaiveDate,
    pub is_present: bool,
    pub student_id: StudentId,
    pub course_id: CourseId,
}

// ── Read compositions ────────────────────────────────────────────────────────

/// One transcript line: an enrollment joined with its course.
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    pub enrollment_id: EnrollmentId,
    pub course_code: String,
    pub course_title: String,
    pub credits: i32,
    pub enrollment_date: NaiveDate,
    pub marks: Option<i32>,
    pub grade: Option<Grade>,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    pub student: Student,
    pub entries: Vec<TranscriptEntry>,
    /// Sum of recorded marks over the number of enrollments; 0 with no enrollments.
    pub average_marks: f64,
}

#[derive(Debug, Clone)]
pub struct AdminDashboard {
    pub total_students: u64,
    pub total_courses: u64,
    pub total_enrollments: u64,
    /// Average over graded enrollments only; `None` when nothing is graded.
    pub average_marks: Option<f64>,
    pub recent_students: Vec<Student>,
    pub recent_enrollments: Vec<Enrollment>,
}

#[derive(Debug, Clone)]
pub struct StudentDashboard {
    pub student: Student,
    pub enrollments: Vec<Enrollment>,
    pub average_marks: f64,
}

#[derive(Debug, Clone)]
pub struct TeacherDashboard {
    pub teacher: Teacher,
    pub course_count: usize,
    pub student_count: usize,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone)]
pub enum Dashboard {
    Admin(AdminDashboard),
    Teacher(TeacherDashboard),
    Student(StudentDashboard),
}

/// Average over all enrollments: ungraded ones count as zero.
pub fn average_marks(enrollments: &[Enrollment]) -> f64 {
    if enrollments.is_empty() {
        return 0.0;
    }
    let total: i64 = enrollments
        .iter()
        .filter_map(|e| e.marks)
        .map(i64::from)
        .sum();
    total as f64 / enrollments.len() as f64
}
