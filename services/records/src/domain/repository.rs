#![allow(async_fn_in_trait)]

use std::future::Future;

use registrar_domain::grade::Grade;
use registrar_domain::id::{
    AttendanceId, CourseId, EnrollmentId, IdentityId, StudentId, TeacherId,
};
use registrar_domain::pagination::PageRequest;
use registrar_domain::role::Role;

use crate::domain::types::{
    Attendance, AuthIdentity, Course, Enrollment, NewIdentity, Student, Teacher,
};
use crate::error::{IdentityError, RecordsServiceError};

// Updates take the record as last read: `version` is the expected version, the
// returned row carries the bumped one. A stale version yields
// `ConcurrencyConflict`, a missing row the entity's not-found error.

/// Rows a paged student list covers.
#[derive(Debug, Clone, Copy)]
pub enum StudentFilter<'a> {
    All,
    Ids(&'a [StudentId]),
}

/// Rows a paged course list covers.
#[derive(Debug, Clone, Copy)]
pub enum CourseFilter<'a> {
    All,
    Ids(&'a [CourseId]),
    Teacher(TeacherId),
}

/// Rows a paged enrollment or attendance list covers.
#[derive(Debug, Clone, Copy)]
pub enum RecordFilter<'a> {
    All,
    Student(StudentId),
    Courses(&'a [CourseId]),
}

/// Repository for student profiles.
pub trait StudentRepository: Send + Sync {
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, RecordsServiceError>;
    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Student>, RecordsServiceError>;
    async fn find_by_registration_id(
        &self,
        registration_id: &str,
    ) -> Result<Option<Student>, RecordsServiceError>;
    /// One page ordered by registration id.
    async fn list(
        &self,
        filter: StudentFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Student>, RecordsServiceError>;
    /// Newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Student>, RecordsServiceError>;
    async fn count(&self) -> Result<u64, RecordsServiceError>;
    /// Fails with a validation error on `registration_id` when it is already taken.
    async fn create(&self, student: &Student) -> Result<(), RecordsServiceError>;
    async fn update(&self, student: &Student) -> Result<Student, RecordsServiceError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: StudentId) -> Result<bool, RecordsServiceError>;
}

/// Repository for teacher profiles.
pub trait TeacherRepository: Send + Sync {
    async fn find_by_id(&self, id: TeacherId) -> Result<Option<Teacher>, RecordsServiceError>;
    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Teacher>, RecordsServiceError>;
    async fn list(&self, page: PageRequest) -> Result<Vec<Teacher>, RecordsServiceError>;
    async fn create(&self, teacher: &Teacher) -> Result<(), RecordsServiceError>;
    async fn update(&self, teacher: &Teacher) -> Result<Teacher, RecordsServiceError>;
    async fn delete(&self, id: TeacherId) -> Result<bool, RecordsServiceError>;
}

/// Repository for courses.
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, RecordsServiceError>;
    /// One page ordered by course code.
    async fn list(
        &self,
        filter: CourseFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Course>, RecordsServiceError>;
    async fn list_by_ids(&self, ids: &[CourseId]) -> Result<Vec<Course>, RecordsServiceError>;
    async fn list_by_teacher(
        &self,
        teacher_id: TeacherId,
    ) -> Result<Vec<Course>, RecordsServiceError>;
    async fn count(&self) -> Result<u64, RecordsServiceError>;
    async fn create(&self, course: &Course) -> Result<(), RecordsServiceError>;
    async fn update(&self, course: &Course) -> Result<Course, RecordsServiceError>;
    async fn delete(&self, id: CourseId) -> Result<bool, RecordsServiceError>;
}

/// Repository for enrollments.
pub trait EnrollmentRepository: Send + Sync {
    async fn find_by_id(&self, id: EnrollmentId)
    -> Result<Option<Enrollment>, RecordsServiceError>;
    async fn find_by_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, RecordsServiceError>;
    async fn list_all(&self) -> Result<Vec<Enrollment>, RecordsServiceError>;
    /// One page, newest first.
    async fn list(
        &self,
        filter: RecordFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, RecordsServiceError>;
    async fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Enrollment>, RecordsServiceError>;
    async fn list_by_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Enrollment>, RecordsServiceError>;
    /// Newest first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Enrollment>, RecordsServiceError>;
    async fn count(&self) -> Result<u64, RecordsServiceError>;
    /// Fails with a validation error on `course_id` when the pair already exists.
    async fn create(&self, enrollment: &Enrollment) -> Result<(), RecordsServiceError>;
    /// Writes marks and grade together, conditional on `expected_version`.
    async fn update_marks(
        &self,
        id: EnrollmentId,
        expected_version: i32,
        marks: Option<i32>,
        grade: Option<Grade>,
    ) -> Result<Enrollment, RecordsServiceError>;
    async fn delete(&self, id: EnrollmentId) -> Result<bool, RecordsServiceError>;
}

/// Repository for attendance marks.
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_id(&self, id: AttendanceId)
    -> Result<Option<Attendance>, RecordsServiceError>;
    /// One page, latest date first.
    async fn list(
        &self,
        filter: RecordFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Attendance>, RecordsServiceError>;
    async fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Attendance>, RecordsServiceError>;
    async fn list_by_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Attendance>, RecordsServiceError>;
    async fn create(&self, attendance: &Attendance) -> Result<(), RecordsServiceError>;
    async fn update(&self, attendance: &Attendance) -> Result<Attendance, RecordsServiceError>;
    async fn delete(&self, id: AttendanceId) -> Result<bool, RecordsServiceError>;
}

/// Port to the identity provider. Futures are `Send` so lookups can run in
/// detached notification tasks.
pub trait IdentityProvider: Send + Sync {
    /// Create an identity with `roles`. Policy violations are reported together
    /// as `IdentityError::Rejected`.
    fn create_identity(
        &self,
        new: &NewIdentity,
        roles: &[Role],
    ) -> impl Future<Output = Result<AuthIdentity, IdentityError>> + Send;

    fn assign_role(
        &self,
        id: IdentityId,
        role: Role,
    ) -> impl Future<Output = Result<(), IdentityError>> + Send;

    /// `IdentityError::NotFound` when the identity is already gone.
    fn delete_identity(
        &self,
        id: IdentityId,
    ) -> impl Future<Output = Result<(), IdentityError>> + Send;

    fn find_by_id(
        &self,
        id: IdentityId,
    ) -> impl Future<Output = Result<Option<AuthIdentity>, IdentityError>> + Send;

    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<AuthIdentity>, IdentityError>> + Send;

    fn update_full_name(
        &self,
        id: IdentityId,
        full_name: &str,
    ) -> impl Future<Output = Result<(), IdentityError>> + Send;
}
