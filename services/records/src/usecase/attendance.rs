use registrar_domain::caller::CallerContext;
use registrar_domain::id::AttendanceId;
use registrar_domain::pagination::PageRequest;

use crate::domain::repository::{
    AttendanceRepository, CourseRepository, EnrollmentRepository, RecordFilter,
    StudentRepository, TeacherRepository,
};
use crate::domain::types::{Attendance, AttendanceFields, Course};
use crate::error::RecordsServiceError;
use crate::usecase::visibility::{Scope, Visibility};

/// Attendance use cases share one set of repositories.
pub struct AttendanceUseCase<S, T, C, E, A> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
    pub attendances: A,
}

impl<S, T, C, E, A> AttendanceUseCase<S, T, C, E, A>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    A: AttendanceRepository,
{
    fn visibility(&self) -> Visibility<'_, S, T, C, E> {
        Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        }
    }

    /// Both references must resolve, and the caller must teach the course.
    async fn writable_course(
        &self,
        scope: &Scope,
        fields: &AttendanceFields,
    ) -> Result<Course, RecordsServiceError> {
        let course = self
            .courses
            .find_by_id(fields.course_id)
            .await?
            .ok_or(RecordsServiceError::InvalidReference { field: "course_id" })?;
        if self.students.find_by_id(fields.student_id).await?.is_none() {
            return Err(RecordsServiceError::InvalidReference {
                field: "student_id",
            });
        }
        scope.ensure_teaches(&course)?;
        Ok(course)
    }

    // ── List ─────────────────────────────────────────────────────────────────

    pub async fn list(
        &self,
        caller: &CallerContext,
        page: PageRequest,
    ) -> Result<Vec<Attendance>, RecordsServiceError> {
        let visibility = self.visibility();
        match visibility.scope(caller).await? {
            Scope::Admin => self.attendances.list(RecordFilter::All, page).await,
            Scope::Teacher(teacher) => {
                let course_ids = visibility.taught_course_ids(teacher.id).await?;
                if course_ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.attendances
                    .list(RecordFilter::Courses(&course_ids), page)
                    .await
            }
            Scope::Student(student) => {
                self.attendances
                    .list(RecordFilter::Student(student.id), page)
                    .await
            }
        }
    }

    // ── Get ──────────────────────────────────────────────────────────────────

    pub async fn get(
        &self,
        caller: &CallerContext,
        id: AttendanceId,
    ) -> Result<Attendance, RecordsServiceError> {
        let visibility = self.visibility();
        let scope = visibility.scope(caller).await?;
        let attendance = self
            .attendances
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::AttendanceNotFound)?;
        visibility
            .ensure_pair(&scope, attendance.student_id, attendance.course_id)
            .await?;
        Ok(attendance)
    }

    // ── Create ───────────────────────────────────────────────────────────────

    /// Attendance may be marked without an enrollment in the course.
    pub async fn create(
        &self,
        caller: &CallerContext,
        fields: AttendanceFields,
    ) -> Result<Attendance, RecordsServiceError> {
        let scope = self.visibility().scope(caller).await?;
        self.writable_course(&scope, &fields).await?;
        let attendance = Attendance {
            id: AttendanceId::new(),
            date: fields.date,
            is_present: fields.is_present,
            student_id: fields.student_id,
            course_id: fields.course_id,
            version: 1,
        };
        self.attendances.create(&attendance).await?;
        tracing::info!(attendance_id = %attendance.id, "attendance recorded");
        Ok(attendance)
    }

    // ── Update ───────────────────────────────────────────────────────────────

    /// The caller must teach both the current and the new course.
    pub async fn update(
        &self,
        caller: &CallerContext,
        id: AttendanceId,
        expected_version: i32,
        fields: AttendanceFields,
    ) -> Result<Attendance, RecordsServiceError> {
        let scope = self.visibility().scope(caller).await?;
        let current = self
            .attendances
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::AttendanceNotFound)?;
        if !scope.is_admin() {
            let course = self
                .courses
                .find_by_id(current.course_id)
                .await?
                .ok_or(RecordsServiceError::Forbidden)?;
            scope.ensure_teaches(&course)?;
        }
        self.writable_course(&scope, &fields).await?;
        let updated = self
            .attendances
            .update(&Attendance {
                id,
                date: fields.date,
                is_present: fields.is_present,
                student_id: fields.student_id,
                course_id: fields.course_id,
                version: expected_version,
            })
            .await?;
        tracing::info!(attendance_id = %id, version = updated.version, "attendance updated");
        Ok(updated)
    }

    // ── Delete ───────────────────────────────────────────────────────────────

    pub async fn delete(
        &self,
        caller: &CallerContext,
        id: AttendanceId,
    ) -> Result<(), RecordsServiceError> {
        let scope = self.visibility().scope(caller).await?;
        let current = self
            .attendances
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::AttendanceNotFound)?;
        if !scope.is_admin() {
            let course = self
                .courses
                .find_by_id(current.course_id)
                .await?
                .ok_or(RecordsServiceError::Forbidden)?;
            scope.ensure_teaches(&course)?;
        }
        if !self.attendances.delete(id).await? {
            return Err(RecordsServiceError::AttendanceNotFound);
        }
        tracing::info!(attendance_id = %id, "attendance deleted");
        Ok(())
    }
}
