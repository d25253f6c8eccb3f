use chrono::{NaiveDate, Utc};

use registrar_domain::caller::CallerContext;
use registrar_domain::grade::{compute_grade, marks_in_range};
use registrar_domain::id::{CourseId, EnrollmentId, StudentId};

use crate::domain::notify::Notifier;
use crate::domain::repository::{
    CourseRepository, EnrollmentRepository, IdentityProvider, StudentRepository,
    TeacherRepository,
};
use crate::domain::types::{Course, Enrollment, Student};
use crate::error::RecordsServiceError;
use crate::usecase::dispatch::{send_enrollment_confirmation, spawn_best_effort};
use crate::usecase::visibility::{Scope, Visibility};

// ── CreateEnrollment ─────────────────────────────────────────────────────────

pub struct CreateEnrollmentInput {
    pub student_id: StudentId,
    pub course_id: CourseId,
    /// Defaults to today (UTC).
    pub enrollment_date: Option<NaiveDate>,
}

pub struct CreateEnrollmentUseCase<I, S, T, C, E, N> {
    pub identities: I,
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
    pub notifier: N,
}

impl<I, S, T, C, E, N> CreateEnrollmentUseCase<I, S, T, C, E, N>
where
    I: IdentityProvider + Clone + 'static,
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
    N: Notifier + Clone + 'static,
{
    /// Admin, or the teacher of the course. The confirmation email is sent from a
    /// detached task after the row is stored and cannot fail this call.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        input: CreateEnrollmentInput,
    ) -> Result<Enrollment, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        if matches!(scope, Scope::Student(_)) {
            return Err(RecordsServiceError::Forbidden);
        }

        let course = self
            .courses
            .find_by_id(input.course_id)
            .await?
            .ok_or(RecordsServiceError::InvalidReference { field: "course_id" })?;
        let student = self
            .students
            .find_by_id(input.student_id)
            .await?
            .ok_or(RecordsServiceError::InvalidReference {
                field: "student_id",
            })?;
        scope.ensure_teaches(&course)?;

        if self
            .enrollments
            .find_by_pair(student.id, course.id)
            .await?
            .is_some()
        {
            return Err(RecordsServiceError::invalid_field(
                "course_id",
                "student is already enrolled in this course",
            ));
        }

        let enrollment = Enrollment {
            id: EnrollmentId::new(),
            student_id: student.id,
            course_id: course.id,
            enrollment_date: input
                .enrollment_date
                .unwrap_or_else(|| Utc::now().date_naive()),
            marks: None,
            grade: None,
            version: 1,
            created_at: Utc::now(),
        };
        self.enrollments.create(&enrollment).await?;
        tracing::info!(
            enrollment_id = %enrollment.id,
            student_id = %student.id,
            course_id = %course.id,
            "enrollment created"
        );

        self.confirm(student, course, enrollment.clone());
        Ok(enrollment)
    }

    fn confirm(&self, student: Student, course: Course, enrollment: Enrollment) {
        let identities = self.identities.clone();
        let notifier = self.notifier.clone();
        spawn_best_effort("enrollment_confirmation", async move {
            send_enrollment_confirmation(&identities, &notifier, &student, &course, &enrollment)
                .await
        });
    }
}

// ── UpdateMarks ──────────────────────────────────────────────────────────────

pub struct UpdateMarksUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> UpdateMarksUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Set or clear an enrollment's marks; the grade is always derived from them.
    ///
    /// Writing the marks the row already holds is a no-op that returns the row
    /// unchanged, whatever `expected_version` says.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: EnrollmentId,
        expected_version: i32,
        marks: Option<i32>,
    ) -> Result<Enrollment, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        if matches!(scope, Scope::Student(_)) {
            return Err(RecordsServiceError::Forbidden);
        }
        let current = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::EnrollmentNotFound)?;
        if !scope.is_admin() {
            let course = self
                .courses
                .find_by_id(current.course_id)
                .await?
                .ok_or(RecordsServiceError::Forbidden)?;
            scope.ensure_teaches(&course)?;
        }
        if !marks_in_range(marks) {
            return Err(RecordsServiceError::invalid_field(
                "marks",
                "must be between 0 and 100",
            ));
        }

        let grade = compute_grade(marks);
        if current.marks == marks && current.grade == grade {
            return Ok(current);
        }
        let updated = self
            .enrollments
            .update_marks(id, expected_version, marks, grade)
            .await?;
        tracing::info!(
            enrollment_id = %id,
            marks = ?updated.marks,
            grade = ?updated.grade,
            version = updated.version,
            "marks updated"
        );
        Ok(updated)
    }
}

// ── GetEnrollment ────────────────────────────────────────────────────────────

pub struct GetEnrollmentUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> GetEnrollmentUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: EnrollmentId,
    ) -> Result<Enrollment, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        let enrollment = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::EnrollmentNotFound)?;
        visibility
            .ensure_pair(&scope, enrollment.student_id, enrollment.course_id)
            .await?;
        Ok(enrollment)
    }
}

// ── DeleteEnrollment ─────────────────────────────────────────────────────────

pub struct DeleteEnrollmentUseCase<E> {
    pub enrollments: E,
}

impl<E: EnrollmentRepository> DeleteEnrollmentUseCase<E> {
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: EnrollmentId,
    ) -> Result<(), RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        if !self.enrollments.delete(id).await? {
            return Err(RecordsServiceError::EnrollmentNotFound);
        }
        tracing::info!(enrollment_id = %id, "enrollment deleted");
        Ok(())
    }
}
