use chrono::Utc;
use validator::Validate;

use registrar_domain::caller::CallerContext;
use registrar_domain::id::CourseId;

use crate::domain::repository::{
    AttendanceRepository, CourseRepository, EnrollmentRepository, StudentRepository,
    TeacherRepository,
};
use crate::domain::types::{Course, CourseFields, Enrollment};
use crate::error::RecordsServiceError;
use crate::usecase::visibility::{Scope, Visibility};

/// A `teacher_id` must name an existing teacher.
async fn check_teacher_ref<T: TeacherRepository>(
    teachers: &T,
    fields: &CourseFields,
) -> Result<(), RecordsServiceError> {
    let Some(teacher_id) = fields.teacher_id else {
        return Ok(());
    };
    if teachers.find_by_id(teacher_id).await?.is_none() {
        return Err(RecordsServiceError::InvalidReference {
            field: "teacher_id",
        });
    }
    Ok(())
}

// ── CreateCourse ─────────────────────────────────────────────────────────────

pub struct CreateCourseUseCase<T, C> {
    pub teachers: T,
    pub courses: C,
}

impl<T, C> CreateCourseUseCase<T, C>
where
    T: TeacherRepository,
    C: CourseRepository,
{
    pub async fn execute(
        &self,
        caller: &CallerContext,
        fields: CourseFields,
    ) -> Result<Course, RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        let fields = fields.trimmed();
        fields.validate()?;
        check_teacher_ref(&self.teachers, &fields).await?;
        let course = Course {
            id: CourseId::new(),
            course_code: fields.course_code,
            title: fields.title,
            credits: fields.credits,
            description: fields.description,
            teacher_id: fields.teacher_id,
            version: 1,
            created_at: Utc::now(),
        };
        self.courses.create(&course).await?;
        tracing::info!(course_id = %course.id, course_code = %course.course_code, "course created");
        Ok(course)
    }
}

// ── GetCourse ────────────────────────────────────────────────────────────────

/// A course with the enrollments the caller may see.
#[derive(Debug, Clone)]
pub struct CourseDetails {
    pub course: Course,
    pub enrollments: Vec<Enrollment>,
}

pub struct GetCourseUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> GetCourseUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Students see the course only with their own enrollment in it.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: CourseId,
    ) -> Result<CourseDetails, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        let course = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::CourseNotFound)?;
        visibility.ensure_course(&scope, &course).await?;
        let mut enrollments = self.enrollments.list_by_courses(&[id]).await?;
        if let Scope::Student(student) = &scope {
            enrollments.retain(|e| e.student_id == student.id);
        }
        Ok(CourseDetails {
            course,
            enrollments,
        })
    }
}

// ── UpdateCourse ─────────────────────────────────────────────────────────────

pub struct UpdateCourseUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> UpdateCourseUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Admin, or the teacher who owns the course. Only Admin may reassign it.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: CourseId,
        expected_version: i32,
        fields: CourseFields,
    ) -> Result<Course, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        let current = self
            .courses
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::CourseNotFound)?;
        scope.ensure_teaches(&current)?;
        if !scope.is_admin() && fields.teacher_id != current.teacher_id {
            return Err(RecordsServiceError::Forbidden);
        }
        let fields = fields.trimmed();
        fields.validate()?;
        check_teacher_ref(&self.teachers, &fields).await?;

        let updated = self
            .courses
            .update(&Course {
                course_code: fields.course_code,
                title: fields.title,
                credits: fields.credits,
                description: fields.description,
                teacher_id: fields.teacher_id,
                version: expected_version,
                ..current
            })
            .await?;
        tracing::info!(course_id = %id, version = updated.version, "course updated");
        Ok(updated)
    }
}

// ── DeleteCourse ─────────────────────────────────────────────────────────────

pub struct DeleteCourseUseCase<C, E, A> {
    pub courses: C,
    pub enrollments: E,
    pub attendances: A,
}

impl<C, E, A> DeleteCourseUseCase<C, E, A>
where
    C: CourseRepository,
    E: EnrollmentRepository,
    A: AttendanceRepository,
{
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: CourseId,
    ) -> Result<(), RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        if self.courses.find_by_id(id).await?.is_none() {
            return Err(RecordsServiceError::CourseNotFound);
        }
        if !self.enrollments.list_by_courses(&[id]).await?.is_empty()
            || !self.attendances.list_by_courses(&[id]).await?.is_empty()
        {
            return Err(RecordsServiceError::DependentRecordsExist);
        }
        if !self.courses.delete(id).await? {
            return Err(RecordsServiceError::CourseNotFound);
        }
        tracing::info!(course_id = %id, "course deleted");
        Ok(())
    }
}
