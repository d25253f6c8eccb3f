use std::collections::BTreeSet;

use registrar_domain::caller::CallerContext;
use registrar_domain::id::{CourseId, StudentId, TeacherId};
use registrar_domain::pagination::PageRequest;
use registrar_domain::role::Role;

use crate::domain::repository::{
    CourseFilter, CourseRepository, EnrollmentRepository, RecordFilter, StudentFilter,
    StudentRepository, TeacherRepository,
};
use crate::domain::types::{Course, Enrollment, Student, Teacher};
use crate::error::RecordsServiceError;

/// What a caller may see, resolved from their effective role and linked profile.
#[derive(Debug, Clone)]
pub enum Scope {
    Admin,
    Teacher(Teacher),
    Student(Student),
}

impl Scope {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether a course is taught by the scoped teacher (always for Admin).
    pub fn teaches(&self, course: &Course) -> bool {
        match self {
            Self::Admin => true,
            Self::Teacher(teacher) => course.teacher_id == Some(teacher.id),
            Self::Student(_) => false,
        }
    }

    /// Student-scope ownership check; other scopes are decided by the caller.
    pub fn owns_student(&self, student_id: StudentId) -> bool {
        matches!(self, Self::Student(student) if student.id == student_id)
    }

    /// Admin and teachers may write to a course's records only if they teach it.
    pub fn ensure_teaches(&self, course: &Course) -> Result<(), RecordsServiceError> {
        if self.teaches(course) {
            Ok(())
        } else {
            Err(RecordsServiceError::Forbidden)
        }
    }

    pub fn ensure_admin(&self) -> Result<(), RecordsServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(RecordsServiceError::Forbidden)
        }
    }
}

/// Role-scoped queries over the record store.
///
/// Borrowed from a use case's own repositories; never stores caller state.
pub struct Visibility<'a, S, T, C, E> {
    pub students: &'a S,
    pub teachers: &'a T,
    pub courses: &'a C,
    pub enrollments: &'a E,
}

impl<S, T, C, E> Visibility<'_, S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Role-less callers are `Forbidden`; a role without a linked profile is
    /// `ProfileNotFound`.
    pub async fn scope(&self, caller: &CallerContext) -> Result<Scope, RecordsServiceError> {
        match caller.effective_role() {
            None => Err(RecordsServiceError::Forbidden),
            Some(Role::Admin) => Ok(Scope::Admin),
            Some(Role::Teacher) => self
                .teachers
                .find_by_identity(caller.identity_id)
                .await?
                .map(Scope::Teacher)
                .ok_or(RecordsServiceError::ProfileNotFound),
            Some(Role::Student) => self
                .students
                .find_by_identity(caller.identity_id)
                .await?
                .map(Scope::Student)
                .ok_or(RecordsServiceError::ProfileNotFound),
        }
    }

    pub async fn taught_course_ids(
        &self,
        teacher_id: TeacherId,
    ) -> Result<Vec<CourseId>, RecordsServiceError> {
        let courses = self.courses.list_by_teacher(teacher_id).await?;
        Ok(courses.into_iter().map(|c| c.id).collect())
    }

    /// Distinct students enrolled in at least one course the teacher teaches.
    pub async fn taught_student_ids(
        &self,
        teacher_id: TeacherId,
    ) -> Result<BTreeSet<StudentId>, RecordsServiceError> {
        let course_ids = self.taught_course_ids(teacher_id).await?;
        if course_ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let enrollments = self.enrollments.list_by_courses(&course_ids).await?;
        Ok(enrollments.into_iter().map(|e| e.student_id).collect())
    }

    pub async fn students(
        &self,
        scope: &Scope,
        page: PageRequest,
    ) -> Result<Vec<Student>, RecordsServiceError> {
        match scope {
            Scope::Admin => self.students.list(StudentFilter::All, page).await,
            Scope::Teacher(teacher) => {
                let ids: Vec<StudentId> =
                    self.taught_student_ids(teacher.id).await?.into_iter().collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.students.list(StudentFilter::Ids(&ids), page).await
            }
            Scope::Student(student) => {
                self.students
                    .list(StudentFilter::Ids(&[student.id]), page)
                    .await
            }
        }
    }

    pub async fn courses(
        &self,
        scope: &Scope,
        page: PageRequest,
    ) -> Result<Vec<Course>, RecordsServiceError> {
        match scope {
            Scope::Admin => self.courses.list(CourseFilter::All, page).await,
            Scope::Teacher(teacher) => {
                self.courses
                    .list(CourseFilter::Teacher(teacher.id), page)
                    .await
            }
            Scope::Student(student) => {
                let ids: BTreeSet<CourseId> = self
                    .enrollments
                    .list_by_student(student.id)
                    .await?
                    .into_iter()
                    .map(|e| e.course_id)
                    .collect();
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                let ids: Vec<CourseId> = ids.into_iter().collect();
                self.courses.list(CourseFilter::Ids(&ids), page).await
            }
        }
    }

    pub async fn enrollments(
        &self,
        scope: &Scope,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, RecordsServiceError> {
        match scope {
            Scope::Admin => self.enrollments.list(RecordFilter::All, page).await,
            Scope::Teacher(teacher) => {
                let course_ids = self.taught_course_ids(teacher.id).await?;
                if course_ids.is_empty() {
                    return Ok(Vec::new());
                }
                self.enrollments
                    .list(RecordFilter::Courses(&course_ids), page)
                    .await
            }
            Scope::Student(student) => {
                self.enrollments
                    .list(RecordFilter::Student(student.id), page)
                    .await
            }
        }
    }

    /// `Forbidden` unless the student is within the caller's scope.
    pub async fn ensure_student(
        &self,
        scope: &Scope,
        student_id: StudentId,
    ) -> Result<(), RecordsServiceError> {
        let visible = match scope {
            Scope::Admin => true,
            Scope::Student(_) => scope.owns_student(student_id),
            Scope::Teacher(teacher) => self
                .taught_student_ids(teacher.id)
                .await?
                .contains(&student_id),
        };
        if visible {
            Ok(())
        } else {
            Err(RecordsServiceError::Forbidden)
        }
    }

    pub async fn ensure_course(
        &self,
        scope: &Scope,
        course: &Course,
    ) -> Result<(), RecordsServiceError> {
        let visible = match scope {
            Scope::Admin | Scope::Teacher(_) => scope.teaches(course),
            Scope::Student(student) => self
                .enrollments
                .find_by_pair(student.id, course.id)
                .await?
                .is_some(),
        };
        if visible {
            Ok(())
        } else {
            Err(RecordsServiceError::Forbidden)
        }
    }

    /// Checks a row that belongs to a (student, course) pair: enrollments and attendance.
    pub async fn ensure_pair(
        &self,
        scope: &Scope,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<(), RecordsServiceError> {
        let visible = match scope {
            Scope::Admin => true,
            Scope::Student(_) => scope.owns_student(student_id),
            Scope::Teacher(_) => match self.courses.find_by_id(course_id).await? {
                Some(course) => scope.teaches(&course),
                None => false,
            },
        };
        if visible {
            Ok(())
        } else {
            Err(RecordsServiceError::Forbidden)
        }
    }
}

// ── ListStudents ─────────────────────────────────────────────────────────────

pub struct ListStudentsUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> ListStudentsUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        caller: &CallerContext,
        page: PageRequest,
    ) -> Result<Vec<Student>, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        visibility.students(&scope, page).await
    }
}

// ── ListCourses ──────────────────────────────────────────────────────────────

pub struct ListCoursesUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> ListCoursesUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        caller: &CallerContext,
        page: PageRequest,
    ) -> Result<Vec<Course>, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        visibility.courses(&scope, page).await
    }
}

// ── ListEnrollments ──────────────────────────────────────────────────────────

pub struct ListEnrollmentsUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> ListEnrollmentsUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    pub async fn execute(
        &self,
        caller: &CallerContext,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        visibility.enrollments(&scope, page).await
    }
}
