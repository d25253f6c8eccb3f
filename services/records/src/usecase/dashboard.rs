use registrar_domain::caller::CallerContext;

use crate::domain::repository::{
    CourseRepository, EnrollmentRepository, StudentRepository, TeacherRepository,
};
use crate::domain::types::{
    AdminDashboard, Dashboard, Student, StudentDashboard, TeacherDashboard, average_marks,
};
use crate::error::RecordsServiceError;
use crate::usecase::visibility::{Scope, Visibility};

const RECENT_LIMIT: u64 = 5;

pub struct DashboardUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> DashboardUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    fn visibility(&self) -> Visibility<'_, S, T, C, E> {
        Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        }
    }

    /// The dashboard for the caller's effective role.
    pub async fn execute(&self, caller: &CallerContext) -> Result<Dashboard, RecordsServiceError> {
        match self.visibility().scope(caller).await? {
            Scope::Admin => self.admin().await.map(Dashboard::Admin),
            Scope::Teacher(teacher) => {
                let courses = self.courses.list_by_teacher(teacher.id).await?;
                let student_count = self
                    .visibility()
                    .taught_student_ids(teacher.id)
                    .await?
                    .len();
                Ok(Dashboard::Teacher(TeacherDashboard {
                    teacher,
                    course_count: courses.len(),
                    student_count,
                    courses,
                }))
            }
            Scope::Student(student) => self.student_view(student).await.map(Dashboard::Student),
        }
    }

    /// Student-only dashboard; other roles are `Forbidden`.
    pub async fn own(&self, caller: &CallerContext) -> Result<StudentDashboard, RecordsServiceError> {
        match self.visibility().scope(caller).await? {
            Scope::Student(student) => self.student_view(student).await,
            _ => Err(RecordsServiceError::Forbidden),
        }
    }

    async fn admin(&self) -> Result<AdminDashboard, RecordsServiceError> {
        let enrollments = self.enrollments.list_all().await?;
        let graded: Vec<i64> = enrollments
            .iter()
            .filter_map(|e| e.marks)
            .map(i64::from)
            .collect();
        let average_marks = if graded.is_empty() {
            None
        } else {
            Some(graded.iter().sum::<i64>() as f64 / graded.len() as f64)
        };
        Ok(AdminDashboard {
            total_students: self.students.count().await?,
            total_courses: self.courses.count().await?,
            total_enrollments: self.enrollments.count().await?,
            average_marks,
            recent_students: self.students.list_recent(RECENT_LIMIT).await?,
            recent_enrollments: self.enrollments.list_recent(RECENT_LIMIT).await?,
        })
    }

    async fn student_view(&self, student: Student) -> Result<StudentDashboard, RecordsServiceError> {
        let enrollments = self.enrollments.list_by_student(student.id).await?;
        Ok(StudentDashboard {
            average_marks: average_marks(&enrollments),
            student,
            enrollments,
        })
    }
}
