use std::collections::HashMap;

use registrar_domain::caller::CallerContext;
use registrar_domain::id::{CourseId, StudentId};

use crate::domain::repository::{
    CourseRepository, EnrollmentRepository, StudentRepository, TeacherRepository,
};
use crate::domain::types::{Transcript, TranscriptEntry, average_marks};
use crate::error::RecordsServiceError;
use crate::usecase::visibility::{Scope, Visibility};

pub struct TranscriptUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> TranscriptUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Without an explicit id the transcript is the calling student's own.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        student_id: Option<StudentId>,
    ) -> Result<Transcript, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        let student = match (student_id, &scope) {
            (None, Scope::Student(own)) => own.clone(),
            (None, _) => {
                return Err(RecordsServiceError::invalid_field(
                    "student_id",
                    "is required",
                ));
            }
            (Some(id), _) => {
                let student = self
                    .students
                    .find_by_id(id)
                    .await?
                    .ok_or(RecordsServiceError::StudentNotFound)?;
                visibility.ensure_student(&scope, id).await?;
                student
            }
        };

        let enrollments = self.enrollments.list_by_student(student.id).await?;
        let course_ids: Vec<CourseId> = enrollments.iter().map(|e| e.course_id).collect();
        let courses: HashMap<CourseId, _> = if course_ids.is_empty() {
            HashMap::new()
        } else {
            self.courses
                .list_by_ids(&course_ids)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        };

        let average_marks = average_marks(&enrollments);
        let entries = enrollments
            .into_iter()
            .map(|e| {
                let course = courses.get(&e.course_id);
                TranscriptEntry {
                    enrollment_id: e.id,
                    course_code: course.map(|c| c.course_code.clone()).unwrap_or_default(),
                    course_title: course.map(|c| c.title.clone()).unwrap_or_default(),
                    credits: course.map(|c| c.credits).unwrap_or_default(),
                    enrollment_date: e.enrollment_date,
                    marks: e.marks,
                    grade: e.grade,
                }
            })
            .collect();
        Ok(Transcript {
            student,
            entries,
            average_marks,
        })
    }
}
