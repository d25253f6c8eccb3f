use axum::{Json, extract::State};
use serde::Serialize;

use registrar_auth_types::identity::CallerHeaders;

use crate::domain::types::{Dashboard, StudentDashboard};
use crate::error::RecordsServiceError;
use crate::handlers::courses::CourseResponse;
use crate::handlers::enrollments::EnrollmentResponse;
use crate::handlers::students::StudentResponse;
use crate::handlers::teachers::TeacherResponse;
use crate::infra::db::{
    DbCourseRepository, DbEnrollmentRepository, DbStudentRepository, DbTeacherRepository,
};
use crate::state::AppState;
use crate::usecase::dashboard::DashboardUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StudentDashboardResponse {
    pub student: StudentResponse,
    pub enrollments: Vec<EnrollmentResponse>,
    pub average_marks: f64,
}

impl From<StudentDashboard> for StudentDashboardResponse {
    fn from(dashboard: StudentDashboard) -> Self {
        Self {
            student: dashboard.student.into(),
            enrollments: dashboard.enrollments.into_iter().map(Into::into).collect(),
            average_marks: dashboard.average_marks,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardResponse {
    Admin {
        total_students: u64,
        total_courses: u64,
        total_enrollments: u64,
        average_marks: Option<f64>,
        recent_students: Vec<StudentResponse>,
        recent_enrollments: Vec<EnrollmentResponse>,
    },
    Teacher {
        teacher: TeacherResponse,
        course_count: usize,
        student_count: usize,
        courses: Vec<CourseResponse>,
    },
    Student(StudentDashboardResponse),
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        match dashboard {
            Dashboard::Admin(d) => DashboardResponse::Admin {
                total_students: d.total_students,
                total_courses: d.total_courses,
                total_enrollments: d.total_enrollments,
                average_marks: d.average_marks,
                recent_students: d.recent_students.into_iter().map(Into::into).collect(),
                recent_enrollments: d.recent_enrollments.into_iter().map(Into::into).collect(),
            },
            Dashboard::Teacher(d) => DashboardResponse::Teacher {
                teacher: d.teacher.into(),
                course_count: d.course_count,
                student_count: d.student_count,
                courses: d.courses.into_iter().map(Into::into).collect(),
            },
            Dashboard::Student(d) => DashboardResponse::Student(d.into()),
        }
    }
}

fn usecase(
    state: &AppState,
) -> DashboardUseCase<
    DbStudentRepository,
    DbTeacherRepository,
    DbCourseRepository,
    DbEnrollmentRepository,
> {
    DashboardUseCase {
        students: state.student_repo(),
        teachers: state.teacher_repo(),
        courses: state.course_repo(),
        enrollments: state.enrollment_repo(),
    }
}

// ── GET /dashboard ───────────────────────────────────────────────────────────

pub async fn get_dashboard(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, RecordsServiceError> {
    let dashboard = usecase(&state).execute(&caller).await?;
    Ok(Json(dashboard.into()))
}

// ── GET /dashboard/@me ───────────────────────────────────────────────────────

pub async fn get_own_dashboard(
    CallerHeaders(caller): CallerHeaders,
    State(state): State<AppState>,
) -> Result<Json<StudentDashboardResponse>, RecordsServiceError> {
    let dashboard = usecase(&state).own(&caller).await?;
    Ok(Json(dashboard.into()))
}
