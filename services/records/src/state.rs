use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAttendanceRepository, DbCourseRepository, DbEnrollmentRepository, DbStudentRepository,
    DbTeacherRepository,
};
use crate::infra::identity::DbIdentityProvider;
use crate::infra::mailer::SmtpNotifier;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: SmtpNotifier,
}

impl AppState {
    pub fn student_repo(&self) -> DbStudentRepository {
        DbStudentRepository {
            db: self.db.clone(),
        }
    }

    pub fn teacher_repo(&self) -> DbTeacherRepository {
        DbTeacherRepository {
            db: self.db.clone(),
        }
    }

    pub fn course_repo(&self) -> DbCourseRepository {
        DbCourseRepository {
            db: self.db.clone(),
        }
    }

    pub fn enrollment_repo(&self) -> DbEnrollmentRepository {
        DbEnrollmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn attendance_repo(&self) -> DbAttendanceRepository {
        DbAttendanceRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity_provider(&self) -> DbIdentityProvider {
        DbIdentityProvider {
            db: self.db.clone(),
        }
    }
}
