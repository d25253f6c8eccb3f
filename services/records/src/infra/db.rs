use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

use registrar_core::sea_ext::DbErrExt as _;
use registrar_domain::grade::Grade;
use registrar_domain::id::{
    AttendanceId, CourseId, EnrollmentId, IdentityId, StudentId, TeacherId,
};
use registrar_domain::pagination::PageRequest;
use registrar_records_schema::{attendances, courses, enrollments, students, teachers};

use crate::domain::repository::{
    AttendanceRepository, CourseFilter, CourseRepository, EnrollmentRepository, RecordFilter,
    StudentFilter, StudentRepository, TeacherRepository,
};
use crate::domain::types::{Attendance, Course, Enrollment, Student, Teacher};
use crate::error::RecordsServiceError;

/// Map a failed write: FK rejections on delete mean dependents exist.
fn delete_error(e: DbErr, what: &'static str) -> RecordsServiceError {
    if e.is_foreign_key_violation() {
        RecordsServiceError::DependentRecordsExist
    } else {
        anyhow::Error::new(e).context(what).into()
    }
}

/// Resolve a zero-row conditional update: a missing row or a stale version.
fn stale_or_missing(exists: bool, not_found: RecordsServiceError) -> RecordsServiceError {
    if exists {
        RecordsServiceError::ConcurrencyConflict
    } else {
        not_found
    }
}

fn uuids<T: Copy + Into<uuid::Uuid>>(ids: &[T]) -> Vec<uuid::Uuid> {
    ids.iter().map(|&id| id.into()).collect()
}

// ── Student repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbStudentRepository {
    pub db: DatabaseConnection,
}

impl StudentRepository for DbStudentRepository {
    async fn find_by_id(&self, id: StudentId) -> Result<Option<Student>, RecordsServiceError> {
        let model = students::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find student by id")?;
        Ok(model.map(student_from_model))
    }

    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Student>, RecordsServiceError> {
        let model = students::Entity::find()
            .filter(students::Column::IdentityId.eq(identity_id.0))
            .one(&self.db)
            .await
            .context("find student by identity")?;
        Ok(model.map(student_from_model))
    }

    async fn find_by_registration_id(
        &self,
        registration_id: &str,
    ) -> Result<Option<Student>, RecordsServiceError> {
        let model = students::Entity::find()
            .filter(students::Column::RegistrationId.eq(registration_id))
            .one(&self.db)
            .await
            .context("find student by registration id")?;
        Ok(model.map(student_from_model))
    }

    async fn list(
        &self,
        filter: StudentFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Student>, RecordsServiceError> {
        let mut query = students::Entity::find();
        if let StudentFilter::Ids(ids) = filter {
            query = query.filter(students::Column::Id.is_in(uuids(ids)));
        }
        let models = query
            .order_by_asc(students::Column::RegistrationId)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list students")?;
        Ok(models.into_iter().map(student_from_model).collect())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Student>, RecordsServiceError> {
        let models = students::Entity::find()
            .order_by_desc(students::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent students")?;
        Ok(models.into_iter().map(student_from_model).collect())
    }

    async fn count(&self) -> Result<u64, RecordsServiceError> {
        Ok(students::Entity::find()
            .count(&self.db)
            .await
            .context("count students")?)
    }

    async fn create(&self, student: &Student) -> Result<(), RecordsServiceError> {
        let result = students::ActiveModel {
            id: Set(student.id.0),
            registration_id: Set(student.registration_id.clone()),
            department: Set(student.department.clone()),
            date_of_birth: Set(student.date_of_birth),
            identity_id: Set(student.identity_id.map(|id| id.0)),
            version: Set(student.version),
            created_at: Set(student.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => Err(RecordsServiceError::invalid_field(
                "registration_id",
                "is already taken",
            )),
            Err(e) => Err(anyhow::Error::new(e).context("create student").into()),
        }
    }

    async fn update(&self, student: &Student) -> Result<Student, RecordsServiceError> {
        let result = students::Entity::update_many()
            .col_expr(
                students::Column::RegistrationId,
                Expr::value(student.registration_id.clone()),
            )
            .col_expr(
                students::Column::Department,
                Expr::value(student.department.clone()),
            )
            .col_expr(
                students::Column::DateOfBirth,
                Expr::value(student.date_of_birth),
            )
            .col_expr(
                students::Column::Version,
                Expr::col(students::Column::Version).add(1),
            )
            .filter(students::Column::Id.eq(student.id.0))
            .filter(students::Column::Version.eq(student.version))
            .exec(&self.db)
            .await;
        let result = match result {
            Ok(result) => result,
            Err(e) if e.is_unique_violation() => {
                return Err(RecordsServiceError::invalid_field(
                    "registration_id",
                    "is already taken",
                ));
            }
            Err(e) => return Err(anyhow::Error::new(e).context("update student").into()),
        };
        if result.rows_affected == 0 {
            let exists = self.find_by_id(student.id).await?.is_some();
            return Err(stale_or_missing(exists, RecordsServiceError::StudentNotFound));
        }
        Ok(Student {
            version: student.version + 1,
            ..student.clone()
        })
    }

    async fn delete(&self, id: StudentId) -> Result<bool, RecordsServiceError> {
        let result = students::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error(e, "delete student"))?;
        Ok(result.rows_affected > 0)
    }
}

fn student_from_model(model: students::Model) -> Student {
    Student {
        id: StudentId(model.id),
        registration_id: model.registration_id,
        department: model.department,
        date_of_birth: model.date_of_birth,
        identity_id: model.identity_id.map(IdentityId),
        version: model.version,
        created_at: model.created_at,
    }
}

// ── Teacher repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTeacherRepository {
    pub db: DatabaseConnection,
}

impl TeacherRepository for DbTeacherRepository {
    async fn find_by_id(&self, id: TeacherId) -> Result<Option<Teacher>, RecordsServiceError> {
        let model = teachers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find teacher by id")?;
        Ok(model.map(teacher_from_model))
    }

    async fn find_by_identity(
        &self,
        identity_id: IdentityId,
    ) -> Result<Option<Teacher>, RecordsServiceError> {
        let model = teachers::Entity::find()
            .filter(teachers::Column::IdentityId.eq(identity_id.0))
            .one(&self.db)
            .await
            .context("find teacher by identity")?;
        Ok(model.map(teacher_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Teacher>, RecordsServiceError> {
        let models = teachers::Entity::find()
            .order_by_asc(teachers::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list teachers")?;
        Ok(models.into_iter().map(teacher_from_model).collect())
    }

    async fn create(&self, teacher: &Teacher) -> Result<(), RecordsServiceError> {
        teachers::ActiveModel {
            id: Set(teacher.id.0),
            department: Set(teacher.department.clone()),
            identity_id: Set(teacher.identity_id.map(|id| id.0)),
            version: Set(teacher.version),
            created_at: Set(teacher.created_at),
        }
        .insert(&self.db)
        .await
        .context("create teacher")?;
        Ok(())
    }

    async fn update(&self, teacher: &Teacher) -> Result<Teacher, RecordsServiceError> {
        let result = teachers::Entity::update_many()
            .col_expr(
                teachers::Column::Department,
                Expr::value(teacher.department.clone()),
            )
            .col_expr(
                teachers::Column::Version,
                Expr::col(teachers::Column::Version).add(1),
            )
            .filter(teachers::Column::Id.eq(teacher.id.0))
            .filter(teachers::Column::Version.eq(teacher.version))
            .exec(&self.db)
            .await
            .context("update teacher")?;
        if result.rows_affected == 0 {
            let exists = self.find_by_id(teacher.id).await?.is_some();
            return Err(stale_or_missing(exists, RecordsServiceError::TeacherNotFound));
        }
        Ok(Teacher {
            version: teacher.version + 1,
            ..teacher.clone()
        })
    }

    async fn delete(&self, id: TeacherId) -> Result<bool, RecordsServiceError> {
        let result = teachers::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error(e, "delete teacher"))?;
        Ok(result.rows_affected > 0)
    }
}

fn teacher_from_model(model: teachers::Model) -> Teacher {
    Teacher {
        id: TeacherId(model.id),
        department: model.department,
        identity_id: model.identity_id.map(IdentityId),
        version: model.version,
        created_at: model.created_at,
    }
}

// ── Course repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCourseRepository {
    pub db: DatabaseConnection,
}

impl CourseRepository for DbCourseRepository {
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, RecordsServiceError> {
        let model = courses::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn list(
        &self,
        filter: CourseFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Course>, RecordsServiceError> {
        let query = match filter {
            CourseFilter::All => courses::Entity::find(),
            CourseFilter::Ids(ids) => {
                courses::Entity::find().filter(courses::Column::Id.is_in(uuids(ids)))
            }
            CourseFilter::Teacher(teacher_id) => {
                courses::Entity::find().filter(courses::Column::TeacherId.eq(teacher_id.0))
            }
        };
        let models = query
            .order_by_asc(courses::Column::CourseCode)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list courses")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn list_by_ids(&self, ids: &[CourseId]) -> Result<Vec<Course>, RecordsServiceError> {
        let models = courses::Entity::find()
            .filter(courses::Column::Id.is_in(uuids(ids)))
            .order_by_asc(courses::Column::CourseCode)
            .all(&self.db)
            .await
            .context("list courses by ids")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn list_by_teacher(
        &self,
        teacher_id: TeacherId,
    ) -> Result<Vec<Course>, RecordsServiceError> {
        let models = courses::Entity::find()
            .filter(courses::Column::TeacherId.eq(teacher_id.0))
            .order_by_asc(courses::Column::CourseCode)
            .all(&self.db)
            .await
            .context("list courses by teacher")?;
        Ok(models.into_iter().map(course_from_model).collect())
    }

    async fn count(&self) -> Result<u64, RecordsServiceError> {
        Ok(courses::Entity::find()
            .count(&self.db)
            .await
            .context("count courses")?)
    }

    async fn create(&self, course: &Course) -> Result<(), RecordsServiceError> {
        let result = courses::ActiveModel {
            id: Set(course.id.0),
            course_code: Set(course.course_code.clone()),
            title: Set(course.title.clone()),
            credits: Set(course.credits),
            description: Set(course.description.clone()),
            teacher_id: Set(course.teacher_id.map(|id| id.0)),
            version: Set(course.version),
            created_at: Set(course.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_foreign_key_violation() => Err(RecordsServiceError::InvalidReference {
                field: "teacher_id",
            }),
            Err(e) => Err(anyhow::Error::new(e).context("create course").into()),
        }
    }

    async fn update(&self, course: &Course) -> Result<Course, RecordsServiceError> {
        let result = courses::Entity::update_many()
            .col_expr(
                courses::Column::CourseCode,
                Expr::value(course.course_code.clone()),
            )
            .col_expr(courses::Column::Title, Expr::value(course.title.clone()))
            .col_expr(courses::Column::Credits, Expr::value(course.credits))
            .col_expr(
                courses::Column::Description,
                Expr::value(course.description.clone()),
            )
            .col_expr(
                courses::Column::TeacherId,
                Expr::value(course.teacher_id.map(|id| id.0)),
            )
            .col_expr(
                courses::Column::Version,
                Expr::col(courses::Column::Version).add(1),
            )
            .filter(courses::Column::Id.eq(course.id.0))
            .filter(courses::Column::Version.eq(course.version))
            .exec(&self.db)
            .await;
        let result = match result {
            Ok(result) => result,
            Err(e) if e.is_foreign_key_violation() => {
                return Err(RecordsServiceError::InvalidReference {
                    field: "teacher_id",
                });
            }
            Err(e) => return Err(anyhow::Error::new(e).context("update course").into()),
        };
        if result.rows_affected == 0 {
            let exists = self.find_by_id(course.id).await?.is_some();
            return Err(stale_or_missing(exists, RecordsServiceError::CourseNotFound));
        }
        Ok(Course {
            version: course.version + 1,
            ..course.clone()
        })
    }

    async fn delete(&self, id: CourseId) -> Result<bool, RecordsServiceError> {
        let result = courses::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error(e, "delete course"))?;
        Ok(result.rows_affected > 0)
    }
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: CourseId(model.id),
        course_code: model.course_code,
        title: model.title,
        credits: model.credits,
        description: model.description,
        teacher_id: model.teacher_id.map(TeacherId),
        version: model.version,
        created_at: model.created_at,
    }
}

// ── Enrollment repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEnrollmentRepository {
    pub db: DatabaseConnection,
}

impl EnrollmentRepository for DbEnrollmentRepository {
    async fn find_by_id(
        &self,
        id: EnrollmentId,
    ) -> Result<Option<Enrollment>, RecordsServiceError> {
        let model = enrollments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find enrollment by id")?;
        model.map(enrollment_from_model).transpose()
    }

    async fn find_by_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, RecordsServiceError> {
        let model = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id.0))
            .filter(enrollments::Column::CourseId.eq(course_id.0))
            .one(&self.db)
            .await
            .context("find enrollment by student and course")?;
        model.map(enrollment_from_model).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Enrollment>, RecordsServiceError> {
        let models = enrollments::Entity::find()
            .order_by_desc(enrollments::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list enrollments")?;
        models.into_iter().map(enrollment_from_model).collect()
    }

    async fn list(
        &self,
        filter: RecordFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Enrollment>, RecordsServiceError> {
        let query = match filter {
            RecordFilter::All => enrollments::Entity::find(),
            RecordFilter::Student(student_id) => enrollments::Entity::find()
                .filter(enrollments::Column::StudentId.eq(student_id.0)),
            RecordFilter::Courses(course_ids) => enrollments::Entity::find()
                .filter(enrollments::Column::CourseId.is_in(uuids(course_ids))),
        };
        let models = query
            .order_by_desc(enrollments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list enrollments page")?;
        models.into_iter().map(enrollment_from_model).collect()
    }

    async fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Enrollment>, RecordsServiceError> {
        let models = enrollments::Entity::find()
            .filter(enrollments::Column::StudentId.eq(student_id.0))
            .order_by_asc(enrollments::Column::EnrollmentDate)
            .all(&self.db)
            .await
            .context("list enrollments by student")?;
        models.into_iter().map(enrollment_from_model).collect()
    }

    async fn list_by_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Enrollment>, RecordsServiceError> {
        let models = enrollments::Entity::find()
            .filter(enrollments::Column::CourseId.is_in(uuids(course_ids)))
            .order_by_desc(enrollments::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list enrollments by courses")?;
        models.into_iter().map(enrollment_from_model).collect()
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Enrollment>, RecordsServiceError> {
        let models = enrollments::Entity::find()
            .order_by_desc(enrollments::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list recent enrollments")?;
        models.into_iter().map(enrollment_from_model).collect()
    }

    async fn count(&self) -> Result<u64, RecordsServiceError> {
        Ok(enrollments::Entity::find()
            .count(&self.db)
            .await
            .context("count enrollments")?)
    }

    async fn create(&self, enrollment: &Enrollment) -> Result<(), RecordsServiceError> {
        let result = enrollments::ActiveModel {
            id: Set(enrollment.id.0),
            student_id: Set(enrollment.student_id.0),
            course_id: Set(enrollment.course_id.0),
            enrollment_date: Set(enrollment.enrollment_date),
            marks: Set(enrollment.marks),
            grade: Set(enrollment.grade.map(|g| g.as_str().to_owned())),
            version: Set(enrollment.version),
            created_at: Set(enrollment.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if e.is_unique_violation() => Err(RecordsServiceError::invalid_field(
                "course_id",
                "student is already enrolled in this course",
            )),
            Err(e) if e.is_foreign_key_violation() => Err(RecordsServiceError::InvalidReference {
                field: "course_id",
            }),
            Err(e) => Err(anyhow::Error::new(e).context("create enrollment").into()),
        }
    }

    async fn update_marks(
        &self,
        id: EnrollmentId,
        expected_version: i32,
        marks: Option<i32>,
        grade: Option<Grade>,
    ) -> Result<Enrollment, RecordsServiceError> {
        let result = enrollments::Entity::update_many()
            .col_expr(enrollments::Column::Marks, Expr::value(marks))
            .col_expr(
                enrollments::Column::Grade,
                Expr::value(grade.map(|g| g.as_str().to_owned())),
            )
            .col_expr(
                enrollments::Column::Version,
                Expr::col(enrollments::Column::Version).add(1),
            )
            .filter(enrollments::Column::Id.eq(id.0))
            .filter(enrollments::Column::Version.eq(expected_version))
            .exec(&self.db)
            .await
            .context("update enrollment marks")?;
        let current = self.find_by_id(id).await?;
        if result.rows_affected == 0 {
            return Err(stale_or_missing(
                current.is_some(),
                RecordsServiceError::EnrollmentNotFound,
            ));
        }
        current.ok_or(RecordsServiceError::EnrollmentNotFound)
    }

    async fn delete(&self, id: EnrollmentId) -> Result<bool, RecordsServiceError> {
        let result = enrollments::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error(e, "delete enrollment"))?;
        Ok(result.rows_affected > 0)
    }
}

fn enrollment_from_model(model: enrollments::Model) -> Result<Enrollment, RecordsServiceError> {
    let grade = model
        .grade
        .as_deref()
        .map(str::parse::<Grade>)
        .transpose()
        .context("stored enrollment grade")?;
    Ok(Enrollment {
        id: EnrollmentId(model.id),
        student_id: StudentId(model.student_id),
        course_id: CourseId(model.course_id),
        enrollment_date: model.enrollment_date,
        marks: model.marks,
        grade,
        version: model.version,
        created_at: model.created_at,
    })
}

// ── Attendance repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn find_by_id(
        &self,
        id: AttendanceId,
    ) -> Result<Option<Attendance>, RecordsServiceError> {
        let model = attendances::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find attendance by id")?;
        Ok(model.map(attendance_from_model))
    }

    async fn list(
        &self,
        filter: RecordFilter<'_>,
        page: PageRequest,
    ) -> Result<Vec<Attendance>, RecordsServiceError> {
        let query = match filter {
            RecordFilter::All => attendances::Entity::find(),
            RecordFilter::Student(student_id) => attendances::Entity::find()
                .filter(attendances::Column::StudentId.eq(student_id.0)),
            RecordFilter::Courses(course_ids) => attendances::Entity::find()
                .filter(attendances::Column::CourseId.is_in(uuids(course_ids))),
        };
        let models = query
            .order_by_desc(attendances::Column::Date)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list attendances")?;
        Ok(models.into_iter().map(attendance_from_model).collect())
    }

    async fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Attendance>, RecordsServiceError> {
        let models = attendances::Entity::find()
            .filter(attendances::Column::StudentId.eq(student_id.0))
            .order_by_desc(attendances::Column::Date)
            .all(&self.db)
            .await
            .context("list attendances by student")?;
        Ok(models.into_iter().map(attendance_from_model).collect())
    }

    async fn list_by_courses(
        &self,
        course_ids: &[CourseId],
    ) -> Result<Vec<Attendance>, RecordsServiceError> {
        let models = attendances::Entity::find()
            .filter(attendances::Column::CourseId.is_in(uuids(course_ids)))
            .order_by_desc(attendances::Column::Date)
            .all(&self.db)
            .await
            .context("list attendances by courses")?;
        Ok(models.into_iter().map(attendance_from_model).collect())
    }

    async fn create(&self, attendance: &Attendance) -> Result<(), RecordsServiceError> {
        attendances::ActiveModel {
            id: Set(attendance.id.0),
            date: Set(attendance.date),
            is_present: Set(attendance.is_present),
            student_id: Set(attendance.student_id.0),
            course_id: Set(attendance.course_id.0),
            version: Set(attendance.version),
        }
        .insert(&self.db)
        .await
        .context("create attendance")?;
        Ok(())
    }

    async fn update(&self, attendance: &Attendance) -> Result<Attendance, RecordsServiceError> {
        let result = attendances::Entity::update_many()
            .col_expr(attendances::Column::Date, Expr::value(attendance.date))
            .col_expr(
                attendances::Column::IsPresent,
                Expr::value(attendance.is_present),
            )
            .col_expr(
                attendances::Column::StudentId,
                Expr::value(attendance.student_id.0),
            )
            .col_expr(
                attendances::Column::CourseId,
                Expr::value(attendance.course_id.0),
            )
            .col_expr(
                attendances::Column::Version,
                Expr::col(attendances::Column::Version).add(1),
            )
            .filter(attendances::Column::Id.eq(attendance.id.0))
            .filter(attendances::Column::Version.eq(attendance.version))
            .exec(&self.db)
            .await
            .context("update attendance")?;
        if result.rows_affected == 0 {
            let exists = self.find_by_id(attendance.id).await?.is_some();
            return Err(stale_or_missing(
                exists,
                RecordsServiceError::AttendanceNotFound,
            ));
        }
        Ok(Attendance {
            version: attendance.version + 1,
            ..attendance.clone()
        })
    }

    async fn delete(&self, id: AttendanceId) -> Result<bool, RecordsServiceError> {
        let result = attendances::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete attendance")?;
        Ok(result.rows_affected > 0)
    }
}

fn attendance_from_model(model: attendances::Model) -> Attendance {
    Attendance {
        id: AttendanceId(model.id),
        date: model.date,
        is_present: model.is_present,
        student_id: StudentId(model.student_id),
        course_id: CourseId(model.course_id),
        version: model.version,
    }
}
