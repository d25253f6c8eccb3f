use chrono::Utc;
use validator::Validate;

use registrar_domain::caller::CallerContext;
use registrar_domain::id::{IdentityId, StudentId, TeacherId};
use registrar_domain::pagination::PageRequest;
use registrar_domain::role::ProfileKind;

use crate::domain::notify::Notifier;
use crate::domain::repository::{
    AttendanceRepository, CourseRepository, EnrollmentRepository, IdentityProvider,
    StudentRepository, TeacherRepository,
};
use crate::domain::types::{
    AuthIdentity, Course, Enrollment, NewIdentity, Profile, Student, StudentFields, Teacher,
    TeacherFields,
};
use crate::error::{IdentityError, RecordsServiceError};
use crate::usecase::dispatch::{send_teacher_welcome, spawn_best_effort};
use crate::usecase::visibility::{Scope, Visibility};

/// Profile half of a linked (identity, profile) pair.
#[derive(Debug, Clone)]
pub enum ProfileFields {
    Student(StudentFields),
    Teacher(TeacherFields),
}

impl ProfileFields {
    pub fn kind(&self) -> ProfileKind {
        match self {
            Self::Student(_) => ProfileKind::Student,
            Self::Teacher(_) => ProfileKind::Teacher,
        }
    }

    fn trimmed(self) -> Self {
        match self {
            Self::Student(f) => Self::Student(f.trimmed()),
            Self::Teacher(f) => Self::Teacher(f.trimmed()),
        }
    }
}

/// Delete an identity, treating one that is already gone as deleted.
async fn release_identity<I: IdentityProvider>(
    identities: &I,
    identity_id: IdentityId,
) -> Result<(), RecordsServiceError> {
    match identities.delete_identity(identity_id).await {
        Ok(()) => Ok(()),
        Err(IdentityError::NotFound) => {
            tracing::info!(identity_id = %identity_id, "identity already deleted");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// The identity is gone but its profile survived; an operator must reconcile the pair.
fn report_unlinked_profile(
    kind: ProfileKind,
    identity_id: IdentityId,
    error: &RecordsServiceError,
) {
    tracing::error!(
        profile = ?kind,
        identity_id = %identity_id,
        error = %error,
        "identity deleted but profile delete failed, needs reconciliation"
    );
}

// ── CreateLinkedProfile ──────────────────────────────────────────────────────

pub struct CreateLinkedProfileUseCase<I, S, T, N> {
    pub identities: I,
    pub students: S,
    pub teachers: T,
    pub notifier: N,
}

impl<I, S, T, N> CreateLinkedProfileUseCase<I, S, T, N>
where
    I: IdentityProvider,
    S: StudentRepository,
    T: TeacherRepository,
    N: Notifier + Clone + 'static,
{
    /// Create an identity and its profile as one logical operation.
    ///
    /// Identity creation is the first write. If the role assignment or the profile
    /// write fails afterwards, the identity is deleted again before returning
    /// `ProfileLinkFailed`.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        credentials: NewIdentity,
        fields: ProfileFields,
    ) -> Result<Profile, RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        let fields = fields.trimmed();
        self.validate(&fields).await?;

        let kind = fields.kind();
        let identity = match self.identities.create_identity(&credentials, &[]).await {
            Ok(identity) => identity,
            Err(IdentityError::Rejected(reasons)) => {
                return Err(RecordsServiceError::IdentityCreationFailed { reasons });
            }
            Err(e) => return Err(e.into()),
        };

        let linked = match self.identities.assign_role(identity.id, kind.role()).await {
            Ok(()) => self.persist(identity.id, fields).await,
            Err(e) => Err(e.into()),
        };
        let profile = match linked {
            Ok(profile) => profile,
            Err(cause) => return Err(self.compensate(identity.id, cause).await),
        };

        match &profile {
            Profile::Student(student) => {
                tracing::info!(student_id = %student.id, identity_id = %identity.id, "student created");
            }
            Profile::Teacher(teacher) => {
                tracing::info!(teacher_id = %teacher.id, identity_id = %identity.id, "teacher created");
                self.welcome(teacher.clone(), &identity);
            }
        }
        Ok(profile)
    }

    async fn validate(&self, fields: &ProfileFields) -> Result<(), RecordsServiceError> {
        match fields {
            ProfileFields::Student(f) => {
                f.validate()?;
                let taken = self
                    .students
                    .find_by_registration_id(&f.registration_id)
                    .await?;
                if taken.is_some() {
                    return Err(RecordsServiceError::invalid_field(
                        "registration_id",
                        "is already taken",
                    ));
                }
            }
            ProfileFields::Teacher(f) => f.validate()?,
        }
        Ok(())
    }

    async fn persist(
        &self,
        identity_id: IdentityId,
        fields: ProfileFields,
    ) -> Result<Profile, RecordsServiceError> {
        let now = Utc::now();
        match fields {
            ProfileFields::Student(f) => {
                let student = Student {
                    id: StudentId::new(),
                    registration_id: f.registration_id,
                    department: f.department,
                    date_of_birth: f.date_of_birth,
                    identity_id: Some(identity_id),
                    version: 1,
                    created_at: now,
                };
                self.students.create(&student).await?;
                Ok(Profile::Student(student))
            }
            ProfileFields::Teacher(f) => {
                let teacher = Teacher {
                    id: TeacherId::new(),
                    department: f.department,
                    identity_id: Some(identity_id),
                    version: 1,
                    created_at: now,
                };
                self.teachers.create(&teacher).await?;
                Ok(Profile::Teacher(teacher))
            }
        }
    }

    async fn compensate(
        &self,
        identity_id: IdentityId,
        cause: RecordsServiceError,
    ) -> RecordsServiceError {
        let rolled_back = match release_identity(&self.identities, identity_id).await {
            Ok(()) => {
                tracing::warn!(identity_id = %identity_id, error = %cause, "profile link failed, identity rolled back");
                true
            }
            Err(e) => {
                tracing::error!(
                    identity_id = %identity_id,
                    error = %cause,
                    rollback_error = %e,
                    "profile link failed and identity rollback failed; orphan identity needs reconciliation"
                );
                false
            }
        };
        RecordsServiceError::ProfileLinkFailed {
            identity_id: identity_id.into(),
            rolled_back,
        }
    }

    fn welcome(&self, teacher: Teacher, identity: &AuthIdentity) {
        let notifier = self.notifier.clone();
        let email = identity.email.clone();
        let full_name = identity.full_name.clone();
        spawn_best_effort("teacher_welcome", async move {
            send_teacher_welcome(&notifier, &teacher, &email, &full_name).await
        });
    }
}

// ── DeleteStudent ────────────────────────────────────────────────────────────

pub struct DeleteStudentUseCase<I, S, E, A> {
    pub identities: I,
    pub students: S,
    pub enrollments: E,
    pub attendances: A,
}

impl<I, S, E, A> DeleteStudentUseCase<I, S, E, A>
where
    I: IdentityProvider,
    S: StudentRepository,
    E: EnrollmentRepository,
    A: AttendanceRepository,
{
    /// Identity first, profile second. A failed identity delete leaves the profile untouched;
    /// a failed profile delete after it is logged for reconciliation.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: StudentId,
    ) -> Result<(), RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        let student = self
            .students
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::StudentNotFound)?;
        if !self.enrollments.list_by_student(id).await?.is_empty()
            || !self.attendances.list_by_student(id).await?.is_empty()
        {
            return Err(RecordsServiceError::DependentRecordsExist);
        }
        if let Some(identity_id) = student.identity_id {
            release_identity(&self.identities, identity_id).await?;
        }
        let deleted = self.students.delete(id).await.inspect_err(|e| {
            if let Some(identity_id) = student.identity_id {
                report_unlinked_profile(ProfileKind::Student, identity_id, e);
            }
        })?;
        if !deleted {
            return Err(RecordsServiceError::StudentNotFound);
        }
        tracing::info!(student_id = %id, "student deleted");
        Ok(())
    }
}

// ── DeleteTeacher ────────────────────────────────────────────────────────────

pub struct DeleteTeacherUseCase<I, T, C> {
    pub identities: I,
    pub teachers: T,
    pub courses: C,
}

impl<I, T, C> DeleteTeacherUseCase<I, T, C>
where
    I: IdentityProvider,
    T: TeacherRepository,
    C: CourseRepository,
{
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: TeacherId,
    ) -> Result<(), RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        let teacher = self
            .teachers
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::TeacherNotFound)?;
        if !self.courses.list_by_teacher(id).await?.is_empty() {
            return Err(RecordsServiceError::DependentRecordsExist);
        }
        if let Some(identity_id) = teacher.identity_id {
            release_identity(&self.identities, identity_id).await?;
        }
        let deleted = self.teachers.delete(id).await.inspect_err(|e| {
            if let Some(identity_id) = teacher.identity_id {
                report_unlinked_profile(ProfileKind::Teacher, identity_id, e);
            }
        })?;
        if !deleted {
            return Err(RecordsServiceError::TeacherNotFound);
        }
        tracing::info!(teacher_id = %id, "teacher deleted");
        Ok(())
    }
}

// ── GetStudent ───────────────────────────────────────────────────────────────

/// A student with their enrollments.
#[derive(Debug, Clone)]
pub struct StudentDetails {
    pub student: Student,
    pub enrollments: Vec<Enrollment>,
}

pub struct GetStudentUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> GetStudentUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Existence is checked before visibility: another student's record is
    /// `Forbidden`, a missing one `StudentNotFound`.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: StudentId,
    ) -> Result<StudentDetails, RecordsServiceError> {
        let visibility = Visibility {
            students: &self.students,
            teachers: &self.teachers,
            courses: &self.courses,
            enrollments: &self.enrollments,
        };
        let scope = visibility.scope(caller).await?;
        let student = self
            .students
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::StudentNotFound)?;
        visibility.ensure_student(&scope, id).await?;
        let enrollments = self.enrollments.list_by_student(id).await?;
        Ok(StudentDetails {
            student,
            enrollments,
        })
    }
}

// ── UpdateStudent ────────────────────────────────────────────────────────────

pub struct UpdateStudentUseCase<S, T, C, E> {
    pub students: S,
    pub teachers: T,
    pub courses: C,
    pub enrollments: E,
}

impl<S, T, C, E> UpdateStudentUseCase<S, T, C, E>
where
    S: StudentRepository,
    T: TeacherRepository,
    C: CourseRepository,
    E: EnrollmentRepository,
{
    /// Admin, or a teacher of one of the student's courses.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: StudentId,
        expected_version: i32,
        fields: StudentFields,
    ) -> Result<Student, RecordsServiceError> {
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
            .students
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::StudentNotFound)?;
        visibility.ensure_student(&scope, id).await?;
        let fields = fields.trimmed();
        fields.validate()?;

        let registration_id = fields.registration_id.clone();
        if registration_id != current.registration_id {
            let taken = self
                .students
                .find_by_registration_id(&registration_id)
                .await?;
            if taken.is_some_and(|other| other.id != id) {
                return Err(RecordsServiceError::invalid_field(
                    "registration_id",
                    "is already taken",
                ));
            }
        }

        let updated = self
            .students
            .update(&Student {
                registration_id,
                department: fields.department,
                date_of_birth: fields.date_of_birth,
                version: expected_version,
                ..current
            })
            .await?;
        tracing::info!(student_id = %id, version = updated.version, "student updated");
        Ok(updated)
    }
}

// ── Teachers ─────────────────────────────────────────────────────────────────

/// A teacher with identity details and assigned courses.
#[derive(Debug, Clone)]
pub struct TeacherDetails {
    pub teacher: Teacher,
    pub identity: Option<AuthIdentity>,
    pub courses: Vec<Course>,
}

pub struct ListTeachersUseCase<T> {
    pub teachers: T,
}

impl<T: TeacherRepository> ListTeachersUseCase<T> {
    pub async fn execute(
        &self,
        caller: &CallerContext,
        page: PageRequest,
    ) -> Result<Vec<Teacher>, RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        self.teachers.list(page).await
    }
}

pub struct GetTeacherUseCase<I, T, C> {
    pub identities: I,
    pub teachers: T,
    pub courses: C,
}

impl<I, T, C> GetTeacherUseCase<I, T, C>
where
    I: IdentityProvider,
    T: TeacherRepository,
    C: CourseRepository,
{
    /// Admin, or the teacher reading their own profile.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: TeacherId,
    ) -> Result<TeacherDetails, RecordsServiceError> {
        if caller.effective_role().is_none() {
            return Err(RecordsServiceError::Forbidden);
        }
        let teacher = self
            .teachers
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::TeacherNotFound)?;
        let own = teacher.identity_id == Some(caller.identity_id);
        if !caller.is_admin() && !own {
            return Err(RecordsServiceError::Forbidden);
        }
        let identity = match teacher.identity_id {
            Some(identity_id) => self.identities.find_by_id(identity_id).await?,
            None => None,
        };
        let courses = self.courses.list_by_teacher(id).await?;
        Ok(TeacherDetails {
            teacher,
            identity,
            courses,
        })
    }
}

pub struct UpdateTeacherInput {
    pub fields: TeacherFields,
    pub full_name: Option<String>,
}

pub struct UpdateTeacherUseCase<I, T> {
    pub identities: I,
    pub teachers: T,
}

impl<I, T> UpdateTeacherUseCase<I, T>
where
    I: IdentityProvider,
    T: TeacherRepository,
{
    /// Admin only. The full name lives on the identity and is written after the profile.
    pub async fn execute(
        &self,
        caller: &CallerContext,
        id: TeacherId,
        expected_version: i32,
        input: UpdateTeacherInput,
    ) -> Result<Teacher, RecordsServiceError> {
        if !caller.is_admin() {
            return Err(RecordsServiceError::Forbidden);
        }
        let fields = input.fields.trimmed();
        fields.validate()?;
        if input
            .full_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(RecordsServiceError::invalid_field(
                "full_name",
                "must not be blank",
            ));
        }
        let current = self
            .teachers
            .find_by_id(id)
            .await?
            .ok_or(RecordsServiceError::TeacherNotFound)?;
        let identity_id = current.identity_id;
        let updated = self
            .teachers
            .update(&Teacher {
                department: fields.department,
                version: expected_version,
                ..current
            })
            .await?;
        if let (Some(identity_id), Some(name)) = (identity_id, input.full_name) {
            self.identities
                .update_full_name(identity_id, name.trim())
                .await?;
        }
        tracing::info!(teacher_id = %id, version = updated.version, "teacher updated");
        Ok(updated)
    }
}
