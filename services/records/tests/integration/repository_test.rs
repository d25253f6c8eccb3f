use chrono::Utc;
use registrar_domain::grade::Grade;
use registrar_domain::id::{CourseId, EnrollmentId, StudentId, TeacherId};
use registrar_domain::pagination::PageRequest;
use registrar_domain::role::Role;
use registrar_records::domain::repository::{
    CourseRepository, EnrollmentRepository, IdentityProvider, RecordFilter, StudentFilter,
    StudentRepository, TeacherRepository,
};
use registrar_records::domain::types::{Course, Enrollment, NewIdentity, Student, Teacher};
use registrar_records::error::{IdentityError, RecordsServiceError};
use registrar_records::infra::db::{
    DbCourseRepository, DbEnrollmentRepository, DbStudentRepository, DbTeacherRepository,
};
use registrar_records::infra::identity::DbIdentityProvider;
use registrar_records::usecase::visibility::ListStudentsUseCase;

use crate::helpers::{caller, date, setup_db};

fn student(registration_id: &str) -> Student {
    Student {
        id: StudentId::new(),
        registration_id: registration_id.to_owned(),
        department: None,
        date_of_birth: date(2004, 5, 1),
        identity_id: None,
        version: 1,
        created_at: Utc::now(),
    }
}

fn teacher() -> Teacher {
    Teacher {
        id: TeacherId::new(),
        department: "Mathematics".to_owned(),
        identity_id: None,
        version: 1,
        created_at: Utc::now(),
    }
}

fn course(code: &str, teacher_id: Option<TeacherId>) -> Course {
    Course {
        id: CourseId::new(),
        course_code: code.to_owned(),
        title: format!("Course {code}"),
        credits: 3,
        description: None,
        teacher_id,
        version: 1,
        created_at: Utc::now(),
    }
}

fn enrollment(student_id: StudentId, course_id: CourseId) -> Enrollment {
    Enrollment {
        id: EnrollmentId::new(),
        student_id,
        course_id,
        enrollment_date: date(2026, 1, 16),
        marks: None,
        grade: None,
        version: 1,
        created_at: Utc::now(),
    }
}

// ── Versioned updates ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_stale_student_update() {
    let db = setup_db().await;
    let repo = DbStudentRepository { db };
    let original = student("REG-1");
    repo.create(&original).await.unwrap();

    let updated = repo
        .update(&Student {
            department: Some("Physics".to_owned()),
            ..original.clone()
        })
        .await
        .unwrap();
    assert_eq!(updated.version, 2);

    let stale = repo
        .update(&Student {
            department: Some("Chemistry".to_owned()),
            ..original.clone()
        })
        .await;
    assert!(
        matches!(stale, Err(RecordsServiceError::ConcurrencyConflict)),
        "expected ConcurrencyConflict, got {stale:?}"
    );

    let stored = repo.find_by_id(original.id).await.unwrap().unwrap();
    assert_eq!(stored.department.as_deref(), Some("Physics"));
    assert_eq!(stored.version, 2);
}

#[tokio::test]
async fn should_report_missing_row_on_update() {
    let db = setup_db().await;
    let repo = DbStudentRepository { db };

    let result = repo.update(&student("REG-404")).await;

    assert!(matches!(result, Err(RecordsServiceError::StudentNotFound)));
}

#[tokio::test]
async fn should_store_marks_with_grade() {
    let db = setup_db().await;
    let students = DbStudentRepository { db: db.clone() };
    let courses = DbCourseRepository { db: db.clone() };
    let enrollments = DbEnrollmentRepository { db };
    let s = student("REG-1");
    let c = course("CS101", None);
    let e = enrollment(s.id, c.id);
    students.create(&s).await.unwrap();
    courses.create(&c).await.unwrap();
    enrollments.create(&e).await.unwrap();

    let graded = enrollments
        .update_marks(e.id, 1, Some(72), Some(Grade::B))
        .await
        .unwrap();
    assert_eq!(graded.marks, Some(72));
    assert_eq!(graded.grade, Some(Grade::B));
    assert_eq!(graded.version, 2);

    let stale = enrollments.update_marks(e.id, 1, Some(90), Some(Grade::A)).await;
    assert!(matches!(stale, Err(RecordsServiceError::ConcurrencyConflict)));
}

// ── Constraints ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_duplicate_registration_id() {
    let db = setup_db().await;
    let repo = DbStudentRepository { db };
    repo.create(&student("REG-1")).await.unwrap();

    let result = repo.create(&student("REG-1")).await;

    match result {
        Err(RecordsServiceError::Validation(fields)) => {
            assert_eq!(fields[0].field, "registration_id");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn should_reject_duplicate_enrollment() {
    let db = setup_db().await;
    let students = DbStudentRepository { db: db.clone() };
    let courses = DbCourseRepository { db: db.clone() };
    let enrollments = DbEnrollmentRepository { db };
    let s = student("REG-1");
    let c = course("CS101", None);
    students.create(&s).await.unwrap();
    courses.create(&c).await.unwrap();
    enrollments.create(&enrollment(s.id, c.id)).await.unwrap();

    let result = enrollments.create(&enrollment(s.id, c.id)).await;

    match result {
        Err(RecordsServiceError::Validation(fields)) => {
            assert_eq!(fields[0].field, "course_id");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(enrollments.count().await.unwrap(), 1);
}

#[tokio::test]
async fn should_restrict_deleting_referenced_rows() {
    let db = setup_db().await;
    let students = DbStudentRepository { db: db.clone() };
    let teachers = DbTeacherRepository { db: db.clone() };
    let courses = DbCourseRepository { db: db.clone() };
    let enrollments = DbEnrollmentRepository { db };
    let t = teacher();
    let s = student("REG-1");
    let c = course("CS101", Some(t.id));
    teachers.create(&t).await.unwrap();
    students.create(&s).await.unwrap();
    courses.create(&c).await.unwrap();
    enrollments.create(&enrollment(s.id, c.id)).await.unwrap();

    let student_delete = students.delete(s.id).await;
    assert!(
        matches!(student_delete, Err(RecordsServiceError::DependentRecordsExist)),
        "expected DependentRecordsExist, got {student_delete:?}"
    );
    let teacher_delete = teachers.delete(t.id).await;
    assert!(matches!(
        teacher_delete,
        Err(RecordsServiceError::DependentRecordsExist)
    ));
    let course_delete = courses.delete(c.id).await;
    assert!(matches!(
        course_delete,
        Err(RecordsServiceError::DependentRecordsExist)
    ));
    assert!(students.find_by_id(s.id).await.unwrap().is_some());
    assert!(!students.delete(StudentId::new()).await.unwrap());
}

// ── Identity provider ────────────────────────────────────────────────────────

fn credentials(email: &str) -> NewIdentity {
    NewIdentity {
        username: email.to_owned(),
        email: email.to_owned(),
        full_name: "Ada Lovelace".to_owned(),
        password: "correct horse".to_owned(),
    }
}

#[tokio::test]
async fn should_create_and_find_identity_with_roles() {
    let db = setup_db().await;
    let provider = DbIdentityProvider { db };

    let created = provider
        .create_identity(&credentials("ada@uni.edu"), &[Role::Admin])
        .await
        .unwrap();
    provider.assign_role(created.id, Role::Teacher).await.unwrap();
    provider.assign_role(created.id, Role::Teacher).await.unwrap();

    let found = provider
        .find_by_email("ada@uni.edu")
        .await
        .unwrap()
        .expect("identity must be stored");
    assert_eq!(found.id, created.id);
    assert_eq!(found.roles.len(), 2);
    assert!(found.roles.contains(&Role::Admin));
    assert!(found.roles.contains(&Role::Teacher));
}

#[tokio::test]
async fn should_reject_taken_email() {
    let db = setup_db().await;
    let provider = DbIdentityProvider { db };
    provider
        .create_identity(&credentials("ada@uni.edu"), &[])
        .await
        .unwrap();

    let result = provider
        .create_identity(
            &NewIdentity {
                username: "someone-else".to_owned(),
                ..credentials("ada@uni.edu")
            },
            &[],
        )
        .await;

    assert!(
        matches!(result, Err(IdentityError::Rejected(_))),
        "expected Rejected, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_second_identity_delete_as_not_found() {
    let db = setup_db().await;
    let provider = DbIdentityProvider { db };
    let identity = provider
        .create_identity(&credentials("ada@uni.edu"), &[Role::Student])
        .await
        .unwrap();

    provider.delete_identity(identity.id).await.unwrap();
    let again = provider.delete_identity(identity.id).await;

    assert!(matches!(again, Err(IdentityError::NotFound)));
    assert!(provider.find_by_id(identity.id).await.unwrap().is_none());
}

// ── Scoped queries ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_taught_students_from_database() {
    let db = setup_db().await;
    let provider = DbIdentityProvider { db: db.clone() };
    let students = DbStudentRepository { db: db.clone() };
    let teachers = DbTeacherRepository { db: db.clone() };
    let courses = DbCourseRepository { db: db.clone() };
    let enrollments = DbEnrollmentRepository { db: db.clone() };

    let identity = provider
        .create_identity(&credentials("turing@uni.edu"), &[Role::Teacher])
        .await
        .unwrap();
    let t = Teacher {
        identity_id: Some(identity.id),
        ..teacher()
    };
    teachers.create(&t).await.unwrap();
    let first = course("MATH1", Some(t.id));
    let second = course("MATH2", Some(t.id));
    courses.create(&first).await.unwrap();
    courses.create(&second).await.unwrap();
    let taught = student("REG-1");
    let untaught = student("REG-2");
    students.create(&taught).await.unwrap();
    students.create(&untaught).await.unwrap();
    enrollments.create(&enrollment(taught.id, first.id)).await.unwrap();
    enrollments.create(&enrollment(taught.id, second.id)).await.unwrap();

    let visible = ListStudentsUseCase {
        students,
        teachers,
        courses,
        enrollments,
    }
    .execute(&caller(&identity), PageRequest::default())
    .await
    .unwrap();

    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, taught.id);
}

// ── Paging ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_page_lists_in_the_query() {
    let db = setup_db().await;
    let students = DbStudentRepository { db: db.clone() };
    let courses = DbCourseRepository { db: db.clone() };
    let enrollments = DbEnrollmentRepository { db };
    let mut created = Vec::new();
    for n in 1..=5 {
        let s = student(&format!("REG-{n}"));
        students.create(&s).await.unwrap();
        created.push(s);
    }
    let c = course("CS101", None);
    courses.create(&c).await.unwrap();
    for s in &created[..3] {
        enrollments.create(&enrollment(s.id, c.id)).await.unwrap();
    }

    let second = students
        .list(StudentFilter::All, PageRequest::new(2, 2))
        .await
        .unwrap();
    let regs: Vec<&str> = second.iter().map(|s| s.registration_id.as_str()).collect();
    assert_eq!(regs, ["REG-3", "REG-4"]);

    let ids: Vec<StudentId> = created.iter().map(|s| s.id).collect();
    let last = students
        .list(StudentFilter::Ids(&ids[3..]), PageRequest::new(2, 1))
        .await
        .unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].registration_id, "REG-5");

    let page = enrollments
        .list(RecordFilter::Courses(&[c.id]), PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    let beyond = enrollments
        .list(RecordFilter::Student(created[0].id), PageRequest::new(2, 25))
        .await
        .unwrap();
    assert!(beyond.is_empty());
}
