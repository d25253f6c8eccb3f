use registrar_domain::id::EnrollmentId;
use registrar_domain::role::Role;
use registrar_records::error::RecordsServiceError;
use registrar_records::usecase::enrollment::{
    CreateEnrollmentInput, CreateEnrollmentUseCase, DeleteEnrollmentUseCase,
    GetEnrollmentUseCase,
};

use crate::helpers::{
    FailingNotifier, FakeIdentityProvider, MemoryStore, RecordingNotifier, admin, date,
    next_email, seed_student, seed_teacher,
};

fn usecase<N>(
    store: &MemoryStore,
    identities: &FakeIdentityProvider,
    notifier: N,
) -> CreateEnrollmentUseCase<
    FakeIdentityProvider,
    MemoryStore,
    MemoryStore,
    MemoryStore,
    MemoryStore,
    N,
> {
    CreateEnrollmentUseCase {
        identities: identities.clone(),
        students: store.clone(),
        teachers: store.clone(),
        courses: store.clone(),
        enrollments: store.clone(),
        notifier,
    }
}

#[tokio::test]
async fn should_enroll_and_send_confirmation() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, teacher) = seed_teacher(&store, &identities, "turing@uni.edu");
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", Some(teacher.id));
    let (notifier, mut sent) = RecordingNotifier::new();

    let enrollment = usecase(&store, &identities, notifier)
        .execute(
            &teacher_caller,
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: course.id,
                enrollment_date: Some(date(2026, 1, 16)),
            },
        )
        .await
        .unwrap();

    assert_eq!(enrollment.version, 1);
    assert!(enrollment.marks.is_none());
    assert!(enrollment.grade.is_none());
    assert_eq!(store.enrollments.lock().unwrap().len(), 1);

    let email = next_email(&mut sent).await;
    assert_eq!(email.to, "ada@uni.edu");
    assert_eq!(email.subject, "Course Enrollment Confirmation");
    assert!(email.html_body.contains("<b>Course CS101</b>"));
    assert!(email.html_body.contains("2026-01-16"));
}

#[tokio::test]
async fn should_keep_enrollment_when_dispatch_fails() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let (notifier, mut attempts) = FailingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: course.id,
                enrollment_date: None,
            },
        )
        .await;

    assert!(result.is_ok(), "dispatch failure must not fail enrollment: {result:?}");
    next_email(&mut attempts).await;
    assert_eq!(store.enrollments.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_skip_confirmation_for_student_without_identity() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let student = store.add_student(None, "REG-9");
    let course = store.add_course("CS101", None);
    let (notifier, mut sent) = RecordingNotifier::new();

    usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: course.id,
                enrollment_date: None,
            },
        )
        .await
        .unwrap();

    let waited = tokio::time::timeout(std::time::Duration::from_millis(200), sent.recv()).await;
    assert!(
        !matches!(waited, Ok(Some(_))),
        "no email expected without an address"
    );
}

#[tokio::test]
async fn should_forbid_teacher_enrolling_into_foreign_course() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, _) = seed_teacher(&store, &identities, "turing@uni.edu");
    let other = store.add_teacher(None);
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS200", Some(other.id));
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &teacher_caller,
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: course.id,
                enrollment_date: None,
            },
        )
        .await;

    assert!(
        matches!(result, Err(RecordsServiceError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert!(store.enrollments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_students_from_enrolling() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (student_caller, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &student_caller,
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: course.id,
                enrollment_date: None,
            },
        )
        .await;

    assert!(matches!(result, Err(RecordsServiceError::Forbidden)));
}

#[tokio::test]
async fn should_reject_duplicate_enrollment() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    store.add_enrollment(student.id, course.id, None);
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: course.id,
                enrollment_date: None,
            },
        )
        .await;

    match result {
        Err(RecordsServiceError::Validation(fields)) => {
            assert_eq!(fields.len(), 1);
            assert_eq!(fields[0].field, "course_id");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(store.enrollments.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_unknown_references() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let (notifier, _sent) = RecordingNotifier::new();
    let uc = usecase(&store, &identities, notifier);

    let missing_course = uc
        .execute(
            &admin(),
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: registrar_domain::id::CourseId::new(),
                enrollment_date: None,
            },
        )
        .await;
    assert!(matches!(
        missing_course,
        Err(RecordsServiceError::InvalidReference { field: "course_id" })
    ));
    assert!(store.enrollments.lock().unwrap().is_empty());

    let missing_student = uc
        .execute(
            &admin(),
            CreateEnrollmentInput {
                student_id: registrar_domain::id::StudentId::new(),
                course_id: course.id,
                enrollment_date: None,
            },
        )
        .await;
    assert!(matches!(
        missing_student,
        Err(RecordsServiceError::InvalidReference {
            field: "student_id"
        })
    ));
    assert!(store.enrollments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_reading_another_students_enrollment() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (ada_caller, ada) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let (_, grace) = seed_student(&store, &identities, "grace@uni.edu", "REG-2");
    let course = store.add_course("CS101", None);
    let own = store.add_enrollment(ada.id, course.id, Some(72));
    let other = store.add_enrollment(grace.id, course.id, None);
    let uc = GetEnrollmentUseCase {
        students: store.clone(),
        teachers: store.clone(),
        courses: store.clone(),
        enrollments: store.clone(),
    };

    let found = uc.execute(&ada_caller, own.id).await.unwrap();
    assert_eq!(found.id, own.id);
    let denied = uc.execute(&ada_caller, other.id).await;
    assert!(matches!(denied, Err(RecordsServiceError::Forbidden)));
    let missing = uc.execute(&ada_caller, EnrollmentId::new()).await;
    assert!(matches!(
        missing,
        Err(RecordsServiceError::EnrollmentNotFound)
    ));
}

#[tokio::test]
async fn should_reject_caller_whose_profile_is_missing() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let orphan = identities.add("ghost@uni.edu", &[Role::Teacher]);
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &crate::helpers::caller(&orphan),
            CreateEnrollmentInput {
                student_id: student.id,
                course_id: course.id,
                enrollment_date: None,
            },
        )
        .await;

    assert!(matches!(result, Err(RecordsServiceError::ProfileNotFound)));
}

#[tokio::test]
async fn should_only_let_admin_delete_enrollments() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, teacher) = seed_teacher(&store, &identities, "turing@uni.edu");
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", Some(teacher.id));
    let enrollment = store.add_enrollment(student.id, course.id, None);
    let uc = DeleteEnrollmentUseCase {
        enrollments: store.clone(),
    };

    let denied = uc.execute(&teacher_caller, enrollment.id).await;
    assert!(matches!(denied, Err(RecordsServiceError::Forbidden)));

    uc.execute(&admin(), enrollment.id).await.unwrap();
    let again = uc.execute(&admin(), enrollment.id).await;
    assert!(matches!(again, Err(RecordsServiceError::EnrollmentNotFound)));
}
