use registrar_domain::grade::Grade;
use registrar_records::error::RecordsServiceError;
use registrar_records::usecase::enrollment::UpdateMarksUseCase;

use crate::helpers::{FakeIdentityProvider, MemoryStore, admin, seed_student, seed_teacher};

fn usecase(
    store: &MemoryStore,
) -> UpdateMarksUseCase<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    UpdateMarksUseCase {
        students: store.clone(),
        teachers: store.clone(),
        courses: store.clone(),
        enrollments: store.clone(),
    }
}

#[tokio::test]
async fn should_derive_grade_from_marks() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, teacher) = seed_teacher(&store, &identities, "turing@uni.edu");
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", Some(teacher.id));
    let enrollment = store.add_enrollment(student.id, course.id, None);

    let updated = usecase(&store)
        .execute(&teacher_caller, enrollment.id, 1, Some(85))
        .await
        .unwrap();

    assert_eq!(updated.marks, Some(85));
    assert_eq!(updated.grade, Some(Grade::A));
    assert_eq!(updated.version, 2);
}

#[tokio::test]
async fn should_clear_grade_with_marks() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let enrollment = store.add_enrollment(student.id, course.id, Some(55));

    let updated = usecase(&store)
        .execute(&admin(), enrollment.id, 1, None)
        .await
        .unwrap();

    assert!(updated.marks.is_none());
    assert!(updated.grade.is_none());
}

#[tokio::test]
async fn should_reject_out_of_range_marks() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let enrollment = store.add_enrollment(student.id, course.id, None);

    for marks in [-1, 101] {
        let result = usecase(&store)
            .execute(&admin(), enrollment.id, 1, Some(marks))
            .await;
        match result {
            Err(RecordsServiceError::Validation(fields)) => assert_eq!(fields[0].field, "marks"),
            other => panic!("expected Validation for {marks}, got {other:?}"),
        }
    }
    let stored = store.enrollments.lock().unwrap()[0].clone();
    assert!(stored.marks.is_none());
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn should_detect_stale_version() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let enrollment = store.add_enrollment(student.id, course.id, None);
    let uc = usecase(&store);

    uc.execute(&admin(), enrollment.id, 1, Some(70)).await.unwrap();
    let result = uc.execute(&admin(), enrollment.id, 1, Some(40)).await;

    assert!(
        matches!(result, Err(RecordsServiceError::ConcurrencyConflict)),
        "expected ConcurrencyConflict, got {result:?}"
    );
    let stored = store.enrollments.lock().unwrap()[0].clone();
    assert_eq!(stored.marks, Some(70));
    assert_eq!(stored.grade, Some(Grade::B));
}

#[tokio::test]
async fn should_treat_identical_marks_as_no_op() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let enrollment = store.add_enrollment(student.id, course.id, Some(65));

    // Stale version, but nothing would change.
    let unchanged = usecase(&store)
        .execute(&admin(), enrollment.id, 7, Some(65))
        .await
        .unwrap();

    assert_eq!(unchanged.version, 1);
    assert_eq!(unchanged.grade, Some(Grade::C));
}

#[tokio::test]
async fn should_forbid_teacher_of_other_course() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, _) = seed_teacher(&store, &identities, "turing@uni.edu");
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let enrollment = store.add_enrollment(student.id, course.id, None);

    let result = usecase(&store)
        .execute(&teacher_caller, enrollment.id, 1, Some(90))
        .await;

    assert!(matches!(result, Err(RecordsServiceError::Forbidden)));
}

#[tokio::test]
async fn should_forbid_students_from_grading() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (student_caller, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    let enrollment = store.add_enrollment(student.id, course.id, None);

    let result = usecase(&store)
        .execute(&student_caller, enrollment.id, 1, Some(100))
        .await;

    assert!(matches!(result, Err(RecordsServiceError::Forbidden)));
}

#[tokio::test]
async fn should_report_missing_enrollment() {
    let store = MemoryStore::new();
    let result = usecase(&store)
        .execute(&admin(), registrar_domain::id::EnrollmentId::new(), 1, Some(50))
        .await;
    assert!(matches!(result, Err(RecordsServiceError::EnrollmentNotFound)));
}
