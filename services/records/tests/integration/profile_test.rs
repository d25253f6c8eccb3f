use registrar_domain::role::Role;
use registrar_records::domain::types::{NewIdentity, Profile, StudentFields, TeacherFields};
use registrar_records::error::RecordsServiceError;
use registrar_records::usecase::profile::{
    CreateLinkedProfileUseCase, DeleteStudentUseCase, DeleteTeacherUseCase, ProfileFields,
    UpdateStudentUseCase, UpdateTeacherInput, UpdateTeacherUseCase,
};
use registrar_records::usecase::seed::{SeedAdminInput, SeedAdminUseCase};

use crate::helpers::{
    FakeIdentityProvider, MemoryStore, RecordingNotifier, admin, date, next_email, seed_student,
    seed_teacher,
};

fn credentials(email: &str, password: &str) -> NewIdentity {
    NewIdentity {
        username: email.to_owned(),
        email: email.to_owned(),
        full_name: "Ada Lovelace".to_owned(),
        password: password.to_owned(),
    }
}

fn student_fields(registration_id: &str) -> ProfileFields {
    ProfileFields::Student(StudentFields {
        registration_id: registration_id.to_owned(),
        department: Some("Science".to_owned()),
        date_of_birth: date(2004, 5, 1),
    })
}

fn usecase(
    store: &MemoryStore,
    identities: &FakeIdentityProvider,
    notifier: RecordingNotifier,
) -> CreateLinkedProfileUseCase<FakeIdentityProvider, MemoryStore, MemoryStore, RecordingNotifier>
{
    CreateLinkedProfileUseCase {
        identities: identities.clone(),
        students: store.clone(),
        teachers: store.clone(),
        notifier,
    }
}

// ── Creation ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_student_linked_to_identity() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (notifier, _sent) = RecordingNotifier::new();

    let profile = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            credentials("ada@uni.edu", "secret1"),
            student_fields("REG-1"),
        )
        .await
        .unwrap();

    let Profile::Student(student) = profile else {
        panic!("expected a student profile");
    };
    let identity_id = student.identity_id.expect("student must be linked");
    let identity = identities.get(identity_id).expect("identity must exist");
    assert!(identity.roles.contains(&Role::Student));
    assert_eq!(student.version, 1);
    assert_eq!(store.students.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_create_teacher_and_send_welcome() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (notifier, mut sent) = RecordingNotifier::new();

    let profile = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            credentials("turing@uni.edu", "secret1"),
            ProfileFields::Teacher(TeacherFields {
                department: "Mathematics".to_owned(),
            }),
        )
        .await
        .unwrap();

    assert!(matches!(profile, Profile::Teacher(_)));
    let email = next_email(&mut sent).await;
    assert_eq!(email.to, "turing@uni.edu");
    assert_eq!(email.subject, "Welcome to the Faculty - Ada Lovelace");
    assert!(email.html_body.contains("<b>Mathematics</b>"));
}

#[tokio::test]
async fn should_forbid_non_admin_creation() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, _) = seed_teacher(&store, &identities, "turing@uni.edu");
    let (notifier, _sent) = RecordingNotifier::new();
    let before = identities.len();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &teacher_caller,
            credentials("ada@uni.edu", "secret1"),
            student_fields("REG-1"),
        )
        .await;

    assert!(matches!(result, Err(RecordsServiceError::Forbidden)));
    assert_eq!(identities.len(), before);
}

#[tokio::test]
async fn should_report_every_identity_rejection_reason() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    identities.add("ada@uni.edu", &[Role::Student]);
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            credentials("ada@uni.edu", "123"),
            student_fields("REG-1"),
        )
        .await;

    match result {
        Err(RecordsServiceError::IdentityCreationFailed { reasons }) => {
            assert_eq!(reasons.len(), 2, "{reasons:?}");
        }
        other => panic!("expected IdentityCreationFailed, got {other:?}"),
    }
    assert!(store.students.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_validate_fields_before_creating_identity() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    store.add_student(None, "REG-1");
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            credentials("ada@uni.edu", "secret1"),
            student_fields("REG-1"),
        )
        .await;

    match result {
        Err(RecordsServiceError::Validation(fields)) => {
            assert_eq!(fields[0].field, "registration_id");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert_eq!(identities.len(), 0, "no identity may be created");
}

#[tokio::test]
async fn should_roll_back_identity_when_profile_write_fails() {
    let store = MemoryStore::new();
    store.fail_profile_writes();
    let identities = FakeIdentityProvider::new();
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            credentials("ada@uni.edu", "secret1"),
            student_fields("REG-1"),
        )
        .await;

    assert!(
        matches!(
            result,
            Err(RecordsServiceError::ProfileLinkFailed {
                rolled_back: true,
                ..
            })
        ),
        "expected rolled-back ProfileLinkFailed, got {result:?}"
    );
    assert_eq!(identities.len(), 0, "identity must be compensated");
    assert!(store.students.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_orphan_when_rollback_fails() {
    let store = MemoryStore::new();
    store.fail_profile_writes();
    let identities = FakeIdentityProvider::new();
    identities.fail_deletes();
    let (notifier, _sent) = RecordingNotifier::new();

    let result = usecase(&store, &identities, notifier)
        .execute(
            &admin(),
            credentials("ada@uni.edu", "secret1"),
            student_fields("REG-1"),
        )
        .await;

    let Err(RecordsServiceError::ProfileLinkFailed {
        identity_id,
        rolled_back,
    }) = result
    else {
        panic!("expected ProfileLinkFailed, got {result:?}");
    };
    assert!(!rolled_back);
    assert!(identities.get(identity_id.into()).is_some());
}

// ── Deletion ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_delete_student_and_identity() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let uc = DeleteStudentUseCase {
        identities: identities.clone(),
        students: store.clone(),
        enrollments: store.clone(),
        attendances: store.clone(),
    };

    uc.execute(&admin(), student.id).await.unwrap();

    assert!(store.students.lock().unwrap().is_empty());
    assert_eq!(identities.len(), 0);
}

#[tokio::test]
async fn should_delete_unlinked_student_without_touching_identities() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    identities.add("bystander@uni.edu", &[Role::Student]);
    let student = store.add_student(None, "REG-9");
    let uc = DeleteStudentUseCase {
        identities: identities.clone(),
        students: store.clone(),
        enrollments: store.clone(),
        attendances: store.clone(),
    };

    uc.execute(&admin(), student.id).await.unwrap();

    assert!(store.students.lock().unwrap().is_empty());
    assert_eq!(identities.len(), 1);
}

#[tokio::test]
async fn should_delete_profile_when_identity_already_gone() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let student = store.add_student(Some(registrar_domain::id::IdentityId::new()), "REG-1");
    let uc = DeleteStudentUseCase {
        identities: identities.clone(),
        students: store.clone(),
        enrollments: store.clone(),
        attendances: store.clone(),
    };

    uc.execute(&admin(), student.id).await.unwrap();

    assert!(store.students.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_keep_profile_when_identity_delete_fails() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    identities.fail_deletes();
    let uc = DeleteStudentUseCase {
        identities: identities.clone(),
        students: store.clone(),
        enrollments: store.clone(),
        attendances: store.clone(),
    };

    let result = uc.execute(&admin(), student.id).await;

    assert!(matches!(result, Err(RecordsServiceError::Internal(_))));
    assert_eq!(store.students.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_fail_when_profile_delete_fails_after_identity_is_gone() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    store.fail_profile_writes();
    let uc = DeleteStudentUseCase {
        identities: identities.clone(),
        students: store.clone(),
        enrollments: store.clone(),
        attendances: store.clone(),
    };

    let result = uc.execute(&admin(), student.id).await;

    assert!(matches!(result, Err(RecordsServiceError::Internal(_))));
    assert_eq!(identities.len(), 0);
    assert_eq!(store.students.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_deny_student_delete_with_dependents() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let course = store.add_course("CS101", None);
    store.add_attendance(student.id, course.id);
    let uc = DeleteStudentUseCase {
        identities: identities.clone(),
        students: store.clone(),
        enrollments: store.clone(),
        attendances: store.clone(),
    };

    let result = uc.execute(&admin(), student.id).await;

    assert!(matches!(result, Err(RecordsServiceError::DependentRecordsExist)));
    assert_eq!(identities.len(), 1, "identity must survive a denied delete");
}

#[tokio::test]
async fn should_deny_teacher_delete_with_courses() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, teacher) = seed_teacher(&store, &identities, "turing@uni.edu");
    store.add_course("CS101", Some(teacher.id));
    let uc = DeleteTeacherUseCase {
        identities: identities.clone(),
        teachers: store.clone(),
        courses: store.clone(),
    };

    let result = uc.execute(&admin(), teacher.id).await;

    assert!(matches!(result, Err(RecordsServiceError::DependentRecordsExist)));
}

// ── Updates ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_student_with_version_check() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (_, student) = seed_student(&store, &identities, "ada@uni.edu", "REG-1");
    let uc = UpdateStudentUseCase {
        students: store.clone(),
        teachers: store.clone(),
        courses: store.clone(),
        enrollments: store.clone(),
    };
    let fields = StudentFields {
        registration_id: "REG-2".to_owned(),
        department: None,
        date_of_birth: date(2004, 6, 1),
    };

    let updated = uc
        .execute(&admin(), student.id, 1, fields.clone())
        .await
        .unwrap();
    assert_eq!(updated.registration_id, "REG-2");
    assert_eq!(updated.version, 2);

    let stale = uc.execute(&admin(), student.id, 1, fields).await;
    assert!(matches!(stale, Err(RecordsServiceError::ConcurrencyConflict)));
}

#[tokio::test]
async fn should_update_teacher_and_identity_name() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, teacher) = seed_teacher(&store, &identities, "turing@uni.edu");
    let uc = UpdateTeacherUseCase {
        identities: identities.clone(),
        teachers: store.clone(),
    };
    let input = || UpdateTeacherInput {
        fields: TeacherFields {
            department: "Computing".to_owned(),
        },
        full_name: Some("Alan Turing".to_owned()),
    };

    let denied = uc.execute(&teacher_caller, teacher.id, 1, input()).await;
    assert!(matches!(denied, Err(RecordsServiceError::Forbidden)));

    let updated = uc.execute(&admin(), teacher.id, 1, input()).await.unwrap();
    assert_eq!(updated.department, "Computing");
    let identity = identities.get(teacher.identity_id.unwrap()).unwrap();
    assert_eq!(identity.full_name, "Alan Turing");
}

// ── Admin seed ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_seed_admin_once() {
    let identities = FakeIdentityProvider::new();
    let uc = SeedAdminUseCase {
        identities: identities.clone(),
    };
    let input = || SeedAdminInput {
        email: "admin@uni.edu".to_owned(),
        password: "changeme".to_owned(),
        full_name: "System Administrator".to_owned(),
    };

    let seeded = uc.execute(input()).await.unwrap().expect("first run seeds");
    let identity = identities.get(seeded).unwrap();
    assert_eq!(identity.username, "admin@uni.edu");
    assert!(identity.roles.contains(&Role::Admin));

    assert_eq!(uc.execute(input()).await.unwrap(), None);
    assert_eq!(identities.len(), 1);
}
