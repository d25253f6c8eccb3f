use registrar_domain::pagination::PageRequest;
use registrar_records::domain::types::CourseFields;
use registrar_records::error::RecordsServiceError;
use registrar_records::usecase::course::CreateCourseUseCase;
use registrar_records::usecase::visibility::ListCoursesUseCase;

use crate::helpers::{FakeIdentityProvider, MemoryStore, admin, seed_teacher};

fn create(store: &MemoryStore) -> CreateCourseUseCase<MemoryStore, MemoryStore> {
    CreateCourseUseCase {
        teachers: store.clone(),
        courses: store.clone(),
    }
}

fn fields(course_code: &str, title: &str) -> CourseFields {
    CourseFields {
        course_code: course_code.to_owned(),
        title: title.to_owned(),
        credits: 3,
        description: None,
        teacher_id: None,
    }
}

#[tokio::test]
async fn should_reject_whitespace_title() {
    let store = MemoryStore::new();

    let result = create(&store).execute(&admin(), fields("CS101", "    ")).await;

    let Err(RecordsServiceError::Validation(errors)) = result else {
        panic!("expected Validation, got {result:?}");
    };
    assert!(errors.iter().any(|e| e.field == "title"));
    assert!(store.courses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_check_lengths_after_trimming() {
    let store = MemoryStore::new();

    let course = create(&store)
        .execute(&admin(), fields("  ABCDEFGHIJ ", "  Linear Algebra "))
        .await
        .unwrap();

    assert_eq!(course.course_code, "ABCDEFGHIJ");
    assert_eq!(course.title, "Linear Algebra");
    let short = create(&store).execute(&admin(), fields("CS102", " ab ")).await;
    assert!(matches!(short, Err(RecordsServiceError::Validation(_))));
}

#[tokio::test]
async fn should_page_teacher_courses() {
    let store = MemoryStore::new();
    let identities = FakeIdentityProvider::new();
    let (teacher_caller, teacher) = seed_teacher(&store, &identities, "turing@uni.edu");
    store.add_course("MATH3", Some(teacher.id));
    store.add_course("MATH1", Some(teacher.id));
    store.add_course("MATH2", Some(teacher.id));
    store.add_course("HIST1", None);
    let usecase = ListCoursesUseCase {
        students: store.clone(),
        teachers: store.clone(),
        courses: store.clone(),
        enrollments: store.clone(),
    };

    let first = usecase
        .execute(&teacher_caller, PageRequest::new(1, 2))
        .await
        .unwrap();
    let second = usecase
        .execute(&teacher_caller, PageRequest::new(2, 2))
        .await
        .unwrap();

    let codes: Vec<&str> = first.iter().map(|c| c.course_code.as_str()).collect();
    assert_eq!(codes, ["MATH1", "MATH2"]);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].course_code, "MATH3");
}
