pub mod attendances;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod students;
pub mod teachers;
pub mod transcript;
