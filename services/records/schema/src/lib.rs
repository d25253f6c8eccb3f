//! sea-orm entities for the records database.

pub mod attendances;
pub mod courses;
pub mod enrollments;
pub mod identities;
pub mod identity_roles;
pub mod students;
pub mod teachers;
