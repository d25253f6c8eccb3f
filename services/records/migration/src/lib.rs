pub use sea_orm_migration::prelude::*;

mod m20260116_000001_create_identities;
mod m20260116_000002_create_identity_roles;
mod m20260116_000003_create_teachers;
mod m20260116_000004_create_students;
mod m20260116_000005_create_courses;
mod m20260116_000006_create_enrollments;
mod m20260116_000007_create_attendances;
mod m20260116_000008_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260116_000001_create_identities::Migration),
            Box::new(m20260116_000002_create_identity_roles::Migration),
            Box::new(m20260116_000003_create_teachers::Migration),
            Box::new(m20260116_000004_create_students::Migration),
            Box::new(m20260116_000005_create_courses::Migration),
            Box::new(m20260116_000006_create_enrollments::Migration),
            Box::new(m20260116_000007_create_attendances::Migration),
            Box::new(m20260116_000008_add_lookup_indexes::Migration),
        ]
    }
}
