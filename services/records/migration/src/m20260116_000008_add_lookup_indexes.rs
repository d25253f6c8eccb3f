use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Students::Table)
                    .col(Students::IdentityId)
                    .name("idx_students_identity_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Teachers::Table)
                    .col(Teachers::IdentityId)
                    .name("idx_teachers_identity_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Courses::Table)
                    .col(Courses::TeacherId)
                    .name("idx_courses_teacher_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .name("idx_enrollments_course_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Attendances::Table)
                    .col(Attendances::StudentId)
                    .name("idx_attendances_student_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_attendances_student_id",
            "idx_enrollments_course_id",
            "idx_courses_teacher_id",
            "idx_teachers_identity_id",
            "idx_students_identity_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Students {
    Table,
    IdentityId,
}

#[derive(Iden)]
enum Teachers {
    Table,
    IdentityId,
}

#[derive(Iden)]
enum Courses {
    Table,
    TeacherId,
}

#[derive(Iden)]
enum Enrollments {
    Table,
    CourseId,
}

#[derive(Iden)]
enum Attendances {
    Table,
    StudentId,
}
