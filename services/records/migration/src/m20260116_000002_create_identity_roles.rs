use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdentityRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(IdentityRoles::IdentityId).uuid().not_null())
                    .col(ColumnDef::new(IdentityRoles::Role).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(IdentityRoles::IdentityId)
                            .col(IdentityRoles::Role),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(IdentityRoles::Table, IdentityRoles::IdentityId)
                            .to(Identities::Table, Identities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(IdentityRoles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum IdentityRoles {
    Table,
    IdentityId,
    Role,
}

#[derive(Iden)]
enum Identities {
    Table,
    Id,
}
