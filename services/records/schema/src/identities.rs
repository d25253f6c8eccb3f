use sea_orm::entity::prelude::*;

/// Authentication identity (login name, credential hash, display name).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "identities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::identity_roles::Entity")]
    IdentityRoles,
}

impl Related<super::identity_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IdentityRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
