//! Identity provider backed by the `identities` and `identity_roles` tables.

use std::collections::BTreeSet;

use anyhow::Context as _;
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, TransactionError, TransactionTrait, sea_query::Expr, sea_query::OnConflict,
};
use validator::ValidateEmail as _;

use registrar_core::sea_ext::DbErrExt as _;
use registrar_domain::id::IdentityId;
use registrar_domain::role::Role;
use registrar_records_schema::{identities, identity_roles};

use crate::domain::repository::IdentityProvider;
use crate::domain::types::{AuthIdentity, NewIdentity};
use crate::error::IdentityError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Credential rules that need no database lookup. Every violation is reported.
pub fn policy_violations(new: &NewIdentity) -> Vec<String> {
    let mut reasons = Vec::new();
    if new.username.trim().is_empty() {
        reasons.push("username is required".to_owned());
    }
    if !new.email.validate_email() {
        reasons.push("email is invalid".to_owned());
    }
    if new.full_name.trim().is_empty() {
        reasons.push("full name is required".to_owned());
    }
    if new.password.chars().count() < MIN_PASSWORD_LEN {
        reasons.push(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    reasons
}

/// Argon2id hash in PHC string format.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

#[derive(Clone)]
pub struct DbIdentityProvider {
    pub db: DatabaseConnection,
}

impl DbIdentityProvider {
    async fn taken(&self, new: &NewIdentity) -> Result<Vec<String>, IdentityError> {
        let mut reasons = Vec::new();
        let by_username = identities::Entity::find()
            .filter(identities::Column::Username.eq(new.username.trim()))
            .one(&self.db)
            .await
            .context("find identity by username")?;
        if by_username.is_some() {
            reasons.push(format!("username '{}' is already taken", new.username.trim()));
        }
        let by_email = identities::Entity::find()
            .filter(identities::Column::Email.eq(new.email.trim()))
            .one(&self.db)
            .await
            .context("find identity by email")?;
        if by_email.is_some() {
            reasons.push(format!("email '{}' is already taken", new.email.trim()));
        }
        Ok(reasons)
    }

    async fn load_roles(&self, id: uuid::Uuid) -> Result<BTreeSet<Role>, IdentityError> {
        let rows = identity_roles::Entity::find()
            .filter(identity_roles::Column::IdentityId.eq(id))
            .all(&self.db)
            .await
            .context("load identity roles")?;
        let roles = rows
            .iter()
            .map(|row| row.role.parse::<Role>())
            .collect::<Result<BTreeSet<_>, _>>()
            .context("stored identity role")?;
        Ok(roles)
    }

    async fn with_roles(
        &self,
        model: Option<identities::Model>,
    ) -> Result<Option<AuthIdentity>, IdentityError> {
        let Some(model) = model else {
            return Ok(None);
        };
        let roles = self.load_roles(model.id).await?;
        Ok(Some(AuthIdentity {
            id: IdentityId(model.id),
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            roles,
        }))
    }
}

impl IdentityProvider for DbIdentityProvider {
    async fn create_identity(
        &self,
        new: &NewIdentity,
        roles: &[Role],
    ) -> Result<AuthIdentity, IdentityError> {
        let mut reasons = policy_violations(new);
        if !new.username.trim().is_empty() {
            reasons.extend(self.taken(new).await?);
        }
        if !reasons.is_empty() {
            return Err(IdentityError::Rejected(reasons));
        }

        let password = new.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .context("join password hashing task")??;

        let identity = identities::ActiveModel {
            id: Set(IdentityId::new().0),
            username: Set(new.username.trim().to_owned()),
            email: Set(new.email.trim().to_owned()),
            full_name: Set(new.full_name.trim().to_owned()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
        };
        let role_names: Vec<&'static str> = roles.iter().map(|r| r.as_str()).collect();

        let result = self
            .db
            .transaction::<_, identities::Model, DbErr>(|txn| {
                Box::pin(async move {
                    let model = identity.insert(txn).await?;
                    for role in role_names {
                        identity_roles::ActiveModel {
                            identity_id: Set(model.id),
                            role: Set(role.to_owned()),
                        }
                        .insert(txn)
                        .await?;
                    }
                    Ok(model)
                })
            })
            .await;
        let model = match result {
            Ok(model) => model,
            // Lost a race with a concurrent registration.
            Err(TransactionError::Transaction(e)) if e.is_unique_violation() => {
                return Err(IdentityError::Rejected(vec![
                    "username or email is already taken".to_owned(),
                ]));
            }
            Err(e) => return Err(anyhow::Error::new(e).context("create identity").into()),
        };

        tracing::info!(identity_id = %model.id, username = %model.username, "identity created");
        Ok(AuthIdentity {
            id: IdentityId(model.id),
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            roles: roles.iter().copied().collect(),
        })
    }

    async fn assign_role(&self, id: IdentityId, role: Role) -> Result<(), IdentityError> {
        let exists = identities::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find identity")?
            .is_some();
        if !exists {
            return Err(IdentityError::NotFound);
        }
        let row = identity_roles::ActiveModel {
            identity_id: Set(id.0),
            role: Set(role.as_str().to_owned()),
        };
        identity_roles::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    identity_roles::Column::IdentityId,
                    identity_roles::Column::Role,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("assign role")?;
        tracing::info!(identity_id = %id, role = %role, "role assigned");
        Ok(())
    }

    async fn delete_identity(&self, id: IdentityId) -> Result<(), IdentityError> {
        let deleted = self
            .db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move {
                    identity_roles::Entity::delete_many()
                        .filter(identity_roles::Column::IdentityId.eq(id.0))
                        .exec(txn)
                        .await?;
                    let result = identities::Entity::delete_by_id(id.0).exec(txn).await?;
                    Ok(result.rows_affected)
                })
            })
            .await
            .context("delete identity")?;
        if deleted == 0 {
            return Err(IdentityError::NotFound);
        }
        tracing::info!(identity_id = %id, "identity deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<AuthIdentity>, IdentityError> {
        let model = identities::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find identity by id")?;
        self.with_roles(model).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AuthIdentity>, IdentityError> {
        let model = identities::Entity::find()
            .filter(identities::Column::Email.eq(email.trim()))
            .one(&self.db)
            .await
            .context("find identity by email")?;
        self.with_roles(model).await
    }

    async fn update_full_name(&self, id: IdentityId, full_name: &str) -> Result<(), IdentityError> {
        let result = identities::Entity::update_many()
            .col_expr(
                identities::Column::FullName,
                Expr::value(full_name.trim().to_owned()),
            )
            .filter(identities::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("update identity full name")?;
        if result.rows_affected == 0 {
            return Err(IdentityError::NotFound);
        }
        Ok(())
    }
}
