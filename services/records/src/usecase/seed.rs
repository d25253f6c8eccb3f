use registrar_domain::id::IdentityId;
use registrar_domain::role::Role;

use crate::domain::repository::IdentityProvider;
use crate::domain::types::NewIdentity;
use crate::error::RecordsServiceError;

pub struct SeedAdminInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

pub struct SeedAdminUseCase<I> {
    pub identities: I,
}

impl<I: IdentityProvider> SeedAdminUseCase<I> {
    /// Create the bootstrap Admin identity unless one with this email exists.
    /// Returns the new identity id, or `None` when nothing was created.
    pub async fn execute(
        &self,
        input: SeedAdminInput,
    ) -> Result<Option<IdentityId>, RecordsServiceError> {
        if let Some(existing) = self.identities.find_by_email(&input.email).await? {
            tracing::debug!(identity_id = %existing.id, "admin identity already present");
            return Ok(None);
        }
        let identity = self
            .identities
            .create_identity(
                &NewIdentity {
                    username: input.email.clone(),
                    email: input.email,
                    full_name: input.full_name,
                    password: input.password,
                },
                &[Role::Admin],
            )
            .await?;
        tracing::info!(identity_id = %identity.id, "admin identity seeded");
        Ok(Some(identity.id))
    }
}
