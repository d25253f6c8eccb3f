//! Mock auth helpers for integration tests.
//!
//! Services behind the gateway receive `x-registrar-identity-id` and
//! `x-registrar-roles` headers. In tests, `MockAuth` builds these headers
//! directly so no real gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use uuid::Uuid;

use registrar_auth_types::identity::{IDENTITY_ID_HEADER, ROLES_HEADER};
use registrar_domain::caller::CallerContext;
use registrar_domain::id::IdentityId;
use registrar_domain::role::Role;

/// Configurable caller injected into test requests.
pub struct MockAuth {
    pub identity_id: IdentityId,
    pub roles: Vec<Role>,
}

impl MockAuth {
    pub fn new(identity_id: IdentityId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            identity_id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn admin() -> Self {
        Self::new(IdentityId(Uuid::new_v4()), [Role::Admin])
    }

    /// The caller context the extractor should produce from [`Self::headers`].
    pub fn context(&self) -> CallerContext {
        CallerContext::new(self.identity_id, self.roles.iter().copied())
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let roles = self
            .roles
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(IDENTITY_ID_HEADER),
            HeaderValue::from_str(&self.identity_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(ROLES_HEADER),
            HeaderValue::from_str(&roles).unwrap(),
        );
        map
    }
}
