//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use registrar_domain::caller::CallerContext;
use registrar_domain::id::IdentityId;
use registrar_domain::role::Role;

pub const IDENTITY_ID_HEADER: &str = "x-registrar-identity-id";
pub const ROLES_HEADER: &str = "x-registrar-roles";

/// Caller identity injected by the gateway via `x-registrar-identity-id` and
/// `x-registrar-roles` (comma-separated role names, may be empty).
///
/// Returns 401 if the identity id is absent or not a UUID, or if a role name is
/// unknown. Role enforcement (403) is done by use cases after extraction.
#[derive(Debug, Clone)]
pub struct CallerHeaders(pub CallerContext);

impl CallerHeaders {
    pub fn into_context(self) -> CallerContext {
        self.0
    }
}

fn parse_roles(raw: &str) -> Option<Vec<Role>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Role>().ok())
        .collect()
}

impl<S> FromRequestParts<S> for CallerHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`; extract synchronously
    // and return a 'static async block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity_id = parts
            .headers
            .get(IDENTITY_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok());

        let roles = match parts.headers.get(ROLES_HEADER) {
            None => Some(Vec::new()),
            Some(v) => v.to_str().ok().and_then(parse_roles),
        };

        async move {
            let identity_id = identity_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let roles = roles.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self(CallerContext::new(IdentityId(identity_id), roles)))
        }
    }
}
