//! The identity and roles of whoever invoked an operation.

use std::collections::BTreeSet;

use crate::id::IdentityId;
use crate::role::Role;

/// Caller context passed explicitly to every use case.
///
/// Built at the transport edge from gateway headers; nothing below the handlers
/// reads caller state from anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub identity_id: IdentityId,
    pub roles: BTreeSet<Role>,
}

impl CallerContext {
    pub fn new(identity_id: IdentityId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            identity_id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// The role that decides visibility: Admin, then Teacher, then Student.
    /// `None` for a caller without any role.
    pub fn effective_role(&self) -> Option<Role> {
        // `Role`'s ordering is its precedence.
        self.roles.first().copied()
    }
}
