//! Role-based authorization applied uniformly at the API boundary.

use uuid::Uuid;

use crate::errors::{ShopError, ShopResult};
use crate::models::Role;

/// Privileged operations. Every one of them is admin-only today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageCatalog,
    ManageOrders,
    ManageUsers,
    ViewStats,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManageCatalog => "manage catalog",
            Self::ManageOrders => "manage orders",
            Self::ManageUsers => "manage users",
            Self::ViewStats => "view stats",
        }
    }
}

impl Role {
    pub fn grants(self, _capability: Capability) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require(&self, capability: Capability) -> ShopResult<()> {
        if self.role.grants(capability) {
            Ok(())
        } else {
            Err(ShopError::Forbidden(format!(
                "{} requires the admin role",
                capability.as_str()
            )))
        }
    }

    /// Per-user resources: the owner or anyone who may manage `capability`.
    pub fn require_owner_or(&self, owner: Uuid, capability: Capability) -> ShopResult<()> {
        if self.user_id == owner {
            return Ok(());
        }
        self.require(capability)
    }
}
