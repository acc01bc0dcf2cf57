//! User roles and the role-eligibility table.

use serde::{Deserialize, Serialize};

/// Roles a user can hold. Persisted as independent flags on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seller,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Seller, Role::Admin];

    /// Parse a wire-format role name. Returns `None` for unknown names;
    /// callers filter those out rather than erroring.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "seller" => Some(Self::Seller),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

/// A user's current role flags, as persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub seller: bool,
    pub admin: bool,
}

impl RoleFlags {
    pub fn holds(self, role: Role) -> bool {
        match role {
            Role::Seller => self.seller,
            Role::Admin => self.admin,
        }
    }

    /// Flags corresponding to exactly the given role set.
    pub fn from_set(set: &[Role]) -> Self {
        Self {
            seller: set.contains(&Role::Seller),
            admin: set.contains(&Role::Admin),
        }
    }

    /// The held roles as a wire-format list.
    pub fn roles(self) -> Vec<Role> {
        Role::ALL.into_iter().filter(|r| self.holds(*r)).collect()
    }
}

/// Role-eligibility table: whether `candidate` may be granted to a user whose
/// current flags are `current`.
///
/// The rule is directional, not symmetric: holding `admin` bars the seller
/// grant, while any user may be promoted to `admin`.
pub fn eligible(current: RoleFlags, candidate: Role) -> bool {
    match candidate {
        Role::Seller => !current.admin,
        Role::Admin => true,
    }
}
