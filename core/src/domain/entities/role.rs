//! Privilege levels of the marketplace.

use serde::{Deserialize, Serialize};

/// Ordered privilege level of an identity.
///
/// Variants are declared from least to most privileged, so the derived `Ord`
/// gives `Buyer < Owner < Agent < Agency < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browses and enquires about listings
    Buyer,
    /// Lists their own property
    Owner,
    /// Manages listings on behalf of owners
    Agent,
    /// Administers an agency and its agents
    Agency,
    /// Platform administrator
    Admin,
}

impl Role {
    /// Every role, least privileged first
    pub const ALL: [Role; 5] = [Role::Buyer, Role::Owner, Role::Agent, Role::Agency, Role::Admin];

    /// Numeric privilege level, starting at 1 for `Buyer`
    pub fn level(self) -> u8 {
        match self {
            Role::Buyer => 1,
            Role::Owner => 2,
            Role::Agent => 3,
            Role::Agency => 4,
            Role::Admin => 5,
        }
    }

    /// Whether this role satisfies a minimum required role
    pub fn at_least(self, required: Role) -> bool {
        self >= required
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Owner => "owner",
            Role::Agent => "agent",
            Role::Agency => "agency",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buyer" => Ok(Role::Buyer),
            "owner" => Ok(Role::Owner),
            "agent" => Ok(Role::Agent),
            "agency" => Ok(Role::Agency),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}
