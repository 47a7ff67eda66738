//! Account roles.

use serde::{Deserialize, Serialize};

/// Account role with different dashboard surfaces.
///
/// Admins are stored in the same user table as everyone else, marked with
/// `Role::Admin`, rather than in a separate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses the catalog, manages a cart and wishlist, places orders.
    #[default]
    Customer,
    /// Lists books for sale and fulfills received orders.
    Seller,
    /// Full access to users, books, orders, and analytics.
    Admin,
}

impl Role {
    /// Returns `true` for admin accounts.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns `true` for seller accounts.
    #[must_use]
    pub const fn is_seller(self) -> bool {
        matches!(self, Self::Seller)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Seller => write!(f, "seller"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_display_from_str() {
        for role in [Role::Customer, Role::Seller, Role::Admin] {
            let parsed: Role = role.to_string().parse().expect("parse role");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_default_is_customer() {
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_invalid_role() {
        assert!("superuser".parse::<Role>().is_err());
    }
}
