//! Staff roles and their display descriptors.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// One of the fixed staff roles that gate dashboards and actions.
///
/// Serialized as lowercase strings (`"admin"`, `"chef"`, ...). The ordering
/// follows declaration order so role sets always list admin first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum RoleId {
    Admin,
    Chef,
    Waiter,
    Cashier,
}

/// Rendering metadata for a role. Not used by the session logic itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleDescriptor {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub badge: &'static str,
}

const ADMIN: RoleDescriptor = RoleDescriptor {
    name: "Administrator",
    icon: "shield-checkmark",
    color: "#6C5CE7",
    badge: "ADMIN",
};

const CHEF: RoleDescriptor = RoleDescriptor {
    name: "Chef",
    icon: "restaurant",
    color: "#E17055",
    badge: "KITCHEN",
};

const WAITER: RoleDescriptor = RoleDescriptor {
    name: "Waiter",
    icon: "people",
    color: "#00B894",
    badge: "FLOOR",
};

const CASHIER: RoleDescriptor = RoleDescriptor {
    name: "Cashier",
    icon: "cash",
    color: "#0984E3",
    badge: "CASH",
};

impl RoleId {
    /// Stable storage form of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            RoleId::Admin => "admin",
            RoleId::Chef => "chef",
            RoleId::Waiter => "waiter",
            RoleId::Cashier => "cashier",
        }
    }

    pub fn descriptor(self) -> &'static RoleDescriptor {
        match self {
            RoleId::Admin => &ADMIN,
            RoleId::Chef => &CHEF,
            RoleId::Waiter => &WAITER,
            RoleId::Cashier => &CASHIER,
        }
    }

    /// All roles in display order.
    pub fn all() -> Vec<RoleId> {
        Self::iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_string_forms_agree() {
        for role in RoleId::all() {
            assert_eq!(role.to_string(), role.as_str());
            assert_eq!(RoleId::from_str(role.as_str()).unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(RoleId::from_str("Chef").unwrap(), RoleId::Chef);
        assert_eq!(RoleId::from_str("CASHIER").unwrap(), RoleId::Cashier);
        assert!(RoleId::from_str("manager").is_err());
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        assert_eq!(
            RoleId::all(),
            vec![RoleId::Admin, RoleId::Chef, RoleId::Waiter, RoleId::Cashier]
        );
    }

    #[test]
    fn test_descriptors_are_distinct() {
        let badges: std::collections::HashSet<_> =
            RoleId::all().into_iter().map(|r| r.descriptor().badge).collect();
        assert_eq!(badges.len(), 4);
        assert_eq!(RoleId::Admin.descriptor().name, "Administrator");
    }
}
