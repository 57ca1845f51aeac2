//! Dashboard roles.
//!
//! The API stores roles in SCREAMING_SNAKE form (`STOCK_KEEPER`) while the
//! portal addresses dashboards by kebab-case path segments (`/stock-keeper`).
//! Both spellings parse to the same [`Role`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of roles that own a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Owner,
    Manager,
    AssistantManager,
    StockKeeper,
    Cashier,
    Supplier,
    Distributor,
    Salesman,
    Driver,
}

impl Role {
    /// Every role, in sidebar/credential listing order.
    pub const ALL: [Role; 9] = [
        Role::Owner,
        Role::Manager,
        Role::AssistantManager,
        Role::StockKeeper,
        Role::Cashier,
        Role::Supplier,
        Role::Distributor,
        Role::Salesman,
        Role::Driver,
    ];

    /// Path segment form (e.g. "assistant-manager")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::AssistantManager => "assistant-manager",
            Self::StockKeeper => "stock-keeper",
            Self::Cashier => "cashier",
            Self::Supplier => "supplier",
            Self::Distributor => "distributor",
            Self::Salesman => "salesman",
            Self::Driver => "driver",
        }
    }

    /// Dashboard path for this role (e.g. "/stock-keeper")
    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Human-readable name used in headers
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Owner => "Owner",
            Self::Manager => "Manager",
            Self::AssistantManager => "Assistant Manager",
            Self::StockKeeper => "Stock Keeper",
            Self::Cashier => "Cashier",
            Self::Supplier => "Supplier",
            Self::Distributor => "Distributor",
            Self::Salesman => "Salesman",
            Self::Driver => "Driver",
        }
    }

    /// Whether the dashboard of this role is scoped to one profile through
    /// an `?id=` query parameter.
    pub fn is_profile_scoped(&self) -> bool {
        matches!(self, Self::Driver | Self::Supplier)
    }

    /// URL a freshly logged-in user of this role lands on.
    pub fn landing_url(&self, profile_id: Option<i64>) -> String {
        match profile_id {
            Some(id) if self.is_profile_scoped() => format!("{}?id={}", self.path(), id),
            _ => self.path(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string names none of the known roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_path_and_storage_forms() {
        assert_eq!("stock-keeper".parse::<Role>(), Ok(Role::StockKeeper));
        assert_eq!("STOCK_KEEPER".parse::<Role>(), Ok(Role::StockKeeper));
        assert_eq!("assistant_manager".parse::<Role>(), Ok(Role::AssistantManager));
        assert_eq!(" Driver ".parse::<Role>(), Ok(Role::Driver));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_path_round_trips_through_from_str() {
        for role in Role::ALL {
            let segment = role.path().trim_start_matches('/').to_string();
            assert_eq!(segment.parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_landing_url_only_scopes_profile_roles() {
        assert_eq!(Role::Driver.landing_url(Some(7)), "/driver?id=7");
        assert_eq!(Role::Supplier.landing_url(Some(2)), "/supplier?id=2");
        assert_eq!(Role::Cashier.landing_url(Some(3)), "/cashier");
        assert_eq!(Role::Driver.landing_url(None), "/driver");
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Role::AssistantManager).unwrap();
        assert_eq!(json, "\"assistant-manager\"");
    }
}
