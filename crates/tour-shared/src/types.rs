//! Common types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EntityId = Uuid;

pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Role carried in the access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Tourist,
    Guide,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tourist => "Tourist",
            Role::Guide => "Guide",
            Role::Admin => "Admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "tourist" => Some(Role::Tourist),
            "guide" => Some(Role::Guide),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for date-ordered listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortOrder::Asc)
    }

    /// Lenient parse, anything but "desc" sorts ascending
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == "desc" => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_is_case_insensitive() {
        assert_eq!(Role::from_str("GUIDE"), Some(Role::Guide));
        assert_eq!(Role::from_str(Role::Admin.as_str()), Some(Role::Admin));
        assert_eq!(Role::from_str("root"), None);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }
}
