//! Fridge Identifier
//!
//! The three fixed fridges of the household. Not a foreign object,
//! just a tag carried by every item.

use serde::{Deserialize, Serialize};

use super::entity::DomainError;

/// Nominal number of items a fridge holds. Display only.
pub const MAX_CAPACITY: u32 = 50;

/// One of the three fixed fridges (two personal, one shared)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FridgeId {
    First,
    Second,
    Shared,
}

impl FridgeId {
    pub const ALL: [FridgeId; 3] = [FridgeId::First, FridgeId::Second, FridgeId::Shared];

    pub fn number(&self) -> u8 {
        match self {
            FridgeId::First => 1,
            FridgeId::Second => 2,
            FridgeId::Shared => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(FridgeId::First),
            2 => Some(FridgeId::Second),
            3 => Some(FridgeId::Shared),
            _ => None,
        }
    }

    /// Parse a fridge number coming from a URL path or query string
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<u8>().ok().and_then(Self::from_number)
    }

    /// Title shown on cards, tables and the QR page
    pub fn title(&self) -> &'static str {
        match self {
            FridgeId::First => "Buzdolabı 1",
            FridgeId::Second => "Buzdolabı 2",
            FridgeId::Shared => "Ortak dolap",
        }
    }
}

impl Default for FridgeId {
    fn default() -> Self {
        FridgeId::First
    }
}

impl TryFrom<u8> for FridgeId {
    type Error = DomainError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| DomainError::Decode(format!("unknown fridge id {}", n)))
    }
}

impl From<FridgeId> for u8 {
    fn from(id: FridgeId) -> u8 {
        id.number()
    }
}

impl std::fmt::Display for FridgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fridge_numbers() {
        assert_eq!(FridgeId::parse("1"), Some(FridgeId::First));
        assert_eq!(FridgeId::parse(" 3 "), Some(FridgeId::Shared));
        assert_eq!(FridgeId::parse("4"), None);
        assert_eq!(FridgeId::parse("abc"), None);
    }

    #[test]
    fn test_wire_form_is_integer() {
        assert_eq!(serde_json::to_string(&FridgeId::Second).unwrap(), "2");
        let shared: FridgeId = serde_json::from_str("3").unwrap();
        assert_eq!(shared, FridgeId::Shared);
        assert!(serde_json::from_str::<FridgeId>("0").is_err());
    }

    #[test]
    fn test_titles() {
        assert_eq!(FridgeId::First.title(), "Buzdolabı 1");
        assert_eq!(FridgeId::Shared.title(), "Ortak dolap");
    }
}
