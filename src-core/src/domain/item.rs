//! Fridge Item Entity
//!
//! One perishable entry in one of the fridges. Items are created and
//! deleted, never updated.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{DomainError, Entity};
use super::fridge::FridgeId;

/// Where on the shelf an item sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    #[default]
    Left,
    Center,
    Right,
}

impl Position {
    pub const ALL: [Position; 3] = [Position::Left, Position::Center, Position::Right];

    pub fn index(&self) -> u8 {
        match self {
            Position::Left => 0,
            Position::Center => 1,
            Position::Right => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Left => "Sol",
            Position::Center => "Orta",
            Position::Right => "Sağ",
        }
    }
}

impl TryFrom<u8> for Position {
    type Error = DomainError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Position::Left),
            1 => Ok(Position::Center),
            2 => Ok(Position::Right),
            _ => Err(DomainError::Decode(format!("unknown shelf position {}", n))),
        }
    }
}

impl From<Position> for u8 {
    fn from(p: Position) -> u8 {
        p.index()
    }
}

/// A stored fridge item (matches the `fridge_items` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FridgeItem {
    /// Assigned by the store
    pub id: Uuid,
    pub fridge_id: FridgeId,
    pub name: String,
    /// Canonical `yyyy-mm-dd` on the wire
    pub expiration_date: NaiveDate,
    pub is_common_use: bool,
    pub location_shelf: u32,
    pub location_position: Position,
    pub added_by: String,
    /// Assigned by the store, only used for ordering
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for FridgeItem {
    type Id = Uuid;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Insert payload: everything the store does not assign itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFridgeItem {
    pub fridge_id: FridgeId,
    pub name: String,
    pub expiration_date: NaiveDate,
    pub is_common_use: bool,
    pub location_shelf: u32,
    pub location_position: Position,
    pub added_by: String,
}

impl NewFridgeItem {
    /// Attach the store-assigned fields
    pub fn into_item(self, id: Uuid, created_at: DateTime<Utc>) -> FridgeItem {
        FridgeItem {
            id,
            fridge_id: self.fridge_id,
            name: self.name,
            expiration_date: self.expiration_date,
            is_common_use: self.is_common_use,
            location_shelf: self.location_shelf,
            location_position: self.location_position,
            added_by: self.added_by,
            created_at: Some(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_store_row() {
        let row = r#"{
            "id": "6f1c1a52-4a8e-4a43-9a55-0f2b8d8a6b11",
            "fridge_id": 3,
            "name": "Yoğurt",
            "expiration_date": "2024-01-15",
            "is_common_use": true,
            "location_shelf": 2,
            "location_position": 1,
            "added_by": "Ayşe",
            "created_at": "2024-01-10T08:30:00.123456+00:00"
        }"#;
        let item: FridgeItem = serde_json::from_str(row).unwrap();
        assert_eq!(item.fridge_id, FridgeId::Shared);
        assert_eq!(item.expiration_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(item.location_position, Position::Center);
        assert!(item.created_at.is_some());
    }

    #[test]
    fn test_null_created_at() {
        let row = r#"{"id":"6f1c1a52-4a8e-4a43-9a55-0f2b8d8a6b11","fridge_id":1,"name":"Süt",
            "expiration_date":"2024-02-01","is_common_use":false,"location_shelf":1,
            "location_position":0,"added_by":"Mehmet","created_at":null}"#;
        let item: FridgeItem = serde_json::from_str(row).unwrap();
        assert_eq!(item.created_at, None);
    }

    #[test]
    fn test_rejects_unknown_position() {
        let row = r#"{"id":"6f1c1a52-4a8e-4a43-9a55-0f2b8d8a6b11","fridge_id":1,"name":"Süt",
            "expiration_date":"2024-02-01","is_common_use":false,"location_shelf":1,
            "location_position":7,"added_by":"Mehmet"}"#;
        assert!(serde_json::from_str::<FridgeItem>(row).is_err());
    }

    #[test]
    fn test_insert_payload_shape() {
        let new_item = NewFridgeItem {
            fridge_id: FridgeId::Second,
            name: "Peynir".to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            is_common_use: false,
            location_shelf: 3,
            location_position: Position::Right,
            added_by: "Ali".to_string(),
        };
        let json = serde_json::to_value(&new_item).unwrap();
        assert_eq!(json["fridge_id"], 2);
        assert_eq!(json["expiration_date"], "2024-03-09");
        assert_eq!(json["location_position"], 2);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_position_labels() {
        let labels: Vec<_> = Position::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["Sol", "Orta", "Sağ"]);
    }
}
