// Table Entity - seating table holding an ordered list of guest ids
//
// guest_ids are references into the guest collection, not owned copies.
// Capacity is declared, never enforced; occupancy views report overflow.

use serde::{Deserialize, Serialize};

use super::{require_text, Draft, Entity, EntityKind, Patch};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub guest_ids: Vec<String>,
}

impl Table {
    pub fn seated_count(&self) -> usize {
        self.guest_ids.len()
    }

    pub fn is_over_capacity(&self) -> bool {
        self.seated_count() > self.capacity as usize
    }

    pub fn seats(&self, guest_id: &str) -> bool {
        self.guest_ids.iter().any(|id| id == guest_id)
    }

    pub fn position_of(&self, guest_id: &str) -> Option<usize> {
        self.guest_ids.iter().position(|id| id == guest_id)
    }
}

impl Entity for Table {
    const KIND: EntityKind = EntityKind::Table;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "name", &self.name)?;
        if self.capacity < 1 {
            return Err(ValidationError::new(Self::KIND, "capacity", "Must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTable {
    pub name: String,
    pub capacity: u32,
}

impl NewTable {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        NewTable {
            name: name.into(),
            capacity,
        }
    }
}

impl Draft for NewTable {
    type Entity = Table;

    fn into_entity(self, id: String) -> Table {
        Table {
            id,
            name: self.name.trim().to_string(),
            capacity: self.capacity,
            guest_ids: Vec::new(),
        }
    }
}

/// Seat assignments are changed through the seating commands, not patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePatch {
    pub name: Option<String>,
    pub capacity: Option<u32>,
}

impl Patch for TablePatch {
    type Entity = Table;

    fn apply_to(self, table: &mut Table) {
        if let Some(name) = self.name {
            table.name = name.trim().to_string();
        }
        if let Some(capacity) = self.capacity {
            table.capacity = capacity;
        }
    }
}
