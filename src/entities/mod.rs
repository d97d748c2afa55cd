// Entity Models
//
// Every record type follows the same shape:
// - Stable identity (UUID v4) assigned by the store, never by the caller
// - A Draft (the "partial" a form submits) that fills defaults on add
// - A Patch whose Some(..) fields are merged over the record on update
// - validate() run at the store boundary, before anything is mutated

pub mod budget;
pub mod category;
pub mod guest;
pub mod table;
pub mod task;
pub mod vendor;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

pub use budget::{BudgetItem, BudgetPatch, NewBudgetItem};
pub use category::{Categories, CategoryKind, CategorySet};
pub use guest::{Guest, GuestPatch, NewGuest, Relation, Rsvp};
pub use table::{NewTable, Table, TablePatch};
pub use task::{NewTask, Task, TaskPatch};
pub use vendor::{NewVendor, Vendor, VendorPatch};

// ============================================================================
// ENTITY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Guest,
    BudgetItem,
    Vendor,
    Task,
    Table,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Guest => "Guest",
            EntityKind::BudgetItem => "BudgetItem",
            EntityKind::Vendor => "Vendor",
            EntityKind::Task => "Task",
            EntityKind::Table => "Table",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TRAITS
// ============================================================================

/// A record owned by one of the store's collections
pub trait Entity: Clone + fmt::Debug {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Field-level checks; the store rejects the command when this fails
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Partial record submitted by an add command
pub trait Draft {
    type Entity: Entity;

    /// Fill defaults and attach the freshly generated id.
    /// The result is validated by the store, not here.
    fn into_entity(self, id: String) -> Self::Entity;
}

/// Partial update submitted by an edit command
pub trait Patch {
    type Entity: Entity;

    fn apply_to(self, record: &mut Self::Entity);
}

/// Fresh identity for a new record
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn require_text(
    kind: EntityKind,
    field: &str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(kind, field));
    }
    Ok(())
}

pub(crate) fn require_amount(
    kind: EntityKind,
    field: &str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(kind, field, "Must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::negative(kind, field, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique_under_rapid_succession() {
        let ids: std::collections::HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_require_text_rejects_blank() {
        assert!(require_text(EntityKind::Guest, "full_name", "   ").is_err());
        assert!(require_text(EntityKind::Guest, "full_name", "Dana").is_ok());
    }

    #[test]
    fn test_require_amount() {
        assert!(require_amount(EntityKind::BudgetItem, "planned", 0.0).is_ok());
        assert!(require_amount(EntityKind::BudgetItem, "planned", -1.0).is_err());
        assert!(require_amount(EntityKind::BudgetItem, "planned", f64::NAN).is_err());
    }
}
