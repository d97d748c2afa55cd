// 🪑 Seating - move guest references between tables, plus occupancy views
//
// Tables hold guest ids in seat order. Capacity is never enforced here;
// overflow is only reported by table_occupancy().
// Every command checks all of its preconditions before touching any table.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::entities::{EntityKind, Guest, Table};
use crate::error::{StoreError, StoreResult};

fn table_index(tables: &[Table], table_id: &str) -> StoreResult<usize> {
    tables
        .iter()
        .position(|table| table.id == table_id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Table, table_id))
}

/// Table currently seating this guest, if any
pub fn table_of<'a>(tables: &'a [Table], guest_id: &str) -> Option<&'a Table> {
    tables.iter().find(|table| table.seats(guest_id))
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Drag-and-drop move: take the guest out of `from_table_id` and insert it at
/// `to_index` in `to_table_id`. The index is clamped to the destination
/// length; the same table on both sides reorders it.
pub fn move_guest(
    tables: &mut [Table],
    guest_id: &str,
    from_table_id: &str,
    to_table_id: &str,
    to_index: usize,
) -> StoreResult<()> {
    let from = table_index(tables, from_table_id)?;
    let to = table_index(tables, to_table_id)?;
    let position = tables[from]
        .position_of(guest_id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Guest, guest_id))?;

    let moved = tables[from].guest_ids.remove(position);
    let destination = &mut tables[to].guest_ids;
    let at = to_index.min(destination.len());
    destination.insert(at, moved);

    Ok(())
}

/// Put a guest who is not seated anywhere at a table. `index` None appends.
pub fn seat_guest(
    tables: &mut [Table],
    guests: &[Guest],
    table_id: &str,
    guest_id: &str,
    index: Option<usize>,
) -> StoreResult<()> {
    if !guests.iter().any(|guest| guest.id == guest_id) {
        return Err(StoreError::not_found(EntityKind::Guest, guest_id));
    }
    let target = table_index(tables, table_id)?;
    if let Some(current) = table_of(tables, guest_id) {
        return Err(StoreError::AlreadySeated {
            guest_id: guest_id.to_string(),
            table_id: current.id.clone(),
        });
    }

    let seats = &mut tables[target].guest_ids;
    let at = index.map_or(seats.len(), |i| i.min(seats.len()));
    seats.insert(at, guest_id.to_string());

    Ok(())
}

pub fn unseat_guest(tables: &mut [Table], table_id: &str, guest_id: &str) -> StoreResult<()> {
    let target = table_index(tables, table_id)?;
    let position = tables[target]
        .position_of(guest_id)
        .ok_or_else(|| StoreError::not_found(EntityKind::Guest, guest_id))?;

    tables[target].guest_ids.remove(position);
    Ok(())
}

/// Drop the guest from every table. Returns how many seats were freed.
pub fn unseat_everywhere(tables: &mut [Table], guest_id: &str) -> usize {
    let mut freed = 0;
    for table in tables.iter_mut() {
        let before = table.guest_ids.len();
        table.guest_ids.retain(|id| id != guest_id);
        freed += before - table.guest_ids.len();
    }
    freed
}

// ============================================================================
// VIEWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOccupancy {
    pub table_id: String,
    pub name: String,
    /// Seat references that resolve to an existing guest
    pub seated: usize,
    pub capacity: u32,
    pub over_capacity: bool,
}

pub fn table_occupancy(tables: &[Table], guests: &[Guest]) -> Vec<TableOccupancy> {
    let known: HashSet<&str> = guests.iter().map(|guest| guest.id.as_str()).collect();

    tables
        .iter()
        .map(|table| {
            let seated = table
                .guest_ids
                .iter()
                .filter(|id| known.contains(id.as_str()))
                .count();
            TableOccupancy {
                table_id: table.id.clone(),
                name: table.name.clone(),
                seated,
                capacity: table.capacity,
                over_capacity: seated > table.capacity as usize,
            }
        })
        .collect()
}

/// Guests not referenced by any table, in guest-list order
pub fn unseated_guests(guests: &[Guest], tables: &[Table]) -> Vec<Guest> {
    let seated: HashSet<&str> = tables
        .iter()
        .flat_map(|table| table.guest_ids.iter().map(String::as_str))
        .collect();

    guests
        .iter()
        .filter(|guest| !seated.contains(guest.id.as_str()))
        .cloned()
        .collect()
}

/// (table_id, guest_id) pairs pointing at guests that no longer exist
pub fn dangling_seat_refs(guests: &[Guest], tables: &[Table]) -> Vec<(String, String)> {
    let known: HashSet<&str> = guests.iter().map(|guest| guest.id.as_str()).collect();

    tables
        .iter()
        .flat_map(|table| {
            table
                .guest_ids
                .iter()
                .filter(|id| !known.contains(id.as_str()))
                .map(move |id| (table.id.clone(), id.clone()))
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
