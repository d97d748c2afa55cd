// 🗂️ Entity Store - authoritative in-memory collections with CRUD
//
// One ordered Vec per entity type (insertion order is list order).
// Commands validate first and mutate second; a rejected command leaves the
// store exactly as it was. After every successful mutation the full snapshot
// is written through the attached adapter. A failed write does not undo the
// mutation: it is handed back in Committed::storage_error and the store stays
// marked as having unsaved changes.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::aggregates::{self, DashboardSummary};
use crate::config::PlannerConfig;
use crate::demo;
use crate::guest_csv;
use crate::entities::{
    new_id, BudgetItem, Categories, CategoryKind, CategorySet, Draft, Entity, Guest, NewGuest,
    Patch, Table, Task, Vendor,
};
use crate::error::{StorageError, StoreError, StoreResult, ValidationError};
use crate::persistence::{PersistenceAdapter, Settings, Snapshot};
use crate::seating;

// ============================================================================
// GUEST REMOVAL POLICY
// ============================================================================

/// What removing a guest does to the tables that reference it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestRemovalPolicy {
    /// Drop the guest's id from every table
    #[default]
    Cascade,
    /// Refuse while the guest is seated
    Reject,
    /// Leave the ids in place; seating views skip them
    Orphan,
}

// ============================================================================
// COMMITTED
// ============================================================================

/// Result of a mutation that was applied in memory.
/// storage_error is Some when the snapshot could not be written.
#[derive(Debug)]
#[must_use]
pub struct Committed<T> {
    pub value: T,
    pub storage_error: Option<StorageError>,
}

impl<T> Committed<T> {
    fn unchanged(value: T) -> Self {
        Committed {
            value,
            storage_error: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.storage_error.is_none()
    }

    /// Keep the value, drop the storage outcome
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Treat a failed write as an error (the in-memory change still stands)
    pub fn persisted(self) -> Result<T, StorageError> {
        match self.storage_error {
            None => Ok(self.value),
            Some(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub added: usize,
    pub updated: usize,
    /// Rows that failed validation (no name, zero invited)
    pub skipped: usize,
}

// ============================================================================
// COLLECTION ACCESS
// ============================================================================

mod sealed {
    use super::*;

    pub trait Collection: Entity + Sized {
        fn records(store: &EntityStore) -> &Vec<Self>;
        fn records_mut(store: &mut EntityStore) -> &mut Vec<Self>;

        /// Category this record files under, registered on add/update
        fn category(&self) -> Option<(CategoryKind, &str)> {
            None
        }

        /// Runs after the id is known to exist, before the record is removed
        fn before_remove(_store: &mut EntityStore, _id: &str) -> StoreResult<()> {
            Ok(())
        }
    }
}

/// Entity types the store keeps a collection of
pub trait Stored: sealed::Collection {}

impl<T: sealed::Collection> Stored for T {}

impl sealed::Collection for Guest {
    fn records(store: &EntityStore) -> &Vec<Self> {
        &store.guests
    }

    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.guests
    }

    fn before_remove(store: &mut EntityStore, id: &str) -> StoreResult<()> {
        match store.removal_policy {
            GuestRemovalPolicy::Cascade => {
                let freed = seating::unseat_everywhere(&mut store.tables, id);
                if freed > 0 {
                    debug!("Unseated guest {} from {} table(s)", id, freed);
                }
                Ok(())
            }
            GuestRemovalPolicy::Reject => match seating::table_of(&store.tables, id) {
                Some(table) => Err(StoreError::GuestSeated {
                    guest_id: id.to_string(),
                    table_id: table.id.clone(),
                }),
                None => Ok(()),
            },
            GuestRemovalPolicy::Orphan => Ok(()),
        }
    }
}

impl sealed::Collection for BudgetItem {
    fn records(store: &EntityStore) -> &Vec<Self> {
        &store.budget_items
    }

    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.budget_items
    }

    fn category(&self) -> Option<(CategoryKind, &str)> {
        Some((CategoryKind::Budget, &self.category))
    }
}

impl sealed::Collection for Vendor {
    fn records(store: &EntityStore) -> &Vec<Self> {
        &store.vendors
    }

    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.vendors
    }

    fn category(&self) -> Option<(CategoryKind, &str)> {
        Some((CategoryKind::Vendor, &self.category))
    }
}

impl sealed::Collection for Task {
    fn records(store: &EntityStore) -> &Vec<Self> {
        &store.tasks
    }

    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.tasks
    }

    fn category(&self) -> Option<(CategoryKind, &str)> {
        Some((CategoryKind::Task, &self.category))
    }
}

impl sealed::Collection for Table {
    fn records(store: &EntityStore) -> &Vec<Self> {
        &store.tables
    }

    fn records_mut(store: &mut EntityStore) -> &mut Vec<Self> {
        &mut store.tables
    }
}

// ============================================================================
// ENTITY STORE
// ============================================================================

pub struct EntityStore {
    guests: Vec<Guest>,
    budget_items: Vec<BudgetItem>,
    vendors: Vec<Vendor>,
    tasks: Vec<Task>,
    tables: Vec<Table>,
    categories: Categories,
    total_budget: f64,
    removal_policy: GuestRemovalPolicy,
    adapter: Option<Box<dyn PersistenceAdapter>>,
    unsaved: bool,
}

impl EntityStore {
    /// Empty store with no persistence
    pub fn new() -> Self {
        EntityStore {
            guests: Vec::new(),
            budget_items: Vec::new(),
            vendors: Vec::new(),
            tasks: Vec::new(),
            tables: Vec::new(),
            categories: Categories::default(),
            total_budget: 0.0,
            removal_policy: GuestRemovalPolicy::default(),
            adapter: None,
            unsaved: false,
        }
    }

    /// Store holding the snapshot's records. Rejected if any record fails
    /// validation or an id repeats within a collection.
    pub fn from_snapshot(snapshot: Snapshot) -> StoreResult<Self> {
        check_snapshot(&snapshot)?;
        let mut store = Self::new();
        store.replace_state(snapshot);
        Ok(store)
    }

    /// Load whatever the adapter holds (or start empty) and keep the adapter
    /// for subsequent saves. A saved snapshot that fails validation is an
    /// error, not a partially loaded store.
    pub fn open(adapter: Box<dyn PersistenceAdapter>) -> StoreResult<Self> {
        let label = adapter.describe();
        let mut store = match adapter.load()? {
            Some(snapshot) => {
                info!(
                    "Loaded snapshot from {} ({} records)",
                    label,
                    snapshot.record_count()
                );
                Self::from_snapshot(snapshot).map_err(|err| {
                    warn!("Saved snapshot in {} is invalid: {}", label, err);
                    err
                })?
            }
            None => {
                info!("No snapshot in {}, starting empty", label);
                Self::new()
            }
        };
        store.adapter = Some(adapter);
        Ok(store)
    }

    /// Attach an adapter without loading from it
    pub fn with_adapter(mut self, adapter: Box<dyn PersistenceAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn with_removal_policy(mut self, policy: GuestRemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    pub fn set_removal_policy(&mut self, policy: GuestRemovalPolicy) {
        self.removal_policy = policy;
    }

    pub fn removal_policy(&self) -> GuestRemovalPolicy {
        self.removal_policy
    }

    /// Apply config-driven setup: removal policy, default categories, and the
    /// total budget when none is set yet. Saves only if something changed.
    pub fn apply_config(&mut self, config: &PlannerConfig) -> Committed<()> {
        self.removal_policy = config.guest_removal_policy;

        let mut changed = false;
        let defaults = [
            (CategoryKind::Budget, &config.default_budget_categories),
            (CategoryKind::Vendor, &config.default_vendor_categories),
            (CategoryKind::Task, &config.default_task_categories),
        ];
        for (kind, names) in defaults {
            for name in names.iter().filter(|n| !n.trim().is_empty()) {
                changed |= self.categories.get_mut(kind).insert(name.trim());
            }
        }

        if let Some(budget) = config.total_budget {
            if self.total_budget == 0.0 && budget > 0.0 {
                self.total_budget = budget;
                changed = true;
            }
        }

        if changed {
            self.commit(())
        } else {
            Committed::unchanged(())
        }
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            guests: self.guests.clone(),
            budget_items: self.budget_items.clone(),
            vendors: self.vendors.clone(),
            tasks: self.tasks.clone(),
            tables: self.tables.clone(),
            categories: self.categories.clone(),
            settings: Settings {
                total_budget: self.total_budget,
            },
        }
    }

    /// Replace every collection with the snapshot's and save.
    /// An invalid snapshot is rejected and the store is left as it was.
    pub fn restore(&mut self, snapshot: Snapshot) -> StoreResult<Committed<()>> {
        check_snapshot(&snapshot)?;
        self.replace_state(snapshot);
        Ok(self.commit(()))
    }

    /// Replace the current contents with the sample wedding
    pub fn load_demo(&mut self) -> StoreResult<Committed<()>> {
        info!("Loading demo wedding data");
        self.restore(demo::snapshot())
    }

    fn replace_state(&mut self, snapshot: Snapshot) {
        self.guests = snapshot.guests;
        self.budget_items = snapshot.budget_items;
        self.vendors = snapshot.vendors;
        self.tasks = snapshot.tasks;
        self.tables = snapshot.tables;
        self.categories = snapshot.categories;
        self.total_budget = snapshot.settings.total_budget;
    }

    // ========================================================================
    // GENERIC CRUD
    // ========================================================================

    pub fn add<D>(&mut self, draft: D) -> StoreResult<Committed<D::Entity>>
    where
        D: Draft,
        D::Entity: Stored,
    {
        let record = draft.into_entity(new_id());
        record.validate()?;

        self.register_category(&record);
        <D::Entity as sealed::Collection>::records_mut(self).push(record.clone());
        debug!("Added {} {}", <D::Entity as Entity>::KIND, record.id());

        Ok(self.commit(record))
    }

    pub fn update<P>(&mut self, id: &str, patch: P) -> StoreResult<Committed<P::Entity>>
    where
        P: Patch,
        P::Entity: Stored,
    {
        let index = self.index_of::<P::Entity>(id)?;

        let mut updated = <P::Entity as sealed::Collection>::records(self)[index].clone();
        patch.apply_to(&mut updated);
        updated.validate()?;

        self.register_category(&updated);
        <P::Entity as sealed::Collection>::records_mut(self)[index] = updated.clone();
        debug!("Updated {} {}", <P::Entity as Entity>::KIND, id);

        Ok(self.commit(updated))
    }

    pub fn remove<T: Stored>(&mut self, id: &str) -> StoreResult<Committed<T>> {
        let index = self.index_of::<T>(id)?;
        T::before_remove(self, id)?;

        let removed = T::records_mut(self).remove(index);
        debug!("Removed {} {}", T::KIND, id);

        Ok(self.commit(removed))
    }

    /// Records in insertion order
    pub fn list<T: Stored>(&self) -> &[T] {
        T::records(self)
    }

    pub fn get<T: Stored>(&self, id: &str) -> Option<&T> {
        T::records(self).iter().find(|record| record.id() == id)
    }

    fn index_of<T: Stored>(&self, id: &str) -> StoreResult<usize> {
        T::records(self)
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    fn register_category<T: Stored>(&mut self, record: &T) {
        if let Some((kind, name)) = record.category() {
            if !name.trim().is_empty() && self.categories.get_mut(kind).insert(name) {
                debug!("Registered {} category {:?}", kind, name);
            }
        }
    }

    pub fn guests(&self) -> &[Guest] {
        &self.guests
    }

    pub fn budget_items(&self) -> &[BudgetItem] {
        &self.budget_items
    }

    pub fn vendors(&self) -> &[Vendor] {
        &self.vendors
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    // ========================================================================
    // CATEGORIES & SETTINGS
    // ========================================================================

    pub fn categories(&self, kind: CategoryKind) -> &CategorySet {
        self.categories.get(kind)
    }

    /// Insert a category name. Ok(false) for an exact duplicate (nothing saved).
    pub fn add_category(&mut self, kind: CategoryKind, name: &str) -> StoreResult<Committed<bool>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("Category", "name", "Required field is empty").into());
        }

        if !self.categories.get_mut(kind).insert(name) {
            return Ok(Committed::unchanged(false));
        }
        debug!("Added {} category {:?}", kind, name);
        Ok(self.commit(true))
    }

    pub fn total_budget(&self) -> f64 {
        self.total_budget
    }

    pub fn set_total_budget(&mut self, amount: f64) -> StoreResult<Committed<f64>> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ValidationError::new(
                "Settings",
                "total_budget",
                format!("Must be a non-negative number, got {}", amount),
            )
            .into());
        }
        self.total_budget = amount;
        Ok(self.commit(amount))
    }

    /// Dashboard numbers for the current contents
    pub fn summary(&self) -> DashboardSummary {
        aggregates::dashboard_summary(
            &self.guests,
            &self.tasks,
            &self.budget_items,
            &self.vendors,
            self.total_budget,
        )
    }

    // ========================================================================
    // GUEST IMPORT
    // ========================================================================

    /// Merge imported rows: a row whose (name ignoring case, phone) matches an
    /// existing guest overwrites that guest in place, keeping its id; any
    /// other row is appended. Rows are applied in order, so a later row can
    /// update one appended earlier in the same batch. One save at the end.
    pub fn import_guests<I>(&mut self, rows: I) -> Committed<ImportReport>
    where
        I: IntoIterator<Item = NewGuest>,
    {
        let mut report = ImportReport::default();

        for row in rows {
            let mut candidate = row.into_entity(new_id());
            if let Err(err) = candidate.validate() {
                debug!("Skipping import row: {}", err);
                report.skipped += 1;
                continue;
            }

            let existing = self
                .guests
                .iter()
                .position(|g| g.same_party(&candidate.full_name, &candidate.phone_number));

            match existing {
                Some(index) => {
                    candidate.id = self.guests[index].id.clone();
                    self.guests[index] = candidate;
                    report.updated += 1;
                }
                None => {
                    self.guests.push(candidate);
                    report.added += 1;
                }
            }
        }

        info!(
            "Guest import: {} added, {} updated, {} skipped",
            report.added, report.updated, report.skipped
        );

        if report.added + report.updated > 0 {
            self.commit(report)
        } else {
            Committed::unchanged(report)
        }
    }

    /// Read a guest sheet and merge it. A sheet that fails to parse changes
    /// nothing.
    pub fn import_guest_csv<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> StoreResult<Committed<ImportReport>> {
        let rows = guest_csv::load_guest_csv(path)?;
        Ok(self.import_guests(rows))
    }

    // ========================================================================
    // SEATING
    // ========================================================================

    pub fn move_guest(
        &mut self,
        guest_id: &str,
        from_table_id: &str,
        to_table_id: &str,
        to_index: usize,
    ) -> StoreResult<Committed<()>> {
        seating::move_guest(&mut self.tables, guest_id, from_table_id, to_table_id, to_index)?;
        debug!("Moved guest {} from {} to {}", guest_id, from_table_id, to_table_id);
        Ok(self.commit(()))
    }

    pub fn seat_guest(
        &mut self,
        table_id: &str,
        guest_id: &str,
        index: Option<usize>,
    ) -> StoreResult<Committed<()>> {
        seating::seat_guest(&mut self.tables, &self.guests, table_id, guest_id, index)?;
        Ok(self.commit(()))
    }

    pub fn unseat_guest(&mut self, table_id: &str, guest_id: &str) -> StoreResult<Committed<()>> {
        seating::unseat_guest(&mut self.tables, table_id, guest_id)?;
        Ok(self.commit(()))
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Write the current snapshot again (e.g. after a failed save)
    pub fn save(&mut self) -> Result<(), StorageError> {
        self.persist()
    }

    /// Empty every collection and wipe the adapter's copy
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.replace_state(Snapshot::default());

        if let Some(adapter) = &self.adapter {
            if let Err(err) = adapter.clear() {
                warn!("Failed to clear {}: {}", adapter.describe(), err);
                self.unsaved = true;
                return Err(err);
            }
        }
        self.unsaved = false;
        Ok(())
    }

    fn commit<T>(&mut self, value: T) -> Committed<T> {
        Committed {
            value,
            storage_error: self.persist().err(),
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let result = match &self.adapter {
            None => Ok(()),
            Some(adapter) => adapter.save(&self.snapshot()).map_err(|err| {
                warn!("Snapshot not saved to {}: {}", adapter.describe(), err);
                err
            }),
        };
        self.unsaved = result.is_err();
        result
    }
}

// ============================================================================
// SNAPSHOT CHECKS
// ============================================================================

fn check_records<T: Entity>(records: &[T]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for record in records {
        if record.id().trim().is_empty() {
            return Err(ValidationError::required(T::KIND, "id"));
        }
        record.validate()?;
        if !seen.insert(record.id()) {
            return Err(ValidationError::new(
                T::KIND,
                "id",
                format!("Duplicate id {}", record.id()),
            ));
        }
    }
    Ok(())
}

/// Same rules as the add/update commands, applied to a whole snapshot
fn check_snapshot(snapshot: &Snapshot) -> Result<(), ValidationError> {
    check_records(&snapshot.guests)?;
    check_records(&snapshot.budget_items)?;
    check_records(&snapshot.vendors)?;
    check_records(&snapshot.tasks)?;
    check_records(&snapshot.tables)?;

    for kind in [CategoryKind::Budget, CategoryKind::Vendor, CategoryKind::Task] {
        if snapshot.categories.get(kind).iter().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::new("Category", "name", "Required field is empty"));
        }
    }

    let total = snapshot.settings.total_budget;
    if !total.is_finite() || total < 0.0 {
        return Err(ValidationError::new(
            "Settings",
            "total_budget",
            format!("Must be a non-negative number, got {}", total),
        ));
    }
    Ok(())
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStore")
            .field("guests", &self.guests.len())
            .field("budget_items", &self.budget_items.len())
            .field("vendors", &self.vendors.len())
            .field("tasks", &self.tasks.len())
            .field("tables", &self.tables.len())
            .field("total_budget", &self.total_budget)
            .field("removal_policy", &self.removal_policy)
            .field("adapter", &self.adapter.as_ref().map(|a| a.describe()))
            .field("unsaved", &self.unsaved)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
