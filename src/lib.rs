// Wedding Planner - Core Library
// Entity store, derivations, seating and persistence used by the CLI and tests

pub mod aggregates; // Derivation Engine - totals, percentages, breakdowns
pub mod config;
pub mod db; // SQLite snapshot adapter + event log
pub mod demo;
pub mod entities;
pub mod error;
pub mod filters;
pub mod guest_csv;
pub mod persistence;
pub mod seating;
pub mod store;

// Re-export commonly used types
pub use aggregates::{
    budget_totals, category_breakdown, chart_series, dashboard_summary, deposit_progress,
    guest_totals, percentage, remaining_budget, task_progress, total_expenses, BudgetTotals,
    CategoryTotal, ChartSlice, DashboardSummary, GuestTotals, Progress,
};
pub use config::PlannerConfig;
pub use db::{Event, SqliteAdapter};
pub use entities::{
    BudgetItem, BudgetPatch, CategoryKind, CategorySet, EntityKind, Guest, GuestPatch,
    NewBudgetItem, NewGuest, NewTable, NewTask, NewVendor, Relation, Rsvp, Table, TablePatch,
    Task, TaskPatch, Vendor, VendorPatch,
};
pub use error::{ImportError, StorageError, StoreError, StoreResult, ValidationError};
pub use filters::{filtered_list, BudgetFilter, GuestFilter, RecordFilter, TaskFilter, VendorFilter};
pub use guest_csv::{export_guest_csv, load_guest_csv, read_guest_rows, write_guest_csv};
pub use persistence::{JsonFileAdapter, MemoryAdapter, PersistenceAdapter, Settings, Snapshot};
pub use seating::{table_occupancy, unseated_guests, TableOccupancy};
pub use store::{Committed, EntityStore, GuestRemovalPolicy, ImportReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
