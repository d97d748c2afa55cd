// 📊 Derivation Engine - totals, percentages and breakdowns over store lists
//
// Pure functions: nothing here mutates or caches. Views are recomputed from
// the current lists on every call.

use serde::{Deserialize, Serialize};

use crate::entities::{BudgetItem, CategorySet, Guest, Rsvp, Task, Vendor};

// ============================================================================
// PERCENTAGES
// ============================================================================

/// Whole-number percentage, rounded half-up. A zero (or negative) whole
/// yields 0 rather than NaN.
pub fn percentage(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0 + 0.5).floor() as i64
}

/// Share of the planned amount already covered by the deposit.
/// None when nothing is planned: there is no meaningful ratio.
pub fn deposit_progress(item: &BudgetItem) -> Option<f64> {
    if item.planned > 0.0 {
        Some(item.deposit / item.planned * 100.0)
    } else {
        None
    }
}

// ============================================================================
// BUDGET
// ============================================================================

pub fn total_expenses(items: &[BudgetItem]) -> f64 {
    items.iter().map(BudgetItem::amount).sum()
}

/// Negative when over budget
pub fn remaining_budget(total_budget: f64, total_expenses: f64) -> f64 {
    total_budget - total_expenses
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// One entry per category, in category order, zero sums included
pub fn category_breakdown(items: &[BudgetItem], categories: &CategorySet) -> Vec<CategoryTotal> {
    categories
        .iter()
        .map(|category| CategoryTotal {
            category: category.to_string(),
            total: items
                .iter()
                .filter(|item| item.category == category)
                .map(BudgetItem::amount)
                .sum(),
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub planned: f64,
    pub deposit: f64,
    /// Unrealized lines count as 0
    pub actual: f64,
}

pub fn budget_totals(items: &[BudgetItem]) -> BudgetTotals {
    items.iter().fold(BudgetTotals::default(), |mut totals, item| {
        totals.planned += item.planned;
        totals.deposit += item.deposit;
        totals.actual += item.actual.unwrap_or(0.0);
        totals
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: f64,
    pub percent: i64,
}

/// Pie-chart series from a breakdown. Zero slices are dropped unless asked for.
pub fn chart_series(breakdown: &[CategoryTotal], include_zero: bool) -> Vec<ChartSlice> {
    let whole: f64 = breakdown.iter().map(|entry| entry.total).sum();

    breakdown
        .iter()
        .filter(|entry| include_zero || entry.total != 0.0)
        .map(|entry| ChartSlice {
            name: entry.category.clone(),
            value: entry.total,
            percent: percentage(entry.total, whole),
        })
        .collect()
}

// ============================================================================
// GUESTS
// ============================================================================

/// Head counts (sum of invited_count), not row counts.
/// Summed in u64 so any number of valid u32 parties fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestTotals {
    pub total: u64,
    pub confirmed: u64,
    pub pending: u64,
    pub declined: u64,
}

pub fn guest_totals(guests: &[Guest]) -> GuestTotals {
    guests.iter().fold(GuestTotals::default(), |mut totals, guest| {
        let heads = u64::from(guest.invited_count);
        totals.total += heads;
        match guest.confirmed {
            Rsvp::Yes => totals.confirmed += heads,
            Rsvp::Maybe => totals.pending += heads,
            Rsvp::No => totals.declined += heads,
        }
        totals
    })
}

// ============================================================================
// PROGRESS / DASHBOARD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub done: f64,
    pub total: f64,
    pub percent: i64,
}

impl Progress {
    pub fn new(done: f64, total: f64) -> Self {
        Progress {
            done,
            total,
            percent: percentage(done, total),
        }
    }
}

pub fn task_progress(tasks: &[Task]) -> Progress {
    let done = tasks.iter().filter(|task| task.completed).count();
    Progress::new(done as f64, tasks.len() as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Confirmed heads out of all invited heads
    pub guests: Progress,
    pub tasks: Progress,
    /// Expenses out of the total budget
    pub budget: Progress,
    pub remaining_budget: f64,
    pub vendor_count: usize,
    pub vendor_quotes: f64,
}

pub fn dashboard_summary(
    guests: &[Guest],
    tasks: &[Task],
    budget_items: &[BudgetItem],
    vendors: &[Vendor],
    total_budget: f64,
) -> DashboardSummary {
    let heads = guest_totals(guests);
    let spent = total_expenses(budget_items);

    DashboardSummary {
        guests: Progress::new(heads.confirmed as f64, heads.total as f64),
        tasks: task_progress(tasks),
        budget: Progress::new(spent, total_budget),
        remaining_budget: remaining_budget(total_budget, spent),
        vendor_count: vendors.len(),
        vendor_quotes: vendors.iter().map(|vendor| vendor.price).sum(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Draft, Entity, NewBudgetItem, NewGuest, NewTask, NewVendor};

    fn wedding_budget() -> Vec<BudgetItem> {
        vec![
            NewBudgetItem::new("hall", "Hall down payment", 20000.0)
                .deposit(10000.0)
                .into_entity("b1".to_string()),
            NewBudgetItem::new("catering", "Catering first payment", 30000.0)
                .deposit(15000.0)
                .into_entity("b2".to_string()),
        ]
    }

    #[test]
    fn test_percentage_rounding_and_zero_whole() {
        assert_eq!(percentage(0.0, 0.0), 0);
        assert_eq!(percentage(50.0, 0.0), 0);
        assert_eq!(percentage(1.0, 3.0), 33);
        assert_eq!(percentage(2.0, 3.0), 67);
        assert_eq!(percentage(1.0, 8.0), 13); // 12.5 rounds up
        assert_eq!(percentage(150.0, 100.0), 150);
    }

    #[test]
    fn test_end_to_end_budget_example() {
        let items = wedding_budget();
        let categories: CategorySet = ["hall", "catering"].into_iter().collect();

        assert_eq!(total_expenses(&items), 50000.0);
        assert_eq!(deposit_progress(&items[0]), Some(50.0));

        let breakdown = category_breakdown(&items, &categories);
        assert_eq!(
            breakdown,
            vec![
                CategoryTotal {
                    category: "hall".to_string(),
                    total: 20000.0,
                },
                CategoryTotal {
                    category: "catering".to_string(),
                    total: 30000.0,
                },
            ]
        );
    }

    #[test]
    fn test_breakdown_covers_every_category_and_sums_to_total() {
        let mut items = wedding_budget();
        items[1].actual = Some(32500.0);
        let categories: CategorySet = ["hall", "catering", "music"].into_iter().collect();

        let breakdown = category_breakdown(&items, &categories);
        let sum: f64 = breakdown.iter().map(|entry| entry.total).sum();

        assert_eq!(breakdown.len(), categories.len());
        assert_eq!(breakdown[2].total, 0.0);
        assert_eq!(sum, total_expenses(&items));
    }

    #[test]
    fn test_remaining_budget_can_go_negative() {
        assert_eq!(remaining_budget(40000.0, total_expenses(&wedding_budget())), -10000.0);
    }

    #[test]
    fn test_deposit_progress_without_plan_is_none() {
        let item = NewBudgetItem::new("gifts", "Thank-you gifts", 0.0)
            .deposit(100.0)
            .into_entity("b".to_string());
        assert_eq!(deposit_progress(&item), None);
    }

    #[test]
    fn test_budget_totals_counts_missing_actual_as_zero() {
        let mut items = wedding_budget();
        items[0].actual = Some(21000.0);

        let totals = budget_totals(&items);
        assert_eq!(totals.planned, 50000.0);
        assert_eq!(totals.deposit, 25000.0);
        assert_eq!(totals.actual, 21000.0);
    }

    #[test]
    fn test_chart_series_drops_zero_slices() {
        let breakdown = vec![
            CategoryTotal {
                category: "hall".to_string(),
                total: 1.0,
            },
            CategoryTotal {
                category: "music".to_string(),
                total: 0.0,
            },
            CategoryTotal {
                category: "catering".to_string(),
                total: 2.0,
            },
        ];

        let slices = chart_series(&breakdown, false);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percent, 33);
        assert_eq!(slices[1].percent, 67);

        assert_eq!(chart_series(&breakdown, true).len(), 3);
    }

    #[test]
    fn test_guest_totals_example() {
        let guests = vec![
            NewGuest::named("A").invited(4).confirmed(Rsvp::Yes).into_entity("1".to_string()),
            NewGuest::named("B").invited(2).confirmed(Rsvp::Maybe).into_entity("2".to_string()),
            NewGuest::named("C").invited(1).confirmed(Rsvp::No).into_entity("3".to_string()),
        ];

        assert_eq!(
            guest_totals(&guests),
            GuestTotals {
                total: 7,
                confirmed: 4,
                pending: 2,
                declined: 1,
            }
        );
    }

    #[test]
    fn test_guest_totals_with_huge_parties() {
        let big = u32::MAX / 2 + 1;
        let guests = vec![
            NewGuest::named("A").invited(big).confirmed(Rsvp::Yes).into_entity("1".to_string()),
            NewGuest::named("B").invited(big).confirmed(Rsvp::Yes).into_entity("2".to_string()),
        ];
        assert!(guests.iter().all(|guest| guest.validate().is_ok()));

        let totals = guest_totals(&guests);
        assert_eq!(totals.total, 2 * u64::from(big));
        assert_eq!(totals.confirmed, totals.total);

        let summary = dashboard_summary(&guests, &[], &[], &[], 0.0);
        assert_eq!(summary.guests.percent, 100);
    }

    #[test]
    fn test_dashboard_summary() {
        let guests = vec![
            NewGuest::named("A").invited(3).confirmed(Rsvp::Yes).into_entity("1".to_string()),
            NewGuest::named("B").invited(1).into_entity("2".to_string()),
        ];
        let mut tasks = vec![
            NewTask::new("Dress", "prep").into_entity("t1".to_string()),
            NewTask::new("DJ", "vendors").into_entity("t2".to_string()),
            NewTask::new("Seating", "planning").into_entity("t3".to_string()),
        ];
        tasks[0].completed = true;
        let vendors = vec![NewVendor::new("Alon DJ", "music")
            .price(3000.0)
            .into_entity("v1".to_string())];

        let summary = dashboard_summary(&guests, &tasks, &wedding_budget(), &vendors, 100000.0);

        assert_eq!(summary.guests.percent, 75);
        assert_eq!(summary.tasks.percent, 33);
        assert_eq!(summary.budget.percent, 50);
        assert_eq!(summary.remaining_budget, 50000.0);
        assert_eq!(summary.vendor_count, 1);
        assert_eq!(summary.vendor_quotes, 3000.0);
    }

    #[test]
    fn test_empty_dashboard_has_zero_percentages() {
        let summary = dashboard_summary(&[], &[], &[], &[], 0.0);
        assert_eq!(summary.guests.percent, 0);
        assert_eq!(summary.tasks.percent, 0);
        assert_eq!(summary.budget.percent, 0);
    }
}
