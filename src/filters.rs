// 🔎 Record Filters - AND-combined predicates over store lists
//
// A filter field that is None (or an empty string) matches everything.
// Category and enum comparisons are exact and case-sensitive; only the
// guest search box is a fuzzy text match.

use crate::entities::{BudgetItem, Guest, Relation, Rsvp, Task, Vendor};

pub trait RecordFilter<T> {
    fn matches(&self, record: &T) -> bool;
}

/// Records matching every set filter field, in their original order
pub fn filtered_list<T: Clone, F: RecordFilter<T>>(records: &[T], filter: &F) -> Vec<T> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

fn text_matches(filter: &Option<String>, value: &str) -> bool {
    match filter.as_deref() {
        None | Some("") => true,
        Some(wanted) => wanted == value,
    }
}

fn value_matches<V: PartialEq>(filter: &Option<V>, value: &V) -> bool {
    filter.as_ref().map_or(true, |wanted| wanted == value)
}

// ============================================================================
// GUESTS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestFilter {
    /// Substring of the name (any case) or of the phone number
    pub search: Option<String>,
    pub relation: Option<Relation>,
    pub confirmed: Option<Rsvp>,
}

impl RecordFilter<Guest> for GuestFilter {
    fn matches(&self, guest: &Guest) -> bool {
        let search_ok = match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                guest.full_name.to_lowercase().contains(&term.to_lowercase())
                    || guest.phone_number.contains(term)
            }
        };

        search_ok
            && value_matches(&self.relation, &guest.relation)
            && value_matches(&self.confirmed, &guest.confirmed)
    }
}

// ============================================================================
// BUDGET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetFilter {
    pub category: Option<String>,
    pub paid: Option<bool>,
}

impl RecordFilter<BudgetItem> for BudgetFilter {
    fn matches(&self, item: &BudgetItem) -> bool {
        text_matches(&self.category, &item.category) && value_matches(&self.paid, &item.paid)
    }
}

// ============================================================================
// VENDORS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorFilter {
    pub category: Option<String>,
    /// Minimum stars; 0 behaves like unset
    pub min_rating: Option<u8>,
}

impl RecordFilter<Vendor> for VendorFilter {
    fn matches(&self, vendor: &Vendor) -> bool {
        let rating_ok = match self.min_rating {
            None | Some(0) => true,
            Some(min) => vendor.rating >= min,
        };
        text_matches(&self.category, &vendor.category) && rating_ok
    }
}

// ============================================================================
// TASKS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub category: Option<String>,
    pub completed: Option<bool>,
    pub assigned_to: Option<String>,
}

impl RecordFilter<Task> for TaskFilter {
    fn matches(&self, task: &Task) -> bool {
        text_matches(&self.category, &task.category)
            && value_matches(&self.completed, &task.completed)
            && text_matches(&self.assigned_to, &task.assigned_to)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Draft, NewBudgetItem, NewGuest, NewTask, NewVendor, Patch, TaskPatch};

    fn guests() -> Vec<Guest> {
        vec![
            NewGuest::named("David Cohen")
                .phone("050-1234567")
                .relation(Relation::Family)
                .confirmed(Rsvp::Yes)
                .into_entity("g1".to_string()),
            NewGuest::named("Rachel Levi")
                .phone("052-7654321")
                .relation(Relation::Friends)
                .into_entity("g2".to_string()),
            NewGuest::named("Yossi Goldberg")
                .phone("054-9876543")
                .relation(Relation::Work)
                .confirmed(Rsvp::No)
                .into_entity("g3".to_string()),
        ]
    }

    #[test]
    fn test_unset_filter_returns_input_unchanged() {
        let all = guests();
        assert_eq!(filtered_list(&all, &GuestFilter::default()), all);

        let empty_text = GuestFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filtered_list(&all, &empty_text), all);
    }

    #[test]
    fn test_guest_search_name_any_case_or_phone() {
        let by_name = GuestFilter {
            search: Some("cohen".to_string()),
            ..Default::default()
        };
        let by_phone = GuestFilter {
            search: Some("7654".to_string()),
            ..Default::default()
        };

        assert_eq!(filtered_list(&guests(), &by_name)[0].id, "g1");
        assert_eq!(filtered_list(&guests(), &by_phone)[0].id, "g2");
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filter = GuestFilter {
            search: Some("o".to_string()),
            relation: Some(Relation::Work),
            confirmed: Some(Rsvp::No),
        };
        let result = filtered_list(&guests(), &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "g3");

        let none = GuestFilter {
            relation: Some(Relation::Family),
            confirmed: Some(Rsvp::No),
            ..Default::default()
        };
        assert!(filtered_list(&guests(), &none).is_empty());
    }

    #[test]
    fn test_budget_category_is_case_sensitive() {
        let items = vec![
            NewBudgetItem::new("Music", "DJ", 3000.0).into_entity("b1".to_string()),
            NewBudgetItem::new("music", "Band", 9000.0).into_entity("b2".to_string()),
        ];
        let filter = BudgetFilter {
            category: Some("music".to_string()),
            paid: Some(false),
        };

        let result = filtered_list(&items, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "b2");
    }

    #[test]
    fn test_vendor_min_rating() {
        let mut low = NewVendor::new("Photo A", "photo").into_entity("v1".to_string());
        low.rating = 2;
        let mut high = NewVendor::new("Photo B", "photo").into_entity("v2".to_string());
        high.rating = 4;
        let vendors = vec![low, high];

        let four_plus = VendorFilter {
            min_rating: Some(4),
            ..Default::default()
        };
        assert_eq!(filtered_list(&vendors, &four_plus).len(), 1);

        let zero = VendorFilter {
            min_rating: Some(0),
            ..Default::default()
        };
        assert_eq!(filtered_list(&vendors, &zero).len(), 2);
    }

    #[test]
    fn test_task_completed_and_assignee() {
        let mut done = NewTask::new("Dress fitting", "prep")
            .assign("Noa")
            .into_entity("t1".to_string());
        TaskPatch::completed(true).apply_to(&mut done);
        let open = NewTask::new("Book DJ", "vendors")
            .assign("Noa")
            .into_entity("t2".to_string());
        let tasks = vec![done, open];

        let filter = TaskFilter {
            completed: Some(false),
            assigned_to: Some("Noa".to_string()),
            ..Default::default()
        };
        let result = filtered_list(&tasks, &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "t2");
    }
}
