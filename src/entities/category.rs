// 🏷️ Categories - user-extensible label sets for budget, vendors and tasks
//
// A category is just a name. Each domain keeps its own ordered set;
// uniqueness is exact and case-sensitive ("Music" and "music" are distinct).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CATEGORY KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Budget,
    Vendor,
    Task,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Budget => "budget",
            CategoryKind::Vendor => "vendor",
            CategoryKind::Task => "task",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CATEGORY SET
// ============================================================================

/// Insertion-ordered set of names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    pub fn new() -> Self {
        CategorySet { names: Vec::new() }
    }

    /// Insert if absent. Returns false for a duplicate.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CategorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for name in iter {
            set.insert(name.as_ref());
        }
        set
    }
}

// ============================================================================
// CATEGORIES (one set per domain)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub budget: CategorySet,
    #[serde(default)]
    pub vendor: CategorySet,
    #[serde(default)]
    pub task: CategorySet,
}

impl Categories {
    pub fn get(&self, kind: CategoryKind) -> &CategorySet {
        match kind {
            CategoryKind::Budget => &self.budget,
            CategoryKind::Vendor => &self.vendor,
            CategoryKind::Task => &self.task,
        }
    }

    pub fn get_mut(&mut self, kind: CategoryKind) -> &mut CategorySet {
        match kind {
            CategoryKind::Budget => &mut self.budget,
            CategoryKind::Vendor => &mut self.vendor,
            CategoryKind::Task => &mut self.task,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_case_sensitive() {
        let mut set = CategorySet::new();

        assert!(set.insert("Music"));
        assert!(!set.insert("Music"));
        assert!(set.insert("music"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let set: CategorySet = ["hall", "catering", "hall", "music"].into_iter().collect();
        assert_eq!(set.names(), &["hall", "catering", "music"]);
    }

    #[test]
    fn test_categories_kinds_are_independent() {
        let mut categories = Categories::default();
        categories.get_mut(CategoryKind::Budget).insert("music");

        assert!(categories.get(CategoryKind::Budget).contains("music"));
        assert!(!categories.get(CategoryKind::Vendor).contains("music"));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let set: CategorySet = ["hall", "music"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["hall","music"]"#);
    }
}
