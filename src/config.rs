// ⚙️ Planner Configuration - settings as data, loaded from a JSON file
//
// Lookup order: explicit path, then $WEDDING_PLANNER_CONFIG, then defaults.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::GuestRemovalPolicy;

pub const CONFIG_ENV_VAR: &str = "WEDDING_PLANNER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// SQLite file holding the snapshot
    pub database_path: PathBuf,

    /// Seeded into the store only if it has no budget yet
    pub total_budget: Option<f64>,

    pub currency_symbol: String,

    /// What deleting a seated guest does to table assignments
    pub guest_removal_policy: GuestRemovalPolicy,

    pub default_budget_categories: Vec<String>,
    pub default_vendor_categories: Vec<String>,
    pub default_task_categories: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            database_path: PathBuf::from("wedding-planner.db"),
            total_budget: None,
            currency_symbol: "₪".to_string(),
            guest_removal_policy: GuestRemovalPolicy::default(),
            default_budget_categories: to_strings(&[
                "hall",
                "catering",
                "bridal dress",
                "photographer",
                "music",
            ]),
            default_vendor_categories: to_strings(&[
                "hall",
                "catering",
                "photography",
                "bridal dress",
                "music",
            ]),
            default_task_categories: to_strings(&["preparations", "vendors", "planning", "legal"]),
        }
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl PlannerConfig {
    /// Load config from JSON file. Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: PlannerConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Explicit path wins; otherwise the env var; otherwise defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::from_file(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(budget) = self.total_budget {
            if !budget.is_finite() || budget < 0.0 {
                anyhow::bail!("total_budget must be a non-negative number, got {}", budget);
            }
        }
        Ok(())
    }

    /// Amount with currency symbol and thousands separators, e.g. "₪20,000"
    pub fn format_amount(&self, amount: f64) -> String {
        let rounded = amount.round() as i64;
        let digits = rounded.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if rounded < 0 { "-" } else { "" };
        format!("{}{}{}", sign, self.currency_symbol, grouped)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.database_path, PathBuf::from("wedding-planner.db"));
        assert_eq!(config.guest_removal_policy, GuestRemovalPolicy::Cascade);
        assert!(config.default_budget_categories.contains(&"hall".to_string()));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.json");
        fs::write(
            &path,
            r#"{ "total_budget": 120000, "guest_removal_policy": "reject", "currency_symbol": "$" }"#,
        )
        .unwrap();

        let config = PlannerConfig::from_file(&path).unwrap();

        assert_eq!(config.total_budget, Some(120000.0));
        assert_eq!(config.guest_removal_policy, GuestRemovalPolicy::Reject);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.database_path, PathBuf::from("wedding-planner.db"));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.json");
        fs::write(&path, r#"{ "total_budget": -1 }"#).unwrap();

        assert!(PlannerConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = PlannerConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.json");
        fs::write(&path, r#"{ "currency_symbol": "€" }"#).unwrap();

        let config = PlannerConfig::resolve(Some(&path)).unwrap();
        assert_eq!(config.currency_symbol, "€");
    }

    #[test]
    fn test_format_amount() {
        let config = PlannerConfig::default();
        assert_eq!(config.format_amount(20000.0), "₪20,000");
        assert_eq!(config.format_amount(999.4), "₪999");
        assert_eq!(config.format_amount(-1234567.0), "-₪1,234,567");
        assert_eq!(config.format_amount(0.0), "₪0");
    }
}
