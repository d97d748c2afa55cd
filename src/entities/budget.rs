// Budget Item Entity - planned vs. deposit vs. actual spend per line

use serde::{Deserialize, Serialize};

use super::{require_amount, require_text, Draft, Entity, EntityKind, Patch};
use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    pub id: String,
    pub category: String,
    pub description: String,

    /// Amount budgeted for this line
    pub planned: f64,

    /// Amount already paid up front; expected <= planned but not enforced
    #[serde(default)]
    pub deposit: f64,

    /// Realized cost, once known
    #[serde(default)]
    pub actual: Option<f64>,

    #[serde(default)]
    pub paid: bool,
}

impl BudgetItem {
    /// Amount this line contributes to expenses: actual once realized,
    /// otherwise the planned figure.
    pub fn amount(&self) -> f64 {
        self.actual.unwrap_or(self.planned)
    }

    pub fn deposit_exceeds_planned(&self) -> bool {
        self.deposit > self.planned
    }

    /// What is still owed on this line after the deposit
    pub fn outstanding(&self) -> f64 {
        (self.amount() - self.deposit).max(0.0)
    }
}

impl Entity for BudgetItem {
    const KIND: EntityKind = EntityKind::BudgetItem;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(Self::KIND, "category", &self.category)?;
        require_text(Self::KIND, "description", &self.description)?;
        require_amount(Self::KIND, "planned", self.planned)?;
        require_amount(Self::KIND, "deposit", self.deposit)?;
        if let Some(actual) = self.actual {
            require_amount(Self::KIND, "actual", actual)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBudgetItem {
    pub category: String,
    pub description: String,
    pub planned: f64,
    pub deposit: Option<f64>,
    pub actual: Option<f64>,
    pub paid: Option<bool>,
}

impl NewBudgetItem {
    pub fn new(category: impl Into<String>, description: impl Into<String>, planned: f64) -> Self {
        NewBudgetItem {
            category: category.into(),
            description: description.into(),
            planned,
            ..Default::default()
        }
    }

    pub fn deposit(mut self, deposit: f64) -> Self {
        self.deposit = Some(deposit);
        self
    }

    pub fn actual(mut self, actual: f64) -> Self {
        self.actual = Some(actual);
        self
    }
}

impl Draft for NewBudgetItem {
    type Entity = BudgetItem;

    fn into_entity(self, id: String) -> BudgetItem {
        BudgetItem {
            id,
            category: self.category.trim().to_string(),
            description: self.description,
            planned: self.planned,
            deposit: self.deposit.unwrap_or(0.0),
            actual: self.actual,
            paid: self.paid.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub planned: Option<f64>,
    pub deposit: Option<f64>,
    /// Some(None) clears a previously recorded actual cost
    pub actual: Option<Option<f64>>,
    pub paid: Option<bool>,
}

impl Patch for BudgetPatch {
    type Entity = BudgetItem;

    fn apply_to(self, item: &mut BudgetItem) {
        if let Some(category) = self.category {
            item.category = category.trim().to_string();
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(planned) = self.planned {
            item.planned = planned;
        }
        if let Some(deposit) = self.deposit {
            item.deposit = deposit;
        }
        if let Some(actual) = self.actual {
            item.actual = actual;
        }
        if let Some(paid) = self.paid {
            item.paid = paid;
        }
    }
}
