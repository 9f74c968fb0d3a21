use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::models::expense::amount_value;
use crate::models::Category;

/// Per-category budget targets, stored as `<username>_budget.json`.
///
/// Keys that are not a known category, or values that are not numbers,
/// are dropped when the document is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct BudgetGoals(BTreeMap<Category, f64>);

impl BudgetGoals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Goals derived from a share of monthly income, used until the user saves their own.
    pub fn default_for_income(income: f64) -> Self {
        Self(
            Category::ALL
                .iter()
                .map(|c| (*c, income * c.default_budget_share()))
                .collect(),
        )
    }

    pub fn get(&self, category: Category) -> f64 {
        self.0.get(&category).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    pub fn set(&mut self, category: Category, amount: f64) {
        self.0.insert(category, amount);
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(c, v)| (*c, *v))
    }
}

impl FromIterator<(Category, f64)> for BudgetGoals {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Map<String, Value>> for BudgetGoals {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .filter_map(|(key, value)| Some((key.parse().ok()?, value.as_f64()?)))
            .collect()
    }
}

impl From<BudgetGoals> for Map<String, Value> {
    fn from(goals: BudgetGoals) -> Self {
        goals
            .0
            .into_iter()
            .map(|(category, amount)| (category.as_str().to_string(), amount_value(amount)))
            .collect()
    }
}
