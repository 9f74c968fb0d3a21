//! Advisory estimate of how much could be cut from each category.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Category, CityTier};
use crate::services::aggregation::CategoryTotals;

/// Achievable reduction rate for a category. Groceries and transport are
/// assumed easier to trim in tier 1 cities.
pub fn savings_rate(category: Category, tier: CityTier) -> f64 {
    let tier1 = tier == CityTier::Tier1;
    match category {
        Category::Groceries => {
            if tier1 {
                0.15
            } else {
                0.12
            }
        }
        Category::Transport => {
            if tier1 {
                0.20
            } else {
                0.15
            }
        }
        Category::EatingOut => 0.25,
        Category::Entertainment => 0.20,
        Category::Utilities => 0.10,
        Category::Healthcare => 0.05,
        Category::Education => 0.08,
        Category::Miscellaneous => 0.15,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct PotentialSavings {
    pub per_category: BTreeMap<Category, f64>,
    pub total: f64,
}

pub fn potential_savings(spend: &CategoryTotals, tier: CityTier) -> PotentialSavings {
    let per_category: BTreeMap<Category, f64> = spend
        .iter()
        .map(|(c, amount)| (*c, round2(amount * savings_rate(*c, tier))))
        .collect();
    let total = round2(per_category.values().sum());
    PotentialSavings {
        per_category,
        total,
    }
}
