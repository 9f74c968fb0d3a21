use serde::Serialize;

use crate::models::{BudgetGoals, Category, NewExpenseRecord, Profile};
use crate::services::aggregation::{monthly_total, CategoryTotals};

/// Spending above this share of a budget is flagged as near the limit.
pub const NEAR_LIMIT_PERCENT: f64 = 90.0;
/// Spending above this share of a budget is overspent.
pub const OVERSPENT_PERCENT: f64 = 100.0;
/// Savings above this amount earn an investment suggestion.
pub const INVESTMENT_SUGGESTION_THRESHOLD: f64 = 10000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    Overspent,
}

impl BudgetStatus {
    pub fn classify(percentage: f64) -> Self {
        if percentage > OVERSPENT_PERCENT {
            Self::Overspent
        } else if percentage > NEAR_LIMIT_PERCENT {
            Self::NearLimit
        } else {
            Self::OnTrack
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on-track",
            Self::NearLimit => "near-limit",
            Self::Overspent => "overspent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On track",
            Self::NearLimit => "Near limit",
            Self::Overspent => "Overspent",
        }
    }
}

/// `100 * spent / budget`, or 0 when the budget is not positive.
pub fn percentage_of(spent: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        100.0 * spent / budget
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBudget {
    pub category: Category,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
    pub status: BudgetStatus,
}

impl CategoryBudget {
    fn new(category: Category, budget: f64, spent: f64) -> Self {
        let percentage = percentage_of(spent, budget);
        Self {
            category,
            budget,
            spent,
            remaining: budget - spent,
            percentage,
            status: BudgetStatus::classify(percentage),
        }
    }

    /// Progress bar fill between 0 and 1.
    pub fn progress(&self) -> f64 {
        (self.percentage / 100.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overspend {
    pub category: Category,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetEvaluation {
    pub categories: Vec<CategoryBudget>,
    pub total_budget: f64,
    pub total_spent: f64,
    pub overall_remaining: f64,
    pub overall_percentage: f64,
    /// Categories where spend exceeds the goal, largest overspend first.
    pub overspent: Vec<Overspend>,
}

impl BudgetEvaluation {
    pub fn status_of(&self, category: Category) -> Option<&CategoryBudget> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn overall_progress(&self) -> f64 {
        (self.overall_percentage / 100.0).clamp(0.0, 1.0)
    }

    /// Categories past the near-limit threshold, for dashboard alerts.
    pub fn alerts(&self) -> impl Iterator<Item = &CategoryBudget> {
        self.categories
            .iter()
            .filter(|c| c.status != BudgetStatus::OnTrack)
    }
}

/// Compare per-category spend with the budget goals.
///
/// Every category is evaluated; one without a goal has a budget of 0.
pub fn evaluate(totals: &CategoryTotals, goals: &BudgetGoals) -> BudgetEvaluation {
    let categories: Vec<CategoryBudget> = Category::ALL
        .iter()
        .map(|c| {
            let spent = totals.get(c).copied().unwrap_or(0.0);
            CategoryBudget::new(*c, goals.get(*c), spent)
        })
        .collect();

    let mut overspent: Vec<Overspend> = categories
        .iter()
        .filter(|c| c.spent > c.budget)
        .map(|c| Overspend {
            category: c.category,
            amount: c.spent - c.budget,
        })
        .collect();
    overspent.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let total_budget = goals.total();
    let total_spent = monthly_total(totals);

    BudgetEvaluation {
        categories,
        total_budget,
        total_spent,
        overall_remaining: total_budget - total_spent,
        overall_percentage: percentage_of(total_spent, total_budget),
        overspent,
    }
}

/// Categories of a single new entry that exceed their goal on their own.
///
/// Only categories with an explicit goal are checked.
pub fn entry_overspends(entry: &NewExpenseRecord, goals: &BudgetGoals) -> Vec<Overspend> {
    entry
        .amounts
        .iter()
        .filter(|(c, _)| goals.contains(**c))
        .filter(|(c, amount)| **amount > goals.get(**c))
        .map(|(c, amount)| Overspend {
            category: *c,
            amount: amount - goals.get(*c),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SavingsAdvice {
    /// Saving less than the profile's goal; `reduce` lists where to cut.
    BelowGoal {
        savings_percent: f64,
        goal_percent: f64,
        reduce: Vec<Overspend>,
    },
    MeetsGoal {
        savings_percent: f64,
        goal_percent: f64,
        suggest_investments: bool,
    },
}

pub fn savings_advice(
    profile: &Profile,
    savings: f64,
    savings_percent: f64,
    evaluation: &BudgetEvaluation,
) -> SavingsAdvice {
    let goal_percent = profile.desired_savings_percentage;
    if savings_percent < goal_percent {
        SavingsAdvice::BelowGoal {
            savings_percent,
            goal_percent,
            reduce: evaluation.overspent.clone(),
        }
    } else {
        SavingsAdvice::MeetsGoal {
            savings_percent,
            goal_percent,
            suggest_investments: savings > INVESTMENT_SUGGESTION_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::aggregation::empty_totals;

    fn totals(pairs: &[(Category, f64)]) -> CategoryTotals {
        let mut t = empty_totals();
        for (c, v) in pairs {
            t.insert(*c, *v);
        }
        t
    }

    fn goals(pairs: &[(Category, f64)]) -> BudgetGoals {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(BudgetStatus::classify(percentage_of(9000.0, 10000.0)), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::classify(percentage_of(9001.0, 10000.0)), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::classify(percentage_of(10000.0, 10000.0)), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::classify(percentage_of(10001.0, 10000.0)), BudgetStatus::Overspent);
        assert_eq!(BudgetStatus::classify(90.0), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::classify(90.01), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::classify(100.01), BudgetStatus::Overspent);
    }

    #[test]
    fn test_zero_budget_is_zero_percent() {
        assert_eq!(percentage_of(500.0, 0.0), 0.0);
        assert_eq!(percentage_of(500.0, -10.0), 0.0);
    }

    #[test]
    fn test_example_scenario() {
        let t = totals(&[(Category::Groceries, 6000.0), (Category::Transport, 3000.0)]);
        let g = goals(&[(Category::Groceries, 5000.0), (Category::Transport, 4000.0)]);
        let eval = evaluate(&t, &g);

        let groceries = eval.status_of(Category::Groceries).unwrap();
        assert_eq!(groceries.percentage, 120.0);
        assert_eq!(groceries.remaining, -1000.0);
        assert_eq!(groceries.status, BudgetStatus::Overspent);

        let transport = eval.status_of(Category::Transport).unwrap();
        assert_eq!(transport.percentage, 75.0);
        assert_eq!(transport.remaining, 1000.0);
        assert_eq!(transport.status, BudgetStatus::OnTrack);

        assert_eq!(eval.total_budget, 9000.0);
        assert_eq!(eval.total_spent, 9000.0);
        assert_eq!(eval.overall_percentage, 100.0);
        assert_eq!(
            eval.overspent,
            vec![Overspend {
                category: Category::Groceries,
                amount: 1000.0
            }]
        );
    }

    #[test]
    fn test_overspent_sorted_by_amount() {
        let t = totals(&[
            (Category::Groceries, 5100.0),
            (Category::Transport, 4000.0),
            (Category::EatingOut, 2500.0),
        ]);
        let g = goals(&[
            (Category::Groceries, 5000.0),
            (Category::Transport, 1000.0),
            (Category::EatingOut, 2000.0),
        ]);
        let eval = evaluate(&t, &g);
        let order: Vec<Category> = eval.overspent.iter().map(|o| o.category).collect();
        assert_eq!(
            order,
            vec![Category::Transport, Category::EatingOut, Category::Groceries]
        );
    }

    #[test]
    fn test_progress_is_capped() {
        let t = totals(&[(Category::Groceries, 6000.0)]);
        let g = goals(&[(Category::Groceries, 5000.0)]);
        let eval = evaluate(&t, &g);
        assert_eq!(eval.status_of(Category::Groceries).unwrap().progress(), 1.0);
        assert_eq!(eval.overall_progress(), 1.0);
        assert_eq!(eval.alerts().count(), 1);

        let t = totals(&[(Category::Groceries, 2500.0)]);
        let g = goals(&[(Category::Groceries, 4000.0), (Category::Transport, 1000.0)]);
        assert_eq!(evaluate(&t, &g).overall_progress(), 0.5);
    }

    #[test]
    fn test_entry_overspends_only_checks_set_goals() {
        let entry = NewExpenseRecord {
            amounts: [(Category::Groceries, 7000.0), (Category::Education, 900.0)]
                .into_iter()
                .collect(),
            notes: None,
        };
        let g = goals(&[(Category::Groceries, 5000.0)]);
        let over = entry_overspends(&entry, &g);
        assert_eq!(
            over,
            vec![Overspend {
                category: Category::Groceries,
                amount: 2000.0
            }]
        );
    }

    #[test]
    fn test_savings_advice() {
        let profile = Profile::new("asha", 50000.0);
        let eval = evaluate(&empty_totals(), &BudgetGoals::new());

        match savings_advice(&profile, 41000.0, 82.0, &eval) {
            SavingsAdvice::MeetsGoal {
                suggest_investments,
                ..
            } => assert!(suggest_investments),
            other => panic!("unexpected advice: {:?}", other),
        }

        match savings_advice(&profile, 5000.0, 10.0, &eval) {
            SavingsAdvice::BelowGoal { goal_percent, .. } => assert_eq!(goal_percent, 20.0),
            other => panic!("unexpected advice: {:?}", other),
        }
    }
}
