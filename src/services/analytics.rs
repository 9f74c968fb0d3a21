//! The two entry points rendering code uses: the current-month dashboard
//! summary and the multi-month analytics view.

use serde::Serialize;

use crate::models::{BudgetGoals, Category, ExpenseLedger, MonthBucket, Profile};
use crate::services::aggregation::{
    category_totals, category_trends, monthly_total, savings, savings_percent, savings_series,
    trend_series, CategoryTotals, CategoryTrend, MonthlySavings, MonthlyTrend,
};
use crate::services::budget::{evaluate, BudgetEvaluation};

/// Recent spending above this multiple of the overall average is "rising".
pub const RISING_FACTOR: f64 = 1.1;
/// Recent spending below this multiple of the overall average is "falling".
pub const FALLING_FACTOR: f64 = 0.9;
/// Months considered "recent" when comparing against the overall average.
pub const RECENT_MONTHS: usize = 3;
/// A top category above this share of monthly spending gets flagged.
pub const DOMINANT_CATEGORY_PERCENT: f64 = 30.0;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub category_totals: CategoryTotals,
    pub monthly_total: f64,
    pub income: f64,
    pub savings: f64,
    pub savings_percent: f64,
    /// Savings percent minus the profile's desired savings percent.
    pub savings_goal_delta: f64,
    pub budget_status: BudgetEvaluation,
}

impl DashboardSummary {
    /// Non-zero categories, largest first.
    pub fn top_categories(&self, limit: usize) -> Vec<(Category, f64)> {
        let mut ranked: Vec<(Category, f64)> = self
            .category_totals
            .iter()
            .filter(|(_, v)| **v > 0.0)
            .map(|(c, v)| (*c, *v))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

pub fn compute_dashboard_summary(
    profile: &Profile,
    bucket: &MonthBucket,
    goals: &BudgetGoals,
) -> DashboardSummary {
    let totals = category_totals(bucket.values());
    let total = monthly_total(&totals);
    let saved = savings(profile.income, total);
    let percent = savings_percent(saved, profile.income);
    let budget_status = evaluate(&totals, goals);

    DashboardSummary {
        category_totals: totals,
        monthly_total: total,
        income: profile.income,
        savings: saved,
        savings_percent: percent,
        savings_goal_delta: percent - profile.desired_savings_percentage,
        budget_status,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpendingTrend {
    Rising,
    Falling,
    Steady,
    /// Fewer than two months of data.
    Insufficient,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthAmount {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpendingAverages {
    pub average_monthly: f64,
    pub highest: MonthAmount,
    pub lowest: MonthAmount,
    pub recent_average: f64,
    pub trend: SpendingTrend,
}

fn spending_averages(trend: &[MonthlyTrend]) -> Option<SpendingAverages> {
    let first = trend.first()?;
    let average_monthly = trend.iter().map(|m| m.total).sum::<f64>() / trend.len() as f64;

    // First occurrence wins on ties.
    let mut highest = first;
    let mut lowest = first;
    for month in &trend[1..] {
        if month.total > highest.total {
            highest = month;
        }
        if month.total < lowest.total {
            lowest = month;
        }
    }

    let recent = &trend[trend.len().saturating_sub(RECENT_MONTHS)..];
    let recent_average = recent.iter().map(|m| m.total).sum::<f64>() / recent.len() as f64;

    let trend_signal = if trend.len() < 2 {
        SpendingTrend::Insufficient
    } else if recent_average > average_monthly * RISING_FACTOR {
        SpendingTrend::Rising
    } else if recent_average < average_monthly * FALLING_FACTOR {
        SpendingTrend::Falling
    } else {
        SpendingTrend::Steady
    };

    Some(SpendingAverages {
        average_monthly,
        highest: MonthAmount {
            label: highest.label.clone(),
            amount: highest.total,
        },
        lowest: MonthAmount {
            label: lowest.label.clone(),
            amount: lowest.total,
        },
        recent_average,
        trend: trend_signal,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryAverage {
    pub category: Category,
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCategory {
    pub category: Category,
    pub average: f64,
    /// Share of average monthly spending.
    pub share_percent: f64,
    pub dominant: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavingsOverview {
    pub average_savings: f64,
    pub average_savings_percent: f64,
    pub target_percent: f64,
    pub delta_percent: f64,
    pub total_saved: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Projections {
    pub one_year: f64,
    pub three_years: f64,
    pub five_years: f64,
}

impl Projections {
    pub fn from_monthly(average_monthly_savings: f64) -> Self {
        Self {
            one_year: average_monthly_savings * 12.0,
            three_years: average_monthly_savings * 36.0,
            five_years: average_monthly_savings * 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub trend_series: Vec<MonthlyTrend>,
    pub category_trends: Vec<CategoryTrend>,
    pub savings_series: Vec<MonthlySavings>,
    pub averages: Option<SpendingAverages>,
    pub category_averages: Vec<CategoryAverage>,
    pub top_category: Option<TopCategory>,
    pub savings: Option<SavingsOverview>,
    pub projections: Option<Projections>,
}

impl Analytics {
    pub fn is_empty(&self) -> bool {
        self.trend_series.is_empty()
    }
}

pub fn compute_analytics(profile: &Profile, ledger: &ExpenseLedger) -> Analytics {
    let trend = trend_series(ledger);
    let categories = category_trends(&trend);
    let savings_data = savings_series(&trend, profile.income);
    let averages = spending_averages(&trend);

    let mut category_averages: Vec<CategoryAverage> = categories
        .iter()
        .filter(|t| !t.points.is_empty())
        .map(|t| CategoryAverage {
            category: t.category,
            average: t.average(),
        })
        .collect();
    // Stable sort keeps category order among equal averages.
    category_averages.sort_by(|a, b| b.average.total_cmp(&a.average));

    let top_category = match (category_averages.first(), &averages) {
        (Some(top), Some(avg)) => {
            let share_percent = if avg.average_monthly > 0.0 {
                100.0 * top.average / avg.average_monthly
            } else {
                0.0
            };
            Some(TopCategory {
                category: top.category,
                average: top.average,
                share_percent,
                dominant: share_percent > DOMINANT_CATEGORY_PERCENT,
            })
        }
        _ => None,
    };

    let savings_overview = (!savings_data.is_empty()).then(|| {
        let n = savings_data.len() as f64;
        let total_saved: f64 = savings_data.iter().map(|s| s.savings).sum();
        let average_savings_percent =
            savings_data.iter().map(|s| s.savings_percent).sum::<f64>() / n;
        SavingsOverview {
            average_savings: total_saved / n,
            average_savings_percent,
            target_percent: profile.desired_savings_percentage,
            delta_percent: average_savings_percent - profile.desired_savings_percentage,
            total_saved,
        }
    });

    let projections = savings_overview
        .as_ref()
        .map(|s| Projections::from_monthly(s.average_savings));

    Analytics {
        trend_series: trend,
        category_trends: categories,
        savings_series: savings_data,
        averages,
        category_averages,
        top_category,
        savings: savings_overview,
        projections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::budget::BudgetStatus;
    use serde_json::json;

    fn ledger(value: serde_json::Value) -> ExpenseLedger {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_dashboard_summary_example() {
        let profile = Profile::new("asha", 50000.0);
        let bucket: MonthBucket = serde_json::from_value(json!({
            "a": {"Groceries": 6000, "Transport": 3000}
        }))
        .unwrap();
        let goals: BudgetGoals =
            serde_json::from_value(json!({"Groceries": 5000, "Transport": 4000})).unwrap();

        let summary = compute_dashboard_summary(&profile, &bucket, &goals);
        assert_eq!(summary.monthly_total, 9000.0);
        assert_eq!(summary.category_totals[&Category::Groceries], 6000.0);
        assert_eq!(summary.category_totals[&Category::Transport], 3000.0);
        assert_eq!(summary.savings, 41000.0);
        assert_eq!(summary.savings_percent, 82.0);
        assert_eq!(summary.savings_goal_delta, 62.0);

        let groceries = summary.budget_status.status_of(Category::Groceries).unwrap();
        assert_eq!(groceries.status, BudgetStatus::Overspent);
        assert_eq!(groceries.remaining, -1000.0);
        let transport = summary.budget_status.status_of(Category::Transport).unwrap();
        assert_eq!(transport.status, BudgetStatus::OnTrack);

        let top = summary.top_categories(3);
        assert_eq!(top, vec![(Category::Groceries, 6000.0), (Category::Transport, 3000.0)]);
    }

    #[test]
    fn test_dashboard_summary_zero_income() {
        let profile = Profile::new("zero", 0.0);
        let bucket: MonthBucket =
            serde_json::from_value(json!({"a": {"Groceries": 100}})).unwrap();
        let summary = compute_dashboard_summary(&profile, &bucket, &BudgetGoals::new());
        assert_eq!(summary.savings, -100.0);
        assert_eq!(summary.savings_percent, 0.0);
    }

    #[test]
    fn test_empty_analytics() {
        let analytics = compute_analytics(&Profile::new("new", 50000.0), &ExpenseLedger::new());
        assert!(analytics.is_empty());
        assert!(analytics.savings_series.is_empty());
        assert!(analytics.averages.is_none());
        assert!(analytics.top_category.is_none());
        assert!(analytics.projections.is_none());
    }

    #[test]
    fn test_analytics_averages_and_projections() {
        let profile = Profile::new("asha", 10000.0);
        let analytics = compute_analytics(
            &profile,
            &ledger(json!({
                "2023": {"12": {"a": {"Groceries": 1000, "Transport": 1000}}},
                "2024": {
                    "1": {"b": {"Groceries": 3000, "Transport": 1000}},
                    "2": {"c": {"Groceries": 2000}}
                }
            })),
        );

        let averages = analytics.averages.as_ref().unwrap();
        assert_eq!(averages.average_monthly, 8000.0 / 3.0);
        assert_eq!(averages.highest.label, "Jan 2024");
        assert_eq!(averages.highest.amount, 4000.0);
        assert_eq!(averages.lowest.label, "Dec 2023");
        assert_eq!(averages.trend, SpendingTrend::Steady);

        let top = analytics.top_category.as_ref().unwrap();
        assert_eq!(top.category, Category::Groceries);
        assert_eq!(top.average, 2000.0);
        assert!((top.share_percent - 75.0).abs() < 1e-9);
        assert!(top.dominant);

        let savings = analytics.savings.as_ref().unwrap();
        assert_eq!(savings.total_saved, 8000.0 + 6000.0 + 8000.0);
        let projections = analytics.projections.as_ref().unwrap();
        assert_eq!(projections.one_year, savings.average_savings * 12.0);
        assert_eq!(projections.five_years, savings.average_savings * 60.0);
    }

    #[test]
    fn test_trend_signal_rising() {
        let analytics = compute_analytics(
            &Profile::new("asha", 10000.0),
            &ledger(json!({
                "2024": {
                    "1": {"a": {"Groceries": 100}},
                    "2": {"b": {"Groceries": 100}},
                    "3": {"c": {"Groceries": 100}},
                    "4": {"d": {"Groceries": 1000}},
                    "5": {"e": {"Groceries": 1000}},
                    "6": {"f": {"Groceries": 1000}}
                }
            })),
        );
        assert_eq!(analytics.averages.unwrap().trend, SpendingTrend::Rising);
    }

    #[test]
    fn test_single_month_has_no_trend_signal() {
        let analytics = compute_analytics(
            &Profile::new("asha", 10000.0),
            &ledger(json!({"2024": {"1": {"a": {"Groceries": 100}}}})),
        );
        assert_eq!(analytics.averages.unwrap().trend, SpendingTrend::Insufficient);
    }
}
