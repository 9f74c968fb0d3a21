//! Expense aggregation over the in-memory ledger.
//!
//! Everything here is a pure function of its inputs. Amounts for keys that
//! are not one of the known categories never reach these functions: they are
//! split off into `ExpenseRecord::unrecognized` when a record is loaded.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::date_utils::{display_date, MonthKey};
use crate::models::{Category, ExpenseLedger, ExpenseRecord};

pub type CategoryTotals = BTreeMap<Category, f64>;

/// Totals map with every category present at zero.
pub fn empty_totals() -> CategoryTotals {
    Category::ALL.iter().map(|c| (*c, 0.0)).collect()
}

/// Sum each category across the given records. Missing categories count as 0.
pub fn category_totals<'a, I>(records: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut totals = empty_totals();
    for record in records {
        for (category, amount) in &record.amounts {
            *totals.entry(*category).or_insert(0.0) += amount;
        }
    }
    totals
}

pub fn monthly_total(totals: &CategoryTotals) -> f64 {
    totals.values().sum()
}

/// `income - spent`.
pub fn savings(income: f64, spent: f64) -> f64 {
    income - spent
}

/// Savings as a percentage of income, 0 when income is not positive.
pub fn savings_percent(savings: f64, income: f64) -> f64 {
    if income > 0.0 {
        100.0 * savings / income
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    pub period: MonthKey,
    pub sort_key: String,
    pub label: String,
    pub category_totals: CategoryTotals,
    pub total: f64,
}

/// Per-month totals in chronological order, one entry per bucket in the ledger.
pub fn trend_series(ledger: &ExpenseLedger) -> Vec<MonthlyTrend> {
    let mut series: Vec<MonthlyTrend> = ledger
        .buckets()
        .map(|(period, bucket)| {
            let category_totals = category_totals(bucket.values());
            let total = monthly_total(&category_totals);
            MonthlyTrend {
                period: *period,
                sort_key: period.sort_key(),
                label: period.label(),
                category_totals,
                total,
            }
        })
        .collect();

    series.sort_by_key(|month| month.period);
    series
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySavings {
    pub sort_key: String,
    pub label: String,
    pub spent: f64,
    pub savings: f64,
    pub savings_percent: f64,
}

pub fn savings_series(trend: &[MonthlyTrend], income: f64) -> Vec<MonthlySavings> {
    trend
        .iter()
        .map(|month| {
            let saved = savings(income, month.total);
            MonthlySavings {
                sort_key: month.sort_key.clone(),
                label: month.label.clone(),
                spent: month.total,
                savings: saved,
                savings_percent: savings_percent(saved, income),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTrendPoint {
    pub sort_key: String,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTrend {
    pub category: Category,
    pub points: Vec<CategoryTrendPoint>,
}

impl CategoryTrend {
    /// Mean over the months in the series, 0 when there are none.
    pub fn average(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.amount).sum::<f64>() / self.points.len() as f64
    }
}

/// One chronological series per category, in category order.
pub fn category_trends(trend: &[MonthlyTrend]) -> Vec<CategoryTrend> {
    Category::ALL
        .iter()
        .map(|category| CategoryTrend {
            category: *category,
            points: trend
                .iter()
                .map(|month| CategoryTrendPoint {
                    sort_key: month.sort_key.clone(),
                    label: month.label.clone(),
                    amount: month.category_totals.get(category).copied().unwrap_or(0.0),
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    pub period: MonthKey,
    pub timestamp: String,
    pub date: String,
    pub total: f64,
    pub amounts: CategoryTotals,
    pub notes: Option<String>,
    pub unrecognized: Vec<String>,
}

impl ActivityEntry {
    fn from_record(period: MonthKey, id: &str, record: &ExpenseRecord) -> Self {
        let mut amounts = empty_totals();
        for category in Category::ALL {
            amounts.insert(category, record.amount(category));
        }
        Self {
            id: id.to_string(),
            period,
            timestamp: record
                .timestamp
                .clone()
                .unwrap_or_else(|| format!("{}-01 00:00:00", period.sort_key())),
            date: display_date(record.timestamp.as_deref(), period),
            total: record.total(),
            amounts,
            notes: record.notes.clone(),
            unrecognized: record.unrecognized.keys().cloned().collect(),
        }
    }
}

/// Every record in the ledger, newest timestamp first.
///
/// Records without a timestamp sort as if created on the first of their month.
pub fn activity(ledger: &ExpenseLedger) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> = ledger
        .records()
        .map(|(period, id, record)| ActivityEntry::from_record(period, id, record))
        .collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

/// The `limit` most recent records that carry a timestamp.
pub fn recent_activity(ledger: &ExpenseLedger, limit: usize) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> = ledger
        .records()
        .filter(|(_, _, record)| record.timestamp.is_some())
        .map(|(period, id, record)| ActivityEntry::from_record(period, id, record))
        .collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries.truncate(limit);
    entries
}
