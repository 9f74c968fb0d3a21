use askama::Template;
use axum::extract::{Path, State};
use axum::response::Html;
use tower_cookies::Cookies;
use tracing::debug;

use super::user_url;
use crate::date_utils::MonthKey;
use crate::error::{AppResult, RenderHtml};
use crate::filters::{format_percent, format_signed_percent};
use crate::models::Category;
use crate::services::aggregation::{recent_activity, ActivityEntry};
use crate::services::analytics::compute_dashboard_summary;
use crate::services::budget::{BudgetStatus, CategoryBudget};
use crate::state::{AppState, PageContext};
use crate::storage::profiles;

const RECENT_ACTIVITY_LIMIT: usize = 5;
const TOP_CATEGORIES: usize = 3;

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageContext,
    pub user_url: String,
    pub month_label: String,
    pub is_sample: bool,
    pub goals_saved: bool,
    pub income: String,
    pub total_expenses: String,
    pub savings: String,
    pub savings_percent: String,
    pub savings_delta: String,
    pub savings_below_goal: bool,
    pub budget_rows: Vec<BudgetRow>,
    pub alerts: Vec<BudgetAlert>,
    pub recent: Vec<ActivityView>,
    pub distribution: Vec<ShareRow>,
    pub top_categories: Vec<ShareRow>,
}

pub struct BudgetRow {
    pub label: &'static str,
    pub budget: String,
    pub spent: String,
    pub percent: String,
    /// Bar width in percent, capped at 100.
    pub progress: u32,
    pub status: &'static str,
    pub status_label: &'static str,
}

impl BudgetRow {
    pub fn new(state: &AppState, row: &CategoryBudget) -> Self {
        Self {
            label: row.category.label(),
            budget: state.money(row.budget),
            spent: state.money(row.spent),
            percent: format_percent(row.percentage),
            progress: (row.progress() * 100.0).round() as u32,
            status: row.status.as_str(),
            status_label: row.status.label(),
        }
    }
}

pub struct BudgetAlert {
    pub message: String,
    pub overspent: bool,
}

pub struct ActivityView {
    pub date: String,
    pub total: String,
    pub notes: String,
    pub breakdown: Vec<ShareRow>,
}

pub struct ShareRow {
    pub label: &'static str,
    pub amount: String,
    pub share: String,
}

impl ActivityView {
    fn new(state: &AppState, entry: &ActivityEntry) -> Self {
        Self {
            date: entry.date.clone(),
            total: state.money(entry.total),
            notes: entry.notes.clone().unwrap_or_default(),
            breakdown: entry
                .amounts
                .iter()
                .filter(|(_, v)| **v > 0.0)
                .map(|(c, v)| share_row(state, *c, *v, entry.total))
                .collect(),
        }
    }
}

fn share_row(state: &AppState, category: Category, amount: f64, total: f64) -> ShareRow {
    let share = if total > 0.0 {
        100.0 * amount / total
    } else {
        0.0
    };
    ShareRow {
        label: category.label(),
        amount: state.money(amount),
        share: format_percent(share),
    }
}

pub async fn index(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> AppResult<Html<String>> {
    debug!(username = %username, "Loading dashboard");
    let profile = profiles::require_profile(&state.store, &username)?;
    let user_ledger = state.user_ledger(&cookies, &username)?;
    let (goals, goals_saved) = state.budget_goals(&username, &profile)?;

    let period = MonthKey::current();
    let bucket = user_ledger
        .ledger
        .bucket(period)
        .cloned()
        .unwrap_or_default();
    let summary = compute_dashboard_summary(&profile, &bucket, &goals);

    debug!(
        username = %username,
        records = bucket.len(),
        monthly_total = summary.monthly_total,
        savings_percent = summary.savings_percent,
        is_sample = user_ledger.is_sample,
        "Dashboard data loaded"
    );

    let alerts = summary
        .budget_status
        .alerts()
        .map(|row| {
            let overspent = row.status == BudgetStatus::Overspent;
            let message = if overspent {
                format!(
                    "{} is over budget by {}",
                    row.category.label(),
                    state.money(row.spent - row.budget)
                )
            } else {
                format!(
                    "{} has used {} of its budget",
                    row.category.label(),
                    format_percent(row.percentage)
                )
            };
            BudgetAlert { message, overspent }
        })
        .collect();

    let template = DashboardTemplate {
        page: state.page(&cookies, "Dashboard", Some(&username)),
        user_url: user_url(&username),
        month_label: period.long_label(),
        is_sample: user_ledger.is_sample,
        goals_saved,
        income: state.money(summary.income),
        total_expenses: state.money(summary.monthly_total),
        savings: state.money(summary.savings),
        savings_percent: format_percent(summary.savings_percent),
        savings_delta: format_signed_percent(summary.savings_goal_delta),
        savings_below_goal: summary.savings_goal_delta < 0.0,
        budget_rows: summary
            .budget_status
            .categories
            .iter()
            .map(|row| BudgetRow::new(&state, row))
            .collect(),
        alerts,
        recent: recent_activity(&user_ledger.ledger, RECENT_ACTIVITY_LIMIT)
            .iter()
            .map(|e| ActivityView::new(&state, e))
            .collect(),
        distribution: summary
            .top_categories(Category::ALL.len())
            .into_iter()
            .map(|(c, v)| share_row(&state, c, v, summary.monthly_total))
            .collect(),
        top_categories: summary
            .top_categories(TOP_CATEGORIES)
            .into_iter()
            .map(|(c, v)| share_row(&state, c, v, summary.monthly_total))
            .collect(),
    };

    template.render_html()
}
