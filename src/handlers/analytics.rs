use askama::Template;
use axum::extract::{Path, State};
use axum::response::Html;
use tower_cookies::Cookies;
use tracing::debug;

use crate::error::{AppResult, RenderHtml};
use crate::filters::{format_percent, format_signed_percent};
use crate::models::Category;
use crate::services::analytics::{compute_analytics, SpendingTrend};
use crate::state::{AppState, PageContext};
use crate::storage::profiles;

#[derive(Template)]
#[template(path = "pages/analytics.html")]
pub struct AnalyticsTemplate {
    pub page: PageContext,
    pub is_sample: bool,
    pub has_data: bool,
    pub category_headers: Vec<&'static str>,
    pub months: Vec<MonthRow>,
    pub average_monthly: String,
    pub highest: String,
    pub lowest: String,
    pub trend_message: String,
    pub trend_class: &'static str,
    pub category_averages: Vec<AverageRow>,
    pub top_category: String,
    pub top_share: String,
    pub top_dominant: bool,
    pub average_savings: String,
    pub average_savings_percent: String,
    pub savings_delta: String,
    pub below_target: bool,
    pub target_percent: String,
    pub total_saved: String,
    pub projection_one: String,
    pub projection_three: String,
    pub projection_five: String,
}

pub struct MonthRow {
    pub label: String,
    pub amounts: Vec<String>,
    pub total: String,
    /// Bar width relative to the highest month, in percent.
    pub bar: u32,
    pub savings: String,
    pub savings_percent: String,
}

pub struct AverageRow {
    pub label: &'static str,
    pub average: String,
    pub bar: u32,
}

fn bar_width(value: f64, max: f64) -> u32 {
    if max > 0.0 {
        (100.0 * value / max).clamp(0.0, 100.0).round() as u32
    } else {
        0
    }
}

pub async fn index(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> AppResult<Html<String>> {
    let profile = profiles::require_profile(&state.store, &username)?;
    let user_ledger = state.user_ledger(&cookies, &username)?;
    let analytics = compute_analytics(&profile, &user_ledger.ledger);

    debug!(
        username = %username,
        months = analytics.trend_series.len(),
        is_sample = user_ledger.is_sample,
        "Analytics computed"
    );

    let max_total = analytics
        .trend_series
        .iter()
        .map(|m| m.total)
        .fold(0.0, f64::max);
    let months = analytics
        .trend_series
        .iter()
        .zip(&analytics.savings_series)
        .map(|(month, saved)| MonthRow {
            label: month.label.clone(),
            amounts: Category::ALL
                .iter()
                .map(|c| state.money(month.category_totals.get(c).copied().unwrap_or(0.0)))
                .collect(),
            total: state.money(month.total),
            bar: bar_width(month.total, max_total),
            savings: state.money(saved.savings),
            savings_percent: format_percent(saved.savings_percent),
        })
        .collect();

    let max_average = analytics
        .category_averages
        .first()
        .map(|a| a.average)
        .unwrap_or(0.0);
    let category_averages = analytics
        .category_averages
        .iter()
        .map(|a| AverageRow {
            label: a.category.label(),
            average: state.money(a.average),
            bar: bar_width(a.average, max_average),
        })
        .collect();

    let mut template = AnalyticsTemplate {
        page: state.page(&cookies, "Analytics", Some(&username)),
        is_sample: user_ledger.is_sample,
        has_data: !analytics.is_empty(),
        category_headers: Category::ALL.iter().map(|c| c.label()).collect(),
        months,
        average_monthly: String::new(),
        highest: String::new(),
        lowest: String::new(),
        trend_message: String::new(),
        trend_class: "steady",
        category_averages,
        top_category: String::new(),
        top_share: String::new(),
        top_dominant: false,
        average_savings: String::new(),
        average_savings_percent: String::new(),
        savings_delta: String::new(),
        below_target: false,
        target_percent: format_percent(profile.desired_savings_percentage),
        total_saved: String::new(),
        projection_one: String::new(),
        projection_three: String::new(),
        projection_five: String::new(),
    };

    if let Some(averages) = &analytics.averages {
        template.average_monthly = state.money(averages.average_monthly);
        template.highest = format!(
            "{} ({})",
            state.money(averages.highest.amount),
            averages.highest.label
        );
        template.lowest = format!(
            "{} ({})",
            state.money(averages.lowest.amount),
            averages.lowest.label
        );
        let (message, class) = match averages.trend {
            SpendingTrend::Rising => (
                format!(
                    "Spending is trending up: recent months average {}",
                    state.money(averages.recent_average)
                ),
                "rising",
            ),
            SpendingTrend::Falling => (
                format!(
                    "Spending is trending down: recent months average {}",
                    state.money(averages.recent_average)
                ),
                "falling",
            ),
            SpendingTrend::Steady => ("Spending is steady".to_string(), "steady"),
            SpendingTrend::Insufficient => (
                "Add more months of expenses to see a trend".to_string(),
                "steady",
            ),
        };
        template.trend_message = message;
        template.trend_class = class;
    }

    if let Some(top) = &analytics.top_category {
        template.top_category = top.category.label().to_string();
        template.top_share = format_percent(top.share_percent);
        template.top_dominant = top.dominant;
    }

    if let Some(overview) = &analytics.savings {
        template.average_savings = state.money(overview.average_savings);
        template.average_savings_percent = format_percent(overview.average_savings_percent);
        template.savings_delta = format_signed_percent(overview.delta_percent);
        template.below_target = overview.delta_percent < 0.0;
        template.total_saved = state.money(overview.total_saved);
    }

    if let Some(projections) = &analytics.projections {
        template.projection_one = state.money(projections.one_year);
        template.projection_three = state.money(projections.three_years);
        template.projection_five = state.money(projections.five_years);
    }

    template.render_html()
}
