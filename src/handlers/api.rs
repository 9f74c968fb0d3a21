use axum::extract::{Path, State};
use axum::response::Json;
use serde::Serialize;
use tower_cookies::Cookies;

use crate::date_utils::MonthKey;
use crate::error::AppResult;
use crate::services::analytics::{compute_analytics, compute_dashboard_summary, Analytics, DashboardSummary};
use crate::state::AppState;
use crate::storage::profiles;

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub period: MonthKey,
    pub is_sample: bool,
    pub goals_saved: bool,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub is_sample: bool,
    #[serde(flatten)]
    pub analytics: Analytics,
}

/// Current-month dashboard summary for charts.
pub async fn summary(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> AppResult<Json<SummaryResponse>> {
    let profile = profiles::require_profile(&state.store, &username)?;
    let user_ledger = state.user_ledger(&cookies, &username)?;
    let (goals, goals_saved) = state.budget_goals(&username, &profile)?;

    let period = MonthKey::current();
    let bucket = user_ledger
        .ledger
        .bucket(period)
        .cloned()
        .unwrap_or_default();

    Ok(Json(SummaryResponse {
        period,
        is_sample: user_ledger.is_sample,
        goals_saved,
        summary: compute_dashboard_summary(&profile, &bucket, &goals),
    }))
}

pub async fn analytics(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> AppResult<Json<AnalyticsResponse>> {
    let profile = profiles::require_profile(&state.store, &username)?;
    let user_ledger = state.user_ledger(&cookies, &username)?;

    Ok(Json(AnalyticsResponse {
        is_sample: user_ledger.is_sample,
        analytics: compute_analytics(&profile, &user_ledger.ledger),
    }))
}
