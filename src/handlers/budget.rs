use std::collections::HashMap;

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use tower_cookies::Cookies;
use tracing::{debug, info};

use super::dashboard::BudgetRow;
use super::user_url;
use crate::date_utils::MonthKey;
use crate::error::{AppError, AppResult, RenderHtml};
use crate::filters::format_percent;
use crate::form_utils::parse_amount;
use crate::models::{BudgetGoals, Category, NotificationKind};
use crate::services::aggregation::{category_totals, monthly_total, savings, savings_percent};
use crate::services::budget::{evaluate, savings_advice, SavingsAdvice};
use crate::services::savings::potential_savings;
use crate::state::{AppState, PageContext};
use crate::storage::{budgets, profiles};

#[derive(Template)]
#[template(path = "pages/budget.html")]
pub struct BudgetTemplate {
    pub page: PageContext,
    pub form_action: String,
    pub month_label: String,
    pub is_sample: bool,
    pub goals_saved: bool,
    pub goal_inputs: Vec<GoalInput>,
    pub rows: Vec<BudgetTableRow>,
    pub total_budget: String,
    pub total_spent: String,
    pub total_remaining: String,
    pub total_percent: String,
    pub total_progress: u32,
    pub total_over: bool,
    pub below_goal: bool,
    pub savings_percent: String,
    pub goal_percent: String,
    pub reduce: Vec<String>,
    pub suggest_investments: bool,
    pub potential: Vec<PotentialRow>,
    pub potential_total: String,
}

pub struct GoalInput {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
}

pub struct BudgetTableRow {
    pub row: BudgetRow,
    pub remaining: String,
    pub over: bool,
}

pub struct PotentialRow {
    pub label: &'static str,
    pub spent: String,
    pub potential: String,
}

/// Validate the goal form. Every category gets a goal; blank means zero.
pub fn parse_goals_form(form: &HashMap<String, String>) -> AppResult<BudgetGoals> {
    Category::ALL
        .iter()
        .map(|c| {
            parse_amount(c.label(), form.get(c.as_str()).map(String::as_str))
                .map(|amount| (*c, amount))
                .map_err(AppError::Validation)
        })
        .collect()
}

pub async fn index(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> AppResult<Html<String>> {
    let profile = profiles::require_profile(&state.store, &username)?;
    let user_ledger = state.user_ledger(&cookies, &username)?;
    let (goals, goals_saved) = state.budget_goals(&username, &profile)?;

    let period = MonthKey::current();
    let bucket = user_ledger
        .ledger
        .bucket(period)
        .cloned()
        .unwrap_or_default();
    let totals = category_totals(bucket.values());
    let evaluation = evaluate(&totals, &goals);

    let spent = monthly_total(&totals);
    let saved = savings(profile.income, spent);
    let advice = savings_advice(&profile, saved, savings_percent(saved, profile.income), &evaluation);
    let potential = potential_savings(&totals, profile.city_tier);

    debug!(
        username = %username,
        goals_saved,
        total_budget = evaluation.total_budget,
        total_spent = evaluation.total_spent,
        "Budget page loaded"
    );

    let (below_goal, savings_pct, goal_pct, reduce, suggest_investments): (
        bool,
        f64,
        f64,
        Vec<String>,
        bool,
    ) = match &advice {
        SavingsAdvice::BelowGoal {
            savings_percent,
            goal_percent,
            reduce,
        } => (
            true,
            *savings_percent,
            *goal_percent,
            reduce
                .iter()
                .map(|o| format!("Reduce {} spending by {}", o.category.label(), state.money(o.amount)))
                .collect(),
            false,
        ),
        SavingsAdvice::MeetsGoal {
            savings_percent,
            goal_percent,
            suggest_investments,
        } => (false, *savings_percent, *goal_percent, Vec::new(), *suggest_investments),
    };

    let template = BudgetTemplate {
        page: state.page(&cookies, "Budget", Some(&username)),
        form_action: format!("{}/budget", user_url(&username)),
        month_label: period.long_label(),
        is_sample: user_ledger.is_sample,
        goals_saved,
        goal_inputs: Category::ALL
            .iter()
            .map(|c| GoalInput {
                name: c.as_str(),
                label: c.label(),
                value: format!("{:.2}", goals.get(*c)),
            })
            .collect(),
        rows: evaluation
            .categories
            .iter()
            .map(|row| BudgetTableRow {
                row: BudgetRow::new(&state, row),
                remaining: state.money(row.remaining),
                over: row.remaining < 0.0,
            })
            .collect(),
        total_budget: state.money(evaluation.total_budget),
        total_spent: state.money(evaluation.total_spent),
        total_remaining: state.money(evaluation.overall_remaining),
        total_percent: format_percent(evaluation.overall_percentage),
        total_progress: (evaluation.overall_progress() * 100.0).round() as u32,
        total_over: evaluation.overall_remaining < 0.0,
        below_goal,
        savings_percent: format_percent(savings_pct),
        goal_percent: format_percent(goal_pct),
        reduce,
        suggest_investments,
        potential: potential
            .per_category
            .iter()
            .map(|(c, amount)| PotentialRow {
                label: c.label(),
                spent: state.money(totals.get(c).copied().unwrap_or(0.0)),
                potential: state.money(*amount),
            })
            .collect(),
        potential_total: state.money(potential.total),
    };

    template.render_html()
}

pub async fn update(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    profiles::require_profile(&state.store, &username)?;
    let goals = parse_goals_form(&form)?;

    budgets::save_budget_goals(&state.store, &username, &goals)?;
    info!(username = %username, total = goals.total(), "Budget goals updated via web form");
    state.notify(&cookies, "Budget goals updated", NotificationKind::Success);

    Ok(Redirect::to(&format!("{}/budget", user_url(&username))))
}
