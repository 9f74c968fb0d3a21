use std::collections::HashMap;

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::Form;
use chrono::Datelike;
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{debug, info, warn};

use super::{user_url, SelectOption};
use crate::date_utils::{month_name, selectable_years, MonthKey};
use crate::error::{AppError, AppResult, RenderHtml};
use crate::form_utils::{deserialize_optional_i32, deserialize_optional_u32, parse_amount};
use crate::models::{Category, NewExpenseRecord, NotificationKind};
use crate::services::aggregation::{activity, ActivityEntry};
use crate::services::budget::entry_overspends;
use crate::state::{AppState, PageContext};
use crate::storage::{budgets, expenses, profiles};

#[derive(Template)]
#[template(path = "pages/expenses.html")]
pub struct ExpensesTemplate {
    pub page: PageContext,
    pub form_action: String,
    pub entry_months: Vec<SelectOption>,
    pub entry_years: Vec<SelectOption>,
    pub category_inputs: Vec<CategoryInput>,
    pub filter_months: Vec<SelectOption>,
    pub filter_years: Vec<SelectOption>,
    pub category_headers: Vec<&'static str>,
    pub rows: Vec<ExpenseRow>,
    pub unrecognized_keys: String,
    pub has_unrecognized: bool,
}

pub struct CategoryInput {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub struct ExpenseRow {
    pub date: String,
    pub amounts: Vec<String>,
    pub total: String,
    pub notes: String,
    pub unrecognized: String,
}

impl ExpenseRow {
    fn new(state: &AppState, entry: &ActivityEntry) -> Self {
        Self {
            date: entry.date.clone(),
            amounts: Category::ALL
                .iter()
                .map(|c| state.money(entry.amounts.get(c).copied().unwrap_or(0.0)))
                .collect(),
            total: state.money(entry.total),
            notes: entry.notes.clone().unwrap_or_default(),
            unrecognized: entry.unrecognized.join(", "),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryFilter {
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub month: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub year: Option<i32>,
}

/// Validate the entry form into the target month and record.
///
/// Category amounts are read from fields named after the category keys.
pub fn parse_entry_form(
    form: &HashMap<String, String>,
    current_year: i32,
) -> AppResult<(MonthKey, NewExpenseRecord)> {
    let month: u32 = form
        .get("month")
        .and_then(|m| m.trim().parse().ok())
        .ok_or_else(|| AppError::Validation("Month is required".into()))?;
    let year: i32 = form
        .get("year")
        .and_then(|y| y.trim().parse().ok())
        .ok_or_else(|| AppError::Validation("Year is required".into()))?;

    if !selectable_years(current_year).contains(&year) {
        return Err(AppError::Validation(format!(
            "Year must be between {} and {}",
            current_year - crate::date_utils::SELECTABLE_YEARS_BACK,
            current_year
        )));
    }
    let period = MonthKey::new(year, month)
        .ok_or_else(|| AppError::Validation("Month must be between 1 and 12".into()))?;

    let mut entry = NewExpenseRecord::default();
    for category in Category::ALL {
        let amount = parse_amount(category.label(), form.get(category.as_str()).map(String::as_str))
            .map_err(AppError::Validation)?;
        entry.amounts.insert(category, amount);
    }
    entry.notes = form
        .get("notes")
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok((period, entry))
}

pub async fn index(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
    Query(filter): Query<HistoryFilter>,
) -> AppResult<Html<String>> {
    profiles::require_profile(&state.store, &username)?;
    if let Some(month) = filter.month {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation("Month must be between 1 and 12".into()));
        }
    }

    let ledger = expenses::load_all(&state.store, &username)?;
    let unrecognized = ledger.unrecognized_keys();
    if !unrecognized.is_empty() {
        warn!(username = %username, keys = ?unrecognized, "Expense records carry unrecognized keys");
    }

    let filtered = ledger.filtered(filter.year, filter.month);
    let entries = activity(&filtered);
    debug!(
        username = %username,
        month = ?filter.month,
        year = ?filter.year,
        rows = entries.len(),
        "Expense history loaded"
    );

    let now = MonthKey::current();
    let mut years: Vec<i32> = selectable_years(now.year);
    years.extend(ledger.buckets().map(|(period, _)| period.year));
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();

    let mut filter_months = vec![SelectOption::new("", "All", filter.month.is_none())];
    filter_months.extend(
        (1..=12).map(|m| SelectOption::new(m.to_string(), month_name(m), filter.month == Some(m))),
    );
    let mut filter_years = vec![SelectOption::new("", "All", filter.year.is_none())];
    filter_years.extend(
        years
            .iter()
            .map(|y| SelectOption::new(y.to_string(), y.to_string(), filter.year == Some(*y))),
    );

    let template = ExpensesTemplate {
        page: state.page(&cookies, "Expenses", Some(&username)),
        form_action: format!("{}/expenses", user_url(&username)),
        entry_months: (1..=12)
            .map(|m| SelectOption::new(m.to_string(), month_name(m), m == now.month))
            .collect(),
        entry_years: selectable_years(now.year)
            .into_iter()
            .rev()
            .map(|y| SelectOption::new(y.to_string(), y.to_string(), y == now.year))
            .collect(),
        category_inputs: Category::ALL
            .iter()
            .map(|c| CategoryInput {
                name: c.as_str(),
                label: c.label(),
                description: c.description(),
            })
            .collect(),
        filter_months,
        filter_years,
        category_headers: Category::ALL.iter().map(|c| c.label()).collect(),
        rows: entries.iter().map(|e| ExpenseRow::new(&state, e)).collect(),
        has_unrecognized: !unrecognized.is_empty(),
        unrecognized_keys: unrecognized.join(", "),
    };

    template.render_html()
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> AppResult<Redirect> {
    profiles::require_profile(&state.store, &username)?;
    let (period, entry) = parse_entry_form(&form, chrono::Local::now().year())?;
    debug!(username = %username, period = %period, total = entry.total(), "Creating expense record");

    let overspends = match budgets::load_budget_goals(&state.store, &username)? {
        Some(goals) => entry_overspends(&entry, &goals),
        None => Vec::new(),
    };
    let total = entry.total();

    let id = expenses::save_expense(&state.store, &username, period, entry)?;
    info!(username = %username, id = %id, "Expense created via web form");

    state.notify(
        &cookies,
        format!("New expense entry of {} added", state.money(total)),
        NotificationKind::Success,
    );
    if !overspends.is_empty() {
        let details: Vec<String> = overspends
            .iter()
            .map(|o| format!("Overspent on {} by {}", o.category.label(), state.money(o.amount)))
            .collect();
        state.notify(
            &cookies,
            format!("Budget alert: {}", details.join(", ")),
            NotificationKind::Warning,
        );
    }

    Ok(Redirect::to(&format!("{}/expenses", user_url(&username))))
}
