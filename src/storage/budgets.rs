use tracing::info;

use super::{read_document, write_document, FileStore, BUDGET_SUFFIX};
use crate::error::AppResult;
use crate::models::BudgetGoals;

/// Saved budget goals, or None when the user has not saved any.
pub fn load_budget_goals(store: &FileStore, username: &str) -> AppResult<Option<BudgetGoals>> {
    let path = store.user_file(username, BUDGET_SUFFIX)?;
    let goals: BudgetGoals = read_document(&path);
    Ok(if goals.is_empty() { None } else { Some(goals) })
}

pub fn save_budget_goals(store: &FileStore, username: &str, goals: &BudgetGoals) -> AppResult<()> {
    let path = store.user_file(username, BUDGET_SUFFIX)?;
    write_document(&path, goals)?;
    info!(username, total = goals.total(), "Budget goals saved");
    Ok(())
}
