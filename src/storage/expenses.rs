use tracing::info;
use uuid::Uuid;

use super::{read_document, write_document, FileStore, EXPENSES_SUFFIX};
use crate::date_utils::{now_timestamp, MonthKey};
use crate::error::AppResult;
use crate::models::{ExpenseLedger, ExpenseRecord, MonthBucket, NewExpenseRecord};

pub fn load_all(store: &FileStore, username: &str) -> AppResult<ExpenseLedger> {
    let path = store.user_file(username, EXPENSES_SUFFIX)?;
    Ok(read_document(&path))
}

/// Records of a single month. An absent month is an empty bucket.
pub fn load_month(store: &FileStore, username: &str, period: MonthKey) -> AppResult<MonthBucket> {
    let ledger = load_all(store, username)?;
    Ok(ledger.bucket(period).cloned().unwrap_or_default())
}

/// The ledger restricted to the given year and month; None matches every value.
pub fn load_expenses(
    store: &FileStore,
    username: &str,
    year: Option<i32>,
    month: Option<u32>,
) -> AppResult<ExpenseLedger> {
    let ledger = load_all(store, username)?;
    if year.is_none() && month.is_none() {
        return Ok(ledger);
    }
    Ok(ledger.filtered(year, month))
}

/// Append a record to the month's bucket and return its new id.
pub fn save_expense(
    store: &FileStore,
    username: &str,
    period: MonthKey,
    entry: NewExpenseRecord,
) -> AppResult<String> {
    let path = store.user_file(username, EXPENSES_SUFFIX)?;
    let mut ledger: ExpenseLedger = read_document(&path);

    let id = Uuid::new_v4().to_string();
    let total = entry.total();
    let record = ExpenseRecord {
        amounts: entry.amounts,
        timestamp: Some(now_timestamp()),
        notes: entry.notes,
        ..ExpenseRecord::default()
    };
    ledger.insert(period, id.clone(), record);
    write_document(&path, &ledger)?;

    info!(username, period = %period, id = %id, total, "Expense record saved");
    Ok(id)
}
