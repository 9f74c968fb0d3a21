//! Illustrative expense history shown to users who have not recorded anything yet.

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use uuid::Uuid;

use crate::date_utils::{MonthKey, TIMESTAMP_FORMAT};
use crate::models::{Category, ExpenseLedger, ExpenseRecord};

pub const SAMPLE_MONTHS: u32 = 6;

/// Generate `months` buckets stepping back 30 days at a time from `now`.
///
/// Each bucket holds 3 to 5 records with every category filled in.
pub fn generate_sample_data<R: Rng + ?Sized>(
    now: NaiveDateTime,
    months: u32,
    rng: &mut R,
) -> ExpenseLedger {
    let mut ledger = ExpenseLedger::new();

    for i in 0..months {
        let target = now - Duration::days(30 * i64::from(i));
        let period = MonthKey::from_date(target.date());

        for _ in 0..rng.gen_range(3..6) {
            let mut record = ExpenseRecord::default();
            for category in Category::ALL {
                let base = f64::from(rng.gen_range(500u32..5000));
                let variation: f64 = rng.gen_range(0.8..1.2);
                record.amounts.insert(category, (base * variation).round());
            }
            let created = target - Duration::days(rng.gen_range(1..28));
            record.timestamp = Some(created.format(TIMESTAMP_FORMAT).to_string());

            ledger.insert(period, Uuid::new_v4().to_string(), record);
        }
    }

    tracing::debug!(
        months,
        records = ledger.record_count(),
        "Generated sample expense data"
    );
    ledger
}
