use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::date_utils::MonthKey;
use crate::models::Category;

const TIMESTAMP_KEY: &str = "timestamp";
const NOTES_KEY: &str = "notes";

/// One month's expense entry.
///
/// On disk a record is a flat JSON object mixing category amounts with the
/// `timestamp` and `notes` keys. Keys that are neither are kept in
/// `unrecognized` so they survive a rewrite of the document, but they never
/// count towards any total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ExpenseRecord {
    pub amounts: BTreeMap<Category, f64>,
    pub timestamp: Option<String>,
    pub notes: Option<String>,
    pub unrecognized: BTreeMap<String, Value>,
}

impl ExpenseRecord {
    pub fn amount(&self, category: Category) -> f64 {
        self.amounts.get(&category).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.amount(*c)).sum()
    }

    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }

    pub fn has_unrecognized(&self) -> bool {
        !self.unrecognized.is_empty()
    }
}

impl From<Map<String, Value>> for ExpenseRecord {
    fn from(map: Map<String, Value>) -> Self {
        let mut record = ExpenseRecord::default();

        for (key, value) in map {
            match key.as_str() {
                TIMESTAMP_KEY => record.timestamp = value.as_str().map(String::from),
                NOTES_KEY => {
                    record.notes = value
                        .as_str()
                        .filter(|s| !s.trim().is_empty())
                        .map(String::from)
                }
                _ => match (key.parse::<Category>(), value.as_f64()) {
                    (Ok(category), Some(amount)) => {
                        record.amounts.insert(category, amount);
                    }
                    _ => {
                        record.unrecognized.insert(key, value);
                    }
                },
            }
        }

        record
    }
}

impl From<ExpenseRecord> for Map<String, Value> {
    fn from(record: ExpenseRecord) -> Self {
        let mut map = Map::new();
        for (key, value) in record.unrecognized {
            map.insert(key, value);
        }
        for (category, amount) in record.amounts {
            map.insert(category.as_str().to_string(), amount_value(amount));
        }
        map.insert(
            NOTES_KEY.into(),
            Value::String(record.notes.unwrap_or_default()),
        );
        if let Some(ts) = record.timestamp {
            map.insert(TIMESTAMP_KEY.into(), Value::String(ts));
        }
        map
    }
}

/// Whole amounts are written as JSON integers, as the entry form produces them.
pub(crate) fn amount_value(amount: f64) -> Value {
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        Value::from(amount as i64)
    } else {
        Value::from(amount)
    }
}

/// A record as submitted by the entry form, before the store stamps it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewExpenseRecord {
    pub amounts: BTreeMap<Category, f64>,
    pub notes: Option<String>,
}

impl NewExpenseRecord {
    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }
}

/// Records of one month, keyed by entry id.
pub type MonthBucket = BTreeMap<String, ExpenseRecord>;

type RawLedger = BTreeMap<String, BTreeMap<String, MonthBucket>>;

/// All expense records of one user, grouped by month.
///
/// Serialized as `{year: {month: {entry_id: record}}}` with string keys.
/// Buckets whose year or month key cannot be parsed are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLedger", into = "RawLedger")]
pub struct ExpenseLedger {
    buckets: BTreeMap<MonthKey, MonthBucket>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, period: MonthKey, id: String, record: ExpenseRecord) {
        self.buckets.entry(period).or_default().insert(id, record);
    }

    pub fn bucket(&self, period: MonthKey) -> Option<&MonthBucket> {
        self.buckets.get(&period)
    }

    /// Buckets in chronological order.
    pub fn buckets(&self) -> impl Iterator<Item = (&MonthKey, &MonthBucket)> {
        self.buckets.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = (MonthKey, &str, &ExpenseRecord)> {
        self.buckets.iter().flat_map(|(period, bucket)| {
            bucket
                .iter()
                .map(move |(id, record)| (*period, id.as_str(), record))
        })
    }

    pub fn record_count(&self) -> usize {
        self.buckets.values().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Keep only buckets matching the given year and month (None matches all).
    pub fn filtered(&self, year: Option<i32>, month: Option<u32>) -> ExpenseLedger {
        let buckets = self
            .buckets
            .iter()
            .filter(|(period, _)| year.map_or(true, |y| period.year == y))
            .filter(|(period, _)| month.map_or(true, |m| period.month == m))
            .map(|(period, bucket)| (*period, bucket.clone()))
            .collect();
        ExpenseLedger { buckets }
    }

    /// Distinct unrecognized keys across all records, sorted.
    pub fn unrecognized_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .records()
            .flat_map(|(_, _, record)| record.unrecognized.keys().cloned())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl From<RawLedger> for ExpenseLedger {
    fn from(raw: RawLedger) -> Self {
        let mut ledger = ExpenseLedger::new();
        for (year, months) in raw {
            for (month, bucket) in months {
                let Some(period) = MonthKey::parse(&year, &month) else {
                    tracing::warn!(year = %year, month = %month, "Skipping expense bucket with invalid key");
                    continue;
                };
                let entry = ledger.buckets.entry(period).or_default();
                entry.extend(bucket);
            }
        }
        ledger
    }
}

impl From<ExpenseLedger> for RawLedger {
    fn from(ledger: ExpenseLedger) -> Self {
        let mut raw = RawLedger::new();
        for (period, bucket) in ledger.buckets {
            raw.entry(period.year_key())
                .or_default()
                .insert(period.month_key(), bucket);
        }
        raw
    }
}
