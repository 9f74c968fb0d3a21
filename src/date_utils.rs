use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// Timestamp format used for expense records and notifications.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How many years back the expense forms offer.
pub const SELECTABLE_YEARS_BACK: i32 = 2;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A (year, month) bucket in the expense ledger.
///
/// Ordering is chronological: year first, then month as a number, so
/// December 2023 sorts before January 2024 and month 9 before month 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse the string keys used in the expenses document.
    ///
    /// Accepts zero-padded months ("09") as well as the usual "9".
    pub fn parse(year: &str, month: &str) -> Option<Self> {
        let year = year.trim().parse().ok()?;
        let month = month.trim().parse().ok()?;
        Self::new(year, month)
    }

    /// Composite "YYYY-MM" key with a zero-padded month.
    pub fn sort_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn year_key(&self) -> String {
        self.year.to_string()
    }

    pub fn month_key(&self) -> String {
        self.month.to_string()
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Short label, e.g. "Sep 2023".
    pub fn label(&self) -> String {
        format!("{} {}", &self.month_name()[..3], self.year)
    }

    /// Long label, e.g. "September 2023".
    pub fn long_label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sort_key())
    }
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES
        .get(month.wrapping_sub(1) as usize)
        .copied()
        .unwrap_or("Unknown")
}

/// Years offered by the expense entry and filter forms, oldest first.
pub fn selectable_years(current_year: i32) -> Vec<i32> {
    (current_year - SELECTABLE_YEARS_BACK..=current_year).collect()
}

pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()
}

/// Display date for a record: "Sep 05, 2023" from its timestamp, or the
/// bucket's long label when the timestamp is missing or malformed.
pub fn display_date(timestamp: Option<&str>, period: MonthKey) -> String {
    timestamp
        .and_then(parse_timestamp)
        .map(|ts| ts.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| period.long_label())
}
