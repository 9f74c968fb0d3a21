use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expense categories in display order.
///
/// The derived `Ord` follows declaration order, so a `BTreeMap<Category, _>`
/// iterates in the same order the forms and tables show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Transport,
    #[serde(rename = "Eating_Out")]
    EatingOut,
    Entertainment,
    Utilities,
    Healthcare,
    Education,
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Groceries,
        Category::Transport,
        Category::EatingOut,
        Category::Entertainment,
        Category::Utilities,
        Category::Healthcare,
        Category::Education,
        Category::Miscellaneous,
    ];

    /// Key used in the JSON documents and form field names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Transport => "Transport",
            Self::EatingOut => "Eating_Out",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::EatingOut => "Eating Out",
            other => other.as_str(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Groceries => "Food items, household supplies, etc.",
            Self::Transport => "Fuel, public transport, ride-sharing, etc.",
            Self::EatingOut => "Restaurants, cafes, food delivery, etc.",
            Self::Entertainment => "Movies, events, subscriptions, etc.",
            Self::Utilities => "Electricity, water, internet, mobile, etc.",
            Self::Healthcare => "Medicines, doctor visits, insurance, etc.",
            Self::Education => "Courses, books, tuition, etc.",
            Self::Miscellaneous => "Other expenses not fitting above categories",
        }
    }

    /// Share of monthly income used as the budget goal when a user has not set one.
    pub fn default_budget_share(&self) -> f64 {
        match self {
            Self::Groceries => 0.20,
            Self::Transport => 0.10,
            Self::EatingOut => 0.10,
            Self::Entertainment => 0.05,
            Self::Utilities => 0.15,
            Self::Healthcare => 0.05,
            Self::Education => 0.10,
            Self::Miscellaneous => 0.05,
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
