use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Occupation {
    #[default]
    Professional,
    #[serde(rename = "Self_Employed")]
    SelfEmployed,
    Student,
    Retired,
}

impl Occupation {
    pub fn all() -> &'static [Occupation] {
        &[
            Self::Professional,
            Self::SelfEmployed,
            Self::Student,
            Self::Retired,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::SelfEmployed => "Self_Employed",
            Self::Student => "Student",
            Self::Retired => "Retired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SelfEmployed => "Self Employed",
            other => other.as_str(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|o| o.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CityTier {
    #[default]
    #[serde(rename = "Tier_1")]
    Tier1,
    #[serde(rename = "Tier_2")]
    Tier2,
    #[serde(rename = "Tier_3")]
    Tier3,
}

impl CityTier {
    pub fn all() -> &'static [CityTier] {
        &[Self::Tier1, Self::Tier2, Self::Tier3]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tier1 => "Tier_1",
            Self::Tier2 => "Tier_2",
            Self::Tier3 => "Tier_3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Tier1 => "Tier 1",
            Self::Tier2 => "Tier 2",
            Self::Tier3 => "Tier 3",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn all() -> &'static [RiskProfile] {
        &[Self::Conservative, Self::Moderate, Self::Aggressive]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|r| r.as_str() == s)
    }
}

/// A user's financial profile, stored as `<username>_profile.json`.
///
/// Field names match the on-disk document keys. Optional fields fall back
/// to their defaults so older documents without them still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age", default = "default_age")]
    pub age: u32,
    #[serde(rename = "Occupation", default)]
    pub occupation: Occupation,
    #[serde(rename = "City_Tier", default)]
    pub city_tier: CityTier,
    #[serde(rename = "Income", default)]
    pub income: f64,
    #[serde(rename = "Dependents", default)]
    pub dependents: u32,
    #[serde(rename = "Desired_Savings_Percentage", default = "default_savings_percentage")]
    pub desired_savings_percentage: f64,
    #[serde(rename = "Financial_Goals", default)]
    pub financial_goals: String,
    #[serde(rename = "Risk_Profile", default)]
    pub risk_profile: RiskProfile,
    #[serde(rename = "Has_Investments", default)]
    pub has_investments: bool,
    #[serde(rename = "Has_Loans", default)]
    pub has_loans: bool,
}

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120;
pub const MIN_INCOME: f64 = 1000.0;
pub const MAX_SAVINGS_PERCENTAGE: f64 = 50.0;

fn default_age() -> u32 {
    30
}

fn default_savings_percentage() -> f64 {
    20.0
}

impl Profile {
    pub fn new(name: impl Into<String>, income: f64) -> Self {
        Self {
            name: name.into(),
            age: default_age(),
            occupation: Occupation::default(),
            city_tier: CityTier::default(),
            income,
            dependents: 0,
            desired_savings_percentage: default_savings_percentage(),
            financial_goals: String::new(),
            risk_profile: RiskProfile::default(),
            has_investments: false,
            has_loans: false,
        }
    }

    pub fn has_financial_goals(&self) -> bool {
        !self.financial_goals.trim().is_empty()
    }
}
