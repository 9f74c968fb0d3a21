use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{debug, info};

use super::{user_url, SelectOption};
use crate::error::{AppError, AppResult, RenderHtml};
use crate::models::profile::{MAX_AGE, MAX_SAVINGS_PERCENTAGE, MIN_AGE, MIN_INCOME};
use crate::models::{CityTier, NotificationKind, Occupation, Profile, RiskProfile};
use crate::state::{AppState, PageContext};
use crate::storage::{profiles, validate_username};

#[derive(Template)]
#[template(path = "pages/profiles.html")]
pub struct ProfilesTemplate {
    pub page: PageContext,
    pub profiles: Vec<ProfileLink>,
    pub form: ProfileFormView,
}

#[derive(Template)]
#[template(path = "pages/profile_edit.html")]
pub struct ProfileEditTemplate {
    pub page: PageContext,
    pub form_action: String,
    pub form: ProfileFormView,
}

pub struct ProfileLink {
    pub name: String,
    pub url: String,
}

/// Current values and choices for the profile form.
pub struct ProfileFormView {
    pub name: String,
    pub age: String,
    pub income: String,
    pub dependents: String,
    pub desired_savings_percentage: String,
    pub financial_goals: String,
    pub has_investments: bool,
    pub has_loans: bool,
    pub occupations: Vec<SelectOption>,
    pub city_tiers: Vec<SelectOption>,
    pub risk_profiles: Vec<SelectOption>,
    pub min_age: u32,
    pub max_age: u32,
    pub min_income: f64,
    pub max_savings_percentage: f64,
}

impl ProfileFormView {
    fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age.to_string(),
            income: profile.income.to_string(),
            dependents: profile.dependents.to_string(),
            desired_savings_percentage: profile.desired_savings_percentage.to_string(),
            financial_goals: profile.financial_goals.clone(),
            has_investments: profile.has_investments,
            has_loans: profile.has_loans,
            occupations: Occupation::all()
                .iter()
                .map(|o| SelectOption::new(o.as_str(), o.label(), *o == profile.occupation))
                .collect(),
            city_tiers: CityTier::all()
                .iter()
                .map(|t| SelectOption::new(t.as_str(), t.label(), *t == profile.city_tier))
                .collect(),
            risk_profiles: RiskProfile::all()
                .iter()
                .map(|r| SelectOption::new(r.as_str(), r.as_str(), *r == profile.risk_profile))
                .collect(),
            min_age: MIN_AGE,
            max_age: MAX_AGE,
            min_income: MIN_INCOME,
            max_savings_percentage: MAX_SAVINGS_PERCENTAGE,
        }
    }

    fn blank() -> Self {
        let mut view = Self::from_profile(&Profile::new("", 50000.0));
        view.name.clear();
        view
    }
}

/// Profile form fields. The name is only read on create.
#[derive(Debug, Deserialize)]
pub struct ProfileFormData {
    #[serde(default)]
    pub name: String,
    pub age: String,
    pub occupation: String,
    pub city_tier: String,
    pub income: String,
    #[serde(default)]
    pub dependents: String,
    pub desired_savings_percentage: String,
    #[serde(default)]
    pub financial_goals: String,
    pub risk_profile: String,
    pub has_investments: Option<String>,
    pub has_loans: Option<String>,
}

impl ProfileFormData {
    /// Validate the submitted fields into a profile for `name`.
    pub fn into_profile(self, name: &str) -> AppResult<Profile> {
        validate_username(name)?;

        let age: u32 = parse_field("Age", &self.age)?;
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(AppError::Validation(format!(
                "Age must be between {} and {}",
                MIN_AGE, MAX_AGE
            )));
        }

        let income: f64 = parse_field("Income", &self.income)?;
        if !income.is_finite() || income < MIN_INCOME {
            return Err(AppError::Validation(format!(
                "Income must be at least {}",
                MIN_INCOME
            )));
        }

        let dependents: u32 = if self.dependents.trim().is_empty() {
            0
        } else {
            parse_field("Dependents", &self.dependents)?
        };

        let desired: f64 = parse_field("Desired savings percentage", &self.desired_savings_percentage)?;
        if !(0.0..=MAX_SAVINGS_PERCENTAGE).contains(&desired) {
            return Err(AppError::Validation(format!(
                "Desired savings percentage must be between 0 and {}",
                MAX_SAVINGS_PERCENTAGE
            )));
        }

        let occupation = Occupation::parse(&self.occupation)
            .ok_or_else(|| AppError::Validation(format!("Unknown occupation '{}'", self.occupation)))?;
        let city_tier = CityTier::parse(&self.city_tier)
            .ok_or_else(|| AppError::Validation(format!("Unknown city tier '{}'", self.city_tier)))?;
        let risk_profile = RiskProfile::parse(&self.risk_profile).ok_or_else(|| {
            AppError::Validation(format!("Unknown risk profile '{}'", self.risk_profile))
        })?;

        Ok(Profile {
            name: name.to_string(),
            age,
            occupation,
            city_tier,
            income,
            dependents,
            desired_savings_percentage: desired,
            financial_goals: self.financial_goals.trim().to_string(),
            risk_profile,
            has_investments: self.has_investments.is_some(),
            has_loans: self.has_loans.is_some(),
        })
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a number", field)))
}

pub async fn index(State(state): State<AppState>, cookies: Cookies) -> AppResult<Html<String>> {
    let names = profiles::list_profiles(&state.store)?;
    debug!(count = names.len(), "Listing profiles");

    let template = ProfilesTemplate {
        page: state.page(&cookies, "Profiles", None),
        profiles: names
            .into_iter()
            .map(|name| ProfileLink {
                url: user_url(&name),
                name,
            })
            .collect(),
        form: ProfileFormView::blank(),
    };

    template.render_html()
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<ProfileFormData>,
) -> AppResult<Redirect> {
    let name = form.name.trim().to_string();
    let profile = form.into_profile(&name)?;

    if profiles::profile_exists(&state.store, &name)? {
        return Err(AppError::Validation(format!(
            "A profile named '{}' already exists",
            name
        )));
    }

    profiles::save_profile(&state.store, &profile)?;
    info!(username = %name, "Profile created");
    state.notify(
        &cookies,
        format!("New profile created for {}", name),
        NotificationKind::Success,
    );

    Ok(Redirect::to(&user_url(&name)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
) -> AppResult<Html<String>> {
    let profile = profiles::require_profile(&state.store, &username)?;

    let template = ProfileEditTemplate {
        page: state.page(&cookies, "Edit Profile", Some(&username)),
        form_action: format!("{}/profile", user_url(&username)),
        form: ProfileFormView::from_profile(&profile),
    };

    template.render_html()
}

pub async fn update(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(username): Path<String>,
    Form(form): Form<ProfileFormData>,
) -> AppResult<Redirect> {
    profiles::require_profile(&state.store, &username)?;
    let profile = form.into_profile(&username)?;

    profiles::save_profile(&state.store, &profile)?;
    info!(username = %username, "Profile updated");
    state.notify(
        &cookies,
        format!("Profile updated for {}", username),
        NotificationKind::Success,
    );

    Ok(Redirect::to(&format!("{}/profile", user_url(&username))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProfileFormData {
        ProfileFormData {
            name: "asha".into(),
            age: "32".into(),
            occupation: "Self_Employed".into(),
            city_tier: "Tier_2".into(),
            income: "60000".into(),
            dependents: "".into(),
            desired_savings_percentage: "25".into(),
            financial_goals: " house ".into(),
            risk_profile: "Aggressive".into(),
            has_investments: Some("on".into()),
            has_loans: None,
        }
    }

    #[test]
    fn test_valid_form() {
        let profile = form().into_profile("asha").unwrap();
        assert_eq!(profile.occupation, Occupation::SelfEmployed);
        assert_eq!(profile.city_tier, CityTier::Tier2);
        assert_eq!(profile.dependents, 0);
        assert_eq!(profile.financial_goals, "house");
        assert!(profile.has_investments);
        assert!(!profile.has_loans);
    }

    #[test]
    fn test_out_of_range_fields() {
        let mut f = form();
        f.age = "17".into();
        assert!(f.into_profile("asha").is_err());

        let mut f = form();
        f.income = "999".into();
        assert!(f.into_profile("asha").is_err());

        let mut f = form();
        f.desired_savings_percentage = "51".into();
        assert!(f.into_profile("asha").is_err());

        let mut f = form();
        f.occupation = "Astronaut".into();
        assert!(f.into_profile("asha").is_err());

        assert!(form().into_profile("../asha").is_err());
    }
}
