//! Request-shaped inputs for jobs.
//!
//! These structs are what a routing layer deserializes from a request body or
//! query string. Nothing reaches the SQL compilers until `validate()` has
//! passed and the values have been coerced to their column types.

use super::NewJob;
use crate::changeset::{ValidationCode, ValidationError, ValidationErrors};
use crate::error::JoblyResult;
use crate::filter::JobFilter;
use crate::partial_update::UpdateRequest;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use std::sync::OnceLock;

/// Equity is a fraction of the company: a decimal string between 0 and 1.
fn equity_pattern() -> &'static Regex {
    static EQUITY_RE: OnceLock<Regex> = OnceLock::new();
    EQUITY_RE.get_or_init(|| {
        Regex::new(r"^(0?\.\d+|0|1(\.0+)?)$").expect("invalid built-in equity regex")
    })
}

fn check_title(title: &str, errors: &mut ValidationErrors) {
    if title.trim().is_empty() {
        errors.push(ValidationError::new(
            "title",
            ValidationCode::Len,
            "title must not be empty",
        ));
    }
}

fn check_salary(salary: i64, errors: &mut ValidationErrors) {
    if !(0..=i64::from(i32::MAX)).contains(&salary) {
        errors.push(ValidationError::new(
            "salary",
            ValidationCode::Range,
            format!("salary must be between 0 and {}", i32::MAX),
        ));
    }
}

fn check_equity(equity: &str, errors: &mut ValidationErrors) {
    if !equity_pattern().is_match(equity) {
        errors.push(ValidationError::new(
            "equity",
            ValidationCode::Pattern,
            "equity must be a decimal between 0 and 1",
        ));
    }
}

fn parse_equity(equity: &str) -> Result<Decimal, ValidationErrors> {
    let normalized = if equity.starts_with('.') {
        format!("0{equity}")
    } else {
        equity.to_string()
    };
    Decimal::from_str(&normalized).map_err(|e| {
        let mut errors = ValidationErrors::default();
        errors.push(ValidationError::new(
            "equity",
            ValidationCode::Type,
            e.to_string(),
        ));
        errors
    })
}

/// Body of a "create job" request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJobInput {
    pub title: Option<String>,
    pub salary: Option<i64>,
    pub equity: Option<String>,
    pub company_handle: Option<String>,
}

impl NewJobInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        match &self.title {
            Some(title) => check_title(title, &mut errors),
            None => errors.push(ValidationError::new(
                "title",
                ValidationCode::Required,
                "title is required",
            )),
        }
        if let Some(salary) = self.salary {
            check_salary(salary, &mut errors);
        }
        if let Some(equity) = &self.equity {
            check_equity(equity, &mut errors);
        }
        match &self.company_handle {
            Some(handle) if handle.trim().is_empty() => errors.push(ValidationError::new(
                "companyHandle",
                ValidationCode::Len,
                "companyHandle must not be empty",
            )),
            Some(_) => {}
            None => errors.push(ValidationError::new(
                "companyHandle",
                ValidationCode::Required,
                "companyHandle is required",
            )),
        }

        errors
    }

    pub fn try_into_model(self) -> JoblyResult<NewJob> {
        self.validate().into_result()?;

        let equity = self.equity.as_deref().map(parse_equity).transpose()?;
        Ok(NewJob {
            title: self.title.unwrap_or_default(),
            salary: self.salary.and_then(|s| i32::try_from(s).ok()),
            equity,
            company_handle: self.company_handle.unwrap_or_default(),
        })
    }
}

/// Keeps an explicit `null` apart from a missing key: absent is `None`,
/// `null` is `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of a "patch job" request.
///
/// Only `title`, `salary` and `equity` may change; `id` and `companyHandle`
/// are rejected as unknown fields. A `null` salary or equity clears the
/// column. `title` is required on a job, so a `null` title is a type error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdateInput {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub salary: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub equity: Option<Option<String>>,
}

impl JobUpdateInput {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        match &self.title {
            Some(Some(title)) => check_title(title, &mut errors),
            Some(None) => errors.push(ValidationError::new(
                "title",
                ValidationCode::Type,
                "title cannot be null",
            )),
            None => {}
        }
        if let Some(Some(salary)) = self.salary {
            check_salary(salary, &mut errors);
        }
        if let Some(Some(equity)) = &self.equity {
            check_equity(equity, &mut errors);
        }
        errors
    }

    /// Convert into an [`UpdateRequest`] with fields in `title, salary,
    /// equity` order. An empty body yields an empty request, which the
    /// partial-update compiler rejects with `NoData`.
    pub fn try_into_patch(self) -> JoblyResult<UpdateRequest> {
        self.validate().into_result()?;

        let mut req = UpdateRequest::new();
        if let Some(Some(title)) = self.title {
            req.push("title", title);
        }
        if let Some(salary) = self.salary {
            req.push("salary", salary.and_then(|s| i32::try_from(s).ok()));
        }
        if let Some(equity) = self.equity {
            req.push("equity", equity.as_deref().map(parse_equity).transpose()?);
        }
        Ok(req)
    }
}

/// Raw search parameters as they arrive in a query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobSearchQuery {
    pub title: Option<String>,
    pub min_salary: Option<String>,
    pub has_equity: Option<String>,
}

impl JobSearchQuery {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }
        if let Some(min_salary) = &self.min_salary {
            match min_salary.trim().parse::<i64>() {
                Ok(n) => {
                    if !(0..=i64::from(i32::MAX)).contains(&n) {
                        errors.push(ValidationError::new(
                            "minSalary",
                            ValidationCode::Range,
                            format!("minSalary must be between 0 and {}", i32::MAX),
                        ));
                    }
                }
                Err(_) => errors.push(ValidationError::new(
                    "minSalary",
                    ValidationCode::Type,
                    "minSalary must be an integer",
                )),
            }
        }
        errors
    }

    /// Coerce into a typed [`JobFilter`].
    ///
    /// `hasEquity` counts as set only for the literal `"true"`; any other value
    /// is treated as `false`, which adds no constraint.
    pub fn try_into_filter(self) -> JoblyResult<JobFilter> {
        self.validate().into_result()?;

        Ok(JobFilter {
            title: self.title,
            min_salary: self
                .min_salary
                .and_then(|s| s.trim().parse::<i32>().ok()),
            has_equity: self.has_equity.map(|s| s == "true"),
        })
    }
}
