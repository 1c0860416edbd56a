//! Company queries.
//!
//! Persisted shape: `handle` (natural key, immutable), `name` (unique),
//! `description`, `num_employees`, `logo_url`.
//!
//! Duplicate handles: a read-then-insert pre-check is not atomic, so two
//! concurrent creates can both pass it and both insert. The uniqueness
//! constraint at the store is the enforcement point; the executor translates
//! its violation through
//! [`BoardError::from_db_error`](crate::BoardError::from_db_error) into
//! `Conflict`.

use crate::clause::{FilterBuilder, ParameterizedQuery, QueryAssembler, set_clause};
use crate::error::BoardResult;
use crate::mapping::ColumnMap;
use crate::validate::{ValidationCode, ValidationErrors, is_slug, is_url};
use crate::value::{ScalarValue, UpdatePayload};
use serde::Deserialize;

/// Fields a request may set or filter on. `handle` is the immutable natural
/// key and is deliberately absent.
pub const COLUMNS: ColumnMap = ColumnMap::new(
    &["name", "description", "numEmployees", "logoUrl"],
    &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")],
);

const COMPANY_ROW: &str =
    r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyNew {
    pub handle: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub num_employees: Option<i64>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CompanyFilter {
    pub name: Option<String>,
    pub min_employees: Option<i64>,
    pub max_employees: Option<i64>,
}

pub fn create_query(company: &CompanyNew) -> BoardResult<ParameterizedQuery> {
    let mut errs = ValidationErrors::new();
    if !is_slug(&company.handle) {
        errs.add(
            "handle",
            ValidationCode::Format,
            "must be a lowercase slug (letters, digits, hyphens)",
        );
    }
    if company.name.trim().is_empty() {
        errs.add("name", ValidationCode::Required, "must not be empty");
    }
    if let Some(n) = company.num_employees
        && n < 0
    {
        errs.add("numEmployees", ValidationCode::Range, "must not be negative");
    }
    if let Some(url) = company.logo_url.as_deref()
        && !is_url(url)
    {
        errs.add("logoUrl", ValidationCode::Format, "must be a valid URL");
    }
    errs.into_result()?;

    let mut q = QueryAssembler::new(
        "INSERT INTO companies (handle, name, description, num_employees, logo_url) VALUES (",
    );
    q.bind(ScalarValue::Text(company.handle.clone()));
    q.push(", ").bind(ScalarValue::Text(company.name.clone()));
    q.push(", ").bind(company.description.clone().into());
    q.push(", ").bind(company.num_employees.into());
    q.push(", ").bind(company.logo_url.clone().into());
    q.push(") RETURNING ").push(COMPANY_ROW);
    q.finish()
}

/// Filtered list. `minEmployees > maxEmployees` is a structural error, not an
/// empty result.
pub fn search_query(filter: &CompanyFilter) -> BoardResult<ParameterizedQuery> {
    if let (Some(min), Some(max)) = (filter.min_employees, filter.max_employees)
        && min > max
    {
        let mut errs = ValidationErrors::new();
        errs.add(
            "minEmployees",
            ValidationCode::Range,
            "must not be greater than maxEmployees",
        );
        return Err(errs.into());
    }

    let mut f = FilterBuilder::new(&COLUMNS);
    f.contains("name", filter.name.as_deref())?;
    f.at_least("numEmployees", filter.min_employees)?;
    f.at_most("numEmployees", filter.max_employees)?;

    let mut q = QueryAssembler::new(format!("SELECT {COMPANY_ROW} FROM companies"));
    q.filter(&f.finish());
    q.push(" ORDER BY name");
    q.finish()
}

pub fn get_query(handle: &str) -> BoardResult<ParameterizedQuery> {
    let mut q = QueryAssembler::new(format!("SELECT {COMPANY_ROW} FROM companies"));
    q.push(" WHERE handle = ")
        .bind(ScalarValue::Text(handle.to_string()));
    q.finish()
}

pub fn update_query(handle: &str, payload: &UpdatePayload) -> BoardResult<ParameterizedQuery> {
    let payload = normalize_update(payload)?;
    let set = set_clause(&payload, &COLUMNS)?;

    let mut q = QueryAssembler::new("UPDATE companies SET ");
    q.append(&set);
    q.push(" WHERE handle = ")
        .bind(ScalarValue::Text(handle.to_string()));
    q.push(" RETURNING ").push(COMPANY_ROW);
    q.finish()
}

pub fn delete_query(handle: &str) -> BoardResult<ParameterizedQuery> {
    let mut q = QueryAssembler::new("DELETE FROM companies");
    q.push(" WHERE handle = ")
        .bind(ScalarValue::Text(handle.to_string()));
    q.push(" RETURNING handle");
    q.finish()
}

fn normalize_update(payload: &UpdatePayload) -> BoardResult<UpdatePayload> {
    let mut errs = ValidationErrors::new();
    for (field, value) in payload.iter() {
        match (field, value) {
            ("name", ScalarValue::Text(t)) => {
                if t.trim().is_empty() {
                    errs.add("name", ValidationCode::Required, "must not be empty");
                }
            }
            ("name", _) => errs.add("name", ValidationCode::Type, "must be a string"),
            ("description", ScalarValue::Text(_) | ScalarValue::Null) => {}
            ("description", _) => {
                errs.add("description", ValidationCode::Type, "must be a string")
            }
            ("numEmployees", ScalarValue::Int(n)) => {
                if *n < 0 {
                    errs.add("numEmployees", ValidationCode::Range, "must not be negative");
                }
            }
            ("numEmployees", ScalarValue::Null) => {}
            ("numEmployees", _) => {
                errs.add("numEmployees", ValidationCode::Type, "must be an integer")
            }
            ("logoUrl", ScalarValue::Text(url)) => {
                if !is_url(url) {
                    errs.add("logoUrl", ValidationCode::Format, "must be a valid URL");
                }
            }
            ("logoUrl", ScalarValue::Null) => {}
            ("logoUrl", _) => errs.add("logoUrl", ValidationCode::Type, "must be a string"),
            _ => {}
        }
    }
    errs.into_result()?;
    Ok(payload.clone())
}
