//! Job queries.
//!
//! Persisted shape: `id` (generated, immutable), `title`, `salary` (nullable
//! integer), `equity` (decimal in `[0, 1]`, a string on the wire to avoid
//! floating-point drift), `company_handle` (foreign key, immutable after
//! creation).

use crate::clause::{FilterBuilder, ParameterizedQuery, QueryAssembler, set_clause};
use crate::error::BoardResult;
use crate::mapping::ColumnMap;
use crate::validate::{ValidationCode, ValidationErrors, in_unit_range};
use crate::value::{ScalarValue, UpdatePayload};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// Fields a request may set or filter on. `id` and `companyHandle` are
/// immutable, so they are not allow-listed: an attempt to change either
/// fails as `ColumnNotAllowed` and maps to a 400.
pub const COLUMNS: ColumnMap = ColumnMap::new(&["title", "salary", "equity"], &[]);

/// Row shape returned to the API layer.
const JOB_ROW: &str = r#"id, title, salary, equity, company_handle AS "companyHandle""#;

/// Typed create payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobNew {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i64>,
    #[serde(default)]
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Search criteria, mapped 1:1 from query-string parameters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i64>,
    pub has_equity: Option<bool>,
}

/// `INSERT ... RETURNING` for a new job.
pub fn create_query(job: &JobNew) -> BoardResult<ParameterizedQuery> {
    let mut errs = ValidationErrors::new();
    if job.title.trim().is_empty() {
        errs.add("title", ValidationCode::Required, "must not be empty");
    }
    if let Some(salary) = job.salary
        && salary < 0
    {
        errs.add("salary", ValidationCode::Range, "must not be negative");
    }
    let equity = job
        .equity
        .as_deref()
        .and_then(|raw| parse_equity(raw, &mut errs));
    if job.company_handle.trim().is_empty() {
        errs.add("companyHandle", ValidationCode::Required, "must not be empty");
    }
    errs.into_result()?;

    let mut q = QueryAssembler::new(
        "INSERT INTO jobs (title, salary, equity, company_handle) VALUES (",
    );
    q.bind(ScalarValue::Text(job.title.clone()));
    q.push(", ").bind(job.salary.into());
    q.push(", ")
        .bind(equity.map_or(ScalarValue::Null, ScalarValue::Numeric));
    q.push(", ").bind(ScalarValue::Text(job.company_handle.clone()));
    q.push(") RETURNING ").push(JOB_ROW);
    q.finish()
}

/// Filtered list, pushed down into SQL rather than filtered post-fetch.
pub fn search_query(filter: &JobFilter) -> BoardResult<ParameterizedQuery> {
    let mut f = FilterBuilder::new(&COLUMNS);
    f.contains("title", filter.title.as_deref())?;
    f.at_least("salary", filter.min_salary)?;
    f.positive("equity", filter.has_equity)?;

    let mut q = QueryAssembler::new(format!("SELECT {JOB_ROW} FROM jobs"));
    q.filter(&f.finish());
    q.push(" ORDER BY title");
    q.finish()
}

/// Single job by id. The orchestration layer raises `NotFound` on an empty
/// result and fetches the joined company separately.
pub fn get_query(id: i64) -> BoardResult<ParameterizedQuery> {
    let mut q = QueryAssembler::new(format!("SELECT {JOB_ROW} FROM jobs"));
    q.push(" WHERE id = ").bind(ScalarValue::Int(id));
    q.finish()
}

/// Jobs belonging to one company, for shaping the company detail response.
pub fn by_company_query(handle: &str) -> BoardResult<ParameterizedQuery> {
    let mut q = QueryAssembler::new(format!("SELECT {JOB_ROW} FROM jobs"));
    q.push(" WHERE company_handle = ")
        .bind(ScalarValue::Text(handle.to_string()));
    q.push(" ORDER BY title");
    q.finish()
}

/// Partial update: SET clause from the payload, then `WHERE id`.
pub fn update_query(id: i64, payload: &UpdatePayload) -> BoardResult<ParameterizedQuery> {
    let payload = normalize_update(payload)?;
    let set = set_clause(&payload, &COLUMNS)?;

    let mut q = QueryAssembler::new("UPDATE jobs SET ");
    q.append(&set);
    q.push(" WHERE id = ").bind(ScalarValue::Int(id));
    q.push(" RETURNING ").push(JOB_ROW);
    q.finish()
}

pub fn delete_query(id: i64) -> BoardResult<ParameterizedQuery> {
    let mut q = QueryAssembler::new("DELETE FROM jobs");
    q.push(" WHERE id = ").bind(ScalarValue::Int(id));
    q.push(" RETURNING id");
    q.finish()
}

/// Type-check known fields and convert wire shapes (equity string → numeric)
/// before the payload reaches the clause builder. Unknown fields are left
/// for the allow-list to reject with the field name in the error.
fn normalize_update(payload: &UpdatePayload) -> BoardResult<UpdatePayload> {
    let mut errs = ValidationErrors::new();
    let mut out = payload.clone();
    for (field, value) in payload.iter() {
        match (field, value) {
            ("title", ScalarValue::Text(t)) => {
                if t.trim().is_empty() {
                    errs.add("title", ValidationCode::Required, "must not be empty");
                }
            }
            ("title", _) => errs.add("title", ValidationCode::Type, "must be a string"),
            ("salary", ScalarValue::Int(s)) => {
                if *s < 0 {
                    errs.add("salary", ValidationCode::Range, "must not be negative");
                }
            }
            ("salary", ScalarValue::Null) => {}
            ("salary", _) => errs.add("salary", ValidationCode::Type, "must be an integer"),
            ("equity", ScalarValue::Text(raw)) => {
                if let Some(d) = parse_equity(raw, &mut errs) {
                    out.replace("equity", ScalarValue::Numeric(d));
                }
            }
            ("equity", ScalarValue::Null) => {}
            ("equity", _) => errs.add(
                "equity",
                ValidationCode::Type,
                "must be a decimal string",
            ),
            _ => {}
        }
    }
    errs.into_result()?;
    Ok(out)
}

fn parse_equity(raw: &str, errs: &mut ValidationErrors) -> Option<Decimal> {
    match Decimal::from_str(raw) {
        Ok(d) if in_unit_range(&d) => Some(d),
        Ok(_) => {
            errs.add("equity", ValidationCode::Range, "must be between 0 and 1");
            None
        }
        Err(_) => {
            errs.add("equity", ValidationCode::Type, "must be a decimal string");
            None
        }
    }
}
