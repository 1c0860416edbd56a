//! # jobboard
//!
//! Parameter-safe SQL construction core for a jobs/companies REST backend.
//!
//! ## Features
//!
//! - **Allow-listed identifiers**: external field names only reach SQL text
//!   through a per-entity [`ColumnMap`]; unknown names are rejected, never
//!   interpolated
//! - **Values always bind**: every externally supplied value goes through a
//!   positional placeholder managed by the builders (`$1, $2, ...`)
//! - **Sparse input, one code path**: partial updates and optional search
//!   filters generate their clauses instead of hardcoding one query per
//!   field combination
//! - **Typed validation**: payloads are checked up front and failures come
//!   back as a structured violation list, not a thrown string
//! - **No I/O**: builders return a [`ParameterizedQuery`]; executing it is
//!   the storage layer's job
//!
//! ## Example
//!
//! ```
//! use jobboard::entity::jobs::{self, JobFilter};
//!
//! let filter = JobFilter {
//!     title: Some("engineer".into()),
//!     min_salary: Some(100_000),
//!     has_equity: Some(true),
//! };
//!
//! let query = jobs::search_query(&filter)?;
//! assert_eq!(
//!     query.sql(),
//!     "SELECT id, title, salary, equity, company_handle AS \"companyHandle\" \
//!      FROM jobs WHERE \"title\" ILIKE $1 AND \"salary\" >= $2 AND \"equity\" > 0 \
//!      ORDER BY title",
//! );
//! // query.params_ref() binds directly through a tokio-postgres executor.
//! # Ok::<(), jobboard::BoardError>(())
//! ```

pub mod clause;
pub mod entity;
pub mod error;
pub mod mapping;
pub mod validate;
pub mod value;

pub use clause::{Clause, FilterBuilder, ParameterizedQuery, QueryAssembler, set_clause};
pub use error::{BoardError, BoardResult};
pub use mapping::ColumnMap;
pub use validate::{ValidationCode, ValidationError, ValidationErrors};
pub use value::{ScalarValue, UpdatePayload};
