//! Per-entity column configuration and query construction.
//!
//! Each entity declares its own [`ColumnMap`](crate::ColumnMap) and a set of
//! pure query-construction functions shaped after the REST surface. Nothing
//! here executes anything; every function returns a
//! [`ParameterizedQuery`](crate::ParameterizedQuery) for the storage layer to
//! run.

pub mod companies;
pub mod jobs;
