//! Parameter-safe SQL clause construction.
//!
//! This module turns sparse, externally supplied input (a partial update
//! payload, a set of search filters) into SQL fragments without ever letting
//! that input become SQL text:
//!
//! - values bind through positional placeholders, generated here;
//! - field names pass the entity's [`ColumnMap`](crate::ColumnMap)
//!   allow-list before they appear as (quoted) identifiers.
//!
//! A [`Clause`] stores raw pieces and parameters separately; `$1, $2, ...`
//! indices are materialized at render time from a caller-supplied starting
//! index, so a clause can follow a base query's own parameters without any
//! renumbering pass.

pub mod assemble;
pub mod filter;
pub mod update;

pub use assemble::{ParameterizedQuery, QueryAssembler};
pub use filter::FilterBuilder;
pub use update::set_clause;

use crate::value::ScalarValue;

#[derive(Debug)]
enum Part {
    Raw(String),
    Param,
}

/// An SQL fragment with placeholders, paired with its ordered parameter
/// values. Immutable once built.
#[derive(Debug, Default)]
pub struct Clause {
    parts: Vec<Part>,
    params: Vec<ScalarValue>,
}

impl Clause {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, raw: impl Into<String>) {
        self.parts.push(Part::Raw(raw.into()));
    }

    pub(crate) fn push_bind(&mut self, value: ScalarValue) {
        self.parts.push(Part::Param);
        self.params.push(value);
    }

    /// True when the clause contributes no SQL text at all.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[ScalarValue] {
        &self.params
    }

    /// Render the fragment with placeholders numbered from `start`
    /// (1-based). `render(1)` yields `$1, $2, ...`.
    pub fn render(&self, start: usize) -> String {
        let mut out = String::new();
        let mut next = start;
        for part in &self.parts {
            match part {
                Part::Raw(s) => out.push_str(s),
                Part::Param => {
                    out.push('$');
                    out.push_str(&next.to_string());
                    next += 1;
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests;
