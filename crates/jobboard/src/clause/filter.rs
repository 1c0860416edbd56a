//! WHERE clause generation from optional filter criteria.

use super::Clause;
use crate::error::BoardResult;
use crate::mapping::{ColumnMap, write_quoted};
use crate::value::ScalarValue;

/// Builds an AND-composed filter clause from named optional predicates.
///
/// Each present criterion contributes exactly one predicate; absent criteria
/// contribute none. When nothing is present the finished clause is empty and
/// the assembler omits `WHERE` entirely rather than emitting a tautology.
///
/// Field names pass through the entity's [`ColumnMap`] like update fields do;
/// values always bind through placeholders.
///
/// ```
/// use jobboard::{ColumnMap, FilterBuilder};
///
/// const COLUMNS: ColumnMap = ColumnMap::new(&["title", "salary", "equity"], &[]);
///
/// let mut filter = FilterBuilder::new(&COLUMNS);
/// filter.contains("title", Some("engineer"))?;
/// filter.at_least("salary", Some(90_000))?;
/// filter.positive("equity", Some(true))?;
///
/// let clause = filter.finish();
/// assert_eq!(
///     clause.render(1),
///     r#""title" ILIKE $1 AND "salary" >= $2 AND "equity" > 0"#,
/// );
/// # Ok::<(), jobboard::BoardError>(())
/// ```
#[derive(Debug)]
pub struct FilterBuilder<'a> {
    map: &'a ColumnMap,
    clause: Clause,
    terms: usize,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(map: &'a ColumnMap) -> Self {
        Self {
            map,
            clause: Clause::new(),
            terms: 0,
        }
    }

    fn begin_term(&mut self, column: &str) -> String {
        let mut term = String::new();
        if self.terms > 0 {
            term.push_str(" AND ");
        }
        self.terms += 1;
        write_quoted(column, &mut term);
        term
    }

    /// Case-insensitive substring match (`"col" ILIKE $n` with the needle
    /// wrapped in `%`). ILIKE makes the comparison case-insensitive
    /// regardless of the column's collation. `%` and `_` inside the needle
    /// keep their wildcard meaning, matching the original search semantics.
    pub fn contains(&mut self, field: &str, value: Option<&str>) -> BoardResult<&mut Self> {
        if let Some(v) = value {
            let column = self.map.resolve(field)?;
            let mut term = self.begin_term(&column);
            term.push_str(" ILIKE ");
            self.clause.push(term);
            self.clause.push_bind(ScalarValue::Text(format!("%{v}%")));
        }
        Ok(self)
    }

    /// Inclusive lower bound: `"col" >= $n`. Rows equal to the threshold are
    /// included.
    pub fn at_least(&mut self, field: &str, value: Option<i64>) -> BoardResult<&mut Self> {
        if let Some(v) = value {
            let column = self.map.resolve(field)?;
            let mut term = self.begin_term(&column);
            term.push_str(" >= ");
            self.clause.push(term);
            self.clause.push_bind(ScalarValue::Int(v));
        }
        Ok(self)
    }

    /// Inclusive upper bound: `"col" <= $n`.
    pub fn at_most(&mut self, field: &str, value: Option<i64>) -> BoardResult<&mut Self> {
        if let Some(v) = value {
            let column = self.map.resolve(field)?;
            let mut term = self.begin_term(&column);
            term.push_str(" <= ");
            self.clause.push(term);
            self.clause.push_bind(ScalarValue::Int(v));
        }
        Ok(self)
    }

    /// The `hasEquity`-style flag: ternary in visible effect, binary in
    /// criterion presence. `Some(true)` adds `"col" > 0`, selecting only
    /// strictly positive values; `Some(false)` and `None` are equivalent and
    /// add no predicate at all, so every row passes. The zero is a constant
    /// comparison, not a bound parameter.
    pub fn positive(&mut self, field: &str, flag: Option<bool>) -> BoardResult<&mut Self> {
        if flag == Some(true) {
            let column = self.map.resolve(field)?;
            let mut term = self.begin_term(&column);
            term.push_str(" > 0");
            self.clause.push(term);
        }
        Ok(self)
    }

    /// Number of predicates added so far.
    pub fn term_count(&self) -> usize {
        self.terms
    }

    pub fn finish(self) -> Clause {
        self.clause
    }
}
