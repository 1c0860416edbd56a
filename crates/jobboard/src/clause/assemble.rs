//! Final query assembly.

use super::Clause;
use crate::error::{BoardError, BoardResult};
use crate::value::ScalarValue;
use tokio_postgres::types::ToSql;

/// Combines a base statement with generated clauses and trailing fragments
/// into one executable [`ParameterizedQuery`].
///
/// Placeholder indices continue across appended pieces, so the combined text
/// is contiguous `$1..$N` by construction; [`QueryAssembler::finish`] still
/// verifies the invariant and fails with [`BoardError::Contract`] on a
/// mismatch, since that indicates a defect in a caller, never bad user input.
///
/// ```
/// use jobboard::{ColumnMap, QueryAssembler, ScalarValue, UpdatePayload, set_clause};
///
/// const COLUMNS: ColumnMap = ColumnMap::new(&["title", "salary"], &[]);
///
/// let mut payload = UpdatePayload::new();
/// payload.set("salary", 60_000_i64);
///
/// let mut q = QueryAssembler::new("UPDATE jobs SET ");
/// q.append(&set_clause(&payload, &COLUMNS)?);
/// q.push(" WHERE id = ").bind(ScalarValue::Int(7));
/// q.push(" RETURNING id, title, salary");
///
/// let query = q.finish()?;
/// assert_eq!(
///     query.sql(),
///     r#"UPDATE jobs SET "salary" = $1 WHERE id = $2 RETURNING id, title, salary"#,
/// );
/// assert_eq!(query.params().len(), 2);
/// # Ok::<(), jobboard::BoardError>(())
/// ```
pub struct QueryAssembler {
    sql: String,
    params: Vec<ScalarValue>,
}

impl QueryAssembler {
    /// Start from a fixed base statement. The base carries no placeholders of
    /// its own; parameters enter through [`bind`](Self::bind) and
    /// [`append`](Self::append).
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            sql: base.into(),
            params: Vec::new(),
        }
    }

    /// Append a trusted raw fragment (`" ORDER BY title"`, `" RETURNING id"`).
    pub fn push(&mut self, fragment: &str) -> &mut Self {
        self.sql.push_str(fragment);
        self
    }

    /// Append the next placeholder and bind `value` to it.
    pub fn bind(&mut self, value: ScalarValue) -> &mut Self {
        self.params.push(value);
        self.sql.push('$');
        self.sql.push_str(&self.params.len().to_string());
        self
    }

    /// Append a generated clause, numbering its placeholders after the
    /// parameters already present.
    pub fn append(&mut self, clause: &Clause) -> &mut Self {
        self.sql.push_str(&clause.render(self.params.len() + 1));
        self.params.extend_from_slice(clause.params());
        self
    }

    /// Append ` WHERE <clause>` when the filter has any predicates; an empty
    /// filter contributes nothing at all.
    pub fn filter(&mut self, clause: &Clause) -> &mut Self {
        if !clause.is_empty() {
            self.push(" WHERE ");
            self.append(clause);
        }
        self
    }

    /// Verify placeholder/parameter correspondence and produce the final
    /// query.
    pub fn finish(self) -> BoardResult<ParameterizedQuery> {
        let indices = placeholder_indices(&self.sql);
        if indices.len() != self.params.len() {
            return Err(BoardError::contract(format!(
                "query has {} placeholders but {} parameters: {}",
                indices.len(),
                self.params.len(),
                self.sql
            )));
        }
        for (i, idx) in indices.iter().enumerate() {
            if *idx != i + 1 {
                return Err(BoardError::contract(format!(
                    "placeholder ${} out of order (expected ${}): {}",
                    idx,
                    i + 1,
                    self.sql
                )));
            }
        }

        tracing::debug!(target: "jobboard::sql", sql = %self.sql, params = self.params.len(), "assembled query");

        Ok(ParameterizedQuery {
            sql: self.sql,
            params: self.params,
        })
    }
}

/// `$n` indices in left-to-right order. A lone `$` with no digits is not a
/// placeholder.
fn placeholder_indices(sql: &str) -> Vec<usize> {
    let mut indices = Vec::new();
    let bytes = sql.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                // sql[start..end] is all ASCII digits; overflow would need a
                // billion-parameter query.
                if let Ok(n) = sql[start..end].parse::<usize>() {
                    indices.push(n);
                }
                i = end;
                continue;
            }
        }
        i += 1;
    }
    indices
}

/// Final executable query text plus the exact ordered values bound to its
/// placeholders. The only thing that crosses into the storage boundary.
#[derive(Debug)]
pub struct ParameterizedQuery {
    sql: String,
    params: Vec<ScalarValue>,
}

impl ParameterizedQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> &[ScalarValue] {
        &self.params
    }

    /// Parameters as references compatible with tokio-postgres executors.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn into_parts(self) -> (String, Vec<ScalarValue>) {
        (self.sql, self.params)
    }
}
