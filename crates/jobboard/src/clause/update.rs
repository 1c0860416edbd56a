//! SET clause generation for partial updates.

use super::Clause;
use crate::error::{BoardError, BoardResult};
use crate::mapping::{ColumnMap, write_quoted};
use crate::value::UpdatePayload;

/// Build the `SET` clause for a partial update.
///
/// One `"column" = $n` term per payload field, in payload order, so the
/// parameter array binds positionally: placeholder count == key count ==
/// parameter count.
///
/// Errors:
/// - empty payload → [`BoardError::EmptyPayload`]; there is nothing to set
///   and callers must reject the request before reaching the store;
/// - any field off the entity's allow-list → [`BoardError::ColumnNotAllowed`].
///
/// ```
/// use jobboard::{ColumnMap, UpdatePayload, set_clause};
///
/// const COLUMNS: ColumnMap = ColumnMap::new(&["title", "salary"], &[]);
///
/// let mut payload = UpdatePayload::new();
/// payload.set("title", "Baker").set("salary", 52000_i64);
///
/// let clause = set_clause(&payload, &COLUMNS)?;
/// assert_eq!(clause.render(1), r#""title" = $1, "salary" = $2"#);
/// assert_eq!(clause.param_count(), 2);
/// # Ok::<(), jobboard::BoardError>(())
/// ```
pub fn set_clause(payload: &UpdatePayload, map: &ColumnMap) -> BoardResult<Clause> {
    if payload.is_empty() {
        return Err(BoardError::EmptyPayload);
    }

    let mut clause = Clause::new();
    for (i, (field, value)) in payload.iter().enumerate() {
        let column = map.resolve(field)?;
        let mut term = String::new();
        if i > 0 {
            term.push_str(", ");
        }
        write_quoted(&column, &mut term);
        term.push_str(" = ");
        clause.push(term);
        clause.push_bind(value.clone());
    }
    Ok(clause)
}
