//! Per-entity column mapping with an explicit allow-list.
//!
//! External field names (camelCase JSON keys, query-string parameters) never
//! reach SQL identifier position directly. Each entity owns one immutable
//! [`ColumnMap`]; a field resolves to a column only if it is on the entity's
//! allow-list, via the alias table or a camelCase → snake_case fallback.
//! Unknown names fail with [`BoardError::ColumnNotAllowed`] instead of being
//! interpolated as identifiers.

use crate::error::{BoardError, BoardResult};
use heck::ToSnakeCase;

/// Per-entity field → column configuration.
///
/// Const-constructible so each entity declares its map once as a `const`:
///
/// ```
/// use jobboard::ColumnMap;
///
/// const COMPANY_COLUMNS: ColumnMap = ColumnMap::new(
///     &["name", "description", "numEmployees", "logoUrl"],
///     &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")],
/// );
///
/// assert_eq!(COMPANY_COLUMNS.resolve("numEmployees").unwrap(), "num_employees");
/// assert!(COMPANY_COLUMNS.resolve("handle").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    /// External field names permitted to reach SQL text.
    allowed: &'static [&'static str],
    /// Explicit field → column aliases; allow-listed fields absent from this
    /// table fall back to snake_case conversion.
    aliases: &'static [(&'static str, &'static str)],
}

impl ColumnMap {
    pub const fn new(
        allowed: &'static [&'static str],
        aliases: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self { allowed, aliases }
    }

    /// Resolve an external field name to its column name.
    ///
    /// Fails with [`BoardError::ColumnNotAllowed`] if the field is not on the
    /// allow-list. A resolved column that is not a plain identifier is a
    /// configuration defect and fails with [`BoardError::Contract`].
    pub fn resolve(&self, field: &str) -> BoardResult<String> {
        if !self.allowed.contains(&field) {
            return Err(BoardError::ColumnNotAllowed {
                field: field.to_string(),
            });
        }
        let column = match self.aliases.iter().find(|(f, _)| *f == field) {
            Some((_, column)) => (*column).to_string(),
            None => field.to_snake_case(),
        };
        ensure_plain_ident(&column)?;
        Ok(column)
    }

    /// Reverse lookup: the external field name that resolves to `column`.
    ///
    /// The mapping is a bijection over the allow-list, so every column a
    /// builder emits maps back to exactly one field.
    pub fn field_for(&self, column: &str) -> Option<&'static str> {
        self.allowed.iter().copied().find(|field| {
            match self.aliases.iter().find(|(f, _)| f == field) {
                Some((_, c)) => *c == column,
                None => field.to_snake_case() == column,
            }
        })
    }

    /// External field names this entity permits.
    pub fn allowed_fields(&self) -> &'static [&'static str] {
        self.allowed
    }
}

/// Columns emitted into SQL must be plain identifiers. Aliases and allow-list
/// entries are our own config, so anything else is a programming defect.
fn ensure_plain_ident(column: &str) -> BoardResult<()> {
    let mut chars = column.chars();
    let valid = match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(BoardError::contract(format!(
            "resolved column '{column}' is not a plain identifier"
        )))
    }
}

/// Write `column` double-quoted, escaping embedded quotes as `""`.
pub(crate) fn write_quoted(column: &str, out: &mut String) {
    out.push('"');
    for ch in column.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
