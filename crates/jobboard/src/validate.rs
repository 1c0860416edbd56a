//! Typed request validation.
//!
//! Replaces file-based JSON-schema checks with validators that return a
//! discriminated result: either the payload is structurally valid, or the
//! caller gets a [`ValidationErrors`] list it can serialize straight into a
//! 400 response. Validation runs before input ever reaches a clause builder.

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::OnceLock;

/// A machine-friendly validation code.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    Required,
    Type,
    Range,
    Format,
    Custom(String),
}

impl ValidationCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Required => "required",
            Self::Type => "type",
            Self::Range => "range",
            Self::Format => "format",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl Serialize for ValidationCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: ValidationCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, code: ValidationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// A collection of validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub items: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn push(&mut self, err: ValidationError) {
        self.items.push(err);
    }

    pub fn add(
        &mut self,
        field: impl Into<String>,
        code: ValidationCode,
        message: impl Into<String>,
    ) {
        self.items.push(ValidationError::new(field, code, message));
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.items.iter()
    }

    /// Consume into `Ok(())` when empty, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, err) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// Lowercase slug check used for company handles.
pub fn is_slug(s: &str) -> bool {
    static SLUG_RE: OnceLock<regex::Regex> = OnceLock::new();
    SLUG_RE
        .get_or_init(|| {
            regex::Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("invalid built-in slug regex")
        })
        .is_match(s)
}

/// Best-effort URL well-formedness check.
pub fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}

/// `equity` must be a decimal in `[0, 1]`.
pub fn in_unit_range(d: &Decimal) -> bool {
    *d >= Decimal::ZERO && *d <= Decimal::ONE
}
