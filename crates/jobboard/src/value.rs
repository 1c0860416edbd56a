//! Scalar values and sparse update payloads.
//!
//! Request bodies arrive as JSON; the query core only ever binds scalars, so
//! [`ScalarValue`] is the whole value universe. It implements
//! [`ToSql`] by delegation, which lets a [`crate::ParameterizedQuery`] hand
//! its parameter array straight to a tokio-postgres executor.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A single bindable scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact decimal, used for `equity` which travels on the wire as a
    /// string to avoid floating-point drift.
    Numeric(Decimal),
    Text(String),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Decimal> for ScalarValue {
    fn from(v: Decimal) -> Self {
        Self::Numeric(v)
    }
}

impl<T> From<Option<T>> for ScalarValue
where
    T: Into<ScalarValue>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl ToSql for ScalarValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(v) => v.to_sql(ty, out),
            Self::Int(v) => {
                // Narrow to the target column width instead of failing the
                // checked bind against INT2/INT4 columns.
                if *ty == Type::INT2 {
                    i16::try_from(*v)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*v)?.to_sql(ty, out)
                } else {
                    v.to_sql(ty, out)
                }
            }
            Self::Float(v) => v.to_sql(ty, out),
            Self::Numeric(v) => v.to_sql(ty, out),
            Self::Text(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <bool as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || <i32 as ToSql>::accepts(ty)
            || <i16 as ToSql>::accepts(ty)
            || <f64 as ToSql>::accepts(ty)
            || <Decimal as ToSql>::accepts(ty)
            || <String as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = ScalarValue;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a JSON scalar (string, number, boolean, or null)")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(ScalarValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(ScalarValue::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .map(ScalarValue::Int)
                    .map_err(|_| E::custom("integer out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(ScalarValue::Float(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(ScalarValue::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(ScalarValue::Text(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ScalarValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(ScalarValue::Null)
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A sparse partial-update payload: field name → new scalar value, in
/// arrival order.
///
/// Only changed fields are present. Insertion order is significant for
/// placeholder numbering only, never for semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePayload {
    fields: Vec<(String, ScalarValue)>,
}

impl UpdatePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Setting the same field twice keeps its first position
    /// and the last value, so the payload never carries duplicate keys and
    /// the SET clause never assigns one column twice.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<ScalarValue>) -> &mut Self {
        let field = field.into();
        let value = value.into();
        match self.fields.iter().position(|(f, _)| *f == field) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((field, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.fields.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn get(&self, field: &str) -> Option<&ScalarValue> {
        self.fields
            .iter()
            .find(|(f, _)| f.as_str() == field)
            .map(|(_, v)| v)
    }

    /// Replace the value of an existing field in place.
    pub(crate) fn replace(&mut self, field: &str, value: ScalarValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(f, _)| f.as_str() == field) {
            slot.1 = value;
        }
    }
}

impl<'de> Deserialize<'de> for UpdatePayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = UpdatePayload;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a JSON object of scalar fields")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut payload = UpdatePayload {
                    fields: Vec::with_capacity(map.size_hint().unwrap_or(0)),
                };
                // Duplicate keys collapse last-wins, like JSON.parse; the
                // clause builder can then assume unique columns.
                while let Some((field, value)) = map.next_entry::<String, ScalarValue>()? {
                    payload.set(field, value);
                }
                Ok(payload)
            }
        }

        deserializer.deserialize_map(PayloadVisitor)
    }
}
