use crate::{error::GrammarError, schema::FieldType};
use serde::{Deserialize, Serialize};

///
/// Value
///
/// Typed literal union carried through query descriptions and write data.
///
/// `Column` and `Raw` are the only paths by which identifier references or
/// raw fragments enter otherwise-escaped literal positions; they are explicit
/// variants rather than string patterns, so escaped user data can never be
/// re-interpreted as SQL.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    /// Schema-validated column reference; emitted as a quoted identifier.
    Column(String),
    /// Raw SQL fragment; emitted verbatim.
    Raw(String),
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Absent-or-empty test used by default back-filling: null or empty text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Column(_) => "column",
            Self::Raw(_) => "raw",
            Self::List(_) => "list",
        }
    }

    /// Read the value as an unsigned count, when it carries one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(n) => u64::try_from(*n).ok(),
            Self::Uint(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Coerce a write value to a field's declared type.
    ///
    /// Composite values never coerce to scalar columns. `Column`/`Raw`
    /// references and `Null` pass through unchanged; null handling belongs
    /// to the notnull/default normalization, not to coercion.
    pub(crate) fn coerce(
        self,
        ty: FieldType,
        field: &str,
    ) -> Result<Self, GrammarError> {
        if let Self::List(_) = self {
            return Err(GrammarError::ScalarExpected {
                field: field.to_string(),
                found: self.type_name(),
            });
        }

        if matches!(self, Self::Null | Self::Column(_) | Self::Raw(_)) {
            return Ok(self);
        }

        let coerced = match ty {
            FieldType::Integer | FieldType::Tinyint => Self::Int(self.to_i64()),
            FieldType::Boolean => Self::Bool(self.to_bool()),
            FieldType::Float => Self::Float(self.to_f64()),
            FieldType::String | FieldType::Text => Self::Text(self.into_text()),
        };

        Ok(coerced)
    }

    #[expect(clippy::cast_possible_truncation)]
    fn to_i64(&self) -> i64 {
        match self {
            Self::Bool(b) => i64::from(*b),
            Self::Int(n) => *n,
            Self::Uint(n) => i64::try_from(*n).unwrap_or(i64::MAX),
            Self::Float(f) => *f as i64,
            Self::Text(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn to_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Uint(n) => *n != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => {
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
            _ => false,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn to_f64(&self) -> f64 {
        match self {
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Int(n) => *n as f64,
            Self::Uint(n) => *n as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Bool(b) => if b { "1" } else { "0" }.to_string(),
            Self::Int(n) => n.to_string(),
            Self::Uint(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s,
            _ => String::new(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// JSON bridge for schema configuration and caller-supplied write data.
///
/// Objects serialize to their JSON text; there is no object-shaped column
/// type, and stringifying matches how drivers hand JSON columns back.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_i64().map_or_else(
                || {
                    n.as_u64()
                        .map_or_else(|| Self::Float(n.as_f64().unwrap_or(0.0)), Self::Uint)
                },
                Self::Int,
            ),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(_) => Self::Text(v.to_string()),
        }
    }
}

///
/// TESTS
///
