//! Product identifiers.
//!
//! Deployments disagree on whether products are keyed by strings or by
//! integers, so the key type is a closed enum and the kind in use is chosen
//! by configuration through [`KeyKind`].

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Which representation product identifiers use in this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// Opaque string keys (`"42"`, `"sku-9"`).
    #[default]
    String,
    /// Signed integer keys.
    Integer,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
        }
    }
}

impl std::str::FromStr for KeyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            _ => Err(format!("invalid key kind: {s} (expected string or integer)")),
        }
    }
}

/// Key of a product in the entity store.
///
/// Keys of different kinds never compare equal, so a store built with one
/// [`KeyKind`] cannot be probed with keys of the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductKey {
    /// An integer key.
    Integer(i64),
    /// A string key.
    String(String),
}

impl ProductKey {
    /// Parse a raw key (a JSON object key, a path segment) as `kind`.
    ///
    /// Returns `None` when the text cannot represent a key of that kind.
    #[must_use]
    pub fn parse(raw: &str, kind: KeyKind) -> Option<Self> {
        match kind {
            KeyKind::String => Some(Self::String(raw.to_owned())),
            KeyKind::Integer => raw.trim().parse().ok().map(Self::Integer),
        }
    }

    /// Interpret a request argument as a key of `kind`.
    ///
    /// Integers are accepted for string keys and numeric strings for integer
    /// keys, mirroring how GraphQL `ID` arguments are coerced.
    #[must_use]
    pub fn from_value(value: &Value, kind: KeyKind) -> Option<Self> {
        match (kind, value) {
            (KeyKind::String, Value::String(s)) => Some(Self::String(s.clone())),
            (KeyKind::String, Value::Int(n)) => Some(Self::String(n.to_string())),
            (KeyKind::Integer, Value::Int(n)) => Some(Self::Integer(*n)),
            (KeyKind::Integer, Value::String(s)) => Self::parse(s, KeyKind::Integer),
            _ => None,
        }
    }

    /// The kind of this key.
    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        match self {
            Self::Integer(_) => KeyKind::Integer,
            Self::String(_) => KeyKind::String,
        }
    }

    /// The key as an output value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Integer(n) => Value::Int(*n),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProductKey {
    fn from(id: i64) -> Self {
        Self::Integer(id)
    }
}

impl From<&str> for ProductKey {
    fn from(id: &str) -> Self {
        Self::String(id.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_key_keeps_text() {
        assert_eq!(
            ProductKey::parse(" 42", KeyKind::String),
            Some(ProductKey::String(" 42".to_string()))
        );
    }

    #[test]
    fn test_parse_integer_key() {
        assert_eq!(
            ProductKey::parse("42", KeyKind::Integer),
            Some(ProductKey::Integer(42))
        );
        assert_eq!(ProductKey::parse("unknown-id", KeyKind::Integer), None);
    }

    #[test]
    fn test_from_value_crosses_representations() {
        assert_eq!(
            ProductKey::from_value(&Value::Int(7), KeyKind::String),
            Some(ProductKey::from("7"))
        );
        assert_eq!(
            ProductKey::from_value(&Value::from("7"), KeyKind::Integer),
            Some(ProductKey::from(7))
        );
        assert_eq!(ProductKey::from_value(&Value::Null, KeyKind::String), None);
        assert_eq!(
            ProductKey::from_value(&Value::Boolean(true), KeyKind::Integer),
            None
        );
    }

    #[test]
    fn test_keys_of_different_kinds_differ() {
        assert_ne!(ProductKey::from(42), ProductKey::from("42"));
    }

    #[test]
    fn test_key_kind_from_str() {
        assert_eq!("string".parse::<KeyKind>(), Ok(KeyKind::String));
        assert_eq!("integer".parse::<KeyKind>(), Ok(KeyKind::Integer));
        assert_eq!("int".parse::<KeyKind>(), Ok(KeyKind::Integer));
        assert!("uuid".parse::<KeyKind>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductKey::from(42).to_string(), "42");
        assert_eq!(ProductKey::from("sku-9").to_string(), "sku-9");
        assert_eq!(KeyKind::Integer.to_string(), "integer");
    }
}
