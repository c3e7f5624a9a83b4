//! Stored numeric column that may fail to parse.

use super::Decimal;
use std::fmt;

/// A decimal column as read from the store.
///
/// Rows are never rejected on read: a value that is not a finite decimal is
/// kept verbatim so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Amount {
    Value(Decimal),
    Invalid { raw: String },
}

impl Amount {
    /// Parse a stored value, keeping the raw text when it is not a finite decimal.
    pub fn parse(raw: &str) -> Self {
        match Decimal::from_str_canonical(raw) {
            Ok(value) => Amount::Value(value),
            Err(_) => Amount::Invalid {
                raw: raw.to_string(),
            },
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Amount::Value(v) => Some(*v),
            Amount::Invalid { .. } => None,
        }
    }

    /// Text form used for persistence.
    pub fn to_stored_string(&self) -> String {
        match self {
            Amount::Value(v) => v.to_canonical_string(),
            Amount::Invalid { raw } => raw.clone(),
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::Value(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Value(v) => write!(f, "{}", v),
            Amount::Invalid { raw } => write!(f, "<invalid {:?}>", raw),
        }
    }
}
