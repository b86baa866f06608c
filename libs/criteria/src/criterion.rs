//! Criterion value parsing.
//!
//! A raw criterion value is split into a `NOT:` modifier flag, the trimmed
//! remaining value and the derived comparator. Parsing never fails; whether
//! the modifier is legal for the key is checked against the registry by the
//! query builder, not here.

use crate::registry::CriteriaKey;

/// Modifier token. Case-sensitive, must be followed by at least one space.
const NOT_MODIFIER: &str = "NOT:";

/// Marker callers prefix to a value to disable a criterion without removing
/// the key from their map. A marked value resolves to the empty string and
/// the key is skipped entirely.
const INERT_MARKER: char = '#';

/// Comparator derived from the presence of the `NOT:` modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
}

impl Comparator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

/// One resolved criterion: key, value and modifier state.
#[derive(Debug, Clone)]
pub struct Criterion {
    pub key: CriteriaKey,
    pub raw_value: String,
    pub has_not_modifier: bool,
    pub comparator: Comparator,
    /// Value with the modifier stripped and whitespace trimmed. Empty when
    /// the raw value was blank or carried the inert marker.
    pub value: String,
}

impl Criterion {
    /// Parse a raw value for the given key. Pure; never fails.
    pub fn parse(key: CriteriaKey, raw_value: &str) -> Self {
        let (has_not_modifier, rest) = split_not_modifier(raw_value);
        let mut value = rest.trim().to_string();
        if value.starts_with(INERT_MARKER) {
            value.clear();
        }
        Self {
            key,
            raw_value: raw_value.to_string(),
            has_not_modifier,
            comparator: if has_not_modifier {
                Comparator::Ne
            } else {
                Comparator::Eq
            },
            value,
        }
    }

    /// True when no clause should be built for this criterion.
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

fn split_not_modifier(raw: &str) -> (bool, &str) {
    if let Some(rest) = raw.strip_prefix(NOT_MODIFIER) {
        // The literal must be followed by at least one space; "NOT:x" is a
        // plain value, not a modifier.
        if rest.starts_with(' ') {
            return (true, rest);
        }
    }
    (false, raw)
}
