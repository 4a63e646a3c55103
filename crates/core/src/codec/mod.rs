//! Compact share-link tokens.
//!
//! Every token is a single query value built from two delimiter levels and
//! no escaping. That is only sound because every field is a number or a
//! one-character code: Rust's shortest round-trip float formatting never
//! emits `_`, `~` or `,`.

mod category;
mod grid;
mod members;
mod nodes;
mod props;
mod scalar;

pub use category::{decode_category, encode_category};
pub use grid::{decode_grid, encode_grid};
pub use members::{decode_members, encode_members};
pub use nodes::{decode_nodes, encode_nodes};
pub use props::{decode_group_props, encode_group_props};
pub use scalar::{decode_bool, decode_number, encode_bool};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENTRY_DELIMITER: char = '_';
pub const FIELD_DELIMITER: char = '~';
pub const ROW_DELIMITER: char = ',';
pub const KEY_DELIMITER: char = '-';

/// A query value as handed over by a query-string parser: absent, a single
/// string, or every value of a repeated key. Repeated keys use the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawParam<'a> {
    #[default]
    Missing,
    One(&'a str),
    Many(&'a [&'a str]),
}

impl<'a> RawParam<'a> {
    /// The effective value. Empty strings count as absent.
    pub fn value(&self) -> Option<&'a str> {
        let value = match *self {
            RawParam::Missing => None,
            RawParam::One(value) => Some(value),
            RawParam::Many(values) => values.first().copied(),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl<'a> From<&'a str> for RawParam<'a> {
    fn from(value: &'a str) -> Self {
        RawParam::One(value)
    }
}

impl<'a> From<Option<&'a str>> for RawParam<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(RawParam::Missing, RawParam::One)
    }
}

/// What to do with an entry that cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Replace it with the default entity and report its index.
    #[default]
    Lenient,
    /// Fail the whole token.
    Strict,
}

/// A decoded value plus the indices of entries that were replaced by
/// defaults under [`DecodePolicy::Lenient`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub substituted: Vec<usize>,
}

impl<T> Decoded<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            substituted: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.substituted.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("{param}: entry {index} is malformed: {problem}")]
    MalformedEntry {
        param: &'static str,
        index: usize,
        problem: EntryProblem,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryProblem {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("{0:?} is not a finite number")]
    NotANumber(String),
    #[error("{0:?} is not a node index")]
    NotAnIndex(String),
    #[error("{0} must be greater than 0")]
    NonPositive(&'static str),
}

/// Shortest text that parses back to exactly `value`.
pub fn format_number(value: f64) -> String {
    value.to_string()
}

pub(crate) fn parse_number(field: &str) -> Result<f64, EntryProblem> {
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EntryProblem::NotANumber(field.to_string()))
}

/// Split `fields` into exactly `N` parts.
pub(crate) fn split_fields<const N: usize>(
    entry: &str,
    delimiter: char,
) -> Result<[&str; N], EntryProblem> {
    let fields: Vec<&str> = entry.split(delimiter).collect();
    let found = fields.len();
    fields
        .try_into()
        .map_err(|_| EntryProblem::FieldCount { expected: N, found })
}

/// Decode a delimited list entry by entry, applying `policy` to entries
/// `parse` rejects.
pub(crate) fn decode_list<T>(
    param: &'static str,
    token: &str,
    delimiter: char,
    policy: DecodePolicy,
    parse: impl Fn(&str) -> Result<T, EntryProblem>,
    fallback: impl Fn() -> T,
) -> Result<Decoded<Vec<T>>, CodecError> {
    let mut decoded = Decoded::clean(Vec::new());
    for (index, entry) in token.split(delimiter).enumerate() {
        match parse(entry) {
            Ok(item) => decoded.value.push(item),
            Err(problem) => {
                substitute(param, index, problem, policy)?;
                decoded.value.push(fallback());
                decoded.substituted.push(index);
            }
        }
    }
    Ok(decoded)
}

/// Apply `policy` to one unreadable entry.
pub(crate) fn substitute(
    param: &'static str,
    index: usize,
    problem: EntryProblem,
    policy: DecodePolicy,
) -> Result<(), CodecError> {
    match policy {
        DecodePolicy::Strict => Err(CodecError::MalformedEntry {
            param,
            index,
            problem,
        }),
        DecodePolicy::Lenient => {
            log::warn!("{param}: substituting default for entry {index}: {problem}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_param_normalization() {
        assert_eq!(RawParam::Missing.value(), None);
        assert_eq!(RawParam::One("").value(), None);
        assert_eq!(RawParam::One("a").value(), Some("a"));
        assert_eq!(RawParam::Many(&["first", "second"]).value(), Some("first"));
        assert_eq!(RawParam::Many(&[]).value(), None);
        assert_eq!(RawParam::from(None).value(), None);
    }

    #[test]
    fn numbers_round_trip_exactly() {
        for v in [0.0, -2.0, 0.1, 1.0 / 3.0, 29000.0, 1e-12, 1e21, -123.456e7] {
            let text = format_number(v);
            assert_eq!(parse_number(&text), Ok(v), "{text}");
            assert!(!text.contains(['_', '~', ',']), "{text}");
        }
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert!(parse_number("inf").is_err());
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("").is_err());
        assert!(parse_number("1e400").is_err());
    }

    #[test]
    fn split_fields_checks_count() {
        assert_eq!(split_fields::<3>("a~b~c", '~'), Ok(["a", "b", "c"]));
        assert_eq!(
            split_fields::<3>("a~b", '~'),
            Err(EntryProblem::FieldCount {
                expected: 3,
                found: 2
            })
        );
    }
}
