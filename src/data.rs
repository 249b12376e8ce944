use std::fmt;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::{error::CellError, schema::ParseRule};

/// Day-month-four-digit-year, the only date layout the extract uses.
pub const GIAS_DATE_FORMAT: &str = "%d-%m-%Y";

/// One non-missing cell. Missing cells are `None` at the column level.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Flag(Flag),
    List(Vec<String>),
}

/// Outcome of a categorical yes/no lookup.
///
/// Text outside the lookup's known categories is carried through as
/// `Unrecognized` so callers can detect it instead of receiving a wrong
/// boolean.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Flag {
    Known(bool),
    Unrecognized(String),
}

impl Flag {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Flag::Known(value) => Some(*value),
            Flag::Unrecognized(_) => None,
        }
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Flag::Unrecognized(_))
    }
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Flag(Flag::Known(b)) => b.to_string(),
            Value::Flag(Flag::Unrecognized(text)) => format!("?{text}"),
            Value::List(items) => items.iter().join("|"),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<&Flag> {
        match self {
            Value::Flag(flag) => Some(flag),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

pub fn parse_date(value: &str, format: &str) -> Result<NaiveDate, CellError> {
    NaiveDate::parse_from_str(value, format)
        .map_err(|err| CellError::new(format!("expected a date in format '{format}': {err}")))
}

/// Parses one raw cell according to `rule`.
///
/// Empty text is Missing for every rule; it never reaches a parser, so a
/// blank date cell is not a parse failure.
pub fn parse_typed_value(value: &str, rule: &ParseRule) -> Result<Option<Value>, CellError> {
    if value.is_empty() {
        return Ok(None);
    }
    let parsed = match rule {
        ParseRule::String => Value::String(value.to_string()),
        ParseRule::Integer => {
            let parsed: i64 = value
                .parse()
                .map_err(|err| CellError::new(format!("expected an integer: {err}")))?;
            Value::Integer(parsed)
        }
        ParseRule::Float => {
            let parsed: f64 = value
                .parse()
                .map_err(|err| CellError::new(format!("expected a number: {err}")))?;
            if !parsed.is_finite() {
                return Err(CellError::new("expected a finite number"));
            }
            Value::Float(parsed)
        }
        ParseRule::Date(format) => Value::Date(parse_date(value, format)?),
        ParseRule::Category(map) => match map.apply(value) {
            Some(mapped) => Value::String(mapped.into_owned()),
            None => return Ok(None),
        },
    };
    Ok(Some(parsed))
}
