//! Column schema model and the validated, ordered registry built from it.
//!
//! A [`SchemaRegistry`] owns one [`ColumnDescriptor`] per raw CSV column, in
//! the physical column order of the source file. Lookups by raw name or
//! normalized id go through position indexes so that iteration order never
//! depends on hash order.
//!
//! ## Responsibilities
//!
//! - Parse directives ([`ParseRule`]) and their human-readable signatures
//! - Duplicate detection for raw names and normalized ids
//! - Rename resolution with identity fallback for columns the registry does
//!   not know about

use std::{collections::HashMap, fmt};

use serde::{Serialize, Serializer};

use crate::{category::CategoryMap, error::SchemaError};

/// How the text of one column becomes a typed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseRule {
    String,
    Integer,
    Float,
    /// A chrono format string, e.g. `%d-%m-%Y`.
    Date(&'static str),
    Category(&'static CategoryMap),
}

impl ParseRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseRule::String => "string",
            ParseRule::Integer => "integer",
            ParseRule::Float => "float",
            ParseRule::Date(_) => "date",
            ParseRule::Category(_) => "category",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ParseRule::Date(format) => format!("date({format})"),
            ParseRule::Category(map) => format!("category({})", map.name()),
            _ => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for ParseRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl Serialize for ParseRule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.describe())
    }
}

/// A literal registry entry, as written in the static column tables.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub raw: &'static str,
    pub id: &'static str,
    pub label: &'static str,
    pub rule: Option<ParseRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub raw_name: String,
    pub normalized_id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_directive: Option<ParseRule>,
}

impl ColumnDescriptor {
    pub fn new(
        raw_name: impl Into<String>,
        normalized_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            raw_name: raw_name.into(),
            normalized_id: normalized_id.into(),
            label: label.into(),
            parse_directive: None,
        }
    }

    pub fn with_rule(mut self, rule: ParseRule) -> Self {
        self.parse_directive = Some(rule);
        self
    }

    /// The directive in force for this column; absent means string.
    pub fn parse_rule(&self) -> ParseRule {
        self.parse_directive.unwrap_or(ParseRule::String)
    }
}

impl From<&ColumnSpec> for ColumnDescriptor {
    fn from(spec: &ColumnSpec) -> Self {
        Self {
            raw_name: spec.raw.to_string(),
            normalized_id: spec.id.to_string(),
            label: spec.label.to_string(),
            parse_directive: spec.rule,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    columns: Vec<ColumnDescriptor>,
    by_raw: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
    parse_rules: HashMap<String, ParseRule>,
}

impl SchemaRegistry {
    pub fn build<I>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = ColumnDescriptor>,
    {
        let columns = entries.into_iter().collect::<Vec<_>>();
        let mut by_raw = HashMap::with_capacity(columns.len());
        let mut by_id = HashMap::with_capacity(columns.len());
        let mut parse_rules = HashMap::new();

        for (idx, column) in columns.iter().enumerate() {
            if let Some(first) = by_raw.insert(column.raw_name.clone(), idx) {
                return Err(SchemaError::DuplicateRawName {
                    name: column.raw_name.clone(),
                    first,
                    second: idx,
                });
            }
            if let Some(first) = by_id.insert(column.normalized_id.clone(), idx) {
                return Err(SchemaError::DuplicateId {
                    id: column.normalized_id.clone(),
                    first,
                    second: idx,
                });
            }
            if let Some(rule) = column.parse_directive {
                parse_rules.insert(column.normalized_id.clone(), rule);
            }
        }

        Ok(Self {
            columns,
            by_raw,
            by_id,
            parse_rules,
        })
    }

    pub fn from_specs(specs: &[ColumnSpec]) -> Result<Self, SchemaError> {
        Self::build(specs.iter().map(ColumnDescriptor::from))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn by_raw(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.by_raw.get(name).map(|&idx| &self.columns[idx])
    }

    pub fn by_id(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.by_id.get(id).map(|&idx| &self.columns[idx])
    }

    /// Normalized ids in source-file column order.
    pub fn ids(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.normalized_id.as_str())
            .collect()
    }

    pub fn raw_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.raw_name.as_str()).collect()
    }

    pub fn parse_rule_for(&self, id: &str) -> ParseRule {
        self.parse_rules
            .get(id)
            .copied()
            .unwrap_or(ParseRule::String)
    }

    /// Directives for the columns that carry one, keyed by normalized id.
    pub fn parse_rules(&self) -> &HashMap<String, ParseRule> {
        &self.parse_rules
    }

    /// Normalized id for a raw header, or the header itself when unknown.
    pub fn rename<'a>(&'a self, raw: &'a str) -> &'a str {
        self.by_raw(raw)
            .map(|c| c.normalized_id.as_str())
            .unwrap_or(raw)
    }
}
