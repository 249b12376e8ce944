//! Caller options for a table load.
//!
//! Precedence is always caller over registry: a field left at its default
//! falls back to what the registry implies (rename via raw→id, parse rule via
//! the column's directive), a field that is set replaces it.

use std::{collections::BTreeMap, fmt, path::PathBuf, sync::Arc};

use crate::schema::{ParseRule, SchemaRegistry};

/// How surviving raw headers become final column names.
#[derive(Clone, Default)]
pub enum Renamer {
    /// The registry's normalized id, or the raw name for unknown columns.
    #[default]
    Registry,
    /// Keep raw names.
    Identity,
    /// Explicit raw → name pairs; unlisted columns keep their raw name.
    Map(BTreeMap<String, String>),
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl Renamer {
    pub fn custom<F>(rename: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Renamer::Custom(Arc::new(rename))
    }

    pub fn rename(&self, registry: &SchemaRegistry, raw: &str) -> String {
        match self {
            Renamer::Registry => registry.rename(raw).to_string(),
            Renamer::Identity => raw.to_string(),
            Renamer::Map(map) => map
                .get(raw)
                .cloned()
                .unwrap_or_else(|| raw.to_string()),
            Renamer::Custom(rename) => rename(raw),
        }
    }
}

impl fmt::Debug for Renamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renamer::Registry => write!(f, "Registry"),
            Renamer::Identity => write!(f, "Identity"),
            Renamer::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Renamer::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit input file; takes precedence over `resource`.
    pub path: Option<PathBuf>,
    pub resource: Option<String>,
    /// Directories searched for `resource` ahead of `GIAS_RESOURCE_PATH`.
    pub resource_dirs: Vec<PathBuf>,
    /// Raw column names to keep. Applied before renaming.
    pub column_allow_list: Option<Vec<String>>,
    /// Raw column names to drop, after the allow list.
    pub column_deny_list: Option<Vec<String>>,
    pub renamer: Renamer,
    /// Parse rule overrides keyed by final (post-rename) column name.
    pub parse_rules: BTreeMap<String, ParseRule>,
    pub dataset_name: Option<String>,
    /// Encoding label understood by `encoding_rs`; UTF-8 when unset.
    pub encoding: Option<String>,
}

impl LoadOptions {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn from_resource(name: impl Into<String>) -> Self {
        Self {
            resource: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_resource(mut self, name: impl Into<String>) -> Self {
        self.resource = Some(name.into());
        self
    }

    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dirs.push(dir.into());
        self
    }

    pub fn with_allow_list<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_allow_list = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_deny_list<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_deny_list = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_renamer(mut self, renamer: Renamer) -> Self {
        self.renamer = renamer;
        self
    }

    pub fn with_parse_rule(mut self, column: impl Into<String>, rule: ParseRule) -> Self {
        self.parse_rules.insert(column.into(), rule);
        self
    }

    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Whether a raw column survives the allow and deny lists.
    pub fn retains(&self, raw: &str) -> bool {
        let allowed = self
            .column_allow_list
            .as_ref()
            .is_none_or(|allow| allow.iter().any(|c| c == raw));
        let denied = self
            .column_deny_list
            .as_ref()
            .is_some_and(|deny| deny.iter().any(|c| c == raw));
        allowed && !denied
    }

    /// The rule for a final column name: caller override, else registry.
    pub fn parse_rule_for(&self, schema: &SchemaRegistry, column: &str) -> ParseRule {
        self.parse_rules
            .get(column)
            .copied()
            .unwrap_or_else(|| schema.parse_rule_for(column))
    }
}
