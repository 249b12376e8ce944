//! Immutable columnar table produced by a load, plus plain-text rendering.
//!
//! Every column holds exactly `row_count` cells; `None` is the Missing marker.
//! Transforms never mutate a table in place: [`Table::with_column`],
//! [`Table::select`] and [`Table::with_name`] hand back a new value.

use std::{borrow::Cow, collections::HashMap, fmt::Write as _};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{data::Value, error::TableError, schema::ParseRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    String,
    Integer,
    Float,
    Date,
    Flag,
    List,
}

impl From<ParseRule> for ColumnKind {
    fn from(rule: ParseRule) -> Self {
        match rule {
            ParseRule::String | ParseRule::Category(_) => ColumnKind::String,
            ParseRule::Integer => ColumnKind::Integer,
            ParseRule::Float => ColumnKind::Float,
            ParseRule::Date(_) => ColumnKind::Date,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<Option<Value>>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Option<Value>>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    row_count: usize,
    columns: Vec<Column>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        row_count: usize,
        columns: Vec<Column>,
    ) -> Result<Self, TableError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(TableError::LengthMismatch {
                    column: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if index.insert(column.name.clone(), idx).is_some() {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self {
            name: name.into(),
            row_count,
            columns,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&idx| &self.columns[idx])
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).and_then(|c| c.get(row))
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// A new table with `column` appended, or replacing a same-named column
    /// in place.
    pub fn with_column(self, column: Column) -> Result<Self, TableError> {
        let mut columns = self.columns;
        match self.index.get(column.name()) {
            Some(&idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Self::new(self.name, self.row_count, columns)
    }

    /// A new table holding exactly `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Self, TableError> {
        let columns = names
            .iter()
            .map(|name| {
                self.column(name)
                    .cloned()
                    .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(self.name.clone(), self.row_count, columns)
    }

    pub fn record(&self, row: usize) -> Option<Record> {
        if row >= self.row_count {
            return None;
        }
        let fields = self
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.values[row].clone()))
            .collect();
        Some(Record { fields })
    }

    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.row_count).filter_map(move |row| self.record(row))
    }

    /// Renders up to `limit` rows as an aligned plain-text table.
    pub fn render(&self, limit: Option<usize>) -> String {
        let headers = self
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let rows = (0..self.row_count)
            .take(limit.unwrap_or(usize::MAX))
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.get(row).map(Value::as_display).unwrap_or_default())
                    .collect()
            })
            .collect::<Vec<Vec<String>>>();
        render_table(&headers, &rows)
    }
}

/// One row as ordered `(column, cell)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Option<Value>)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn fields(&self) -> &[(String, Option<Value>)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator_cells, &separator_widths));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }

    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (value, width) in values.iter().zip(widths) {
        let sanitized = sanitize_cell(value);
        let padding = width.saturating_sub(display_width(sanitized.as_ref()));
        let mut cell = sanitized.into_owned();
        cell.push_str(&" ".repeat(padding));
        cells.push(cell);
    }
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
