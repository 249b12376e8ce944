//! Generic schema-driven CSV → [`Table`] loader.
//!
//! Steps run in a fixed order, which decides how each option is keyed:
//!
//! 1. read the header row as literal raw names;
//! 2. apply the allow list, then the deny list (raw names, source order kept);
//! 3. rename surviving headers through the [`Renamer`](crate::options::Renamer);
//! 4. resolve each column's [`ParseRule`] by its final name, caller override
//!    first, registry directive second;
//! 5. parse every row and assemble the table.
//!
//! A cell that fails its rule aborts the whole load with
//! [`LoadError::Parse`]; empty cells are Missing and never reach a parser.

use std::io::Read;

use csv::ByteRecord;
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    data::{Value, parse_typed_value},
    error::{LoadError, Result},
    io_utils,
    options::LoadOptions,
    schema::{ParseRule, SchemaRegistry},
    source,
    table::{Column, ColumnKind, Table},
};

#[derive(Debug, Clone, PartialEq)]
struct PlannedColumn {
    position: usize,
    raw: String,
    name: String,
    rule: ParseRule,
}

fn plan_columns(
    schema: &SchemaRegistry,
    options: &LoadOptions,
    headers: &[String],
) -> Vec<PlannedColumn> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, raw)| options.retains(raw))
        .map(|(position, raw)| {
            let name = options.renamer.rename(schema, raw);
            let rule = options.parse_rule_for(schema, &name);
            PlannedColumn {
                position,
                raw: raw.clone(),
                name,
                rule,
            }
        })
        .collect()
}

/// Loads the file or resource named by `options` into a table.
pub fn load(schema: &SchemaRegistry, options: &LoadOptions) -> Result<Table> {
    let resolved = source::resolve(options)?;
    info!("Loading '{}' from {:?}", resolved.name, resolved.path);
    let reader = resolved.open()?;
    load_reader(schema, options, reader, &resolved.name)
}

/// Loads an already-opened stream. `source_name` becomes the dataset name
/// unless `options.dataset_name` is set; `options.path`/`resource` are ignored.
pub fn load_reader<R>(
    schema: &SchemaRegistry,
    options: &LoadOptions,
    input: R,
    source_name: &str,
) -> Result<Table>
where
    R: Read,
{
    let encoding = io_utils::resolve_encoding(options.encoding.as_deref())?;
    let mut reader = io_utils::open_csv_reader(input);
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let plan = plan_columns(schema, options, &headers);
    debug!(
        "Retaining {} of {} column(s) from '{source_name}'",
        plan.len(),
        headers.len()
    );
    for column in plan.iter().filter(|c| schema.by_raw(&c.raw).is_none()) {
        debug!(
            "Column '{}' is not in the registry; kept as '{}'",
            column.raw, column.name
        );
    }

    let (row_count, cells) = read_cells(&mut reader, &plan, encoding)?;
    let columns = plan
        .into_iter()
        .zip(cells)
        .map(|(planned, values)| {
            Column::new(planned.name, ColumnKind::from(planned.rule), values)
        })
        .collect();

    let name = options
        .dataset_name
        .clone()
        .unwrap_or_else(|| source_name.to_string());
    let table = Table::new(name, row_count, columns)?;
    info!(
        "Loaded {} row(s) across {} column(s) into '{}'",
        table.row_count(),
        table.column_count(),
        table.name()
    );
    Ok(table)
}

fn read_cells<R>(
    reader: &mut csv::Reader<R>,
    plan: &[PlannedColumn],
    encoding: &'static Encoding,
) -> Result<(usize, Vec<Vec<Option<Value>>>)>
where
    R: Read,
{
    let mut cells: Vec<Vec<Option<Value>>> = vec![Vec::new(); plan.len()];
    let mut record = ByteRecord::new();
    let mut row = 0usize;
    while reader.read_byte_record(&mut record)? {
        for (column, values) in plan.iter().zip(cells.iter_mut()) {
            let bytes = record.get(column.position).unwrap_or_default();
            let text = io_utils::decode_bytes(bytes, encoding, || {
                format!("row {row} column '{}'", column.name)
            })?;
            let value = parse_typed_value(&text, &column.rule).map_err(|err| LoadError::Parse {
                column: column.name.clone(),
                row,
                raw: text.clone(),
                reason: err.to_string(),
            })?;
            values.push(value);
        }
        row += 1;
    }
    Ok((row, cells))
}
