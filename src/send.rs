//! Derived special-educational-needs (SEND) view over the establishments table.
//!
//! The view loads a widened column set (the published columns, the thirteen
//! `SENn (name)` slots and the raw type-of-resourced-provision text), derives
//! the flag and list columns from them, then projects down to the published
//! set in [`send_columns`] order.
//!
//! **The caller's `column_allow_list`, `column_deny_list` and `renamer` are
//! ignored.** The derived columns need specific raw columns to be present and
//! specific normalized ids to exist after renaming, so the view always loads
//! with its own allow list and the registry renamer. Source, encoding, parse
//! rule overrides and dataset name are honored.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    category::{FlagTable, RESOURCED_PROVISION_FLAGS, SEN_UNIT_FLAGS, normalize_sen_need},
    columns::{self, RESOURCED_PROVISION_COLUMN, SEN_SLOT_COLUMNS},
    data::Value,
    error::{LoadError, Result, TableError},
    loader,
    options::{LoadOptions, Renamer},
    schema::SchemaRegistry,
    table::{Column, ColumnKind, Record, Table},
};

pub const KEY_COLUMN: &str = "urn";
pub const RESOURCED_PROVISION: &str = "resourced_provision";
pub const SEN_UNIT: &str = "sen_unit";
pub const SEN_PROVISION_TYPES: &str = "sen_provision_types";
pub const FURTHER_EDUCATION_TYPE_APPLICABLE: &str = "further_education_type_name_applicable";

const FURTHER_EDUCATION_TYPE: &str = "further_education_type_name";
const FURTHER_EDUCATION_NOT_APPLICABLE: &str = "Not applicable";

/// One published column of the SEND view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendColumn {
    pub id: &'static str,
    pub label: &'static str,
    /// Computed by the view; has no raw-file counterpart.
    pub derived: bool,
}

const fn loaded(id: &'static str, label: &'static str) -> SendColumn {
    SendColumn {
        id,
        label,
        derived: false,
    }
}

const fn derived(id: &'static str, label: &'static str) -> SendColumn {
    SendColumn {
        id,
        label,
        derived: true,
    }
}

static SEND_COLUMNS: &[SendColumn] = &[
    loaded("urn", "URN"),
    loaded("la_code", "LA"),
    loaded("la_name", "LA name"),
    loaded("establishment_number", "Establishment Number"),
    loaded("establishment_name", "School / College Name"),
    loaded("type_of_establishment_name", "Establishment type"),
    loaded("establishment_type_group_name", "Establishment type group"),
    loaded("establishment_status_name", "Establishment status"),
    loaded("reason_establishment_opened_name", "Reason establishment opened"),
    loaded("open_date", "Open date"),
    loaded("reason_establishment_closed_name", "Reason establishment closed"),
    loaded("close_date", "Close date"),
    loaded("phase_of_education_name", "Phase of education"),
    loaded("statutory_low_age", "Age range (low)"),
    loaded("statutory_high_age", "Age range (high)"),
    loaded(FURTHER_EDUCATION_TYPE, "Further education type"),
    derived(FURTHER_EDUCATION_TYPE_APPLICABLE, "Further education type (where applicable)"),
    loaded("ukprn", "UK provider reference number"),
    loaded("postcode", "Postcode"),
    loaded("senpru_name", "PRU provision for SEN"),
    loaded("section41_approved_name", "Section 41 approved"),
    derived(SEN_PROVISION_TYPES, "SEN provision types"),
    derived(RESOURCED_PROVISION, "Resourced provision?"),
    loaded("resourced_provision_on_roll", "Resourced provision number on roll"),
    loaded("resourced_provision_capacity", "Resourced provision capacity"),
    derived(SEN_UNIT, "SEN unit?"),
    loaded("sen_unit_on_roll", "SEN unit number on roll"),
    loaded("sen_unit_capacity", "SEN unit capacity"),
    loaded("sen_stat", "Number of special pupils under a SEN statement or EHCP"),
    loaded("sen_no_stat", "Number of special pupils not under a SEN statement or EHCP"),
    loaded("gor_name", "GOR"),
    loaded("district_administrative_code", "District administrative code"),
    loaded("district_administrative_name", "District administrative"),
    loaded("parliamentary_constituency_name", "Parliamentary constituency"),
    loaded("easting", "Easting"),
    loaded("northing", "Northing"),
    loaded("last_changed_date", "Last changed date"),
];

/// Published columns of the view, in output order.
pub fn send_columns() -> &'static [SendColumn] {
    SEND_COLUMNS
}

/// Raw columns the view loads: published columns, SEN slots, resourced
/// provision text. Source order is kept by the loader regardless.
fn widened_allow_list(schema: &SchemaRegistry) -> Vec<String> {
    SEND_COLUMNS
        .iter()
        .filter(|c| !c.derived)
        .filter_map(|c| schema.by_id(c.id).map(|d| d.raw_name.clone()))
        .chain(SEN_SLOT_COLUMNS.map(String::from))
        .chain([RESOURCED_PROVISION_COLUMN.to_string()])
        .unique()
        .collect()
}

fn view_options(schema: &SchemaRegistry, options: &LoadOptions) -> LoadOptions {
    if options.column_allow_list.is_some()
        || options.column_deny_list.is_some()
        || !matches!(options.renamer, Renamer::Registry)
    {
        warn!("SEND view ignores caller column allow/deny lists and renamer");
    }
    LoadOptions {
        column_allow_list: Some(widened_allow_list(schema)),
        column_deny_list: None,
        renamer: Renamer::Registry,
        ..options.clone()
    }
}

/// The SEND view of the current-release extract named by `options`.
pub fn load_send_view(options: &LoadOptions) -> Result<Table> {
    load_send_view_with(columns::current(), options)
}

pub fn load_send_view_with(schema: &SchemaRegistry, options: &LoadOptions) -> Result<Table> {
    let table = loader::load(schema, &view_options(schema, options))?;
    derive_send_view(schema, table)
}

/// Applies the derivations and projection. `table` must be loaded with the
/// registry renamer and carry every column in [`widened_allow_list`].
fn derive_send_view(schema: &SchemaRegistry, table: Table) -> Result<Table> {
    let provision_id = schema.rename(RESOURCED_PROVISION_COLUMN);
    let provision = required(&table, provision_id)?;
    let resourced = flag_column(RESOURCED_PROVISION, provision, &RESOURCED_PROVISION_FLAGS);
    let sen_unit = flag_column(SEN_UNIT, provision, &SEN_UNIT_FLAGS);

    let slots = SEN_SLOT_COLUMNS
        .iter()
        .map(|raw| required(&table, schema.rename(raw)))
        .collect::<Result<Vec<_>>>()?;
    let provision_types = pack_provision_types(&slots, table.row_count());

    let applicable = applicable_column(required(&table, FURTHER_EDUCATION_TYPE)?);

    let unrecognized = resourced
        .values()
        .iter()
        .filter(|v| v.as_ref().and_then(Value::as_flag).is_some_and(|f| f.is_unrecognized()))
        .count();
    if unrecognized > 0 {
        warn!("{unrecognized} row(s) carry an unrecognized type of resourced provision");
    }

    let name = format!("{} (SEND columns)", table.name());
    let ids = SEND_COLUMNS.iter().map(|c| c.id).collect::<Vec<_>>();
    let view = table
        .with_column(resourced)?
        .with_column(sen_unit)?
        .with_column(provision_types)?
        .with_column(applicable)?
        .select(&ids)?
        .with_name(name);
    info!(
        "Derived SEND view '{}' with {} row(s)",
        view.name(),
        view.row_count()
    );
    Ok(view)
}

fn required<'a>(table: &'a Table, id: &str) -> Result<&'a Column> {
    table
        .column(id)
        .ok_or_else(|| TableError::UnknownColumn(id.to_string()).into())
}

fn flag_column(name: &str, source: &Column, flags: &FlagTable) -> Column {
    let values = source
        .values()
        .iter()
        .map(|cell| {
            cell.as_ref()
                .map(|value| Value::Flag(flags.classify(&value.as_display())))
        })
        .collect();
    Column::new(name, ColumnKind::Flag, values)
}

/// Normalizes each slot, drops Missing, keeps slot order. Normalizing a code
/// is a no-op, so slots already rewritten by the registry pass through.
fn pack_provision_types(slots: &[&Column], row_count: usize) -> Column {
    let values = (0..row_count)
        .map(|row| {
            let codes = slots
                .iter()
                .filter_map(|slot| slot.get(row))
                .filter_map(|value| {
                    let text = value.as_display();
                    normalize_sen_need(&text).map(|code| code.into_owned())
                })
                .collect::<Vec<_>>();
            Some(Value::List(codes))
        })
        .collect();
    Column::new(SEN_PROVISION_TYPES, ColumnKind::List, values)
}

fn applicable_column(source: &Column) -> Column {
    let values = source
        .values()
        .iter()
        .map(|cell| {
            cell.as_ref()
                .filter(|value| value.as_str() != Some(FURTHER_EDUCATION_NOT_APPLICABLE))
                .cloned()
        })
        .collect();
    Column::new(FURTHER_EDUCATION_TYPE_APPLICABLE, source.kind(), values)
}

/// The SEND view keyed by URN.
pub fn load_send_view_by_key(options: &LoadOptions) -> Result<BTreeMap<String, Record>> {
    let view = load_send_view(options)?;
    index_by_key(&view, KEY_COLUMN)
}

/// Folds `table` into a map keyed by `column`. Every row must have a key and
/// no key may repeat.
pub fn index_by_key(table: &Table, column: &str) -> Result<BTreeMap<String, Record>> {
    let keys = required(table, column)?;
    let mut indexed = BTreeMap::new();
    for (row, record) in table.records().enumerate() {
        let key = keys
            .get(row)
            .map(Value::as_display)
            .ok_or_else(|| LoadError::MissingKey {
                column: column.to_string(),
                row,
            })?;
        if indexed.contains_key(&key) {
            return Err(LoadError::DuplicateKey {
                column: column.to_string(),
                key,
            });
        }
        indexed.insert(key, record);
    }
    debug!("Indexed {} record(s) by '{column}'", indexed.len());
    Ok(indexed)
}
