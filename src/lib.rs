pub mod category;
pub mod cli;
pub mod columns;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod options;
pub mod schema;
pub mod send;
pub mod source;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::cli::{Cli, Commands, SourceArgs};

pub use crate::{
    columns::Release,
    data::{Flag, Value},
    error::{LoadError, SchemaError, TableError},
    loader::{load, load_reader},
    options::{LoadOptions, Renamer},
    schema::{ColumnDescriptor, ParseRule, SchemaRegistry},
    send::{load_send_view, load_send_view_by_key, load_send_view_with, send_columns},
    table::{Column, ColumnKind, Record, Table},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("gias_establishments", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Columns(args) => handle_columns(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Send(args) => handle_send(&args),
    }
}

fn handle_columns(args: &cli::ColumnsArgs) -> Result<()> {
    let release = Release::from(args.release);
    let registry = columns::registry_for(release);
    debug!("Listing {} column(s) for {release:?}", registry.len());
    if args.json {
        let json = serde_json::to_string_pretty(registry.descriptors())
            .context("Serializing column descriptors")?;
        println!("{json}");
    } else {
        let (headers, rows) = columns::listing_rows(registry);
        print!("{}", table::render_table(&headers, &rows));
    }
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let mut options = source_options(&args.source);
    if !args.columns.is_empty() {
        options = options.with_allow_list(args.columns.iter().map(|c| c.trim()));
    }
    if !args.exclude_columns.is_empty() {
        options = options.with_deny_list(args.exclude_columns.iter().map(|c| c.trim()));
    }
    if args.raw_names {
        options = options.with_renamer(Renamer::Identity);
    }
    let registry = columns::registry_for(args.release.into());
    let table = loader::load(registry, &options)
        .with_context(|| format!("Loading extract {}", describe_source(&args.source)))?;
    info!(
        "Displaying {} of {} row(s) from '{}'",
        args.rows.min(table.row_count()),
        table.row_count(),
        table.name()
    );
    print!("{}", table.render(Some(args.rows)));
    Ok(())
}

fn handle_send(args: &cli::SendArgs) -> Result<()> {
    let options = source_options(&args.source);
    let registry = columns::registry_for(args.release.into());
    let view = send::load_send_view_with(registry, &options)
        .with_context(|| format!("Deriving SEND view of {}", describe_source(&args.source)))?;
    if args.json {
        let records = send::index_by_key(&view, send::KEY_COLUMN)
            .with_context(|| format!("Indexing '{}' by {}", view.name(), send::KEY_COLUMN))?;
        let json = serde_json::to_string_pretty(&records).context("Serializing SEND records")?;
        println!("{json}");
    } else {
        print!("{}", view.render(args.limit));
    }
    Ok(())
}

fn source_options(args: &SourceArgs) -> LoadOptions {
    let mut options = LoadOptions {
        path: args.input.clone(),
        resource: args.resource.clone(),
        resource_dirs: args.resource_dirs.clone(),
        ..LoadOptions::default()
    };
    if let Some(encoding) = &args.input_encoding {
        options = options.with_encoding(encoding.as_str());
    }
    options
}

fn describe_source(args: &SourceArgs) -> String {
    match (&args.input, &args.resource) {
        (Some(path), _) => format!("{path:?}"),
        (None, Some(resource)) => format!("resource '{resource}'"),
        (None, None) => format!("resource '{}'", source::DEFAULT_RESOURCE),
    }
}
