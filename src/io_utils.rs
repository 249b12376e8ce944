//! CSV reader construction and byte-level decoding.
//!
//! Extract files are read as raw byte records and decoded per field, so a
//! file published in Windows-1252 loads as readily as a UTF-8 one. Structural
//! problems (a row with the wrong field count, an unterminated quote) surface
//! from the `csv` reader unchanged.

use std::io::Read;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{LoadError, Result};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| LoadError::Encoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn open_csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(DEFAULT_CSV_DELIMITER)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn decode_bytes<F>(bytes: &[u8], encoding: &'static Encoding, context: F) -> Result<String>
where
    F: FnOnce() -> String,
{
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(LoadError::Decode {
            context: context(),
            encoding: encoding.name(),
        })
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
    context: &str,
) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding, || context.to_string()))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    let mut decoded = decode_record(&headers, encoding, "header row")?;
    // Extracts saved by spreadsheet tools sometimes carry a UTF-8 byte order mark.
    if let Some(first) = decoded.first_mut()
        && let Some(stripped) = first.strip_prefix('\u{feff}')
    {
        *first = stripped.to_string();
    }
    Ok(decoded)
}
