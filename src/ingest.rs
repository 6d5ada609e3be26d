use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::models::RawRecord;
use crate::table::{Field, ResolvedColumns, Table};

/// A table together with the name of the source it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub name: String,
    pub table: Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Fixed(u8),
    Auto,
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "auto" => Ok(Delimiter::Auto),
            "tab" | "\\t" | "\t" => Ok(Delimiter::Fixed(b'\t')),
            other if other.len() == 1 && other.is_ascii() => Ok(Delimiter::Fixed(other.as_bytes()[0])),
            other => Err(format!(
                "delimiter must be a single ASCII character, 'tab' or 'auto', got {other:?}"
            )),
        }
    }
}

impl Delimiter {
    fn resolve(self, content: &[u8]) -> u8 {
        match self {
            Delimiter::Fixed(byte) => byte,
            Delimiter::Auto => sniff_delimiter(content),
        }
    }
}

fn sniff_delimiter(content: &[u8]) -> u8 {
    let header = content.split(|b| *b == b'\n').next().unwrap_or_default();
    [b',', b';', b'\t']
        .into_iter()
        .map(|candidate| (candidate, header.iter().filter(|b| **b == candidate).count()))
        .max_by_key(|(candidate, count)| (*count, *candidate == b','))
        .map(|(candidate, _)| candidate)
        .unwrap_or(b',')
}

/// File name without its extension.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cell_text(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

fn not_a_table(path: &Path, reason: &'static str) -> IngestError {
    IngestError::NotATable {
        path: path.to_path_buf(),
        reason,
    }
}

pub fn read_table(content: &[u8], delimiter: Delimiter, path: &Path) -> Result<Table> {
    if content.starts_with(ZIP_SIGNATURE) {
        return Err(not_a_table(path, "zip archive (xlsx?), export it as CSV"));
    }
    let header_line = content.split(|b| *b == b'\n').next().unwrap_or_default();
    if header_line.contains(&0) {
        return Err(not_a_table(path, "binary content in header"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.resolve(content))
        .flexible(true)
        .has_headers(true)
        .from_reader(content);

    let headers = reader.byte_headers().map_err(|source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if headers.is_empty() || headers.iter().all(|h| cell_text(h).is_none()) {
        return Err(IngestError::NoHeader {
            path: path.to_path_buf(),
        });
    }

    let names = headers
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let name = String::from_utf8_lossy(raw);
            if index == 0 {
                name.trim_start_matches('\u{feff}').trim().to_string()
            } else {
                name.trim().to_string()
            }
        })
        .collect::<Vec<String>>();
    if !names.iter().any(|name| Field::is_known_header(name)) {
        return Err(not_a_table(path, "no known column in header"));
    }

    let mut table = Table::new(names);
    for result in reader.byte_records() {
        let record = result.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        table.push_row(record.iter().map(cell_text).collect());
    }

    Ok(table)
}

pub fn load_source(path: &Path, delimiter: Delimiter) -> Result<SourceTable> {
    let content = std::fs::read(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(&content, delimiter, path)?;
    Ok(SourceTable {
        name: source_name(path),
        table,
    })
}

/// Accepts whole numbers, including "3.0" and "3,0". Anything else is missing.
pub fn parse_attempts(value: Option<&str>) -> Option<u32> {
    let number: f64 = value?.trim().replace(',', ".").parse().ok()?;
    if !number.is_finite() || number < 0.0 || number.fract() != 0.0 || number > u32::MAX as f64 {
        return None;
    }
    Some(number as u32)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

pub fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Resolves every logical field (synthesizing missing ones) and parses each row.
pub fn records_from_table(source: &SourceTable) -> Vec<RawRecord> {
    let table = &source.table;
    // synthesized columns land past the row width, where every cell reads as missing
    let mut header_only = Table::new(table.headers.clone());
    let columns = ResolvedColumns::resolve(&mut header_only);
    if !columns.synthesized.is_empty() {
        debug!(
            source = %source.name,
            synthesized = ?columns.synthesized,
            "columns missing, filled with blanks"
        );
    }

    let text = |row: usize, field: Field| table.cell(row, columns.index(field)).map(str::to_string);

    (0..table.len())
        .map(|row| RawRecord {
            source: source.name.clone(),
            id: text(row, Field::Id),
            last_call_code: text(row, Field::LastCallCode),
            last_call_reason: text(row, Field::LastCallReason),
            total_tries: parse_attempts(table.cell(row, columns.index(Field::TotalTries))),
            last_try_time: parse_timestamp(table.cell(row, columns.index(Field::LastTryTime))),
            import_created_on: parse_timestamp(
                table.cell(row, columns.index(Field::ImportCreatedOn)),
            ),
            close_reason: text(row, Field::CloseReason),
            record_state: text(row, Field::RecordState),
            end_reason: text(row, Field::EndReason),
            disconnect_reason: text(row, Field::DisconnectReason),
            disconnect_cause: text(row, Field::DisconnectCause),
        })
        .collect()
}
