use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::models::{TicketRecord, TicketStatus};

pub const COL_CODE: &str = "1. Código";
pub const COL_BRANCH: &str = "2. Sucursal";
pub const COL_REGISTERED: &str = "3. Fecha de registro";
pub const COL_CATEGORY: &str = "4. Categoría";
pub const COL_INCIDENT_TYPE: &str = "8. Tipo de Incidencia";
pub const COL_ESTIMATED_RESOLUTION: &str = "Fecha estimada resolución";
pub const COL_STATUS: &str = "Estado";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

// Slash dates read month-first; day-first only when that cannot parse.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("source file not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported source format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("sheet '{sheet}' not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("required column '{0}' missing from header row")]
    MissingColumn(&'static str),

    #[error("sheet has no header row")]
    EmptySheet,

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads every ticket row of `sheet` in `path`.
///
/// Spreadsheet formats go through calamine; a `.csv` file is treated as an
/// export of the single sheet and `sheet` is ignored.
pub fn load_tickets(path: &Path, sheet: &str) -> Result<Vec<TicketRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let tickets = match extension.as_str() {
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => load_workbook(path, sheet)?,
        "csv" => load_csv(path)?,
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    info!(
        path = %path.display(),
        rows = tickets.len(),
        "loaded ticket records"
    );
    Ok(tickets)
}

fn load_workbook(path: &Path, sheet: &str) -> Result<Vec<TicketRecord>, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let available = workbook.sheet_names();
    if !available.iter().any(|name| name == sheet) {
        return Err(LoadError::SheetNotFound {
            sheet: sheet.to_string(),
            available,
        });
    }

    let range = workbook.worksheet_range(sheet)?;
    parse_rows(range.rows())
}

fn load_csv(path: &Path) -> Result<Vec<TicketRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows: Vec<Vec<Data>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Data::Empty
                    } else {
                        Data::String(field.to_string())
                    }
                })
                .collect(),
        );
    }

    parse_rows(rows.iter().map(Vec::as_slice))
}

struct ColumnMap {
    code: usize,
    branch: usize,
    registered: usize,
    category: usize,
    incident_type: usize,
    estimated_resolution: usize,
    status: usize,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(text) if text == name))
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            code: find(COL_CODE)?,
            branch: find(COL_BRANCH)?,
            registered: find(COL_REGISTERED)?,
            category: find(COL_CATEGORY)?,
            incident_type: find(COL_INCIDENT_TYPE)?,
            estimated_resolution: find(COL_ESTIMATED_RESOLUTION)?,
            status: find(COL_STATUS)?,
        })
    }
}

/// Turns raw sheet rows (header first) into ticket records.
pub(crate) fn parse_rows<'a, I>(mut rows: I) -> Result<Vec<TicketRecord>, LoadError>
where
    I: Iterator<Item = &'a [Data]>,
{
    let header = rows.next().ok_or(LoadError::EmptySheet)?;
    let columns = ColumnMap::from_header(header)?;

    let mut tickets = Vec::new();
    let mut blank_rows = 0usize;
    let mut coerced_dates = 0usize;

    for (offset, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            blank_rows += 1;
            continue;
        }

        let cell = |idx: usize| row.get(idx).unwrap_or(&Data::Empty);
        let mut timestamp = |idx: usize| {
            let value = cell_to_timestamp(cell(idx));
            if value.is_none() && !matches!(cell(idx), Data::Empty) {
                coerced_dates += 1;
            }
            value
        };

        let registered_at = timestamp(columns.registered);
        let estimated_resolution_at = timestamp(columns.estimated_resolution);

        tickets.push(TicketRecord {
            row: offset + 2,
            code: cell_to_string(cell(columns.code)),
            branch: cell_to_string(cell(columns.branch)),
            incident_type: cell_to_raw_string(cell(columns.incident_type)),
            category: cell_to_string(cell(columns.category)),
            registered_at,
            estimated_resolution_at,
            status: TicketStatus::from_raw(&cell_to_raw_string(cell(columns.status))),
        });
    }

    debug!(blank_rows, coerced_dates, "parsed sheet rows");
    Ok(tickets)
}

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
    }
}

/// Like `cell_to_string` but keeps text untouched, for columns compared
/// against exact literals.
pub fn cell_to_raw_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        other => cell_to_string(other),
    }
}

/// Best-effort timestamp extraction; anything unrecognised becomes `None`.
pub fn cell_to_timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::DateTime(dt) if !dt.is_duration() => dt.as_datetime(),
        Data::DateTimeIso(s) | Data::String(s) => parse_timestamp(s),
        _ => None,
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(value);
        }
    }

    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.naive_local());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
