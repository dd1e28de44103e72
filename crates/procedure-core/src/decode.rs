//! Spreadsheet decoding: first sheet of a workbook into raw rows

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

use crate::error::LoadError;
use crate::raw::{RawRow, RawValue};

/// First sheet of a workbook, header row split from the data rows
#[derive(Debug, Clone, Default)]
pub struct DecodedSheet {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Decode an in-memory workbook (xlsx, xls, xlsb or ods). Only the first
/// sheet is read.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<DecodedSheet, LoadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| LoadError::decode(format!("not a readable spreadsheet ({})", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::decode("workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::decode(format!("failed to read sheet '{}' ({})", sheet_name, e)))?;

    Ok(sheet_from_range(sheet_name, &range))
}

/// Split a cell range into headers and keyed rows. The first row is the
/// header; blank rows are skipped; cells under a blank or repeated header
/// are dropped.
pub fn sheet_from_range(sheet_name: String, range: &Range<Data>) -> DecodedSheet {
    let mut rows_iter = range.rows();

    let Some(header_row) = rows_iter.next() else {
        return DecodedSheet {
            sheet_name,
            ..Default::default()
        };
    };

    let mut headers: Vec<String> = Vec::new();
    let columns: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| {
            let header = header_text(cell)?;
            if headers.contains(&header) {
                debug!(header = %header, "Ignoring repeated column header");
                return None;
            }
            headers.push(header.clone());
            Some(header)
        })
        .collect();

    let rows: Vec<RawRow> = rows_iter
        .filter_map(|cells| {
            let row: RawRow = columns
                .iter()
                .zip(cells)
                .filter_map(|(header, cell)| Some((header.clone()?, cell_value(cell)?)))
                .collect();
            (!row.is_empty()).then_some(row)
        })
        .collect();

    debug!(sheet = %sheet_name, columns = headers.len(), rows = rows.len(), "Decoded sheet");

    DecodedSheet {
        sheet_name,
        headers,
        rows,
    }
}

fn header_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.clone(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Convert a cell into a raw value. Empty and error cells are absent.
pub fn cell_value(cell: &Data) -> Option<RawValue> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(RawValue::Text(s.clone())),
        Data::Float(f) => Some(RawValue::Number(*f)),
        Data::Int(i) => Some(RawValue::Number(*i as f64)),
        Data::Bool(b) => Some(RawValue::Bool(*b)),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(RawValue::DateTime)
                .unwrap_or_else(|| RawValue::Number(dt.as_f64())),
        ),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(RawValue::Text(s.clone())),
    }
}
