//! Async spreadsheet loading
//!
//! Reading happens on the async runtime; decoding and normalization run on
//! the blocking pool so the event loop stays responsive. A load either
//! yields a complete record set or an error, never a partial set.

use std::path::Path;
use tracing::{info, warn};

use crate::decode::{DecodedSheet, decode_workbook};
use crate::error::LoadError;
use crate::records::{ProcedureRecord, normalize_rows};
use crate::schema::{ColumnSchema, Field};

/// A fully normalized upload
#[derive(Debug, Clone)]
pub struct LoadedWorkbook {
    /// File name the records came from
    pub source: String,
    pub sheet_name: String,
    pub records: Vec<ProcedureRecord>,
    /// Declared columns absent from the sheet (their fields default)
    pub missing_columns: Vec<Field>,
}

/// Read, decode and normalize the spreadsheet at `path`
pub async fn load_workbook(
    path: &Path,
    schema: &ColumnSchema,
) -> Result<LoadedWorkbook, LoadError> {
    info!(path = %path.display(), "Loading spreadsheet");

    let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let schema = schema.clone();

    tokio::task::spawn_blocking(move || workbook_from_bytes(bytes, &schema, source))
        .await
        .map_err(|e| LoadError::decode(format!("decoder task failed ({})", e)))?
}

/// Decode and normalize an in-memory workbook
pub fn workbook_from_bytes(
    bytes: Vec<u8>,
    schema: &ColumnSchema,
    source: String,
) -> Result<LoadedWorkbook, LoadError> {
    let sheet = decode_workbook(bytes)?;
    records_from_sheet(sheet, schema, source)
}

/// Check the sheet's headers against the schema and normalize its rows.
/// Fails only when none of the declared columns is present.
pub fn records_from_sheet(
    sheet: DecodedSheet,
    schema: &ColumnSchema,
    source: String,
) -> Result<LoadedWorkbook, LoadError> {
    let check = schema.check_headers(sheet.headers.iter().map(String::as_str));

    if check.is_unusable() {
        return Err(LoadError::decode(format!(
            "sheet '{}' has none of the expected columns (e.g. '{}', '{}')",
            sheet.sheet_name,
            schema.header(Field::CreationDate),
            schema.header(Field::BilledAmount),
        )));
    }

    for field in &check.missing {
        warn!(
            column = schema.header(*field),
            field = %field,
            "Column missing from sheet, field will be empty"
        );
    }

    let records = normalize_rows(&sheet.rows, schema);
    info!(
        source = %source,
        sheet = %sheet.sheet_name,
        records = records.len(),
        "Normalized spreadsheet"
    );

    Ok(LoadedWorkbook {
        source,
        sheet_name: sheet.sheet_name,
        records,
        missing_columns: check.missing,
    })
}
