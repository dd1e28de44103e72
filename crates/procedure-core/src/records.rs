//! Record normalization: raw spreadsheet rows into typed procedure records

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::debug;

use crate::constants;
use crate::raw::{RawRow, RawValue};
use crate::schema::{ColumnSchema, Field, FieldKind};

/// One billing entry derived from exactly one spreadsheet row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcedureRecord {
    pub creation_date: Option<NaiveDateTime>,
    pub surgery_date: Option<NaiveDateTime>,
    /// `None` means the procedure is still to be billed
    pub billing_date: Option<NaiveDateTime>,
    pub billed_amount: f64,
    /// 1-12, from `creation_date`
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub state: Option<String>,
    pub authorizer: Option<String>,
    pub evaluator: Option<String>,
    pub procedure_description: Option<String>,
}

impl ProcedureRecord {
    pub fn is_billed(&self) -> bool {
        self.billing_date.is_some()
    }

    fn date_slot(&mut self, field: Field) -> Option<&mut Option<NaiveDateTime>> {
        match field {
            Field::CreationDate => Some(&mut self.creation_date),
            Field::SurgeryDate => Some(&mut self.surgery_date),
            Field::BillingDate => Some(&mut self.billing_date),
            _ => None,
        }
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::State => Some(&mut self.state),
            Field::Authorizer => Some(&mut self.authorizer),
            Field::Evaluator => Some(&mut self.evaluator),
            Field::ProcedureDescription => Some(&mut self.procedure_description),
            _ => None,
        }
    }
}

/// Normalize every row, preserving order and cardinality
pub fn normalize_rows(rows: &[RawRow], schema: &ColumnSchema) -> Vec<ProcedureRecord> {
    rows.iter().map(|row| normalize_row(row, schema)).collect()
}

/// Normalize a single row. Never fails: bad fields fall back to their defaults.
///
/// Each field is read according to its [`FieldKind`]; month and year are
/// derived from the creation date afterwards.
pub fn normalize_row(row: &RawRow, schema: &ColumnSchema) -> ProcedureRecord {
    let mut record = ProcedureRecord::default();

    for field in Field::ALL {
        let value = row.get(schema.header(field));

        match field.kind() {
            FieldKind::Date => {
                let date = value.and_then(parse_date);
                if date.is_none() && value.is_some() {
                    debug!(field = %field, value = ?value, "Unparsable date");
                }
                if let Some(slot) = record.date_slot(field) {
                    *slot = date;
                }
            }
            FieldKind::Amount => record.billed_amount = parse_amount(value),
            FieldKind::Text => {
                if let Some(slot) = record.text_slot(field) {
                    *slot = value.and_then(text_value);
                }
            }
        }
    }

    record.month = record.creation_date.map(|d| d.month());
    record.year = record.creation_date.map(|d| d.year());
    record
}

// =============================================================================
// Dates
// =============================================================================

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Interpret a cell as a calendar date-time
pub fn parse_date(value: &RawValue) -> Option<NaiveDateTime> {
    match value {
        RawValue::DateTime(dt) => Some(*dt),
        RawValue::Number(serial) => from_excel_serial(*serial),
        RawValue::Text(text) => parse_date_text(text),
        RawValue::Bool(_) => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Convert an Excel serial date (fractional days since 1899-12-30)
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(1.0..=constants::EXCEL_MAX_SERIAL + 0.999_999).contains(&serial) {
        return None;
    }

    let (y, m, d) = constants::EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?.and_hms_opt(0, 0, 0)?;

    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;

    epoch.checked_add_signed(TimeDelta::try_days(days)? + TimeDelta::try_seconds(seconds)?)
}

// =============================================================================
// Amounts
// =============================================================================

/// Interpret a cell as a billed amount. Absent, unparsable, non-finite and
/// negative values all become 0.
pub fn parse_amount(value: Option<&RawValue>) -> f64 {
    let amount = match value {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(text)) => parse_amount_text(text).unwrap_or_else(|| {
            debug!(value = %text, "Unparsable billed amount, using 0");
            0.0
        }),
        Some(RawValue::Bool(_)) | Some(RawValue::DateTime(_)) | None => 0.0,
    };

    if amount.is_finite() && amount > 0.0 {
        return amount;
    }
    if amount != 0.0 {
        debug!(amount, "Negative or non-finite billed amount, using 0");
    }
    0.0
}

/// Plain decimals ("1234.56") or pt-BR notation ("R$ 1.234,56"). Anything
/// else, including en-US grouping ("1,234.56"), is unparsable.
fn parse_amount_text(text: &str) -> Option<f64> {
    let text = text.trim();
    let text = text.strip_prefix("R$").unwrap_or(text).trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(amount) = text.parse::<f64>() {
        return Some(amount);
    }

    parse_brl_text(text)
}

fn parse_brl_text(text: &str) -> Option<f64> {
    let is_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    let (int_part, frac_part) = text.rsplit_once(',')?;
    if !is_digits(frac_part) {
        return None;
    }

    let (sign, int_part) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    // Thousands groups: 1-3 leading digits, then groups of exactly 3
    let mut groups = int_part.split('.');
    let head = groups.next()?;
    if !is_digits(head) || (int_part.contains('.') && head.len() > 3) {
        return None;
    }
    if !groups.all(|group| group.len() == 3 && is_digits(group)) {
        return None;
    }

    format!("{sign}{}.{frac_part}", int_part.replace('.', "")).parse().ok()
}

// =============================================================================
// Text
// =============================================================================

/// Carry a cell through as text. Numbers keep their shortest form ("35", not "35.0").
fn text_value(value: &RawValue) -> Option<String> {
    let text = match value {
        RawValue::Text(text) => text.clone(),
        RawValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        RawValue::Number(n) => n.to_string(),
        RawValue::Bool(b) => b.to_string(),
        RawValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    };

    if text.is_empty() { None } else { Some(text) }
}
