//! Declared column schema for billing spreadsheets
//!
//! Each record field is bound to one column header. Headers are matched
//! exactly (case and accents included); unknown columns are ignored.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Record fields that are read from the spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CreationDate,
    SurgeryDate,
    BillingDate,
    BilledAmount,
    State,
    Authorizer,
    Evaluator,
    ProcedureDescription,
}

/// How a field's raw cell is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Calendar date; invalid or absent becomes `None`
    Date,
    /// Non-negative amount; invalid or absent becomes 0
    Amount,
    /// Free text carried through unchanged
    Text,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::CreationDate,
        Field::SurgeryDate,
        Field::BillingDate,
        Field::BilledAmount,
        Field::State,
        Field::Authorizer,
        Field::Evaluator,
        Field::ProcedureDescription,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            Field::CreationDate | Field::SurgeryDate | Field::BillingDate => FieldKind::Date,
            Field::BilledAmount => FieldKind::Amount,
            Field::State | Field::Authorizer | Field::Evaluator | Field::ProcedureDescription => {
                FieldKind::Text
            }
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::CreationDate => write!(f, "creation date"),
            Field::SurgeryDate => write!(f, "surgery date"),
            Field::BillingDate => write!(f, "billing date"),
            Field::BilledAmount => write!(f, "billed amount"),
            Field::State => write!(f, "state"),
            Field::Authorizer => write!(f, "authorizer"),
            Field::Evaluator => write!(f, "evaluator"),
            Field::ProcedureDescription => write!(f, "procedure description"),
        }
    }
}

/// Header name for every field. Missing entries in a config file fall back
/// to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub creation_date: String,
    pub surgery_date: String,
    pub billing_date: String,
    pub billed_amount: String,
    pub state: String,
    pub authorizer: String,
    pub evaluator: String,
    pub procedure_description: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            creation_date: constants::HEADER_CREATION_DATE.to_string(),
            surgery_date: constants::HEADER_SURGERY_DATE.to_string(),
            billing_date: constants::HEADER_BILLING_DATE.to_string(),
            billed_amount: constants::HEADER_BILLED_AMOUNT.to_string(),
            state: constants::HEADER_STATE.to_string(),
            authorizer: constants::HEADER_AUTHORIZER.to_string(),
            evaluator: constants::HEADER_EVALUATOR.to_string(),
            procedure_description: constants::HEADER_PROCEDURE_DESCRIPTION.to_string(),
        }
    }
}

/// Result of matching a sheet's header row against the schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderCheck {
    pub matched: Vec<Field>,
    pub missing: Vec<Field>,
}

impl HeaderCheck {
    /// True when no declared column is present at all. Normalizing such a
    /// sheet would only yield all-default records.
    pub fn is_unusable(&self) -> bool {
        self.matched.is_empty()
    }
}

impl ColumnSchema {
    pub fn header(&self, field: Field) -> &str {
        match field {
            Field::CreationDate => &self.creation_date,
            Field::SurgeryDate => &self.surgery_date,
            Field::BillingDate => &self.billing_date,
            Field::BilledAmount => &self.billed_amount,
            Field::State => &self.state,
            Field::Authorizer => &self.authorizer,
            Field::Evaluator => &self.evaluator,
            Field::ProcedureDescription => &self.procedure_description,
        }
    }

    /// Split the schema fields into those present in `headers` and those missing
    pub fn check_headers<'a>(&self, headers: impl IntoIterator<Item = &'a str>) -> HeaderCheck {
        let present: Vec<&str> = headers.into_iter().collect();
        let (matched, missing): (Vec<Field>, Vec<Field>) = Field::ALL
            .into_iter()
            .partition(|field| present.iter().any(|h| *h == self.header(*field)));

        HeaderCheck { matched, missing }
    }
}
