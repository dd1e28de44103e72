//! Month filter over the normalized record set

use serde::{Serialize, Serializer};
use std::str::FromStr;
use std::sync::Arc;

use crate::constants;
use crate::error::ParseMonthFilterError;
use crate::records::ProcedureRecord;

/// Active month selector: every record, or only one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl MonthFilter {
    pub fn month(month: u32) -> Result<Self, ParseMonthFilterError> {
        Self::try_from(month)
    }

    /// Records with no month only pass the `All` filter
    pub fn matches(&self, record: &ProcedureRecord) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => record.month == Some(*m),
        }
    }

    /// Display name, e.g. "Todos" or "Março"
    pub fn label(&self) -> &'static str {
        match self {
            MonthFilter::All => constants::ALL_MONTHS_LABEL,
            MonthFilter::Month(m) => crate::format::month_name(*m).unwrap_or("?"),
        }
    }
}

impl TryFrom<u32> for MonthFilter {
    type Error = ParseMonthFilterError;

    fn try_from(month: u32) -> Result<Self, Self::Error> {
        if (1..=12).contains(&month) {
            Ok(MonthFilter::Month(month))
        } else {
            Err(ParseMonthFilterError {
                input: month.to_string(),
            })
        }
    }
}

impl FromStr for MonthFilter {
    type Err = ParseMonthFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(MonthFilter::All);
        }

        trimmed
            .parse::<u32>()
            .ok()
            .and_then(|m| MonthFilter::try_from(m).ok())
            .ok_or_else(|| ParseMonthFilterError {
                input: s.to_string(),
            })
    }
}

impl std::fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthFilter::All => write!(f, "all"),
            MonthFilter::Month(m) => write!(f, "{}", m),
        }
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Order-preserving subsequence of `records` that passes `filter`
pub fn filter_records(records: &[ProcedureRecord], filter: MonthFilter) -> Vec<ProcedureRecord> {
    records.iter().filter(|r| filter.matches(r)).cloned().collect()
}

/// Shared-set variant used by the dashboard state. `All` hands back the same
/// allocation so snapshot caching can key on it.
pub fn apply_filter(
    records: &Arc<[ProcedureRecord]>,
    filter: MonthFilter,
) -> Arc<[ProcedureRecord]> {
    match filter {
        MonthFilter::All => Arc::clone(records),
        MonthFilter::Month(_) => filter_records(records, filter).into(),
    }
}
