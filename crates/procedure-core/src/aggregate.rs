//! Aggregation views over a filtered record set
//!
//! Every view is a pure function of the records it is given. Grouped views
//! sort by count descending with a stable sort, so ties keep the order in
//! which each key was first seen.

use serde::Serialize;
use std::collections::HashMap;

use crate::constants;
use crate::filter::MonthFilter;
use crate::format::{month_abbreviation, short_label};
use crate::records::ProcedureRecord;

// =============================================================================
// View Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCount {
    pub month: u32,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAmount {
    pub month: u32,
    pub label: &'static str,
    pub amount: f64,
}

/// Volume and billed amount for the same month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOverview {
    pub month: u32,
    pub label: &'static str,
    pub count: usize,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTotals {
    pub state: String,
    pub count: usize,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcedureCount {
    pub name: String,
    /// Axis label, see [`short_label`]
    pub short_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_procedures: usize,
    pub total_billed: f64,
    /// Number of records without a billing date. A count, not money.
    pub pending_billing: usize,
    pub average_billed: f64,
    pub top_procedures: Vec<ProcedureCount>,
}

/// Every view computed from one filtered record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub month_filter: MonthFilter,
    pub monthly_volume: Vec<MonthlyCount>,
    pub monthly_billed: Vec<MonthlyAmount>,
    pub monthly_overview: Vec<MonthlyOverview>,
    pub by_state: Vec<StateTotals>,
    pub by_authorizer: Vec<NamedCount>,
    pub by_evaluator: Vec<NamedCount>,
    pub summary: SummaryStats,
}

// =============================================================================
// Views
// =============================================================================

/// Count per calendar month, always 12 entries (Jan..Dez)
pub fn monthly_volume(records: &[ProcedureRecord]) -> Vec<MonthlyCount> {
    let buckets = month_buckets(records);
    (1..=12)
        .map(|month| MonthlyCount {
            month,
            label: month_label(month),
            count: buckets[(month - 1) as usize].0,
        })
        .collect()
}

/// Billed amount per calendar month, always 12 entries
pub fn monthly_billed(records: &[ProcedureRecord]) -> Vec<MonthlyAmount> {
    let buckets = month_buckets(records);
    (1..=12)
        .map(|month| MonthlyAmount {
            month,
            label: month_label(month),
            amount: buckets[(month - 1) as usize].1,
        })
        .collect()
}

/// Volume and amount side by side, always 12 entries
pub fn monthly_overview(records: &[ProcedureRecord]) -> Vec<MonthlyOverview> {
    let buckets = month_buckets(records);
    (1..=12)
        .map(|month| {
            let (count, amount) = buckets[(month - 1) as usize];
            MonthlyOverview {
                month,
                label: month_label(month),
                count,
                amount,
            }
        })
        .collect()
}

/// Top 10 states by procedure count, with billed totals. Blank states are skipped.
pub fn by_state(records: &[ProcedureRecord]) -> Vec<StateTotals> {
    let groups = group_first_seen(records, |r| non_empty(&r.state), |acc: &mut (usize, f64), r| {
        acc.0 += 1;
        acc.1 += r.billed_amount;
    });

    let mut result: Vec<StateTotals> = groups
        .into_iter()
        .map(|(state, (count, amount))| StateTotals {
            state,
            count,
            amount,
        })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count));
    result.truncate(constants::TOP_STATES);
    result
}

/// Top 5 authorizers by procedure count. Blank authorizers are skipped.
pub fn by_authorizer(records: &[ProcedureRecord]) -> Vec<NamedCount> {
    top_counts(records, |r| non_empty(&r.authorizer), constants::TOP_AUTHORIZERS)
}

/// Top 8 evaluators by procedure count. Blank evaluators are grouped under
/// [`constants::NOT_INFORMED_LABEL`] instead of being dropped.
pub fn by_evaluator(records: &[ProcedureRecord]) -> Vec<NamedCount> {
    top_counts(
        records,
        |r| Some(non_empty(&r.evaluator).unwrap_or(constants::NOT_INFORMED_LABEL)),
        constants::TOP_EVALUATORS,
    )
}

pub fn summary_stats(records: &[ProcedureRecord]) -> SummaryStats {
    let total_procedures = records.len();
    let total_billed: f64 = records.iter().map(|r| r.billed_amount).sum();
    let pending_billing = records.iter().filter(|r| !r.is_billed()).count();

    let average_billed = if total_procedures > 0 {
        total_billed / total_procedures as f64
    } else {
        0.0
    };

    let top_procedures = top_counts(
        records,
        |r| non_empty(&r.procedure_description),
        constants::TOP_PROCEDURES,
    )
    .into_iter()
    .map(|entry| ProcedureCount {
        short_name: short_label(&entry.name),
        name: entry.name,
        count: entry.count,
    })
    .collect();

    SummaryStats {
        total_procedures,
        total_billed,
        pending_billing,
        average_billed,
        top_procedures,
    }
}

/// Compute every view from an already filtered record set
pub fn snapshot(records: &[ProcedureRecord], month_filter: MonthFilter) -> DashboardSnapshot {
    DashboardSnapshot {
        month_filter,
        monthly_volume: monthly_volume(records),
        monthly_billed: monthly_billed(records),
        monthly_overview: monthly_overview(records),
        by_state: by_state(records),
        by_authorizer: by_authorizer(records),
        by_evaluator: by_evaluator(records),
        summary: summary_stats(records),
    }
}

// =============================================================================
// Chart Series
// =============================================================================

/// One labelled numeric point, the shape chart renderers consume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
    /// Full name behind a shortened label, shown as the point's tooltip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            detail: None,
        }
    }
}

/// Views that can be plotted as a single series
pub trait ToSeriesPoint {
    fn to_point(&self) -> SeriesPoint;
}

impl ToSeriesPoint for MonthlyCount {
    fn to_point(&self) -> SeriesPoint {
        SeriesPoint::new(self.label, self.count as f64)
    }
}

impl ToSeriesPoint for MonthlyAmount {
    fn to_point(&self) -> SeriesPoint {
        SeriesPoint::new(self.label, self.amount)
    }
}

impl ToSeriesPoint for StateTotals {
    fn to_point(&self) -> SeriesPoint {
        SeriesPoint::new(self.state.clone(), self.count as f64)
    }
}

impl ToSeriesPoint for NamedCount {
    fn to_point(&self) -> SeriesPoint {
        SeriesPoint::new(self.name.clone(), self.count as f64)
    }
}

impl ToSeriesPoint for ProcedureCount {
    fn to_point(&self) -> SeriesPoint {
        SeriesPoint {
            detail: (self.short_name != self.name).then(|| self.name.clone()),
            ..SeriesPoint::new(self.short_name.clone(), self.count as f64)
        }
    }
}

pub fn series<T: ToSeriesPoint>(items: &[T]) -> Vec<SeriesPoint> {
    items.iter().map(ToSeriesPoint::to_point).collect()
}

// =============================================================================
// Helpers
// =============================================================================

fn month_label(month: u32) -> &'static str {
    month_abbreviation(month).unwrap_or("?")
}

/// (count, amount) per month index 0..12. Records without a month are skipped.
fn month_buckets(records: &[ProcedureRecord]) -> [(usize, f64); 12] {
    let mut buckets = [(0usize, 0.0f64); 12];
    for record in records {
        if let Some(month @ 1..=12) = record.month {
            let bucket = &mut buckets[(month - 1) as usize];
            bucket.0 += 1;
            bucket.1 += record.billed_amount;
        }
    }
    buckets
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Fold records into groups keyed by `key`, in first-seen key order
fn group_first_seen<'a, V: Default>(
    records: &'a [ProcedureRecord],
    key: impl Fn(&'a ProcedureRecord) -> Option<&'a str>,
    mut fold: impl FnMut(&mut V, &ProcedureRecord),
) -> Vec<(String, V)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, V)> = Vec::new();

    for record in records {
        let Some(k) = key(record) else {
            continue;
        };
        let slot = *index.entry(k).or_insert_with(|| {
            groups.push((k.to_string(), V::default()));
            groups.len() - 1
        });
        fold(&mut groups[slot].1, record);
    }

    groups
}

fn top_counts<'a>(
    records: &'a [ProcedureRecord],
    key: impl Fn(&'a ProcedureRecord) -> Option<&'a str>,
    limit: usize,
) -> Vec<NamedCount> {
    let groups = group_first_seen(records, key, |count: &mut usize, _| *count += 1);
    let mut result: Vec<NamedCount> = groups
        .into_iter()
        .map(|(name, count)| NamedCount { name, count })
        .collect();

    result.sort_by(|a, b| b.count.cmp(&a.count));
    result.truncate(limit);
    result
}
