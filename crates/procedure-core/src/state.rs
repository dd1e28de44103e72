//! Dashboard state container
//!
//! Holds the loaded record set, the month filter, load status and active
//! view. The filtered set is always recomputed from (records, filter) and is
//! never edited directly.
//!
//! Overlapping uploads: the most recently *started* load wins. Every call to
//! [`DashboardState::begin_load`] issues a new ticket; completions carrying an
//! older ticket are discarded whatever order they arrive in.

use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::aggregate::{self, DashboardSnapshot};
use crate::error::{LoadError, ParseViewError};
use crate::filter::{MonthFilter, apply_filter};
use crate::loader::LoadedWorkbook;
use crate::records::ProcedureRecord;

/// Dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashboardView {
    #[default]
    Overview,
    Procedures,
    Financial,
}

impl DashboardView {
    pub const ALL: [DashboardView; 3] = [
        DashboardView::Overview,
        DashboardView::Procedures,
        DashboardView::Financial,
    ];

    /// Tab caption
    pub fn title(&self) -> &'static str {
        match self {
            DashboardView::Overview => "Visão Geral",
            DashboardView::Procedures => "Procedimentos",
            DashboardView::Financial => "Financeiro",
        }
    }
}

impl std::fmt::Display for DashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardView::Overview => write!(f, "overview"),
            DashboardView::Procedures => write!(f, "procedures"),
            DashboardView::Financial => write!(f, "financial"),
        }
    }
}

impl FromStr for DashboardView {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overview" | "geral" => Ok(DashboardView::Overview),
            "procedures" | "procedimentos" => Ok(DashboardView::Procedures),
            "financial" | "financeiro" => Ok(DashboardView::Financial),
            _ => Err(ParseViewError {
                input: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Identifies one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What `complete_load` did with a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Installed,
    Failed,
    /// A newer load was started; the completion was ignored
    Stale,
}

#[derive(Debug)]
pub struct DashboardState {
    records: Arc<[ProcedureRecord]>,
    filtered: Arc<[ProcedureRecord]>,
    month_filter: MonthFilter,
    active_view: DashboardView,
    status: LoadStatus,
    source: Option<String>,
    latest_ticket: u64,
    /// Last snapshot and the filtered set it was computed from
    cached: Option<(Arc<[ProcedureRecord]>, Arc<DashboardSnapshot>)>,
}

impl Default for DashboardState {
    fn default() -> Self {
        let empty: Arc<[ProcedureRecord]> = Arc::from(Vec::new());
        Self {
            filtered: Arc::clone(&empty),
            records: empty,
            month_filter: MonthFilter::All,
            active_view: DashboardView::Overview,
            status: LoadStatus::Idle,
            source: None,
            latest_ticket: 0,
            cached: None,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Mark a new load as in flight and return its ticket. Any earlier ticket
    /// becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.status = LoadStatus::Loading;
        LoadTicket(self.latest_ticket)
    }

    /// Apply the result of the load identified by `ticket`
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedWorkbook, LoadError>,
    ) -> LoadOutcome {
        if ticket.0 != self.latest_ticket {
            warn!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "Discarding result of superseded load"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(workbook) => {
                self.install(workbook.records, workbook.source);
                LoadOutcome::Installed
            }
            Err(e) => {
                warn!(error = %e, "Load failed, keeping previous records");
                self.status = LoadStatus::Failed(e.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Replace the record set wholesale. Supersedes any load in flight.
    pub fn load_records(&mut self, records: Vec<ProcedureRecord>, source: impl Into<String>) {
        self.latest_ticket += 1;
        self.install(records, source.into());
    }

    fn install(&mut self, records: Vec<ProcedureRecord>, source: String) {
        info!(records = records.len(), source = %source, "Installed record set");
        self.records = records.into();
        self.source = Some(source);
        self.status = LoadStatus::Ready;
        self.refilter();
    }

    // -------------------------------------------------------------------------
    // Filter and view
    // -------------------------------------------------------------------------

    pub fn set_month_filter(&mut self, filter: MonthFilter) {
        if filter != self.month_filter {
            self.month_filter = filter;
            self.refilter();
        }
    }

    pub fn clear_month_filter(&mut self) {
        self.set_month_filter(MonthFilter::All);
    }

    pub fn set_active_view(&mut self, view: DashboardView) {
        self.active_view = view;
    }

    fn refilter(&mut self) {
        self.filtered = apply_filter(&self.records, self.month_filter);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn records(&self) -> &[ProcedureRecord] {
        &self.records
    }

    pub fn filtered(&self) -> &[ProcedureRecord] {
        &self.filtered
    }

    pub fn month_filter(&self) -> MonthFilter {
        self.month_filter
    }

    pub fn active_view(&self) -> DashboardView {
        self.active_view
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// True once any file has been loaded successfully
    pub fn has_data(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// All views for the current filtered set. Reuses the previous snapshot
    /// while the filtered set is the same allocation.
    pub fn snapshot(&mut self) -> Arc<DashboardSnapshot> {
        if let Some((computed_from, snapshot)) = &self.cached {
            if Arc::ptr_eq(computed_from, &self.filtered)
                && snapshot.month_filter == self.month_filter
            {
                return Arc::clone(snapshot);
            }
        }

        let snapshot = Arc::new(aggregate::snapshot(&self.filtered, self.month_filter));
        self.cached = Some((Arc::clone(&self.filtered), Arc::clone(&snapshot)));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: u32, state: &str) -> ProcedureRecord {
        ProcedureRecord {
            creation_date: None,
            surgery_date: None,
            billing_date: None,
            billed_amount: 10.0,
            month: Some(month),
            year: Some(2024),
            state: Some(state.to_string()),
            authorizer: None,
            evaluator: None,
            procedure_description: None,
        }
    }

    fn workbook(source: &str, records: Vec<ProcedureRecord>) -> LoadedWorkbook {
        LoadedWorkbook {
            source: source.to_string(),
            sheet_name: "Planilha1".to_string(),
            records,
            missing_columns: Vec::new(),
        }
    }

    #[test]
    fn test_initial_state_is_empty() {
        let mut state = DashboardState::new();
        assert_eq!(state.status(), &LoadStatus::Idle);
        assert!(!state.has_data());
        assert!(state.records().is_empty());
        assert_eq!(state.month_filter(), MonthFilter::All);
        assert_eq!(state.active_view(), DashboardView::Overview);
        assert_eq!(state.snapshot().summary.total_procedures, 0);
    }

    #[test]
    fn test_successful_load_installs_records() {
        let mut state = DashboardState::new();
        let ticket = state.begin_load();
        assert!(state.is_loading());

        let loaded = workbook("a.xlsx", vec![record(1, "SP"), record(2, "RJ")]);
        let outcome = state.complete_load(ticket, Ok(loaded));
        assert_eq!(outcome, LoadOutcome::Installed);
        assert_eq!(state.status(), &LoadStatus::Ready);
        assert_eq!(state.source(), Some("a.xlsx"));
        assert_eq!(state.records().len(), 2);
        assert_eq!(state.filtered().len(), 2);
    }

    #[test]
    fn test_failed_load_keeps_previous_records() {
        let mut state = DashboardState::new();
        state.load_records(vec![record(1, "SP")], "a.xlsx");
        state.set_month_filter(MonthFilter::Month(1));
        state.set_active_view(DashboardView::Financial);

        let ticket = state.begin_load();
        let outcome =
            state.complete_load(ticket, Err(LoadError::decode("not a readable spreadsheet")));

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(!state.is_loading());
        assert!(state.error().unwrap().contains("not a readable spreadsheet"));
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.source(), Some("a.xlsx"));
        assert_eq!(state.month_filter(), MonthFilter::Month(1));
        assert_eq!(state.active_view(), DashboardView::Financial);
    }

    #[test]
    fn test_second_upload_replaces_records_under_current_filter() {
        let mut state = DashboardState::new();
        state.load_records(vec![record(1, "SP"), record(2, "RJ")], "a.xlsx");
        state.set_month_filter(MonthFilter::Month(2));
        assert_eq!(state.filtered().len(), 1);

        let ticket = state.begin_load();
        let loaded = workbook("b.xlsx", vec![record(2, "MG"), record(2, "BA"), record(3, "PR")]);
        state.complete_load(ticket, Ok(loaded));

        assert_eq!(state.records().len(), 3);
        assert_eq!(state.month_filter(), MonthFilter::Month(2));
        let states: Vec<_> = state.filtered().iter().map(|r| r.state.clone().unwrap()).collect();
        assert_eq!(states, vec!["MG", "BA"]);
    }

    #[test]
    fn test_latest_started_load_wins() {
        let mut state = DashboardState::new();
        let first = state.begin_load();
        let second = state.begin_load();

        // Newer load finishes first, older one arrives late
        assert_eq!(
            state.complete_load(second, Ok(workbook("novo.xlsx", vec![record(1, "SP")]))),
            LoadOutcome::Installed
        );
        assert_eq!(
            state.complete_load(
                first,
                Ok(workbook("velho.xlsx", vec![record(1, "RJ"), record(1, "MG")]))
            ),
            LoadOutcome::Stale
        );

        assert_eq!(state.source(), Some("novo.xlsx"));
        assert_eq!(state.records().len(), 1);
    }

    #[test]
    fn test_stale_completion_does_not_clear_loading() {
        let mut state = DashboardState::new();
        let first = state.begin_load();
        let _second = state.begin_load();

        assert_eq!(
            state.complete_load(first, Err(LoadError::decode("boom"))),
            LoadOutcome::Stale
        );
        assert!(state.is_loading());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn test_direct_load_supersedes_in_flight_load() {
        let mut state = DashboardState::new();
        let ticket = state.begin_load();
        state.load_records(vec![record(4, "SP")], "direto.xlsx");

        assert_eq!(
            state.complete_load(ticket, Ok(workbook("antigo.xlsx", Vec::new()))),
            LoadOutcome::Stale
        );
        assert_eq!(state.source(), Some("direto.xlsx"));
    }

    #[test]
    fn test_filter_changes_recompute_filtered_set() {
        let mut state = DashboardState::new();
        state.load_records(vec![record(1, "SP"), record(3, "RJ"), record(3, "MG")], "a.xlsx");

        state.set_month_filter(MonthFilter::Month(3));
        assert_eq!(state.filtered().len(), 2);
        assert_eq!(state.records().len(), 3);

        state.clear_month_filter();
        assert_eq!(state.filtered().len(), 3);
    }

    #[test]
    fn test_snapshot_is_cached_until_filter_changes() {
        let mut state = DashboardState::new();
        state.load_records(vec![record(1, "SP"), record(2, "RJ")], "a.xlsx");

        let first = state.snapshot();
        let again = state.snapshot();
        assert!(Arc::ptr_eq(&first, &again));

        state.set_month_filter(MonthFilter::Month(2));
        let filtered = state.snapshot();
        assert!(!Arc::ptr_eq(&first, &filtered));
        assert_eq!(filtered.summary.total_procedures, 1);
        assert_eq!(filtered.month_filter, MonthFilter::Month(2));
    }

    #[test]
    fn test_parse_view() {
        assert_eq!("overview".parse::<DashboardView>().unwrap(), DashboardView::Overview);
        assert_eq!("Procedimentos".parse::<DashboardView>().unwrap(), DashboardView::Procedures);
        assert_eq!("financeiro".parse::<DashboardView>().unwrap(), DashboardView::Financial);
        assert!("graficos".parse::<DashboardView>().is_err());
        assert_eq!(DashboardView::Financial.to_string(), "financial");
    }
}
