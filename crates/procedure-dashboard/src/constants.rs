//! Constants for the console dashboard

// =============================================================================
// File Names
// =============================================================================

/// Config file looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "dashboard.toml";

/// Default export directory
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Monthly volume and billed amount CSV filename
pub const MONTHLY_OVERVIEW_FILENAME: &str = "monthly_overview.csv";

/// By-state CSV filename
pub const BY_STATE_FILENAME: &str = "by_state.csv";

/// By-authorizer CSV filename
pub const BY_AUTHORIZER_FILENAME: &str = "by_authorizer.csv";

/// By-evaluator CSV filename
pub const BY_EVALUATOR_FILENAME: &str = "by_evaluator.csv";

/// Top procedures CSV filename
pub const TOP_PROCEDURES_FILENAME: &str = "top_procedures.csv";

/// Summary statistics CSV filename
pub const SUMMARY_FILENAME: &str = "summary.csv";

// =============================================================================
// Rendering
// =============================================================================

/// Width of the longest bar in text charts (characters)
pub const CHART_BAR_WIDTH: usize = 40;

/// Title shown at the top of the dashboard
pub const DASHBOARD_TITLE: &str = "Dashboard de Procedimentos Médicos";

/// Subtitle under the dashboard title
pub const DASHBOARD_SUBTITLE: &str = "Análise de Desempenho e Gestão Financeira";

// =============================================================================
// Series Names
// =============================================================================

pub const SERIES_COUNT: &str = "Quantidade";
pub const SERIES_AMOUNT: &str = "Valor (R$)";
pub const SERIES_BILLED_AMOUNT: &str = "Valor Faturado (R$)";
pub const SERIES_PROCEDURES: &str = "Procedimentos";
