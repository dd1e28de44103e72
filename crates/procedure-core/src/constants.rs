//! Centralized constants for the procedure billing pipeline
//!
//! Column headers match the spreadsheets exported by the billing system.
//! They can be overridden per deployment through the dashboard config file.

// =============================================================================
// Default Column Headers
// =============================================================================

/// Date the procedure request was created (drives month/year)
pub const HEADER_CREATION_DATE: &str = "data criação";

/// Date the surgery took place
pub const HEADER_SURGERY_DATE: &str = "data da cirurgia";

/// Date the procedure was billed (absent = still to be billed)
pub const HEADER_BILLING_DATE: &str = "data de faturamento";

/// Total billed amount in BRL
pub const HEADER_BILLED_AMOUNT: &str = "vl total faturado";

/// Federative unit (state) where the surgery took place
pub const HEADER_STATE: &str = "uf local da cirurgia";

/// Person or entity that authorized the procedure
pub const HEADER_AUTHORIZER: &str = "autorizador";

/// Person responsible for the evaluation
pub const HEADER_EVALUATOR: &str = "responsável pela avaliação";

/// Free-text procedure description
pub const HEADER_PROCEDURE_DESCRIPTION: &str = "descrição procedimento";

// =============================================================================
// Aggregation Limits
// =============================================================================

/// Number of states kept in the by-state view
pub const TOP_STATES: usize = 10;

/// Number of authorizers kept in the by-authorizer view
pub const TOP_AUTHORIZERS: usize = 5;

/// Number of evaluators kept in the by-evaluator view
pub const TOP_EVALUATORS: usize = 8;

/// Number of procedure descriptions kept in the summary statistics
pub const TOP_PROCEDURES: usize = 5;

// =============================================================================
// Labels
// =============================================================================

/// Bucket label for records without an evaluator
pub const NOT_INFORMED_LABEL: &str = "Não informado";

/// Month abbreviations used as chart axis labels (Jan..Dez)
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Full month names used by the month filter
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Label of the "all months" filter option
pub const ALL_MONTHS_LABEL: &str = "Todos";

/// Descriptions longer than this are shortened on chart axes
pub const SHORT_LABEL_CHARS: usize = 15;

// =============================================================================
// Dates
// =============================================================================

/// Excel serial dates count days from this date (1900 date system, with the
/// leap-year bug folded in)
pub const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest valid Excel serial date (9999-12-31)
pub const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;
