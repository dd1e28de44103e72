//! Procedure billing pipeline
//!
//! Turns a billing spreadsheet into typed procedure records, narrows them by
//! month and computes the dashboard's aggregation views.
//!
//! ```text
//! bytes ─ decode ─> RawRow ─ normalize ─> ProcedureRecord ─ filter ─> views
//! ```

pub mod aggregate;
pub mod constants;
pub mod decode;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod raw;
pub mod records;
pub mod schema;
pub mod state;

pub use aggregate::{DashboardSnapshot, SeriesPoint, snapshot};
pub use error::{LoadError, ParseMonthFilterError, ParseViewError};
pub use filter::{MonthFilter, filter_records};
pub use loader::{LoadedWorkbook, load_workbook};
pub use raw::{RawRow, RawValue};
pub use records::{ProcedureRecord, normalize_rows};
pub use schema::{ColumnSchema, Field};
pub use state::{DashboardState, DashboardView, LoadOutcome, LoadStatus, LoadTicket};
