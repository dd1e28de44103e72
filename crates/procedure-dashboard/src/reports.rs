//! Report generation (CSV export of every aggregation view)

use anyhow::Result;
use csv::Writer;
use procedure_core::DashboardSnapshot;
use std::path::{Path, PathBuf};

use crate::constants;

/// Write one CSV per view into `output_dir`. Returns the written paths.
pub fn generate_all_reports(
    output_dir: &Path,
    snapshot: &DashboardSnapshot,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    Ok(vec![
        generate_monthly_overview(output_dir, snapshot)?,
        generate_by_state(output_dir, snapshot)?,
        generate_by_authorizer(output_dir, snapshot)?,
        generate_by_evaluator(output_dir, snapshot)?,
        generate_top_procedures(output_dir, snapshot)?,
        generate_summary(output_dir, snapshot)?,
    ])
}

/// Generate monthly_overview.csv (12 rows, Jan..Dez)
fn generate_monthly_overview(output_dir: &Path, snapshot: &DashboardSnapshot) -> Result<PathBuf> {
    let path = output_dir.join(constants::MONTHLY_OVERVIEW_FILENAME);
    let mut wtr = Writer::from_path(&path)?;

    wtr.write_record(["Month", "Label", "Procedures", "Billed_Amount"])?;

    for month in &snapshot.monthly_overview {
        wtr.write_record([
            &month.month.to_string(),
            month.label,
            &month.count.to_string(),
            &format!("{:.2}", month.amount),
        ])?;
    }

    wtr.flush()?;
    Ok(path)
}

/// Generate by_state.csv
fn generate_by_state(output_dir: &Path, snapshot: &DashboardSnapshot) -> Result<PathBuf> {
    let path = output_dir.join(constants::BY_STATE_FILENAME);
    let mut wtr = Writer::from_path(&path)?;

    wtr.write_record(["State", "Procedures", "Billed_Amount"])?;

    for state in &snapshot.by_state {
        wtr.write_record([
            state.state.as_str(),
            &state.count.to_string(),
            &format!("{:.2}", state.amount),
        ])?;
    }

    wtr.flush()?;
    Ok(path)
}

/// Generate by_authorizer.csv
fn generate_by_authorizer(output_dir: &Path, snapshot: &DashboardSnapshot) -> Result<PathBuf> {
    let path = output_dir.join(constants::BY_AUTHORIZER_FILENAME);
    let mut wtr = Writer::from_path(&path)?;

    wtr.write_record(["Authorizer", "Procedures"])?;
    for entry in &snapshot.by_authorizer {
        wtr.write_record([entry.name.as_str(), &entry.count.to_string()])?;
    }

    wtr.flush()?;
    Ok(path)
}

/// Generate by_evaluator.csv (includes the "Não informado" bucket)
fn generate_by_evaluator(output_dir: &Path, snapshot: &DashboardSnapshot) -> Result<PathBuf> {
    let path = output_dir.join(constants::BY_EVALUATOR_FILENAME);
    let mut wtr = Writer::from_path(&path)?;

    wtr.write_record(["Evaluator", "Procedures"])?;
    for entry in &snapshot.by_evaluator {
        wtr.write_record([entry.name.as_str(), &entry.count.to_string()])?;
    }

    wtr.flush()?;
    Ok(path)
}

/// Generate top_procedures.csv
fn generate_top_procedures(output_dir: &Path, snapshot: &DashboardSnapshot) -> Result<PathBuf> {
    let path = output_dir.join(constants::TOP_PROCEDURES_FILENAME);
    let mut wtr = Writer::from_path(&path)?;

    wtr.write_record(["Procedure", "Short_Name", "Procedures"])?;
    for procedure in &snapshot.summary.top_procedures {
        wtr.write_record([
            procedure.name.as_str(),
            procedure.short_name.as_str(),
            &procedure.count.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(path)
}

/// Generate summary.csv (single row of headline figures)
fn generate_summary(output_dir: &Path, snapshot: &DashboardSnapshot) -> Result<PathBuf> {
    let path = output_dir.join(constants::SUMMARY_FILENAME);
    let mut wtr = Writer::from_path(&path)?;
    let stats = &snapshot.summary;

    wtr.write_record([
        "Month_Filter",
        "Total_Procedures",
        "Total_Billed",
        "Pending_Billing_Count",
        "Average_Billed",
    ])?;
    wtr.write_record([
        &snapshot.month_filter.to_string(),
        &stats.total_procedures.to_string(),
        &format!("{:.2}", stats.total_billed),
        &stats.pending_billing.to_string(),
        &format!("{:.2}", stats.average_billed),
    ])?;

    wtr.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use procedure_core::{MonthFilter, ProcedureRecord, snapshot};

    fn record(month: u32, amount: f64, state: &str) -> ProcedureRecord {
        ProcedureRecord {
            creation_date: None,
            surgery_date: None,
            billing_date: None,
            billed_amount: amount,
            month: Some(month),
            year: Some(2024),
            state: Some(state.to_string()),
            authorizer: Some("Dra. Ana".to_string()),
            evaluator: None,
            procedure_description: Some("Consulta".to_string()),
        }
    }

    #[test]
    fn test_generate_all_reports() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("relatorios");
        let snap = snapshot(
            &[record(1, 100.0, "SP"), record(1, 200.0, "SP"), record(2, 50.5, "RJ")],
            MonthFilter::All,
        );

        let written = generate_all_reports(&output, &snap).unwrap();
        assert_eq!(written.len(), 6);
        assert!(written.iter().all(|p| p.exists()));

        let monthly = std::fs::read_to_string(output.join("monthly_overview.csv")).unwrap();
        let lines: Vec<_> = monthly.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "Month,Label,Procedures,Billed_Amount");
        assert_eq!(lines[1], "1,Jan,2,300.00");
        assert_eq!(lines[2], "2,Fev,1,50.50");
        assert_eq!(lines[12], "12,Dez,0,0.00");

        let states = std::fs::read_to_string(output.join("by_state.csv")).unwrap();
        assert_eq!(states, "State,Procedures,Billed_Amount\nSP,2,300.00\nRJ,1,50.50\n");

        let evaluators = std::fs::read_to_string(output.join("by_evaluator.csv")).unwrap();
        assert!(evaluators.contains("Não informado,3"));

        let summary = std::fs::read_to_string(output.join("summary.csv")).unwrap();
        assert!(summary.ends_with("all,3,350.50,3,116.83\n"));
    }

    #[test]
    fn test_reports_for_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snap = snapshot(&[], MonthFilter::Month(5));

        generate_all_reports(dir.path(), &snap).unwrap();

        let states = std::fs::read_to_string(dir.path().join("by_state.csv")).unwrap();
        assert_eq!(states, "State,Procedures,Billed_Amount\n");

        let summary = std::fs::read_to_string(dir.path().join("summary.csv")).unwrap();
        assert!(summary.ends_with("5,0,0.00,0,0.00\n"));
    }
}
