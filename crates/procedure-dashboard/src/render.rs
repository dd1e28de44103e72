//! Console presentation of the dashboard: status, cards, tabs and charts

use procedure_core::aggregate::{DashboardSnapshot, series};
use procedure_core::format::{format_brl, month_name};
use procedure_core::{DashboardState, DashboardView, MonthFilter, SeriesPoint};
use std::fmt::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::charts::{Chart, ChartKind, ChartRenderer, Series};
use crate::constants;

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "Estado")]
    state: String,
    #[tabled(rename = "Quantidade")]
    count: usize,
    #[tabled(rename = "Valor")]
    amount: String,
}

#[derive(Tabled)]
struct ProcedureRow {
    #[tabled(rename = "Procedimento")]
    name: String,
    #[tabled(rename = "Quantidade")]
    count: usize,
}

/// Render the whole dashboard for the current state
pub fn render_dashboard(state: &mut DashboardState, renderer: &dyn ChartRenderer) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", constants::DASHBOARD_TITLE);
    let _ = writeln!(out, "{}", constants::DASHBOARD_SUBTITLE);
    let _ = writeln!(out, "{}", "=".repeat(60));

    if state.is_loading() {
        let _ = writeln!(out, "\nCarregando arquivo...");
        return out;
    }

    if let Some(error) = state.error() {
        let _ = writeln!(out, "\nErro: {}", error);
    }

    if !state.has_data() {
        if state.error().is_none() {
            let _ = writeln!(out, "\nNenhum arquivo carregado");
            let _ = writeln!(out, "Carregue um arquivo Excel para visualizar o dashboard");
        }
        return out;
    }

    if let Some(source) = state.source() {
        let _ = writeln!(out, "Arquivo: {}", source);
    }
    let _ = writeln!(out, "Filtros: Mês = {}", state.month_filter().label());
    let _ = writeln!(out, "{}", render_tabs(state.active_view()));

    let view = state.active_view();
    let snapshot = state.snapshot();
    out.push_str(&render_cards(&snapshot));
    out.push('\n');
    out.push_str(&render_view(&snapshot, view, renderer));
    out
}

/// Tab strip with the active tab bracketed
pub fn render_tabs(active: DashboardView) -> String {
    DashboardView::ALL
        .iter()
        .map(|view| {
            if *view == active {
                format!("[{}]", view.title())
            } else {
                format!(" {} ", view.title())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary cards. "A Faturar" is the number of records without a billing
/// date, shown as a count.
pub fn render_cards(snapshot: &DashboardSnapshot) -> String {
    let stats = &snapshot.summary;
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "  Total de Procedimentos:  {}", stats.total_procedures);
    let _ = writeln!(out, "  Valor Total Faturado:    {}", format_brl(stats.total_billed));
    let _ = writeln!(out, "  A Faturar:               {}", stats.pending_billing);
    let _ = writeln!(out, "  Média por Procedimento:  {}", format_brl(stats.average_billed));
    out
}

/// Charts and tables of one tab
pub fn render_view(
    snapshot: &DashboardSnapshot,
    view: DashboardView,
    renderer: &dyn ChartRenderer,
) -> String {
    let period = match snapshot.month_filter {
        MonthFilter::All => String::new(),
        MonthFilter::Month(m) => format!(" ({})", month_name(m).unwrap_or("?")),
    };

    let charts = match view {
        DashboardView::Overview => vec![
            Chart::new(
                format!("Procedimentos Liberados por Mês{}", period),
                ChartKind::Bar,
                vec![Series::new(constants::SERIES_COUNT, series(&snapshot.monthly_volume))],
            ),
            Chart::new(
                format!("Valor Faturado por Mês{}", period),
                ChartKind::Area,
                vec![Series::new(constants::SERIES_AMOUNT, series(&snapshot.monthly_billed))],
            ),
            Chart::new(
                "Procedimentos por Estado",
                ChartKind::Bar,
                vec![Series::new(constants::SERIES_COUNT, series(&snapshot.by_state))],
            ),
            Chart::new(
                "Procedimentos por Avaliador",
                ChartKind::Pie,
                vec![Series::new(constants::SERIES_COUNT, series(&snapshot.by_evaluator))],
            ),
        ],
        DashboardView::Procedures => vec![
            Chart::new(
                "Procedimentos Mais Comuns",
                ChartKind::Bar,
                vec![Series::new(
                    constants::SERIES_COUNT,
                    series(&snapshot.summary.top_procedures),
                )],
            ),
            Chart::new(
                "Procedimentos por Autorizador",
                ChartKind::Pie,
                vec![Series::new(constants::SERIES_COUNT, series(&snapshot.by_authorizer))],
            ),
        ],
        DashboardView::Financial => {
            let (amounts, counts): (Vec<SeriesPoint>, Vec<SeriesPoint>) = snapshot
                .monthly_overview
                .iter()
                .map(|m| {
                    (
                        SeriesPoint::new(m.label, m.amount),
                        SeriesPoint::new(m.label, m.count as f64),
                    )
                })
                .unzip();
            vec![Chart::new(
                format!("Evolução do Faturamento{}", period),
                ChartKind::Line,
                vec![
                    Series::new(constants::SERIES_BILLED_AMOUNT, amounts),
                    Series::new(constants::SERIES_PROCEDURES, counts),
                ],
            )]
        }
    };

    let mut out = String::new();
    for chart in &charts {
        out.push_str(&renderer.render(chart));
        out.push('\n');
    }

    match view {
        DashboardView::Overview if !snapshot.by_state.is_empty() => {
            let rows: Vec<StateRow> = snapshot
                .by_state
                .iter()
                .map(|s| StateRow {
                    state: s.state.clone(),
                    count: s.count,
                    amount: format_brl(s.amount),
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            let _ = writeln!(out, "{}", table);
        }
        DashboardView::Procedures if !snapshot.summary.top_procedures.is_empty() => {
            let rows: Vec<ProcedureRow> = snapshot
                .summary
                .top_procedures
                .iter()
                .map(|p| ProcedureRow {
                    name: p.name.clone(),
                    count: p.count,
                })
                .collect();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            let _ = writeln!(out, "{}", table);
        }
        _ => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::TextChartRenderer;
    use procedure_core::ProcedureRecord;

    fn record(month: u32, amount: f64, state: &str, billed: bool) -> ProcedureRecord {
        ProcedureRecord {
            creation_date: None,
            surgery_date: None,
            billing_date: billed.then(|| {
                procedure_core::records::from_excel_serial(45300.0).unwrap()
            }),
            billed_amount: amount,
            month: Some(month),
            year: Some(2024),
            state: Some(state.to_string()),
            authorizer: Some("Dra. Ana".to_string()),
            evaluator: None,
            procedure_description: Some("Artroscopia de joelho".to_string()),
        }
    }

    fn loaded_state() -> DashboardState {
        let mut state = DashboardState::new();
        state.load_records(
            vec![
                record(1, 100.0, "SP", false),
                record(1, 200.0, "SP", true),
                record(2, 50.0, "RJ", false),
            ],
            "procedimentos.xlsx",
        );
        state
    }

    #[test]
    fn test_empty_state_prompts_for_file() {
        let mut state = DashboardState::new();
        let text = render_dashboard(&mut state, &TextChartRenderer::default());
        assert!(text.contains("Nenhum arquivo carregado"));
    }

    #[test]
    fn test_loading_state() {
        let mut state = DashboardState::new();
        state.begin_load();
        let text = render_dashboard(&mut state, &TextChartRenderer::default());
        assert!(text.contains("Carregando arquivo..."));
        assert!(!text.contains("Total de Procedimentos"));
    }

    #[test]
    fn test_cards() {
        let mut state = loaded_state();
        let text = render_dashboard(&mut state, &TextChartRenderer::default());

        assert!(text.contains("Arquivo: procedimentos.xlsx"));
        assert!(text.contains("Total de Procedimentos:  3"));
        assert!(text.contains("Valor Total Faturado:    R$\u{a0}350,00"));
        assert!(text.contains("A Faturar:               2"));
        assert!(text.contains("Média por Procedimento:  R$\u{a0}116,67"));
    }

    #[test]
    fn test_tabs_mark_active_view() {
        assert_eq!(
            render_tabs(DashboardView::Procedures),
            " Visão Geral  [Procedimentos]  Financeiro "
        );
    }

    #[test]
    fn test_views_render_their_charts() {
        let mut state = loaded_state();
        let snapshot = state.snapshot();
        let renderer = TextChartRenderer::default();

        let overview = render_view(&snapshot, DashboardView::Overview, &renderer);
        assert!(overview.contains("Procedimentos Liberados por Mês"));
        assert!(overview.contains("Procedimentos por Avaliador"));
        assert!(overview.contains("Não informado"));
        assert!(overview.contains("Estado"));

        let procedures = render_view(&snapshot, DashboardView::Procedures, &renderer);
        assert!(procedures.contains("Artroscopia de ..."));
        assert!(procedures.contains("Artroscopia de ... = Artroscopia de joelho, Quantidade: 3"));
        assert!(procedures.contains("Dra. Ana"));

        let financial = render_view(&snapshot, DashboardView::Financial, &renderer);
        assert!(financial.contains("Valor Faturado (R$)"));
        assert!(financial.contains("R$\u{a0}300,00"));
    }

    #[test]
    fn test_month_filter_in_titles() {
        let mut state = loaded_state();
        state.set_month_filter(MonthFilter::Month(2));
        let text = render_dashboard(&mut state, &TextChartRenderer::default());
        assert!(text.contains("Filtros: Mês = Fevereiro"));
        assert!(text.contains("Procedimentos Liberados por Mês (Fevereiro)"));
        assert!(text.contains("Total de Procedimentos:  1"));
    }

    #[test]
    fn test_error_with_previous_data_still_renders_dashboard() {
        let mut state = loaded_state();
        let ticket = state.begin_load();
        state.complete_load(ticket, Err(procedure_core::LoadError::decode("arquivo inválido")));

        let text = render_dashboard(&mut state, &TextChartRenderer::default());
        assert!(text.contains("Erro: failed to process file: arquivo inválido"));
        assert!(text.contains("Total de Procedimentos:  3"));
    }
}
