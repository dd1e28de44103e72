//! Chart rendering
//!
//! Charts are described as labelled numeric series and handed to a
//! [`ChartRenderer`]. The console ships a text renderer; values of series
//! whose name mentions "valor" are shown as BRL. Points with a shortened
//! label get a tooltip line with their full name under the chart.

use procedure_core::SeriesPoint;
use procedure_core::format::{format_series_value, tooltip_lines};
use std::fmt::Write;

use crate::constants;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Area,
    Line,
    Pie,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn new(title: impl Into<String>, kind: ChartKind, series: Vec<Series>) -> Self {
        Self {
            title: title.into(),
            kind,
            series,
        }
    }
}

/// Something that can draw a chart
pub trait ChartRenderer {
    fn render(&self, chart: &Chart) -> String;
}

/// Draws charts as text: proportional bars for bar/area/line charts and
/// percentage shares for pies.
pub struct TextChartRenderer {
    bar_width: usize,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self {
            bar_width: constants::CHART_BAR_WIDTH,
        }
    }
}

impl TextChartRenderer {
    pub fn with_width(bar_width: usize) -> Self {
        Self { bar_width }
    }

    fn render_bars(&self, out: &mut String, series: &Series, glyph: char) {
        let label_width = label_width(&series.points);
        let max = series.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);

        for point in &series.points {
            let len = if max > 0.0 {
                ((point.value / max) * self.bar_width as f64).round() as usize
            } else {
                0
            };
            let _ = writeln!(
                out,
                "  {:<width$} │{} {}",
                point.label,
                glyph.to_string().repeat(len),
                format_series_value(&series.name, point.value),
                width = label_width,
            );
        }
    }

    fn render_pie(&self, out: &mut String, series: &Series) {
        let label_width = label_width(&series.points);
        let total: f64 = series.points.iter().map(|p| p.value).sum();

        for point in &series.points {
            let share = if total > 0.0 { point.value / total * 100.0 } else { 0.0 };
            let _ = writeln!(
                out,
                "  {:<width$}  {:>5.1}%  ({})",
                point.label,
                share,
                format_series_value(&series.name, point.value),
                width = label_width,
            );
        }
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&self, chart: &Chart) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", chart.title);

        if chart.series.iter().all(|s| s.points.is_empty()) {
            let _ = writeln!(out, "  (sem dados)");
            return out;
        }

        for series in &chart.series {
            if chart.series.len() > 1 {
                let _ = writeln!(out, " {}", series.name);
            }
            match chart.kind {
                ChartKind::Bar => self.render_bars(&mut out, series, '█'),
                ChartKind::Area => self.render_bars(&mut out, series, '▓'),
                ChartKind::Line => self.render_bars(&mut out, series, '─'),
                ChartKind::Pie => self.render_pie(&mut out, series),
            }
            render_tooltips(&mut out, series);
        }

        out
    }
}

fn render_tooltips(out: &mut String, series: &Series) {
    for point in &series.points {
        if let Some(full_name) = &point.detail {
            let lines = tooltip_lines(full_name, &[(series.name.as_str(), point.value)]);
            let _ = writeln!(out, "  {} = {}", point.label, lines.join(", "));
        }
    }
}

fn label_width(points: &[SeriesPoint]) -> usize {
    points.iter().map(|p| p.label.chars().count()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, value: f64) -> SeriesPoint {
        SeriesPoint::new(label, value)
    }

    #[test]
    fn test_bar_lengths_are_proportional() {
        let chart = Chart::new(
            "Procedimentos por Mês",
            ChartKind::Bar,
            vec![Series::new(
                "Quantidade",
                vec![point("Jan", 4.0), point("Fev", 2.0), point("Mar", 0.0)],
            )],
        );
        let text = TextChartRenderer::with_width(10).render(&chart);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Procedimentos por Mês");
        assert_eq!(lines[1], "  Jan │██████████ 4");
        assert_eq!(lines[2], "  Fev │█████ 2");
        assert_eq!(lines[3], "  Mar │ 0");
    }

    #[test]
    fn test_currency_series_values() {
        let chart = Chart::new(
            "Valor Faturado por Mês",
            ChartKind::Area,
            vec![Series::new("Valor (R$)", vec![point("Jan", 1234.5)])],
        );
        let text = TextChartRenderer::with_width(4).render(&chart);
        assert!(text.contains("R$\u{a0}1.234,50"));
    }

    #[test]
    fn test_pie_shares() {
        let chart = Chart::new(
            "Por Avaliador",
            ChartKind::Pie,
            vec![Series::new(
                "Quantidade",
                vec![point("Carlos", 3.0), point("Não informado", 1.0)],
            )],
        );
        let text = TextChartRenderer::default().render(&chart);
        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn test_empty_chart() {
        let series = vec![Series::new("Quantidade", Vec::new())];
        let chart = Chart::new("Vazio", ChartKind::Pie, series);
        let text = TextChartRenderer::default().render(&chart);
        assert!(text.contains("(sem dados)"));
    }

    #[test]
    fn test_multi_series_headers() {
        let chart = Chart::new(
            "Evolução",
            ChartKind::Line,
            vec![
                Series::new("Valor Faturado (R$)", vec![point("Jan", 10.0)]),
                Series::new("Procedimentos", vec![point("Jan", 1.0)]),
            ],
        );
        let text = TextChartRenderer::default().render(&chart);
        assert!(text.contains(" Valor Faturado (R$)\n"));
        assert!(text.contains(" Procedimentos\n"));
    }

    #[test]
    fn test_shortened_labels_get_full_name_tooltip() {
        let shortened = SeriesPoint {
            detail: Some("Artroscopia de joelho direito".to_string()),
            ..point("Artroscopia de ...", 2.0)
        };
        let chart = Chart::new(
            "Procedimentos Mais Comuns",
            ChartKind::Bar,
            vec![Series::new("Quantidade", vec![shortened, point("Consulta", 1.0)])],
        );
        let text = TextChartRenderer::with_width(4).render(&chart);

        let tooltip = "  Artroscopia de ... = Artroscopia de joelho direito, Quantidade: 2\n";
        assert!(text.contains(tooltip));
        assert!(!text.contains("Consulta = "));
    }
}
