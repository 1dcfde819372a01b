use serde::Serialize;

use crate::analyzer::filter::{FilterSpec, TableView};
use crate::analyzer::kpi::{media_dias_exact, taxa_reincidencia_exact};

/// Metric a period indicator tracks. Favorability is declared here, not
/// inferred from the sign: every current metric improves when it goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    Total,
    MediaDias,
    TaxaReincidencia,
}

impl Metric {
    fn lower_is_better(self) -> bool {
        match self {
            Metric::Total => true,
            Metric::MediaDias => true,
            Metric::TaxaReincidencia => true,
        }
    }

    fn format(self, value: f64) -> String {
        match self {
            Metric::Total => format!("{}", value as i64),
            Metric::MediaDias => format!("{value:.1}"),
            Metric::TaxaReincidencia => format!("{value:.1}%"),
        }
    }
}

/// One variation badge next to a KPI card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub delta: f64,
    pub seta: &'static str,
    pub cor: &'static str,
    pub anterior: String,
}

/// Indicators for the three headline metrics against one previous period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSet {
    pub total: Indicator,
    pub media_dias: Indicator,
    pub taxa_reincidencia: Indicator,
}

/// Month-over-month and year-over-year comparisons for the current filter.
/// A comparison that is not applicable, or whose previous window holds no
/// rows, is absent rather than zeroed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparisons {
    pub mom: Option<ComparisonSet>,
    pub yoy: Option<ComparisonSet>,
}

/// Unrounded metric values of one window. Rounding happens only when the
/// previous value is formatted for display.
struct MetricSnapshot {
    total: usize,
    media_dias: f64,
    taxa_reincidencia: f64,
}

fn snapshot(view: &TableView<'_>) -> MetricSnapshot {
    MetricSnapshot {
        total: view.len(),
        media_dias: media_dias_exact(view),
        taxa_reincidencia: taxa_reincidencia_exact(view),
    }
}

pub fn build_comparisons(base: &TableView<'_>, spec: &FilterSpec) -> PeriodComparisons {
    let current = snapshot(&base.filter(spec));
    PeriodComparisons {
        mom: previous_month_spec(spec).and_then(|prev| compare_against(base, &current, &prev)),
        yoy: previous_year_spec(spec).and_then(|prev| compare_against(base, &current, &prev)),
    }
}

/// Filter for the month before the single selected one. December of the
/// previous year when January is selected; without a selected year the
/// wrapped comparison stays unconstrained by year.
fn previous_month_spec(spec: &FilterSpec) -> Option<FilterSpec> {
    let mes = spec.single_month()?;
    let mut prev = spec.clone();
    if mes == 1 {
        prev.meses = vec![12];
        prev.ano = spec.ano.map(|ano| ano - 1);
    } else {
        prev.meses = vec![mes - 1];
    }
    Some(prev)
}

/// Filter for the year before the selected one. The month constraint carries
/// over only when exactly one month is selected.
fn previous_year_spec(spec: &FilterSpec) -> Option<FilterSpec> {
    let ano = spec.ano?;
    let mut prev = spec.clone();
    prev.ano = Some(ano - 1);
    if spec.single_month().is_none() {
        prev.meses = Vec::new();
    }
    Some(prev)
}

fn compare_against(
    base: &TableView<'_>,
    current: &MetricSnapshot,
    prev_spec: &FilterSpec,
) -> Option<ComparisonSet> {
    let prev_view = base.filter(prev_spec);
    if prev_view.is_empty() {
        return None;
    }
    let previous = snapshot(&prev_view);
    Some(ComparisonSet {
        total: indicator(
            Metric::Total,
            current.total as f64,
            previous.total as f64,
        ),
        media_dias: indicator(Metric::MediaDias, current.media_dias, previous.media_dias),
        taxa_reincidencia: indicator(
            Metric::TaxaReincidencia,
            current.taxa_reincidencia,
            previous.taxa_reincidencia,
        ),
    })
}

fn indicator(metric: Metric, current: f64, previous: f64) -> Indicator {
    let delta = current - previous;
    let increase = delta > 0.0;
    let favorable = increase != metric.lower_is_better();
    Indicator {
        delta,
        seta: if increase { "▲" } else { "▼" },
        cor: if favorable { "green" } else { "red" },
        anterior: metric.format(previous),
    }
}
