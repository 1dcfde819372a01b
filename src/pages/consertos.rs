//! Main page: overview of every repair.

use serde::Serialize;

use crate::analyzer::aggregate::{defect_table, distribution, time_series, top_n, Field};
use crate::analyzer::compare::{build_comparisons, PeriodComparisons};
use crate::analyzer::filter::FilterSpec;
use crate::analyzer::kpi::{compute_kpis, RepairKpis};
use crate::analyzer::{TimeSeriesRow, ValueCount};
use crate::AppContext;

const TOP_MODELOS: usize = 50;
const TOP_CATEGORIAS: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsertosDashboard {
    pub kpis: RepairKpis,
    pub comparativos: PeriodComparisons,
    pub evolucao_mensal: Vec<TimeSeriesRow>,
    pub top_modelos: Vec<ValueCount>,
    pub top_categorias: Vec<ValueCount>,
    pub distribuicao_tipo: Vec<ValueCount>,
    pub tabela_defeitos: Option<Vec<ValueCount>>,
}

pub fn build(ctx: &AppContext, spec: &FilterSpec) -> ConsertosDashboard {
    let base = ctx.table.view();
    let view = base.filter(spec);
    ConsertosDashboard {
        kpis: compute_kpis(&view),
        comparativos: build_comparisons(&base, spec),
        evolucao_mensal: time_series(&view),
        top_modelos: top_n(&view, Field::Descricao, TOP_MODELOS),
        top_categorias: top_n(&view, Field::Categoria, TOP_CATEGORIAS),
        distribuicao_tipo: distribution(&view, Field::Tipo),
        tabela_defeitos: defect_table(&view),
    }
}
