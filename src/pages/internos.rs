//! Internal-repairs page, restricted to `tipo == "Interno"`.

use serde::Serialize;

use crate::analyzer::aggregate::{distribution, time_series, top_n, Field};
use crate::analyzer::compare::{build_comparisons, PeriodComparisons};
use crate::analyzer::filter::FilterSpec;
use crate::analyzer::kpi::{compute_kpis, RepairKpis};
use crate::analyzer::{TimeSeriesRow, ValueCount};
use crate::AppContext;

const TOP_CATEGORIAS: usize = 15;
const TOP_MODELOS: usize = 20;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternosDashboard {
    pub kpis: RepairKpis,
    pub comparativos: PeriodComparisons,
    pub evolucao_mensal: Vec<TimeSeriesRow>,
    pub distribuicao_funcionarios: Vec<ValueCount>,
    pub top_categorias: Vec<ValueCount>,
    pub top_modelos: Vec<ValueCount>,
}

pub fn build(ctx: &AppContext, spec: &FilterSpec) -> InternosDashboard {
    let base = ctx.table.internal_view();
    let view = base.filter(spec);
    InternosDashboard {
        kpis: compute_kpis(&view),
        comparativos: build_comparisons(&base, spec),
        evolucao_mensal: time_series(&view),
        distribuicao_funcionarios: distribution(&view, Field::Funcionario),
        top_categorias: top_n(&view, Field::Categoria, TOP_CATEGORIAS),
        top_modelos: top_n(&view, Field::Descricao, TOP_MODELOS),
    }
}
