//! Activities page, fed by the remote time-record store.

use serde::{Deserialize, Serialize};

use crate::remote::kpis::{
    calculate_kpis, get_distribuicao_por_funcao, get_distribuicao_por_funcionario, ActivityKpis,
    HoursByGroup,
};
use crate::remote::TimeRecordSource;

/// Filters of the activities page. Empty lists and absent dates do not
/// restrict the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AtividadesFilter {
    pub funcionarios: Vec<String>,
    pub funcoes: Vec<String>,
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtividadesDashboard {
    pub kpis: ActivityKpis,
    pub horas_por_funcao: Vec<HoursByGroup>,
    pub horas_por_funcionario: Vec<HoursByGroup>,
    /// Sidebar filter options, from the lookup tables.
    pub opcoes_funcionarios: Vec<String>,
    pub opcoes_funcoes: Vec<String>,
}

pub fn build<S: TimeRecordSource>(source: &S, filter: &AtividadesFilter) -> AtividadesDashboard {
    let records = source.query_time_records(
        &filter.funcionarios,
        &filter.funcoes,
        filter.data_inicio.as_deref(),
        filter.data_fim.as_deref(),
    );
    AtividadesDashboard {
        kpis: calculate_kpis(&records),
        horas_por_funcao: get_distribuicao_por_funcao(&records),
        horas_por_funcionario: get_distribuicao_por_funcionario(&records),
        opcoes_funcionarios: source.list_employees().into_iter().map(|e| e.name).collect(),
        opcoes_funcoes: source.list_functions().into_iter().map(|f| f.name).collect(),
    }
}
