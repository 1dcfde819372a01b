//! KPIs and distributions for the activities page (time records).

use std::collections::HashMap;
use std::collections::HashSet;

use serde::Serialize;

use crate::analyzer::stats::round2;
use crate::remote::types::TimeRecord;

/// Headline indicators of the activities page, over the valid records only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityKpis {
    pub total_registros: usize,
    pub total_horas: f64,
    pub qtd_funcionarios: usize,
    pub qtd_funcoes: usize,
}

/// Accumulated hours for one grouping value (function or employee).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursByGroup {
    pub valor: String,
    pub horas: f64,
}

pub fn calculate_kpis(records: &[TimeRecord]) -> ActivityKpis {
    let valid: Vec<&TimeRecord> = records.iter().filter(|r| r.is_valid()).collect();

    let total_horas: f64 = valid.iter().map(|r| r.horas()).sum();
    let funcionarios: HashSet<&str> = valid
        .iter()
        .filter_map(|r| r.employee_name.as_deref())
        .collect();
    let funcoes: HashSet<&str> = valid
        .iter()
        .filter_map(|r| r.function_name.as_deref())
        .collect();

    ActivityKpis {
        total_registros: valid.len(),
        total_horas: round2(total_horas),
        qtd_funcionarios: funcionarios.len(),
        qtd_funcoes: funcoes.len(),
    }
}

pub fn get_distribuicao_por_funcao(records: &[TimeRecord]) -> Vec<HoursByGroup> {
    hours_by(records, |r| r.function_name.as_deref())
}

pub fn get_distribuicao_por_funcionario(records: &[TimeRecord]) -> Vec<HoursByGroup> {
    hours_by(records, |r| r.employee_name.as_deref())
}

/// Hour totals per group over the valid records, descending. Ties keep the
/// arrival order of the records.
fn hours_by<'a, F>(records: &'a [TimeRecord], key: F) -> Vec<HoursByGroup>
where
    F: Fn(&'a TimeRecord) -> Option<&'a str>,
{
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for (idx, record) in records.iter().filter(|r| r.is_valid()).enumerate() {
        if let Some(group) = key(record) {
            let entry = totals.entry(group).or_insert((0.0, idx));
            entry.0 += record.horas();
        }
    }

    let mut groups: Vec<(&str, f64, usize)> = totals
        .into_iter()
        .map(|(g, (horas, first))| (g, horas, first))
        .collect();
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.2.cmp(&b.2)));

    groups
        .into_iter()
        .map(|(valor, horas, _)| HoursByGroup {
            valor: valor.to_string(),
            horas: round2(horas),
        })
        .collect()
}
