use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Serialize;

use crate::analyzer::filter::TableView;
use crate::loader::types::Conserto;

/// Categorical column an aggregation can group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Defeito,
    Categoria,
    Descricao,
    Tipo,
    Marca,
    Funcionario,
}

impl Field {
    fn get<'a>(&self, c: &'a Conserto) -> Option<&'a str> {
        match self {
            Field::Defeito => c.defeito.as_deref(),
            Field::Categoria => c.categoria.as_deref(),
            Field::Descricao => c.descricao.as_deref(),
            Field::Tipo => c.tipo.as_deref(),
            Field::Marca => c.marca.as_deref(),
            Field::Funcionario => c.nome.as_deref(),
        }
    }
}

/// One (value, count) pair of a categorical breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueCount {
    pub valor: String,
    pub quantidade: usize,
}

/// One point of the monthly evolution chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesRow {
    pub ano: i32,
    pub mes: u32,
    pub mes_nome: &'static str,
    pub quantidade: usize,
}

/// Counts per distinct value of `field`, descending by count. Ties keep the
/// value first seen in the view, so the ranking is deterministic.
pub fn value_counts(view: &TableView<'_>, field: Field) -> Vec<ValueCount> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, c) in view.rows().iter().enumerate() {
        if let Some(v) = field.get(c) {
            let entry = counts.entry(v).or_insert((0, idx));
            entry.0 += 1;
        }
    }

    let mut pairs: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(v, (count, first))| (v, count, first))
        .collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    pairs
        .into_iter()
        .map(|(valor, quantidade, _)| ValueCount {
            valor: valor.to_string(),
            quantidade,
        })
        .collect()
}

/// Repair volume grouped by (ano, mes), ascending — never by label text.
pub fn time_series(view: &TableView<'_>) -> Vec<TimeSeriesRow> {
    let mut by_month: BTreeMap<(i32, u32), (&'static str, usize)> = BTreeMap::new();
    for c in view.rows() {
        let entry = by_month.entry((c.ano, c.mes)).or_insert((c.mes_nome, 0));
        entry.1 += 1;
    }

    by_month
        .into_iter()
        .map(|((ano, mes), (mes_nome, quantidade))| TimeSeriesRow {
            ano,
            mes,
            mes_nome,
            quantidade,
        })
        .collect()
}

/// The `n` most frequent values of `field`, re-sorted ascending by count so a
/// horizontal bar chart renders the largest bar at the top.
pub fn top_n(view: &TableView<'_>, field: Field, n: usize) -> Vec<ValueCount> {
    let mut top: Vec<ValueCount> = value_counts(view, field).into_iter().take(n).collect();
    top.reverse();
    top
}

/// Full categorical breakdown for proportional (pie/donut) rendering.
pub fn distribution(view: &TableView<'_>, field: Field) -> Vec<ValueCount> {
    value_counts(view, field)
}

/// Defect frequency table, descending. `None` is the explicit empty-state
/// marker the presentation layer renders instead of an empty table.
pub fn defect_table(view: &TableView<'_>) -> Option<Vec<ValueCount>> {
    if view.is_empty() {
        return None;
    }
    Some(value_counts(view, Field::Defeito))
}
