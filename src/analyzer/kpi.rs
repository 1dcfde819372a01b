use serde::Serialize;

use crate::analyzer::aggregate::{value_counts, Field};
use crate::analyzer::filter::TableView;
use crate::analyzer::stats::{media, round1};

const MODELO_MAX_CHARS: usize = 25;

/// Headline indicators of the repairs dashboard, computed over the filtered
/// view. Numeric fields carry the raw value, `*_display` the card text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairKpis {
    pub total: usize,
    pub media_dias: f64,
    pub media_dias_display: String,
    pub modelo_critico: String,
    pub taxa_reincidencia: f64,
    pub taxa_reincidencia_display: String,
}

pub fn compute_kpis(view: &TableView<'_>) -> RepairKpis {
    RepairKpis {
        total: view.len(),
        media_dias: media_dias(view),
        media_dias_display: media_dias_display(view),
        modelo_critico: modelo_critico(view),
        taxa_reincidencia: taxa_reincidencia(view),
        taxa_reincidencia_display: taxa_reincidencia_display(view),
    }
}

/// Mean repair time in days over the rows that carry one, one decimal.
pub fn media_dias(view: &TableView<'_>) -> f64 {
    round1(media_dias_exact(view))
}

/// Unrounded mean, for delta arithmetic between periods.
pub(crate) fn media_dias_exact(view: &TableView<'_>) -> f64 {
    let dias: Vec<f64> = view.rows().iter().filter_map(|c| c.dias).collect();
    media(&dias)
}

fn media_dias_display(view: &TableView<'_>) -> String {
    let has_dias = view.rows().iter().any(|c| c.dias.is_some());
    if !has_dias {
        return "0 dias".to_string();
    }
    format!("{:.1} dias", media_dias(view))
}

/// Most frequent model description, truncated for the KPI card. Ties resolve
/// to the value first seen in the view; an empty window shows "-".
pub fn modelo_critico(view: &TableView<'_>) -> String {
    match value_counts(view, Field::Descricao).into_iter().next() {
        Some(top) => truncate_label(&top.valor),
        None => "-".to_string(),
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MODELO_MAX_CHARS {
        return label.to_string();
    }
    let cut: String = label.chars().take(MODELO_MAX_CHARS).collect();
    format!("{cut}...")
}

/// Share of rows flagged as a repeat repair, in percent with one decimal.
pub fn taxa_reincidencia(view: &TableView<'_>) -> f64 {
    round1(taxa_reincidencia_exact(view))
}

/// Unrounded rate, for delta arithmetic between periods.
pub(crate) fn taxa_reincidencia_exact(view: &TableView<'_>) -> f64 {
    if view.is_empty() {
        return 0.0;
    }
    let reincidentes = view
        .rows()
        .iter()
        .filter(|c| c.reincidencia.as_deref() == Some("Sim"))
        .count();
    reincidentes as f64 / view.len() as f64 * 100.0
}

fn taxa_reincidencia_display(view: &TableView<'_>) -> String {
    if view.is_empty() {
        return "0%".to_string();
    }
    format!("{:.1}%", taxa_reincidencia(view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::filter::FilterSpec;
    use crate::loader::test_support::conserto;
    use crate::loader::types::RepairTable;

    fn table() -> RepairTable {
        let mut rows = vec![
            conserto("05/01/2023", "Notebook x1", "Informática", "Interno", Some("Ana")),
            conserto("09/01/2023", "Notebook x1", "Informática", "Interno", Some("Ana")),
            conserto("15/03/2023", "Tv 42", "Eletrônicos", "Externo", None),
        ];
        rows[0].dias = Some(10.0);
        rows[1].dias = Some(5.0);
        rows[2].reincidencia = Some("Sim".to_string());
        RepairTable::new(rows)
    }

    #[test]
    fn test_total_counts_view_rows() {
        let t = table();
        assert_eq!(compute_kpis(&t.view()).total, 3);
    }

    #[test]
    fn test_media_dias_ignores_missing_values() {
        let t = table();
        let kpis = compute_kpis(&t.view());
        // (10 + 5) / 2, the third row has no Dias.
        assert_eq!(kpis.media_dias, 7.5);
        assert_eq!(kpis.media_dias_display, "7.5 dias");
    }

    #[test]
    fn test_media_dias_without_column_shows_zero() {
        let rows = vec![conserto("05/01/2023", "Tv 42", "Eletrônicos", "Externo", None)];
        let t = RepairTable::new(rows);
        let kpis = compute_kpis(&t.view());
        assert_eq!(kpis.media_dias, 0.0);
        assert_eq!(kpis.media_dias_display, "0 dias");
    }

    #[test]
    fn test_modelo_critico_most_frequent() {
        let t = table();
        assert_eq!(compute_kpis(&t.view()).modelo_critico, "Notebook x1");
    }

    #[test]
    fn test_modelo_critico_truncated_at_25_chars() {
        let longo = "Refrigerador duplex frost free 400 litros";
        let rows = vec![conserto("05/01/2023", longo, "Eletrodomésticos", "Externo", None)];
        let t = RepairTable::new(rows);
        let kpis = compute_kpis(&t.view());
        assert_eq!(kpis.modelo_critico, "Refrigerador duplex frost...");
        assert_eq!(kpis.modelo_critico.chars().count(), 28);
    }

    #[test]
    fn test_modelo_critico_tie_keeps_first_seen() {
        let rows = vec![
            conserto("05/01/2023", "Tv 42", "Eletrônicos", "Externo", None),
            conserto("06/01/2023", "Notebook x1", "Informática", "Interno", Some("Ana")),
        ];
        let t = RepairTable::new(rows);
        assert_eq!(compute_kpis(&t.view()).modelo_critico, "Tv 42");
    }

    #[test]
    fn test_taxa_reincidencia_single_repeat_row() {
        let mut row = conserto("05/01/2023", "Tv 42", "Eletrônicos", "Externo", None);
        row.reincidencia = Some("Sim".to_string());
        let t = RepairTable::new(vec![row]);
        let kpis = compute_kpis(&t.view());
        assert_eq!(kpis.taxa_reincidencia, 100.0);
        assert_eq!(kpis.taxa_reincidencia_display, "100.0%");
    }

    #[test]
    fn test_taxa_reincidencia_over_all_rows() {
        let t = table();
        let kpis = compute_kpis(&t.view());
        assert_eq!(kpis.taxa_reincidencia, 33.3);
    }

    #[test]
    fn test_empty_window_sentinels() {
        let t = table();
        let spec = FilterSpec {
            ano: Some(1999),
            ..Default::default()
        };
        let kpis = compute_kpis(&t.view().filter(&spec));
        assert_eq!(kpis.total, 0);
        assert_eq!(kpis.media_dias_display, "0 dias");
        assert_eq!(kpis.modelo_critico, "-");
        assert_eq!(kpis.taxa_reincidencia_display, "0%");
    }
}
