use serde::{Deserialize, Serialize};

use crate::loader::types::{Conserto, RepairTable};

/// Declarative filter selection, one field per sidebar control.
///
/// `None` on a single-select means "all"; an empty multi-select list means
/// "no restriction", never "match nothing".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Case-insensitive substring match on the model description.
    pub busca: Option<String>,
    pub ano: Option<i32>,
    pub meses: Vec<u32>,
    pub categorias: Vec<String>,
    pub garantia: Option<String>,
    pub tipo: Option<String>,
    /// Technician names; only set by the internal-repairs page.
    pub funcionarios: Vec<String>,
}

impl FilterSpec {
    /// True when the month multi-select holds exactly one month.
    pub fn single_month(&self) -> Option<u32> {
        match self.meses.as_slice() {
            [m] => Some(*m),
            _ => None,
        }
    }
}

/// A filtered, non-owning projection of the table. Produced by one filter
/// pass; the underlying table is never mutated.
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    rows: Vec<&'a Conserto>,
}

impl RepairTable {
    /// View over every row, in table order.
    pub fn view(&self) -> TableView<'_> {
        TableView {
            rows: self.records().iter().collect(),
        }
    }

    /// Entry point for the internal-repairs page: only `tipo == "Interno"`.
    pub fn internal_view(&self) -> TableView<'_> {
        TableView {
            rows: self
                .records()
                .iter()
                .filter(|c| c.tipo.as_deref() == Some("Interno"))
                .collect(),
        }
    }
}

impl<'a> TableView<'a> {
    pub fn rows(&self) -> &[&'a Conserto] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Applies every active predicate of `spec`, ANDed, in a fixed order:
    /// busca → ano → meses → categorias → garantia → tipo → funcionarios.
    /// Pure narrowing: reapplying the same spec to the result is a no-op.
    pub fn filter(&self, spec: &FilterSpec) -> TableView<'a> {
        let busca_lower = spec
            .busca
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|c| {
                if let Some(ref needle) = busca_lower {
                    // Null descriptions never match a search.
                    match c.descricao.as_deref() {
                        Some(d) => {
                            if !d.to_lowercase().contains(needle.as_str()) {
                                return false;
                            }
                        }
                        None => return false,
                    }
                }
                if let Some(ano) = spec.ano {
                    if c.ano != ano {
                        return false;
                    }
                }
                if !spec.meses.is_empty() && !spec.meses.contains(&c.mes) {
                    return false;
                }
                if !spec.categorias.is_empty() {
                    match c.categoria.as_deref() {
                        Some(cat) if spec.categorias.iter().any(|v| v == cat) => {}
                        _ => return false,
                    }
                }
                if let Some(ref g) = spec.garantia {
                    if c.garantia.as_deref() != Some(g.as_str()) {
                        return false;
                    }
                }
                if let Some(ref t) = spec.tipo {
                    if c.tipo.as_deref() != Some(t.as_str()) {
                        return false;
                    }
                }
                if !spec.funcionarios.is_empty() {
                    match c.nome.as_deref() {
                        Some(n) if spec.funcionarios.iter().any(|v| v == n) => {}
                        _ => return false,
                    }
                }
                true
            })
            .collect();

        TableView { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::test_support::conserto;

    fn sample_table() -> RepairTable {
        let mut r1 = conserto("05/01/2023", "Notebook acer x1", "Informática", "Interno", Some("Ana"));
        r1.garantia = Some("Sim".to_string());
        let mut r2 = conserto("10/03/2023", "Tv samsung 42", "Eletrônicos", "Externo", None);
        r2.garantia = Some("Não".to_string());
        let mut r3 = conserto("20/03/2024", "Notebook dell g5", "Informática", "Interno", Some("Bruno"));
        r3.garantia = Some("Sim".to_string());
        let mut r4 = conserto("28/12/2024", "Micro-ondas", "Eletrodomésticos", "Externo", None);
        r4.descricao = None; // null description
        RepairTable::new(vec![r1, r2, r3, r4])
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let table = sample_table();
        let view = table.view().filter(&FilterSpec::default());
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_year_filter() {
        let table = sample_table();
        let spec = FilterSpec {
            ano: Some(2023),
            ..Default::default()
        };
        let view = table.view().filter(&spec);
        assert_eq!(view.len(), 2);
        assert!(view.rows().iter().all(|c| c.ano == 2023));
    }

    #[test]
    fn test_month_membership() {
        let table = sample_table();
        let spec = FilterSpec {
            meses: vec![3],
            ..Default::default()
        };
        let view = table.view().filter(&spec);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_empty_multiselect_means_no_filter() {
        let table = sample_table();
        let spec = FilterSpec {
            meses: vec![],
            categorias: vec![],
            funcionarios: vec![],
            ..Default::default()
        };
        assert_eq!(table.view().filter(&spec).len(), 4);
    }

    #[test]
    fn test_search_case_insensitive() {
        let table = sample_table();
        let spec = FilterSpec {
            busca: Some("NOTEBOOK".to_string()),
            ..Default::default()
        };
        let view = table.view().filter(&spec);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_search_null_description_never_matches() {
        let table = sample_table();
        let spec = FilterSpec {
            busca: Some("micro".to_string()),
            ..Default::default()
        };
        // Row 4 has descricao = None even though the record exists.
        assert_eq!(table.view().filter(&spec).len(), 0);
    }

    #[test]
    fn test_predicates_and_together() {
        let table = sample_table();
        let spec = FilterSpec {
            busca: Some("notebook".to_string()),
            ano: Some(2024),
            categorias: vec!["Informática".to_string()],
            garantia: Some("Sim".to_string()),
            tipo: Some("Interno".to_string()),
            ..Default::default()
        };
        let view = table.view().filter(&spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].nome.as_deref(), Some("Bruno"));
    }

    #[test]
    fn test_employee_filter() {
        let table = sample_table();
        let spec = FilterSpec {
            funcionarios: vec!["Ana".to_string()],
            ..Default::default()
        };
        let view = table.internal_view().filter(&spec);
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].nome.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_internal_view_prefilters_tipo() {
        let table = sample_table();
        let view = table.internal_view();
        assert_eq!(view.len(), 2);
        assert!(view
            .rows()
            .iter()
            .all(|c| c.tipo.as_deref() == Some("Interno")));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let table = sample_table();
        let spec = FilterSpec {
            ano: Some(2023),
            meses: vec![1, 3],
            ..Default::default()
        };
        let once = table.view().filter(&spec);
        let twice = once.filter(&spec);
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.rows().iter().zip(twice.rows()) {
            assert!(std::ptr::eq(*a, *b));
        }
    }

    #[test]
    fn test_empty_result_is_valid() {
        let table = sample_table();
        let spec = FilterSpec {
            ano: Some(1999),
            ..Default::default()
        };
        let view = table.view().filter(&spec);
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }

    #[test]
    fn test_source_table_untouched() {
        let table = sample_table();
        let before = table.len();
        let _ = table.view().filter(&FilterSpec {
            ano: Some(2023),
            ..Default::default()
        });
        assert_eq!(table.len(), before);
    }

    #[test]
    fn test_single_month() {
        let spec = FilterSpec {
            meses: vec![3],
            ..Default::default()
        };
        assert_eq!(spec.single_month(), Some(3));
        let spec = FilterSpec {
            meses: vec![3, 4],
            ..Default::default()
        };
        assert_eq!(spec.single_month(), None);
        assert_eq!(FilterSpec::default().single_month(), None);
    }
}
