use chrono::NaiveDate;
use serde::Serialize;

use crate::config::mes_nome;

/// One source row as read, before normalization. Every field optional:
/// the adapter decides what is salvageable.
#[derive(Debug, Clone, Default)]
pub struct ConsertoRaw {
    pub dt_saida: Option<String>,
    pub defeito: Option<String>,
    pub categoria: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<String>,
    pub marca: Option<String>,
    pub garantia: Option<String>,
    pub reincidencia: Option<String>,
    pub nome: Option<String>,
    pub dias: Option<String>,
}

/// One normalized repair ticket. `dt_saida` is guaranteed present; rows
/// without a parseable exit date are dropped at load time.
#[derive(Debug, Clone)]
pub struct Conserto {
    pub dt_saida: NaiveDate,
    pub ano: i32,
    pub mes: u32,
    pub mes_nome: &'static str,
    pub defeito: Option<String>,
    pub categoria: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<String>,
    pub marca: Option<String>,
    pub garantia: Option<String>,
    pub reincidencia: Option<String>,
    pub nome: Option<String>,
    pub dias: Option<f64>,
}

/// The immutable in-memory table. Built once by the loader, shared read-only;
/// every user interaction works on a borrowed view, never on the table itself.
#[derive(Debug, Default)]
pub struct RepairTable {
    records: Vec<Conserto>,
}

impl RepairTable {
    pub fn new(records: Vec<Conserto>) -> Self {
        RepairTable { records }
    }

    pub fn records(&self) -> &[Conserto] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Option lists the sidebar filters render, derived once from the table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub anos: Vec<i32>,
    pub meses: Vec<MonthOption>,
    pub categorias: Vec<String>,
    pub garantias: Vec<String>,
    pub tipos: Vec<String>,
    pub funcionarios: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOption {
    pub value: u32,
    pub label: &'static str,
}

impl FilterOptions {
    /// Builds the option lists: sorted unique years, the fixed month list,
    /// sorted unique categories/warranties/types, and technician names that
    /// appear on internal repairs only.
    pub fn from_table(table: &RepairTable) -> Self {
        let mut anos: Vec<i32> = table.records().iter().map(|c| c.ano).collect();
        anos.sort_unstable();
        anos.dedup();

        let meses = (1u32..=12)
            .filter_map(|m| mes_nome(m).map(|label| MonthOption { value: m, label }))
            .collect();

        let categorias = sorted_unique(table.records().iter().map(|c| c.categoria.as_deref()));
        let garantias = sorted_unique(table.records().iter().map(|c| c.garantia.as_deref()));
        let tipos = sorted_unique(table.records().iter().map(|c| c.tipo.as_deref()));
        let funcionarios = sorted_unique(
            table
                .records()
                .iter()
                .filter(|c| c.tipo.as_deref() == Some("Interno"))
                .map(|c| c.nome.as_deref()),
        );

        FilterOptions {
            anos,
            meses,
            categorias,
            garantias,
            tipos,
            funcionarios,
        }
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut out: Vec<String> = values.flatten().map(str::to_string).collect();
    out.sort();
    out.dedup();
    out
}

/// Output of one loader strategy — the table plus import accounting.
#[derive(Debug, Default)]
pub struct LoadOutput {
    pub table: RepairTable,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub warnings: Vec<ParseWarning>,
    pub detected_columns: Vec<String>,
    pub missing_optional_columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}
