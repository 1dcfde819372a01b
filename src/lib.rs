//! Core of the repair-service dashboard: history load (CSV with Excel
//! fallback), declarative filters, KPIs, period comparisons and chart
//! aggregations, plus the activities page backed by a remote time-record
//! store.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod loader;
pub mod pages;
pub mod remote;

pub use analyzer::{FilterSpec, RepairKpis, TableView};
pub use error::AppError;
pub use loader::types::{FilterOptions, RepairTable};

/// Application state: the immutable repair table and the filter options
/// derived from it. No module-level globals.
#[derive(Debug)]
pub struct AppContext {
    pub table: RepairTable,
    pub options: FilterOptions,
}

impl AppContext {
    pub fn new(table: RepairTable) -> Self {
        let options = FilterOptions::from_table(&table);
        AppContext { table, options }
    }

    /// Loads the table from the local sources (CSV, then Excel, then empty
    /// table) and builds the context.
    pub fn from_sources(csv_path: &str, xlsx_path: &str) -> Self {
        let output = loader::pipeline::load_table(csv_path, xlsx_path);
        AppContext::new(output.table)
    }

    /// Same, using the default export file names from the working directory.
    pub fn from_default_sources() -> Self {
        AppContext::from_sources(config::NOME_ARQUIVO, config::NOME_ARQUIVO_EXCEL)
    }
}
