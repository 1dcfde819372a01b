//! Analytics over the in-memory repair table: filtering, headline KPIs,
//! period comparisons and chart aggregations.

pub mod aggregate;
pub mod compare;
pub mod filter;
pub mod kpi;
pub mod stats;

pub use aggregate::{defect_table, distribution, time_series, top_n, Field, TimeSeriesRow, ValueCount};
pub use compare::{build_comparisons, ComparisonSet, Indicator, PeriodComparisons};
pub use filter::{FilterSpec, TableView};
pub use kpi::{compute_kpis, RepairKpis};
