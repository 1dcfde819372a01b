pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{load_table, parse_csv, parse_csv_reader, parse_xlsx};
pub use types::{Conserto, FilterOptions, LoadOutput, ParseWarning, RepairTable};
