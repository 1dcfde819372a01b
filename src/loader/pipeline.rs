use std::io::Read;

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::Datelike;

use crate::config::MESES;
use crate::error::AppError;
use crate::loader::columns::{validate_columns, ColumnMap};
use crate::loader::deserializers::{normalize_text, parse_br_date, parse_opt_f64};
use crate::loader::types::{Conserto, ConsertoRaw, LoadOutput, ParseWarning, RepairTable};

/// Parse the repair CSV export from `path`.
pub fn parse_csv(path: &str) -> Result<LoadOutput, AppError> {
    let file = std::fs::File::open(path)?;
    parse_csv_reader(std::io::BufReader::new(file))
}

/// Core CSV parsing logic — accepts any `Read` source, useful for tests.
pub fn parse_csv_reader<R: Read>(reader: R) -> Result<LoadOutput, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);
    let col_validation = validate_columns(&col_map)?;

    let mut records: Vec<Conserto> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        match result {
            Ok(record) => {
                let raw = record_to_raw(&col_map, &record);
                match normalize_conserto(&raw) {
                    Ok(c) => records.push(c),
                    Err(msg) => {
                        warnings.push(ParseWarning {
                            line: row_idx + 1, // +1 for the header row
                            message: msg,
                        });
                        skipped += 1;
                    }
                }
            }
            Err(err) => {
                warnings.push(ParseWarning {
                    line: row_idx + 1,
                    message: err.to_string(),
                });
                skipped += 1;
            }
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }

    Ok(LoadOutput {
        table: RepairTable::new(records),
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        warnings,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
    })
}

/// Parse the first worksheet of the Excel workbook at `path`, using the same
/// column vocabulary as the CSV export.
pub fn parse_xlsx(path: &str) -> Result<LoadOutput, AppError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(AppError::EmptyFile)??;
    parse_xlsx_range(&range)
}

/// Core worksheet logic — accepts an already-loaded cell range, useful for
/// tests.
pub fn parse_xlsx_range(range: &calamine::Range<Data>) -> Result<LoadOutput, AppError> {
    let mut rows = range.rows();
    let header_row = rows.next().ok_or(AppError::EmptyFile)?;
    let header_names: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let col_map = ColumnMap::from_names(&header_names);
    let col_validation = validate_columns(&col_map)?;

    let cell = |row: &[Data], col: &str| -> Option<String> {
        let i = col_map.index(col)?;
        let s = cell_to_string(row.get(i)?);
        if s.is_empty() {
            None
        } else {
            Some(s)
        }
    };

    let mut records: Vec<Conserto> = Vec::new();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    for row in rows {
        row_idx += 1;
        let raw = ConsertoRaw {
            dt_saida: cell(row, "Dt-Saida"),
            defeito: cell(row, "Defeito"),
            categoria: cell(row, "Categoria"),
            descricao: cell(row, "Descrição"),
            tipo: cell(row, "Tipo"),
            marca: cell(row, "Marca"),
            garantia: cell(row, "Garantia"),
            reincidencia: cell(row, "Reincidencia"),
            nome: cell(row, "Nome"),
            dias: cell(row, "Dias"),
        };
        match normalize_conserto(&raw) {
            Ok(c) => records.push(c),
            Err(msg) => {
                warnings.push(ParseWarning {
                    line: row_idx + 1,
                    message: msg,
                });
                skipped += 1;
            }
        }
    }

    if row_idx == 0 {
        return Err(AppError::EmptyFile);
    }

    Ok(LoadOutput {
        table: RepairTable::new(records),
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        warnings,
        detected_columns: col_validation.present,
        missing_optional_columns: col_validation.missing_optional,
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_default(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

type Loader<'a> = Box<dyn Fn() -> Result<LoadOutput, AppError> + 'a>;

/// Loads the repair table: CSV first, Excel workbook if the CSV fails, empty
/// table when both are exhausted. Never fails the caller.
pub fn load_table(csv_path: &str, xlsx_path: &str) -> LoadOutput {
    run_strategies(vec![
        ("csv", Box::new(|| parse_csv(csv_path))),
        ("xlsx", Box::new(|| parse_xlsx(xlsx_path))),
    ])
}

/// Tries each loader in order; the first success wins.
fn run_strategies(strategies: Vec<(&str, Loader)>) -> LoadOutput {
    for (source, load) in &strategies {
        match load() {
            Ok(out) => {
                if out.skipped_rows > 0 {
                    tracing::warn!(
                        source,
                        skipped = out.skipped_rows,
                        "linhas descartadas na carga"
                    );
                }
                return out;
            }
            Err(err) => {
                tracing::warn!(source, error = %err, "fonte de dados indisponível, tentando a próxima");
            }
        }
    }

    tracing::warn!("todas as fontes falharam, tabela vazia");
    LoadOutput::default()
}

fn record_to_raw(col_map: &ColumnMap, record: &csv::StringRecord) -> ConsertoRaw {
    let get = |col: &str| col_map.get(record, col).map(str::to_string);
    ConsertoRaw {
        dt_saida: get("Dt-Saida"),
        defeito: get("Defeito"),
        categoria: get("Categoria"),
        descricao: get("Descrição"),
        tipo: get("Tipo"),
        marca: get("Marca"),
        garantia: get("Garantia"),
        reincidencia: get("Reincidencia"),
        nome: get("Nome"),
        dias: get("Dias"),
    }
}

fn normalize_conserto(raw: &ConsertoRaw) -> Result<Conserto, String> {
    // Dt-Saida (required) — rows without a parseable exit date are dropped.
    let dt_str = raw.dt_saida.as_deref().unwrap_or("");
    let dt_saida =
        parse_br_date(dt_str).ok_or_else(|| format!("Dt-Saida inválida: {:?}", dt_str))?;

    let ano = dt_saida.year();
    let mes = dt_saida.month();
    let mes_nome = MESES[(mes - 1) as usize];

    let norm = |v: &Option<String>| v.as_deref().and_then(normalize_text);

    Ok(Conserto {
        dt_saida,
        ano,
        mes,
        mes_nome,
        defeito: norm(&raw.defeito),
        categoria: norm(&raw.categoria),
        descricao: norm(&raw.descricao),
        tipo: norm(&raw.tipo),
        marca: norm(&raw.marca),
        garantia: norm(&raw.garantia),
        reincidencia: norm(&raw.reincidencia),
        nome: raw.nome.as_deref().and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        }),
        dias: raw.dias.as_deref().and_then(parse_opt_f64),
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Full header for inline test CSV.
    const HDR: &str = "Dt-Saida,Defeito,Categoria,Descrição,Tipo,Marca,Garantia,Reincidencia,Nome,Dias";

    fn parse(csv: &str) -> LoadOutput {
        parse_csv_reader(csv.as_bytes()).unwrap()
    }

    fn parse_err(csv: &str) -> AppError {
        parse_csv_reader(csv.as_bytes()).unwrap_err()
    }

    #[test]
    fn test_date_parsing_and_derived_columns() {
        let csv = format!("{HDR}\n05/01/2024,Não liga,Informática,Notebook X1,Interno,Acer,Sim,Não,Ana,3");
        let out = parse(&csv);
        assert_eq!(out.table.len(), 1);
        let c = &out.table.records()[0];
        assert_eq!(c.dt_saida.to_string(), "2024-01-05");
        assert_eq!(c.ano, 2024);
        assert_eq!(c.mes, 1);
        assert_eq!(c.mes_nome, "Jan");
        assert_eq!(c.dias, Some(3.0));
    }

    #[test]
    fn test_string_normalization() {
        let csv = format!("{HDR}\n05/01/2024,NÃO LIGA,informática,NOTEBOOK x1,interno,ACER,sim,não,Ana,");
        let out = parse(&csv);
        let c = &out.table.records()[0];
        assert_eq!(c.defeito.as_deref(), Some("Não liga"));
        assert_eq!(c.categoria.as_deref(), Some("Informática"));
        assert_eq!(c.descricao.as_deref(), Some("Notebook x1"));
        assert_eq!(c.tipo.as_deref(), Some("Interno"));
        assert_eq!(c.garantia.as_deref(), Some("Sim"));
        assert!(c.dias.is_none());
    }

    #[test]
    fn test_invalid_date_rows_are_dropped() {
        let csv = format!(
            "{HDR}\n\
             05/01/2024,D,C,M,Interno,B,Sim,Não,Ana,1\n\
             not-a-date,D,C,M,Interno,B,Sim,Não,Ana,1\n\
             ,D,C,M,Interno,B,Sim,Não,Ana,1\n\
             10/02/2024,D,C,M,Externo,B,Não,Sim,,2"
        );
        let out = parse(&csv);
        assert_eq!(out.table.len(), 2);
        assert_eq!(out.skipped_rows, 2);
        assert_eq!(out.warnings.len(), 2);
        assert_eq!(out.total_rows_processed, 4);
    }

    #[test]
    fn test_missing_optional_columns_reported() {
        let csv = "Dt-Saida,Descrição\n05/01/2024,Notebook X1";
        let out = parse(csv);
        assert_eq!(out.table.len(), 1);
        assert!(out
            .missing_optional_columns
            .contains(&"Dias".to_string()));
        assert!(out.table.records()[0].dias.is_none());
        assert!(out.table.records()[0].categoria.is_none());
    }

    #[test]
    fn test_missing_required_column_error() {
        let csv = "Defeito,Categoria\nFoo,Bar";
        match parse_err(csv) {
            AppError::MissingColumns(cols) => {
                assert!(cols.contains(&"Dt-Saida".to_string()));
            }
            e => panic!("Expected MissingColumns, got {:?}", e),
        }
    }

    #[test]
    fn test_empty_file_error() {
        match parse_err("") {
            AppError::EmptyFile | AppError::MissingColumns(_) | AppError::Csv(_) => {}
            e => panic!("Expected EmptyFile or related error, got {:?}", e),
        }
    }

    #[test]
    fn test_comma_decimal_in_dias() {
        let csv = format!("{HDR}\n05/01/2024,D,C,M,Interno,B,Sim,Não,Ana,\"2,5\"");
        let out = parse(&csv);
        assert_eq!(out.table.records()[0].dias, Some(2.5));
    }

    /// Worksheet fixture mirroring the CSV export layout. `dias` is a float
    /// cell on purpose, to exercise numeric coercion.
    fn workbook_range() -> calamine::Range<Data> {
        let headers = [
            "Dt-Saida",
            "Defeito",
            "Categoria",
            "Descrição",
            "Tipo",
            "Marca",
            "Garantia",
            "Reincidencia",
            "Nome",
            "Dias",
        ];
        let mut range = calamine::Range::new((0, 0), (2, 9));
        for (col, name) in headers.iter().enumerate() {
            range.set_value((0, col as u32), Data::String(name.to_string()));
        }
        let row1 = [
            "05/01/2024",
            "Não liga",
            "Informática",
            "Notebook X1",
            "Interno",
            "Acer",
            "Sim",
            "Não",
            "Ana",
        ];
        for (col, value) in row1.iter().enumerate() {
            range.set_value((1, col as u32), Data::String(value.to_string()));
        }
        range.set_value((1, 9), Data::Float(3.0));
        range.set_value((2, 0), Data::String("data inválida".to_string()));
        range
    }

    #[test]
    fn test_xlsx_range_rows_and_cell_coercion() {
        let out = parse_xlsx_range(&workbook_range()).unwrap();
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.skipped_rows, 1);
        let c = &out.table.records()[0];
        assert_eq!(c.ano, 2024);
        assert_eq!(c.descricao.as_deref(), Some("Notebook x1"));
        assert_eq!(c.dias, Some(3.0));
    }

    #[test]
    fn test_xlsx_range_without_required_column() {
        let mut range = calamine::Range::new((0, 0), (1, 0));
        range.set_value((0, 0), Data::String("Defeito".to_string()));
        range.set_value((1, 0), Data::String("Não liga".to_string()));
        match parse_xlsx_range(&range).unwrap_err() {
            AppError::MissingColumns(cols) => {
                assert!(cols.contains(&"Dt-Saida".to_string()));
            }
            e => panic!("Expected MissingColumns, got {:?}", e),
        }
    }

    #[test]
    fn test_fallback_reaches_workbook_when_csv_fails() {
        let out = run_strategies(vec![
            ("csv", Box::new(|| parse_csv("/nonexistent/a.csv"))),
            ("xlsx", Box::new(|| parse_xlsx_range(&workbook_range()))),
        ]);
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.table.records()[0].descricao.as_deref(), Some("Notebook x1"));
    }

    #[test]
    fn test_first_successful_strategy_wins() {
        let csv = format!("{HDR}\n10/02/2024,D,C,Tv 42,Externo,B,Não,Não,,2");
        let out = run_strategies(vec![
            ("csv", Box::new(move || parse_csv_reader(csv.as_bytes()))),
            ("xlsx", Box::new(|| parse_xlsx_range(&workbook_range()))),
        ]);
        // The workbook is never consulted once the CSV parses.
        assert_eq!(out.table.records()[0].descricao.as_deref(), Some("Tv 42"));
    }

    #[test]
    fn test_load_table_degrades_to_empty() {
        let out = load_table("/nonexistent/a.csv", "/nonexistent/b.xlsx");
        assert!(out.table.is_empty());
        assert_eq!(out.skipped_rows, 0);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_load_table_prefers_csv() {
        let dir = std::env::temp_dir().join("dash_consertos_load_test");
        std::fs::create_dir_all(&dir).unwrap();
        let csv_path = dir.join("consertos.csv");
        std::fs::write(
            &csv_path,
            format!("{HDR}\n05/01/2024,D,C,M,Interno,B,Sim,Não,Ana,1"),
        )
        .unwrap();

        let out = load_table(csv_path.to_str().unwrap(), "/nonexistent/b.xlsx");
        assert_eq!(out.table.len(), 1);
    }
}
