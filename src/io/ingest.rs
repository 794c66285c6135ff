//! Stock spreadsheet ingest and validation.
//!
//! This module turns an uploaded `.csv` or `.xlsx` file into a `StockTable`.
//!
//! Design goals:
//! - **Declared format**: the file extension picks the parser, content is never sniffed
//! - **Strict schema**: all four required columns must be present (exit code 2)
//! - **All or nothing**: one bad cell rejects the whole file, no partial table
//! - **Pass-through**: extra columns and column order are preserved
//! - **Separation of concerns**: no classification logic here

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, ExcelDateTime, Reader, Xlsx, open_workbook_from_rs};
use csv::StringRecord;

use crate::domain::{ColumnLayout, ColumnSchema, FileFormat, StockRecord, StockTable};
use crate::error::{LoadError, ParseCause};

/// Load a stock table from a file, choosing the parser from its extension.
pub fn load_table_file(path: &Path, schema: &ColumnSchema) -> Result<StockTable, LoadError> {
    let format = FileFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = load_table(&bytes, format, schema)?;
    tracing::info!(
        path = %path.display(),
        %format,
        rows = table.len(),
        columns = table.columns().len(),
        "loaded stock table"
    );
    Ok(table)
}

/// Parse an in-memory upload in the declared format.
pub fn load_table(bytes: &[u8], format: FileFormat, schema: &ColumnSchema) -> Result<StockTable, LoadError> {
    let sheet = match format {
        FileFormat::Csv => read_csv(bytes)?,
        FileFormat::Xlsx => read_xlsx(bytes)?,
    };
    build_table(sheet, format, schema)
}

/// Header + raw rows, before schema validation.
struct RawSheet {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

struct RawRow {
    /// 1-based line (CSV) or spreadsheet row number.
    line: usize,
    cells: Vec<Cell>,
}

/// A cell as read from the sheet. Text is kept verbatim; only the required
/// columns are trimmed, when they are parsed.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn from_text(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(v) => Cell::Number(*v as f64),
            Data::Float(v) => Cell::Number(*v),
            Data::String(s) => Cell::from_text(s),
            Data::Bool(b) => Cell::Text(b.to_string()),
            Data::DateTime(dt) => date_cell(dt),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
            Data::Error(e) => Cell::Text(format!("#{e:?}")),
        }
    }

    /// Trimmed text of a required cell, `None` when it is blank.
    fn required_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim()).filter(|t| !t.is_empty()).map(str::to_string),
            Cell::Number(v) => Some(v.to_string()),
        }
    }

    fn is_blank(&self) -> bool {
        self.required_text().is_none()
    }

    fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => v.to_string(),
        }
    }
}

/// Date-formatted cells read as ISO text, not as serial day numbers.
fn date_cell(dt: &ExcelDateTime) -> Cell {
    if dt.is_duration() {
        return Cell::Number(dt.as_f64());
    }
    match dt.as_datetime() {
        Some(value) if value.time() == chrono::NaiveTime::MIN => Cell::Text(value.format("%Y-%m-%d").to_string()),
        Some(value) => Cell::Text(value.format("%Y-%m-%d %H:%M:%S").to_string()),
        None => Cell::Number(dt.as_f64()),
    }
}

fn read_csv(bytes: &[u8]) -> Result<RawSheet, LoadError> {
    // Only the header is trimmed; extra columns pass through byte for byte.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::parse(FileFormat::Csv, e))?
        .iter()
        .map(normalize_header_name)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::parse(FileFormat::Csv, ParseCause::MissingHeader));
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record: StringRecord = result.map_err(|e| LoadError::parse(FileFormat::Csv, e))?;
        // +2: records start on the line after the header, and lines are 1-based.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        rows.push(RawRow {
            line,
            cells: record.iter().map(Cell::from_text).collect(),
        });
    }

    Ok(RawSheet { headers, rows })
}

fn read_xlsx(bytes: &[u8]) -> Result<RawSheet, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| LoadError::parse(FileFormat::Xlsx, e))?;

    // Only the first worksheet is read.
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::parse(FileFormat::Xlsx, ParseCause::EmptyWorkbook))?
        .map_err(|e| LoadError::parse(FileFormat::Xlsx, e))?;

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut sheet_rows = range.rows();

    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| LoadError::parse(FileFormat::Xlsx, ParseCause::MissingHeader))?
        .iter()
        .map(|d| normalize_header_name(&Cell::from_data(d).to_text()))
        .collect();

    let mut rows = Vec::new();
    for (idx, cells) in sheet_rows.enumerate() {
        let cells: Vec<Cell> = cells.iter().map(Cell::from_data).collect();
        if cells.iter().all(Cell::is_blank) {
            continue;
        }
        rows.push(RawRow {
            // header is on `first_row + 1` (1-based), data follows it
            line: first_row + idx + 2,
            cells,
        });
    }

    Ok(RawSheet { headers, rows })
}

fn build_table(sheet: RawSheet, format: FileFormat, schema: &ColumnSchema) -> Result<StockTable, LoadError> {
    let mut table = StockTable::with_columns(sheet.headers, schema).map_err(|missing| LoadError::Schema {
        required: schema.names().into_iter().map(str::to_string).collect(),
        missing,
    })?;

    let layout = table.layout();
    let columns = table.columns().to_vec();
    let extra_indices = table.extra_column_indices();

    for row in sheet.rows {
        let record = parse_record(&row.cells, &layout, &columns).map_err(|err| {
            LoadError::parse(
                format,
                ParseCause::Cell {
                    line: row.line,
                    column: err.column,
                    message: err.message,
                },
            )
        })?;

        let extras = extra_indices
            .iter()
            .map(|&idx| row.cells.get(idx).map(Cell::to_text).unwrap_or_default())
            .collect();
        table.push_row(record, extras);
    }

    Ok(table)
}

struct CellError {
    column: String,
    message: String,
}

fn parse_record(cells: &[Cell], layout: &ColumnLayout, columns: &[String]) -> Result<StockRecord, CellError> {
    let Some(ingredient) = cells.get(layout.ingredient).and_then(Cell::required_text) else {
        return Err(CellError {
            column: columns[layout.ingredient].clone(),
            message: "missing value".to_string(),
        });
    };

    Ok(StockRecord {
        ingredient,
        current_quantity: get_quantity(cells, layout.current_quantity, columns)?,
        average_daily_consumption: get_quantity(cells, layout.average_daily_consumption, columns)?,
        minimum_threshold: get_quantity(cells, layout.minimum_threshold, columns)?,
    })
}

fn get_quantity(cells: &[Cell], idx: usize, columns: &[String]) -> Result<f64, CellError> {
    let fail = |message: String| CellError {
        column: columns[idx].clone(),
        message,
    };

    let value = match cells.get(idx) {
        Some(Cell::Number(v)) => *v,
        Some(cell) => match cell.required_text() {
            None => return Err(fail("missing value".to_string())),
            Some(s) => s
                .parse::<f64>()
                .map_err(|_| fail(format!("expected a number, got '{s}'")))?,
        },
        None => return Err(fail("missing value".to_string())),
    };

    if !value.is_finite() || value < 0.0 {
        return Err(fail(format!("expected a finite, non-negative number, got {value}")));
    }
    Ok(value)
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will report the
    // first column as missing. Matching stays case-sensitive.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Locale;

    const SAMPLE_CSV_PT: &str = "\
ingrediente,quantidade_atual,consumo_medio_diario,limite_minimo
farinha,10,5,4
leite,100,2,30
ovos,12,1.5,10
";

    fn en_schema() -> ColumnSchema {
        Locale::En.schema()
    }

    #[test]
    fn load_portuguese_csv() {
        let table = load_table(SAMPLE_CSV_PT.as_bytes(), FileFormat::Csv, &Locale::Pt.schema()).unwrap();
        assert_eq!(table.len(), 3);
        let first = &table.rows()[0].record;
        assert_eq!(first.ingredient, "farinha");
        assert!((first.current_quantity - 10.0).abs() < 1e-12);
        assert!((table.rows()[2].record.average_daily_consumption - 1.5).abs() < 1e-12);
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let csv = "ingredient,current_quantity,average_daily_consumption\nflour,10,5\n";
        let err = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap_err();
        match err {
            LoadError::Schema { required, missing } => {
                assert_eq!(missing, vec!["minimum_threshold"]);
                assert_eq!(required.len(), 4);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let csv = "Ingredient,current_quantity,average_daily_consumption,minimum_threshold\nflour,1,1,1\n";
        let err = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap_err();
        assert!(matches!(err, LoadError::Schema { ref missing, .. } if missing == &vec!["ingredient".to_string()]));
    }

    #[test]
    fn extra_columns_are_preserved_in_order() {
        let csv = "\
sku,ingredient,current_quantity,supplier,average_daily_consumption,minimum_threshold
F-1,flour,10,Mill Co,2,5
S-9,sugar,3,,1,1
";
        let table = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap();
        assert_eq!(
            table.columns(),
            &["sku", "ingredient", "current_quantity", "supplier", "average_daily_consumption", "minimum_threshold"]
        );
        assert_eq!(table.rows()[0].extras, vec!["F-1", "Mill Co"]);
        assert_eq!(table.rows()[1].extras, vec!["S-9", ""]);
    }

    #[test]
    fn bom_prefixed_header_is_accepted() {
        let csv = "\u{feff}ingredient,current_quantity,average_daily_consumption,minimum_threshold\nflour,1,1,1\n";
        let table = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap();
        assert_eq!(table.columns()[0], "ingredient");
    }

    #[test]
    fn non_numeric_cell_rejects_the_whole_file() {
        let csv = "\
ingredient,current_quantity,average_daily_consumption,minimum_threshold
flour,10,2,5
sugar,lots,1,1
";
        let err = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap_err();
        match err {
            LoadError::Parse {
                format: FileFormat::Csv,
                cause: ParseCause::Cell { line, column, .. },
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "current_quantity");
            }
            other => panic!("expected cell parse error, got {other:?}"),
        }
    }

    #[test]
    fn negative_and_missing_values_are_rejected() {
        let negative = "ingredient,current_quantity,average_daily_consumption,minimum_threshold\nflour,-1,2,5\n";
        assert!(matches!(
            load_table(negative.as_bytes(), FileFormat::Csv, &en_schema()),
            Err(LoadError::Parse { cause: ParseCause::Cell { .. }, .. })
        ));

        let missing = "ingredient,current_quantity,average_daily_consumption,minimum_threshold\nflour,1,,5\n";
        assert!(matches!(
            load_table(missing.as_bytes(), FileFormat::Csv, &en_schema()),
            Err(LoadError::Parse { cause: ParseCause::Cell { .. }, .. })
        ));

        let unnamed = "ingredient,current_quantity,average_daily_consumption,minimum_threshold\n ,1,1,5\n";
        assert!(matches!(
            load_table(unnamed.as_bytes(), FileFormat::Csv, &en_schema()),
            Err(LoadError::Parse { cause: ParseCause::Cell { .. }, .. })
        ));
    }

    #[test]
    fn ragged_csv_is_a_parse_error() {
        let csv = "ingredient,current_quantity,average_daily_consumption,minimum_threshold\nflour,1,1\n";
        let err = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { cause: ParseCause::Csv(_), .. }));
    }

    #[test]
    fn empty_csv_has_no_header() {
        let err = load_table(b"", FileFormat::Csv, &en_schema()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { cause: ParseCause::MissingHeader, .. }));
    }

    fn sample_xlsx() -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        let headers = ["ingredient", "current_quantity", "average_daily_consumption", "minimum_threshold", "note"];
        for (col, name) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        sheet.write_string(1, 0, "flour").unwrap();
        sheet.write_number(1, 1, 10.0).unwrap();
        sheet.write_number(1, 2, 5.0).unwrap();
        sheet.write_number(1, 3, 4.0).unwrap();
        sheet.write_string(1, 4, "bulk").unwrap();
        sheet.write_string(2, 0, "milk").unwrap();
        sheet.write_string(2, 1, "100").unwrap();
        sheet.write_number(2, 2, 2.5).unwrap();
        sheet.write_number(2, 3, 30.0).unwrap();
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn load_xlsx_matches_csv() {
        let from_xlsx = load_table(&sample_xlsx(), FileFormat::Xlsx, &en_schema()).unwrap();
        let csv = "\
ingredient,current_quantity,average_daily_consumption,minimum_threshold,note
flour,10,5,4,bulk
milk,100,2.5,30,
";
        let from_csv = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap();
        assert_eq!(from_xlsx, from_csv);
    }

    fn write_rows(sheet: &mut rust_xlsxwriter::Worksheet, first_row: u32, rows: &[&[&str]]) {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(first_row + r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }

    const EN_HEADER: &[&str] = &["ingredient", "current_quantity", "average_daily_consumption", "minimum_threshold"];

    #[test]
    fn xlsx_skips_empty_rows_between_records() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        write_rows(sheet, 0, &[EN_HEADER, &["flour", "10", "5", "4"], &[], &["milk", "100", "2", "30"]]);
        let bytes = workbook.save_to_buffer().unwrap();

        let table = load_table(&bytes, FileFormat::Xlsx, &en_schema()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].record.ingredient, "milk");
    }

    #[test]
    fn xlsx_cell_error_reports_sheet_row() {
        // Header on sheet row 2, a blank row 4, the bad value on row 5.
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        write_rows(sheet, 1, &[EN_HEADER, &["flour", "10", "5", "4"], &[], &["sugar", "lots", "1", "1"]]);
        let bytes = workbook.save_to_buffer().unwrap();

        let err = load_table(&bytes, FileFormat::Xlsx, &en_schema()).unwrap_err();
        match err {
            LoadError::Parse {
                format: FileFormat::Xlsx,
                cause: ParseCause::Cell { line, column, .. },
            } => {
                assert_eq!(line, 5);
                assert_eq!(column, "current_quantity");
            }
            other => panic!("expected cell parse error, got {other:?}"),
        }
    }

    #[test]
    fn xlsx_missing_column_is_a_schema_error() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        write_rows(sheet, 0, &[&EN_HEADER[..3], &["flour", "10", "5"]]);
        let bytes = workbook.save_to_buffer().unwrap();

        let err = load_table(&bytes, FileFormat::Xlsx, &en_schema()).unwrap_err();
        assert!(matches!(err, LoadError::Schema { ref missing, .. } if missing == &vec!["minimum_threshold".to_string()]));
    }

    #[test]
    fn xlsx_date_column_exports_as_date_text() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        write_rows(sheet, 0, &[&[EN_HEADER, &["received"]].concat(), &["flour", "10", "5", "4"]]);
        let received = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        sheet.write_datetime_with_format(1, 4, &received, &date_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = load_table(&bytes, FileFormat::Xlsx, &en_schema()).unwrap();
        assert_eq!(table.rows()[0].extras, vec!["2024-01-15"]);

        let exported = crate::io::export::export_csv_bytes(&table).unwrap();
        assert!(String::from_utf8(exported.clone()).unwrap().ends_with("flour,10,5,4,2024-01-15\n"));
        let reloaded = load_table(&exported, FileFormat::Csv, &en_schema()).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn csv_extra_whitespace_is_kept() {
        let csv = "ingredient,current_quantity,average_daily_consumption,minimum_threshold , note\n  flour , 10 ,5,4,  padded  \n";
        let table = load_table(csv.as_bytes(), FileFormat::Csv, &en_schema()).unwrap();
        assert_eq!(table.columns()[4], "note");
        assert_eq!(table.rows()[0].record.ingredient, "flour");
        assert_eq!(table.rows()[0].record.current_quantity, 10.0);
        assert_eq!(table.rows()[0].extras, vec!["  padded  "]);

        let exported = crate::io::export::export_csv_bytes(&table).unwrap();
        assert!(String::from_utf8(exported.clone()).unwrap().contains(",  padded  "));
        let reloaded = load_table(&exported, FileFormat::Csv, &en_schema()).unwrap();
        assert_eq!(reloaded.rows()[0].extras, vec!["  padded  "]);
    }

    #[test]
    fn garbage_xlsx_is_a_parse_error() {
        let err = load_table(b"not a zip archive", FileFormat::Xlsx, &en_schema()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                format: FileFormat::Xlsx,
                cause: ParseCause::Spreadsheet(_),
            }
        ));
    }

    #[test]
    fn file_format_follows_extension() {
        let dir = tempfile::tempdir().unwrap();

        let txt = dir.path().join("stock.txt");
        std::fs::write(&txt, SAMPLE_CSV_PT).unwrap();
        assert!(matches!(
            load_table_file(&txt, &Locale::Pt.schema()),
            Err(LoadError::UnsupportedFormat(_))
        ));

        // CSV text behind an .xlsx name is parsed as a workbook and fails.
        let disguised = dir.path().join("stock.xlsx");
        std::fs::write(&disguised, SAMPLE_CSV_PT).unwrap();
        assert!(matches!(
            load_table_file(&disguised, &Locale::Pt.schema()),
            Err(LoadError::Parse { format: FileFormat::Xlsx, .. })
        ));

        let csv = dir.path().join("stock.csv");
        std::fs::write(&csv, SAMPLE_CSV_PT).unwrap();
        assert_eq!(load_table_file(&csv, &Locale::Pt.schema()).unwrap().len(), 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_table_file(Path::new("does/not/exist.csv"), &en_schema()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
