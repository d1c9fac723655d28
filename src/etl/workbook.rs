//! 表格读取: 上传字节 -> 表名列表与 [`RawTable`]

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use crate::error::{IngestError, Result};
use crate::etl::sanitize::MAX_EXCEL_SERIAL;
use crate::models::raw::format_float;
use crate::models::{CellValue, RawTable};

/// CSV 上传对应的表名
pub const CSV_SHEET: &str = "csv";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// xlsx / xlsm / xlsb / xls / ods, 根据内容自动识别
    #[default]
    Spreadsheet,
    Csv,
}

impl WorkbookFormat {
    pub fn from_file_name(name: &str) -> Self {
        if name.trim().to_ascii_lowercase().ends_with(".csv") {
            WorkbookFormat::Csv
        } else {
            WorkbookFormat::Spreadsheet
        }
    }
}

pub trait WorkbookReader {
    /// 表名 (工作簿原始顺序)
    fn sheet_names(&self) -> Vec<String>;
    fn read_sheet(&mut self, name: &str) -> Result<RawTable>;
}

pub fn open_workbook(bytes: &[u8], format: WorkbookFormat) -> Result<Box<dyn WorkbookReader>> {
    match format {
        WorkbookFormat::Spreadsheet => Ok(Box::new(SpreadsheetWorkbook::open(bytes)?)),
        WorkbookFormat::Csv => Ok(Box::new(CsvWorkbook::open(bytes)?)),
    }
}

pub struct SpreadsheetWorkbook {
    sheets: Sheets<Cursor<Vec<u8>>>,
}

impl SpreadsheetWorkbook {
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| IngestError::Decode(e.to_string()))?;
        Ok(Self { sheets })
    }
}

impl WorkbookReader for SpreadsheetWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<RawTable> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| IngestError::Sheet {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(range_to_table(&range))
    }
}

/// 第一行为表头; 全空行跳过
fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return RawTable::default();
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let rows = rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    RawTable::new(headers, rows)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() && in_serial_range(dt.as_f64()) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Float(dt.as_f64())),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// `as_datetime` 自行处理 1904 日期系统; 这里只限制序列号范围, 避免毫秒换算越界
fn in_serial_range(serial: f64) -> bool {
    serial.is_finite() && (0.0..=MAX_EXCEL_SERIAL).contains(&serial)
}

/// CSV 文件按单表工作簿读取
pub struct CsvWorkbook {
    table: Option<RawTable>,
}

impl CsvWorkbook {
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::text(field)
                        }
                    })
                    .collect(),
            );
        }

        Ok(Self {
            table: Some(RawTable::new(headers, rows)),
        })
    }
}

impl WorkbookReader for CsvWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        vec![CSV_SHEET.to_string()]
    }

    fn read_sheet(&mut self, name: &str) -> Result<RawTable> {
        if name != CSV_SHEET {
            return Err(IngestError::Sheet {
                sheet: name.to_string(),
                message: "CSV uploads contain a single sheet".to_string(),
            });
        }
        Ok(self.table.take().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn format_follows_extension() {
        assert_eq!(WorkbookFormat::from_file_name("sales.CSV"), WorkbookFormat::Csv);
        assert_eq!(
            WorkbookFormat::from_file_name("sales.xlsx"),
            WorkbookFormat::Spreadsheet
        );
        assert_eq!(WorkbookFormat::from_file_name(""), WorkbookFormat::Spreadsheet);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = SpreadsheetWorkbook::open(b"definitely not a workbook")
            .err()
            .expect("decode should fail");
        assert!(matches!(err, IngestError::Decode(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn csv_reads_as_one_sheet() {
        let bytes = "\u{feff}เลขที่บิล,จำนวน\nIV1,3\n,\nIV2,\n".as_bytes();
        let mut workbook = CsvWorkbook::open(bytes).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["csv".to_string()]);

        let table = workbook.read_sheet(CSV_SHEET).unwrap();
        assert_eq!(table.headers, vec!["เลขที่บิล".to_string(), "จำนวน".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), &CellValue::text("3"));
        assert_eq!(table.cell(1, 1), &CellValue::Empty);
    }

    #[test]
    fn csv_rejects_unknown_sheet() {
        let mut workbook = CsvWorkbook::open(b"a,b\n1,2\n").unwrap();
        assert!(workbook.read_sheet("Sheet1").is_err());
    }

    #[test]
    fn excel_cells_convert() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(
            convert_cell(&Data::String("IV1".into())),
            CellValue::text("IV1")
        );
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
    }

    fn excel_date(serial: f64, kind: ExcelDateTimeType, is_1904: bool) -> Data {
        Data::DateTime(ExcelDateTime::new(serial, kind, is_1904))
    }

    fn march_5_2024() -> CellValue {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        CellValue::DateTime(date.and_time(chrono::NaiveTime::MIN))
    }

    #[test]
    fn date_cells_follow_the_workbook_epoch() {
        let dt = ExcelDateTimeType::DateTime;
        assert_eq!(convert_cell(&excel_date(45356.0, dt, false)), march_5_2024());
        assert_eq!(convert_cell(&excel_date(43894.0, dt, true)), march_5_2024());
    }

    #[test]
    fn durations_and_wild_serials_stay_numeric() {
        assert_eq!(
            convert_cell(&excel_date(1.5, ExcelDateTimeType::TimeDelta, false)),
            CellValue::Float(1.5)
        );
        assert_eq!(
            convert_cell(&excel_date(-1e300, ExcelDateTimeType::DateTime, false)),
            CellValue::Float(-1e300)
        );
    }
}
