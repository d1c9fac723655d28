use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::etl::columns::MappedRow;
use crate::models::{CellValue, Field, RowCounts, SalesTransaction};

/// Excel 可表示的最大序列号 (9999-12-31)
pub const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];
const NAMED_MONTH_FORMATS: &[&str] = &["%d %b %Y", "%d-%b-%Y", "%d %B %Y", "%d-%b-%y"];

/// Excel 序列日期 (1900 日期系统) 转时间戳
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

/// 解析单据日期 (日在前); `None` 表示无日期
pub fn parse_document_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Int(i) => excel_serial_to_datetime(*i as f64).map(|dt| dt.date()),
        CellValue::Float(f) => excel_serial_to_datetime(*f).map(|dt| dt.date()),
        CellValue::Text(s) => parse_day_first(s),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// `05/03/2024` 即 2024 年 3 月 5 日; 四位年份开头 (`2024-03-05`) 按年-月-日解析
/// 空格或 `T` 之后的时间部分必须合法
pub fn parse_day_first(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (date_part, time_part) = match text.find([' ', 'T']) {
        Some(pos) => (&text[..pos], Some(text[pos + 1..].trim())),
        None => (text, None),
    };

    let date = match parse_numeric_date(date_part) {
        Some(date) => date,
        // 英文月份本身含空格, 用整段文本解析
        None => return parse_named_month(text),
    };

    match time_part {
        None => Some(date),
        Some(t) if t.is_empty() => Some(date),
        Some(t) => TIME_FORMATS
            .iter()
            .any(|fmt| NaiveTime::parse_from_str(t, fmt).is_ok())
            .then_some(date),
    }
}

fn parse_numeric_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split(['/', '-', '.']).collect();
    let [a, b, c] = parts.as_slice() else {
        return None;
    };
    if ![a, b, c]
        .iter()
        .all(|p| !p.is_empty() && p.len() <= 4 && p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let (y, m, d) = if a.len() == 4 { (a, b, c) } else { (c, b, a) };
    if m.len() > 2 || d.len() > 2 || y.len() == 3 {
        return None;
    }

    let mut year: i32 = y.parse().ok()?;
    if y.len() <= 2 {
        // 与 chrono 的 %y 相同: 00-68 -> 20xx, 69-99 -> 19xx
        year += if year < 69 { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
}

fn parse_named_month(text: &str) -> Option<NaiveDate> {
    NAMED_MONTH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// 数值转换: 无法解析、空白或非有限值一律为 0
///
/// 文本先按 `f64` 解析, 指数范围有界: `1e-99999` 为 0, `1e99999` 溢出也为 0
pub fn coerce_decimal(cell: &CellValue) -> BigDecimal {
    match cell {
        CellValue::Int(i) => BigDecimal::from(*i),
        CellValue::Float(f) => decimal_from_f64(*f),
        CellValue::Bool(b) => BigDecimal::from(i64::from(*b)),
        CellValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(decimal_from_f64)
            .unwrap_or_else(|_| BigDecimal::zero()),
        _ => BigDecimal::zero(),
    }
}

fn decimal_from_f64(f: f64) -> BigDecimal {
    if !f.is_finite() {
        return BigDecimal::zero();
    }
    // f64 的 Display 不使用科学计数法
    BigDecimal::from_str(&f.to_string()).unwrap_or_else(|_| BigDecimal::zero())
}

/// 文本列: 去首尾空白, 空白为 `None`
pub fn cell_text(cell: &CellValue) -> Option<String> {
    let text = cell.to_text()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 行清洗: 丢弃无有效日期的行, 其余转换为标准类型
#[derive(Debug, Clone, Copy, Default)]
pub struct RowSanitizer;

impl RowSanitizer {
    pub fn sanitize(&self, rows: Vec<MappedRow>) -> (Vec<SalesTransaction>, RowCounts) {
        let seen = rows.len();

        let dated: Vec<(NaiveDate, MappedRow)> = rows
            .into_iter()
            .filter_map(|row| {
                let date = row.get(Field::DocumentDate).and_then(parse_document_date)?;
                Some((date, row))
            })
            .collect();

        let counts = RowCounts {
            seen,
            admitted: dated.len(),
        };

        let typed = dated
            .into_iter()
            .map(|(date, row)| to_transaction(date, &row))
            .collect();

        (typed, counts)
    }
}

fn to_transaction(document_date: NaiveDate, row: &MappedRow) -> SalesTransaction {
    let text = |field| row.get(field).and_then(cell_text);
    let number = |field| {
        row.get(field)
            .map(coerce_decimal)
            .unwrap_or_else(BigDecimal::zero)
    };

    SalesTransaction {
        document_date,
        invoice_no: text(Field::InvoiceNo),
        customer_code: text(Field::CustomerCode),
        customer_name: text(Field::CustomerName),
        province: text(Field::Province),
        sales_rep_code: text(Field::SalesRepCode),
        sales_rep_name: text(Field::SalesRepName),
        sales_team: text(Field::SalesTeam),
        product_code: text(Field::ProductCode),
        product_group: text(Field::ProductGroup),
        product_name: text(Field::ProductName),
        quantity: number(Field::Quantity),
        unit_of_measure: text(Field::UnitOfMeasure),
        unit_price: number(Field::UnitPrice),
        discount_percent: number(Field::DiscountPercent),
        bill_discount_percent: number(Field::BillDiscountPercent),
        unit_price_non_vat: number(Field::UnitPriceNonVat),
        total_amount_non_vat: number(Field::TotalAmountNonVat),
        batch_id: None,
    }
}
