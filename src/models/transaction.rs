use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// `sales_transactions` 表的标准列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    DocumentDate,
    InvoiceNo,
    CustomerCode,
    CustomerName,
    Province,
    SalesRepCode,
    SalesRepName,
    SalesTeam,
    ProductCode,
    ProductGroup,
    ProductName,
    Quantity,
    UnitOfMeasure,
    UnitPrice,
    DiscountPercent,
    BillDiscountPercent,
    UnitPriceNonVat,
    TotalAmountNonVat,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::DocumentDate,
        Field::InvoiceNo,
        Field::CustomerCode,
        Field::CustomerName,
        Field::Province,
        Field::SalesRepCode,
        Field::SalesRepName,
        Field::SalesTeam,
        Field::ProductCode,
        Field::ProductGroup,
        Field::ProductName,
        Field::Quantity,
        Field::UnitOfMeasure,
        Field::UnitPrice,
        Field::DiscountPercent,
        Field::BillDiscountPercent,
        Field::UnitPriceNonVat,
        Field::TotalAmountNonVat,
    ];

    /// 数值列 (默认 0)
    pub const NUMERIC: [Field; 6] = [
        Field::Quantity,
        Field::UnitPrice,
        Field::TotalAmountNonVat,
        Field::DiscountPercent,
        Field::BillDiscountPercent,
        Field::UnitPriceNonVat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::DocumentDate => "document_date",
            Field::InvoiceNo => "invoice_no",
            Field::CustomerCode => "customer_code",
            Field::CustomerName => "customer_name",
            Field::Province => "province",
            Field::SalesRepCode => "sales_rep_code",
            Field::SalesRepName => "sales_rep_name",
            Field::SalesTeam => "sales_team",
            Field::ProductCode => "product_code",
            Field::ProductGroup => "product_group",
            Field::ProductName => "product_name",
            Field::Quantity => "quantity",
            Field::UnitOfMeasure => "unit_of_measure",
            Field::UnitPrice => "unit_price",
            Field::DiscountPercent => "discount_percent",
            Field::BillDiscountPercent => "bill_discount_percent",
            Field::UnitPriceNonVat => "unit_price_non_vat",
            Field::TotalAmountNonVat => "total_amount_non_vat",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.as_str() == name)
    }

    pub fn is_numeric(&self) -> bool {
        Field::NUMERIC.contains(self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 标准销售明细行 (`sales_transactions`)
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SalesTransaction {
    pub document_date: NaiveDate,
    pub invoice_no: Option<String>,
    pub customer_code: Option<String>,
    pub customer_name: Option<String>,
    pub province: Option<String>,
    pub sales_rep_code: Option<String>,
    pub sales_rep_name: Option<String>,
    pub sales_team: Option<String>,
    pub product_code: Option<String>,
    pub product_group: Option<String>,
    pub product_name: Option<String>,
    pub quantity: BigDecimal,
    pub unit_of_measure: Option<String>,
    pub unit_price: BigDecimal,
    pub discount_percent: BigDecimal,
    pub bill_discount_percent: BigDecimal,
    pub unit_price_non_vat: BigDecimal,
    pub total_amount_non_vat: BigDecimal,
    pub batch_id: Option<String>,
}

impl SalesTransaction {
    /// 取 [`Field::NUMERIC`] 中某列的数值
    pub fn numeric(&self, field: Field) -> Option<&BigDecimal> {
        match field {
            Field::Quantity => Some(&self.quantity),
            Field::UnitPrice => Some(&self.unit_price),
            Field::DiscountPercent => Some(&self.discount_percent),
            Field::BillDiscountPercent => Some(&self.bill_discount_percent),
            Field::UnitPriceNonVat => Some(&self.unit_price_non_vat),
            Field::TotalAmountNonVat => Some(&self.total_amount_non_vat),
            _ => None,
        }
    }
}
