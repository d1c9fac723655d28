//! 导入流水线使用的固定表头词表
//!
//! 映射表是纯数据, 可单独版本化和扩展; [`MappingTables::builtin`] 与销售导出文件的表头一致

use std::collections::HashMap;

use crate::etl::columns::ColumnTarget;
use crate::etl::header::collapse_whitespace;
use crate::models::Field;

pub const TABLES_VERSION: &str = "2025.1";

/// 已知的表头笔误与格式漂移 (空白规范化之后应用)
pub const HEADER_ALIASES: &[(&str, &str)] = &[
    ("วันที่/เดือน/ปี", "วันที่/เดือน/ปี เอกสาร"),
    ("ชือพนักงาน", "ชื่อพนักงาน"),
    ("% ส่วนลด", "%ส่วนลด"),
    ("% ลดท้ายบิล", "%ลดท้ายบิล"),
    ("รายละเอีย ด", "รายละเอียด"),
];

/// 泰文导出表头
pub const THAI_COLUMNS: &[(&str, Field)] = &[
    ("วันที่/เดือน/ปี เอกสาร", Field::DocumentDate),
    ("เลขที่บิล", Field::InvoiceNo),
    ("รหัสลูกค้า", Field::CustomerCode),
    ("ชื่อลูกค้า", Field::CustomerName),
    ("จังหวัด", Field::Province),
    ("รหัสพนักงานขาย", Field::SalesRepCode),
    ("ชื่อพนักงาน", Field::SalesRepName),
    ("ทีม", Field::SalesTeam),
    ("รหัสสินค้า", Field::ProductCode),
    ("กลุ่มสินค้า", Field::ProductGroup),
    ("รายละเอียด", Field::ProductName),
    ("จำนวน", Field::Quantity),
    ("หน่วยนับ", Field::UnitOfMeasure),
    ("@", Field::UnitPrice),
    ("%ส่วนลด", Field::DiscountPercent),
    ("%ลดท้ายบิล", Field::BillDiscountPercent),
    ("หน่วยละ NON VAT", Field::UnitPriceNonVat),
    ("รวมเงิน NON VAT", Field::TotalAmountNonVat),
];

/// 旧 ERP 导出使用的缩写
pub const LEGACY_COLUMNS: &[(&str, Field)] = &[
    ("DOCDATE", Field::DocumentDate),
    ("DOC_DATE", Field::DocumentDate),
    ("INVNO", Field::InvoiceNo),
    ("INV_NO", Field::InvoiceNo),
    ("CUSTCODE", Field::CustomerCode),
    ("CUST_CODE", Field::CustomerCode),
    ("CUSTNAME", Field::CustomerName),
    ("CUST_NAME", Field::CustomerName),
    ("PROVINCE", Field::Province),
    ("SLMCODE", Field::SalesRepCode),
    ("SLMNAME", Field::SalesRepName),
    ("TEAM", Field::SalesTeam),
    ("SKU", Field::ProductCode),
    ("ITEMCODE", Field::ProductCode),
    ("ITEMGRP", Field::ProductGroup),
    ("ITEMNAME", Field::ProductName),
    ("QTY", Field::Quantity),
    ("UOM", Field::UnitOfMeasure),
    ("PRICE", Field::UnitPrice),
    ("DISC%", Field::DiscountPercent),
    ("BILLDISC%", Field::BillDiscountPercent),
    ("PRICE_NV", Field::UnitPriceNonVat),
    ("AMOUNT_NV", Field::TotalAmountNonVat),
];

/// 同时包含客户编码和名称的组合列表头
pub const CUSTOMER_CODE_NAME_COLUMNS: &[&str] =
    &["รหัส:ชื่อลูกค้า", "รหัสและชื่อลูกค้า", "ลูกค้า", "CUSTOMER"];

pub const SHEET_PREFERENCE: &[&str] = &["DATA ปรับเขต", "DATA FULL", "2025", "2024"];

/// 只读映射表 (所有导入共享)
#[derive(Debug, Clone)]
pub struct MappingTables {
    version: String,
    aliases: HashMap<String, String>,
    columns: HashMap<String, ColumnTarget>,
}

impl MappingTables {
    pub fn builtin() -> Self {
        let mut tables = Self {
            version: TABLES_VERSION.to_string(),
            aliases: HashMap::new(),
            columns: HashMap::new(),
        };
        for (raw, fixed) in HEADER_ALIASES {
            tables = tables.with_alias(raw, fixed);
        }
        for (header, field) in THAI_COLUMNS.iter().chain(LEGACY_COLUMNS) {
            tables = tables.with_column(header, ColumnTarget::Field(*field));
        }
        for header in CUSTOMER_CODE_NAME_COLUMNS {
            tables = tables.with_column(header, ColumnTarget::CustomerCodeName);
        }
        tables
    }

    /// 添加别名 (两侧都做空白规范化, 保证规范化后的表头能命中)
    pub fn with_alias(mut self, raw: &str, fixed: &str) -> Self {
        self.aliases
            .insert(collapse_whitespace(raw), collapse_whitespace(fixed));
        self
    }

    pub fn with_column(mut self, header: &str, target: ColumnTarget) -> Self {
        self.columns.insert(collapse_whitespace(header), target);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn alias(&self, header: &str) -> Option<&str> {
        self.aliases.get(header).map(String::as_str)
    }

    pub fn column(&self, header: &str) -> Option<ColumnTarget> {
        self.columns.get(header).copied()
    }

    /// 链式别名 (`a -> b -> c`) 会破坏表头规范化的幂等性, 返回有问题的别名目标
    pub fn chained_aliases(&self) -> Vec<&str> {
        self.aliases
            .values()
            .filter(|fixed| {
                self.aliases
                    .get(fixed.as_str())
                    .is_some_and(|next| next != *fixed)
            })
            .map(String::as_str)
            .collect()
    }
}

impl Default for MappingTables {
    fn default() -> Self {
        Self::builtin()
    }
}
