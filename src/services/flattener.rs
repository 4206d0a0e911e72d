//! 发票展平服务 - 业务能力层
//!
//! 只负责"一条发票记录 → N 行 Xero CSV"能力，不关心流程。
//! N 等于行项目数量，每一行重复发票头字段，并带上固定的
//! 账户代码和税种两个业务常量。

use crate::models::invoice::{FlatRow, InvoiceRecord};

/// 默认账户代码（Xero 中 "200" 通常是销售账户）
pub const DEFAULT_ACCOUNT_CODE: &str = "200";
/// 默认税种
pub const DEFAULT_TAX_TYPE: &str = "GST on Income";

// 与 XERO_CSV_HEADER 对齐的列索引
const COL_CONTACT_NAME: usize = 0;
const COL_INVOICE_NUMBER: usize = 1;
const COL_INVOICE_DATE: usize = 2;
const COL_DUE_DATE: usize = 3;
const COL_DESCRIPTION: usize = 5;
const COL_QUANTITY: usize = 6;
const COL_UNIT_AMOUNT: usize = 7;
const COL_ACCOUNT_CODE: usize = 9;
const COL_TAX_TYPE: usize = 10;

/// 把一条发票记录展平为 Xero CSV 行
///
/// - `lines` 为空或缺失时返回空列表，这是正常结果不是错误
/// - 每个行项目产生一行，发票头字段逐行重复
/// - `None` 字段在这里（且只在这里）转换为空单元格
/// - 未使用的列始终为空单元格
pub fn flatten_invoice(record: &InvoiceRecord) -> Vec<FlatRow> {
    let mut rows = Vec::new();

    for line in record.line_items() {
        let mut row: FlatRow = std::array::from_fn(|_| String::new());

        // 发票头字段
        row[COL_CONTACT_NAME] = text_cell(record.contact_name.as_deref());
        row[COL_INVOICE_NUMBER] = text_cell(record.invoice_number.as_deref());
        row[COL_INVOICE_DATE] = text_cell(record.invoice_date.as_deref());
        row[COL_DUE_DATE] = text_cell(record.due_date.as_deref());

        // 行项目字段
        row[COL_DESCRIPTION] = text_cell(line.description.as_deref());
        row[COL_QUANTITY] = number_cell(line.quantity);
        row[COL_UNIT_AMOUNT] = number_cell(line.unit_price);

        // Xero 必填的业务常量，全系统固定
        row[COL_ACCOUNT_CODE] = DEFAULT_ACCOUNT_CODE.to_string();
        row[COL_TAX_TYPE] = DEFAULT_TAX_TYPE.to_string();

        rows.push(row);
    }

    rows
}

/// 文本字段转单元格，`None` 即空单元格
fn text_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// 数值字段转单元格，整数值不带小数点
fn number_cell(value: Option<f64>) -> String {
    match value {
        Some(n) => format!("{}", n),
        None => String::new(),
    }
}
