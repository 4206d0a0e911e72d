//! 发票数据模型
//!
//! `InvoiceRecord` 由 LLM 按固定 JSON 契约返回，所有字段都可能缺失。
//! 缺失/为 `null` 的字段保留为 `None`，空字符串转换只发生在展平阶段，
//! 避免"字段确实为空"和"字段未知"混淆。

use serde::{Deserialize, Serialize};

/// Xero 销售发票导入模板的固定表头
///
/// 列名和顺序是与 Xero 导入格式的兼容性契约，必须逐字节一致，
/// 不随内容变化。带 `*` 的列是 Xero 的必填列。
pub const XERO_CSV_HEADER: [&str; 16] = [
    "*ContactName",
    "*InvoiceNumber",
    "*InvoiceDate",
    "*DueDate",
    "InventoryItemCode",
    "*Description",
    "*Quantity",
    "*UnitAmount",
    "Discount",
    "*AccountCode",
    "*TaxType",
    "TrackingName1",
    "TrackingOption1",
    "TrackingName2",
    "TrackingOption2",
    "Currency",
];

/// 一行 Xero CSV 输出，严格 16 个单元格，顺序与 [`XERO_CSV_HEADER`] 对齐
pub type FlatRow = [String; 16];

/// LLM 从单个文档中提取的结构化发票记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// 客户名称
    #[serde(default)]
    pub contact_name: Option<String>,
    /// 发票号
    #[serde(default)]
    pub invoice_number: Option<String>,
    /// 开票日期（YYYY-MM-DD 文本形式，由 LLM 尽力归一化）
    #[serde(default)]
    pub invoice_date: Option<String>,
    /// 到期日期（同上）
    #[serde(default)]
    pub due_date: Option<String>,
    /// 行项目列表，顺序保留文档中的出现顺序
    #[serde(default)]
    pub lines: Option<Vec<LineItem>>,
}

impl InvoiceRecord {
    /// 行项目切片（`lines` 缺失或为 `null` 时视为空）
    pub fn line_items(&self) -> &[LineItem] {
        self.lines.as_deref().unwrap_or(&[])
    }
}

/// 发票中的一个行项目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// 项目描述
    #[serde(default)]
    pub description: Option<String>,
    /// 数量
    #[serde(default)]
    pub quantity: Option<f64>,
    /// 单价
    #[serde(default)]
    pub unit_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "contact_name": "Acme",
            "invoice_number": "INV-1",
            "invoice_date": "2024-01-05",
            "due_date": "2024-02-05",
            "lines": [
                {"description": "Widget", "quantity": 2, "unit_price": 10.0}
            ]
        }"#;

        let record: InvoiceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.contact_name.as_deref(), Some("Acme"));
        assert_eq!(record.line_items().len(), 1);
        assert_eq!(record.line_items()[0].quantity, Some(2.0));
    }

    #[test]
    fn test_null_and_missing_fields_are_none() {
        // null 和缺失都必须映射为 None
        let json = r#"{"contact_name": null, "lines": null}"#;
        let record: InvoiceRecord = serde_json::from_str(json).unwrap();
        assert!(record.contact_name.is_none());
        assert!(record.invoice_number.is_none());
        assert!(record.line_items().is_empty());

        let record: InvoiceRecord = serde_json::from_str("{}").unwrap();
        assert!(record.due_date.is_none());
        assert!(record.line_items().is_empty());
    }

    #[test]
    fn test_line_order_preserved() {
        let json = r#"{"lines": [
            {"description": "第一项"},
            {"description": "第二项"},
            {"description": "第三项"}
        ]}"#;
        let record: InvoiceRecord = serde_json::from_str(json).unwrap();
        let descriptions: Vec<_> = record
            .line_items()
            .iter()
            .map(|l| l.description.as_deref().unwrap())
            .collect();
        assert_eq!(descriptions, vec!["第一项", "第二项", "第三项"]);
    }
}
