//! 数据模型模块

pub mod invoice;

pub use invoice::{FlatRow, InvoiceRecord, LineItem, XERO_CSV_HEADER};
