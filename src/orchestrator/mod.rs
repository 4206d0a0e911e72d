//! 编排层
//!
//! 负责批量发票的处理顺序、失败分类和结果汇总。

pub mod batch_processor;

pub use batch_processor::{App, BatchReport, DocumentStatus};
