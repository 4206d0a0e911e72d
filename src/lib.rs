//! # Invoice to Xero
//!
//! 一个将 PDF 发票批量转换为 Xero 导入 CSV 的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个发票
//! - `pdf_reader` - PDF 文本提取能力
//! - `LlmExtractor` - LLM 结构化提取能力（响应修复 + JSON 解析）
//! - `flattener` - 发票记录展平为 Xero 行的能力
//! - `csv_writer` - 写 Xero CSV 能力
//!
//! ### ② 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量发票处理器，严格按输入顺序
//!   逐个处理文档，汇总所有行并分类每个文档的处理结果
//!
//! ## 数据流
//!
//! PDF 路径 → 原始文本 → LLM → `InvoiceRecord` → `FlatRow` 列表
//! → 批次累积 → CSV 文件

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::invoice::{FlatRow, InvoiceRecord, LineItem, XERO_CSV_HEADER};
pub use orchestrator::{App, BatchReport, DocumentStatus};
pub use services::llm_extractor::LlmExtractor;
