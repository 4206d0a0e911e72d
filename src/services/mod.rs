//! 业务能力层
//!
//! 每个服务只描述"我能做什么"，只处理单个发票，不关心批次流程。

pub mod csv_writer;
pub mod flattener;
pub mod llm_extractor;
pub mod pdf_reader;

pub use llm_extractor::LlmExtractor;
