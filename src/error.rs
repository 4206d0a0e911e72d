//! 应用程序错误类型
//!
//! 错误按影响范围分为两类：
//! - 文档级错误（`DocumentOpen` / `EmptyResponse` / `MalformedResponse`）：
//!   只影响当前文档，批次继续处理下一个
//! - 批次级错误（`Transport`）：LLM 服务是所有文档的共享依赖，
//!   连接失败意味着后续文档也无法成功，批次立即终止
//! - `CsvWrite` 仅发生在最终写出阶段，不影响已提取的内存数据

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 无法打开或解析文档
    #[error("无法打开文档 ({path}): {source}")]
    DocumentOpen {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// LLM 服务不可达或返回错误状态
    #[error("无法连接到 LLM 服务 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// LLM 返回内容为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// LLM 返回的 JSON 无法解析
    #[error("LLM 返回的 JSON 无法解析 (响应片段: {snippet}): {source}")]
    MalformedResponse {
        snippet: String,
        source: serde_json::Error,
    },
    /// 写入 CSV 失败
    #[error("写入 CSV 失败 ({path}): {source}")]
    CsvWrite {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

impl AppError {
    /// 该错误是否终止整个批次
    ///
    /// 只有 LLM 连接失败是批次级的，其余错误都只影响当前文档。
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, AppError::Transport { .. })
    }

    // ========== 便捷构造函数 ==========

    /// 创建文档打开错误
    pub fn document_open(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::DocumentOpen {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// 创建 LLM 连接错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建 CSV 写入错误
    pub fn csv_write(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::CsvWrite {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_is_batch_fatal() {
        let err = AppError::transport(
            "http://localhost:1234/v1",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "连接被拒绝"),
        );
        assert!(err.is_batch_fatal());
    }

    #[test]
    fn test_document_errors_are_recoverable() {
        let open_err = AppError::document_open(
            "invoices/a.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在"),
        );
        assert!(!open_err.is_batch_fatal());

        let parse_err = AppError::MalformedResponse {
            snippet: "这不是JSON".to_string(),
            source: serde_json::from_str::<serde_json::Value>("不是json").unwrap_err(),
        };
        assert!(!parse_err.is_batch_fatal());

        let empty_err = AppError::EmptyResponse {
            model: "local-model".to_string(),
        };
        assert!(!empty_err.is_batch_fatal());
    }
}
