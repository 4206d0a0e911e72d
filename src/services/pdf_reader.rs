//! PDF 文本提取服务 - 业务能力层
//!
//! 只负责"把 PDF 变成文本"能力，不关心流程。
//! 布局、表格、图片的解析全部交给 `pdf-extract`，本模块只拿到
//! 按页序拼接的全文。

use std::path::Path;

use tracing::debug;

use crate::error::{AppError, AppResult};

/// 读取文档的全部文本
///
/// 按自然页序提取每一页的文本并拼接为一个字符串，页间不额外插入
/// 分隔符。无法打开或不是合法 PDF 时返回 [`AppError::DocumentOpen`]，
/// 该错误只影响当前文档，不终止批次，也不重试。
pub fn read_document_text(path: &Path) -> AppResult<String> {
    debug!("正在提取 PDF 文本: {}", path.display());

    let text = pdf_extract::extract_text(path)
        .map_err(|e| AppError::document_open(path.display().to_string(), e))?;

    debug!("PDF 文本提取完成，共 {} 字符", text.chars().count());

    Ok(text)
}
