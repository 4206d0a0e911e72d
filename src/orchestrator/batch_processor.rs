//! 批量发票处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量发票的处理和结果汇总。
//!
//! ## 核心功能
//!
//! 1. **批量加载**：从命令行参数或配置目录收集待处理的 PDF
//! 2. **顺序处理**：严格按输入顺序逐个处理，单个文档内
//!    读取 → 提取 → 展平，产生的行追加到批次累积器
//! 3. **失败分类**：文档级错误记录后继续下一个；LLM 连接失败
//!    立即终止批次（共享依赖已不可用，后续文档不可能成功）
//! 4. **全局统计**：汇总所有文档的处理结果并写出 CSV
//!
//! ## 设计特点
//!
//! - **顺序执行**：单个逻辑工作者，无并发模型请求，累积器只追加
//! - **向下委托**：委托 services 层处理单个发票的各个环节
//! - **三种终态**：连接失败终止 / 正常但零行 / 正常输出，互不重叠

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::invoice::FlatRow;
use crate::services::llm_extractor::LlmExtractor;
use crate::services::{csv_writer, flattener, pdf_reader};

/// 应用主结构
pub struct App {
    config: Config,
    extractor: LlmExtractor,
}

impl App {
    /// 初始化应用
    pub fn new(config: Config) -> Self {
        let extractor = LlmExtractor::new(&config);
        Self { config, extractor }
    }

    /// 运行应用主逻辑
    ///
    /// `args` 为命令行给出的发票路径，为空时扫描配置目录。
    pub async fn run(&self, args: &[String]) -> Result<()> {
        log_startup(&self.config);

        // 收集待处理的发票
        let paths = self.resolve_paths(args)?;

        if paths.is_empty() {
            warn!("⚠️ 没有找到待处理的发票 PDF，程序结束");
            return Ok(());
        }

        info!("✓ 找到 {} 个待处理的发票", paths.len());

        // 处理所有发票
        let report = self.process_documents(&paths).await;

        print_final_stats(&report);

        // 终态一：LLM 连接失败，批次被终止
        if let Some(fatal) = report.fatal {
            error!("❌ 批次因 LLM 服务连接失败而终止，请确认 LM Studio 是否在运行");
            return Err(fatal.into());
        }

        // 终态二：全部处理完成但没有任何行项目，合法的空结果
        if report.rows.is_empty() {
            info!("处理完成，但未提取到任何发票数据");
            return Ok(());
        }

        // 终态三：正常输出
        let output_path = self.output_path();
        csv_writer::write_rows(&output_path, &report.rows)?;

        Ok(())
    }

    /// 批量处理文档，严格按输入顺序
    pub async fn process_documents(&self, paths: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();
        let total = paths.len();

        for (i, path) in paths.iter().enumerate() {
            let name = display_name(path);
            info!("\n📄 正在处理第 {}/{} 个文件: {}", i + 1, total, name);

            let outcome = self.process_one(path).await;

            if !apply_outcome(&mut report, &name, outcome) {
                warn!(
                    "⚠️ 批次在第 {}/{} 个文件处终止，剩余 {} 个未处理",
                    i + 1,
                    total,
                    total - i - 1
                );
                break;
            }
        }

        report
    }

    /// 处理单个文档：读取文本 → LLM 提取 → 展平为行
    async fn process_one(&self, path: &Path) -> AppResult<Vec<FlatRow>> {
        let text = pdf_reader::read_document_text(path)?;
        let record = self.extractor.extract(&text).await?;
        Ok(flattener::flatten_invoice(&record))
    }

    /// 收集待处理的发票路径
    fn resolve_paths(&self, args: &[String]) -> AppResult<Vec<PathBuf>> {
        if !args.is_empty() {
            return Ok(args.iter().map(PathBuf::from).collect());
        }

        info!("📁 正在扫描发票目录: {}", self.config.invoice_folder);
        collect_pdf_paths(Path::new(&self.config.invoice_folder))
    }

    /// 带时间戳的输出文件路径
    fn output_path(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y-%m-%d-%H%M%S");
        Path::new(&self.config.output_dir).join(format!("xero_import_{}.csv", timestamp))
    }
}

/// 单个文档的处理结果分类
///
/// `NoLineItems` 和 `ParseFailed` 最终都贡献零行，但报告中必须
/// 区分"成功但没有行项目"和"模型输出无法解析"。
#[derive(Debug)]
pub enum DocumentStatus {
    /// 成功提取到行项目
    Extracted { rows: usize },
    /// 成功，但发票中没有行项目
    NoLineItems,
    /// 文档无法打开或解析
    OpenFailed(String),
    /// LLM 输出无法解析为发票记录
    ParseFailed(String),
    /// 其他文档级错误
    Failed(String),
}

impl DocumentStatus {
    /// 该文档是否算处理成功（包括空发票）
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Extracted { .. } | DocumentStatus::NoLineItems
        )
    }
}

/// 批次处理结果
///
/// 累积器由本模块独占持有，只追加，行顺序 = 文档处理顺序，
/// 文档内按行项目顺序，绝不重排或去重。
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 跨所有文档累积的输出行
    pub rows: Vec<FlatRow>,
    /// 每个文档的处理状态，仅用于报告
    pub statuses: Vec<(String, DocumentStatus)>,
    /// 批次级错误，出现后不再处理剩余文档
    pub fatal: Option<AppError>,
}

impl BatchReport {
    /// 批次是否被提前终止
    pub fn aborted(&self) -> bool {
        self.fatal.is_some()
    }

    /// 处理成功的文档数
    pub fn succeeded(&self) -> usize {
        self.statuses.iter().filter(|(_, s)| s.is_success()).count()
    }

    /// 处理失败的文档数
    pub fn failed(&self) -> usize {
        self.statuses.len() - self.succeeded()
    }
}

/// 把单个文档的处理结果并入批次报告
///
/// 返回是否继续处理后续文档：只有批次级错误（LLM 连接失败）
/// 返回 `false`，其余情况记录状态后继续。
fn apply_outcome(
    report: &mut BatchReport,
    document: &str,
    outcome: AppResult<Vec<FlatRow>>,
) -> bool {
    match outcome {
        Ok(rows) if rows.is_empty() => {
            info!("✓ {} 处理完成，但未找到行项目", document);
            report
                .statuses
                .push((document.to_string(), DocumentStatus::NoLineItems));
            true
        }
        Ok(rows) => {
            info!("✓ {} 提取到 {} 行", document, rows.len());
            report
                .statuses
                .push((document.to_string(), DocumentStatus::Extracted { rows: rows.len() }));
            report.rows.extend(rows);
            true
        }
        Err(e) if e.is_batch_fatal() => {
            error!("❌ {}: {}", document, e);
            report
                .statuses
                .push((document.to_string(), DocumentStatus::Failed(e.to_string())));
            report.fatal = Some(e);
            false
        }
        Err(e @ AppError::DocumentOpen { .. }) => {
            error!("❌ {}: {}", document, e);
            report
                .statuses
                .push((document.to_string(), DocumentStatus::OpenFailed(e.to_string())));
            true
        }
        Err(e @ (AppError::MalformedResponse { .. } | AppError::EmptyResponse { .. })) => {
            error!("❌ {}: {}", document, e);
            report
                .statuses
                .push((document.to_string(), DocumentStatus::ParseFailed(e.to_string())));
            true
        }
        Err(e) => {
            error!("❌ {}: {}", document, e);
            report
                .statuses
                .push((document.to_string(), DocumentStatus::Failed(e.to_string())));
            true
        }
    }
}

/// 扫描目录中的 PDF 文件，按文件名排序保证处理顺序稳定
fn collect_pdf_paths(folder: &Path) -> AppResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        warn!("⚠️ 发票目录不存在: {}", folder.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(folder)
        .map_err(|e| AppError::Other(format!("无法读取目录 {}: {}", folder.display(), e)))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();

    paths.sort();
    Ok(paths)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 发票批量提取模式");
    info!("🤖 LLM 服务: {} (模型: {})", config.llm_api_base_url, config.llm_model_name);
    info!("{}", "=".repeat(60));
}

fn print_final_stats(report: &BatchReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.succeeded(), report.statuses.len());
    info!("❌ 失败: {}", report.failed());
    info!("📋 累计提取 {} 行", report.rows.len());
    if report.aborted() {
        info!("⚠️ 批次被提前终止");
    }
    info!("{}", "=".repeat(60));
}
