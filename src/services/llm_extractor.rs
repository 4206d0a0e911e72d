//! LLM 提取服务 - 业务能力层
//!
//! 只负责"文本 → 结构化发票记录"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 默认连接 LM Studio 本地服务（兼容 OpenAI API）
//!
//! ## 输出契约
//! 系统提示词是强制输出形状的唯一机制。模型并不保证遵守，
//! 所以先做响应修复（剥掉代码围栏），再做严格 JSON 解析，
//! 解析失败只影响当前文档。

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::invoice::InvoiceRecord;
use crate::utils::logging::truncate_text;

/// 发票提取的系统提示词
///
/// 要求模型只返回一个符合固定结构的 JSON 对象，未知字段用 null，
/// 日期尽力归一化为 YYYY-MM-DD。
const SYSTEM_PROMPT: &str = r#"You are an expert, high-speed data extraction engine. Your job is to read unstructured text from an invoice and extract its details.

You MUST ONLY respond with a single, valid JSON object. Do not add any text before or after the JSON, such as "Here is the JSON..." or "```json".

The JSON object must have the following structure:
{
  "contact_name": "The customer's name",
  "invoice_number": "The invoice number",
  "invoice_date": "The invoice date (format as YYYY-MM-DD)",
  "due_date": "The due date (format as YYYY-MM-DD)",
  "lines": [
    {
      "description": "Description of the line item",
      "quantity": 1.0,
      "unit_price": 100.00
    }
  ]
}

If you cannot find a value for a field, return null for it.
For dates, try your best to format them as YYYY-MM-DD.
For "lines", return an array of all line items you can find."#;

/// LLM 提取服务
///
/// 职责：
/// - 把单个文档的文本发给 LLM，拿回结构化的 `InvoiceRecord`
/// - 只处理单个文档
/// - 不出现 Vec<InvoiceRecord>
/// - 不关心批次顺序
pub struct LlmExtractor {
    client: Client<OpenAIConfig>,
    endpoint: String,
    model_name: String,
    max_tokens: u32,
}

impl LlmExtractor {
    /// 创建新的 LLM 提取服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务，如 LM Studio）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            endpoint: config.llm_api_base_url.clone(),
            model_name: config.llm_model_name.clone(),
            max_tokens: config.llm_max_tokens,
        }
    }

    /// 从文档文本中提取结构化发票记录
    ///
    /// # 参数
    /// - `document_text`: 文档的全部提取文本
    ///
    /// # 返回
    /// 返回解析后的 [`InvoiceRecord`]
    ///
    /// # 错误
    /// - [`AppError::Transport`]: 服务不可达或返回错误状态（批次级）
    /// - [`AppError::EmptyResponse`]: 响应信封中没有内容（文档级）
    /// - [`AppError::MalformedResponse`]: 修复后仍无法解析为 JSON（文档级）
    pub async fn extract(&self, document_text: &str) -> AppResult<InvoiceRecord> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("文档文本长度: {} 字符", document_text.chars().count());

        // 构建消息列表
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()
            .map_err(|e| AppError::Other(format!("构建系统消息失败: {}", e)))?;

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(document_text)
            .build()
            .map_err(|e| AppError::Other(format!("构建用户消息失败: {}", e)))?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        // 构建请求：temperature 固定为 0，保证确定性采样，不使用流式输出
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| AppError::Other(format!("构建请求失败: {}", e)))?;

        // 调用 API；连接失败对整个批次都是致命的
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::transport(&self.endpoint, e)
        })?;

        debug!("LLM API 调用成功");

        // 从响应信封中提取生成文本
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        parse_invoice_response(&content)
    }
}

/// 把模型的原始响应解析为 [`InvoiceRecord`]
///
/// 先做响应修复再做严格解析。解析失败返回
/// [`AppError::MalformedResponse`]，错误中带截断的响应片段便于排查。
pub fn parse_invoice_response(raw: &str) -> AppResult<InvoiceRecord> {
    let repaired = repair_model_output(raw);

    serde_json::from_str(repaired).map_err(|e| {
        warn!("LLM 返回的 JSON 无法解析: {}", truncate_text(repaired, 120));
        AppError::MalformedResponse {
            snippet: truncate_text(repaired, 200),
            source: e,
        }
    })
}

/// 修复模型响应中常见的"废话"包装
///
/// 模型经常无视指令，把 JSON 包在 ``` 或 ```json 围栏里。
/// 这里只剥掉这一种已知包装；新的包装模式在此函数中扩展，
/// 不触碰传输和解析代码。对未包装的输入是幂等的。
pub fn repair_model_output(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        let rest = rest.strip_suffix("```").unwrap_or(rest);
        return rest.trim();
    }

    trimmed
}
